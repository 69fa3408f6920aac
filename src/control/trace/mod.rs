// Trace recorders (spec §4.F). Each is independently armable/disarmable;
// arming opens a file, disarming closes it, and every open trace file
// must close on shutdown (enforced by `ControlState::shutdown`).

pub mod call;
pub mod cdb;
pub mod insn;
pub mod input;
pub mod pc;
pub mod unified;

pub use call::{on_call, Cpu, CallTrace};
pub use cdb::{on_cdb_event, on_scdq_event, CdbEventKind, CdbTrace, ScdqTrace};
pub use input::InputTrace;
pub use insn::InsnTrace;
pub use pc::PcFrameTrace;
pub use unified::UnifiedTrace;
