// The control plane: one module per protocol component (watcher, ack,
// command parsing/dispatch, frame and instruction pause engines, trace
// recorders, watchpoint engine, snapshot emitters, input injector, hook
// activation manager), plus the process-wide state they share.

pub mod ack;
pub mod binfmt;
pub mod command;
pub mod dispatch;
pub mod frame;
pub mod hooks_mgr;
pub mod input;
pub mod instruction;
pub mod snapshot;
pub mod state;
pub mod trace;
pub mod watcher;
pub mod watchpoint;

pub use state::ControlState;
