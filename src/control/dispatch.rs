// Command dispatcher. Executes one parsed `Command` against
// `ControlState` and the collaborator, and returns the message portion
// of the ack to write (the caller appends `cycle=`/`seq=` via `control::ack`).
//
// `frame_advance`, `run_to_frame`, and `pc_trace_frame` only emit their
// immediate `ok ...` ack here; the later `done ...` ack is emitted by
// `control::frame` when the corresponding countdown completes.

use std::io::Write;

use crate::control::command::Command;
use crate::control::input;
use crate::control::snapshot;
use crate::control::state::{AdvanceReason, ControlState, FrameMode, StepState, Watchpoint};
use crate::control::trace::{CallTrace, CdbTrace, InputTrace, InsnTrace, PcFrameTrace, ScdqTrace, UnifiedTrace};
use crate::control::hooks_mgr;
use crate::hooks::EmulatorHooks;

fn write_file(path: &std::path::Path, bytes: &[u8]) -> Result<(), String> {
    let mut f = std::fs::File::create(path).map_err(|e| crate::error::context("create", e))?;
    f.write_all(bytes).map_err(|e| crate::error::context("write", e))
}

/// Execute `cmd` and return the ack message text (no `cycle=`/`seq=` suffix).
pub fn execute(state: &mut ControlState, emu: &mut dyn EmulatorHooks, cmd: Command) -> String {
    match cmd {
        Command::FrameAdvance(n) => {
            state.frame_mode = FrameMode::AdvanceRemaining(n);
            state.advance_reason = AdvanceReason::FrameAdvance;
            format!("ok frame_advance {n}")
        }
        Command::RunToFrame(target) => {
            state.frame_mode = FrameMode::RunToFrame(target);
            format!("ok run_to_frame {target}")
        }
        Command::Run => {
            state.frame_mode = FrameMode::Free;
            "ok run".to_string()
        }
        Command::Pause => {
            state.frame_mode = FrameMode::Paused;
            format!("ok pause frame={}", state.frame_counter)
        }
        Command::Quit => {
            state.shutdown();
            "ok quit".to_string()
        }
        Command::Reset => {
            log_input_event(state, "reset");
            emu.reset();
            "ok reset".to_string()
        }
        Command::Help => format!("ok help\n{}", help_text()),
        Command::Status => status_line(state),
        Command::Input(name) => match input::press(state, &name) {
            Ok(()) => {
                log_input_event(state, &format!("press {name}"));
                format!("ok input {name}")
            }
            Err(e) => format!("error input: {e}"),
        },
        Command::InputRelease(name) => match input::release(state, &name) {
            Ok(()) => {
                log_input_event(state, &format!("release {name}"));
                format!("ok input_release {name}")
            }
            Err(e) => format!("error input_release: {e}"),
        },
        Command::InputClear => {
            input::clear(state);
            log_input_event(state, "clear");
            "ok input_clear".to_string()
        }
        Command::DumpRegs => snapshot::format_regs_text(&emu.master_regs()),
        Command::DumpSlaveRegs => snapshot::format_regs_text(&emu.slave_regs()),
        Command::DumpRegsBin(path) => {
            let bytes = snapshot::encode_regs_bin(&emu.master_regs());
            match write_file(&path, &bytes) {
                Ok(()) => format!("ok dump_regs_bin {}", path.display()),
                Err(e) => format!("error dump_regs_bin: {e}"),
            }
        }
        Command::DumpSlaveRegsBin(path) => {
            let bytes = snapshot::encode_regs_bin(&emu.slave_regs());
            match write_file(&path, &bytes) {
                Ok(()) => format!("ok dump_slave_regs_bin {}", path.display()),
                Err(e) => format!("error dump_slave_regs_bin: {e}"),
            }
        }
        Command::DumpMem { addr, size } => snapshot::dump_mem_text(emu, addr, size),
        Command::DumpMemBin { addr, size, path } => {
            let bytes = snapshot::dump_mem_bin(emu, addr, size);
            match write_file(&path, &bytes) {
                Ok(()) => format!("ok dump_mem_bin {:#010x} {:#x}", addr, bytes.len()),
                Err(e) => format!("error dump_mem_bin: {e}"),
            }
        }
        Command::DumpVdp2Regs(path) => match write_file(&path, &emu.vdp2_regs()) {
            Ok(()) => format!("ok dump_vdp2_regs {}", path.display()),
            Err(e) => format!("error dump_vdp2_regs: {e}"),
        },
        Command::Screenshot(path) => {
            state.pending_screenshot_path = Some(path.clone());
            format!("ok screenshot_queued {}", path.display())
        }
        Command::Step(n) => {
            state.step_state = StepState::CountingDown(n);
            hooks_mgr::recompute(state, emu);
            format!("ok step {n}")
        }
        Command::Breakpoint(addr) => {
            state.breakpoints.push(addr);
            hooks_mgr::recompute(state, emu);
            format!("ok breakpoint {:#010x} total={}", addr, state.breakpoints.len())
        }
        Command::BreakpointClear => {
            let removed = state.breakpoints.len();
            state.breakpoints.clear();
            hooks_mgr::recompute(state, emu);
            format!("ok breakpoint_clear removed={removed}")
        }
        Command::BreakpointList => {
            let addrs: Vec<String> = state.breakpoints.iter().map(|a| format!("{a:#010x}")).collect();
            format!("breakpoints count={} {}", state.breakpoints.len(), addrs.join(" "))
        }
        Command::Continue => {
            state.step_state = StepState::Disarmed;
            if state.frame_mode == FrameMode::Paused {
                state.frame_mode = FrameMode::Free;
            }
            hooks_mgr::recompute(state, emu);
            "ok continue".to_string()
        }
        Command::DumpCycle => format!("ok dump_cycle value={}", emu.cycle_count()),
        Command::RunToCycle(target) => {
            state.run_to_cycle_target = Some(target);
            hooks_mgr::recompute(state, emu);
            format!("ok run_to_cycle target={target}")
        }
        Command::Deterministic => {
            log_input_event(state, "deterministic");
            emu.set_deterministic();
            "ok deterministic".to_string()
        }
        Command::PcTraceFrame(path) => match PcFrameTrace::open(&path) {
            Ok(trace) => {
                state.pc_trace = Some(trace);
                state.frame_mode = FrameMode::AdvanceRemaining(1);
                state.advance_reason = AdvanceReason::PcTraceFrame;
                hooks_mgr::recompute(state, emu);
                "ok pc_trace_frame_started".to_string()
            }
            Err(e) => format!("error pc_trace_frame: {e}"),
        },
        Command::CallTrace(path) => match CallTrace::open(&path) {
            Ok(trace) => {
                state.call_trace = Some(trace);
                format!("ok call_trace {}", path.display())
            }
            Err(e) => format!("error call_trace: {e}"),
        },
        Command::CallTraceStop => {
            state.call_trace = None;
            "ok call_trace_stop".to_string()
        }
        Command::InsnTrace { path, start, stop } => match InsnTrace::open(&path, start, stop) {
            Ok(trace) => {
                state.insn_trace = Some(trace);
                hooks_mgr::recompute(state, emu);
                format!("ok insn_trace {} {start} {stop}", path.display())
            }
            Err(e) => format!("error insn_trace: {e}"),
        },
        Command::InsnTraceStop => {
            state.insn_trace = None;
            hooks_mgr::recompute(state, emu);
            "ok insn_trace_stop".to_string()
        }
        Command::InsnTraceUnified { start, stop } => {
            state.insn_trace_unified = Some((start, stop));
            hooks_mgr::recompute(state, emu);
            format!("ok insn_trace_unified {start} {stop}")
        }
        Command::UnifiedTrace(path) => match UnifiedTrace::open(&path) {
            Ok(trace) => {
                state.unified_trace = Some(trace);
                format!("ok unified_trace {}", path.display())
            }
            Err(e) => format!("error unified_trace: {e}"),
        },
        Command::UnifiedTraceStop => {
            state.unified_trace = None;
            "ok unified_trace_stop".to_string()
        }
        Command::ScdqTrace(path) => match ScdqTrace::open(&path) {
            Ok(trace) => {
                state.scdq_trace = Some(trace);
                format!("ok scdq_trace {}", path.display())
            }
            Err(e) => format!("error scdq_trace: {e}"),
        },
        Command::ScdqTraceStop => {
            state.scdq_trace = None;
            "ok scdq_trace_stop".to_string()
        }
        Command::CdbTrace(path) => match CdbTrace::open(&path) {
            Ok(trace) => {
                state.cdb_trace = Some(trace);
                format!("ok cdb_trace {}", path.display())
            }
            Err(e) => format!("error cdb_trace: {e}"),
        },
        Command::CdbTraceStop => {
            state.cdb_trace = None;
            "ok cdb_trace_stop".to_string()
        }
        Command::InputTrace(path) => match InputTrace::open(&path) {
            Ok(trace) => {
                state.input_trace = Some(trace);
                format!("ok input_trace {}", path.display())
            }
            Err(e) => format!("error input_trace: {e}"),
        },
        Command::InputTraceStop => {
            state.input_trace = None;
            "ok input_trace_stop".to_string()
        }
        Command::Watchpoint(addr) => {
            state.watchpoint = Watchpoint::Single(addr);
            state.range_log_file = None;
            format!("ok watchpoint {addr:#010x}")
        }
        Command::WatchpointClear => {
            state.watchpoint = Watchpoint::Off;
            state.range_log_file = None;
            "ok watchpoint_clear".to_string()
        }
        Command::Vdp2Watchpoint { lo, hi, path } => {
            state.watchpoint = Watchpoint::Range(lo, hi, path.clone());
            state.range_log_file = None;
            format!("ok vdp2_watchpoint {lo:#010x} {hi:#010x} {}", path.display())
        }
        Command::Vdp2WatchpointClear => {
            state.watchpoint = Watchpoint::Off;
            state.range_log_file = None;
            "ok vdp2_watchpoint_clear".to_string()
        }
        Command::ShowWindow => {
            state.pending_window_show = true;
            "ok show_window".to_string()
        }
        Command::HideWindow => {
            state.pending_window_hide = true;
            "ok hide_window".to_string()
        }
    }
}

/// Feed one event into the input trace recorder, if armed (spec §4.F:
/// "input injector and system-command log calls").
fn log_input_event(state: &mut ControlState, event: &str) {
    let frame = state.frame_counter;
    if let Some(trace) = state.input_trace.as_mut() {
        trace.record(frame, event);
    }
}

fn status_line(state: &ControlState) -> String {
    let wp = match state.watchpoint {
        Watchpoint::Off => "off",
        Watchpoint::Single(_) => "single",
        Watchpoint::Range(..) => "range",
    };
    format!(
        "status frame={} paused={} inst_paused={} breakpoints={} input={:#06x} hook={} wp={}",
        state.frame_counter,
        state.frame_mode == FrameMode::Paused,
        state.step_state == StepState::Paused,
        state.breakpoints.len(),
        state.input_mask,
        state.hook_enabled,
        wp,
    )
}

fn help_text() -> &'static str {
    "frame_advance run_to_frame run pause quit status input input_release input_clear \
dump_regs dump_slave_regs dump_regs_bin dump_slave_regs_bin dump_mem dump_mem_bin \
dump_vdp2_regs screenshot step breakpoint breakpoint_clear breakpoint_list continue \
dump_cycle run_to_cycle deterministic pc_trace_frame call_trace call_trace_stop \
insn_trace insn_trace_stop insn_trace_unified unified_trace unified_trace_stop \
scdq_trace scdq_trace_stop cdb_trace cdb_trace_stop input_trace input_trace_stop \
watchpoint watchpoint_clear vdp2_watchpoint vdp2_watchpoint_clear show_window \
hide_window reset help"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::command::parse;
    use crate::stub_emu::StubEmu;
    use std::time::Duration;

    fn setup() -> (ControlState, StubEmu, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        (st, StubEmu::new(), dir)
    }

    #[test]
    fn frame_advance_sets_mode_and_emits_immediate_ack() {
        let (mut st, mut emu, _dir) = setup();
        let msg = execute(&mut st, &mut emu, parse("frame_advance 3").unwrap());
        assert_eq!(msg, "ok frame_advance 3");
        assert_eq!(st.frame_mode, FrameMode::AdvanceRemaining(3));
    }

    #[test]
    fn breakpoint_arms_hook_and_reports_total() {
        let (mut st, mut emu, _dir) = setup();
        let msg = execute(&mut st, &mut emu, parse("breakpoint 06004000").unwrap());
        assert_eq!(msg, "ok breakpoint 0x06004000 total=1");
        assert!(st.hook_enabled);
    }

    #[test]
    fn unknown_button_surfaces_as_error_ack() {
        let (mut st, mut emu, _dir) = setup();
        let msg = execute(&mut st, &mut emu, parse("input TURBO").unwrap());
        assert!(msg.starts_with("error input:"));
    }

    #[test]
    fn status_includes_supplementary_hook_and_wp_fields() {
        let (mut st, mut emu, _dir) = setup();
        let msg = execute(&mut st, &mut emu, parse("status").unwrap());
        assert!(msg.contains("hook=false"));
        assert!(msg.contains("wp=off"));
    }

    #[test]
    fn watchpoint_clear_resets_to_off() {
        let (mut st, mut emu, _dir) = setup();
        execute(&mut st, &mut emu, parse("watchpoint 1000").unwrap());
        assert_ne!(st.watchpoint, Watchpoint::Off);
        execute(&mut st, &mut emu, parse("watchpoint_clear").unwrap());
        assert_eq!(st.watchpoint, Watchpoint::Off);
    }

    #[test]
    fn reset_forwards_to_the_collaborator_without_touching_frame_counter() {
        let (mut st, mut emu, _dir) = setup();
        st.frame_counter = 7;
        emu.set_cycle_count(99);
        let msg = execute(&mut st, &mut emu, parse("reset").unwrap());
        assert_eq!(msg, "ok reset");
        assert_eq!(st.frame_counter, 7);
        assert_eq!(emu.cycle_count(), 0);
    }
}
