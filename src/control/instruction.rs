// Instruction-pause engine. Installed as the per-instruction callback
// whenever `ControlState::wants_hook()` is true. Zero calls into this
// module happen when the hook is disarmed (enforced by
// `control::hooks_mgr`, the sole caller of `EmulatorHooks::enable_cpu_hook`).

use std::thread::sleep;

use crate::control::ack;
use crate::control::command;
use crate::control::dispatch;
use crate::control::hooks_mgr;
use crate::control::state::{ControlState, StepState};
use crate::control::trace::{call::unified_insn_line, Cpu};
use crate::control::watcher::{self, PollResult};
use crate::hooks::EmulatorHooks;

/// Called by the collaborator for every master-CPU instruction while the
/// hook is armed. `decode_pc` is the address of the instruction being
/// decoded (as distinct from `emu.master_pc()`, the fetch PC).
pub fn on_instruction(state: &mut ControlState, emu: &mut dyn EmulatorHooks, decode_pc: u32) {
    record_traces(state, emu, decode_pc);

    let cycle_hit = match state.run_to_cycle_target {
        Some(target) if emu.cycle_count() >= target => {
            state.run_to_cycle_target = None;
            Some(target)
        }
        _ => None,
    };

    let bp_hit = state.breakpoints.contains(&decode_pc);

    let step_done = match state.step_state {
        StepState::CountingDown(1) => true,
        StepState::CountingDown(n) => {
            state.step_state = StepState::CountingDown(n - 1);
            false
        }
        _ => false,
    };

    if cycle_hit.is_none() && !bp_hit && !step_done {
        return;
    }

    state.step_state = StepState::Paused;

    if let Some(target) = cycle_hit {
        ack::write(state, emu, &format!("done run_to_cycle target={target} frame={}", state.frame_counter));
    } else if bp_hit {
        ack::write(
            state,
            emu,
            &format!("break pc={decode_pc:#010x} addr={decode_pc:#010x} frame={}", state.frame_counter),
        );
    } else {
        let fetch_pc = emu.master_pc();
        ack::write(state, emu, &format!("done step pc={fetch_pc:#010x} frame={}", state.frame_counter));
    }

    spin_while_paused(state, emu);
}

fn record_traces(state: &mut ControlState, emu: &mut dyn EmulatorHooks, decode_pc: u32) {
    if let Some(trace) = state.pc_trace.as_mut() {
        trace.record(decode_pc);
    }

    if state.insn_trace.is_some() || state.insn_trace_unified.is_some() {
        state.line_counter += 1;
        let line = state.line_counter;
        let cycle = emu.cycle_count();

        if let Some(trace) = state.insn_trace.as_mut() {
            if trace.in_window(line) {
                trace.record(line, cycle, Cpu::Master, decode_pc);
            }
        }

        if let Some((start, stop)) = state.insn_trace_unified {
            if line >= start && line <= stop {
                if let Some(unified) = state.unified_trace.as_mut() {
                    unified.record_line(&unified_insn_line(cycle, Cpu::Master, decode_pc));
                }
            }
        }
    }
}

/// Spin-wait while instruction-paused. Commands processed here may
/// mutate `step_state`, `frame_mode`, breakpoints, or trace state: the
/// same dispatch path as frame granularity.
fn spin_while_paused(state: &mut ControlState, emu: &mut dyn EmulatorHooks) {
    while state.step_state == StepState::Paused && state.active {
        sleep(state.poll_interval);

        let commands = match watcher::poll(state) {
            PollResult::Unchanged => continue,
            PollResult::NewCommands(cmds) => cmds,
        };

        for line in commands {
            let msg = match command::parse(&line) {
                Ok(cmd) => dispatch::execute(state, emu, cmd),
                Err(e) => format!("error {}", e.into_message()),
            };
            ack::write(state, emu, &msg);
        }
    }
    hooks_mgr::recompute(state, emu);
}
