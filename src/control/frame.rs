// Frame scheduler. Invoked once per emulated frame by the emulator's
// frame-boundary tick. Drives the four frame modes and is the spin-wait
// suspension point for frame-level pause.

use std::thread::sleep;

use crate::control::ack;
use crate::control::dispatch;
use crate::control::hooks_mgr;
use crate::control::state::{AdvanceReason, ControlState, FrameMode};
use crate::control::watcher::{self, PollResult};
use crate::control::command;
use crate::hooks::{EmulatorHooks, ScreenshotEncoder};

/// Run one frame tick's worth of scheduler logic. Does not itself loop
/// on `Paused`; callers drive the per-frame cadence and are expected to
/// call `spin_while_paused` afterwards, matching the real core's frame
/// boundary calling this once then falling into its own vsync wait.
pub fn tick(state: &mut ControlState, emu: &mut dyn EmulatorHooks, encoder: &dyn ScreenshotEncoder) {
    state.frame_counter += 1;

    if state.input_override {
        emu.apply_port0_override(state.input_mask);
    }

    if let Some(path) = state.pending_screenshot_path.take() {
        match emu.framebuffer() {
            Some(view) => match encoder.encode(view, &path) {
                Ok(()) => {
                    ack::write(state, emu, &format!("ok screenshot {}", path.display()));
                }
                Err(e) => {
                    ack::write(state, emu, &format!("error screenshot: {e}"));
                }
            },
            None => {
                ack::write(state, emu, "error screenshot: no framebuffer available");
            }
        }
    }

    if let FrameMode::RunToFrame(target) = state.frame_mode {
        if state.frame_counter >= target {
            state.frame_mode = FrameMode::Paused;
            ack::write(state, emu, &format!("done run_to_frame frame={}", state.frame_counter));
        }
    }

    if let FrameMode::AdvanceRemaining(n) = state.frame_mode {
        let remaining = n - 1;
        if remaining == 0 {
            state.frame_mode = FrameMode::Paused;
            match state.advance_reason {
                AdvanceReason::PcTraceFrame => {
                    if let Some(trace) = state.pc_trace.take() {
                        trace.close();
                    }
                    hooks_mgr::recompute(state, emu);
                    ack::write(state, emu, &format!("done pc_trace_frame frame={}", state.frame_counter));
                }
                AdvanceReason::FrameAdvance => {
                    ack::write(state, emu, &format!("done frame_advance frame={}", state.frame_counter));
                }
            }
        } else {
            state.frame_mode = FrameMode::AdvanceRemaining(remaining);
        }
    }

    poll_and_dispatch(state, emu);
}

/// Spin-wait while paused at frame granularity. Returns as soon as a
/// command moves `frame_mode` out of `Paused`, or the control plane is
/// shut down.
pub fn spin_while_paused(state: &mut ControlState, emu: &mut dyn EmulatorHooks) {
    while state.frame_mode == FrameMode::Paused && state.active {
        sleep(state.poll_interval);
        poll_and_dispatch(state, emu);
    }
}

fn poll_and_dispatch(state: &mut ControlState, emu: &mut dyn EmulatorHooks) {
    let commands = match watcher::poll(state) {
        PollResult::Unchanged => return,
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
