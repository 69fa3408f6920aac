//! Out-of-band debug/automation control plane for the SH-2 core of a
//! cycle-accurate Sega Saturn emulator. The emulator itself (SH-2,
//! VDP2, SCU-DMA, CD Block, framebuffer) is out of scope; this crate
//! exposes the file-based request/response protocol, the frame and
//! instruction pause engines, trace recorders, the watchpoint engine,
//! and snapshot emitters that sit between an external orchestrator and
//! that collaborator (see `hooks::EmulatorHooks`).

pub mod config;
pub mod control;
pub mod error;
pub mod hooks;
pub mod stub_emu;

/// End-to-end scenarios straight out of the protocol's documented
/// request/response walkthroughs, driving the whole stack (watcher,
/// dispatch, frame scheduler, instruction hook, ack writer) the way an
/// orchestrator would, minus the filesystem-bridge latency.
#[cfg(test)]
mod scenario_tests {
    use crate::control::{ack, frame, hooks_mgr, instruction, ControlState};
    use crate::stub_emu::{PlaceholderEncoder, StubEmu};
    use std::time::Duration;

    fn boot() -> (ControlState, StubEmu, PlaceholderEncoder, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut state = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        let emu = StubEmu::new();
        ack::write(&mut state, &emu, "ready frame=0");
        (state, emu, PlaceholderEncoder, dir)
    }

    fn last_ack(state: &ControlState) -> String {
        std::fs::read_to_string(&state.ack_path).unwrap()
    }

    /// Launch, then `frame_advance 3`: dispatched while still paused (no
    /// tick consumed by the command itself, matching the real emulator
    /// driving ticks only outside the frame-level spin-wait), an
    /// immediate `ok`, then a `done` exactly 3 frame ticks later.
    #[test]
    fn launch_and_advance_three_frames() {
        let (mut state, mut emu, encoder, _dir) = boot();
        assert!(last_ack(&state).starts_with("ready frame=0"));

        std::fs::write(&state.action_path, "# 1\nframe_advance 3\n").unwrap();
        frame::spin_while_paused(&mut state, &mut emu);
        assert!(last_ack(&state).starts_with("ok frame_advance 3"));

        frame::tick(&mut state, &mut emu, &encoder);
        frame::tick(&mut state, &mut emu, &encoder);
        frame::tick(&mut state, &mut emu, &encoder);
        assert!(last_ack(&state).starts_with("done frame_advance frame=3"));
    }

    /// Set a breakpoint, `continue`, hit it mid-instruction-stream, dump
    /// binary registers, and check the file is exactly 88 bytes (22 LE
    /// u32 fields).
    #[test]
    fn breakpoint_then_continue_then_dump_regs_bin() {
        let (mut state, mut emu, encoder, dir) = boot();

        std::fs::write(&state.action_path, "# 1\nbreakpoint 06004000\n").unwrap();
        frame::tick(&mut state, &mut emu, &encoder);
        assert!(last_ack(&state).starts_with("ok breakpoint 0x06004000 total=1"));
        assert!(state.hook_enabled);

        std::fs::write(&state.action_path, "# 2\ncontinue\n").unwrap();
        frame::tick(&mut state, &mut emu, &encoder);
        assert!(last_ack(&state).starts_with("ok continue"));

        // Queue the dump command for the spin-wait loop to pick up once
        // the instruction hook pauses at the breakpoint.
        let regs_path = dir.path().join("r.bin");
        std::fs::write(
            &state.action_path,
            format!("# 3\ndump_regs_bin {}\ncontinue\n", regs_path.display()),
        )
        .unwrap();

        instruction::on_instruction(&mut state, &mut emu, 0x0600_4000);

        // The spin loop processes both queued commands before returning;
        // the ack file (truncated on each write) holds the last one.
        assert!(last_ack(&state).starts_with("ok continue"));
        let bytes = std::fs::read(&regs_path).unwrap();
        assert_eq!(bytes.len(), 88);
    }

    /// An unknown command always surfaces as `error unknown command: <tok>`.
    #[test]
    fn unknown_command_reports_the_offending_token() {
        let (mut state, mut emu, encoder, _dir) = boot();
        std::fs::write(&state.action_path, "# 1\nzorkmid 42\n").unwrap();
        frame::tick(&mut state, &mut emu, &encoder);
        assert!(last_ack(&state).starts_with("error unknown command: zorkmid"));
    }

    /// A single watchpoint is hit once via the CPU-store path and once
    /// via the SCU-DMA path, each producing both an ack and a log line,
    /// and the watchpoint never arms the instruction hook by itself.
    #[test]
    fn watchpoint_observes_both_write_paths_without_arming_the_hook() {
        use crate::control::watchpoint;
        use crate::hooks::{WriteEvent, WritePath};

        let (mut state, mut emu, encoder, _dir) = boot();
        std::fs::write(&state.action_path, "# 1\nwatchpoint 06010000\n").unwrap();
        frame::tick(&mut state, &mut emu, &encoder);

        hooks_mgr::recompute(&mut state, &mut emu);
        assert!(!state.hook_enabled);

        let cpu_write = WriteEvent {
            pc: 0x1000,
            pr: 0x1004,
            addr: 0x0601_0000,
            old: 0,
            new: 1,
            path: WritePath::CpuStore,
        };
        let dma_write = WriteEvent {
            path: WritePath::ScuDma,
            ..cpu_write
        };

        watchpoint::emit_hit_ack(&mut state, &emu, cpu_write);
        assert!(last_ack(&state).starts_with("hit watchpoint"));
        watchpoint::emit_hit_ack(&mut state, &emu, dma_write);
        assert!(last_ack(&state).starts_with("hit watchpoint"));

        let log = std::fs::read_to_string(&state.wp_log_path).unwrap();
        assert_eq!(log.lines().count(), 2);
    }
}
