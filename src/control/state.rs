// Process-wide control state. Owned exclusively by the single emulator
// thread that drives the control plane; no locking, no shared ownership.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::control::trace::{
    CallTrace, CdbTrace, InputTrace, InsnTrace, PcFrameTrace, ScdqTrace, UnifiedTrace,
};

/// Frame-granularity scheduling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Free,
    Paused,
    AdvanceRemaining(u64),
    RunToFrame(u64),
}

/// Instruction-granularity pause mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Disarmed,
    CountingDown(u64),
    Paused,
}

/// Watchpoint arming: mutually exclusive variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Watchpoint {
    Off,
    Single(u32),
    Range(u32, u32, PathBuf),
}

/// Reason a pending `AdvanceRemaining` run was started, so the frame
/// scheduler knows which `done ...` ack to emit on completion
/// (`pc_trace_frame` reuses `frame_advance`'s countdown machinery).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    FrameAdvance,
    PcTraceFrame,
}

pub struct ControlState {
    pub active: bool,
    pub base_dir: PathBuf,
    pub action_path: PathBuf,
    pub ack_path: PathBuf,
    pub wp_log_path: PathBuf,

    pub frame_counter: u64,
    pub frame_mode: FrameMode,
    pub advance_reason: AdvanceReason,

    pub step_state: StepState,
    pub breakpoints: Vec<u32>,

    pub watchpoint: Watchpoint,
    pub wp_log_file: Option<File>,
    pub range_log_file: Option<File>,

    pub input_mask: u16,
    pub input_override: bool,

    pub pending_screenshot_path: Option<PathBuf>,
    pub pending_window_show: bool,
    pub pending_window_hide: bool,

    pub hook_enabled: bool,
    pub ack_seq: u64,
    pub last_action_header: String,

    /// Target cycle for `run_to_cycle`; `None` when disarmed.
    pub run_to_cycle_target: Option<u64>,

    /// Spin interval (roughly 10ms by default) for the frame and
    /// instruction pause loops, made configurable for tests (see config.rs).
    pub poll_interval: Duration,

    /// Unified line counter that `insn_trace`/`insn_trace_unified`
    /// windows are measured against.
    pub line_counter: u64,

    pub pc_trace: Option<PcFrameTrace>,
    pub call_trace: Option<CallTrace>,
    pub insn_trace: Option<InsnTrace>,
    pub insn_trace_unified: Option<(u64, u64)>,
    pub unified_trace: Option<UnifiedTrace>,
    pub scdq_trace: Option<ScdqTrace>,
    pub cdb_trace: Option<CdbTrace>,
    pub input_trace: Option<InputTrace>,
}

impl ControlState {
    /// Initialise the control plane: creates paths, begins in
    /// `FrameMode::Paused`, leaves `ack_seq` at 0 (the caller writes the
    /// initial `ready` ack with seq=1 via `ack::write`).
    pub fn activate(base_dir: impl AsRef<Path>, poll_interval: Duration) -> std::io::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;

        let action_path = base_dir.join("mednafen_action.txt");
        let ack_path = base_dir.join("mednafen_ack.txt");
        let wp_log_path = base_dir.join("watchpoint_hits.txt");

        Ok(Self {
            active: true,
            base_dir,
            action_path,
            ack_path,
            wp_log_path,
            frame_counter: 0,
            frame_mode: FrameMode::Paused,
            advance_reason: AdvanceReason::FrameAdvance,
            step_state: StepState::Disarmed,
            breakpoints: Vec::new(),
            watchpoint: Watchpoint::Off,
            wp_log_file: None,
            range_log_file: None,
            input_mask: 0,
            input_override: false,
            pending_screenshot_path: None,
            pending_window_show: false,
            pending_window_hide: false,
            hook_enabled: false,
            ack_seq: 0,
            last_action_header: String::new(),
            run_to_cycle_target: None,
            poll_interval,
            line_counter: 0,
            pc_trace: None,
            call_trace: None,
            insn_trace: None,
            insn_trace_unified: None,
            unified_trace: None,
            scdq_trace: None,
            cdb_trace: None,
            input_trace: None,
        })
    }

    /// Hook-activation invariant: hook_enabled iff step armed,
    /// breakpoints non-empty, or any per-instruction trace is armed
    /// (spec.md §3 invariant 1). A pending run-to-cycle target is a
    /// fourth, named supplement to that invariant (SPEC_FULL.md §3) —
    /// `run_to_cycle`'s threshold check lives in the instruction hook,
    /// so it must arm the hook to ever fire. Watchpoints alone never
    /// arm it.
    pub fn wants_hook(&self) -> bool {
        !matches!(self.step_state, StepState::Disarmed)
            || !self.breakpoints.is_empty()
            || self.pc_trace.is_some()
            || self.insn_trace.is_some()
            || self.insn_trace_unified.is_some()
            || self.run_to_cycle_target.is_some()
    }

    pub fn shutdown(&mut self) {
        self.pc_trace = None;
        self.call_trace = None;
        self.insn_trace = None;
        self.insn_trace_unified = None;
        self.unified_trace = None;
        self.scdq_trace = None;
        self.cdb_trace = None;
        self.input_trace = None;
        self.wp_log_file = None;
        self.range_log_file = None;
        self.active = false;
    }

    pub fn breakpoint_set(&self) -> BTreeSet<u32> {
        self.breakpoints.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused_with_no_hook() {
        let dir = tempfile::tempdir().unwrap();
        let st = ControlState::activate(dir.path(), Duration::from_millis(10)).unwrap();
        assert_eq!(st.frame_mode, FrameMode::Paused);
        assert_eq!(st.frame_counter, 0);
        assert!(!st.wants_hook());
        assert!(st.active);
    }

    #[test]
    fn wants_hook_tracks_breakpoints_and_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(10)).unwrap();
        assert!(!st.wants_hook());
        st.breakpoints.push(0x1000);
        assert!(st.wants_hook());
        st.breakpoints.clear();
        assert!(!st.wants_hook());
        st.step_state = StepState::CountingDown(3);
        assert!(st.wants_hook());
    }
}
