// Call trace (spec §4.F). One event per control-flow subroutine call
// (JSR/BSR/BSRF or equivalent) on either CPU. Text, one line per event:
// `<cycle> <M|S> <caller_pc_minus_4> <target>`. Flush-on-write — call
// events are low rate relative to instructions.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::control::state::ControlState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cpu {
    Master,
    Slave,
}

impl Cpu {
    fn tag(self) -> char {
        match self {
            Cpu::Master => 'M',
            Cpu::Slave => 'S',
        }
    }

    fn tag_lower(self) -> char {
        match self {
            Cpu::Master => 'm',
            Cpu::Slave => 's',
        }
    }
}

pub struct CallTrace {
    file: File,
    path: PathBuf,
}

impl CallTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn record(&mut self, cycle: u64, cpu: Cpu, caller_pc_minus_4: u32, target: u32) {
        let line = format!(
            "{cycle} {} {caller_pc_minus_4:#010x} {target:#010x}\n",
            cpu.tag()
        );
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            eprintln!(
                "[trace] call_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}

/// Render a call event the way it appears when interleaved into the
/// unified trace stream (spec §4.F): same fields, same uppercase tag.
pub fn unified_line(cycle: u64, cpu: Cpu, caller_pc_minus_4: u32, target: u32) -> String {
    format!(
        "{cycle} {} {caller_pc_minus_4:#010x} {target:#010x}",
        cpu.tag()
    )
}

/// Render an instruction event's lowercase-tagged unified-stream line
/// (spec §4.F: "lowercase m|s tag to distinguish from call events").
pub fn unified_insn_line(cycle: u64, cpu: Cpu, pc: u32) -> String {
    format!("{cycle} {} pc={pc:#010x}", cpu.tag_lower())
}

/// Called by the collaborator on every JSR/BSR/BSRF (or equivalent)
/// control-flow subroutine event, on either CPU. Feeds both the
/// dedicated call trace (if armed) and the unified trace stream (if
/// armed) — the same dual-recorder fan-out the watchpoint engine uses
/// for its own event source.
pub fn on_call(state: &mut ControlState, cycle: u64, cpu: Cpu, caller_pc_minus_4: u32, target: u32) {
    if let Some(trace) = state.call_trace.as_mut() {
        trace.record(cycle, cpu, caller_pc_minus_4, target);
    }
    if let Some(unified) = state.unified_trace.as_mut() {
        unified.record_line(&unified_line(cycle, cpu, caller_pc_minus_4, target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_uppercase_tag_for_master_and_slave() {
        assert_eq!(
            unified_line(100, Cpu::Master, 0x1000, 0x2000),
            "100 M 0x00001000 0x00002000"
        );
        assert_eq!(
            unified_line(100, Cpu::Slave, 0x1000, 0x2000),
            "100 S 0x00001000 0x00002000"
        );
    }

    #[test]
    fn insn_event_uses_lowercase_tag() {
        assert_eq!(unified_insn_line(5, Cpu::Master, 0x900), "5 m pc=0x00000900");
    }

    #[test]
    fn on_call_fans_out_to_both_the_call_trace_and_the_unified_trace() {
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        st.call_trace = Some(CallTrace::open(dir.path().join("calls.txt")).unwrap());
        st.unified_trace = Some(crate::control::trace::UnifiedTrace::open(dir.path().join("unified.txt")).unwrap());

        on_call(&mut st, 42, Cpu::Master, 0x1000, 0x2000);

        let calls = std::fs::read_to_string(dir.path().join("calls.txt")).unwrap();
        assert_eq!(calls.trim(), "42 M 0x00001000 0x00002000");

        let unified = std::fs::read_to_string(dir.path().join("unified.txt")).unwrap();
        assert_eq!(unified.trim(), "42 M 0x00001000 0x00002000");
    }
}
