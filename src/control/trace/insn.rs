// Instruction trace, file variant (spec §4.F). Gated by a
// [start_line, stop_line] window over the unified line counter
// (`ControlState::line_counter`): every instruction-hook invocation
// advances the counter, but only invocations whose counter value falls
// inside the window are written.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::control::trace::call::Cpu;

pub struct InsnTrace {
    file: File,
    path: PathBuf,
    pub start_line: u64,
    pub stop_line: u64,
}

impl InsnTrace {
    pub fn open(path: impl AsRef<Path>, start_line: u64, stop_line: u64) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            file,
            path,
            start_line,
            stop_line,
        })
    }

    pub fn in_window(&self, line: u64) -> bool {
        line >= self.start_line && line <= self.stop_line
    }

    pub fn record(&mut self, line: u64, cycle: u64, cpu: Cpu, pc: u32) {
        let line_out = format!("{line} {cycle} {} pc={pc:#010x}\n", tag(cpu));
        if let Err(e) = self.file.write_all(line_out.as_bytes()) {
            eprintln!(
                "[trace] insn_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}

fn tag(cpu: Cpu) -> char {
    match cpu {
        Cpu::Master => 'm',
        Cpu::Slave => 's',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let t = InsnTrace::open(dir.path().join("t.txt"), 10, 20).unwrap();
        assert!(!t.in_window(9));
        assert!(t.in_window(10));
        assert!(t.in_window(20));
        assert!(!t.in_window(21));
    }
}
