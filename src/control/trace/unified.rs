// Unified trace (spec §4.F): merged call events (M/S), CD-block events
// (CMD/DRV/IRQ/BUF), and possibly instruction events (m/s), interleaved
// in emission order into a single text file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct UnifiedTrace {
    file: File,
    path: PathBuf,
}

impl UnifiedTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    /// Append one already-formatted event line (see `trace::call::unified_line`
    /// / `unified_insn_line`, or a CD-block event string).
    pub fn record_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.file, "{line}") {
            eprintln!(
                "[trace] unified_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}
