// Input trace (spec §4.F): one event per line, driven by the input
// injector and system-command log calls, with the frame number.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct InputTrace {
    file: File,
    path: PathBuf,
}

impl InputTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn record(&mut self, frame: u64, event: &str) {
        if let Err(e) = writeln!(self.file, "frame={frame} {event}") {
            eprintln!(
                "[trace] input_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}
