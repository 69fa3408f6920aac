// PC trace, per frame (spec §4.F). Raw little-endian u32 sequence of
// decode PCs for exactly one frame; auto-disarms at frame end. Buffered
// (not flush-on-write) since this is the highest-rate recorder.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::control::binfmt::push_u32_le;

pub struct PcFrameTrace {
    writer: BufWriter<File>,
    path: PathBuf,
    pub entries: u64,
}

impl PcFrameTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            entries: 0,
        })
    }

    pub fn record(&mut self, decode_pc: u32) {
        let mut buf = Vec::with_capacity(4);
        push_u32_le(&mut buf, decode_pc);
        if let Err(e) = self.writer.write_all(&buf) {
            eprintln!("[trace] pc_trace_frame write failed: {e}");
        }
        self.entries += 1;
    }

    pub fn close(mut self) {
        if let Err(e) = self.writer.flush() {
            eprintln!(
                "[trace] pc_trace_frame flush failed for {}: {e}",
                self.path.display()
            );
        }
    }
}
