// SCDQ trace and CD-Block trace (spec §4.F): driven by CD-Block event
// callbacks, opaque payload defined by the collaborator. Two
// independently armable text recorders with identical shape.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::control::state::ControlState;

/// CD-Block event kind, tagging lines merged into the unified trace
/// stream (spec §4.F: "CD-block events (CMD/DRV/IRQ/BUF)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdbEventKind {
    Cmd,
    Drv,
    Irq,
    Buf,
}

impl CdbEventKind {
    fn tag(self) -> &'static str {
        match self {
            CdbEventKind::Cmd => "CMD",
            CdbEventKind::Drv => "DRV",
            CdbEventKind::Irq => "IRQ",
            CdbEventKind::Buf => "BUF",
        }
    }
}

pub struct ScdqTrace {
    file: File,
    path: PathBuf,
}

impl ScdqTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn record(&mut self, payload: &str) {
        if let Err(e) = writeln!(self.file, "{payload}") {
            eprintln!(
                "[trace] scdq_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}

pub struct CdbTrace {
    file: File,
    path: PathBuf,
}

impl CdbTrace {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn record(&mut self, payload: &str) {
        if let Err(e) = writeln!(self.file, "{payload}") {
            eprintln!(
                "[trace] cdb_trace write failed for {}: {e}",
                self.path.display()
            );
        }
    }
}

/// Called by the CD-Block collaborator on each command/drive/IRQ/buffer
/// event. Feeds `cdb_trace` (if armed) and merges a `CMD`/`DRV`/`IRQ`/
/// `BUF`-tagged line into the unified trace (if armed), matching the
/// tag set spec §4.F documents for the unified stream.
pub fn on_cdb_event(state: &mut ControlState, kind: CdbEventKind, payload: &str) {
    let line = format!("{} {payload}", kind.tag());
    if let Some(trace) = state.cdb_trace.as_mut() {
        trace.record(&line);
    }
    if let Some(unified) = state.unified_trace.as_mut() {
        unified.record_line(&line);
    }
}

/// Called by the CD-Block collaborator's command-queue subsystem.
/// SCDQ traces are independent of the unified stream (spec §4.F lists
/// them as their own recorder, not a unified-stream contributor).
pub fn on_scdq_event(state: &mut ControlState, payload: &str) {
    if let Some(trace) = state.scdq_trace.as_mut() {
        trace.record(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cdb_event_tags_and_fans_out_to_unified() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        st.cdb_trace = Some(CdbTrace::open(dir.path().join("cdb.txt")).unwrap());
        st.unified_trace = Some(crate::control::trace::UnifiedTrace::open(dir.path().join("unified.txt")).unwrap());

        on_cdb_event(&mut st, CdbEventKind::Irq, "status=0x01");

        let cdb = std::fs::read_to_string(dir.path().join("cdb.txt")).unwrap();
        assert_eq!(cdb.trim(), "IRQ status=0x01");
        let unified = std::fs::read_to_string(dir.path().join("unified.txt")).unwrap();
        assert_eq!(unified.trim(), "IRQ status=0x01");
    }

    #[test]
    fn scdq_event_does_not_touch_the_unified_trace() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        st.scdq_trace = Some(ScdqTrace::open(dir.path().join("scdq.txt")).unwrap());
        st.unified_trace = Some(crate::control::trace::UnifiedTrace::open(dir.path().join("unified.txt")).unwrap());

        on_scdq_event(&mut st, "enqueue cmd=0x42");

        let scdq = std::fs::read_to_string(dir.path().join("scdq.txt")).unwrap();
        assert_eq!(scdq.trim(), "enqueue cmd=0x42");
        let unified = std::fs::read_to_string(dir.path().join("unified.txt")).unwrap();
        assert!(unified.is_empty());
    }
}
