// Ack writer. One response message per call, full-file truncation,
// `" cycle=<C> seq=<S>"` appended to every message. Must be callable
// safely from the frame tick, the command dispatcher, the instruction
// hook, and the watchpoint callback: it does nothing but a single
// `File::create` plus write, so there's no reentrancy hazard.

use std::io::Write;

use crate::control::state::ControlState;
use crate::hooks::EmulatorHooks;

/// Write `message` to the ack file, appending `cycle=` and the next
/// `seq=`. Returns the seq that was written, for callers (like
/// `frame_advance`) that need to report both the immediate and later seq.
pub fn write(state: &mut ControlState, emu: &dyn EmulatorHooks, message: &str) -> u64 {
    state.ack_seq += 1;
    let seq = state.ack_seq;
    let cycle = emu.cycle_count();
    let line = format!("{message} cycle={cycle} seq={seq}\n");

    match std::fs::File::create(&state.ack_path) {
        Ok(mut f) => {
            if let Err(e) = f.write_all(line.as_bytes()) {
                eprintln!("[ctrl] ack write failed: {e}");
            }
        }
        Err(e) => eprintln!("[ctrl] cannot open ack file {}: {e}", state.ack_path.display()),
    }

    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_emu::StubEmu;
    use std::time::Duration;

    #[test]
    fn seq_strictly_increases_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();
        let emu = StubEmu::new();

        let s1 = write(&mut st, &emu, "ok one");
        let s2 = write(&mut st, &emu, "ok two");
        assert!(s2 > s1);

        let content = std::fs::read_to_string(&st.ack_path).unwrap();
        assert!(content.starts_with("ok two"));
        assert!(content.contains(&format!("seq={s2}")));
        assert!(!content.contains("ok one"));
    }
}
