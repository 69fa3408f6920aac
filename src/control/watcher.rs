// Action-file watcher. stat(2) mtime only has second-level resolution
// over the filesystem bridge this protocol is designed to survive, so
// detection is content-based: read the whole file every poll, compare
// the first line (the header) byte-for-byte against the last accepted
// header. Any change, including whitespace-only padding after the
// sequence number, latches a new baseline and dispatches the remaining
// lines.

use crate::control::state::ControlState;

/// Result of one poll: either nothing changed, or a fresh batch of
/// command lines to dispatch (header already latched into `state`).
pub enum PollResult {
    Unchanged,
    NewCommands(Vec<String>),
}

/// Read the action file and decide whether it carries a new batch of
/// commands. Blank lines and lines starting with `#` (other than the
/// header) are ignored; trailing `\r` is stripped from every line.
pub fn poll(state: &mut ControlState) -> PollResult {
    let content = match std::fs::read_to_string(&state.action_path) {
        Ok(c) => c,
        Err(_) => return PollResult::Unchanged,
    };

    let mut lines = content.lines().map(strip_cr);
    let header = match lines.next() {
        Some(h) if h.starts_with('#') => h,
        _ => return PollResult::Unchanged,
    };

    if header == state.last_action_header {
        return PollResult::Unchanged;
    }
    state.last_action_header = header.to_string();

    let commands: Vec<String> = lines
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect();

    PollResult::NewCommands(commands)
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_action(path: &std::path::Path, content: &str) {
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn same_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();

        write_action(&st.action_path, "# 1\nstep 1\n");
        assert!(matches!(poll(&mut st), PollResult::NewCommands(_)));
        assert!(matches!(poll(&mut st), PollResult::Unchanged));
    }

    #[test]
    fn whitespace_only_padding_change_registers_as_new() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();

        write_action(&st.action_path, "# 1\nstep 1\n");
        poll(&mut st);

        write_action(&st.action_path, "# 1   \nstep 1\n");
        match poll(&mut st) {
            PollResult::NewCommands(cmds) => assert_eq!(cmds, vec!["step 1".to_string()]),
            PollResult::Unchanged => panic!("expected dispatch on padding-only header change"),
        }
    }

    #[test]
    fn blank_and_comment_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();

        write_action(&st.action_path, "# 1\n\n# a comment\nstatus\n\n");
        match poll(&mut st) {
            PollResult::NewCommands(cmds) => assert_eq!(cmds, vec!["status".to_string()]),
            PollResult::Unchanged => panic!("expected one command"),
        }
    }

    #[test]
    fn trailing_cr_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let mut st = ControlState::activate(dir.path(), Duration::from_millis(1)).unwrap();

        write_action(&st.action_path, "# 1\r\nstatus\r\n");
        match poll(&mut st) {
            PollResult::NewCommands(cmds) => assert_eq!(cmds, vec!["status".to_string()]),
            PollResult::Unchanged => panic!("expected one command"),
        }
    }
}
