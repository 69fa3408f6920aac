// Error handling. No typed error hierarchy: fallible operations return
// `Result<T, String>` and context is attached with `format!("{what}: {e}")`
// at the point of failure rather than via anyhow/thiserror.
//
// Three kinds of error can reach the orchestrator, all via an
// `error <cmd>: <reason>` ack:
// - Protocol: unknown command, missing argument, bad numeric literal
//   (`control::command::parse`).
// - Resource: a trace/snapshot file can't be opened or written, or the
//   screenshot encoder fails (`control::dispatch`).
// - Bounds: `dump_mem`/`dump_mem_bin` sizes are silently clamped, never
//   an error; negative `step`/`frame_advance` counts are coerced to 1.

/// Attach `what` as context to a displayable error, the same inline
/// `format!("...: {e}")` idiom used throughout `config.rs`.
pub fn context<E: std::fmt::Display>(what: &str, e: E) -> String {
    format!("{what}: {e}")
}
