// Command parser. One command per line, whitespace separated tokens.
// Numeric arguments are decimal unless the command's schema marks them
// hexadecimal (addresses and ranges throughout the command vocabulary).

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Command {
    FrameAdvance(u64),
    RunToFrame(u64),
    Run,
    Pause,
    Quit,
    Reset,
    Help,
    Status,
    Input(String),
    InputRelease(String),
    InputClear,
    DumpRegs,
    DumpSlaveRegs,
    DumpRegsBin(PathBuf),
    DumpSlaveRegsBin(PathBuf),
    DumpMem { addr: u32, size: u32 },
    DumpMemBin { addr: u32, size: u32, path: PathBuf },
    DumpVdp2Regs(PathBuf),
    Screenshot(PathBuf),
    Step(u64),
    Breakpoint(u32),
    BreakpointClear,
    BreakpointList,
    Continue,
    DumpCycle,
    RunToCycle(u64),
    Deterministic,
    PcTraceFrame(PathBuf),
    CallTrace(PathBuf),
    CallTraceStop,
    InsnTrace { path: PathBuf, start: u64, stop: u64 },
    InsnTraceStop,
    InsnTraceUnified { start: u64, stop: u64 },
    UnifiedTrace(PathBuf),
    UnifiedTraceStop,
    ScdqTrace(PathBuf),
    ScdqTraceStop,
    CdbTrace(PathBuf),
    CdbTraceStop,
    InputTrace(PathBuf),
    InputTraceStop,
    Watchpoint(u32),
    WatchpointClear,
    Vdp2Watchpoint { lo: u32, hi: u32, path: PathBuf },
    Vdp2WatchpointClear,
    ShowWindow,
    HideWindow,
}

/// Either the token wasn't recognised at all (`error unknown command:
/// <tok>`), or it was recognised but failed schema validation
/// (`error <cmd>: <reason>`).
#[derive(Debug, Clone)]
pub enum ParseError {
    Unknown(String),
    Invalid { cmd: String, reason: String },
}

impl ParseError {
    pub fn into_message(self) -> String {
        match self {
            ParseError::Unknown(tok) => format!("unknown command: {tok}"),
            ParseError::Invalid { cmd, reason } => format!("{cmd}: {reason}"),
        }
    }
}

type R<T> = Result<T, ParseError>;

fn invalid(cmd: &str, reason: impl Into<String>) -> ParseError {
    ParseError::Invalid {
        cmd: cmd.to_string(),
        reason: reason.into(),
    }
}

/// Parse a decimal count argument, coercing a missing or non-positive
/// value to 1 rather than rejecting it.
fn parse_count(cmd: &str, tok: Option<&str>, default: u64) -> R<u64> {
    match tok {
        None => Ok(default),
        Some(s) => {
            if let Ok(n) = s.parse::<i64>() {
                Ok(n.max(1) as u64)
            } else {
                Err(invalid(cmd, format!("invalid count '{s}'")))
            }
        }
    }
}

fn parse_decimal_required(cmd: &str, tok: Option<&str>, what: &str) -> R<u64> {
    let s = tok.ok_or_else(|| invalid(cmd, format!("missing {what}")))?;
    s.parse::<u64>()
        .map_err(|_| invalid(cmd, format!("invalid {what} '{s}'")))
}

fn parse_hex_u32(cmd: &str, tok: Option<&str>, what: &str) -> R<u32> {
    let s = tok.ok_or_else(|| invalid(cmd, format!("missing {what}")))?;
    u32::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|_| invalid(cmd, format!("invalid {what} '{s}'")))
}

fn parse_path(cmd: &str, tok: Option<&str>) -> R<PathBuf> {
    let s = tok.ok_or_else(|| invalid(cmd, "missing path"))?;
    Ok(PathBuf::from(s))
}

/// Parse one already-tokenized command line. `line` has had its header
/// / comment / blank filtering done by the watcher already.
pub fn parse(line: &str) -> R<Command> {
    let mut toks = line.split_whitespace();
    let name = match toks.next() {
        Some(n) => n,
        None => return Err(ParseError::Unknown(String::new())),
    };

    let rest: Vec<&str> = toks.collect();
    let arg = |i: usize| rest.get(i).copied();

    match name {
        "frame_advance" => Ok(Command::FrameAdvance(parse_count(name, arg(0), 1)?)),
        "run_to_frame" => Ok(Command::RunToFrame(parse_decimal_required(name, arg(0), "target frame")?)),
        "run" => Ok(Command::Run),
        "pause" => Ok(Command::Pause),
        "quit" => Ok(Command::Quit),
        "reset" => Ok(Command::Reset),
        "help" => Ok(Command::Help),
        "status" => Ok(Command::Status),
        "input" => Ok(Command::Input(
            arg(0).ok_or_else(|| invalid(name, "missing button name"))?.to_string(),
        )),
        "input_release" => Ok(Command::InputRelease(
            arg(0).ok_or_else(|| invalid(name, "missing button name"))?.to_string(),
        )),
        "input_clear" => Ok(Command::InputClear),
        "dump_regs" => Ok(Command::DumpRegs),
        "dump_slave_regs" => Ok(Command::DumpSlaveRegs),
        "dump_regs_bin" => Ok(Command::DumpRegsBin(parse_path(name, arg(0))?)),
        "dump_slave_regs_bin" => Ok(Command::DumpSlaveRegsBin(parse_path(name, arg(0))?)),
        "dump_mem" => Ok(Command::DumpMem {
            addr: parse_hex_u32(name, arg(0), "address")?,
            size: parse_hex_u32(name, arg(1), "size")?,
        }),
        "dump_mem_bin" => Ok(Command::DumpMemBin {
            addr: parse_hex_u32(name, arg(0), "address")?,
            size: parse_hex_u32(name, arg(1), "size")?,
            path: parse_path(name, arg(2))?,
        }),
        "dump_vdp2_regs" => Ok(Command::DumpVdp2Regs(parse_path(name, arg(0))?)),
        "screenshot" => Ok(Command::Screenshot(parse_path(name, arg(0))?)),
        "step" => Ok(Command::Step(parse_count(name, arg(0), 1)?)),
        "breakpoint" => Ok(Command::Breakpoint(parse_hex_u32(name, arg(0), "address")?)),
        "breakpoint_clear" => Ok(Command::BreakpointClear),
        "breakpoint_list" => Ok(Command::BreakpointList),
        "continue" => Ok(Command::Continue),
        "dump_cycle" => Ok(Command::DumpCycle),
        "run_to_cycle" => Ok(Command::RunToCycle(parse_decimal_required(name, arg(0), "target cycle")?)),
        "deterministic" => Ok(Command::Deterministic),
        "pc_trace_frame" => Ok(Command::PcTraceFrame(parse_path(name, arg(0))?)),
        "call_trace" => Ok(Command::CallTrace(parse_path(name, arg(0))?)),
        "call_trace_stop" => Ok(Command::CallTraceStop),
        "insn_trace" => Ok(Command::InsnTrace {
            path: parse_path(name, arg(0))?,
            start: parse_decimal_required(name, arg(1), "start line")?,
            stop: parse_decimal_required(name, arg(2), "stop line")?,
        }),
        "insn_trace_stop" => Ok(Command::InsnTraceStop),
        "insn_trace_unified" => Ok(Command::InsnTraceUnified {
            start: parse_decimal_required(name, arg(0), "start line")?,
            stop: parse_decimal_required(name, arg(1), "stop line")?,
        }),
        "unified_trace" => Ok(Command::UnifiedTrace(parse_path(name, arg(0))?)),
        "unified_trace_stop" => Ok(Command::UnifiedTraceStop),
        "scdq_trace" => Ok(Command::ScdqTrace(parse_path(name, arg(0))?)),
        "scdq_trace_stop" => Ok(Command::ScdqTraceStop),
        "cdb_trace" => Ok(Command::CdbTrace(parse_path(name, arg(0))?)),
        "cdb_trace_stop" => Ok(Command::CdbTraceStop),
        "input_trace" => Ok(Command::InputTrace(parse_path(name, arg(0))?)),
        "input_trace_stop" => Ok(Command::InputTraceStop),
        "watchpoint" => Ok(Command::Watchpoint(parse_hex_u32(name, arg(0), "address")?)),
        "watchpoint_clear" => Ok(Command::WatchpointClear),
        "vdp2_watchpoint" => Ok(Command::Vdp2Watchpoint {
            lo: parse_hex_u32(name, arg(0), "low address")?,
            hi: parse_hex_u32(name, arg(1), "high address")?,
            path: parse_path(name, arg(2))?,
        }),
        "vdp2_watchpoint_clear" => Ok(Command::Vdp2WatchpointClear),
        "show_window" => Ok(Command::ShowWindow),
        "hide_window" => Ok(Command::HideWindow),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
