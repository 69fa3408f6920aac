// Watchpoint engine (spec §4.G). Observes 4-byte writes on two
// independent physical paths (CPU store, SCU-DMA) and folds them into a
// single event stream. Non-blocking: the emulator never spin-waits on a
// hit. Formatting here is allocation-light on the single/range append
// paths to tolerate DMA write storms, per spec's tolerance note.

use std::io::Write;

use crate::control::ack;
use crate::control::state::{ControlState, Watchpoint};
use crate::hooks::{EmulatorHooks, WriteEvent};

/// Called from both the CPU-side store path and the SCU-DMA engine's
/// write path (spec §4.G) — same callback, different call sites in the
/// collaborator. Returns an ack line to emit for `Single` hits, or
/// `None` for `Range` hits (which only append to their log) or misses.
pub fn on_write(state: &mut ControlState, emu: &dyn EmulatorHooks, ev: WriteEvent) -> Option<String> {
    match &state.watchpoint {
        Watchpoint::Off => None,
        Watchpoint::Single(addr) => {
            if ev.addr != *addr {
                return None;
            }
            append_hit_log(state, ev);
            // `addr` intentionally omitted from the ack (spec §4.G).
            Some(format!(
                "hit watchpoint pc={:#010x} pr={:#010x} old={:#010x} new={:#010x} frame={}",
                ev.pc, ev.pr, ev.old, ev.new, state.frame_counter
            ))
        }
        Watchpoint::Range(lo, hi, _) => {
            if ev.addr < *lo || ev.addr > *hi {
                return None;
            }
            append_range_log(state, ev);
            let _ = emu; // range hits don't ack individually, no cycle/seq needed here
            None
        }
    }
}

fn append_hit_log(state: &mut ControlState, ev: WriteEvent) {
    if state.wp_log_file.is_none() {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&state.wp_log_path)
        {
            Ok(f) => state.wp_log_file = Some(f),
            Err(e) => {
                eprintln!(
                    "[wp] cannot open {}: {e}",
                    state.wp_log_path.display()
                );
                return;
            }
        }
    }

    if let Some(f) = state.wp_log_file.as_mut() {
        let line = format!(
            "pc={:#010x} pr={:#010x} addr={:#010x} old={:#010x} new={:#010x} frame={}\n",
            ev.pc, ev.pr, ev.addr, ev.old, ev.new, state.frame_counter
        );
        if let Err(e) = f.write_all(line.as_bytes()) {
            eprintln!("[wp] append failed: {e}");
        }
    }
}

fn append_range_log(state: &mut ControlState, ev: WriteEvent) {
    if state.range_log_file.is_none() {
        let log_path = match &state.watchpoint {
            Watchpoint::Range(_, _, path) => path.clone(),
            _ => return,
        };
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(f) => state.range_log_file = Some(f),
            Err(e) => {
                eprintln!("[wp] cannot open {}: {e}", log_path.display());
                return;
            }
        }
    }

    if let Some(f) = state.range_log_file.as_mut() {
        let line = format!(
            "pc={:#010x} pr={:#010x} addr={:#010x} old={:#010x} new={:#010x} frame={}\n",
            ev.pc, ev.pr, ev.addr, ev.old, ev.new, state.frame_counter
        );
        if let Err(e) = f.write_all(line.as_bytes()) {
            eprintln!("[wp] range append failed: {e}");
        }
    }
}

/// Emit the ack for a `Single` watchpoint hit, if any, through the usual
/// ack writer (keeps seq/cycle bookkeeping centralized in `ack::write`).
pub fn emit_hit_ack(state: &mut ControlState, emu: &dyn EmulatorHooks, ev: WriteEvent) {
    if let Some(msg) = on_write(state, emu, ev) {
        ack::write(state, emu, &msg);
    }
}
