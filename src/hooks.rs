// Trait boundary between the control plane and the emulator it drives.
//
// Everything in this file describes the *collaborator's* interface, not
// its implementation: SH-2 emulation, VDP2, SCU-DMA, and the CD Block are
// out of scope. A real mednafen-saturn core implements these traits
// against its own CPU/bus state; `stub_emu` provides a minimal stand-in
// so the control plane can be built, run, and tested standalone.

/// The 23 named SH-2 register values reported by `dump_regs`/`dump_slave_regs`.
/// Order matches the binary snapshot layout (minus MACL) plus MACL itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterBank {
    pub r: [u32; 16],
    pub pc: u32,
    pub sr: u32,
    pub pr: u32,
    pub gbr: u32,
    pub vbr: u32,
    pub mach: u32,
    pub macl: u32,
}

impl RegisterBank {
    /// The 22 little-endian u32 fields written by `dump_regs_bin`, in order.
    /// MACL is deliberately excluded.
    pub fn binary_fields(&self) -> [u32; 22] {
        let mut out = [0u32; 22];
        out[0..16].copy_from_slice(&self.r);
        out[16] = self.pc;
        out[17] = self.sr;
        out[18] = self.pr;
        out[19] = self.gbr;
        out[20] = self.vbr;
        out[21] = self.mach;
        out
    }
}

/// A read-only view onto the current framebuffer, handed to an external
/// PNG encoder. The control plane never decodes or touches pixel format;
/// it only forwards this view.
pub struct FramebufferView<'a> {
    pub width: u32,
    pub height: u32,
    /// Raw pixel bytes, format defined by the collaborator.
    pub data: &'a [u8],
}

/// The four hooks the control plane needs from the emulator: an
/// instruction-level callback, a memory-write callback, a frame
/// boundary tick, and read-only accessors. Modeled here as one trait the
/// control plane calls out to, the same shape as a single small trait
/// implemented once per hardware backend.
pub trait EmulatorHooks {
    /// Enable or disable the per-instruction callback. Called exactly by
    /// the hook activation manager (§4.J); steady-state cost when disabled
    /// must be a single flag check with no indirection into the control
    /// plane.
    fn enable_cpu_hook(&mut self, enabled: bool);

    /// Master CPU's free-running cycle counter, reported in every ack.
    fn cycle_count(&self) -> u64;

    /// The fetch PC: the address the fetch unit is currently reading,
    /// distinct from the decode PC passed into the instruction hook.
    fn master_pc(&self) -> u32;

    /// Master CPU register snapshot.
    fn master_regs(&self) -> RegisterBank;

    /// Slave CPU register snapshot.
    fn slave_regs(&self) -> RegisterBank;

    /// Cache-aware byte read: probes the SH-2 instruction cache (4-way,
    /// tag match) before falling back to backing RAM.
    fn read_byte(&self, addr: u32) -> u8;

    /// Raw VDP2 register block, layout defined by the collaborator.
    fn vdp2_regs(&self) -> Vec<u8>;

    /// Current framebuffer, if one is available to encode.
    fn framebuffer(&self) -> Option<FramebufferView<'_>>;

    /// OR additional pressed buttons into port 0's input word; other
    /// ports are untouched.
    fn apply_port0_override(&mut self, mask: u16);

    /// Install a fixed PRNG seed (forwarded, not interpreted).
    fn set_deterministic(&mut self);

    /// Reset the emulated machine.
    fn reset(&mut self);
}

/// Reason a write was observed by the watchpoint engine: which physical
/// path it arrived on. Both are wired to the same callback; this is
/// purely informational, never affects matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePath {
    CpuStore,
    ScuDma,
}

/// One observed 4-byte-aligned write, forwarded from either physical
/// path into the watchpoint engine.
#[derive(Debug, Clone, Copy)]
pub struct WriteEvent {
    pub pc: u32,
    pub pr: u32,
    pub addr: u32,
    pub old: u32,
    pub new: u32,
    pub path: WritePath,
}

/// The encoder the frame scheduler hands a framebuffer view to on
/// `screenshot`. PNG encoding is out of scope for the control plane: it
/// only sets/consumes the screenshot flag and hands the framebuffer
/// view to whatever implements this trait.
pub trait ScreenshotEncoder {
    fn encode(&self, view: FramebufferView<'_>, path: &std::path::Path) -> Result<(), String>;
}
