// Minimal stand-in collaborator used by the demo binary and by tests.
//
// This is NOT an SH-2/Saturn emulator and makes no attempt to be one.
// SH-2, VDP2, SCU-DMA and CD Block emulation are explicitly out of
// scope. It exists only to drive the control plane's hooks
// (instruction callback, memory-write callback, frame tick, read-only
// accessors) the way the real mednafen-saturn core would, so the
// control plane itself is buildable, runnable, and testable standalone.

use std::collections::HashMap;

use crate::hooks::{EmulatorHooks, FramebufferView, RegisterBank, ScreenshotEncoder};

pub struct StubEmu {
    cycle: u64,
    master: RegisterBank,
    slave: RegisterBank,
    memory: HashMap<u32, u8>,
    cpu_hook_installed: bool,
    port0_override: u16,
    vdp2_regs: Vec<u8>,
    framebuffer: Vec<u8>,
    fb_w: u32,
    fb_h: u32,
    deterministic: bool,
}

impl StubEmu {
    pub fn new() -> Self {
        Self {
            cycle: 0,
            master: RegisterBank::default(),
            slave: RegisterBank::default(),
            memory: HashMap::new(),
            cpu_hook_installed: false,
            port0_override: 0,
            vdp2_regs: vec![0u8; 0x200],
            framebuffer: vec![0u8; 4 * 4 * 4],
            fb_w: 4,
            fb_h: 4,
            deterministic: false,
        }
    }

    pub fn cpu_hook_installed(&self) -> bool {
        self.cpu_hook_installed
    }

    pub fn tick_cycles(&mut self, n: u64) {
        self.cycle += n;
    }

    pub fn set_master_pc(&mut self, pc: u32) {
        self.master.pc = pc;
    }

    pub fn set_cycle_count(&mut self, cycle: u64) {
        self.cycle = cycle;
    }

    pub fn write_byte(&mut self, addr: u32, val: u8) {
        self.memory.insert(addr, val);
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn port0_override(&self) -> u16 {
        self.port0_override
    }
}

impl Default for StubEmu {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorHooks for StubEmu {
    fn enable_cpu_hook(&mut self, enabled: bool) {
        self.cpu_hook_installed = enabled;
    }

    fn cycle_count(&self) -> u64 {
        self.cycle
    }

    fn master_pc(&self) -> u32 {
        self.master.pc
    }

    fn master_regs(&self) -> RegisterBank {
        self.master
    }

    fn slave_regs(&self) -> RegisterBank {
        self.slave
    }

    fn read_byte(&self, addr: u32) -> u8 {
        *self.memory.get(&addr).unwrap_or(&0)
    }

    fn vdp2_regs(&self) -> Vec<u8> {
        self.vdp2_regs.clone()
    }

    fn framebuffer(&self) -> Option<FramebufferView<'_>> {
        Some(FramebufferView {
            width: self.fb_w,
            height: self.fb_h,
            data: &self.framebuffer,
        })
    }

    fn apply_port0_override(&mut self, mask: u16) {
        self.port0_override = mask;
    }

    fn set_deterministic(&mut self) {
        self.deterministic = true;
    }

    fn reset(&mut self) {
        self.cycle = 0;
        self.master = RegisterBank::default();
        self.slave = RegisterBank::default();
    }
}

/// Writes the raw framebuffer bytes verbatim. Not a PNG encoder; real
/// image encoding is out of scope. Exists only so the demo binary and
/// tests can exercise the `screenshot` command end to end without a
/// real encoder wired in.
pub struct PlaceholderEncoder;

impl ScreenshotEncoder for PlaceholderEncoder {
    fn encode(&self, view: FramebufferView<'_>, path: &std::path::Path) -> Result<(), String> {
        std::fs::write(path, view.data).map_err(|e| format!("{e}"))
    }
}
