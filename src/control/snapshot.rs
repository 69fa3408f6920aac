// Snapshot emitters: text and binary register/memory/VDP2 snapshots,
// plus the screenshot queue consumed by the frame scheduler.

use crate::control::binfmt::push_u32_le;
use crate::hooks::{EmulatorHooks, RegisterBank};

pub const DUMP_MEM_MAX: u64 = 64 * 1024;
pub const DUMP_MEM_BIN_MAX: u64 = 1024 * 1024;

/// Text representation of the 23 named values, used by `dump_regs` /
/// `dump_slave_regs`.
pub fn format_regs_text(regs: &RegisterBank) -> String {
    let mut out = String::new();
    for (i, r) in regs.r.iter().enumerate() {
        out.push_str(&format!("R{i}={r:#010x}\n"));
    }
    out.push_str(&format!("PC={:#010x}\n", regs.pc));
    out.push_str(&format!("SR={:#010x}\n", regs.sr));
    out.push_str(&format!("PR={:#010x}\n", regs.pr));
    out.push_str(&format!("GBR={:#010x}\n", regs.gbr));
    out.push_str(&format!("VBR={:#010x}\n", regs.vbr));
    out.push_str(&format!("MACH={:#010x}\n", regs.mach));
    out.push_str(&format!("MACL={:#010x}\n", regs.macl));
    out
}

/// 22 little-endian u32 values, R0-R15/PC/SR/PR/GBR/VBR/MACH. MACL is
/// deliberately omitted; existing consumers rely on this fixed 88-byte
/// layout.
pub fn encode_regs_bin(regs: &RegisterBank) -> Vec<u8> {
    let mut buf = Vec::with_capacity(22 * 4);
    for v in regs.binary_fields() {
        push_u32_le(&mut buf, v);
    }
    buf
}

/// Textual hex dump, 16 bytes/row, `size` clamped to 64 KiB.
pub fn dump_mem_text(emu: &dyn EmulatorHooks, addr: u32, size: u32) -> String {
    let clamped = (size as u64).min(DUMP_MEM_MAX) as u32;
    let mut out = format!("mem {addr:08x}\n");
    let mut i = 0u32;
    while i < clamped {
        out.push_str(&format!("{:08x}:", addr.wrapping_add(i)));
        for j in 0..16 {
            if i + j < clamped {
                out.push_str(&format!(" {:02x}", emu.read_byte(addr.wrapping_add(i + j))));
            }
        }
        out.push('\n');
        i += 16;
    }
    out
}

/// Raw bytes for `dump_mem_bin`, `size` clamped to 1 MiB.
pub fn dump_mem_bin(emu: &dyn EmulatorHooks, addr: u32, size: u32) -> Vec<u8> {
    let clamped = (size as u64).min(DUMP_MEM_BIN_MAX) as u32;
    (0..clamped)
        .map(|i| emu.read_byte(addr.wrapping_add(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs() -> RegisterBank {
        RegisterBank {
            r: [0; 16],
            pc: 0x0600_1234,
            sr: 1,
            pr: 2,
            gbr: 3,
            vbr: 4,
            mach: 5,
            macl: 0xDEAD_BEEF,
        }
    }

    #[test]
    fn binary_layout_is_22_fields_and_omits_macl() {
        let buf = encode_regs_bin(&regs());
        assert_eq!(buf.len(), 22 * 4);
        assert!(!buf.windows(4).any(|w| w == 0xDEAD_BEEFu32.to_le_bytes()));
    }

    #[test]
    fn text_dump_includes_all_23_named_fields() {
        let text = format_regs_text(&regs());
        for i in 0..16 {
            assert!(text.contains(&format!("R{i}=")));
        }
        for name in ["PC=", "SR=", "PR=", "GBR=", "VBR=", "MACH=", "MACL="] {
            assert!(text.contains(name), "missing {name}");
        }
    }

    #[test]
    fn dump_mem_size_is_clamped() {
        use crate::stub_emu::StubEmu;
        let emu = StubEmu::new();
        let buf = dump_mem_bin(&emu, 0, (DUMP_MEM_BIN_MAX * 4) as u32);
        assert_eq!(buf.len() as u64, DUMP_MEM_BIN_MAX);
    }
}
