// Little-endian binary encoding helpers. All binary artifacts the
// control plane emits are little-endian regardless of host endianness.

pub fn push_u32_le(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn push_u16_le(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_little_endian() {
        let mut buf = Vec::new();
        push_u32_le(&mut buf, 0x0102_0304);
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);

        let mut buf16 = Vec::new();
        push_u16_le(&mut buf16, 0xABCD);
        assert_eq!(buf16, vec![0xCD, 0xAB]);
    }
}
