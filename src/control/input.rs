// Input injector. Additive button-state OR into emulated controller
// port 0.

use crate::control::state::ControlState;

/// Bit layout for the emulated 2-byte input word. Bit index 0 is the
/// LSB of byte 0.
pub fn button_bit(name: &str) -> Option<u16> {
    Some(match name.to_ascii_uppercase().as_str() {
        "Z" => 0,
        "Y" => 1,
        "X" => 2,
        "R" => 3,
        "UP" => 4,
        "DOWN" => 5,
        "LEFT" => 6,
        "RIGHT" => 7,
        "B" => 8,
        "C" => 9,
        "A" => 10,
        "START" => 11,
        "L" => 15,
        _ => return None,
    })
}

pub fn press(state: &mut ControlState, name: &str) -> Result<(), String> {
    let bit = button_bit(name).ok_or_else(|| format!("unknown button {name}"))?;
    state.input_mask |= 1 << bit;
    state.input_override = state.input_mask != 0;
    Ok(())
}

pub fn release(state: &mut ControlState, name: &str) -> Result<(), String> {
    let bit = button_bit(name).ok_or_else(|| format!("unknown button {name}"))?;
    state.input_mask &= !(1 << bit);
    state.input_override = state.input_mask != 0;
    Ok(())
}

pub fn clear(state: &mut ControlState) {
    state.input_mask = 0;
    state.input_override = false;
}
