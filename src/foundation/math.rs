pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Quantize a unit-interval factor to 0..=255, clamping out-of-range and NaN input.
pub(crate) fn unit_to_u8(f: f32) -> u8 {
    if f.is_nan() {
        return 0;
    }
    (f.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Linear interpolation between two channel values, `a` at `t = 0` and `b` at `t = 255`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: u8) -> u8 {
    let t = u16::from(t);
    let inv = 255 - t;
    (mul_div255_u16(u16::from(a), inv) + mul_div255_u16(u16::from(b), t)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
