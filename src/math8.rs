/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Rescale a 0-255 value linearly onto the 0-`max` range, rounding to nearest
///
/// `rescale8(c, b) == round(c * b / 255)` for every input pair.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn rescale8(value: u8, max: u8) -> u8 {
    ((value as u32 * max as u32 + 127) / 255) as u8
}

/// Linear integer map of `x` from `in_min..in_max` onto `out_min..out_max`
///
/// Division truncates toward zero, so the result for negative spans matches
/// the classic microcontroller `map()` helper the sunrise curves are tuned for.
#[inline]
pub const fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Clamp a widened channel value back into 8 bits
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn clamp8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// Ease in quadratic, used for perceptual gradient falloff
#[inline]
pub const fn ease_in_quad(i: u8) -> u8 {
    scale8(i, i)
}
