use crate::error::ThreeDsError;

/// The only colour depths EMVCo 3DS 2.2.0 accepts for `browserColorDepth`.
pub const VALID_COLOR_DEPTHS: [i32; 8] = [1, 4, 8, 15, 16, 24, 32, 48];

/// Map a browser-reported colour depth onto the closest valid value that is
/// not greater than it.
///
/// Browsers on 10-bit displays report 30, which the directory server would
/// reject; it becomes 24. Anything above 48 clamps to 48.
pub fn normalize_color_depth(color_depth: i32) -> Result<i32, ThreeDsError> {
    if color_depth <= 0 {
        return Err(ThreeDsError::InvalidColorDepth(color_depth));
    }

    let normalized = VALID_COLOR_DEPTHS
        .iter()
        .rev()
        .find(|valid| **valid <= color_depth)
        .copied()
        .unwrap_or(VALID_COLOR_DEPTHS[0]);

    Ok(normalized)
}
