//! The data mask. Symbols produced here always use mask pattern 000, which is
//! also the pattern announced by the fixed format information.

pub const MASK_PATTERN: u8 = 0b000;

/// Masking condition of pattern 000 for the module in row `y`, column `x`:
/// modules where row + column is even are inverted.
pub fn mask_condition(x: u32, y: u32) -> bool {
    (x + y) % 2 == 0
}

/// Flip the bit if the mask bit is 1, leave it as is otherwise. This is equivalent
/// with a XOR between the mask and value bits, so applying it twice restores the bit.
pub fn apply_mask(bit: bool, x: u32, y: u32) -> bool {
    bit ^ mask_condition(x, y)
}
