//! 64-bit coverage masks over an 8×8 grid.
//!
//! Bit `row * 8 + column` covers one sub-cell. Row 0 is the bottom of the
//! tile (lowest y) and column 0 is the left edge (lowest x).

/// Tile side length in sub-cells.
pub const TILE_AXIS: u32 = 8;

/// Every sub-cell covered.
pub const FULL_MASK: u64 = u64::MAX;

/// No sub-cell covered.
pub const EMPTY_MASK: u64 = 0;

/// The bottom row of a mask.
pub const ROW_MASK: u64 = 0xFF;

/// Returns the single bit for sub-cell `(column, row)`.
#[inline]
#[must_use]
pub const fn bit(column: u32, row: u32) -> u64 {
    1u64 << (row * TILE_AXIS + column)
}

/// Repeats an 8-bit row pattern into all eight rows.
#[inline]
#[must_use]
pub const fn broadcast_row(row: u64) -> u64 {
    let mut mask = row & ROW_MASK;
    mask |= mask << 8;
    mask |= mask << 16;
    mask |= mask << 32;
    mask
}

/// Returns true if any sub-cell in rows above `row` is set.
#[inline]
#[must_use]
pub const fn any_above_row(mask: u64, row: u32) -> bool {
    let shift = (row + 1) * TILE_AXIS;
    shift < 64 && (mask >> shift) != 0
}

/// Renders a mask as eight lines of `#`/`.`, top row first.
#[must_use]
pub fn to_ascii(mask: u64) -> String {
    let mut out = String::with_capacity(72);
    for row in (0..TILE_AXIS).rev() {
        for column in 0..TILE_AXIS {
            out.push(if mask & bit(column, row) != 0 { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(bit(0, 0), 1);
        assert_eq!(bit(7, 0), 0x80);
        assert_eq!(bit(0, 1), 0x100);
        assert_eq!(bit(7, 7), 1 << 63);
    }

    #[test]
    fn test_broadcast_row() {
        assert_eq!(broadcast_row(0xFF), FULL_MASK);
        assert_eq!(broadcast_row(0x01), 0x0101_0101_0101_0101);
    }

    #[test]
    fn test_any_above_row() {
        assert!(any_above_row(bit(3, 5), 4));
        assert!(!any_above_row(bit(3, 5), 5));
        assert!(!any_above_row(FULL_MASK, 7));
    }

    #[test]
    fn test_ascii_top_row_first() {
        let art = to_ascii(bit(0, 7) | bit(7, 0));
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines[0], "#.......");
        assert_eq!(lines[7], ".......#");
    }
}
