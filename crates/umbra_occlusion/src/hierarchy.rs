//! # Occluder Hierarchy
//!
//! Accumulates the coverage of opaque polygons over a quad-tree of 8×8
//! tiles and answers whether a later polygon is still visible.
//!
//! ## Layout
//!
//! ```text
//! level 2 │ 512px tiles │ full / occupied bit per 64px child
//! level 1 │  64px tiles │ full / occupied bit per  8px child
//! level 0 │   8px tiles │ one bit per pixel
//! ```
//!
//! Coverage words live in one flat array per level, indexed by tile
//! coordinates. The traversal uses one [`Tile`] cursor per level; a child
//! cursor is seeded from its parent and then walked across the 64 children
//! in a serpentine order so every step is an incremental move.
//!
//! Coverage only grows until [`Occluder::reset`], which clears everything.

use tracing::debug;

use crate::config::OcclusionConfig;
use crate::error::OcclusionResult;
use crate::mask::{self, EMPTY_MASK, FULL_MASK, TILE_AXIS};
use crate::polygon::Polygon;
use crate::stats::OcclusionStats;
use crate::tile::{diameter_for_level, Tile, TileCoverage};

/// Coverage words for one level.
struct CoverageLevel {
    tiles_x: usize,
    tiles_y: usize,
    /// Leaf: covered pixels. Above: children that are entirely covered.
    full: Vec<u64>,
    /// Children with any coverage. Empty at the leaf.
    occupied: Vec<u64>,
}

impl CoverageLevel {
    fn new(tiles_x: usize, tiles_y: usize, leaf: bool) -> Self {
        let count = tiles_x * tiles_y;
        Self {
            tiles_x,
            tiles_y,
            full: vec![EMPTY_MASK; count],
            occupied: if leaf { Vec::new() } else { vec![EMPTY_MASK; count] },
        }
    }

    #[inline]
    fn index(&self, tx: usize, ty: usize) -> usize {
        debug_assert!(tx < self.tiles_x && ty < self.tiles_y);
        ty * self.tiles_x + tx
    }

    /// True if anything under the tile is covered.
    #[inline]
    fn is_occupied(&self, index: usize) -> bool {
        if self.occupied.is_empty() {
            self.full[index] != EMPTY_MASK
        } else {
            self.occupied[index] != EMPTY_MASK
        }
    }

    fn clear(&mut self) {
        self.full.fill(EMPTY_MASK);
        self.occupied.fill(EMPTY_MASK);
    }
}

/// Inclusive range of top-level tiles.
#[derive(Debug, Clone, Copy)]
struct TileRange {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Draw,
    Test,
}

/// Child visiting order: rows bottom to top, alternating direction.
#[inline]
const fn serpentine(i: u32) -> (u32, u32) {
    let row = i / TILE_AXIS;
    let step = i % TILE_AXIS;
    if row % 2 == 0 {
        (step, row)
    } else {
        (TILE_AXIS - 1 - step, row)
    }
}

/// Moves a child cursor from serpentine slot `next - 1` to slot `next`.
#[inline]
fn advance(cursor: &mut Tile, next: u32) {
    if next % TILE_AXIS == 0 {
        cursor.move_up();
    } else if (next / TILE_AXIS) % 2 == 0 {
        cursor.move_right();
    } else {
        cursor.move_left();
    }
}

/// Hierarchical coverage rasterizer.
///
/// # Thread Safety
///
/// Not shared across threads. Give each independent pass its own occluder.
pub struct Occluder {
    config: OcclusionConfig,
    /// Index 0 is the leaf level.
    levels: Vec<CoverageLevel>,
    /// One cursor per level, same indexing.
    cursors: Vec<Tile>,
    stats: OcclusionStats,
}

impl Occluder {
    /// Allocates every coverage word and cursor up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: OcclusionConfig) -> OcclusionResult<Self> {
        config.validate()?;

        let level_count = usize::from(config.levels);
        let mut levels = Vec::with_capacity(level_count);
        let mut cursors = Vec::with_capacity(level_count);
        for level in 0..level_count {
            let diameter = diameter_for_level(level) as usize;
            levels.push(CoverageLevel::new(
                config.width as usize / diameter,
                config.height as usize / diameter,
                level == 0,
            ));
            cursors.push(Tile::new(level));
        }

        debug!(
            width = config.width,
            height = config.height,
            levels = config.levels,
            "occluder allocated"
        );

        Ok(Self {
            config,
            levels,
            cursors,
            stats: OcclusionStats::default(),
        })
    }

    /// The configuration this occluder was built with.
    #[must_use]
    pub const fn config(&self) -> &OcclusionConfig {
        &self.config
    }

    /// Counters since the last reset.
    #[must_use]
    pub const fn stats(&self) -> OcclusionStats {
        self.stats
    }

    /// Clears all coverage and statistics.
    pub fn reset(&mut self) {
        debug!(
            occluders = self.stats.occluders_drawn,
            rejected = self.stats.occluders_rejected,
            queries = self.stats.queries,
            visible = self.stats.queries_visible,
            tiles = self.stats.tiles_visited,
            masks = self.stats.masks_built,
            "occluder reset"
        );

        for level in &mut self.levels {
            level.clear();
        }
        self.stats = OcclusionStats::default();
    }

    /// Rasterizes an opaque polygon into the coverage.
    ///
    /// Returns true if at least one pixel became covered.
    pub fn draw(&mut self, polygon: &Polygon) -> bool {
        self.stats.occluders_drawn += 1;

        let added = match self.top_range(polygon) {
            Some(range) => {
                self.load(polygon);
                self.scan(range, Pass::Draw)
            }
            None => false,
        };

        if !added {
            self.stats.occluders_rejected += 1;
        }
        added
    }

    /// Returns true if any pixel of the polygon is not yet covered.
    ///
    /// A polygon with no pixel on the raster is never visible.
    pub fn is_visible(&mut self, polygon: &Polygon) -> bool {
        self.stats.queries += 1;

        let visible = match self.top_range(polygon) {
            Some(range) => {
                self.load(polygon);
                self.scan(range, Pass::Test)
            }
            None => false,
        };

        if visible {
            self.stats.queries_visible += 1;
        }
        visible
    }

    /// Returns true if the pixel is covered. Pixels off the raster are not.
    #[must_use]
    pub fn is_covered(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.config.width || y as u32 >= self.config.height {
            return false;
        }

        let (x, y) = (x as usize, y as usize);
        for level in (0..self.levels.len()).rev() {
            let coverage = &self.levels[level];
            let diameter = diameter_for_level(level) as usize;
            let step = diameter / TILE_AXIS as usize;
            let index = coverage.index(x / diameter, y / diameter);
            let bit = mask::bit(((x % diameter) / step) as u32, ((y % diameter) / step) as u32);

            if coverage.full[index] & bit != 0 {
                return true;
            }
            if level == 0 || coverage.occupied[index] & bit == 0 {
                return false;
            }
        }
        false
    }

    /// Raw coverage word of a tile: covered pixels at the leaf, fully
    /// covered children above. `None` when out of range.
    #[must_use]
    pub fn tile_mask(&self, level: usize, tx: usize, ty: usize) -> Option<u64> {
        let coverage = self.levels.get(level)?;
        if tx >= coverage.tiles_x || ty >= coverage.tiles_y {
            return None;
        }
        Some(coverage.full[coverage.index(tx, ty)])
    }

    fn load(&mut self, polygon: &Polygon) {
        for cursor in &mut self.cursors {
            cursor.load(polygon);
        }
    }

    /// Top-level tiles touched by the polygon's bounds, clipped to the raster.
    fn top_range(&self, polygon: &Polygon) -> Option<TileRange> {
        let width = self.config.width as i32;
        let height = self.config.height as i32;
        let (min_x, min_y, max_x, max_y) = match polygon.bounds() {
            Some(b) => (b.min_x, b.min_y, b.max_x, b.max_y),
            None => (0, 0, width - 1, height - 1),
        };

        if max_x < 0 || max_y < 0 || min_x >= width || min_y >= height {
            return None;
        }

        let diameter = self.cursors[self.cursors.len() - 1].diameter();
        Some(TileRange {
            min_x: (min_x.max(0) / diameter) as usize,
            min_y: (min_y.max(0) / diameter) as usize,
            max_x: (max_x.min(width - 1) / diameter) as usize,
            max_y: (max_y.min(height - 1) / diameter) as usize,
        })
    }

    /// Walks the top-level tiles in raster order.
    fn scan(&mut self, range: TileRange, pass: Pass) -> bool {
        let top = self.levels.len() - 1;
        let diameter = self.cursors[top].diameter();
        self.cursors[top].move_to(range.min_x as i32 * diameter, range.min_y as i32 * diameter);

        let mut result = false;
        for ty in range.min_y..=range.max_y {
            self.cursors[top].push();
            for tx in range.min_x..=range.max_x {
                match pass {
                    Pass::Draw => result |= self.draw_tile(top, tx, ty),
                    Pass::Test => {
                        if self.test_tile(top, tx, ty) {
                            return true;
                        }
                    }
                }
                if tx < range.max_x {
                    self.cursors[top].move_right();
                }
            }
            self.cursors[top].pop();
            if ty < range.max_y {
                self.cursors[top].move_up();
            }
        }
        result
    }

    /// Seeds the cursor below `level` from the cursor at `level`.
    #[inline]
    fn descend(&mut self, level: usize) {
        let (lower, upper) = self.cursors.split_at_mut(level);
        lower[level - 1].update_from_parent(&upper[0]);
    }

    /// Draws into the tile under the cursor at `level`. Returns true if
    /// coverage grew.
    fn draw_tile(&mut self, level: usize, tx: usize, ty: usize) -> bool {
        let index = self.levels[level].index(tx, ty);
        if self.levels[level].full[index] == FULL_MASK {
            return false;
        }

        self.stats.tiles_visited += 1;
        match self.cursors[level].coverage() {
            TileCoverage::Empty => false,

            TileCoverage::Full => {
                let coverage = &mut self.levels[level];
                coverage.full[index] = FULL_MASK;
                if level > 0 {
                    coverage.occupied[index] = FULL_MASK;
                }
                true
            }

            TileCoverage::Partial(mask) => {
                self.stats.masks_built += 1;
                if level == 0 {
                    let word = &mut self.levels[0].full[index];
                    let before = *word;
                    *word |= mask;
                    *word != before
                } else {
                    self.draw_children(level, tx, ty, mask)
                }
            }
        }
    }

    fn draw_children(&mut self, level: usize, tx: usize, ty: usize, mask: u64) -> bool {
        let index = self.levels[level].index(tx, ty);
        let candidates = mask & !self.levels[level].full[index];
        if candidates == EMPTY_MASK {
            return false;
        }

        let child_level = level - 1;
        self.descend(level);

        let mut changed = false;
        for i in 0..64 {
            if i > 0 {
                advance(&mut self.cursors[child_level], i);
            }

            let (column, row) = serpentine(i);
            let bit = mask::bit(column, row);
            if candidates & bit != 0 {
                let cx = tx * 8 + column as usize;
                let cy = ty * 8 + row as usize;
                if self.draw_tile(child_level, cx, cy) {
                    changed = true;
                    self.absorb_child(level, index, child_level, cx, cy, bit);
                }
            }

            if i % TILE_AXIS == TILE_AXIS - 1 && !mask::any_above_row(candidates, row) {
                break;
            }
        }
        changed
    }

    /// Folds a child's coverage into its parent's full and occupied bits.
    fn absorb_child(&mut self, level: usize, index: usize, child_level: usize, cx: usize, cy: usize, bit: u64) {
        let child = &self.levels[child_level];
        let child_index = child.index(cx, cy);
        let child_full = child.full[child_index] == FULL_MASK;
        let child_occupied = child.is_occupied(child_index);

        let parent = &mut self.levels[level];
        if child_full {
            parent.full[index] |= bit;
        }
        if child_occupied {
            parent.occupied[index] |= bit;
        }
    }

    /// Tests the tile under the cursor at `level`. Returns true if some pixel
    /// of the polygon inside this tile is uncovered.
    fn test_tile(&mut self, level: usize, tx: usize, ty: usize) -> bool {
        let index = self.levels[level].index(tx, ty);
        let covered = self.levels[level].full[index];
        if covered == FULL_MASK {
            return false;
        }

        self.stats.tiles_visited += 1;
        match self.cursors[level].coverage() {
            TileCoverage::Empty => false,

            // the polygon owns the whole tile, so any gap is visible
            TileCoverage::Full => {
                level == 0
                    || !self.levels[level].is_occupied(index)
                    || self.test_children(level, tx, ty, FULL_MASK)
            }

            TileCoverage::Partial(mask) => {
                self.stats.masks_built += 1;
                if level == 0 {
                    mask & !covered != EMPTY_MASK
                } else {
                    self.test_children(level, tx, ty, mask)
                }
            }
        }
    }

    fn test_children(&mut self, level: usize, tx: usize, ty: usize, mask: u64) -> bool {
        let index = self.levels[level].index(tx, ty);
        let candidates = mask & !self.levels[level].full[index];
        if candidates == EMPTY_MASK {
            return false;
        }

        let child_level = level - 1;
        self.descend(level);

        for i in 0..64 {
            if i > 0 {
                advance(&mut self.cursors[child_level], i);
            }

            let (column, row) = serpentine(i);
            if candidates & mask::bit(column, row) != 0
                && self.test_tile(child_level, tx * 8 + column as usize, ty * 8 + row as usize)
            {
                return true;
            }

            if i % TILE_AXIS == TILE_AXIS - 1 && !mask::any_above_row(candidates, row) {
                break;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occluder(width: u32, height: u32, levels: u8) -> Occluder {
        Occluder::new(OcclusionConfig::new(width, height, levels).unwrap()).unwrap()
    }

    #[test]
    fn test_serpentine_order() {
        assert_eq!(serpentine(0), (0, 0));
        assert_eq!(serpentine(7), (7, 0));
        assert_eq!(serpentine(8), (7, 1));
        assert_eq!(serpentine(15), (0, 1));
        assert_eq!(serpentine(16), (0, 2));
        assert_eq!(serpentine(63), (0, 7));
    }

    #[test]
    fn test_advance_tracks_serpentine() {
        let mut cursor = Tile::new(0);
        cursor.move_to(0, 0);
        for i in 1..64 {
            advance(&mut cursor, i);
            let (column, row) = serpentine(i);
            assert_eq!((cursor.x(), cursor.y()), (column as i32 * 8, row as i32 * 8));
        }
    }

    #[test]
    fn test_full_tile_fill_short_circuits() {
        let mut occ = occluder(128, 128, 2);
        let square = Polygon::rectangle(0, 0, 70, 70).unwrap();
        assert!(occ.draw(&square));

        // top tile (0, 0) is inside every edge: filled without descending
        assert_eq!(occ.tile_mask(1, 0, 0), Some(FULL_MASK));
        assert_eq!(occ.tile_mask(0, 0, 0), Some(EMPTY_MASK));
        assert!(occ.is_covered(0, 0));
        assert!(occ.is_covered(70, 70));
        assert!(!occ.is_covered(71, 70));
    }

    #[test]
    fn test_redraw_adds_nothing() {
        let mut occ = occluder(128, 128, 2);
        let triangle = Polygon::from_vertices(&[[3, 3], [120, 10], [40, 100]]).unwrap();
        assert!(occ.draw(&triangle));
        assert!(!occ.draw(&triangle));
        assert_eq!(occ.stats().occluders_drawn, 2);
        assert_eq!(occ.stats().occluders_rejected, 1);
    }

    #[test]
    fn test_visibility_against_coverage() {
        let mut occ = occluder(256, 256, 2);
        let wall = Polygon::rectangle(10, 10, 200, 200).unwrap();
        assert!(occ.draw(&wall));

        let hidden = Polygon::from_vertices(&[[20, 20], [150, 30], [60, 190]]).unwrap();
        let peeking = Polygon::rectangle(190, 100, 201, 110).unwrap();
        let elsewhere = Polygon::rectangle(220, 220, 250, 250).unwrap();

        assert!(!occ.is_visible(&hidden));
        assert!(occ.is_visible(&peeking));
        assert!(occ.is_visible(&elsewhere));
        assert_eq!(occ.stats().queries, 3);
        assert_eq!(occ.stats().queries_visible, 2);
    }

    #[test]
    fn test_offscreen_polygons() {
        let mut occ = occluder(64, 64, 1);
        let away = Polygon::rectangle(100, 100, 140, 140).unwrap();
        assert!(!occ.draw(&away));
        assert!(!occ.is_visible(&away));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut occ = occluder(128, 64, 2);
        assert!(occ.draw(&Polygon::rectangle(0, 0, 127, 63).unwrap()));
        assert!(occ.is_covered(127, 63));

        occ.reset();
        assert!(!occ.is_covered(127, 63));
        assert_eq!(occ.stats(), OcclusionStats::default());
        assert!(occ.is_visible(&Polygon::rectangle(5, 5, 9, 9).unwrap()));
    }

    #[test]
    fn test_children_roll_up_to_full() {
        let mut occ = occluder(64, 64, 2);
        // two triangles sharing the diagonal cover the square exactly
        assert!(occ.draw(&Polygon::from_vertices(&[[0, 0], [63, 0], [63, 63]]).unwrap()));
        assert!(occ.draw(&Polygon::from_vertices(&[[0, 0], [63, 63], [0, 63]]).unwrap()));

        assert_eq!(occ.tile_mask(1, 0, 0), Some(FULL_MASK));
        assert!(!occ.is_visible(&Polygon::rectangle(0, 0, 63, 63).unwrap()));
    }
}
