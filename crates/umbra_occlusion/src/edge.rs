//! # Edge Functions
//!
//! One edge of a convex polygon expressed as the line equation
//! `a·x + b·y + c = 0` in integer, corner-oriented pixel coordinates.
//! Points where the function is `>= 0` are inside the edge.
//!
//! ## Classification without normalisation
//!
//! The signed distance from a point to the line is `(a·x + b·y + c) / m`
//! with `m = sqrt(a² + b²)`. A tile of side `span + 1` is fully outside the
//! edge when even its best corner is negative, which happens when the value
//! at its worst corner is below `-(|a| + |b|) · span`. Both sides of that
//! comparison share the denominator `m`, so the raw edge value `w` is compared
//! against the raw `extent = -(|a·span| + |b·span|)`:
//!
//! - `w < extent`: the whole tile is outside
//! - `w >= 0`: the whole tile is inside (or touching)
//! - otherwise: the edge crosses the tile
//!
//! `w` is always taken at the tile corner where the edge value is smallest.
//! Which corner that is depends only on the signs of `a` and `b`, captured by
//! [`EdgePosition`].
//!
//! ## Incremental cursor
//!
//! Each edge caches the edge value at its tile's lower-left pixel (the
//! *origin*) and its last classification. Moving the tile by one diameter adds
//! a constant to the origin, and the classification is only invalidated when
//! the move could actually change it.

use bytemuck::{Pod, Zeroable};

use crate::config::{MAX_LEVELS, MAX_RASTER_SIZE};
use crate::mask::{self, ROW_MASK, TILE_AXIS};
use crate::tile::diameter_for_level;

/// One top-level tile of slack around the largest raster. Traversal and
/// mask building never evaluate an edge outside this window.
const WINDOW_SLACK: i64 = diameter_for_level(MAX_LEVELS as usize - 1) as i64;
const WINDOW_MIN: i64 = -WINDOW_SLACK;
const WINDOW_MAX: i64 = MAX_RASTER_SIZE as i64 + WINDOW_SLACK;

/// Which side of the polygon an edge bounds.
///
/// The name is the side of the tile where the edge value is smallest, i.e.
/// the corner used for classification. `Top` means the polygon interior lies
/// below the edge (`b < 0`), `Left` means it lies to the right (`a > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgePosition {
    /// `a = 0, b < 0`.
    Top,
    /// `a = 0, b > 0`.
    Bottom,
    /// `a > 0, b = 0`.
    Left,
    /// `a < 0, b = 0`.
    Right,
    /// `a > 0, b < 0`.
    TopLeft,
    /// `a < 0, b < 0`.
    TopRight,
    /// `a > 0, b > 0`.
    BottomLeft,
    /// `a < 0, b > 0`.
    BottomRight,
}

impl EdgePosition {
    /// Resolves the position from the edge normal. `None` when `a = b = 0`.
    #[must_use]
    pub const fn from_normal(a: i32, b: i32) -> Option<Self> {
        match (a.signum(), b.signum()) {
            (0, -1) => Some(Self::Top),
            (0, 1) => Some(Self::Bottom),
            (1, 0) => Some(Self::Left),
            (-1, 0) => Some(Self::Right),
            (1, -1) => Some(Self::TopLeft),
            (-1, -1) => Some(Self::TopRight),
            (1, 1) => Some(Self::BottomLeft),
            (-1, 1) => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// Edge value grows toward +y.
    #[inline]
    #[must_use]
    pub const fn is_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Edge value shrinks toward +y.
    #[inline]
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    /// Edge value grows toward +x.
    #[inline]
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Edge value shrinks toward +x.
    #[inline]
    #[must_use]
    pub const fn is_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }
}

/// Raw `(a, b, c)` triple as handed over by the geometry collaborator.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct EdgeCoefficients {
    /// X coefficient.
    pub a: i32,
    /// Y coefficient.
    pub b: i32,
    /// Constant term.
    pub c: i32,
}

/// A validated edge equation. The normal `(a, b)` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeFunction {
    a: i32,
    b: i32,
    c: i32,
    position: EdgePosition,
}

impl EdgeFunction {
    /// Filler for unused edge slots. Never classified.
    pub(crate) const UNUSED: Self = Self {
        a: 1,
        b: 0,
        c: 0,
        position: EdgePosition::Left,
    };

    /// Creates an edge function, or `None` if `a = b = 0`.
    #[must_use]
    pub const fn new(a: i32, b: i32, c: i32) -> Option<Self> {
        match EdgePosition::from_normal(a, b) {
            Some(position) => Some(Self { a, b, c, position }),
            None => None,
        }
    }

    /// Creates an edge function from packed coefficients.
    #[must_use]
    pub const fn from_coefficients(coefficients: EdgeCoefficients) -> Option<Self> {
        Self::new(coefficients.a, coefficients.b, coefficients.c)
    }

    /// X coefficient.
    #[inline]
    #[must_use]
    pub const fn a(&self) -> i32 {
        self.a
    }

    /// Y coefficient.
    #[inline]
    #[must_use]
    pub const fn b(&self) -> i32 {
        self.b
    }

    /// Constant term.
    #[inline]
    #[must_use]
    pub const fn c(&self) -> i32 {
        self.c
    }

    /// Corner case governing classification.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> EdgePosition {
        self.position
    }

    /// Returns true if the edge value fits `i32` everywhere an occluder can
    /// evaluate it, and so do the per-tile span deltas.
    #[must_use]
    pub fn fits_raster(&self) -> bool {
        let (a, b, c) = (i64::from(self.a), i64::from(self.b), i64::from(self.c));
        let spans_fit = i32::try_from((a.abs() + b.abs()) * WINDOW_SLACK).is_ok();

        spans_fit
            && [
                (WINDOW_MIN, WINDOW_MIN),
                (WINDOW_MAX, WINDOW_MIN),
                (WINDOW_MIN, WINDOW_MAX),
                (WINDOW_MAX, WINDOW_MAX),
            ]
            .into_iter()
            .all(|(x, y)| i32::try_from(c + a * x + b * y).is_ok())
    }

    /// Evaluates `a·x + b·y + c`.
    #[inline]
    #[must_use]
    pub const fn evaluate(&self, x: i32, y: i32) -> i32 {
        self.c + self.a * x + self.b * y
    }
}

/// Where a tile lies relative to one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// No pixel of the tile is inside the edge.
    Outside,
    /// The edge crosses the tile.
    Intersecting,
    /// Every pixel of the tile is inside the edge.
    Inside,
}

/// Cursor state of an [`Edge`].
///
/// ```text
/// Dirty ──position()──▶ Known(_) ──move / update_from_parent──▶ Reclassify
///   ▲                      ▲                                       │
///   └── make_dirty()       └────────────── position() ─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeState {
    /// Origin value is stale; recompute from absolute coordinates.
    Dirty,
    /// Origin value is current; classification must be derived again.
    Reclassify,
    /// Classification is current.
    Known(Classification),
}

/// One edge slot of a tile cursor.
#[derive(Debug, Clone)]
pub struct Edge {
    ordinal: u8,
    step_size: i32,
    span_size: i32,
    function: EdgeFunction,

    // all values are full precision and corner-oriented
    step_a: i32,
    step_b: i32,
    span_a: i32,
    span_b: i32,
    jump_a: i32,
    jump_b: i32,
    extent: i32,

    origin: i32,
    state: EdgeState,

    saved_origin: i32,
    saved_state: EdgeState,
}

impl Edge {
    /// Creates the edge slot `ordinal` for a tile of the given diameter.
    ///
    /// # Panics
    ///
    /// Debug builds panic if the diameter is not a power of two of at least 8,
    /// or if the ordinal does not fit an 8-bit edge flag.
    #[must_use]
    pub fn new(ordinal: u8, diameter: i32) -> Self {
        debug_assert!(ordinal < 8, "edge ordinal {ordinal} out of range");
        debug_assert!(
            diameter >= 8 && (diameter & (diameter - 1)) == 0,
            "tile diameter {diameter} must be a power of two >= 8"
        );

        let mut edge = Self {
            ordinal,
            step_size: diameter / 8,
            span_size: diameter - 1,
            function: EdgeFunction::UNUSED,
            step_a: 0,
            step_b: 0,
            span_a: 0,
            span_b: 0,
            jump_a: 0,
            jump_b: 0,
            extent: 0,
            origin: 0,
            state: EdgeState::Dirty,
            saved_origin: 0,
            saved_state: EdgeState::Dirty,
        };
        edge.prepare();
        edge
    }

    /// Index of this edge within its tile.
    #[inline]
    #[must_use]
    pub const fn ordinal(&self) -> u8 {
        self.ordinal
    }

    /// `1 << ordinal`.
    #[inline]
    #[must_use]
    pub const fn flag(&self) -> u8 {
        1 << self.ordinal
    }

    /// Installs a new line equation. Call [`Edge::prepare`] and
    /// [`Edge::make_dirty`] before classifying again.
    #[inline]
    pub fn set_function(&mut self, function: EdgeFunction) {
        self.function = function;
    }

    /// The current line equation.
    #[inline]
    #[must_use]
    pub const fn function(&self) -> EdgeFunction {
        self.function
    }

    /// X coefficient.
    #[inline]
    #[must_use]
    pub const fn a(&self) -> i32 {
        self.function.a
    }

    /// Y coefficient.
    #[inline]
    #[must_use]
    pub const fn b(&self) -> i32 {
        self.function.b
    }

    /// Constant term.
    #[inline]
    #[must_use]
    pub const fn c(&self) -> i32 {
        self.function.c
    }

    /// Corner case governing classification and mask construction.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> EdgePosition {
        self.function.position
    }

    /// Outside threshold. Always `<= 0`.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> i32 {
        self.extent
    }

    /// Edge value at the tile's lower-left pixel, as last computed or moved.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> i32 {
        self.origin
    }

    /// Cursor state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> EdgeState {
        self.state
    }

    /// Recomputes the step, span and extent constants from `(a, b)`.
    pub fn prepare(&mut self) {
        let a = self.function.a;
        let b = self.function.b;
        self.step_a = a * self.step_size;
        self.step_b = b * self.step_size;
        self.span_a = a * self.span_size;
        self.span_b = b * self.span_size;
        self.jump_a = a + self.span_a;
        self.jump_b = b + self.span_b;
        self.extent = -self.span_a.abs() - self.span_b.abs();
    }

    /// Evaluates the edge function at an absolute pixel coordinate.
    #[inline]
    #[must_use]
    pub const fn compute(&self, x: i32, y: i32) -> i32 {
        self.function.evaluate(x, y)
    }

    /// Forces recomputation from absolute coordinates on the next query.
    #[inline]
    pub fn make_dirty(&mut self) {
        self.state = EdgeState::Dirty;
    }

    /// Saves the cursor.
    #[inline]
    pub fn push(&mut self) {
        self.saved_origin = self.origin;
        self.saved_state = self.state;
    }

    /// Restores the cursor saved by the last [`Edge::push`].
    #[inline]
    pub fn pop(&mut self) {
        self.origin = self.saved_origin;
        self.state = self.saved_state;
    }

    /// Classifies the tile whose lower-left pixel is `(x, y)`.
    ///
    /// The coordinates are only read when the edge is dirty; otherwise the
    /// incrementally maintained origin value is used.
    #[inline]
    pub fn position(&mut self, x: i32, y: i32) -> Classification {
        match self.state {
            EdgeState::Known(classification) => classification,
            EdgeState::Reclassify => self.classify(),
            EdgeState::Dirty => {
                self.origin = self.compute(x, y);
                self.classify()
            }
        }
    }

    /// Edge value at the tile corner where the edge is smallest.
    #[inline]
    const fn governing_value(&self) -> i32 {
        match self.function.position {
            EdgePosition::Top | EdgePosition::TopLeft => self.origin + self.span_b,
            EdgePosition::Left | EdgePosition::BottomLeft | EdgePosition::Bottom => self.origin,
            EdgePosition::TopRight => self.origin + self.span_a + self.span_b,
            EdgePosition::Right | EdgePosition::BottomRight => self.origin + self.span_a,
        }
    }

    fn classify(&mut self) -> Classification {
        let w = self.governing_value();

        // extent is never positive, so the bands are disjoint
        let classification = if w < self.extent {
            Classification::Outside
        } else if w >= 0 {
            Classification::Inside
        } else {
            Classification::Intersecting
        };

        self.state = EdgeState::Known(classification);
        classification
    }

    /// Moves the cursor one tile toward +x.
    pub fn move_right(&mut self) {
        if self.state == EdgeState::Dirty {
            return;
        }

        self.origin += self.jump_a;
        let pos = self.function.position;

        if pos.is_right() {
            if self.state != EdgeState::Known(Classification::Outside) {
                self.state = EdgeState::Reclassify;
            }
        } else if pos.is_left() && self.state != EdgeState::Known(Classification::Inside) {
            self.state = EdgeState::Reclassify;
        }
    }

    /// Moves the cursor one tile toward -x.
    pub fn move_left(&mut self) {
        if self.state == EdgeState::Dirty {
            return;
        }

        self.origin -= self.jump_a;
        let pos = self.function.position;

        if pos.is_left() {
            if self.state != EdgeState::Known(Classification::Outside) {
                self.state = EdgeState::Reclassify;
            }
        } else if pos.is_right() && self.state != EdgeState::Known(Classification::Inside) {
            self.state = EdgeState::Reclassify;
        }
    }

    /// Moves the cursor one tile toward +y.
    pub fn move_up(&mut self) {
        if self.state == EdgeState::Dirty {
            return;
        }

        self.origin += self.jump_b;
        let pos = self.function.position;

        if pos.is_top() {
            if self.state != EdgeState::Known(Classification::Outside) {
                self.state = EdgeState::Reclassify;
            }
        } else if pos.is_bottom() && self.state != EdgeState::Known(Classification::Inside) {
            self.state = EdgeState::Reclassify;
        }
    }

    /// Adopts the cursor of the same edge one level up.
    ///
    /// The child starts at the parent's lower-left pixel, so the origin value
    /// carries over. The classification does not: the child is smaller.
    pub fn update_from_parent(&mut self, parent: &Self) {
        if parent.state == EdgeState::Dirty {
            self.state = EdgeState::Dirty;
        } else {
            self.origin = parent.origin;
            self.state = EdgeState::Reclassify;
        }
    }

    /// Builds the 8×8 coverage mask of an intersecting edge.
    ///
    /// Sub-cell `(column, row)` is set when the edge's maximum over that
    /// sub-cell's pixels is `>= 0`. On an 8-pixel tile each sub-cell is a
    /// single pixel, so the result is exact point sampling.
    #[must_use]
    pub fn build_mask(&self) -> u64 {
        debug_assert_eq!(
            self.state,
            EdgeState::Known(Classification::Intersecting),
            "mask requested for an edge that does not cross its tile"
        );

        let a = self.step_a;
        let b = self.step_b;

        match self.function.position {
            EdgePosition::Top => {
                // bottom row is the best row
                debug_assert!(b < 0);
                rows_upward(self.origin, b, |_| ROW_MASK)
            }

            EdgePosition::Bottom => {
                debug_assert!(b > 0);
                rows_downward(self.origin + self.span_b, b, |_| ROW_MASK)
            }

            EdgePosition::Right => {
                debug_assert!(a < 0);
                mask::broadcast_row(columns_through(self.origin, -a))
            }

            EdgePosition::Left => {
                debug_assert!(a > 0);
                mask::broadcast_row(columns_from(self.origin + self.span_a, a))
            }

            EdgePosition::TopLeft => {
                // best pixel of each row sits on the right
                debug_assert!(a > 0 && b < 0);
                rows_upward(self.origin + self.span_a, b, |w| columns_from(w, a))
            }

            EdgePosition::BottomLeft => {
                debug_assert!(a > 0 && b > 0);
                rows_downward(self.origin + self.span_a + self.span_b, b, |w| columns_from(w, a))
            }

            EdgePosition::TopRight => {
                debug_assert!(a < 0 && b < 0);
                rows_upward(self.origin, b, |w| columns_through(w, -a))
            }

            EdgePosition::BottomRight => {
                debug_assert!(a < 0 && b > 0);
                rows_downward(self.origin + self.span_b, b, |w| columns_through(w, -a))
            }
        }
    }
}

/// Row bits for columns `first..=7`, where `w >= 0` is the value at the best
/// (rightmost) sub-cell and `step > 0` is lost per column moving left.
#[inline]
fn columns_from(w: i32, step: i32) -> u64 {
    let first = 7 - (w / step).min(7);
    (ROW_MASK << first) & ROW_MASK
}

/// Row bits for columns `0..=last`, where `w >= 0` is the value at the best
/// (leftmost) sub-cell and `step > 0` is lost per column moving right.
#[inline]
fn columns_through(w: i32, step: i32) -> u64 {
    let last = (w / step).min(7);
    ROW_MASK >> (7 - last)
}

/// Fills rows from the bottom while the row's best value stays `>= 0`.
/// `dw` is negative: the edge gets worse going up.
#[inline]
fn rows_upward(mut w: i32, dw: i32, row_bits: impl Fn(i32) -> u64) -> u64 {
    debug_assert!(w >= 0);
    let mut mask = 0;
    let mut row = 0;
    while row < TILE_AXIS && w >= 0 {
        mask |= row_bits(w) << (row * TILE_AXIS);
        w += dw;
        row += 1;
    }
    mask
}

/// Fills rows from the top while the row's best value stays `>= 0`.
/// `dw` is positive: the edge gets worse going down.
#[inline]
fn rows_downward(mut w: i32, dw: i32, row_bits: impl Fn(i32) -> u64) -> u64 {
    debug_assert!(w >= 0);
    let mut mask = 0;
    let mut row = TILE_AXIS;
    while row > 0 && w >= 0 {
        row -= 1;
        mask |= row_bits(w) << (row * TILE_AXIS);
        w -= dw;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{bit, FULL_MASK};

    fn edge(a: i32, b: i32, c: i32, diameter: i32) -> Edge {
        let mut edge = Edge::new(0, diameter);
        edge.set_function(EdgeFunction::new(a, b, c).unwrap());
        edge.prepare();
        edge.make_dirty();
        edge
    }

    /// Per-sub-cell reference: edge maximum over the sub-cell's pixels.
    fn reference_mask(f: EdgeFunction, x: i32, y: i32, diameter: i32) -> u64 {
        let step = diameter / 8;
        let mut mask = 0;
        for row in 0..8u32 {
            for column in 0..8u32 {
                let x0 = x + column as i32 * step;
                let y0 = y + row as i32 * step;
                let corners = [
                    f.evaluate(x0, y0),
                    f.evaluate(x0 + step - 1, y0),
                    f.evaluate(x0, y0 + step - 1),
                    f.evaluate(x0 + step - 1, y0 + step - 1),
                ];
                if corners.iter().copied().max().unwrap() >= 0 {
                    mask |= bit(column, row);
                }
            }
        }
        mask
    }

    #[test]
    fn test_position_table() {
        assert_eq!(EdgePosition::from_normal(0, -1), Some(EdgePosition::Top));
        assert_eq!(EdgePosition::from_normal(0, 5), Some(EdgePosition::Bottom));
        assert_eq!(EdgePosition::from_normal(3, 0), Some(EdgePosition::Left));
        assert_eq!(EdgePosition::from_normal(-3, 0), Some(EdgePosition::Right));
        assert_eq!(EdgePosition::from_normal(2, -7), Some(EdgePosition::TopLeft));
        assert_eq!(EdgePosition::from_normal(-2, -7), Some(EdgePosition::TopRight));
        assert_eq!(EdgePosition::from_normal(2, 7), Some(EdgePosition::BottomLeft));
        assert_eq!(EdgePosition::from_normal(-2, 7), Some(EdgePosition::BottomRight));
        assert_eq!(EdgePosition::from_normal(0, 0), None);
        assert!(EdgeFunction::new(0, 0, 5).is_none());
    }

    #[test]
    fn test_governing_corner_is_minimum() {
        for a in -3..=3 {
            for b in -3..=3 {
                if a == 0 && b == 0 {
                    continue;
                }
                let mut e = edge(a, b, 17, 64);
                let _ = e.position(128, 64);
                let corners = [
                    e.compute(128, 64),
                    e.compute(128 + 63, 64),
                    e.compute(128, 64 + 63),
                    e.compute(128 + 63, 64 + 63),
                ];
                let min = corners.iter().copied().min().unwrap();
                assert_eq!(e.governing_value(), min, "a={a} b={b}");
            }
        }
    }

    #[test]
    fn test_reference_scenario() {
        let mut e = edge(4, -3, 12, 64);
        assert_eq!(e.extent(), -441);
        assert_eq!(e.pos(), EdgePosition::TopLeft);
        assert_eq!(e.compute(0, 0), 12);

        // governing corner is top-left: 12 + (-3 * 63) = -177
        assert_eq!(e.position(0, 0), Classification::Intersecting);
        assert_eq!(e.origin(), 12);
        assert_eq!(e.governing_value(), -177);
    }

    #[test]
    fn test_extent_never_positive() {
        for (a, b) in [(1, 0), (0, -1), (-9, 4), (100, -100), (7, 7)] {
            for diameter in [8, 64, 512] {
                let e = edge(a, b, 0, diameter);
                assert!(e.extent() <= 0);
            }
        }
    }

    #[test]
    fn test_fits_raster_window() {
        assert!(EdgeFunction::new(1, -1, 0).unwrap().fits_raster());
        assert!(EdgeFunction::new(-20_000, -10_000, 100_000_000).unwrap().fits_raster());

        // huge constant overflows at the window corners
        assert!(!EdgeFunction::new(1, 0, i32::MAX).unwrap().fits_raster());
        assert!(!EdgeFunction::new(0, -1, i32::MIN).unwrap().fits_raster());
        // steep normal overflows the far side of the raster
        assert!(!EdgeFunction::new(300_000, 0, 0).unwrap().fits_raster());
    }

    #[test]
    fn test_classification_bands() {
        // vertical edge x = 20, interior to the right
        let mut e = edge(1, 0, -20, 8);
        assert_eq!(e.position(0, 0), Classification::Outside);
        e.make_dirty();
        assert_eq!(e.position(16, 0), Classification::Intersecting);
        e.make_dirty();
        assert_eq!(e.position(20, 0), Classification::Inside);
        e.make_dirty();
        // pixels 13..=20: only the last touches
        assert_eq!(e.position(13, 0), Classification::Intersecting);
        e.make_dirty();
        assert_eq!(e.position(12, 0), Classification::Outside);
    }

    #[test]
    fn test_masks_match_reference_for_every_case() {
        let normals = [(0, -3), (0, 3), (3, 0), (-3, 0), (2, -5), (-2, -5), (2, 5), (-5, 2)];
        for (a, b) in normals {
            for diameter in [8, 64] {
                for c in -900..900 {
                    let mut e = edge(a, b, c, diameter);
                    if e.position(0, 0) != Classification::Intersecting {
                        continue;
                    }
                    let expected = reference_mask(e.function(), 0, 0, diameter);
                    let built = e.build_mask();
                    assert_eq!(
                        built,
                        expected,
                        "a={a} b={b} c={c} d={diameter}\nbuilt:\n{}expected:\n{}",
                        mask::to_ascii(built),
                        mask::to_ascii(expected)
                    );
                }
            }
        }
    }

    #[test]
    fn test_intersecting_mask_is_never_empty_or_full_at_leaf() {
        let mut e = edge(3, -2, 5, 8);
        assert_eq!(e.position(0, 0), Classification::Intersecting);
        let built = e.build_mask();
        assert_ne!(built, 0);
        assert_ne!(built, FULL_MASK);
    }

    #[test]
    fn test_move_keeps_inside_when_moving_inward() {
        // interior to the right, tile well inside
        let mut e = edge(1, 0, 0, 8);
        assert_eq!(e.position(8, 0), Classification::Inside);
        e.move_right();
        assert_eq!(e.state(), EdgeState::Known(Classification::Inside));
        e.move_left();
        assert_eq!(e.state(), EdgeState::Reclassify);
        assert_eq!(e.position(8, 0), Classification::Inside);
    }

    #[test]
    fn test_move_keeps_outside_when_moving_outward() {
        // interior to the left of x = 0
        let mut e = edge(-1, 0, 0, 8);
        assert_eq!(e.position(16, 0), Classification::Outside);
        e.move_right();
        assert_eq!(e.state(), EdgeState::Known(Classification::Outside));
    }

    #[test]
    fn test_parallel_move_keeps_classification() {
        // horizontal edge: moving along x never changes anything
        let mut e = edge(0, 1, -4, 8);
        let first = e.position(0, 0);
        e.move_right();
        e.move_right();
        e.move_left();
        assert_eq!(e.state(), EdgeState::Known(first));
    }

    #[test]
    fn test_dirty_moves_are_noops() {
        let mut e = edge(2, 3, 1, 8);
        e.move_right();
        e.move_up();
        assert_eq!(e.state(), EdgeState::Dirty);
        assert_eq!(e.position(8, 8), {
            let mut fresh = edge(2, 3, 1, 8);
            fresh.position(8, 8)
        });
    }

    #[test]
    fn test_push_pop_round_trip() {
        let mut e = edge(-3, 2, 40, 64);
        let _ = e.position(0, 0);
        let (origin, state) = (e.origin(), e.state());

        e.push();
        e.move_right();
        e.move_up();
        e.move_up();
        let _ = e.position(64, 128);
        e.pop();

        assert_eq!(e.origin(), origin);
        assert_eq!(e.state(), state);
    }

    #[test]
    fn test_update_from_parent() {
        let mut parent = edge(5, -2, 30, 64);
        let mut child = edge(5, -2, 30, 8);

        child.update_from_parent(&parent);
        assert_eq!(child.state(), EdgeState::Dirty);

        let _ = parent.position(0, 0);
        child.update_from_parent(&parent);
        assert_eq!(child.state(), EdgeState::Reclassify);
        assert_eq!(child.origin(), parent.origin());
    }
}
