//! # Tile Cursor
//!
//! A tile is an 8×8 grid of sub-cells at one level of the hierarchy. The
//! occluder keeps exactly one `Tile` per level and slides it around the
//! screen; tiles are never allocated per query.

use crate::edge::{Classification, Edge};
use crate::mask::{EMPTY_MASK, FULL_MASK};
use crate::polygon::Polygon;

/// Maximum number of edges a tile can test at once.
///
/// Large enough for a quad clipped against all four screen sides.
pub const MAX_EDGES: usize = 8;

/// Diameter in pixels of a tile at `level`, where level 0 is 8 pixels wide.
#[inline]
#[must_use]
pub const fn diameter_for_level(level: usize) -> i32 {
    8 << (3 * level)
}

/// Aggregate coverage of a tile by the loaded polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileCoverage {
    /// Outside at least one edge.
    Empty,
    /// Inside every edge.
    Full,
    /// Crossed by at least one edge; the AND of every crossing edge's mask.
    Partial(u64),
}

impl TileCoverage {
    /// The coverage as a 64-bit mask.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Empty => EMPTY_MASK,
            Self::Full => FULL_MASK,
            Self::Partial(mask) => mask,
        }
    }
}

/// Traversal cursor for one hierarchy level.
#[derive(Debug, Clone)]
pub struct Tile {
    level: usize,
    diameter: i32,
    x: i32,
    y: i32,
    saved_x: i32,
    saved_y: i32,
    edges: [Edge; MAX_EDGES],
    edge_count: usize,
}

impl Tile {
    /// Creates the cursor for `level`.
    #[must_use]
    pub fn new(level: usize) -> Self {
        let diameter = diameter_for_level(level);
        Self {
            level,
            diameter,
            x: 0,
            y: 0,
            saved_x: 0,
            saved_y: 0,
            edges: std::array::from_fn(|i| Edge::new(i as u8, diameter)),
            edge_count: 0,
        }
    }

    /// Hierarchy level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Side length in pixels. Always a power of two.
    #[inline]
    #[must_use]
    pub const fn diameter(&self) -> i32 {
        self.diameter
    }

    /// Pixels per sub-cell.
    #[inline]
    #[must_use]
    pub const fn step_size(&self) -> i32 {
        self.diameter / 8
    }

    /// Lower-left pixel x.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Lower-left pixel y.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Active edges.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges[..self.edge_count]
    }

    /// Installs the polygon's edges and invalidates every cursor.
    pub fn load(&mut self, polygon: &Polygon) {
        let functions = polygon.functions();
        debug_assert!(functions.len() <= MAX_EDGES);

        for (edge, function) in self.edges.iter_mut().zip(functions) {
            edge.set_function(*function);
            edge.prepare();
            edge.make_dirty();
        }
        self.edge_count = functions.len();
    }

    /// Jumps to an absolute lower-left pixel.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
        for edge in &mut self.edges[..self.edge_count] {
            edge.make_dirty();
        }
    }

    /// Moves one diameter toward +x.
    pub fn move_right(&mut self) {
        self.x += self.diameter;
        for edge in &mut self.edges[..self.edge_count] {
            edge.move_right();
        }
    }

    /// Moves one diameter toward -x.
    pub fn move_left(&mut self) {
        self.x -= self.diameter;
        for edge in &mut self.edges[..self.edge_count] {
            edge.move_left();
        }
    }

    /// Moves one diameter toward +y.
    pub fn move_up(&mut self) {
        self.y += self.diameter;
        for edge in &mut self.edges[..self.edge_count] {
            edge.move_up();
        }
    }

    /// Positions this tile on the lower-left child of `parent`.
    pub fn update_from_parent(&mut self, parent: &Self) {
        debug_assert_eq!(self.level + 1, parent.level);
        debug_assert_eq!(self.edge_count, parent.edge_count);

        self.x = parent.x;
        self.y = parent.y;
        for (edge, parent_edge) in self.edges[..self.edge_count]
            .iter_mut()
            .zip(&parent.edges[..parent.edge_count])
        {
            edge.update_from_parent(parent_edge);
        }
    }

    /// Saves the tile position and every edge cursor.
    pub fn push(&mut self) {
        self.saved_x = self.x;
        self.saved_y = self.y;
        for edge in &mut self.edges[..self.edge_count] {
            edge.push();
        }
    }

    /// Restores the state saved by the last [`Tile::push`].
    pub fn pop(&mut self) {
        self.x = self.saved_x;
        self.y = self.saved_y;
        for edge in &mut self.edges[..self.edge_count] {
            edge.pop();
        }
    }

    /// Classifies the tile against every edge and combines the result.
    ///
    /// Stops at the first edge reporting [`Classification::Outside`].
    pub fn coverage(&mut self) -> TileCoverage {
        let (x, y) = (self.x, self.y);
        let mut crossing: u8 = 0;

        for edge in &mut self.edges[..self.edge_count] {
            match edge.position(x, y) {
                Classification::Outside => return TileCoverage::Empty,
                Classification::Intersecting => crossing |= edge.flag(),
                Classification::Inside => {}
            }
        }

        if crossing == 0 {
            return TileCoverage::Full;
        }

        let mut mask = FULL_MASK;
        for edge in &self.edges[..self.edge_count] {
            if crossing & edge.flag() != 0 {
                mask &= edge.build_mask();
                if mask == EMPTY_MASK {
                    return TileCoverage::Empty;
                }
            }
        }

        TileCoverage::Partial(mask)
    }
}
