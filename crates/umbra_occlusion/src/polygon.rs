//! # Polygon Input
//!
//! Convex polygons already projected and quantized to integer pixel space.
//! A pixel `(x, y)` belongs to the polygon when every edge function is
//! `>= 0` at that integer point.

use crate::edge::{EdgeCoefficients, EdgeFunction};
use crate::error::{OcclusionError, OcclusionResult};
use crate::tile::MAX_EDGES;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelBounds {
    /// Leftmost pixel.
    pub min_x: i32,
    /// Bottom pixel.
    pub min_y: i32,
    /// Rightmost pixel.
    pub max_x: i32,
    /// Top pixel.
    pub max_y: i32,
}

impl PixelBounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Returns true if the pixel lies within the bounds.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// A convex polygon as a fixed set of edge functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    functions: [EdgeFunction; MAX_EDGES],
    len: usize,
    bounds: Option<PixelBounds>,
}

impl Polygon {
    /// Builds a polygon from convex vertices in either winding order.
    ///
    /// Repeated consecutive vertices are dropped, as are trailing copies of
    /// the first vertex (closed outlines). The pixel bounds are the vertex
    /// bounds.
    ///
    /// # Errors
    ///
    /// Fails for fewer than three distinct vertices, more than
    /// [`MAX_EDGES`] vertices, zero area, non-convex input or edges whose
    /// values would overflow on the largest supported raster.
    pub fn from_vertices(vertices: &[[i32; 2]]) -> OcclusionResult<Self> {
        let mut input = vertices;
        while let [first, .., last] = input {
            if first != last {
                break;
            }
            input = &input[..input.len() - 1];
        }

        let mut points = [[0i32; 2]; MAX_EDGES];
        let mut count = 0;
        for &vertex in input {
            if count > 0 && points[count - 1] == vertex {
                continue;
            }
            if count == MAX_EDGES {
                return Err(OcclusionError::TooManyEdges {
                    count: input.len(),
                    max: MAX_EDGES,
                });
            }
            points[count] = vertex;
            count += 1;
        }
        if count < 3 {
            return Err(OcclusionError::TooFewVertices(count));
        }

        let points = &mut points[..count];
        let area = twice_signed_area(points);
        if area == 0 {
            return Err(OcclusionError::ZeroArea);
        }
        if area < 0 {
            points.reverse();
        }
        check_convex(points)?;

        let mut functions = [EdgeFunction::UNUSED; MAX_EDGES];
        let mut bounds = PixelBounds::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for (index, &from) in points.iter().enumerate() {
            functions[index] = edge_through(index, from, points[(index + 1) % count])?;

            let [x, y] = from;
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }

        Ok(Self {
            functions,
            len: count,
            bounds: Some(bounds),
        })
    }

    /// Axis-aligned box covering pixels `min..=max` on both axes.
    ///
    /// # Errors
    ///
    /// Fails when the box has no area (`min >= max` on either axis).
    pub fn rectangle(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> OcclusionResult<Self> {
        Self::from_vertices(&[[min_x, min_y], [max_x, min_y], [max_x, max_y], [min_x, max_y]])
    }

    /// Builds a polygon from edge functions. The caller vouches for
    /// convexity; without bounds the whole screen is scanned.
    ///
    /// # Errors
    ///
    /// Fails for zero or more than [`MAX_EDGES`] edges, or an edge whose
    /// values would overflow on the largest supported raster.
    pub fn from_functions(edges: &[EdgeFunction]) -> OcclusionResult<Self> {
        if edges.is_empty() {
            return Err(OcclusionError::TooFewVertices(0));
        }
        if edges.len() > MAX_EDGES {
            return Err(OcclusionError::TooManyEdges {
                count: edges.len(),
                max: MAX_EDGES,
            });
        }
        if let Some(index) = edges.iter().position(|edge| !edge.fits_raster()) {
            return Err(OcclusionError::CoordinateRange { index });
        }

        let mut functions = [EdgeFunction::UNUSED; MAX_EDGES];
        functions[..edges.len()].copy_from_slice(edges);
        Ok(Self {
            functions,
            len: edges.len(),
            bounds: None,
        })
    }

    /// Builds a polygon from packed `(a, b, c)` triples.
    ///
    /// # Errors
    ///
    /// Fails if the buffer is not whole triples, an edge is degenerate, or
    /// the edge count is out of range.
    pub fn from_packed(packed: &[i32]) -> OcclusionResult<Self> {
        let triples: &[EdgeCoefficients] = bytemuck::try_cast_slice(packed)
            .map_err(|_| OcclusionError::MalformedCoefficients(packed.len()))?;

        let mut functions = [EdgeFunction::UNUSED; MAX_EDGES];
        if triples.len() > MAX_EDGES {
            return Err(OcclusionError::TooManyEdges {
                count: triples.len(),
                max: MAX_EDGES,
            });
        }
        for (index, coefficients) in triples.iter().enumerate() {
            functions[index] = EdgeFunction::from_coefficients(*coefficients)
                .ok_or(OcclusionError::DegenerateEdge { index })?;
        }

        Self::from_functions(&functions[..triples.len()])
    }

    /// Restricts the scan to `bounds`. The bounds must contain every pixel
    /// of the polygon; only the top-level tiles they touch are visited.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: PixelBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Active edge functions.
    #[inline]
    #[must_use]
    pub fn functions(&self) -> &[EdgeFunction] {
        &self.functions[..self.len]
    }

    /// Number of edges.
    #[inline]
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.len
    }

    /// Pixel bounds, if known.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Option<PixelBounds> {
        self.bounds
    }

    /// Returns true if the pixel is within the bounds and inside every edge.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds.map_or(true, |bounds| bounds.contains(x, y))
            && self.functions().iter().all(|f| f.evaluate(x, y) >= 0)
    }
}

/// Edge from `from` to `to` with the interior on the left of the direction
/// of travel (counter-clockwise winding, y up).
fn edge_through(index: usize, from: [i32; 2], to: [i32; 2]) -> OcclusionResult<EdgeFunction> {
    let [x0, y0] = from.map(i64::from);
    let [x1, y1] = to.map(i64::from);
    let narrow = |value: i64| {
        i32::try_from(value).map_err(|_| OcclusionError::CoordinateRange { index })
    };

    let function = EdgeFunction::new(narrow(y0 - y1)?, narrow(x1 - x0)?, narrow(x0 * y1 - x1 * y0)?)
        .ok_or(OcclusionError::DegenerateEdge { index })?;
    if !function.fits_raster() {
        return Err(OcclusionError::CoordinateRange { index });
    }
    Ok(function)
}

fn twice_signed_area(points: &[[i32; 2]]) -> i64 {
    let mut sum = 0i64;
    for (i, &[x0, y0]) in points.iter().enumerate() {
        let [x1, y1] = points[(i + 1) % points.len()];
        sum += i64::from(x0) * i64::from(y1) - i64::from(x1) * i64::from(y0);
    }
    sum
}

/// Counter-clockwise points must only turn left and wind exactly once.
fn check_convex(points: &[[i32; 2]]) -> OcclusionResult<()> {
    let n = points.len();
    let edge = |i: usize| {
        let [x0, y0] = points[i % n];
        let [x1, y1] = points[(i + 1) % n];
        (i64::from(x1) - i64::from(x0), i64::from(y1) - i64::from(y0))
    };

    for i in 0..n {
        let (dx0, dy0) = edge(i);
        let (dx1, dy1) = edge(i + 1);
        if dx0 * dy1 - dy0 * dx1 < 0 {
            return Err(OcclusionError::NotConvex((i + 1) % n));
        }
    }

    // a star turns left everywhere too, but reverses direction on each axis
    // more than twice
    let reversals = |component: fn((i64, i64)) -> i64| {
        let mut last = (0..n)
            .rev()
            .map(|i| component(edge(i)).signum())
            .find(|&sign| sign != 0)
            .unwrap_or(0);
        let mut count = 0;
        for i in 0..n {
            let sign = component(edge(i)).signum();
            if sign != 0 {
                if sign != last {
                    count += 1;
                }
                last = sign;
            }
        }
        count
    };

    if reversals(|(dx, _)| dx) > 2 || reversals(|(_, dy)| dy) > 2 {
        return Err(OcclusionError::NotConvex(0));
    }

    Ok(())
}
