use core::fmt;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = i32;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Board size as `(width, height)`.
pub type Coord2 = (Coord, Coord);

/// Up to eight neighbors, kept inline.
pub type Neighbors = SmallVec<[Point; 8]>;

/// A cell position. Points outside the board are valid values, they just don't address any cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn in_bounds(self, (width, height): Coord2) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }

    /// Index into an `(width, height)` shaped array, `None` when out of range.
    pub fn to_nd_index(self, bounds: Coord2) -> Option<[usize; 2]> {
        if !self.in_bounds(bounds) {
            return None;
        }
        Some([usize::try_from(self.x).ok()?, usize::try_from(self.y).ok()?])
    }
}

impl From<Coord2> for Point {
    fn from((x, y): Coord2) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Neighbors of `point` that lie within `[0, width) x [0, height)`, in row-major offset order.
pub fn neighbors(point: Point, width: Coord, height: Coord) -> Neighbors {
    NeighborIter::new(point, (width, height)).collect()
}

/// Array shape of a `(width, height)` board, indexed `[x, y]`.
pub(crate) fn nd_shape((width, height): Coord2) -> [usize; 2] {
    [
        usize::try_from(width).unwrap_or(0),
        usize::try_from(height).unwrap_or(0),
    ]
}

/// Every point of a `(width, height)` board, row by row.
pub fn iter_points((width, height): Coord2) -> impl Iterator<Item = Point> {
    (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
}

const DISPLACEMENTS: [Coord2; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `point`, returning a value only when it remains in bounds.
fn apply_delta(point: Point, delta: Coord2, bounds: Coord2) -> Option<Point> {
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = point.x.checked_add(dx)?;
    if next_x < 0 || next_x >= max_x {
        return None;
    }

    let next_y = point.y.checked_add(dy)?;
    if next_y < 0 || next_y >= max_y {
        return None;
    }

    Some(Point::new(next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Point,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Point, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
