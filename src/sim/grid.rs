//! Grid geometry
//!
//! Cells are addressed by integer points. Directions are the four cardinal
//! unit vectors; the board is a fixed square of cells `[0, size)` on both axes.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A cell on the grid, or a direction vector between cells
pub type Point = IVec2;

/// Cardinal direction of travel (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    pub fn vector(self) -> Point {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// The exact reverse of this direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Recover a direction from a unit vector
    pub fn from_vector(v: Point) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.vector() == v)
    }
}

/// Square playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub size: i32,
}

impl Board {
    pub const fn new(size: i32) -> Self {
        Self { size }
    }

    /// Whether a cell lies inside `[0, size)` on both axes
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.size && p.y < self.size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        (self.size.max(0) as usize).pow(2)
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| IVec2::new(x, y)))
    }
}

/// Taxicab distance `|ax-bx| + |ay-by|`
#[inline]
pub fn manhattan_distance(a: Point, b: Point) -> i32 {
    (a - b).abs().element_sum()
}

/// Straight-line distance between cell centers
#[inline]
pub fn euclidean_distance(a: Point, b: Point) -> f32 {
    (a - b).as_vec2().length()
}
