use serde::{Deserialize, Serialize};

/// Signed level within a location. Negative floors are basements or the underworld.
pub type Floor = i8;

/// Sprite index into the shared tile table.
pub type TileIndex = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset_by(dx, dy)
    }

    pub fn offset_by(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// Normalizes the position onto a toroidal map of the given extents.
    pub fn wrapped(self, width: usize, height: usize) -> Self {
        Self { y: self.y.rem_euclid(height as i32), x: self.x.rem_euclid(width as i32) }
    }

    pub fn neighbors(self) -> [Pos; 4] {
        Direction::ALL.map(|dir| self.offset(dir))
    }

    pub fn heuristic_distance(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev_distance(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Per-axis distances taking the short way around a wrapping map.
    pub fn wrapped_axis_distances(self, other: Pos, width: usize, height: usize) -> (u32, u32) {
        let dx = self.x.rem_euclid(width as i32).abs_diff(other.x.rem_euclid(width as i32));
        let dy = self.y.rem_euclid(height as i32).abs_diff(other.y.rem_euclid(height as i32));
        (dx.min(width as u32 - dx), dy.min(height as u32 - dy))
    }

    pub fn wrapped_heuristic_distance(self, other: Pos, width: usize, height: usize) -> u32 {
        let (dx, dy) = self.wrapped_axis_distances(other, width, height);
        dx + dy
    }

    pub fn is_within_n(self, other: Pos, n: u32) -> bool {
        self.chebyshev_distance(other) <= n
    }

    /// True for the eight surrounding cells, false for the cell itself.
    pub fn is_next_to(self, other: Pos) -> bool {
        self != other && self.chebyshev_distance(other) <= 1
    }

    pub fn is_next_to_wrapped(self, other: Pos, width: usize, height: usize) -> bool {
        let (dx, dy) = self.wrapped_axis_distances(other, width, height);
        (dx, dy) != (0, 0) && dx <= 1 && dy <= 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MapType {
    Small,
    Overworld,
    Underworld,
}

impl MapType {
    pub fn is_large(self) -> bool {
        matches!(self, MapType::Overworld | MapType::Underworld)
    }

    pub fn large_map_floor(self) -> Floor {
        match self {
            MapType::Underworld => -1,
            MapType::Overworld | MapType::Small => 0,
        }
    }
}
