use crate::Vec3;

/// One of the six cardinal block directions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Direction {
    /// All directions in the order the renderer walks them.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the `[0..6)` index of this direction.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an index `[0..6)` back into a direction.
    #[inline]
    pub fn from_index(i: usize) -> Option<Direction> {
        Direction::ALL.get(i).copied()
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    /// Returns the unit-normal vector for this direction.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Axis this direction moves along (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Direction::West | Direction::East => 0,
            Direction::Down | Direction::Up => 1,
            Direction::North | Direction::South => 2,
        }
    }

    /// True for UP, SOUTH and EAST.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, Direction::Up | Direction::South | Direction::East)
    }

    /// Closest cardinal direction to an arbitrary normal. Ties resolve X, then Y, then Z.
    pub fn from_normal(n: Vec3) -> Direction {
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        if ax >= ay && ax >= az {
            if n.x >= 0.0 { Direction::East } else { Direction::West }
        } else if ay >= az {
            if n.y >= 0.0 { Direction::Up } else { Direction::Down }
        } else if n.z >= 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }
}
