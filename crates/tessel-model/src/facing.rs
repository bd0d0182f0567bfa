use tessel_geom::Direction;

/// Output bucket of a quad: a cardinal direction, or `None` for geometry that is never culled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelQuadFacing {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
    None = 6,
}

impl ModelQuadFacing {
    pub const COUNT: usize = 7;

    pub const ALL: [ModelQuadFacing; Self::COUNT] = [
        ModelQuadFacing::Down,
        ModelQuadFacing::Up,
        ModelQuadFacing::North,
        ModelQuadFacing::South,
        ModelQuadFacing::West,
        ModelQuadFacing::East,
        ModelQuadFacing::None,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_direction(dir: Direction) -> Self {
        match dir {
            Direction::Down => ModelQuadFacing::Down,
            Direction::Up => ModelQuadFacing::Up,
            Direction::North => ModelQuadFacing::North,
            Direction::South => ModelQuadFacing::South,
            Direction::West => ModelQuadFacing::West,
            Direction::East => ModelQuadFacing::East,
        }
    }

    #[inline]
    pub fn direction(self) -> Option<Direction> {
        Direction::from_index(self.index())
    }
}

impl From<Direction> for ModelQuadFacing {
    fn from(dir: Direction) -> Self {
        Self::from_direction(dir)
    }
}
