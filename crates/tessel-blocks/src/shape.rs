use hashbrown::HashMap;
use tessel_geom::{Aabb, Direction, Vec3};

/// Cells per face edge when rasterizing culling shapes.
pub const FACE_RES: usize = 16;

const EPS: f32 = 1e-4;

/// 16x16 coverage grid of one block face. Row index is the face's v axis, bit index its u axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(pub [u16; FACE_RES]);

impl FaceMask {
    pub const EMPTY: FaceMask = FaceMask([0; FACE_RES]);
    pub const FULL: FaceMask = FaceMask([u16::MAX; FACE_RES]);

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|r| *r == 0)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.0.iter().all(|r| *r == u16::MAX)
    }

    pub fn fill_rect(&mut self, u0: usize, u1: usize, v0: usize, v1: usize) {
        if u0 >= u1 || v0 >= v1 {
            return;
        }
        let width = u1 - u0;
        let bits = if width >= FACE_RES {
            u16::MAX
        } else {
            ((1u16 << width) - 1) << u0
        };
        for row in &mut self.0[v0.min(FACE_RES)..v1.min(FACE_RES)] {
            *row |= bits;
        }
    }

    /// True if any cell set here is not set in `cover`.
    #[inline]
    pub fn overhangs(&self, cover: &FaceMask) -> bool {
        self.0.iter().zip(cover.0.iter()).any(|(a, b)| a & !b != 0)
    }
}

/// Face plane axes `(u, v)` for a direction. Opposite directions share axes.
#[inline]
pub fn face_axes(dir: Direction) -> (usize, usize) {
    match dir {
        Direction::Down | Direction::Up => (0, 2),
        Direction::North | Direction::South => (0, 1),
        Direction::West | Direction::East => (2, 1),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u16);

impl ShapeId {
    pub const EMPTY: ShapeId = ShapeId(0);
    pub const FULL: ShapeId = ShapeId(1);
}

/// Box union used for face culling, with per-face rasterized masks.
#[derive(Clone, Debug)]
pub struct CullShape {
    pub boxes: Vec<Aabb>,
    // Cells a face touches at all (rounded outward).
    touched: [FaceMask; 6],
    // Cells a face covers completely (rounded inward).
    covered: [FaceMask; 6],
}

impl CullShape {
    pub fn empty() -> Self {
        Self::from_boxes(Vec::new())
    }

    pub fn full() -> Self {
        Self::from_boxes(vec![Aabb::UNIT])
    }

    pub fn from_boxes(boxes: Vec<Aabb>) -> Self {
        let boxes: Vec<Aabb> = boxes.into_iter().filter(|b| !b.is_empty()).collect();
        let mut touched = [FaceMask::EMPTY; 6];
        let mut covered = [FaceMask::EMPTY; 6];
        for dir in Direction::ALL {
            let axis = dir.axis();
            let (ua, va) = face_axes(dir);
            for b in &boxes {
                let on_face = if dir.is_positive() {
                    b.max.axis(axis) >= 1.0 - EPS
                } else {
                    b.min.axis(axis) <= EPS
                };
                if !on_face {
                    continue;
                }
                let (u0, u1) = (b.min.axis(ua), b.max.axis(ua));
                let (v0, v1) = (b.min.axis(va), b.max.axis(va));
                touched[dir.index()].fill_rect(
                    cell_floor(u0),
                    cell_ceil(u1),
                    cell_floor(v0),
                    cell_ceil(v1),
                );
                covered[dir.index()].fill_rect(
                    cell_ceil(u0),
                    cell_floor(u1),
                    cell_ceil(v0),
                    cell_floor(v1),
                );
            }
        }
        Self {
            boxes,
            touched,
            covered,
        }
    }

    #[inline]
    pub fn touched(&self, dir: Direction) -> &FaceMask {
        &self.touched[dir.index()]
    }

    #[inline]
    pub fn covered(&self, dir: Direction) -> &FaceMask {
        &self.covered[dir.index()]
    }

    /// The face toward `dir` is a complete square.
    #[inline]
    pub fn is_full_square(&self, dir: Direction) -> bool {
        self.covered[dir.index()].is_full()
    }

    pub fn is_full_cube(&self) -> bool {
        Direction::ALL.iter().all(|d| self.is_full_square(*d))
            && self.boxes.iter().any(|b| *b == Aabb::UNIT)
    }

    fn key(&self) -> Vec<[u32; 6]> {
        self.boxes
            .iter()
            .map(|b| {
                [
                    b.min.x.to_bits(),
                    b.min.y.to_bits(),
                    b.min.z.to_bits(),
                    b.max.x.to_bits(),
                    b.max.y.to_bits(),
                    b.max.z.to_bits(),
                ]
            })
            .collect()
    }
}

#[inline]
fn cell_floor(c: f32) -> usize {
    ((c * FACE_RES as f32 + EPS).floor().max(0.0) as usize).min(FACE_RES)
}

#[inline]
fn cell_ceil(c: f32) -> usize {
    ((c * FACE_RES as f32 - EPS).ceil().max(0.0) as usize).min(FACE_RES)
}

/// Interned culling shapes. `ShapeId::EMPTY` and `ShapeId::FULL` are always present.
#[derive(Clone, Debug)]
pub struct ShapeTable {
    shapes: Vec<CullShape>,
    index: HashMap<Vec<[u32; 6]>, ShapeId>,
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTable {
    pub fn new() -> Self {
        let mut t = Self {
            shapes: Vec::new(),
            index: HashMap::new(),
        };
        t.intern(CullShape::empty());
        t.intern(CullShape::full());
        t
    }

    pub fn intern(&mut self, shape: CullShape) -> ShapeId {
        let key = shape.key();
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = ShapeId(self.shapes.len() as u16);
        self.shapes.push(shape);
        self.index.insert(key, id);
        id
    }

    /// Unknown ids resolve to the empty shape.
    #[inline]
    pub fn get(&self, id: ShapeId) -> &CullShape {
        self.shapes
            .get(id.0 as usize)
            .unwrap_or(&self.shapes[ShapeId::EMPTY.0 as usize])
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

pub fn slab_box(top: bool) -> Aabb {
    if top {
        Aabb::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 1.0, 1.0))
    } else {
        Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.5, 1.0))
    }
}
