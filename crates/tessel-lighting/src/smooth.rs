use tessel_blocks::shape::face_axes;
use tessel_geom::{BlockPos, Direction, Vec3};
use tessel_model::{ModelQuadView, QuadFlags};
use tessel_world::BlockRenderView;

use crate::LightPipeline;
use crate::access::{LightDataAccess, LightWorld};
use crate::data::{QuadLightData, block_coord, diffuse, pack_coords, sky_coord};

// (direction, outset) pairs
const FACE_SLOTS: usize = 12;

const DEPTH_EPS: f32 = 1e-5;

#[inline]
fn axis_dirs(axis: usize) -> (Direction, Direction) {
    match axis {
        0 => (Direction::West, Direction::East),
        1 => (Direction::Down, Direction::Up),
        _ => (Direction::North, Direction::South),
    }
}

/// Edge neighbors of a face: `[u-, u+, v-, v+]` along the face plane axes.
#[inline]
pub fn face_tangents(dir: Direction) -> [Direction; 4] {
    let (ua, va) = face_axes(dir);
    let (un, up) = axis_dirs(ua);
    let (vn, vp) = axis_dirs(va);
    [un, up, vn, vp]
}

/// Bilinear corner weights of a point on `dir`'s face. Corner `k` sits at
/// `(k & 1, k >> 1)` in face `(u, v)` coordinates.
#[inline]
pub fn corner_weights(dir: Direction, p: Vec3) -> [f32; 4] {
    let (ua, va) = face_axes(dir);
    let u = p.axis(ua).clamp(0.0, 1.0);
    let v = p.axis(va).clamp(0.0, 1.0);
    [
        (1.0 - u) * (1.0 - v),
        u * (1.0 - v),
        (1.0 - u) * v,
        u * v,
    ]
}

/// Distance of `p` inward from the block boundary on `dir`.
#[inline]
pub fn face_depth(dir: Direction, p: Vec3) -> f32 {
    let c = p.axis(dir.axis()).clamp(0.0, 1.0);
    if dir.is_positive() { 1.0 - c } else { c }
}

#[inline]
fn min_non_zero(a: u32, b: u32) -> u32 {
    if a == 0 {
        b
    } else if b == 0 {
        a
    } else {
        a.min(b)
    }
}

/// Averages four packed light values, raising zero samples to the smallest non-zero one.
#[inline]
pub fn corner_brightness(mut a: u32, mut b: u32, mut c: u32, mut d: u32) -> u32 {
    if a == 0 || b == 0 || c == 0 || d == 0 {
        let min = min_non_zero(min_non_zero(a, b), min_non_zero(c, d));
        a = a.max(min);
        b = b.max(min);
        c = c.max(min);
        d = d.max(min);
    }
    ((a + b + c + d) >> 2) & 0x00FF_00FF
}

/// Corner AO and light of one face, sampled around the cell it opens onto (or the
/// block's own cell for inset geometry).
#[derive(Clone, Copy, Debug, Default)]
struct AoFaceData {
    ao: [f32; 4],
    lm: [u32; 4],
    bl: [f32; 4],
    sl: [f32; 4],
    ready: bool,
}

impl AoFaceData {
    fn init<W: BlockRenderView + ?Sized>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        pos: BlockPos,
        dir: Direction,
        offset: bool,
    ) {
        let adj = if offset { pos.offset(dir) } else { pos };
        let adj_word = cache.get(lw, adj);
        // An opaque cell in front has no light of its own; borrow the origin's.
        let calm = if offset && adj_word.full_opaque {
            cache.get(lw, pos).lm
        } else {
            adj_word.lm
        };
        let caao = adj_word.ao;

        let t = face_tangents(dir);
        let e = [
            cache.get_offset(lw, adj, t[0]),
            cache.get_offset(lw, adj, t[1]),
            cache.get_offset(lw, adj, t[2]),
            cache.get_offset(lw, adj, t[3]),
        ];
        for k in 0..4 {
            let (su, sv) = (k & 1, k >> 1);
            let eu = e[su];
            let ev = e[2 + sv];
            // Light cannot reach the diagonal cell past two opaque edges.
            let cw = if eu.opaque && ev.opaque {
                eu
            } else {
                cache.get_offset2(lw, adj, t[su], t[2 + sv])
            };
            self.ao[k] = (eu.ao + ev.ao + cw.ao + caao) * 0.25;
            self.lm[k] = corner_brightness(eu.lm, ev.lm, cw.lm, calm);
            self.bl[k] = block_coord(self.lm[k]) as f32;
            self.sl[k] = sky_coord(self.lm[k]) as f32;
        }
        self.ready = true;
    }

    #[inline]
    fn blend(v: &[f32; 4], w: &[f32; 4]) -> f32 {
        v[0] * w[0] + v[1] * w[1] + v[2] * w[2] + v[3] * w[3]
    }

    #[inline]
    fn blended_ao(&self, w: &[f32; 4]) -> f32 {
        Self::blend(&self.ao, w)
    }

    #[inline]
    fn blended_block(&self, w: &[f32; 4]) -> f32 {
        Self::blend(&self.bl, w)
    }

    #[inline]
    fn blended_sky(&self, w: &[f32; 4]) -> f32 {
        Self::blend(&self.sl, w)
    }
}

/// Ambient-occlusion-aware per-corner lighting.
#[derive(Clone, Debug, Default)]
pub struct SmoothLightPipeline {
    cached_pos: Option<BlockPos>,
    faces: [AoFaceData; FACE_SLOTS],
}

impl SmoothLightPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn slot(dir: Direction, offset: bool) -> usize {
        dir.index() * 2 + offset as usize
    }

    fn update_cached(&mut self, pos: BlockPos) {
        if self.cached_pos != Some(pos) {
            for f in &mut self.faces {
                f.ready = false;
            }
            self.cached_pos = Some(pos);
        }
    }

    fn ensure<W: BlockRenderView + ?Sized>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        pos: BlockPos,
        dir: Direction,
        offset: bool,
    ) -> usize {
        let slot = Self::slot(dir, offset);
        if !self.faces[slot].ready {
            self.faces[slot].init(cache, lw, pos, dir, offset);
        }
        slot
    }

    fn apply_aligned_full_face<W, Q>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        quad: &Q,
        pos: BlockPos,
        dir: Direction,
        out: &mut QuadLightData,
    ) where
        W: BlockRenderView + ?Sized,
        Q: ModelQuadView + ?Sized,
    {
        let slot = self.ensure(cache, lw, pos, dir, true);
        let fd = &self.faces[slot];
        let (ua, va) = face_axes(dir);
        for i in 0..4 {
            let p = quad.position(i);
            let k = (p.axis(ua) > 0.5) as usize | ((p.axis(va) > 0.5) as usize) << 1;
            out.br[i] = fd.ao[k];
            out.lm[i] = fd.lm[k];
        }
    }

    fn apply_vertex_blended<W: BlockRenderView + ?Sized>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        pos: BlockPos,
        dir: Direction,
        p: Vec3,
        i: usize,
        out: &mut QuadLightData,
        force_outer: bool,
    ) {
        let w = corner_weights(dir, p);
        let depth = if force_outer { 0.0 } else { face_depth(dir, p) };
        if depth <= DEPTH_EPS || depth >= 1.0 - DEPTH_EPS {
            let slot = self.ensure(cache, lw, pos, dir, depth <= DEPTH_EPS);
            let fd = &self.faces[slot];
            out.br[i] = fd.blended_ao(&w);
            out.lm[i] = pack_coords(fd.blended_block(&w), fd.blended_sky(&w));
        } else {
            let inner = self.ensure(cache, lw, pos, dir, false);
            let outer = self.ensure(cache, lw, pos, dir, true);
            let (n1, n2) = (&self.faces[inner], &self.faces[outer]);
            let (d1, d2) = (depth, 1.0 - depth);
            out.br[i] = n1.blended_ao(&w) * d1 + n2.blended_ao(&w) * d2;
            let bl = n1.blended_block(&w) * d1 + n2.blended_block(&w) * d2;
            let sl = n1.blended_sky(&w) * d1 + n2.blended_sky(&w) * d2;
            out.lm[i] = pack_coords(bl, sl);
        }
    }

    /// Drops cached face data.
    pub fn reset(&mut self) {
        self.cached_pos = None;
        for f in &mut self.faces {
            f.ready = false;
        }
    }
}

impl LightPipeline for SmoothLightPipeline {
    fn calculate<W, Q>(
        &mut self,
        cache: &mut LightDataAccess,
        lw: &LightWorld<'_, W>,
        quad: &Q,
        pos: BlockPos,
        out: &mut QuadLightData,
        face: Direction,
        shade: bool,
    ) where
        W: BlockRenderView + ?Sized,
        Q: ModelQuadView + ?Sized,
    {
        self.update_cached(pos);
        let flags = quad.flags();
        let aligned = flags.contains(QuadFlags::ALIGNED)
            || (flags.contains(QuadFlags::PARALLEL) && cache.get(lw, pos).full_cube);
        if aligned && !flags.contains(QuadFlags::PARTIAL) {
            self.apply_aligned_full_face(cache, lw, quad, pos, face, out);
        } else {
            for i in 0..4 {
                let p = quad.position(i);
                self.apply_vertex_blended(cache, lw, pos, face, p, i, out, aligned);
            }
        }
        let br = diffuse(face, shade);
        for b in &mut out.br {
            *b *= br;
        }
    }

    fn reset(&mut self) {
        SmoothLightPipeline::reset(self);
    }
}
