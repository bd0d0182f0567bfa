use rand::RngCore;
use tessel_blocks::{BlockId, BlockState};
use tessel_geom::Direction;

use crate::quad::BakedQuad;
use crate::random::SeededRandom;

/// Source of quads for one block state.
pub trait BakedModel: Send + Sync {
    /// Quads culled against `face`, or the never-culled quads when `face` is `None`.
    /// The result must depend only on the inputs and the sequence drawn from `rng`.
    fn quads(
        &self,
        state: BlockState,
        face: Option<Direction>,
        rng: &mut SeededRandom,
    ) -> &[BakedQuad];

    fn use_ambient_occlusion(&self) -> bool;
}

/// Fixed quad lists: one per cull face plus general geometry.
#[derive(Clone, Debug, Default)]
pub struct SimpleModel {
    pub faces: [Vec<BakedQuad>; 6],
    pub general: Vec<BakedQuad>,
    pub ambient_occlusion: bool,
}

impl SimpleModel {
    pub fn new(ambient_occlusion: bool) -> Self {
        Self {
            ambient_occlusion,
            ..Default::default()
        }
    }

    pub fn push(&mut self, cull_face: Option<Direction>, quad: BakedQuad) {
        match cull_face {
            Some(d) => self.faces[d.index()].push(quad),
            None => self.general.push(quad),
        }
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum::<usize>() + self.general.len()
    }
}

impl BakedModel for SimpleModel {
    #[inline]
    fn quads(&self, _state: BlockState, face: Option<Direction>, _rng: &mut SeededRandom) -> &[BakedQuad] {
        match face {
            Some(d) => &self.faces[d.index()],
            None => &self.general,
        }
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.ambient_occlusion
    }
}

/// Picks one sub-model per query, weighted, from the seeded sequence.
#[derive(Clone, Debug)]
pub struct WeightedModel {
    entries: Vec<(u32, SimpleModel)>,
    total: u64,
}

impl WeightedModel {
    /// Zero-weight entries are dropped. Returns `None` if nothing remains.
    pub fn new(entries: Vec<(u32, SimpleModel)>) -> Option<Self> {
        let entries: Vec<(u32, SimpleModel)> = entries.into_iter().filter(|(w, _)| *w > 0).collect();
        if entries.is_empty() {
            return None;
        }
        let total = entries.iter().map(|(w, _)| *w as u64).sum();
        Some(Self { entries, total })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn pick(&self, rng: &mut SeededRandom) -> &SimpleModel {
        let mut r = rng.next_u64() % self.total;
        for (w, m) in &self.entries {
            if r < *w as u64 {
                return m;
            }
            r -= *w as u64;
        }
        // r < total, so the loop always returns; keep the last entry as a fallback.
        &self.entries[self.entries.len() - 1].1
    }
}

impl BakedModel for WeightedModel {
    fn quads(&self, state: BlockState, face: Option<Direction>, rng: &mut SeededRandom) -> &[BakedQuad] {
        self.pick(rng).quads(state, face, rng)
    }

    fn use_ambient_occlusion(&self) -> bool {
        self.entries.first().is_some_and(|(_, m)| m.ambient_occlusion)
    }
}

/// Baked models by block id and state variant.
#[derive(Default)]
pub struct BlockModels {
    models: Vec<Vec<Box<dyn BakedModel>>>,
}

impl BlockModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models for `id`, one per variant; variant 0 is the fallback.
    pub fn insert(&mut self, id: BlockId, variants: Vec<Box<dyn BakedModel>>) {
        let ix = id as usize;
        if self.models.len() <= ix {
            self.models.resize_with(ix + 1, Vec::new);
        }
        self.models[ix] = variants;
    }

    #[inline]
    pub fn get(&self, state: BlockState) -> Option<&dyn BakedModel> {
        let vars = self.models.get(state.id as usize)?;
        vars.get(state.variant as usize)
            .or_else(|| vars.first())
            .map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.models.iter().filter(|v| !v.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
