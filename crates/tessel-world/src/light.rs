use std::collections::VecDeque;

use tessel_blocks::BlockRegistry;

use crate::slice::WorldSlice;

const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

impl WorldSlice {
    /// Recomputes block and sky light from scratch.
    ///
    /// Sky light starts at 15 in every non-opaque cell with open sky above it inside the
    /// slice; block light starts at each block's luminance. Both then spread through
    /// non-opaque cells, losing one level per step.
    pub fn relight(&mut self, reg: &BlockRegistry) {
        let (sx, sy, sz) = (self.sx, self.sy, self.sz);
        self.sky_light.iter_mut().for_each(|v| *v = 0);
        self.block_light.iter_mut().for_each(|v| *v = 0);

        let mut q_sky: VecDeque<(usize, usize, usize, u8)> = VecDeque::new();
        for z in 0..sz {
            for x in 0..sx {
                for y in (0..sy).rev() {
                    let idx = self.idx(x, y, z);
                    if reg.is_opaque(self.blocks[idx]) {
                        break;
                    }
                    self.sky_light[idx] = 15;
                    q_sky.push_back((x, y, z, 15));
                }
            }
        }

        let mut q: VecDeque<(usize, usize, usize, u8)> = VecDeque::new();
        for z in 0..sz {
            for y in 0..sy {
                for x in 0..sx {
                    let idx = self.idx(x, y, z);
                    let em = reg.luminance(self.blocks[idx]);
                    if em > 0 {
                        self.block_light[idx] = em;
                        q.push_back((x, y, z, em));
                    }
                }
            }
        }

        let sky_cells = q_sky.len();
        let emitters = q.len();
        flood(self, reg, &mut q_sky, Channel::Sky);
        flood(self, reg, &mut q, Channel::Block);
        log::debug!(
            target: "light",
            "relight {}x{}x{}: {} open-sky cells, {} emitters",
            sx,
            sy,
            sz,
            sky_cells,
            emitters
        );
    }
}

#[derive(Clone, Copy)]
enum Channel {
    Sky,
    Block,
}

fn flood(
    w: &mut WorldSlice,
    reg: &BlockRegistry,
    q: &mut VecDeque<(usize, usize, usize, u8)>,
    ch: Channel,
) {
    let (sx, sy, sz) = (w.sx as i32, w.sy as i32, w.sz as i32);
    while let Some((x, y, z, level)) = q.pop_front() {
        if level <= 1 {
            continue;
        }
        for (dx, dy, dz) in NEIGHBORS {
            let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
            if nx < 0 || ny < 0 || nz < 0 || nx >= sx || ny >= sy || nz >= sz {
                continue;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            let idx = w.idx(nx, ny, nz);
            if reg.is_opaque(w.blocks[idx]) {
                continue;
            }
            let v = level - 1;
            let cell = match ch {
                Channel::Sky => &mut w.sky_light[idx],
                Channel::Block => &mut w.block_light[idx],
            };
            if *cell < v {
                *cell = v;
                q.push_back((nx, ny, nz, v));
            }
        }
    }
}
