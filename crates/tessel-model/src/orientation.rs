/// Vertex traversal order of an emitted quad.
///
/// The rasterizer splits a quad along the diagonal from destination vertex 0 to 2.
/// `Normal` keeps the source order; `Flip` rotates by one so the seam runs through
/// source vertices 1 and 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelQuadOrientation {
    Normal,
    Flip,
}

impl ModelQuadOrientation {
    const NORMAL_ORDER: [usize; 4] = [0, 1, 2, 3];
    const FLIP_ORDER: [usize; 4] = [1, 2, 3, 0];

    /// Source vertex written to destination slot `dst`.
    #[inline]
    pub fn index_of(self, dst: usize) -> usize {
        match self {
            ModelQuadOrientation::Normal => Self::NORMAL_ORDER[dst & 3],
            ModelQuadOrientation::Flip => Self::FLIP_ORDER[dst & 3],
        }
    }

    /// Seam on the brighter diagonal; equal diagonals resolve to `Flip`.
    #[inline]
    pub fn order_of(brightness: &[f32; 4]) -> Self {
        if brightness[0] + brightness[2] > brightness[1] + brightness[3] {
            ModelQuadOrientation::Normal
        } else {
            ModelQuadOrientation::Flip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_diagonals() {
        assert_eq!(
            ModelQuadOrientation::order_of(&[1.0, 0.0, 0.0, 1.0]),
            ModelQuadOrientation::Flip
        );
        assert_eq!(
            ModelQuadOrientation::order_of(&[0.0, 1.0, 1.0, 0.0]),
            ModelQuadOrientation::Flip
        );
        assert_eq!(
            ModelQuadOrientation::order_of(&[1.0, 0.0, 1.0, 0.0]),
            ModelQuadOrientation::Normal
        );
    }

    #[test]
    fn uniform_brightness_flips() {
        assert_eq!(
            ModelQuadOrientation::order_of(&[0.8; 4]),
            ModelQuadOrientation::Flip
        );
    }

    #[test]
    fn flip_is_rotation() {
        let o = ModelQuadOrientation::Flip;
        let order: Vec<usize> = (0..4).map(|i| o.index_of(i)).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }
}
