/*!
Algorithms for generating index lists for atlases of quads.

An atlas with N clips stores 4N vertices, clip `i` owning vertices `4i..4i+4`
in the order top-left, top-right, bottom-right, bottom-left.  Its index data is
one buffer addressed by offset: clip `i` draws the 4 indices starting at `4i`.

# Example

```
use sprites_and_glyphs::images::index_algorithms::QuadIndexGenerator;

let generator = QuadIndexGenerator::new(3);
assert_eq!(generator.num_indices(), 12);
assert_eq!(generator.first_index(2), 8);
assert_eq!(generator.indices_for(1), [4, 5, 6, 7]);
```

# Triangulation

Quads are the primitive the atlas describes, but modern APIs only draw
triangles.  [`quads_to_triangles`] splits every quad along its
top-left/bottom-right diagonal:

```text
 TL(0) ─────── TR(1)
   │ ╲     1     │
   │   ╲         │
   │  2  ╲       │
   │       ╲     │
 BL(3) ─────── BR(2)
```

- Triangle 1: (top_left, top_right, bottom_right)
- Triangle 2: (top_left, bottom_right, bottom_left)
*/

pub const INDICES_PER_QUAD: usize = 4;
const INDICES_PER_TRIANGLE: usize = 3;
const TRIANGLES_PER_QUAD: usize = 2;
pub const TRIANGLE_INDICES_PER_QUAD: usize = INDICES_PER_TRIANGLE * TRIANGLES_PER_QUAD;

/// Generates sequential quad indices for an atlas of `quad_count` clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadIndexGenerator {
    quad_count: usize,
}

impl QuadIndexGenerator {
    pub fn new(quad_count: usize) -> Self {
        Self { quad_count }
    }

    pub fn num_indices(&self) -> usize {
        self.quad_count * INDICES_PER_QUAD
    }

    /// Offset of the first index of `quad` in the index buffer.
    pub fn first_index(&self, quad: usize) -> usize {
        assert!(quad < self.quad_count, "Index out of bounds");
        quad * INDICES_PER_QUAD
    }

    /// The four vertex indices of `quad`.
    pub fn indices_for(&self, quad: usize) -> [u32; INDICES_PER_QUAD] {
        let first = self.first_index(quad) as u32;
        [first, first + 1, first + 2, first + 3]
    }

    /// All indices, quad after quad.
    pub fn indices(&self) -> Vec<u32> {
        (0..self.quad_count).flat_map(|q| self.indices_for(q)).collect()
    }
}

/// Expands quad indices (4 per quad) into a triangle list (6 per quad).
///
/// # Panics
/// Panics if `quads.len()` is not a multiple of 4.
pub fn quads_to_triangles(quads: &[u32]) -> Vec<u32> {
    assert!(quads.len() % INDICES_PER_QUAD == 0, "Invalid geometry");
    let mut out = Vec::with_capacity(quads.len() / INDICES_PER_QUAD * TRIANGLE_INDICES_PER_QUAD);
    for q in quads.chunks_exact(INDICES_PER_QUAD) {
        out.extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
    }
    out
}

/// Maps a quad index range onto the range it occupies after [`quads_to_triangles`].
pub fn triangle_range(first_index: u32, index_count: u32) -> (u32, u32) {
    let q = INDICES_PER_QUAD as u32;
    let t = TRIANGLE_INDICES_PER_QUAD as u32;
    (first_index / q * t, index_count / q * t)
}

/// Serializes indices as little-endian `u32`.
pub fn indices_to_bytes(indices: &[u32]) -> Vec<u8> {
    indices.iter().flat_map(|i| i.to_le_bytes()).collect()
}

/// Inverse of [`indices_to_bytes`].
pub fn indices_from_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)] mod tests {
    use super::*;

    #[test] fn indices_follow_registration_order() {
        let g = QuadIndexGenerator::new(4);
        assert_eq!(g.indices(), (0..16).collect::<Vec<u32>>());
        assert_eq!(g.indices_for(3), [12, 13, 14, 15]);
    }

    #[test] #[should_panic] fn first_index_out_of_range() {
        QuadIndexGenerator::new(2).first_index(2);
    }

    #[test] fn triangulation() {
        let tris = quads_to_triangles(&[4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(tris, vec![4, 5, 6, 4, 6, 7, 8, 9, 10, 8, 10, 11]);
        assert_eq!(triangle_range(4, 4), (6, 6));
        assert_eq!(triangle_range(0, 8), (0, 12));
    }

    #[test] fn index_bytes() {
        let bytes = indices_to_bytes(&[1, 256]);
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(indices_from_bytes(&bytes), vec![1, 256]);
    }
}
