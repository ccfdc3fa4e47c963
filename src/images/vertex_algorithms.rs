/*!
Implements the quad vertex algorithms.
*/

use crate::bindings::coordinates::Rect;
use crate::images::vertex_layout::VertexRecord;

/**
Which point of a quad sits at its local (0, 0).

```text
 TopLeft ───────── TopRight
    │                 │
    │     Center      │
    │                 │
 BottomLeft ───── BottomRight
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Origin {
    /**
    Local-space edges `(left, top, right, bottom)` of a `w` by `h` quad anchored at this origin.

    Y grows downward.  A centered quad spans half its size on each side.
    */
    pub fn edges(self, w: f32, h: f32) -> (f32, f32, f32, f32) {
        match self {
            Origin::TopLeft => (0.0, 0.0, w, h),
            Origin::TopRight => (-w, 0.0, 0.0, h),
            Origin::BottomLeft => (0.0, -h, w, 0.0),
            Origin::BottomRight => (-w, -h, 0.0, 0.0),
            Origin::Center => (-w / 2.0, -h / 2.0, w / 2.0, h / 2.0),
        }
    }
}

/**
The four vertices of `clip`, in top-left, top-right, bottom-right, bottom-left order.

Texture coordinates are normalized against the **storage** size of the texture
(`storage_width` x `storage_height`), not the logical image size, because the
clip is expressed in pixels of the padded storage.

```
use sprites_and_glyphs::bindings::coordinates::Rect;
use sprites_and_glyphs::images::vertex_algorithms::{quad_vertices, Origin};

// a 100x50 image lives in 128x64 storage
let quad = quad_vertices(Rect::new(0, 0, 100, 50), Origin::TopLeft, 128, 64);
assert_eq!(quad[2].position.x, 100.0);
assert_eq!(quad[2].tex_coord.s, 100.0 / 128.0);
assert_eq!(quad[2].tex_coord.t, 50.0 / 64.0);
```
*/
pub fn quad_vertices(clip: Rect, origin: Origin, storage_width: u32, storage_height: u32) -> [VertexRecord; 4] {
    let (left, top, right, bottom) = origin.edges(clip.w as f32, clip.h as f32);
    let sw = storage_width as f32;
    let sh = storage_height as f32;
    let s_left = clip.x as f32 / sw;
    //edges in f32: unvalidated clips may sit near i32::MAX
    let s_right = (clip.x as f32 + clip.w as f32) / sw;
    let t_top = clip.y as f32 / sh;
    let t_bottom = (clip.y as f32 + clip.h as f32) / sh;
    [
        VertexRecord::new(left, top, s_left, t_top),
        VertexRecord::new(right, top, s_right, t_top),
        VertexRecord::new(right, bottom, s_right, t_bottom),
        VertexRecord::new(left, bottom, s_left, t_bottom),
    ]
}

/**
Vertices for a run of clips, laid out contiguously in the order given.
*/
pub fn atlas_vertices(clips: &[Rect], origin: Origin, storage_width: u32, storage_height: u32) -> Vec<VertexRecord> {
    let mut out = Vec::with_capacity(clips.len() * 4);
    for clip in clips {
        out.extend_from_slice(&quad_vertices(*clip, origin, storage_width, storage_height));
    }
    out
}

#[cfg(test)] mod tests {
    use super::*;

    #[test] fn anchors() {
        assert_eq!(Origin::TopLeft.edges(4.0, 2.0), (0.0, 0.0, 4.0, 2.0));
        assert_eq!(Origin::TopRight.edges(4.0, 2.0), (-4.0, 0.0, 0.0, 2.0));
        assert_eq!(Origin::BottomLeft.edges(4.0, 2.0), (0.0, -2.0, 4.0, 0.0));
        assert_eq!(Origin::BottomRight.edges(4.0, 2.0), (-4.0, -2.0, 0.0, 0.0));
        assert_eq!(Origin::Center.edges(4.0, 2.0), (-2.0, -1.0, 2.0, 1.0));
    }

    #[test] fn extreme_clip_does_not_overflow() {
        let quad = quad_vertices(Rect::new(i32::MAX - 1, 0, i32::MAX, 8), Origin::TopLeft, 16, 16);
        assert!(quad[1].tex_coord.s.is_finite());
        assert!(quad[1].tex_coord.s > quad[0].tex_coord.s);
        assert_eq!(quad[2].tex_coord.t, 0.5);
    }

    #[test] fn odd_center_keeps_size() {
        let (l, t, r, b) = Origin::Center.edges(5.0, 3.0);
        assert_eq!(r - l, 5.0);
        assert_eq!(b - t, 3.0);
    }

    #[test] fn winding_order() {
        let q = quad_vertices(Rect::new(32, 16, 32, 16), Origin::TopLeft, 64, 64);
        let corners: Vec<(f32, f32)> = q.iter().map(|v| (v.position.x, v.position.y)).collect();
        assert_eq!(corners, vec![(0.0, 0.0), (32.0, 0.0), (32.0, 16.0), (0.0, 16.0)]);
        assert_eq!(q[0].tex_coord.s, 0.5);
        assert_eq!(q[0].tex_coord.t, 0.25);
        assert_eq!(q[2].tex_coord.s, 1.0);
        assert_eq!(q[2].tex_coord.t, 0.5);
    }

    #[test] fn contiguous_layout() {
        let clips = [Rect::new(0, 0, 1, 1), Rect::new(1, 0, 1, 1)];
        let v = atlas_vertices(&clips, Origin::TopLeft, 2, 1);
        assert_eq!(v.len(), 8);
        assert_eq!(v[4].tex_coord.s, 0.5);
    }
}
