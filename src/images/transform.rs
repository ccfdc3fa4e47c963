/*!
Draw-call transforms.

Every draw in this crate takes an explicit [`Transform`] instead of relying on a
"current matrix" in ambient pipeline state.  Composition follows the fixed-function
convention: each call post-multiplies, so the most recently added step applies to
the vertices first.

```
use sprites_and_glyphs::images::transform::Transform;

// like glTranslatef(10, 0, 0); glScalef(2, 2, 1)
let t = Transform::IDENTITY.translate(10.0, 0.0).scale(2.0, 2.0);
assert_eq!(t.apply(1.0, 1.0), (12.0, 2.0));
```
*/

use kurbo::{Affine, Point};

/**
A 2D affine transform, stored as a [`kurbo::Affine`].

Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)` for coefficients `[a, b, c, d, e, f]`.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Affine);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Affine> for Transform {
    fn from(affine: Affine) -> Self {
        Transform(affine)
    }
}

impl From<Transform> for Affine {
    fn from(transform: Transform) -> Self {
        transform.0
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform(Affine::IDENTITY);

    pub fn translation(x: f32, y: f32) -> Self {
        Transform(Affine::translate((x as f64, y as f64)))
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Transform(Affine::scale_non_uniform(sx as f64, sy as f64))
    }

    /// Rotation about the origin.  With y pointing down, positive angles turn clockwise on screen.
    pub fn rotation_degrees(degrees: f32) -> Self {
        Transform(Affine::rotate((degrees as f64).to_radians()))
    }

    /// `self * inner`: `inner` applies to points first.
    pub fn then(self, inner: Transform) -> Transform {
        Transform(self.0 * inner.0)
    }

    pub fn translate(self, x: f32, y: f32) -> Transform {
        self.then(Transform::translation(x, y))
    }

    pub fn rotate_degrees(self, degrees: f32) -> Transform {
        self.then(Transform::rotation_degrees(degrees))
    }

    pub fn scale(self, sx: f32, sy: f32) -> Transform {
        self.then(Transform::scaling(sx, sy))
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.0 * Point::new(x as f64, y as f64);
        (p.x as f32, p.y as f32)
    }

    pub fn affine(&self) -> Affine {
        self.0
    }

    /// The two rows `[a, c, e, 0]` and `[b, d, f, 0]`, padded for a `vec4` per row.
    pub fn rows(&self) -> [[f32; 4]; 2] {
        let [a, b, c, d, e, f] = self.0.as_coeffs().map(|v| v as f32);
        [[a, c, e, 0.0], [b, d, f, 0.0]]
    }

    /**
    The same transform as a column-major 4x4 matrix acting on `(x, y, z, 1)`,
    leaving z untouched.
    */
    pub fn to_mat4(&self) -> [f32; 16] {
        let [a, b, c, d, e, f] = self.0.as_coeffs().map(|v| v as f32);
        #[rustfmt::skip]
        let m = [
            a,   b,   0.0, 0.0,
            c,   d,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            e,   f,   0.0, 1.0,
        ];
        m
    }
}
