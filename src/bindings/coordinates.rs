/**
A rectangle in source-image pixel space.

```text
           x
      0 ────────▶
      │ ┌───────┐
    y │ │       │ h
      │ │       │
      ▼ └───────┘
          w
 ```

Used both for atlas clips and for font glyphs.  Fields are signed and public:
font loading shifts `y` and shrinks `h` after glyph detection, and clips are not
validated against texture bounds.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// x + w, saturating
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// y + h, saturating
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }
}
