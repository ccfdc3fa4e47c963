/*! The drawing component of sprites_and_glyphs: geometry, atlases, and fonts. */

pub mod transform;
pub mod index_algorithms;
pub mod vertex_layout;
pub mod vertex_algorithms;
pub mod glyph_scan;
pub mod sprite_atlas;
pub mod bitmap_font;

pub use bitmap_font::BitmapFont;
pub use sprite_atlas::SpriteAtlas;
