/*! Defines binding types: textures and the data they are built from. */

pub mod sampler;
pub mod coordinates;
pub mod software;
pub mod texture;
pub mod texture_builder;

pub use texture::Texture;
pub use texture_builder::TextureBuilder;
