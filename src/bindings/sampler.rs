/*! Sampling configuration carried by every texture. */

/// Texel filtering used for both magnification and minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// How texture coordinates outside [0, 1] resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    Repeat,
    /// Legacy clamp.  Backends without a distinct legacy mode treat it as [`WrapMode::ClampToEdge`].
    Clamp,
    ClampToEdge,
    /// Samples outside the texture read the border color (transparent black).
    ClampToBorder,
    MirroredRepeat,
}

/**
Filter and wrap state for one texture.

This is plain data owned by the texture; it is applied when the texture is
uploaded and again whenever it changes.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerConfig {
    pub filter: FilterMode,
    /// Wrap along s (x).
    pub wrap_s: WrapMode,
    /// Wrap along t (y).
    pub wrap_t: WrapMode,
}

impl SamplerConfig {
    /// Same wrap mode on both axes.
    pub const fn new(filter: FilterMode, wrap: WrapMode) -> Self {
        SamplerConfig { filter, wrap_s: wrap, wrap_t: wrap }
    }
}
