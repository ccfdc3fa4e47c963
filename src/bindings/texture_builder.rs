// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Builder pattern for texture creation.

use std::sync::Arc;

use crate::bindings::sampler::{FilterMode, SamplerConfig, WrapMode};
use crate::bindings::texture::Texture;
use crate::imp::Backend;
use crate::pixel_formats::Unorm4;

/// Builder for configuring a [`Texture`] before anything is loaded into it.
///
/// ```
/// use std::sync::Arc;
/// use sprites_and_glyphs::{FilterMode, SoftwareBackend, TextureBuilder, WrapMode};
///
/// let backend = Arc::new(SoftwareBackend::new());
/// let texture = TextureBuilder::new(&backend)
///     .debug_name("tiles")
///     .filter(FilterMode::Nearest)
///     .wrap(WrapMode::ClampToEdge)
///     .build();
/// assert!(!texture.is_loaded());
/// assert_eq!(texture.filter(), FilterMode::Nearest);
/// ```
#[derive(Debug)]
pub struct TextureBuilder<'a, B: Backend> {
    backend: &'a Arc<B>,
    debug_name: String,
    sampler: SamplerConfig,
    pad_color: Unorm4,
}

impl<'a, B: Backend> TextureBuilder<'a, B> {
    pub fn new(backend: &'a Arc<B>) -> Self {
        Self {
            backend,
            debug_name: String::from("texture"),
            sampler: SamplerConfig::default(),
            pad_color: Unorm4::TRANSPARENT_BLACK,
        }
    }

    /// Label passed to the backend and used in log messages.
    pub fn debug_name(mut self, debug_name: impl Into<String>) -> Self {
        self.debug_name = debug_name.into();
        self
    }

    pub fn filter(mut self, filter: FilterMode) -> Self {
        self.sampler.filter = filter;
        self
    }

    /// Same wrap mode on both axes.
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.sampler.wrap_s = wrap;
        self.sampler.wrap_t = wrap;
        self
    }

    pub fn wrap_axes(mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> Self {
        self.sampler.wrap_s = wrap_s;
        self.sampler.wrap_t = wrap_t;
        self
    }

    /// Fill for the pixels added by power-of-two padding.
    pub fn pad_color(mut self, pad_color: Unorm4) -> Self {
        self.pad_color = pad_color;
        self
    }

    pub fn build(self) -> Texture<B> {
        Texture::from_parts(self.backend.clone(), self.debug_name, self.sampler, self.pad_color)
    }
}
