// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::path::PathBuf;

use crate::pixel_formats::DecodeError;

/**
Errors from texture, atlas, and font operations.

Every fallible operation in this crate leaves its receiver either fully loaded
or fully empty when it returns one of these.
*/
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("texture is already loaded; free it first")]
    AlreadyLoaded,
    #[error("texture is not loaded")]
    NotLoaded,
    #[error("texture is already locked")]
    AlreadyLocked,
    #[error("texture is not locked")]
    NotLocked,
    #[error("pixel ({x}, {y}) is outside the texture")]
    PixelOutOfRange { x: u32, y: u32 },
    #[error("no clips registered")]
    NoClips,
    #[error("vertex and index buffers have not been built")]
    BuffersNotBuilt,
    #[error("clip {0} is out of range")]
    ClipOutOfRange(usize),
    #[error("font image {width}x{height} is too small for a 16x16 glyph grid")]
    FontGridTooSmall { width: u32, height: u32 },
    #[error("backend error: {0}")]
    Backend(#[from] crate::imp::Error),
}
