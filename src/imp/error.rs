// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::imp::{BufferId, TextureId};

/// Failures reported by a [`Backend`](crate::imp::Backend).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("texture allocation of {width}x{height} failed: {reason}")]
    TextureAllocation { width: u32, height: u32, reason: String },
    #[error("buffer allocation failed: {0}")]
    BufferAllocation(String),
    #[error("pixel transfer failed: {0}")]
    Transfer(String),
    #[error("texture read-back failed: {0}")]
    Readback(String),
    #[error("draw failed: {0}")]
    Draw(String),
    #[error("no such texture {0:?}")]
    NoSuchTexture(TextureId),
    #[error("no such buffer {0:?}")]
    NoSuchBuffer(BufferId),
    #[error("backend ran out of resource ids")]
    IdsExhausted,
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[cfg(feature = "backend_wgpu")]
    #[error("no suitable adapter")]
    NoSuchAdapter,
    #[cfg(feature = "backend_wgpu")]
    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[cfg(feature = "backend_wgpu")]
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[cfg(feature = "backend_wgpu")]
    #[error("buffer mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
}
