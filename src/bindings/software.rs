/*! CPU-side image data. */

pub mod pixel_buffer;
