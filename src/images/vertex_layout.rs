// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Vertex records and their buffer layout.
//!
//! Every quad this crate draws is made of four [`VertexRecord`]s.  A record is a
//! 2D position followed by a texture coordinate, four little-endian `f32`s in
//! total:
//!
//! ```text
//! byte  0        4        8        12       16
//!       ┌────────┬────────┬────────┬────────┐
//!       │   x    │   y    │   s    │   t    │
//!       └────────┴────────┴────────┴────────┘
//!        position          tex_coord
//! ```
//!
//! Buffer offsets depend on this order, so serialization is spelled out in
//! [`VertexRecord::write_bytes`] rather than left to the in-memory layout.
//!
//! # Example
//!
//! ```
//! use sprites_and_glyphs::images::vertex_layout::{VertexRecord, VertexLayout};
//!
//! let record = VertexRecord::new(1.0, 2.0, 0.5, 0.25);
//! let bytes = record.to_bytes();
//! assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
//! assert_eq!(&bytes[8..12], &0.5f32.to_le_bytes());
//! assert_eq!(VertexLayout::vertex_record().element_stride(), VertexRecord::SIZE);
//! ```

/// A position in render-local space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexPos2D {
    pub x: f32,
    pub y: f32,
}

/// A texture coordinate normalized to the texture's storage dimensions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexCoord {
    pub s: f32,
    pub t: f32,
}

/// One vertex of a textured quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexRecord {
    pub position: VertexPos2D,
    pub tex_coord: TexCoord,
}

impl VertexRecord {
    /// Serialized size in bytes.
    pub const SIZE: usize = 16;

    pub const fn new(x: f32, y: f32, s: f32, t: f32) -> Self {
        VertexRecord {
            position: VertexPos2D { x, y },
            tex_coord: TexCoord { s, t },
        }
    }

    /// Appends the record as `x, y, s, t`, each a little-endian `f32`.
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.position.x.to_le_bytes());
        out.extend_from_slice(&self.position.y.to_le_bytes());
        out.extend_from_slice(&self.tex_coord.s.to_le_bytes());
        out.extend_from_slice(&self.tex_coord.t.to_le_bytes());
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        let fields = [self.position.x, self.position.y, self.tex_coord.s, self.tex_coord.t];
        for (chunk, field) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }

    /// Reads a record written by [`write_bytes`](Self::write_bytes).
    ///
    /// Returns `None` if fewer than [`SIZE`](Self::SIZE) bytes are available.
    pub fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes = bytes.get(..Self::SIZE)?;
        let mut fields = [0f32; 4];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(4)) {
            *field = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(VertexRecord::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

/// Serializes a run of records back to back.
pub fn records_to_bytes(records: &[VertexRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * VertexRecord::SIZE);
    for r in records {
        r.write_bytes(&mut out);
    }
    out
}

/// Inverse of [`records_to_bytes`].  A trailing partial record is ignored.
pub fn records_from_bytes(bytes: &[u8]) -> Vec<VertexRecord> {
    bytes
        .chunks_exact(VertexRecord::SIZE)
        .filter_map(VertexRecord::read_bytes)
        .collect()
}

/// Describes the layout of a vertex buffer.
///
/// Backends use this to tell the GPU how to read [`VertexRecord`]s.  Fields are
/// listed in the order they appear in memory.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    pub(crate) fields: Vec<VertexField>,
}

#[derive(Debug, Clone)]
pub(crate) struct VertexField {
    #[allow(dead_code)] //software backend does not use
    pub(crate) name: &'static str,
    pub(crate) r#type: VertexFieldType,
}

/// Specifies the data type of a vertex attribute field.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum VertexFieldType {
    /// A 32-bit floating point value.
    F32,
}

impl VertexFieldType {
    pub(crate) fn stride(&self) -> usize {
        match self {
            VertexFieldType::F32 => 4,
        }
    }
}

impl VertexLayout {
    /// Creates a new, empty vertex layout.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// The layout of [`VertexRecord`].
    pub fn vertex_record() -> Self {
        let mut layout = Self::new();
        layout.add_field("position_x", VertexFieldType::F32);
        layout.add_field("position_y", VertexFieldType::F32);
        layout.add_field("texcoord_s", VertexFieldType::F32);
        layout.add_field("texcoord_t", VertexFieldType::F32);
        layout
    }

    /// Adds a field to the vertex layout.
    ///
    /// Each field is one component; a 2D position is two fields.
    pub fn add_field(&mut self, name: &'static str, r#type: VertexFieldType) {
        self.fields.push(VertexField { name, r#type });
    }

    /// Bytes from one vertex to the next.
    pub fn element_stride(&self) -> usize {
        self.fields.iter().map(|e| e.r#type.stride()).sum()
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)] mod tests {
    use super::*;

    #[test] fn position_precedes_texcoord() {
        let mut out = Vec::new();
        VertexRecord::new(-64.0, 64.0, 0.0, 1.0).write_bytes(&mut out);
        assert_eq!(out.len(), VertexRecord::SIZE);
        assert_eq!(&out[0..4], &(-64.0f32).to_le_bytes());
        assert_eq!(&out[4..8], &64.0f32.to_le_bytes());
        assert_eq!(&out[8..12], &0.0f32.to_le_bytes());
        assert_eq!(&out[12..16], &1.0f32.to_le_bytes());
        assert_eq!(out.as_slice(), VertexRecord::new(-64.0, 64.0, 0.0, 1.0).to_bytes().as_slice());
    }

    #[test] fn read_back_a_run() {
        let records = [VertexRecord::new(1.0, 2.0, 3.0, 4.0), VertexRecord::new(5.0, 6.0, 7.0, 8.0)];
        let mut bytes = records_to_bytes(&records);
        bytes.push(0xAA);
        assert_eq!(records_from_bytes(&bytes), records.to_vec());
        assert_eq!(VertexRecord::read_bytes(&bytes[..15]), None);
    }
}
