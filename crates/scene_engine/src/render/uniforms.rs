//! Uniform data layouts and the dynamic uniform staging block

use super::{RenderError, RenderResult};
use crate::foundation::math::{Mat4, Mat4Ext, Vec4, MAT4_SIZE};
use crate::scene::Camera;

/// Default light position shared by every frame
pub const DEFAULT_LIGHT_POSITION: [f32; 4] = [1.25, 8.35, 0.0, 0.0];

/// Per-camera uniform data bound once per frame
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticUniformData {
    /// Projection matrix, column-major
    pub projection: [f32; 16],
    /// View matrix, column-major
    pub view: [f32; 16],
    /// World-space light position
    pub light_position: [f32; 4],
}

// repr(C) of f32 arrays only, no padding
unsafe impl bytemuck::Pod for StaticUniformData {}
unsafe impl bytemuck::Zeroable for StaticUniformData {}

impl StaticUniformData {
    /// Size in bytes as laid out in the static uniform buffer
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Capture a camera's matrices with the default light
    pub fn from_camera(camera: &Camera) -> Self {
        Self::from_matrices(camera.projection_matrix(), camera.view_matrix())
    }

    /// Build from explicit matrices with the default light
    pub fn from_matrices(projection: &Mat4, view: &Mat4) -> Self {
        let mut data = Self::default();
        data.projection.copy_from_slice(projection.as_column_slice());
        data.view.copy_from_slice(view.as_column_slice());
        data
    }

    /// Light position as a vector
    pub fn light(&self) -> Vec4 {
        Vec4::from(self.light_position)
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for StaticUniformData {
    fn default() -> Self {
        let identity = Mat4::identity();
        let mut projection = [0.0; 16];
        projection.copy_from_slice(identity.as_column_slice());
        Self {
            projection,
            view: projection,
            light_position: DEFAULT_LIGHT_POSITION,
        }
    }
}

/// Host-side staging copy of the dynamic uniform buffer
///
/// One slot per actor, each `slot_size` bytes. Only the first
/// [`MAT4_SIZE`] bytes of a slot carry data; the rest is alignment padding.
#[derive(Debug, Clone)]
pub struct DynamicUniformBlock {
    data: Vec<u8>,
    slot_size: usize,
    slot_count: usize,
}

impl DynamicUniformBlock {
    /// Zero-filled block of `slot_count` slots of `slot_size` bytes
    ///
    /// `slot_size` is clamped up to one matrix.
    pub fn new(slot_count: usize, slot_size: usize) -> Self {
        let slot_size = slot_size.max(MAT4_SIZE);
        Self {
            data: vec![0; slot_count * slot_size],
            slot_size,
            slot_count,
        }
    }

    /// Bytes per slot, padding included
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Total size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the block has no slots
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte offset of a slot, as passed for dynamic descriptor offsets
    pub fn slot_offset(&self, slot: usize) -> RenderResult<usize> {
        self.check(slot)?;
        Ok(slot * self.slot_size)
    }

    /// Bytes of one slot
    pub fn slot(&self, slot: usize) -> RenderResult<&[u8]> {
        let start = self.slot_offset(slot)?;
        Ok(&self.data[start..start + self.slot_size])
    }

    /// Mutable bytes of one slot
    pub fn slot_mut(&mut self, slot: usize) -> RenderResult<&mut [u8]> {
        let start = self.slot_offset(slot)?;
        Ok(&mut self.data[start..start + self.slot_size])
    }

    /// Store a model matrix at the start of a slot
    pub fn write_matrix(&mut self, slot: usize, matrix: &Mat4) -> RenderResult<()> {
        let bytes: &[u8] = bytemuck::cast_slice(matrix.as_column_slice());
        self.slot_mut(slot)?[..MAT4_SIZE].copy_from_slice(bytes);
        Ok(())
    }

    /// Matrix currently stored in a slot
    pub fn read_matrix(&self, slot: usize) -> RenderResult<Mat4> {
        let bytes = &self.slot(slot)?[..MAT4_SIZE];
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(Mat4::from_column_slice(&floats))
    }

    /// Whole block for upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn check(&self, slot: usize) -> RenderResult<()> {
        if slot < self.slot_count {
            Ok(())
        } else {
            Err(RenderError::SlotOutOfRange {
                slot,
                count: self.slot_count,
            })
        }
    }
}
