//! Device buffer seam
//!
//! The uniform synchronizer only talks to memory through these traits. The
//! Vulkan implementation lives in [`super::vulkan`]; [`HostBufferHost`] keeps
//! everything in process memory and counts the calls a real device would see.

use ash::vk;

use super::{RenderError, RenderResult};

/// Allocator for device buffers
pub trait BufferHost {
    /// Buffer type produced by this host
    type Buffer: DeviceBuffer;

    /// `VkPhysicalDeviceLimits::minUniformBufferOffsetAlignment`
    fn min_uniform_buffer_offset_alignment(&self) -> u64;

    /// Create a buffer, optionally filled with `initial_data`
    ///
    /// The returned buffer is not mapped.
    fn create_buffer(
        &mut self,
        usage: vk::BufferUsageFlags,
        memory: vk::MemoryPropertyFlags,
        size: u64,
        initial_data: Option<&[u8]>,
    ) -> RenderResult<Self::Buffer>;
}

/// A buffer whose memory the host can map and write
pub trait DeviceBuffer {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Map the whole buffer into host memory
    fn map(&mut self) -> RenderResult<()>;

    /// Release the host mapping; no-op when unmapped
    fn unmap(&mut self);

    /// Whether the buffer is currently mapped
    fn is_mapped(&self) -> bool;

    /// Copy `bytes` into the mapping at `offset`
    fn write(&mut self, offset: u64, bytes: &[u8]) -> RenderResult<()>;

    /// Make `size` bytes at `offset` visible to the device
    fn flush(&mut self, size: u64, offset: u64) -> RenderResult<()>;
}

/// Check a mapped range against a buffer's size
pub(crate) fn check_range(offset: u64, len: u64, size: u64) -> RenderResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(RenderError::BufferOverflow { offset, len, size }),
    }
}

/// In-memory [`BufferHost`]
#[derive(Debug, Clone)]
pub struct HostBufferHost {
    min_alignment: u64,
    buffers_created: usize,
}

impl HostBufferHost {
    /// Create a host reporting the given offset alignment
    pub fn new(min_uniform_buffer_offset_alignment: u64) -> Self {
        Self {
            min_alignment: min_uniform_buffer_offset_alignment,
            buffers_created: 0,
        }
    }

    /// Number of buffers handed out so far
    pub fn buffers_created(&self) -> usize {
        self.buffers_created
    }
}

impl BufferHost for HostBufferHost {
    type Buffer = HostBuffer;

    fn min_uniform_buffer_offset_alignment(&self) -> u64 {
        self.min_alignment
    }

    fn create_buffer(
        &mut self,
        usage: vk::BufferUsageFlags,
        memory: vk::MemoryPropertyFlags,
        size: u64,
        initial_data: Option<&[u8]>,
    ) -> RenderResult<HostBuffer> {
        if initial_data.is_some() && !memory.contains(vk::MemoryPropertyFlags::HOST_VISIBLE) {
            return Err(RenderError::HostAccessRequired(memory));
        }

        let len = usize::try_from(size).map_err(|_| RenderError::BufferOverflow {
            offset: 0,
            len: size,
            size: usize::MAX as u64,
        })?;
        let mut data = vec![0; len];

        if let Some(initial) = initial_data {
            check_range(0, initial.len() as u64, size)?;
            data[..initial.len()].copy_from_slice(initial);
        }

        self.buffers_created += 1;
        log::debug!(
            "Host buffer #{} created: {size} bytes, {usage:?}, {memory:?}",
            self.buffers_created
        );

        Ok(HostBuffer {
            data,
            usage,
            memory,
            mapped: false,
            writes: 0,
            flushes: 0,
            flushed_ranges: Vec::new(),
        })
    }
}

/// In-memory [`DeviceBuffer`] that records writes and flushes
#[derive(Debug, Clone)]
pub struct HostBuffer {
    data: Vec<u8>,
    usage: vk::BufferUsageFlags,
    memory: vk::MemoryPropertyFlags,
    mapped: bool,
    writes: usize,
    flushes: usize,
    flushed_ranges: Vec<(u64, u64)>,
}

impl HostBuffer {
    /// Current contents
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Usage flags given at creation
    pub fn usage(&self) -> vk::BufferUsageFlags {
        self.usage
    }

    /// Memory properties given at creation
    pub fn memory_properties(&self) -> vk::MemoryPropertyFlags {
        self.memory
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of successful flushes
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// `(offset, size)` of every flush in call order
    pub fn flushed_ranges(&self) -> &[(u64, u64)] {
        &self.flushed_ranges
    }
}

impl DeviceBuffer for HostBuffer {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn map(&mut self) -> RenderResult<()> {
        if !self.memory.contains(vk::MemoryPropertyFlags::HOST_VISIBLE) {
            return Err(RenderError::HostAccessRequired(self.memory));
        }
        self.mapped = true;
        Ok(())
    }

    fn unmap(&mut self) {
        self.mapped = false;
    }

    fn is_mapped(&self) -> bool {
        self.mapped
    }

    fn write(&mut self, offset: u64, bytes: &[u8]) -> RenderResult<()> {
        if !self.mapped {
            return Err(RenderError::BufferNotMapped);
        }
        check_range(offset, bytes.len() as u64, self.size())?;

        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }

    fn flush(&mut self, size: u64, offset: u64) -> RenderResult<()> {
        if !self.mapped {
            return Err(RenderError::BufferNotMapped);
        }
        check_range(offset, size, self.size())?;

        self.flushes += 1;
        self.flushed_ranges.push((offset, size));
        Ok(())
    }
}
