//! Buffer management on a Vulkan device
//!
//! Memory follows RAII: a [`VulkanBuffer`] unmaps, destroys and frees itself
//! on drop.

use std::ffi::c_void;
use std::ptr::NonNull;

use ash::{vk, Device, Instance};

use super::vk_error;
use crate::render::buffer::{check_range, BufferHost, DeviceBuffer};
use crate::render::{RenderError, RenderResult};

/// [`BufferHost`] backed by an `ash` logical device
pub struct VulkanBufferHost {
    device: Device,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    min_uniform_buffer_offset_alignment: u64,
}

impl VulkanBufferHost {
    /// Query the physical device once and wrap the logical device
    pub fn new(instance: &Instance, physical_device: vk::PhysicalDevice, device: Device) -> Self {
        let (properties, memory_properties) = unsafe {
            (
                instance.get_physical_device_properties(physical_device),
                instance.get_physical_device_memory_properties(physical_device),
            )
        };
        let min_alignment = properties.limits.min_uniform_buffer_offset_alignment;

        log::debug!(
            "Vulkan buffer host: {} memory types, min uniform offset alignment {}",
            memory_properties.memory_type_count,
            min_alignment
        );

        Self {
            device,
            memory_properties,
            min_uniform_buffer_offset_alignment: min_alignment,
        }
    }

    /// Index of the first memory type allowed by `type_filter` with all `properties`
    fn find_memory_type(
        &self,
        type_filter: u32,
        properties: vk::MemoryPropertyFlags,
    ) -> RenderResult<u32> {
        (0..self.memory_properties.memory_type_count)
            .find(|&i| {
                type_filter & (1 << i) != 0
                    && self.memory_properties.memory_types[i as usize]
                        .property_flags
                        .contains(properties)
            })
            .ok_or(RenderError::NoSuitableMemoryType)
    }
}

impl BufferHost for VulkanBufferHost {
    type Buffer = VulkanBuffer;

    fn min_uniform_buffer_offset_alignment(&self) -> u64 {
        self.min_uniform_buffer_offset_alignment
    }

    fn create_buffer(
        &mut self,
        usage: vk::BufferUsageFlags,
        memory: vk::MemoryPropertyFlags,
        size: u64,
        initial_data: Option<&[u8]>,
    ) -> RenderResult<VulkanBuffer> {
        if initial_data.is_some() && !memory.contains(vk::MemoryPropertyFlags::HOST_VISIBLE) {
            return Err(RenderError::HostAccessRequired(memory));
        }

        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe { self.device.create_buffer(&buffer_info, None) }
            .map_err(vk_error("create buffer"))?;

        let requirements = unsafe { self.device.get_buffer_memory_requirements(buffer) };
        let memory_type_index = match self.find_memory_type(requirements.memory_type_bits, memory) {
            Ok(index) => index,
            Err(err) => {
                unsafe { self.device.destroy_buffer(buffer, None) };
                return Err(err);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        let device_memory = match unsafe { self.device.allocate_memory(&alloc_info, None) } {
            Ok(device_memory) => device_memory,
            Err(result) => {
                unsafe { self.device.destroy_buffer(buffer, None) };
                return Err(vk_error("allocate memory")(result));
            }
        };

        // From here on Drop releases the buffer and its memory
        let mut created = VulkanBuffer {
            device: self.device.clone(),
            buffer,
            memory: device_memory,
            size,
            coherent: memory.contains(vk::MemoryPropertyFlags::HOST_COHERENT),
            mapped: None,
        };

        unsafe { self.device.bind_buffer_memory(buffer, device_memory, 0) }
            .map_err(vk_error("bind buffer memory"))?;

        if let Some(data) = initial_data {
            created.map()?;
            created.write(0, data)?;
            if !created.coherent {
                created.flush(vk::WHOLE_SIZE, 0)?;
            }
            created.unmap();
        }

        log::debug!("Vulkan buffer created: {size} bytes, {usage:?}, {memory:?}");
        Ok(created)
    }
}

/// Buffer and its dedicated memory allocation
pub struct VulkanBuffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
    coherent: bool,
    mapped: Option<NonNull<c_void>>,
}

impl VulkanBuffer {
    /// Buffer handle for descriptor and draw binding
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Whether writes are visible to the device without a flush
    pub fn is_coherent(&self) -> bool {
        self.coherent
    }
}

impl DeviceBuffer for VulkanBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn map(&mut self) -> RenderResult<()> {
        if self.mapped.is_some() {
            return Ok(());
        }
        let ptr = unsafe {
            self.device
                .map_memory(self.memory, 0, vk::WHOLE_SIZE, vk::MemoryMapFlags::empty())
        }
        .map_err(vk_error("map memory"))?;
        self.mapped = NonNull::new(ptr);
        if self.mapped.is_none() {
            return Err(RenderError::BufferNotMapped);
        }
        Ok(())
    }

    fn unmap(&mut self) {
        if self.mapped.take().is_some() {
            unsafe { self.device.unmap_memory(self.memory) };
        }
    }

    fn is_mapped(&self) -> bool {
        self.mapped.is_some()
    }

    fn write(&mut self, offset: u64, bytes: &[u8]) -> RenderResult<()> {
        let mapped = self.mapped.ok_or(RenderError::BufferNotMapped)?;
        check_range(offset, bytes.len() as u64, self.size)?;

        unsafe {
            let dst = mapped.as_ptr().cast::<u8>().add(offset as usize);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
        }
        Ok(())
    }

    fn flush(&mut self, size: u64, offset: u64) -> RenderResult<()> {
        if self.mapped.is_none() {
            return Err(RenderError::BufferNotMapped);
        }
        if size != vk::WHOLE_SIZE {
            check_range(offset, size, self.size)?;
        }

        // A range ending at the buffer end is passed as VK_WHOLE_SIZE so it
        // satisfies nonCoherentAtomSize rounding
        let size = if size != vk::WHOLE_SIZE && offset + size == self.size {
            vk::WHOLE_SIZE
        } else {
            size
        };

        let range = vk::MappedMemoryRange::builder()
            .memory(self.memory)
            .offset(offset)
            .size(size)
            .build();

        unsafe { self.device.flush_mapped_memory_ranges(&[range]) }
            .map_err(vk_error("flush mapped memory ranges"))
    }
}

impl Drop for VulkanBuffer {
    fn drop(&mut self) {
        self.unmap();
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}
