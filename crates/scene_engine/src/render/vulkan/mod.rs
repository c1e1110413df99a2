//! Vulkan implementation of the buffer seam
//!
//! Instance, device and physical device selection belong to the external
//! bootstrap; this module only allocates and maps buffer memory on a device
//! it is handed.

mod buffer;

pub use buffer::{VulkanBuffer, VulkanBufferHost};

use ash::vk;

use super::RenderError;

/// Attach the failed operation's name to a Vulkan result
pub(crate) fn vk_error(operation: &'static str) -> impl FnOnce(vk::Result) -> RenderError {
    move |result| RenderError::Vulkan { operation, result }
}
