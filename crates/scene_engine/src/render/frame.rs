//! Swapchain pacing seam

use super::RenderResult;

/// Acquire/present cycle of the presentation engine
pub trait FramePacer {
    /// Index of the next image to render into
    fn acquire_next_image(&mut self) -> RenderResult<u32>;

    /// Queue `image_index` for presentation
    fn present(&mut self, image_index: u32) -> RenderResult<()>;
}

/// Pacer without a surface; cycles through a fixed number of images
#[derive(Debug, Clone)]
pub struct HeadlessPacer {
    image_count: u32,
    next: u32,
    presented: u64,
}

impl HeadlessPacer {
    /// Create a pacer over `image_count` images (at least one)
    pub fn new(image_count: u32) -> Self {
        Self {
            image_count: image_count.max(1),
            next: 0,
            presented: 0,
        }
    }

    /// Number of presented frames
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FramePacer for HeadlessPacer {
    fn acquire_next_image(&mut self) -> RenderResult<u32> {
        let image = self.next;
        self.next = (self.next + 1) % self.image_count;
        Ok(image)
    }

    fn present(&mut self, image_index: u32) -> RenderResult<()> {
        log::trace!("Presenting image {image_index}");
        self.presented += 1;
        Ok(())
    }
}
