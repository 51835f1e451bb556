use crate::color::Color;
use std::sync::{Arc, Mutex};

pub const TV_WIDTH: usize = 256;
pub const TV_HEIGHT: usize = 240;

/// A complete picture, never modified after it is published
#[derive(Clone)]
pub struct Frame {
    pixels: Box<[Color]>,
    /// 0 is the blank frame before the first vblank
    number: u64,
}

impl Frame {
    fn blank() -> Self {
        Self {
            pixels: vec![color!(0, 0, 0); TV_WIDTH * TV_HEIGHT].into_boxed_slice(),
            number: 0,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * TV_WIDTH + x]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// `TV_WIDTH * TV_HEIGHT * 3` bytes, row by row
    pub fn to_rgb24(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color.to_rgb()).collect()
    }
}

/// Read side of the TV, can be moved to other threads.
///
/// A reader only ever gets frames that the PPU finished.
#[derive(Clone)]
pub struct FrameHandle {
    latest: Arc<Mutex<Arc<Frame>>>,
}

impl FrameHandle {
    pub fn latest(&self) -> Arc<Frame> {
        match self.latest.lock() {
            Ok(frame) => frame.clone(),
            // the swap never panics in the middle, the slot is always whole
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

pub struct TV {
    /// A temporary buffer to holds the screen state while the PPU is drawing
    /// in the current frame
    building_pixels: Box<[Color; TV_WIDTH * TV_HEIGHT]>,

    frames_count: u64,

    published: Arc<Mutex<Arc<Frame>>>,
}

impl TV {
    pub fn new() -> Self {
        Self {
            building_pixels: Box::new([color!(0, 0, 0); TV_WIDTH * TV_HEIGHT]),
            frames_count: 0,
            published: Arc::new(Mutex::new(Arc::new(Frame::blank()))),
        }
    }

    pub fn frame_handle(&self) -> FrameHandle {
        FrameHandle {
            latest: self.published.clone(),
        }
    }

    /// number of frames published so far
    pub fn frames_count(&self) -> u64 {
        self.frames_count
    }

    /// update the pixel of the temporary buffer [`building_pixels`]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: &Color) {
        let index = y as usize * TV_WIDTH + x as usize;
        if let Some(pixel) = self.building_pixels.get_mut(index) {
            *pixel = *color;
        }
    }

    /// the PPU must call this at the start of `VBLANK`, copies the building
    /// buffer into a new [`Frame`] and replaces the shared one with it
    pub fn signal_end_of_frame(&mut self) {
        self.frames_count += 1;

        let frame = Arc::new(Frame {
            pixels: self.building_pixels.to_vec().into_boxed_slice(),
            number: self.frames_count,
        });

        match self.published.lock() {
            Ok(mut latest) => *latest = frame,
            Err(poisoned) => *poisoned.into_inner() = frame,
        }

        log::trace!("frame {} published", self.frames_count);
    }

    /// resets and zero all buffers
    pub fn reset(&mut self) {
        for pixel in self.building_pixels.iter_mut() {
            *pixel = color!(0, 0, 0);
        }
        self.frames_count = 0;

        match self.published.lock() {
            Ok(mut latest) => *latest = Arc::new(Frame::blank()),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(Frame::blank()),
        }
    }
}

impl Default for TV {
    fn default() -> Self {
        Self::new()
    }
}
