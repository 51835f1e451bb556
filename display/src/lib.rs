macro_rules! color {
    ($r:expr, $g:expr, $b:expr) => {
        Color {
            r: $r,
            g: $g,
            b: $b,
        }
    };
}

mod color;
mod tv;


pub use crate::color::Color;
pub use crate::color::COLORS;
pub use crate::tv::{Frame, FrameHandle, TV, TV_HEIGHT, TV_WIDTH};
