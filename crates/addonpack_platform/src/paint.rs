//! Plain-data description of a frame: a clear color and solid rectangles.
//! The surface crate turns this into an actual render pass, so the scene
//! and the device trait stay free of GPU types.

/// RGBA, each channel in `0.0..=1.0`.
pub type Color = [f32; 4];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// Everything drawn in one frame, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePaint {
    pub clear: Color,
    pub rects: Vec<PaintRect>,
}

impl FramePaint {
    pub fn new(clear: Color) -> Self {
        Self {
            clear,
            rects: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.rects.push(PaintRect {
            x,
            y,
            width,
            height,
            color,
        });
    }
}

impl Default for FramePaint {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0, 1.0])
    }
}
