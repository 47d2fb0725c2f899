//! Synthetic images for tests.
//!
//! Frames are painted back to front: every shape overwrites what lies below.

use common::{BitBuffer2, Buffer2};

use crate::stack::Stack;

#[inline]
pub(crate) fn in_disk(x: usize, y: usize, cx: usize, cy: usize, radius: usize) -> bool {
    let dx = x.abs_diff(cx);
    let dy = y.abs_diff(cy);
    dx * dx + dy * dy <= radius * radius
}

pub(crate) fn disk_mask(width: usize, height: usize, cx: usize, cy: usize, radius: usize) -> BitBuffer2 {
    BitBuffer2::from_fn(width, height, |x, y| in_disk(x, y, cx, cy, radius))
}

/// Number of pixels in which two masks differ.
pub(crate) fn mismatch(a: &BitBuffer2, b: &BitBuffer2) -> usize {
    a.iter().zip(b.iter()).filter(|(p, q)| p != q).count()
}

/// Builder for a synthetic intensity frame.
#[derive(Debug, Clone)]
pub(crate) struct SyntheticFrame {
    frame: Buffer2<f64>,
}

impl SyntheticFrame {
    pub(crate) fn new(width: usize, height: usize, background: f64) -> Self {
        Self {
            frame: Buffer2::new_filled(width, height, background),
        }
    }

    pub(crate) fn disk(mut self, cx: usize, cy: usize, radius: usize, value: f64) -> Self {
        let (width, height) = self.frame.dimensions();
        for y in 0..height {
            for x in 0..width {
                if in_disk(x, y, cx, cy, radius) {
                    self.frame[(x, y)] = value;
                }
            }
        }
        self
    }

    /// Annulus with `inner < distance <= outer`.
    pub(crate) fn ring(self, cx: usize, cy: usize, inner: usize, outer: usize, value: f64) -> Self {
        let (width, height) = self.frame.dimensions();
        let mut frame = self.frame;
        for y in 0..height {
            for x in 0..width {
                if in_disk(x, y, cx, cy, outer) && !in_disk(x, y, cx, cy, inner) {
                    frame[(x, y)] = value;
                }
            }
        }
        Self { frame }
    }

    pub(crate) fn pixel(mut self, x: usize, y: usize, value: f64) -> Self {
        self.frame[(x, y)] = value;
        self
    }

    pub(crate) fn build(self) -> Buffer2<f64> {
        self.frame
    }

    /// `depth` copies of the frame as a stack.
    pub(crate) fn repeat(self, depth: usize) -> Stack<f64> {
        Stack::new(vec![self.frame; depth]).expect("synthetic stack")
    }
}
