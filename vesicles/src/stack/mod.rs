//! Intensity stacks: an ordered list of equally sized 2D frames.
//!
//! A single 2D image is a stack of length 1. The normalizer and the
//! maximum-intensity projection both operate on the whole stack.


use common::Buffer2;
use num_traits::AsPrimitive;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::math::min_max;

/// Frames indexed by time or z, all with the same `(width, height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    frames: Vec<Buffer2<T>>,
}

impl<T> Stack<T> {
    /// Build a stack, rejecting empty input and frames whose shape differs
    /// from the first one.
    pub fn new(frames: Vec<Buffer2<T>>) -> Result<Self> {
        let first = frames.first().ok_or(Error::EmptyStack)?;
        let expected = first.dimensions();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(Error::EmptyStack);
        }
        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != expected)
        {
            return Err(Error::ShapeMismatch {
                index,
                expected,
                actual: frame.dimensions(),
            });
        }
        Ok(Self { frames })
    }

    /// Treat a single 2D image as a stack of one frame.
    pub fn from_frame(frame: Buffer2<T>) -> Result<Self> {
        Self::new(vec![frame])
    }

    /// Split `depth` contiguous `height x width` planes of `data`.
    pub fn from_volume(width: usize, height: usize, depth: usize, data: Vec<T>) -> Result<Self> {
        let plane = width * height;
        if data.len() != plane * depth {
            return Err(Error::VolumeSize {
                expected: plane * depth,
                actual: data.len(),
            });
        }
        if plane == 0 {
            return Err(Error::EmptyStack);
        }
        let mut frames = Vec::with_capacity(depth);
        let mut rest = data;
        for _ in 0..depth {
            let tail = rest.split_off(plane);
            frames.push(Buffer2::new(width, height, rest));
            rest = tail;
        }
        Self::new(frames)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.frames[0].width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.frames[0].height()
    }

    /// Number of frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn frames(&self) -> &[Buffer2<T>] {
        &self.frames
    }

    #[inline]
    pub fn frame(&self, index: usize) -> &Buffer2<T> {
        &self.frames[index]
    }

    pub fn into_frames(self) -> Vec<Buffer2<T>> {
        self.frames
    }
}

/// Rescale the whole stack linearly so its global minimum maps to 0 and its
/// global maximum to 1.
///
/// A stack whose finite samples are all equal has no range to rescale; it
/// normalizes to all zeros. Non-finite samples are ignored when computing the
/// range and come out as 0.
///
/// Output samples are `f64`, so the histogram used for thresholding sees the
/// same values as a double precision `(v - min) / (max - min)`.
pub fn normalize<T>(stack: &Stack<T>) -> Stack<f64>
where
    T: AsPrimitive<f64> + Sync,
{
    let range = min_max(
        stack
            .frames
            .iter()
            .flat_map(|frame| frame.iter().map(|v| v.as_())),
    );

    let (lo, range) = match range {
        Some((lo, hi)) if hi > lo => (lo, Some(hi - lo)),
        _ => {
            tracing::warn!(
                frames = stack.depth(),
                "Uniform stack, normalizing to all zeros"
            );
            (0.0, None)
        }
    };

    let frames = stack
        .frames
        .par_iter()
        .map(|frame| {
            frame.map(|v| {
                let v: f64 = v.as_();
                match range {
                    Some(range) if v.is_finite() => (v - lo) / range,
                    _ => 0.0,
                }
            })
        })
        .collect();

    Stack { frames }
}

/// Element-wise maximum over all frames.
pub fn max_projection(stack: &Stack<f64>) -> Buffer2<f64> {
    let mut projection = stack.frames[0].clone();
    for frame in &stack.frames[1..] {
        for (p, &v) in projection.iter_mut().zip(frame.iter()) {
            *p = p.max(v);
        }
    }
    projection
}
