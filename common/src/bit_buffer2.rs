//! Binary masks stored one bit per pixel.
//!
//! Cell masks, vesicle masks and every intermediate morphology result use
//! this type. Set algebra (`and_assign`, `or_assign`, `invert`) runs a whole
//! `u64` word at a time.

const WORD_BITS: usize = 64;

/// Row-major binary mask, bit `i` of the image lives in word `i / 64` at
/// position `i % 64`.
///
/// Bits past `width * height` in the last word stay clear so word-level
/// counts never see padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer2 {
    words: Vec<u64>,
    width: usize,
    height: usize,
    len: usize,
}

impl BitBuffer2 {
    pub fn new_filled(width: usize, height: usize, value: bool) -> Self {
        let len = width * height;
        let word = if value { u64::MAX } else { 0 };
        let mut buffer = Self {
            words: vec![word; len.div_ceil(WORD_BITS)],
            width,
            height,
            len,
        };
        buffer.clear_padding();
        buffer
    }

    /// All pixels background.
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, false)
    }

    /// Pack a row-major slice of `width * height` booleans.
    pub fn from_slice(width: usize, height: usize, data: &[bool]) -> Self {
        assert!(
            data.len() == width * height,
            "mask of {width}x{height} needs {} values, got {}",
            width * height,
            data.len()
        );
        let words = data
            .chunks(WORD_BITS)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u64, |word, (bit, &set)| word | ((set as u64) << bit))
            })
            .collect();
        Self {
            words,
            width,
            height,
            len: data.len(),
        }
    }

    /// Evaluate `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut buffer = Self::new_default(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    buffer.set(y * width + x, true);
                }
            }
        }
        buffer
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels, `width * height`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        (self.words[idx / WORD_BITS] >> (idx % WORD_BITS)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        let bit = 1u64 << (idx % WORD_BITS);
        if value {
            self.words[idx / WORD_BITS] |= bit;
        } else {
            self.words[idx / WORD_BITS] &= !bit;
        }
    }

    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width, "x {x} out of {}", self.width);
        self.get(x + y * self.width)
    }

    #[inline]
    pub fn set_xy(&mut self, x: usize, y: usize, value: bool) {
        debug_assert!(x < self.width, "x {x} out of {}", self.width);
        self.set(x + y * self.width, value);
    }

    pub fn fill(&mut self, value: bool) {
        self.words.fill(if value { u64::MAX } else { 0 });
        self.clear_padding();
    }

    /// Packed storage, least significant bit first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Number of foreground pixels.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// `true` when no bit is set.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// In-place intersection with `other`.
    pub fn and_assign(&mut self, other: &Self) {
        self.assert_same_shape(other);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
        }
    }

    /// In-place union with `other`.
    pub fn or_assign(&mut self, other: &Self) {
        self.assert_same_shape(other);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// Flip every bit.
    pub fn invert(&mut self) {
        for w in self.words.iter_mut() {
            *w = !*w;
        }
        self.clear_padding();
    }

    /// `true` when every set bit of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.assert_same_shape(other);
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Pixel values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }

    fn assert_same_shape(&self, other: &Self) {
        assert_eq!(self.width, other.width, "width mismatch");
        assert_eq!(self.height, other.height, "height mismatch");
    }

    fn clear_padding(&mut self) {
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}
