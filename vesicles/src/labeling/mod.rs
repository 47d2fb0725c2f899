//! Connected component labeling using union-find over run-length encoded rows.
//!
//! Each mask row is reduced to horizontal runs of set pixels. Runs are merged
//! with overlapping runs of the rows scanned before them:
//! - within a frame, the row above,
//! - across frames, the three nearest rows of the previous frame.
//!
//! Final labels are numbered 1..=n in raster order of each component's first
//! pixel (frame, then row, then column); 0 is background.


mod regions;

pub use regions::RegionProps;

use common::{BitBuffer2, Buffer2};

use crate::config::Connectivity;
use crate::error::{Error, Result};

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of set pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    /// Starting x coordinate (inclusive).
    start: u32,
    /// Ending x coordinate (exclusive).
    end: u32,
    /// Provisional label.
    label: u32,
}

/// Check if two runs in neighbouring rows touch.
///
/// `reach` is 0 for face adjacency and 1 when diagonal neighbours count.
#[inline]
fn runs_connected(prev: &Run, curr: &Run, reach: u32) -> bool {
    prev.start < curr.end + reach && prev.end + reach > curr.start
}

/// Extract the runs of row `y`, skipping empty words.
fn extract_runs(mask: &BitBuffer2, y: usize, runs: &mut Vec<Run>) {
    let width = mask.width();
    let row_start = y * width;
    let words = mask.words();

    let mut x = 0;
    while x < width {
        let idx = row_start + x;
        if idx % 64 == 0 && x + 64 <= width && words[idx / 64] == 0 {
            x += 64;
            continue;
        }
        if !mask.get(idx) {
            x += 1;
            continue;
        }
        let start = x;
        while x < width && mask.get(row_start + x) {
            x += 1;
        }
        runs.push(Run {
            start: start as u32,
            end: x as u32,
            label: 0,
        });
    }
}

// ============================================================================
// Union-find
// ============================================================================

#[derive(Debug, Default)]
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Merge `curr` with every touching run of `prev` (both sorted by x).
fn link_runs(uf: &mut UnionFind, prev: &[Run], curr: &Run, reach: u32) -> Option<u32> {
    let mut label = None;
    for p in prev {
        if p.start >= curr.end + reach {
            break;
        }
        if runs_connected(p, curr, reach) {
            match label {
                None => label = Some(p.label),
                Some(l) => uf.union(l, p.label),
            }
        }
    }
    label
}

// ============================================================================
// Core labeling
// ============================================================================

/// Label a stack of equally sized frames.
///
/// With a single frame this is plain 2D labeling. With several frames,
/// components connect across neighbouring frames as well.
fn label_frames(frames: &[BitBuffer2], connectivity: Connectivity) -> (Vec<u32>, usize) {
    let Some(first) = frames.first() else {
        return (Vec::new(), 0);
    };
    let (width, height) = first.dimensions();
    let plane = width * height;
    let reach = match connectivity {
        Connectivity::Four => 0,
        Connectivity::Eight => 1,
    };

    let mut uf = UnionFind::default();
    // rows[z * height + y]
    let mut rows: Vec<Vec<Run>> = Vec::with_capacity(frames.len() * height);

    for (z, frame) in frames.iter().enumerate() {
        for y in 0..height {
            let mut runs = Vec::new();
            extract_runs(frame, y, &mut runs);

            for run in runs.iter_mut() {
                let mut label = None;
                let mut neighbour = |row: &[Run], reach: u32, uf: &mut UnionFind| {
                    if let Some(l) = link_runs(uf, row, run, reach) {
                        match label {
                            None => label = Some(l),
                            Some(existing) => uf.union(existing, l),
                        }
                    }
                };

                if y > 0 {
                    neighbour(&rows[z * height + y - 1], reach, &mut uf);
                }
                if z > 0 {
                    let prev_plane = (z - 1) * height;
                    match connectivity {
                        Connectivity::Four => neighbour(&rows[prev_plane + y], 0, &mut uf),
                        Connectivity::Eight => {
                            for py in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                                neighbour(&rows[prev_plane + py], 1, &mut uf);
                            }
                        }
                    }
                }

                run.label = match label {
                    Some(l) => l,
                    None => uf.make_set(),
                };
            }
            rows.push(runs);
        }
    }

    // Flatten in raster order so labels follow first appearance
    let mut final_label = vec![0u32; uf.parent.len()];
    let mut num_labels = 0u32;
    let mut labels = vec![0u32; plane * frames.len()];

    for (row_idx, runs) in rows.iter().enumerate() {
        let offset = row_idx * width;
        for run in runs {
            let root = uf.find(run.label) as usize;
            if final_label[root] == 0 {
                num_labels += 1;
                final_label[root] = num_labels;
            }
            let label = final_label[root];
            labels[offset + run.start as usize..offset + run.end as usize].fill(label);
        }
    }

    (labels, num_labels as usize)
}

/// Check that every mask is `expected` = `(width, height)`.
pub(crate) fn check_mask_shapes(masks: &[BitBuffer2], expected: (usize, usize)) -> Result<()> {
    match masks
        .iter()
        .enumerate()
        .find(|(_, m)| m.dimensions() != expected)
    {
        Some((index, mask)) => Err(Error::ShapeMismatch {
            index,
            expected,
            actual: mask.dimensions(),
        }),
        None => Ok(()),
    }
}

// ============================================================================
// LabelMap
// ============================================================================

/// Labels of a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Buffer2<u32>,
    num_labels: usize,
}

impl LabelMap {
    pub fn from_mask(mask: &BitBuffer2, connectivity: Connectivity) -> Self {
        let (labels, num_labels) = label_frames(std::slice::from_ref(mask), connectivity);
        Self {
            labels: Buffer2::new(mask.width(), mask.height(), labels),
            num_labels,
        }
    }

    /// Number of connected components (excluding background).
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn labels(&self) -> &Buffer2<u32> {
        &self.labels
    }

    /// Pixel count per label, indexed by label (index 0 is background).
    pub fn areas(&self) -> Vec<usize> {
        let mut areas = vec![0usize; self.num_labels + 1];
        for &l in self.labels.iter() {
            areas[l as usize] += 1;
        }
        areas
    }
}

/// Clear every 4-connected component with fewer than `min_size` pixels.
pub fn remove_small_objects(mask: &BitBuffer2, min_size: usize) -> BitBuffer2 {
    if min_size == 0 {
        return mask.clone();
    }
    let label_map = LabelMap::from_mask(mask, Connectivity::Four);
    let areas = label_map.areas();

    let mut out = mask.clone();
    for (idx, &l) in label_map.labels().iter().enumerate() {
        if l != 0 && areas[l as usize] < min_size {
            out.set(idx, false);
        }
    }
    out
}

// ============================================================================
// LabelImage
// ============================================================================

/// Connected components of a whole mask stack.
///
/// `depth == 1` is the 2D case: the frame axis has been squeezed away and
/// [`LabelImage::shape`] reports `[height, width]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelImage {
    width: usize,
    height: usize,
    depth: usize,
    labels: Vec<u32>,
    num_labels: usize,
}

impl LabelImage {
    /// Label all frames together with full (8 / 26-neighbour) connectivity.
    pub fn from_masks(frames: &[BitBuffer2]) -> Result<Self> {
        Self::from_masks_with_connectivity(frames, Connectivity::Eight)
    }

    /// Fails with [`Error::ShapeMismatch`] if a frame differs in size from
    /// the first one.
    pub fn from_masks_with_connectivity(frames: &[BitBuffer2], connectivity: Connectivity) -> Result<Self> {
        let (width, height) = frames.first().map_or((0, 0), |f| f.dimensions());
        check_mask_shapes(frames, (width, height))?;

        let (labels, num_labels) = label_frames(frames, connectivity);
        Ok(Self {
            width,
            height,
            depth: frames.len(),
            labels,
            num_labels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames; 1 for a squeezed 2D image.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        self.depth > 1
    }

    /// `[height, width]` for 2D, `[depth, height, width]` for volumes.
    pub fn shape(&self) -> Vec<usize> {
        if self.is_volume() {
            vec![self.depth, self.height, self.width]
        } else {
            vec![self.height, self.width]
        }
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// Flat labels, frame-major then row-major.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.labels[(z * self.height + y) * self.width + x]
    }

    /// Labels of frame `z`.
    pub fn frame(&self, z: usize) -> &[u32] {
        let plane = self.width * self.height;
        &self.labels[z * plane..(z + 1) * plane]
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.labels
    }
}
