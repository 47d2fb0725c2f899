//! Per-component statistics over a [`LabelImage`].

use super::LabelImage;

/// Size, centre and extent of one labeled component.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProps {
    pub label: u32,
    /// Pixel (2D) or voxel (3D) count.
    pub area: usize,
    /// Mean coordinate as `[z, y, x]`; `z` is 0 for a 2D image.
    pub centroid: [f64; 3],
    /// Inclusive `[z, y, x]` minimum corner.
    pub bbox_min: [usize; 3],
    /// Inclusive `[z, y, x]` maximum corner.
    pub bbox_max: [usize; 3],
}

impl RegionProps {
    fn new(label: u32) -> Self {
        Self {
            label,
            area: 0,
            centroid: [0.0; 3],
            bbox_min: [usize::MAX; 3],
            bbox_max: [0; 3],
        }
    }

    fn add(&mut self, coord: [usize; 3]) {
        self.area += 1;
        for axis in 0..3 {
            // Accumulate sums, divided in `finish`
            self.centroid[axis] += coord[axis] as f64;
            self.bbox_min[axis] = self.bbox_min[axis].min(coord[axis]);
            self.bbox_max[axis] = self.bbox_max[axis].max(coord[axis]);
        }
    }

    fn finish(&mut self) {
        let n = self.area as f64;
        for c in &mut self.centroid {
            *c /= n;
        }
    }

    /// Bounding box extent per axis as `[depth, height, width]`.
    pub fn extent(&self) -> [usize; 3] {
        [
            self.bbox_max[0] - self.bbox_min[0] + 1,
            self.bbox_max[1] - self.bbox_min[1] + 1,
            self.bbox_max[2] - self.bbox_min[2] + 1,
        ]
    }
}

impl LabelImage {
    /// Statistics for labels `1..=num_labels`, in label order.
    pub fn regions(&self) -> Vec<RegionProps> {
        let mut regions: Vec<RegionProps> = (1..=self.num_labels as u32).map(RegionProps::new).collect();
        let plane = self.width * self.height;
        if plane == 0 {
            return regions;
        }

        for (idx, &label) in self.labels.iter().enumerate() {
            if label == 0 {
                continue;
            }
            let z = idx / plane;
            let rem = idx % plane;
            regions[label as usize - 1].add([z, rem / self.width, rem % self.width]);
        }

        regions.iter_mut().for_each(RegionProps::finish);
        regions
    }
}
