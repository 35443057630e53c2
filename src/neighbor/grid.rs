use crate::{
    utils::{Axis, Index},
    Container,
};

/// Neighbor list grid of bins covering a periodic box
#[derive(Debug)]
pub struct Grid {
    lo_corner: [f64; 3],
    bin_size: [f64; 3],
    num_bins: [usize; 3],
}
impl Grid {
    /// Splits the box into as many bins as possible with edges no shorter
    /// than `min_bin_size`.
    pub fn new(container: &Container, min_bin_size: f64) -> Self {
        assert!(
            min_bin_size > 0.0,
            "Bin size should be positive, found {}",
            min_bin_size
        );
        let lengths = container.lengths();
        let mut num_bins = [1usize; 3];
        let mut bin_size = lengths;
        for axis in Axis::ALL {
            let i = axis.index();
            num_bins[i] = ((lengths[i] / min_bin_size).floor() as usize).max(1);
            bin_size[i] = lengths[i] / num_bins[i] as f64;
        }
        Self {
            lo_corner: container.rect().lo(),
            bin_size,
            num_bins,
        }
    }
    pub fn bin_size(&self) -> [f64; 3] {
        self.bin_size
    }
    pub fn num_bins(&self) -> [usize; 3] {
        self.num_bins
    }
    pub fn total_num_bins(&self) -> usize {
        self.num_bins.iter().product()
    }
    /// Whether the 27-bin stencil visits 27 distinct bins
    pub fn supports_stencil(&self) -> bool {
        self.num_bins.iter().all(|&n| n >= 3)
    }
    pub fn coord_to_index(&self, coord: &[f64; 3]) -> Index {
        let mut inds = [0i64; 3];
        for k in 0..3 {
            inds[k] = ((coord[k] - self.lo_corner[k]) / self.bin_size[k]).floor() as i64;
        }
        Index::from_3d_wrapped(&inds, &self.num_bins)
    }
    /// The bin itself and its 26 periodic neighbors
    pub fn stencil(&self, bin: Index) -> Vec<usize> {
        let [x, y, z] = bin.to_3d();
        let mut out = Vec::with_capacity(27);
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let inds = [x as i64 + dx, y as i64 + dy, z as i64 + dz];
                    out.push(Index::from_3d_wrapped(&inds, &self.num_bins).idx());
                }
            }
        }
        out
    }
}
