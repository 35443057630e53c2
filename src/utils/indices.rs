/// Linear index into a 3D grid of bins, row-major with z fastest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Index {
    idx: usize,
    bounds: [usize; 3],
}
impl Index {
    pub fn from_3d(indices: &[usize; 3], bounds: &[usize; 3]) -> Self {
        let [x, y, z] = *indices;
        let [nx, ny, nz] = *bounds;
        assert!(
            x < nx && y < ny && z < nz,
            "3D index {:?} out of bounds {:?}",
            indices,
            bounds
        );
        Self {
            idx: x * ny * nz + y * nz + z,
            bounds: *bounds,
        }
    }
    /// Builds an index from signed coordinates, wrapping them periodically
    pub fn from_3d_wrapped(indices: &[i64; 3], bounds: &[usize; 3]) -> Self {
        let wrapped = [
            indices[0].rem_euclid(bounds[0] as i64) as usize,
            indices[1].rem_euclid(bounds[1] as i64) as usize,
            indices[2].rem_euclid(bounds[2] as i64) as usize,
        ];
        Self::from_3d(&wrapped, bounds)
    }
    pub fn to_3d(&self) -> [usize; 3] {
        let z = self.idx % self.bounds[2];
        let q = self.idx / self.bounds[2];
        let y = q % self.bounds[1];
        let x = q / self.bounds[1];
        [x, y, z]
    }
    pub fn idx(&self) -> usize {
        self.idx
    }
    pub fn bounds(&self) -> [usize; 3] {
        self.bounds
    }
}
