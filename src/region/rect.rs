use rand::Rng;

use super::Region;
use crate::utils::Axis;

/// Axis-aligned rectangular box
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    lo: [f64; 3],
    hi: [f64; 3],
}
impl Rect {
    pub fn new(xlo: f64, xhi: f64, ylo: f64, yhi: f64, zlo: f64, zhi: f64) -> Self {
        assert!(
            xlo < xhi && ylo < yhi && zlo < zhi,
            "Lower bounds should be less than upper bounds"
        );
        Self {
            lo: [xlo, ylo, zlo],
            hi: [xhi, yhi, zhi],
        }
    }
    /// Box of the given edge lengths centered on the origin
    pub fn centered(lengths: [f64; 3]) -> Self {
        let [lx, ly, lz] = lengths;
        Self::new(-0.5 * lx, 0.5 * lx, -0.5 * ly, 0.5 * ly, -0.5 * lz, 0.5 * lz)
    }
    pub fn lo(&self) -> [f64; 3] {
        self.lo
    }
    pub fn hi(&self) -> [f64; 3] {
        self.hi
    }
    pub fn get_bounds(&self, axis: Axis) -> [f64; 2] {
        [self.lo[axis.index()], self.hi[axis.index()]]
    }
    pub fn lengths(&self) -> [f64; 3] {
        [self.lx(), self.ly(), self.lz()]
    }
    pub fn lx(&self) -> f64 {
        self.hi[0] - self.lo[0]
    }
    pub fn ly(&self) -> f64 {
        self.hi[1] - self.lo[1]
    }
    pub fn lz(&self) -> f64 {
        self.hi[2] - self.lo[2]
    }
    pub fn volume(&self) -> f64 {
        self.lx() * self.ly() * self.lz()
    }
}
impl Region for Rect {
    fn contains(&self, coord: &[f64; 3]) -> bool {
        (0..3).all(|i| self.lo[i] <= coord[i] && coord[i] <= self.hi[i])
    }
    fn bounding_box(&self) -> &Rect {
        self
    }
    fn get_random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        [
            rng.gen::<f64>() * self.lx() + self.lo[0],
            rng.gen::<f64>() * self.ly() + self.lo[1],
            rng.gen::<f64>() * self.lz() + self.lo[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn centered_box_spans_origin() {
        let rect = Rect::centered([10.0, 10.0, 4.0]);
        assert_eq!(rect.lo(), [-5.0, -5.0, -2.0]);
        assert_eq!(rect.volume(), 400.0);
        assert!(rect.contains(&[0.0, 0.0, 0.0]));
        assert!(!rect.contains(&[0.0, 0.0, 2.5]));
    }

    #[test]
    fn random_coords_fall_inside() {
        let rect = Rect::new(1.0, 2.0, 3.0, 5.0, -1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(rect.contains(&rect.get_random_coord(&mut rng)));
        }
    }
}
