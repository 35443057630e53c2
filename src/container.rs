use crate::{region::Rect, utils::Axis};

/// Boundary conditions for simulation box.
///
/// PP: Periodic (must be set for both sides)
/// FF: Fixed boundary, particles are neither wrapped nor imaged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BC {
    PP,
    FF,
}
impl BC {
    /// Check whether the boundary condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, BC::PP)
    }
}

/// Simulation box, represented by a rectangular box and boundary conditions
#[derive(Clone, Debug)]
pub struct Container {
    rect: Rect,
    bc: [BC; 3],
}
impl Container {
    // Creation

    /// Create a new container from a box and per-axis boundary conditions
    pub fn new(rect: Rect, bc: [BC; 3]) -> Self {
        Self { rect, bc }
    }
    /// Create a fully periodic container from a given rectangular box
    pub fn from_rect_periodic(rect: Rect) -> Self {
        Self {
            rect,
            bc: [BC::PP, BC::PP, BC::PP],
        }
    }

    // Getters
    /// Check whether the boundary condition along a given axis (X, Y, Z) is periodic
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.bc[axis.index()].is_periodic()
    }
    /// A reference to the rectangular box
    pub fn rect(&self) -> &Rect {
        &self.rect
    }
    pub fn lengths(&self) -> [f64; 3] {
        self.rect.lengths()
    }
    pub fn volume(&self) -> f64 {
        self.rect.volume()
    }

    /// Wraps a position back into the box along periodic axes, counting box
    /// crossings in `image`.
    pub fn wrap(&self, position: &mut [f64; 3], image: &mut [i32; 3]) {
        for axis in Axis::ALL {
            if !self.is_periodic(axis) {
                continue;
            }
            let i = axis.index();
            let [lo, hi] = self.rect.get_bounds(axis);
            let l = hi - lo;
            if position[i] >= hi || position[i] < lo {
                let shift = ((position[i] - lo) / l).floor();
                position[i] -= shift * l;
                image[i] += shift as i32;
                // Guard against rounding landing exactly on the upper face
                if position[i] >= hi {
                    position[i] -= l;
                    image[i] += 1;
                }
            }
        }
    }

    /// Applies the minimum image convention to a separation vector
    pub fn minimum_image(&self, dr: [f64; 3]) -> [f64; 3] {
        let mut out = dr;
        let lengths = self.lengths();
        for axis in Axis::ALL {
            if self.is_periodic(axis) {
                let i = axis.index();
                out[i] -= lengths[i] * (out[i] / lengths[i]).round();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn cube(l: f64) -> Container {
        Container::from_rect_periodic(Rect::centered([l, l, l]))
    }

    #[test]
    fn wrap_updates_images() {
        let container = cube(10.0);
        let mut pos = [5.5, -12.0, 1.0];
        let mut image = [0, 0, 0];
        container.wrap(&mut pos, &mut image);
        assert_relative_eq!(pos[0], -4.5);
        assert_relative_eq!(pos[1], -2.0);
        assert_relative_eq!(pos[2], 1.0);
        assert_eq!(image, [1, -1, 0]);
    }

    #[test]
    fn fixed_axes_are_left_alone() {
        let container = Container::new(Rect::centered([10.0, 10.0, 10.0]), [BC::PP, BC::FF, BC::PP]);
        let mut pos = [0.0, 7.0, 0.0];
        let mut image = [0, 0, 0];
        container.wrap(&mut pos, &mut image);
        assert_eq!(pos, [0.0, 7.0, 0.0]);
        assert_eq!(container.minimum_image([0.0, 9.0, 9.0]), [0.0, 9.0, -1.0]);
    }

    #[test]
    fn minimum_image_picks_nearest_copy() {
        let container = cube(10.0);
        let dr = container.minimum_image([6.0, -7.0, 4.0]);
        assert_relative_eq!(dr[0], -4.0);
        assert_relative_eq!(dr[1], 3.0);
        assert_relative_eq!(dr[2], 4.0);
    }
}
