use log::debug;

use super::{Grid, UpdateSettings};
use crate::{
    utils::{norm_squared, sub, Axis},
    Container, Error, Result,
};

/// Full neighbor list built from a cell list, with a skin so that it only
/// needs rebuilding after particles have moved.
#[derive(Debug)]
pub struct NeighborList {
    force_distance: f64,
    skin_distance: f64,
    update_settings: UpdateSettings,
    neighbors: Vec<Vec<usize>>,
    pos_at_prev_build: Vec<[f64; 3]>,
    built: bool,
    num_builds: usize,
}
impl NeighborList {
    pub fn new(force_distance: f64, skin_distance: f64) -> Result<Self> {
        let mut nl = Self {
            force_distance: 0.0,
            skin_distance: 0.0,
            update_settings: UpdateSettings::default(),
            neighbors: Vec::new(),
            pos_at_prev_build: Vec::new(),
            built: false,
            num_builds: 0,
        };
        nl.set_force_distance(force_distance)?;
        nl.set_skin_distance(skin_distance)?;
        Ok(nl)
    }

    // Getters
    pub fn neighbors(&self) -> &[Vec<usize>] {
        &self.neighbors
    }
    pub fn force_distance(&self) -> f64 {
        self.force_distance
    }
    pub fn skin_distance(&self) -> f64 {
        self.skin_distance
    }
    /// Radius within which pairs are listed
    pub fn neighbor_distance(&self) -> f64 {
        self.force_distance + self.skin_distance
    }
    pub fn update_settings(&self) -> &UpdateSettings {
        &self.update_settings
    }
    pub fn is_built(&self) -> bool {
        self.built
    }
    pub fn num_builds(&self) -> usize {
        self.num_builds
    }

    // Setters
    pub fn set_force_distance(&mut self, force_distance: f64) -> Result<()> {
        if !(force_distance > 0.0) {
            return Err(Error::NeighborListError(format!(
                "force cutoff distance should be positive, found {}",
                force_distance
            )));
        }
        self.force_distance = force_distance;
        self.invalidate();
        Ok(())
    }
    pub fn set_skin_distance(&mut self, skin_distance: f64) -> Result<()> {
        if !(skin_distance >= 0.0) {
            return Err(Error::NeighborListError(format!(
                "skin distance should be non-negative, found {}",
                skin_distance
            )));
        }
        self.skin_distance = skin_distance;
        self.invalidate();
        Ok(())
    }
    pub fn set_update_settings(&mut self, update_settings: UpdateSettings) {
        self.update_settings = update_settings;
    }
    /// Forces a rebuild on the next check
    pub fn invalidate(&mut self) {
        self.built = false;
        self.neighbors.clear();
        self.pos_at_prev_build.clear();
    }

    /// Rebuilds the list when it was never built, or when the update settings
    /// allow it and particles have moved far enough. Returns whether a rebuild
    /// happened.
    pub fn check_update(
        &mut self,
        step: usize,
        positions: &[[f64; 3]],
        container: &Container,
    ) -> bool {
        let must_build = !self.is_built() || self.pos_at_prev_build.len() != positions.len();
        let should_build = self.update_settings.should_update_neighbors(step)
            && (!self.update_settings.check() || self.atoms_moved_too_far(positions, container));
        if must_build || should_build {
            self.update(positions, container);
            self.update_settings.set_last_update_step(step);
            debug!("neighbor list rebuilt at step {} (build {})", step, self.num_builds);
            return true;
        }
        false
    }

    /// Unconditionally rebuilds the list
    pub fn update(&mut self, positions: &[[f64; 3]], container: &Container) {
        let rlist = self.neighbor_distance();
        let grid = Grid::new(container, rlist);
        let fully_periodic = Axis::ALL.iter().all(|&a| container.is_periodic(a));

        self.neighbors = if fully_periodic && grid.supports_stencil() {
            Self::build_binned(&grid, positions, container, rlist)
        } else {
            Self::build_all_pairs(positions, container, rlist)
        };
        self.pos_at_prev_build = positions.to_vec();
        self.built = true;
        self.num_builds += 1;
    }

    /// Bin index of each position on the list's grid, used for spatial sorting
    pub fn bin_indices(&self, positions: &[[f64; 3]], container: &Container) -> Vec<usize> {
        let grid = Grid::new(container, self.neighbor_distance());
        positions
            .iter()
            .map(|coord| grid.coord_to_index(coord).idx())
            .collect()
    }

    fn build_binned(
        grid: &Grid,
        positions: &[[f64; 3]],
        container: &Container,
        rlist: f64,
    ) -> Vec<Vec<usize>> {
        let rlist2 = rlist * rlist;
        let mut bins: Vec<Vec<usize>> = vec![Vec::new(); grid.total_num_bins()];
        let atom_bins: Vec<_> = positions.iter().map(|p| grid.coord_to_index(p)).collect();
        for (i, bin) in atom_bins.iter().enumerate() {
            bins[bin.idx()].push(i);
        }

        let mut neighbors = vec![Vec::new(); positions.len()];
        for (i, bin) in atom_bins.iter().enumerate() {
            for b in grid.stencil(*bin) {
                for &j in &bins[b] {
                    if i == j {
                        continue;
                    }
                    let dr = container.minimum_image(sub(&positions[i], &positions[j]));
                    if norm_squared(&dr) < rlist2 {
                        neighbors[i].push(j);
                    }
                }
            }
        }
        neighbors
    }

    fn build_all_pairs(
        positions: &[[f64; 3]],
        container: &Container,
        rlist: f64,
    ) -> Vec<Vec<usize>> {
        let rlist2 = rlist * rlist;
        let mut neighbors = vec![Vec::new(); positions.len()];
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dr = container.minimum_image(sub(&positions[i], &positions[j]));
                if norm_squared(&dr) < rlist2 {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }
        neighbors
    }

    fn atoms_moved_too_far(&self, positions: &[[f64; 3]], container: &Container) -> bool {
        let half_skin_dist = self.skin_distance * 0.5;
        let max_dist_sq = self
            .pos_at_prev_build
            .iter()
            .zip(positions.iter())
            .map(|(old, new)| norm_squared(&container.minimum_image(sub(new, old))))
            .reduce(f64::max);

        match max_dist_sq {
            Some(max_dist_sq) => max_dist_sq > half_skin_dist * half_skin_dist,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        region::{Rect, Region},
        BC,
    };

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn rejects_invalid_distances() {
        assert!(NeighborList::new(0.0, 0.4).is_err());
        assert!(NeighborList::new(2.5, -0.1).is_err());
    }

    #[test]
    fn binned_build_matches_all_pairs() {
        let rect = Rect::centered([12.0, 12.0, 12.0]);
        let container = Container::from_rect_periodic(rect.clone());
        let mut rng = StdRng::seed_from_u64(3);
        let positions: Vec<[f64; 3]> = (0..200).map(|_| rect.get_random_coord(&mut rng)).collect();

        let grid = Grid::new(&container, 2.9);
        assert!(grid.supports_stencil());
        let binned = NeighborList::build_binned(&grid, &positions, &container, 2.9);
        let brute = NeighborList::build_all_pairs(&positions, &container, 2.9);
        for (a, b) in binned.into_iter().zip(brute) {
            assert_eq!(sorted(a), sorted(b));
        }
    }

    #[test]
    fn pairs_across_periodic_faces_are_found() {
        let container = Container::from_rect_periodic(Rect::centered([10.0, 10.0, 10.0]));
        let mut nl = NeighborList::new(2.5, 0.4).unwrap();
        nl.update(&[[-4.8, 0.0, 0.0], [4.8, 0.0, 0.0], [0.0, 0.0, 0.0]], &container);
        assert_eq!(nl.neighbors()[0], vec![1]);
        assert_eq!(nl.neighbors()[1], vec![0]);
        assert!(nl.neighbors()[2].is_empty());
    }

    #[test]
    fn fixed_boundaries_use_all_pairs() {
        let container = Container::new(Rect::centered([10.0, 10.0, 10.0]), [BC::FF, BC::PP, BC::PP]);
        let mut nl = NeighborList::new(2.5, 0.4).unwrap();
        nl.update(&[[-4.8, 0.0, 0.0], [4.8, 0.0, 0.0]], &container);
        assert!(nl.neighbors()[0].is_empty());
    }

    #[test]
    fn rebuilds_only_after_moving_half_the_skin() {
        let container = Container::from_rect_periodic(Rect::centered([10.0, 10.0, 10.0]));
        let mut nl = NeighborList::new(2.5, 0.4).unwrap();
        let mut positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        assert!(nl.check_update(0, &positions, &container));
        positions[0][0] += 0.15;
        assert!(!nl.check_update(1, &positions, &container));
        positions[0][0] += 0.1;
        assert!(nl.check_update(2, &positions, &container));
        assert_eq!(nl.num_builds(), 2);

        nl.invalidate();
        assert!(!nl.is_built());
        assert!(nl.check_update(3, &positions, &container));
        assert_eq!(nl.num_builds(), 3);
    }
}
