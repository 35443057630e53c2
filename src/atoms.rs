use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::{atom_type::AtomType, utils, Error, Result};

/// Particle properties during simulation, not including forces
#[derive(Clone, Debug, Default)]
pub struct Atoms {
    pub tags: Vec<usize>,
    pub types: Vec<usize>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
    pub images: Vec<[i32; 3]>,
    atom_types: Vec<AtomType>,
}
impl Atoms {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn num_atoms(&self) -> usize {
        self.tags.len()
    }
    pub fn tags(&self) -> &[usize] {
        &self.tags
    }
    pub fn types(&self) -> &[usize] {
        &self.types
    }
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }
    pub fn velocities(&self) -> &[[f64; 3]] {
        &self.velocities
    }
    pub fn images(&self) -> &[[i32; 3]] {
        &self.images
    }
    pub fn mass(&self, idx: usize) -> f64 {
        self.atom_types[self.types[idx]].mass()
    }
    pub fn atom_types(&self) -> &[AtomType] {
        &self.atom_types
    }
    pub fn num_types(&self) -> usize {
        self.atom_types.len()
    }
    pub fn type_names(&self) -> Vec<String> {
        self.atom_types.iter().map(|t| t.name().to_string()).collect()
    }
    pub fn type_id(&self, name: &str) -> Option<usize> {
        self.atom_types.iter().position(|t| t.name() == name)
    }
    /// Storage index of each tag, in tag order
    pub fn tag_to_idx(&self) -> Vec<usize> {
        let max_tag = self.tags.iter().max().map_or(0, |t| t + 1);
        let mut rtag = vec![usize::MAX; max_tag];
        for (idx, &tag) in self.tags.iter().enumerate() {
            rtag[tag] = idx;
        }
        rtag
    }

    /// Registers a particle type, returning its index. Re-adding an existing
    /// name returns the existing index if the properties match.
    pub fn add_atom_type(&mut self, atom_type: AtomType) -> Result<usize> {
        if let Some(id) = self.type_id(atom_type.name()) {
            if self.atom_types[id] != atom_type {
                return Err(Error::LatticeError(format!(
                    "type {} already exists with different properties",
                    atom_type.name()
                )));
            }
            return Ok(id);
        }
        self.atom_types.push(atom_type);
        Ok(self.atom_types.len() - 1)
    }

    pub fn add_atoms(&mut self, atom_type: usize, coords: &[[f64; 3]]) {
        assert!(atom_type < self.num_types(), "Invalid atom type {}", atom_type);
        let num_atoms = coords.len();
        let atom_id = self.tags.iter().max().map_or(0, |j| j + 1);
        self.tags.extend(atom_id..atom_id + num_atoms);
        self.types.extend(std::iter::repeat(atom_type).take(num_atoms));
        self.positions.extend_from_slice(coords);
        self.velocities
            .extend(std::iter::repeat([0.0, 0.0, 0.0]).take(num_atoms));
        self.images.extend(std::iter::repeat([0, 0, 0]).take(num_atoms));
    }
    /// Draws velocities from the Maxwell-Boltzmann distribution at `kt` and
    /// removes the center of mass momentum.
    pub fn set_temperature<R: Rng + ?Sized>(&mut self, kt: f64, rng: &mut R) -> Result<()> {
        if kt < 0.0 {
            return Err(Error::IntegratorError(format!(
                "temperature should be non-negative, found {}",
                kt
            )));
        }
        let n = self.num_atoms();
        for i in 0..n {
            let scale = (kt / self.mass(i)).sqrt();
            let mut v = [0.0; 3];
            for vk in v.iter_mut() {
                let xi: f64 = StandardNormal.sample(rng);
                *vk = scale * xi;
            }
            self.velocities[i] = v;
        }
        if n == 0 {
            return Ok(());
        }

        let total_mass: f64 = (0..n).map(|i| self.mass(i)).sum();
        let mut momentum = [0.0; 3];
        for i in 0..n {
            for k in 0..3 {
                momentum[k] += self.mass(i) * self.velocities[i][k];
            }
        }
        for v in self.velocities.iter_mut() {
            for k in 0..3 {
                v[k] -= momentum[k] / total_mass;
            }
        }
        Ok(())
    }

    /// Reorders particle storage by bin so that spatially close particles are
    /// close in memory. Tags travel with their particles.
    pub fn sort_atoms_by_bin(&mut self, bin_indices: &[usize]) {
        assert_eq!(bin_indices.len(), self.num_atoms());
        let sort_indices = utils::get_sort_indices(bin_indices);

        utils::permute(&sort_indices, &mut self.tags);
        utils::permute(&sort_indices, &mut self.types);
        utils::permute(&sort_indices, &mut self.positions);
        utils::permute(&sort_indices, &mut self.velocities);
        utils::permute(&sort_indices, &mut self.images);
    }
}
