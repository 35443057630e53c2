pub mod ljcut;
pub mod none;

pub use ljcut::{EnergyShift, LJCut, LjCoeff};
pub use none::None_;

use enum_dispatch::enum_dispatch;

use crate::{Atoms, Container, Result};

/// Per-particle output of a force evaluation
#[derive(Clone, Debug, Default)]
pub struct ForceResult {
    pub forces: Vec<[f64; 3]>,
    /// Potential energy attributed to each particle, half of each pair
    pub energies: Vec<f64>,
    /// Sum over pairs of r_ij . f_ij
    pub virial: f64,
}
impl ForceResult {
    pub fn zeros(num_atoms: usize) -> Self {
        Self {
            forces: vec![[0.0; 3]; num_atoms],
            energies: vec![0.0; num_atoms],
            virial: 0.0,
        }
    }
    pub fn potential_energy(&self) -> f64 {
        self.energies.iter().sum()
    }
}

#[enum_dispatch]
/// Trait for pairwise atomic potentials
pub trait AtomicPotentialTrait {
    /// Short name used for per-potential log quantities
    fn name(&self) -> &'static str;

    /// Get the maximum distance for effective interaction
    fn cutoff_distance(&self) -> f64;

    /// Resolve coefficients against the particle type table
    fn bind(&mut self, type_names: &[String]) -> Result<()>;

    /// Whether every type pair has coefficients after `bind`
    fn all_set(&self) -> bool;

    /// Compute the pairwise forces given a configuration of atoms
    fn compute(&self, atoms: &Atoms, neighbors: &[Vec<usize>], container: &Container)
        -> ForceResult;
}

#[enum_dispatch(AtomicPotentialTrait)]
pub enum AtomicPotential {
    LJCut,
    None_,
}
