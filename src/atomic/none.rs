use super::{AtomicPotentialTrait, ForceResult};
use crate::{Atoms, Container, Result};

/// Non-interacting particles
#[derive(Debug, Default)]
pub struct None_ {}
impl None_ {
    pub fn new() -> Self {
        Self {}
    }
}
impl AtomicPotentialTrait for None_ {
    fn name(&self) -> &'static str {
        "none"
    }
    fn cutoff_distance(&self) -> f64 {
        0.0
    }
    fn bind(&mut self, _type_names: &[String]) -> Result<()> {
        Ok(())
    }
    fn all_set(&self) -> bool {
        true
    }
    fn compute(&self, atoms: &Atoms, _neighbors: &[Vec<usize>], _container: &Container) -> ForceResult {
        ForceResult::zeros(atoms.num_atoms())
    }
}
