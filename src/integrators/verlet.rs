use super::{increment_position, increment_velocity_halfstep, IntegrationMethod};
use crate::Atoms;

/// Constant-energy velocity-Verlet integration
#[derive(Debug, Default)]
pub struct Nve {}

impl Nve {
    pub fn new() -> Self {
        Self {}
    }
}

impl IntegrationMethod for Nve {
    fn name(&self) -> &'static str {
        "nve"
    }
    fn first_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64) {
        for &i in idxs {
            increment_velocity_halfstep(atoms, i, &forces[i], dt);
            increment_position(atoms, i, dt);
        }
    }
    fn second_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64) {
        for &i in idxs {
            increment_velocity_halfstep(atoms, i, &forces[i], dt);
        }
    }
}
