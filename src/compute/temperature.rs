use super::{degrees_of_freedom, kinetic_energy};
use crate::Simulation;

pub(super) fn compute(sim: &Simulation) -> f64 {
    let dof = degrees_of_freedom(sim.atoms().num_atoms());
    if dof == 0.0 {
        return 0.0;
    }
    2.0 * kinetic_energy::compute(sim) / dof
}
