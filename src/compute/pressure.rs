use super::kinetic_energy;
use crate::Simulation;

/// Virial pressure, P = (2 KE + W) / (3 V)
pub(super) fn compute(sim: &Simulation) -> f64 {
    let ke = kinetic_energy::compute(sim);
    let virial = sim.force_result().virial;
    (2.0 * ke + virial) / (3.0 * sim.container().volume())
}
