use crate::Simulation;

pub(super) fn compute(sim: &Simulation) -> f64 {
    sim.force_result().potential_energy()
}
