use crate::Simulation;

pub(super) fn compute(sim: &Simulation) -> f64 {
    let atoms = sim.atoms();
    0.5 * atoms
        .velocities()
        .iter()
        .enumerate()
        .map(|(i, v)| atoms.mass(i) * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]))
        .sum::<f64>()
}
