mod kinetic_energy;
mod potential_energy;
mod pressure;
mod temperature;

use std::fmt::Display;

use crate::{output::Value, AtomicPotentialTrait, Error, Result, Simulation};

/// A named scalar quantity that can be sampled from a simulation
#[derive(Clone, Debug, PartialEq)]
pub enum Compute {
    PotentialEnergy,
    /// Energy of one named pair potential
    PairEnergy(String),
    KineticEnergy,
    Temperature,
    Pressure,
    NumParticles,
    Volume,
    Momentum,
    TimeStep,
}
impl Compute {
    /// Resolves a log quantity name against the simulation's setup
    pub fn from_name(name: &str, sim: &Simulation) -> Result<Self> {
        let compute = match name {
            "potential_energy" => Compute::PotentialEnergy,
            "kinetic_energy" => Compute::KineticEnergy,
            "temperature" => Compute::Temperature,
            "pressure" => Compute::Pressure,
            "num_particles" => Compute::NumParticles,
            "volume" => Compute::Volume,
            "momentum" => Compute::Momentum,
            "time_step" | "timestep" => Compute::TimeStep,
            other => {
                let pair = other
                    .strip_prefix("pair_")
                    .and_then(|rest| rest.strip_suffix("_energy"));
                match (pair, sim.atomic_potential()) {
                    (Some(p), Some(potential)) if p == potential.name() => {
                        Compute::PairEnergy(p.to_string())
                    }
                    _ => {
                        return Err(Error::OutputError(format!(
                            "unknown log quantity {}",
                            name
                        )))
                    }
                }
            }
        };
        Ok(compute)
    }

    pub fn name(&self) -> String {
        match self {
            Compute::PotentialEnergy => "potential_energy".into(),
            Compute::PairEnergy(p) => format!("pair_{}_energy", p),
            Compute::KineticEnergy => "kinetic_energy".into(),
            Compute::Temperature => "temperature".into(),
            Compute::Pressure => "pressure".into(),
            Compute::NumParticles => "num_particles".into(),
            Compute::Volume => "volume".into(),
            Compute::Momentum => "momentum".into(),
            Compute::TimeStep => "time_step".into(),
        }
    }

    pub fn compute(&self, sim: &Simulation) -> Value {
        match self {
            Compute::PotentialEnergy | Compute::PairEnergy(_) => {
                Value::Float(potential_energy::compute(sim))
            }
            Compute::KineticEnergy => Value::Float(kinetic_energy::compute(sim)),
            Compute::Temperature => Value::Float(temperature::compute(sim)),
            Compute::Pressure => Value::Float(pressure::compute(sim)),
            Compute::NumParticles => Value::Usize(sim.atoms().num_atoms()),
            Compute::Volume => Value::Float(sim.container().volume()),
            Compute::Momentum => Value::Float(momentum(sim)),
            Compute::TimeStep => Value::Usize(sim.step()),
        }
    }
}
impl Display for Compute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name().fmt(f)
    }
}

/// Magnitude of the total momentum
fn momentum(sim: &Simulation) -> f64 {
    let atoms = sim.atoms();
    let mut p = [0.0; 3];
    for (i, v) in atoms.velocities().iter().enumerate() {
        let m = atoms.mass(i);
        p[0] += m * v[0];
        p[1] += m * v[1];
        p[2] += m * v[2];
    }
    (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
}

/// Translational degrees of freedom with the center of mass removed
pub(crate) fn degrees_of_freedom(num_atoms: usize) -> f64 {
    if num_atoms > 1 {
        (3 * num_atoms - 3) as f64
    } else {
        (3 * num_atoms) as f64
    }
}
