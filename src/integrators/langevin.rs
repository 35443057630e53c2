use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use super::{increment_position, increment_velocity_halfstep, IntegrationMethod};
use crate::{Atoms, Error, Result};

/// Velocity-Verlet with a Langevin thermostat.
///
/// The second half-kick adds a drag `-gamma v` and a random force of variance
/// `2 gamma kT / dt`, coupling the group to a heat bath at `kT`. That bath
/// force is kept per tag and also applied in the next first half-kick, so it
/// acts over the full time step.
#[derive(Debug)]
pub struct Langevin {
    kt: f64,
    seed: u64,
    default_gamma: f64,
    gamma_by_name: HashMap<String, f64>,
    /// Gamma is `lambda * diameter` when set
    dscale: Option<f64>,
    gamma_by_type: Vec<f64>,
    /// Drag plus random force from the last second step, indexed by tag
    bath_forces: Vec<[f64; 3]>,
    rng: StdRng,
}

impl Langevin {
    pub fn new(kt: f64, seed: u64) -> Result<Self> {
        if !(kt >= 0.0) {
            return Err(Error::IntegratorError(format!(
                "kT should be non-negative, found {}",
                kt
            )));
        }
        Ok(Self {
            kt,
            seed,
            default_gamma: 1.0,
            gamma_by_name: HashMap::new(),
            dscale: None,
            gamma_by_type: Vec::new(),
            bath_forces: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }
    pub fn kt(&self) -> f64 {
        self.kt
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn set_kt(&mut self, kt: f64) -> Result<()> {
        if !(kt >= 0.0) {
            return Err(Error::IntegratorError(format!(
                "kT should be non-negative, found {}",
                kt
            )));
        }
        self.kt = kt;
        Ok(())
    }
    /// Drag coefficient for one particle type
    pub fn set_gamma(&mut self, type_name: &str, gamma: f64) -> Result<()> {
        if !(gamma >= 0.0) {
            return Err(Error::IntegratorError(format!(
                "gamma for type {} should be non-negative, found {}",
                type_name, gamma
            )));
        }
        self.gamma_by_name.insert(type_name.to_string(), gamma);
        self.gamma_by_type.clear();
        Ok(())
    }
    /// Derive gamma from particle diameters instead of per-type values
    pub fn set_dscale(&mut self, lambda: f64) -> Result<()> {
        if !(lambda > 0.0) {
            return Err(Error::IntegratorError(format!(
                "dscale should be positive, found {}",
                lambda
            )));
        }
        self.dscale = Some(lambda);
        self.gamma_by_type.clear();
        Ok(())
    }
}

impl IntegrationMethod for Langevin {
    fn name(&self) -> &'static str {
        "langevin"
    }
    fn bind(&mut self, atoms: &Atoms) -> Result<()> {
        if let Some(unknown) = self
            .gamma_by_name
            .keys()
            .find(|name| atoms.type_id(name).is_none())
        {
            return Err(Error::IntegratorError(format!(
                "gamma set for unknown particle type {}",
                unknown
            )));
        }
        self.gamma_by_type = atoms
            .atom_types()
            .iter()
            .map(|t| match self.dscale {
                Some(lambda) => lambda * t.diameter(),
                None => *self.gamma_by_name.get(t.name()).unwrap_or(&self.default_gamma),
            })
            .collect();
        let num_tags = atoms.tags().iter().max().map_or(0, |t| t + 1);
        self.bath_forces.resize(num_tags, [0.0; 3]);
        Ok(())
    }
    fn first_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64) {
        for &i in idxs {
            let mut total = forces[i];
            if let Some(bath) = self.bath_forces.get(atoms.tags[i]) {
                for k in 0..3 {
                    total[k] += bath[k];
                }
            }
            increment_velocity_halfstep(atoms, i, &total, dt);
            increment_position(atoms, i, dt);
        }
    }
    fn second_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64) {
        for &i in idxs {
            let gamma = self
                .gamma_by_type
                .get(atoms.types[i])
                .copied()
                .unwrap_or(self.default_gamma);
            let coeff = (2.0 * gamma * self.kt / dt).sqrt();
            let v = atoms.velocities[i];
            let mut bath = [0.0; 3];
            for k in 0..3 {
                let xi: f64 = StandardNormal.sample(&mut self.rng);
                bath[k] = -gamma * v[k] + coeff * xi;
            }
            let total = [forces[i][0] + bath[0], forces[i][1] + bath[1], forces[i][2] + bath[2]];
            increment_velocity_halfstep(atoms, i, &total, dt);
            let tag = atoms.tags[i];
            if tag >= self.bath_forces.len() {
                self.bath_forces.resize(tag + 1, [0.0; 3]);
            }
            self.bath_forces[tag] = bath;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::AtomType;

    fn gas(n: usize) -> Atoms {
        let mut atoms = Atoms::new();
        let a = atoms.add_atom_type(AtomType::new("A", 1.0).unwrap()).unwrap();
        let coords: Vec<[f64; 3]> = (0..n).map(|i| [i as f64, 0.0, 0.0]).collect();
        atoms.add_atoms(a, &coords);
        atoms
    }

    fn run(langevin: &mut Langevin, atoms: &mut Atoms, steps: usize) {
        let idxs: Vec<usize> = (0..atoms.num_atoms()).collect();
        let forces = vec![[0.0; 3]; atoms.num_atoms()];
        langevin.bind(atoms).unwrap();
        for _ in 0..steps {
            langevin.first_step(atoms, &idxs, &forces, 0.005);
            langevin.second_step(atoms, &idxs, &forces, 0.005);
        }
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = gas(4);
        let mut b = gas(4);
        run(&mut Langevin::new(0.2, 42).unwrap(), &mut a, 50);
        run(&mut Langevin::new(0.2, 42).unwrap(), &mut b, 50);
        assert_eq!(a.velocities(), b.velocities());

        let mut c = gas(4);
        run(&mut Langevin::new(0.2, 7).unwrap(), &mut c, 50);
        assert_ne!(a.velocities(), c.velocities());
    }

    #[test]
    fn ideal_gas_equilibrates_to_bath_temperature() {
        let n = 500;
        let mut atoms = gas(n);
        let mut langevin = Langevin::new(0.2, 42).unwrap();
        run(&mut langevin, &mut atoms, 2000);

        let mut samples = Vec::new();
        for _ in 0..200 {
            run(&mut langevin, &mut atoms, 10);
            let ke: f64 = atoms
                .velocities()
                .iter()
                .map(|v| 0.5 * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]))
                .sum();
            samples.push(2.0 * ke / (3.0 * n as f64));
        }
        let mean_kt = samples.iter().sum::<f64>() / samples.len() as f64;
        assert_relative_eq!(mean_kt, 0.2, max_relative = 0.05);
    }

    #[test]
    fn bath_force_carries_into_next_first_step() {
        let mut atoms = gas(1);
        let idxs = [0];
        let forces = [[0.0; 3]];
        let mut langevin = Langevin::new(0.0, 3).unwrap();
        langevin.bind(&atoms).unwrap();
        atoms.velocities[0] = [1.0, 0.0, 0.0];

        // kT = 0 leaves only the drag: the second step stores -gamma v
        langevin.second_step(&mut atoms, &idxs, &forces, 0.1);
        let v_after_second = atoms.velocities()[0][0];
        assert_relative_eq!(v_after_second, 1.0 - 0.05 * 1.0);

        langevin.first_step(&mut atoms, &idxs, &forces, 0.1);
        assert_relative_eq!(atoms.velocities()[0][0], v_after_second - 0.05 * 1.0);
    }

    #[test]
    fn zero_temperature_damps_motion() {
        let mut atoms = gas(1);
        atoms.velocities[0] = [1.0, 0.0, 0.0];
        let mut langevin = Langevin::new(0.0, 1).unwrap();
        langevin.set_gamma("A", 5.0).unwrap();
        run(&mut langevin, &mut atoms, 1000);
        assert!(atoms.velocities()[0][0].abs() < 1e-6);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Langevin::new(-0.1, 1).is_err());
        let mut langevin = Langevin::new(0.2, 1).unwrap();
        assert!(langevin.set_gamma("A", -1.0).is_err());
        assert!(langevin.set_dscale(0.0).is_err());
        langevin.set_gamma("Z", 1.0).unwrap();
        assert!(langevin.bind(&gas(1)).is_err());
    }
}
