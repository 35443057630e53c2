mod langevin;
mod verlet;

pub use langevin::Langevin;
pub use verlet::Nve;

use enum_dispatch::enum_dispatch;
use log::info;

use crate::{Atoms, Error, Group, Result};

#[enum_dispatch]
/// A scheme advancing the particles of one group through a two-step
/// velocity-Verlet update
pub trait IntegrationMethod {
    fn name(&self) -> &'static str;

    /// Resolve per-type parameters against the particle type table
    fn bind(&mut self, _atoms: &Atoms) -> Result<()> {
        Ok(())
    }

    /// Half-kick with the current forces, then drift
    fn first_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64);

    /// Half-kick with the new forces
    fn second_step(&mut self, atoms: &mut Atoms, idxs: &[usize], forces: &[[f64; 3]], dt: f64);
}

#[enum_dispatch(IntegrationMethod)]
#[derive(Debug)]
pub enum Method {
    Nve,
    Langevin,
}

/// Standard integration mode: a fixed time step and a set of methods, each
/// applied to its own group of particles.
#[derive(Debug)]
pub struct Integrator {
    dt: f64,
    methods: Vec<(Group, Method)>,
}
impl Integrator {
    pub fn new(dt: f64) -> Result<Self> {
        if !(dt > 0.0) {
            return Err(Error::IntegratorError(format!(
                "Timestep should be positive, found {}",
                dt
            )));
        }
        Ok(Self {
            dt,
            methods: Vec::new(),
        })
    }
    pub fn dt(&self) -> f64 {
        self.dt
    }
    pub fn set_dt(&mut self, dt: f64) -> Result<()> {
        if !(dt > 0.0) {
            return Err(Error::IntegratorError(format!(
                "Timestep should be positive, found {}",
                dt
            )));
        }
        self.dt = dt;
        Ok(())
    }
    pub fn methods(&self) -> &[(Group, Method)] {
        &self.methods
    }

    /// Attaches a method to a group. A particle may be integrated by only one
    /// method.
    pub fn add_method(&mut self, group: Group, method: impl Into<Method>) -> Result<()> {
        if let Some((other, _)) = self
            .methods
            .iter()
            .find(|(g, _)| group.member_tags().iter().any(|&t| g.contains(t)))
        {
            return Err(Error::IntegratorError(format!(
                "group {} overlaps group {} which is already integrated",
                group.name(),
                other.name()
            )));
        }
        let method = method.into();
        info!(
            "integrating group {} ({} particles) with {}",
            group.name(),
            group.len(),
            method.name()
        );
        self.methods.push((group, method));
        Ok(())
    }

    pub(crate) fn bind(&mut self, atoms: &Atoms) -> Result<()> {
        self.methods
            .iter_mut()
            .try_for_each(|(_, method)| method.bind(atoms))
    }

    pub(crate) fn first_step(&mut self, atoms: &mut Atoms, forces: &[[f64; 3]]) {
        let dt = self.dt;
        for (group, method) in self.methods.iter_mut() {
            let idxs = group.indices(atoms);
            method.first_step(atoms, &idxs, forces, dt);
        }
    }

    pub(crate) fn second_step(&mut self, atoms: &mut Atoms, forces: &[[f64; 3]]) {
        let dt = self.dt;
        for (group, method) in self.methods.iter_mut() {
            let idxs = group.indices(atoms);
            method.second_step(atoms, &idxs, forces, dt);
        }
    }
}

/// Velocity half-kick shared by the methods
fn increment_velocity_halfstep(atoms: &mut Atoms, i: usize, force: &[f64; 3], dt: f64) {
    let scale = 0.5 * dt / atoms.mass(i);
    let v = &mut atoms.velocities[i];
    v[0] += scale * force[0];
    v[1] += scale * force[1];
    v[2] += scale * force[2];
}

/// Position drift shared by the methods
fn increment_position(atoms: &mut Atoms, i: usize, dt: f64) {
    let v = atoms.velocities[i];
    let p = &mut atoms.positions[i];
    p[0] += dt * v[0];
    p[1] += dt * v[1];
    p[2] += dt * v[2];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtomType;

    fn atoms() -> Atoms {
        let mut atoms = Atoms::new();
        let a = atoms.add_atom_type(AtomType::new("A", 2.0).unwrap()).unwrap();
        atoms.add_atoms(a, &[[0.0; 3], [1.0, 0.0, 0.0]]);
        atoms
    }

    #[test]
    fn rejects_non_positive_timestep() {
        assert!(Integrator::new(0.0).is_err());
        assert!(Integrator::new(-0.1).is_err());
        assert!(Integrator::new(0.005).unwrap().set_dt(f64::NAN).is_err());
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let atoms = atoms();
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator
            .add_method(Group::tags("first", &atoms, 0..1).unwrap(), Nve::new())
            .unwrap();
        assert!(integrator
            .add_method(Group::all(&atoms), Nve::new())
            .is_err());
        integrator
            .add_method(Group::tags("second", &atoms, 1..2).unwrap(), Nve::new())
            .unwrap();
        assert_eq!(integrator.methods().len(), 2);
    }

    #[test]
    fn ungrouped_particles_stay_put() {
        let mut atoms = atoms();
        atoms.velocities[1] = [1.0, 0.0, 0.0];
        let mut integrator = Integrator::new(0.1).unwrap();
        integrator
            .add_method(Group::tags("first", &atoms, 0..1).unwrap(), Nve::new())
            .unwrap();
        let forces = vec![[4.0, 0.0, 0.0]; 2];
        integrator.first_step(&mut atoms, &forces);
        integrator.second_step(&mut atoms, &forces);
        assert_eq!(atoms.positions()[1], [1.0, 0.0, 0.0]);
        assert!(atoms.velocities()[0][0] > 0.0);
    }
}
