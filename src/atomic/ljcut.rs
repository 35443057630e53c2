use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AtomicPotentialTrait, ForceResult};
use crate::{
    utils::{dot, norm_squared, sub},
    Atoms, Container, Error, Result,
};

/// How the pair energy is treated at the cutoff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyShift {
    /// Energy jumps to zero at the cutoff
    #[default]
    NoShift,
    /// Energy is shifted so that it is continuous at the cutoff
    Shift,
}

/// User-facing Lennard-Jones parameters for one type pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LjCoeff {
    pub epsilon: f64,
    pub sigma: f64,
    #[serde(default = "LjCoeff::default_alpha")]
    pub alpha: f64,
    /// Overrides the potential's default cutoff for this pair
    #[serde(default)]
    pub r_cut: Option<f64>,
}
impl LjCoeff {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            epsilon,
            sigma,
            alpha: 1.0,
            r_cut: None,
        }
    }
    fn default_alpha() -> f64 {
        1.0
    }
}

#[derive(Clone, Copy, Debug)]
struct LJCutCoeff {
    lj1: f64, // = 4 epsilon sigma^12
    lj2: f64, // = 4 epsilon alpha sigma^6
    rcut2: f64,
    shift: f64,
}
impl LJCutCoeff {
    fn new(coeff: &LjCoeff, rcut: f64, mode: EnergyShift) -> Self {
        let sigma2 = coeff.sigma * coeff.sigma;
        let sigma6 = sigma2 * sigma2 * sigma2;
        let lj1 = 4.0 * coeff.epsilon * sigma6 * sigma6;
        let lj2 = 4.0 * coeff.epsilon * coeff.alpha * sigma6;
        let rcut2 = rcut * rcut;
        let shift = match mode {
            EnergyShift::NoShift => 0.0,
            EnergyShift::Shift => {
                let r6inv = 1.0 / (rcut2 * rcut2 * rcut2);
                r6inv * (lj1 * r6inv - lj2)
            }
        };
        Self {
            lj1,
            lj2,
            rcut2,
            shift,
        }
    }
    /// Returns (f/r, U) for a pair at squared distance `r2`
    fn evaluate(&self, r2: f64) -> (f64, f64) {
        let r2inv = 1.0 / r2;
        let r6inv = r2inv * r2inv * r2inv;
        let f_over_r = r2inv * r6inv * (12.0 * self.lj1 * r6inv - 6.0 * self.lj2);
        let energy = r6inv * (self.lj1 * r6inv - self.lj2) - self.shift;
        (f_over_r, energy)
    }
}

/// Lennard-Jones 12-6 potential
///
/// U(r) = 4 eps ((sig/r)^12 - alpha (sig/r)^6) for r < r_cut
#[derive(Debug)]
pub struct LJCut {
    force_cutoff: f64,
    mode: EnergyShift,
    pair_coeffs: HashMap<(String, String), LjCoeff>,
    num_types: usize,
    coeffs: Vec<Option<LJCutCoeff>>,
}
impl LJCut {
    pub fn new(force_cutoff: f64) -> Result<Self> {
        if !(force_cutoff > 0.0) {
            return Err(Error::AtomicPotentialError(format!(
                "cutoff should be positive, found {}",
                force_cutoff
            )));
        }
        Ok(Self {
            force_cutoff,
            mode: EnergyShift::default(),
            pair_coeffs: HashMap::new(),
            num_types: 0,
            coeffs: Vec::new(),
        })
    }
    pub fn set_mode(&mut self, mode: EnergyShift) {
        self.mode = mode;
        self.coeffs.clear();
    }
    pub fn mode(&self) -> EnergyShift {
        self.mode
    }
    /// Sets the coefficients of the (symmetric) pair `type_i`-`type_j`
    pub fn set_coeff(&mut self, type_i: &str, type_j: &str, coeff: LjCoeff) -> Result<()> {
        if coeff.sigma <= 0.0 || coeff.epsilon < 0.0 {
            return Err(Error::AtomicPotentialError(format!(
                "invalid coefficients for {}-{}: epsilon {} sigma {}",
                type_i, type_j, coeff.epsilon, coeff.sigma
            )));
        }
        if let Some(rcut) = coeff.r_cut {
            if rcut <= 0.0 {
                return Err(Error::AtomicPotentialError(format!(
                    "cutoff for {}-{} should be positive, found {}",
                    type_i, type_j, rcut
                )));
            }
        }
        self.pair_coeffs
            .insert(Self::pair_key(type_i, type_j), coeff);
        self.coeffs.clear();
        Ok(())
    }
    pub fn coeff(&self, type_i: &str, type_j: &str) -> Option<&LjCoeff> {
        self.pair_coeffs.get(&Self::pair_key(type_i, type_j))
    }
    fn pair_key(type_i: &str, type_j: &str) -> (String, String) {
        if type_i <= type_j {
            (type_i.to_string(), type_j.to_string())
        } else {
            (type_j.to_string(), type_i.to_string())
        }
    }
    /// Bound coefficients for a type pair, `None` for types unknown at bind time
    fn pair_coeff(&self, i: usize, j: usize) -> Option<LJCutCoeff> {
        if i >= self.num_types || j >= self.num_types {
            return None;
        }
        self.coeffs.get(i * self.num_types + j).copied().flatten()
    }
}

impl AtomicPotentialTrait for LJCut {
    fn name(&self) -> &'static str {
        "lj"
    }
    fn cutoff_distance(&self) -> f64 {
        self.pair_coeffs
            .values()
            .filter_map(|c| c.r_cut)
            .fold(self.force_cutoff, f64::max)
    }
    fn bind(&mut self, type_names: &[String]) -> Result<()> {
        let num_types = type_names.len();
        let mut coeffs = vec![None; num_types * num_types];
        for (i, name_i) in type_names.iter().enumerate() {
            for (j, name_j) in type_names.iter().enumerate() {
                let coeff = self.coeff(name_i, name_j).ok_or_else(|| {
                    Error::AtomicPotentialError(format!(
                        "pair coefficients not set for {}-{}",
                        name_i, name_j
                    ))
                })?;
                let rcut = coeff.r_cut.unwrap_or(self.force_cutoff);
                coeffs[i * num_types + j] = Some(LJCutCoeff::new(coeff, rcut, self.mode));
            }
        }
        self.num_types = num_types;
        self.coeffs = coeffs;
        Ok(())
    }
    fn all_set(&self) -> bool {
        !self.coeffs.is_empty() && self.coeffs.iter().all(|c| c.is_some())
    }
    fn compute(&self, atoms: &Atoms, neighbors: &[Vec<usize>], container: &Container) -> ForceResult {
        let positions = atoms.positions();
        let types = atoms.types();

        // Each particle sums over its full neighbor list independently, so
        // pairs are visited twice and energies/virials are halved.
        let per_atom: Vec<([f64; 3], f64, f64)> = (0..atoms.num_atoms())
            .into_par_iter()
            .map(|i| {
                let mut force = [0.0; 3];
                let mut energy = 0.0;
                let mut virial = 0.0;
                let posi = &positions[i];
                let typei = types[i];
                for &j in &neighbors[i] {
                    let coeff = match self.pair_coeff(typei, types[j]) {
                        Some(c) => c,
                        None => continue,
                    };
                    let r = container.minimum_image(sub(posi, &positions[j]));
                    let r2 = norm_squared(&r);
                    if r2 >= coeff.rcut2 {
                        continue;
                    }
                    let (f_over_r, u) = coeff.evaluate(r2);
                    let f = [r[0] * f_over_r, r[1] * f_over_r, r[2] * f_over_r];
                    force[0] += f[0];
                    force[1] += f[1];
                    force[2] += f[2];
                    energy += 0.5 * u;
                    virial += 0.5 * dot(&r, &f);
                }
                (force, energy, virial)
            })
            .collect();

        let mut result = ForceResult::zeros(atoms.num_atoms());
        for (i, (f, e, w)) in per_atom.into_iter().enumerate() {
            result.forces[i] = f;
            result.energies[i] = e;
            result.virial += w;
        }
        result
    }
}
