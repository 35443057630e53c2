use super::Lattice;
use crate::{Error, Result};

/// Orthorhombic unit cell with typed basis sites
#[derive(Clone, Debug)]
pub struct UnitCell {
    a: [f64; 3],
    basis: Vec<[f64; 3]>,
    type_names: Vec<String>,
    masses: Vec<f64>,
    diameters: Vec<f64>,
}
impl UnitCell {
    pub fn new(a: [f64; 3], basis: Vec<[f64; 3]>, type_names: Vec<String>) -> Result<Self> {
        if a.iter().any(|&ak| ak <= 0.0 || !ak.is_finite()) {
            return Err(Error::LatticeError(format!(
                "lattice constants should be positive, found {:?}",
                a
            )));
        }
        if basis.is_empty() || basis.len() != type_names.len() {
            return Err(Error::LatticeError(format!(
                "unit cell needs one type name per basis site, found {} sites and {} names",
                basis.len(),
                type_names.len()
            )));
        }
        let num_sites = basis.len();
        Ok(Self {
            a,
            basis,
            type_names,
            masses: vec![1.0; num_sites],
            diameters: vec![1.0; num_sites],
        })
    }
    /// Simple cubic
    pub fn sc(a: f64, type_name: &str) -> Result<Self> {
        Self::cubic(a, vec![[0.0, 0.0, 0.0]], type_name)
    }
    /// Body-centered cubic
    pub fn bcc(a: f64, type_name: &str) -> Result<Self> {
        Self::cubic(a, vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]], type_name)
    }
    /// Face-centered cubic
    pub fn fcc(a: f64, type_name: &str) -> Result<Self> {
        Self::cubic(
            a,
            vec![
                [0.0, 0.0, 0.0],
                [0.0, 0.5, 0.5],
                [0.5, 0.0, 0.5],
                [0.5, 0.5, 0.0],
            ],
            type_name,
        )
    }
    fn cubic(a: f64, basis: Vec<[f64; 3]>, type_name: &str) -> Result<Self> {
        let names = vec![type_name.to_string(); basis.len()];
        Self::new([a, a, a], basis, names)
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.masses.iter_mut().for_each(|m| *m = mass);
    }
    pub fn set_diameter(&mut self, diameter: f64) {
        self.diameters.iter_mut().for_each(|d| *d = diameter);
    }
    pub fn type_names(&self) -> &[String] {
        &self.type_names
    }
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }
    pub fn diameters(&self) -> &[f64] {
        &self.diameters
    }
}
impl Lattice for UnitCell {
    fn cell_lengths(&self) -> [f64; 3] {
        self.a
    }
    fn basis(&self) -> &[[f64; 3]] {
        &self.basis
    }
}
