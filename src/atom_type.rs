use crate::{Error, Result};

/// A named particle type with per-type physical properties
#[derive(Clone, Debug, PartialEq)]
pub struct AtomType {
    name: String,
    mass: f64,
    diameter: f64,
}
impl AtomType {
    pub fn new(name: &str, mass: f64) -> Result<Self> {
        Self::with_diameter(name, mass, 1.0)
    }
    pub fn with_diameter(name: &str, mass: f64, diameter: f64) -> Result<Self> {
        if mass <= 0.0 {
            return Err(Error::LatticeError(format!(
                "mass of type {} should be positive, found {}",
                name, mass
            )));
        }
        if diameter <= 0.0 {
            return Err(Error::LatticeError(format!(
                "diameter of type {} should be positive, found {}",
                name, diameter
            )));
        }
        Ok(Self {
            name: name.to_string(),
            mass,
            diameter,
        })
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn diameter(&self) -> f64 {
        self.diameter
    }
}
