//! JSON description of a run. Every field defaults to the reference script:
//! a 5x5x5 simple cubic lattice of `A` particles with Lennard-Jones pair
//! interactions, thermalized at kT = 0.2 by a Langevin thermostat for 10000
//! steps, logging the potential energy and dumping a trajectory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    atomic::{EnergyShift, LjCoeff},
    context::ExecutionMode,
    Error, Result,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    pub context: ContextConfig,
    pub lattice: LatticeConfig,
    pub pair: PairConfig,
    pub integrator: IntegratorConfig,
    pub log: LogConfig,
    pub dump: DumpConfig,
    pub run: RunConfig,
}

impl ScriptConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.lattice.n.contains(&0) {
            return Err(Error::LatticeError(
                "lattice replication counts should be positive".to_string(),
            ));
        }
        if self.log.period == 0 || self.dump.period == 0 {
            return Err(Error::OutputError("output periods should be positive".to_string()));
        }
        if self.pair.coeffs.is_empty() {
            return Err(Error::AtomicPotentialError("no pair coefficients given".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    pub mode: ExecutionMode,
    pub num_threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeKind {
    #[default]
    Sc,
    Bcc,
    Fcc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatticeConfig {
    pub kind: LatticeKind,
    pub a: f64,
    pub n: [usize; 3],
    pub type_name: String,
    pub mass: f64,
    pub diameter: f64,
    /// Draw initial velocities at this temperature, at rest when absent
    pub initial_kt: Option<f64>,
    pub velocity_seed: u64,
}
impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            kind: LatticeKind::Sc,
            a: 2.0,
            n: [5, 5, 5],
            type_name: "A".to_string(),
            mass: 1.0,
            diameter: 1.0,
            initial_kt: None,
            velocity_seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairCoeffConfig {
    pub a: String,
    pub b: String,
    pub epsilon: f64,
    pub sigma: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub r_cut: Option<f64>,
}
impl PairCoeffConfig {
    pub fn coeff(&self) -> LjCoeff {
        LjCoeff {
            epsilon: self.epsilon,
            sigma: self.sigma,
            alpha: self.alpha,
            r_cut: self.r_cut,
        }
    }
}
fn default_alpha() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PairConfig {
    pub r_cut: f64,
    pub mode: EnergyShift,
    pub skin: f64,
    pub coeffs: Vec<PairCoeffConfig>,
}
impl Default for PairConfig {
    fn default() -> Self {
        Self {
            r_cut: 2.5,
            mode: EnergyShift::NoShift,
            skin: 0.4,
            coeffs: vec![PairCoeffConfig {
                a: "A".to_string(),
                b: "A".to_string(),
                epsilon: 1.0,
                sigma: 1.0,
                alpha: 1.0,
                r_cut: None,
            }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegratorConfig {
    pub dt: f64,
    #[serde(rename = "kT")]
    pub kt: f64,
    pub seed: u64,
    /// Per-type friction, 1.0 for types not listed
    pub gamma: Vec<(String, f64)>,
    /// Friction proportional to diameter with this factor, replaces `gamma`
    pub dscale: Option<f64>,
}
impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt: 0.005,
            kt: 0.2,
            seed: 42,
            gamma: Vec::new(),
            dscale: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub filename: String,
    pub quantities: Vec<String>,
    pub period: usize,
    pub overwrite: bool,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filename: "log-output.log".to_string(),
            quantities: vec!["potential_energy".to_string()],
            period: 100,
            overwrite: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    pub filename: String,
    pub period: usize,
    pub group: String,
    pub overwrite: bool,
}
impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            filename: "trajectory.gsd".to_string(),
            period: 2000,
            group: "all".to_string(),
            overwrite: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub steps: usize,
}
impl Default for RunConfig {
    fn default() -> Self {
        Self { steps: 10000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_the_reference_script() {
        let config = ScriptConfig::from_json("{}").unwrap();
        assert_eq!(config, ScriptConfig::default());
        assert_eq!(config.lattice.n, [5, 5, 5]);
        assert_eq!(config.lattice.a, 2.0);
        assert_eq!(config.pair.r_cut, 2.5);
        assert_eq!(config.pair.coeffs[0].coeff(), LjCoeff::new(1.0, 1.0));
        assert_eq!(config.integrator.kt, 0.2);
        assert_eq!(config.integrator.seed, 42);
        assert_eq!(config.log.filename, "log-output.log");
        assert_eq!(config.log.period, 100);
        assert_eq!(config.dump.filename, "trajectory.gsd");
        assert_eq!(config.dump.period, 2000);
        assert_eq!(config.run.steps, 10000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ScriptConfig::from_json(
            r#"{
                "lattice": {"kind": "fcc", "n": [3, 3, 3]},
                "pair": {"mode": "shift", "coeffs": [{"a": "A", "b": "A", "epsilon": 0.5, "sigma": 1.1, "r_cut": 2.0}]},
                "integrator": {"kT": 1.5, "gamma": [["A", 2.0]]},
                "run": {"steps": 50}
            }"#,
        )
        .unwrap();
        assert_eq!(config.lattice.kind, LatticeKind::Fcc);
        assert_eq!(config.lattice.a, 2.0);
        assert_eq!(config.pair.mode, EnergyShift::Shift);
        assert_eq!(config.pair.coeffs[0].r_cut, Some(2.0));
        assert_eq!(config.pair.coeffs[0].alpha, 1.0);
        assert_eq!(config.integrator.kt, 1.5);
        assert_eq!(config.integrator.gamma, vec![("A".to_string(), 2.0)]);
        assert_eq!(config.integrator.dt, 0.005);
        assert_eq!(config.run.steps, 50);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(ScriptConfig::from_json("{\"lattise\": {}}"), Err(Error::Json(_))));
        assert!(ScriptConfig::from_json("{\"lattice\": {\"n\": [5, 0, 5]}}").is_err());
        assert!(ScriptConfig::from_json("{\"log\": {\"period\": 0}}").is_err());
        assert!(ScriptConfig::from_json("{\"pair\": {\"coeffs\": []}}").is_err());
    }
}
