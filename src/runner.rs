use std::path::{Path, PathBuf};

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{LatticeKind, ScriptConfig},
    lattice::{create_lattice, UnitCell},
    neighbor::UpdateSettings,
    output::{GsdWriter, LogWriter},
    Context, ContextOptions, Group, Integrator, LJCut, Langevin, Result, Simulation,
};

/// What a completed run did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub final_step: usize,
    pub num_particles: usize,
}

/// Builds a simulation from a [`ScriptConfig`] and runs it, writing outputs
/// into an output directory.
#[derive(Clone, Debug)]
pub struct Runner {
    config: ScriptConfig,
    output_dir: PathBuf,
}

impl Runner {
    pub fn new(config: ScriptConfig) -> Self {
        Self {
            config,
            output_dir: PathBuf::from("."),
        }
    }
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Set up the context, lattice, forces, integrator and writers
    pub fn build(&self) -> Result<Simulation> {
        let config = &self.config;
        config.validate()?;
        std::fs::create_dir_all(&self.output_dir)?;

        let context = Context::initialize(ContextOptions {
            mode: config.context.mode,
            num_threads: config.context.num_threads,
            ..Default::default()
        })?;

        let lc = &config.lattice;
        let mut unit_cell = match lc.kind {
            LatticeKind::Sc => UnitCell::sc(lc.a, &lc.type_name)?,
            LatticeKind::Bcc => UnitCell::bcc(lc.a, &lc.type_name)?,
            LatticeKind::Fcc => UnitCell::fcc(lc.a, &lc.type_name)?,
        };
        unit_cell.set_mass(lc.mass);
        unit_cell.set_diameter(lc.diameter);
        let (container, mut atoms) = create_lattice(&unit_cell, lc.n)?;
        if let Some(kt) = lc.initial_kt {
            atoms.set_temperature(kt, &mut StdRng::seed_from_u64(lc.velocity_seed))?;
        }
        let mut sim = Simulation::new(context, container, atoms);

        let pc = &config.pair;
        let mut lj = LJCut::new(pc.r_cut)?;
        lj.set_mode(pc.mode);
        for c in &pc.coeffs {
            lj.set_coeff(&c.a, &c.b, c.coeff())?;
        }
        sim.set_atomic_potential(lj)?;
        sim.set_neighbor_list(pc.skin, UpdateSettings::default())?;

        let ic = &config.integrator;
        let mut langevin = Langevin::new(ic.kt, ic.seed)?;
        for (type_name, gamma) in &ic.gamma {
            langevin.set_gamma(type_name, *gamma)?;
        }
        if let Some(lambda) = ic.dscale {
            langevin.set_dscale(lambda)?;
        }
        let mut integrator = Integrator::new(ic.dt)?;
        integrator.add_method(Group::all(sim.atoms()), langevin)?;
        sim.set_integrator(integrator);

        let log = &config.log;
        let quantities: Vec<&str> = log.quantities.iter().map(String::as_str).collect();
        sim.add_analyzer(
            "log",
            LogWriter::new(
                self.output_dir.join(&log.filename),
                &quantities,
                log.period,
                log.overwrite,
            )?,
        )?;

        let dump = &config.dump;
        let group = if dump.group == "all" {
            Group::all(sim.atoms())
        } else {
            Group::of_type(sim.atoms(), &dump.group)?
        };
        sim.add_analyzer(
            "gsd",
            GsdWriter::new(
                self.output_dir.join(&dump.filename),
                dump.period,
                group,
                dump.overwrite,
            )?,
        )?;

        Ok(sim)
    }

    pub fn run(&self) -> Result<RunSummary> {
        let mut sim = self.build()?;
        let steps = self.config.run.steps;
        sim.run(steps)?;
        info!("outputs written to {}", self.output_dir.display());
        Ok(RunSummary {
            steps,
            final_step: sim.step(),
            num_particles: sim.atoms().num_atoms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn builds_the_reference_script() {
        let dir = crate::output::tests::scratch_path("runner_build");
        let sim = Runner::new(ScriptConfig::default())
            .with_output_dir(&dir)
            .build()
            .unwrap();
        assert_eq!(sim.atoms().num_atoms(), 125);
        assert_eq!(sim.container().lengths(), [10.0, 10.0, 10.0]);
        assert_eq!(sim.integrator().unwrap().dt(), 0.005);
        approx::assert_relative_eq!(sim.neighbor_list().unwrap().neighbor_distance(), 2.9);
        assert_eq!(sim.analyzer_names(), &["log".to_string(), "gsd".to_string()]);
    }

    #[test]
    fn unknown_dump_group_is_an_error() {
        let mut config = ScriptConfig::default();
        config.dump.group = "B".to_string();
        let dir = crate::output::tests::scratch_path("runner_group");
        let result = Runner::new(config).with_output_dir(dir).build();
        assert!(matches!(result, Err(Error::GroupError(_))));
    }
}
