//! The reference script written against the library API instead of a config
//! file.

use ljmd::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let context = Context::initialize(ContextOptions::default())?;

    let (container, atoms) = create_lattice(&UnitCell::sc(2.0, "A")?, [5, 5, 5])?;
    let mut sim = Simulation::new(context, container, atoms);

    let mut lj = LJCut::new(2.5)?;
    lj.set_coeff("A", "A", LjCoeff::new(1.0, 1.0))?;
    sim.set_atomic_potential(lj)?;

    let all = Group::all(sim.atoms());
    let mut integrator = Integrator::new(0.005)?;
    integrator.add_method(all.clone(), Langevin::new(0.2, 42)?)?;
    sim.set_integrator(integrator);

    sim.add_analyzer(
        "log",
        LogWriter::new("log-output.log", &["potential_energy"], 100, true)?,
    )?;
    sim.add_analyzer("gsd", GsdWriter::new("trajectory.gsd", 2000, all, true)?)?;

    sim.run(10000)
}
