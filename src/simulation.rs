use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::{
    atomic::{AtomicPotential, AtomicPotentialTrait, ForceResult},
    neighbor::UpdateSettings,
    output::Analyzer,
    utils::KeyedVec,
    Atoms, Container, Context, Error, Integrator, NeighborList, Result,
};

const DEFAULT_SKIN: f64 = 0.4;
const DEFAULT_SORT_PERIOD: usize = 300;
const STATUS_INTERVAL: Duration = Duration::from_secs(10);

struct RegisteredAnalyzer {
    analyzer: Box<dyn Analyzer>,
    last_step: Option<usize>,
}

/// The main simulation class: particles in a box, the forces between them,
/// how they move, and what is recorded along the way.
pub struct Simulation {
    context: Context,
    atoms: Atoms,
    container: Container,
    atomic_potential: Option<AtomicPotential>,
    neighbor_list: Option<NeighborList>,
    skin_distance: f64,
    nl_update_settings: UpdateSettings,
    integrator: Option<Integrator>,
    analyzers: KeyedVec<String, RegisteredAnalyzer>,
    force_result: ForceResult,
    step: usize,
    sort_period: usize,
}
impl Simulation {
    /// Create a new simulation, wrapping all particles into the box
    pub fn new(context: Context, container: Container, mut atoms: Atoms) -> Self {
        for (p, img) in atoms.positions.iter_mut().zip(atoms.images.iter_mut()) {
            container.wrap(p, img);
        }
        let force_result = ForceResult::zeros(atoms.num_atoms());
        Self {
            context,
            atoms,
            container,
            atomic_potential: None,
            neighbor_list: None,
            skin_distance: DEFAULT_SKIN,
            nl_update_settings: UpdateSettings::default(),
            integrator: None,
            analyzers: KeyedVec::new(),
            force_result,
            step: 0,
            sort_period: DEFAULT_SORT_PERIOD,
        }
    }

    // Getters
    pub fn context(&self) -> &Context {
        &self.context
    }
    pub fn atoms(&self) -> &Atoms {
        &self.atoms
    }
    /// Direct access to particle data; forces are recomputed on the next run
    pub fn atoms_mut(&mut self) -> &mut Atoms {
        &mut self.atoms
    }
    pub fn container(&self) -> &Container {
        &self.container
    }
    pub fn atomic_potential(&self) -> Option<&AtomicPotential> {
        self.atomic_potential.as_ref()
    }
    pub fn atomic_potential_mut(&mut self) -> Option<&mut AtomicPotential> {
        self.atomic_potential.as_mut()
    }
    pub fn neighbor_list(&self) -> Option<&NeighborList> {
        self.neighbor_list.as_ref()
    }
    pub fn integrator(&self) -> Option<&Integrator> {
        self.integrator.as_ref()
    }
    pub fn integrator_mut(&mut self) -> Option<&mut Integrator> {
        self.integrator.as_mut()
    }
    /// Forces, energies and virial from the last force evaluation
    pub fn force_result(&self) -> &ForceResult {
        &self.force_result
    }
    /// Current time step
    pub fn step(&self) -> usize {
        self.step
    }
    pub fn analyzer_names(&self) -> &[String] {
        self.analyzers.keys()
    }

    // Setters
    pub fn set_atomic_potential(&mut self, atomic_potential: impl Into<AtomicPotential>) -> Result<()> {
        let atomic_potential = atomic_potential.into();
        let cutoff = atomic_potential.cutoff_distance();
        self.neighbor_list = if cutoff > 0.0 {
            let mut nl = NeighborList::new(cutoff, self.skin_distance)?;
            nl.set_update_settings(self.nl_update_settings);
            Some(nl)
        } else {
            None
        };
        self.atomic_potential = Some(atomic_potential);
        Ok(())
    }
    /// Neighbor list skin and rebuild policy
    pub fn set_neighbor_list(&mut self, skin_distance: f64, update_settings: UpdateSettings) -> Result<()> {
        if let Some(nl) = self.neighbor_list.as_mut() {
            nl.set_skin_distance(skin_distance)?;
            nl.set_update_settings(update_settings);
        } else if !(skin_distance >= 0.0) {
            return Err(Error::NeighborListError(format!(
                "skin distance should be non-negative, found {}",
                skin_distance
            )));
        }
        self.skin_distance = skin_distance;
        self.nl_update_settings = update_settings;
        Ok(())
    }
    pub fn set_integrator(&mut self, integrator: Integrator) {
        self.integrator = Some(integrator);
    }
    /// How often particle storage is spatially sorted, 0 disables sorting
    pub fn set_sort_period(&mut self, sort_period: usize) {
        self.sort_period = sort_period;
    }
    pub fn add_analyzer(&mut self, name: &str, analyzer: impl Analyzer + 'static) -> Result<()> {
        self.analyzers.add(
            name.to_string(),
            RegisteredAnalyzer {
                analyzer: Box::new(analyzer),
                last_step: None,
            },
        )
    }
    pub fn remove_analyzer(&mut self, name: &str) -> bool {
        self.analyzers.remove(&name.to_string()).is_some()
    }

    /// Advance the simulation by `num_steps` time steps. Analyzers run on
    /// every multiple of their period from the current step through the last,
    /// inclusive.
    pub fn run(&mut self, num_steps: usize) -> Result<()> {
        self.pre_check()?;

        let mut analyzers = std::mem::take(&mut self.analyzers);
        let result = self.run_with(&mut analyzers, num_steps);
        self.analyzers = analyzers;
        result
    }

    fn run_with(
        &mut self,
        analyzers: &mut KeyedVec<String, RegisteredAnalyzer>,
        num_steps: usize,
    ) -> Result<()> {
        for registered in analyzers.values_mut() {
            registered.analyzer.attach(self)?;
        }

        let start = self.step;
        let end = start + num_steps;
        info!(
            "running {} steps ({} -> {}) with {} particles",
            num_steps,
            start,
            end,
            self.atoms.num_atoms()
        );

        if let Some(nl) = self.neighbor_list.as_mut() {
            nl.invalidate();
        }
        self.check_build_neighbor_list();
        self.compute_forces();

        let started = Instant::now();
        let mut last_status = started;
        loop {
            self.analyze(analyzers)?;
            if self.step == end {
                break;
            }

            if let Some(integrator) = self.integrator.as_mut() {
                integrator.first_step(&mut self.atoms, &self.force_result.forces);
            }
            self.wrap_pbs();
            self.step += 1;
            self.check_sort();
            self.check_build_neighbor_list();
            self.compute_forces();
            if let Some(integrator) = self.integrator.as_mut() {
                integrator.second_step(&mut self.atoms, &self.force_result.forces);
            }

            if last_status.elapsed() >= STATUS_INTERVAL {
                last_status = Instant::now();
                info!(
                    "step {} / {} | TPS {:.1}",
                    self.step,
                    end,
                    (self.step - start) as f64 / started.elapsed().as_secs_f64()
                );
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        info!(
            "completed {} steps in {:.2} s ({:.1} TPS, {} neighbor list builds)",
            num_steps,
            elapsed,
            num_steps as f64 / elapsed.max(f64::EPSILON),
            self.neighbor_list.as_ref().map_or(0, |nl| nl.num_builds())
        );
        Ok(())
    }

    // Run methods
    fn pre_check(&mut self) -> Result<()> {
        let type_names = self.atoms.type_names();
        let potential = self.atomic_potential.as_mut().ok_or_else(|| {
            Error::SimulationError("an atomic potential should be set before running".to_string())
        })?;
        potential.bind(&type_names)?;
        if !potential.all_set() {
            return Err(Error::AtomicPotentialError(
                "all atomic potential coefficients should be set before running".to_string(),
            ));
        }
        if let Some(nl) = self.neighbor_list.as_mut() {
            nl.set_force_distance(potential.cutoff_distance())?;
            let min_length = self.container.lengths().into_iter().fold(f64::MAX, f64::min);
            if nl.neighbor_distance() > 0.5 * min_length {
                return Err(Error::NeighborListError(format!(
                    "neighbor distance {} exceeds half the smallest box length {}",
                    nl.neighbor_distance(),
                    min_length
                )));
            }
        }

        let integrator = self.integrator.as_mut().ok_or_else(|| {
            Error::IntegratorError("an integrator should be set before running".to_string())
        })?;
        if integrator.methods().is_empty() {
            warn!("no integration methods are set, particles will not move");
        }
        integrator.bind(&self.atoms)
    }

    fn analyze(&self, analyzers: &mut KeyedVec<String, RegisteredAnalyzer>) -> Result<()> {
        for registered in analyzers.values_mut() {
            let period = registered.analyzer.period();
            if self.step % period != 0 || registered.last_step == Some(self.step) {
                continue;
            }
            registered.analyzer.analyze(self.step, self)?;
            registered.last_step = Some(self.step);
        }
        Ok(())
    }

    fn compute_forces(&mut self) {
        let result = match self.atomic_potential.as_ref() {
            Some(potential) => {
                let neighbors: &[Vec<usize>] = match self.neighbor_list.as_ref() {
                    Some(nl) => nl.neighbors(),
                    None => &[],
                };
                let atoms = &self.atoms;
                let container = &self.container;
                self.context
                    .install(|| potential.compute(atoms, neighbors, container))
            }
            None => ForceResult::zeros(self.atoms.num_atoms()),
        };
        self.force_result = result;
    }

    fn check_build_neighbor_list(&mut self) {
        if let Some(nl) = self.neighbor_list.as_mut() {
            nl.check_update(self.step, self.atoms.positions(), &self.container);
        }
    }

    fn check_sort(&mut self) {
        if self.sort_period == 0 || self.step % self.sort_period != 0 {
            return;
        }
        if let Some(nl) = self.neighbor_list.as_mut() {
            let bins = nl.bin_indices(self.atoms.positions(), &self.container);
            self.atoms.sort_atoms_by_bin(&bins);
            nl.invalidate();
            debug!("sorted particles at step {}", self.step);
        }
    }

    fn wrap_pbs(&mut self) {
        let container = &self.container;
        self.atoms
            .positions
            .iter_mut()
            .zip(self.atoms.images.iter_mut())
            .for_each(|(p, img)| container.wrap(p, img));
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    use super::*;
    use crate::{
        atomic::{EnergyShift, LJCut, LjCoeff, None_},
        lattice::{create_lattice, UnitCell},
        output::{GsdFile, GsdWriter, LogWriter, OpenMode},
        output::tests::scratch_path,
        ContextOptions, Group, Langevin, Nve,
    };

    fn context() -> Context {
        Context::initialize(ContextOptions {
            num_threads: Some(2),
            ..Default::default()
        })
        .unwrap()
    }

    fn lj_sim(n: usize, a: f64) -> Simulation {
        let (container, atoms) = create_lattice(&UnitCell::sc(a, "A").unwrap(), [n, n, n]).unwrap();
        let mut sim = Simulation::new(context(), container, atoms);
        let mut lj = LJCut::new(2.5).unwrap();
        lj.set_coeff("A", "A", LjCoeff::new(1.0, 1.0)).unwrap();
        sim.set_atomic_potential(lj).unwrap();
        sim
    }

    #[test]
    fn run_requires_potential_and_integrator() {
        let (container, atoms) = create_lattice(&UnitCell::sc(2.0, "A").unwrap(), [4, 4, 4]).unwrap();
        let mut sim = Simulation::new(context(), container, atoms);
        assert!(sim.run(1).is_err());

        let lj = LJCut::new(2.5).unwrap();
        sim.set_atomic_potential(lj).unwrap();
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator.add_method(Group::all(sim.atoms()), Nve::new()).unwrap();
        sim.set_integrator(integrator);
        // no coefficients for A-A
        assert!(sim.run(1).is_err());
    }

    #[test]
    fn nve_conserves_energy() {
        let mut sim = lj_sim(5, 1.5);
        if let Some(AtomicPotential::LJCut(lj)) = sim.atomic_potential_mut() {
            lj.set_mode(EnergyShift::Shift);
        }
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        sim.atoms_mut().set_temperature(0.5, &mut rng).unwrap();
        let mut integrator = Integrator::new(0.002).unwrap();
        integrator.add_method(Group::all(sim.atoms()), Nve::new()).unwrap();
        sim.set_integrator(integrator);

        sim.run(0).unwrap();
        let e0 = sim.force_result().potential_energy()
            + crate::compute::Compute::KineticEnergy.compute(&sim).as_f64();
        sim.run(500).unwrap();
        let e1 = sim.force_result().potential_energy()
            + crate::compute::Compute::KineticEnergy.compute(&sim).as_f64();
        assert_eq!(sim.step(), 500);
        assert_relative_eq!(e0, e1, max_relative = 5e-3);
    }

    #[test]
    fn perfect_lattice_stays_in_balance() {
        let mut sim = lj_sim(5, 2.0);
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator.add_method(Group::all(sim.atoms()), Nve::new()).unwrap();
        sim.set_integrator(integrator);
        sim.run(10).unwrap();
        for f in &sim.force_result().forces {
            assert_relative_eq!(f[0], 0.0, epsilon = 1e-10);
        }
        assert!(sim.atoms().velocities().iter().all(|v| v[0].abs() < 1e-10));
    }

    #[test]
    fn analyzers_sample_on_period_without_repeats() {
        let mut sim = lj_sim(4, 2.0);
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator
            .add_method(Group::all(sim.atoms()), Langevin::new(0.2, 42).unwrap())
            .unwrap();
        sim.set_integrator(integrator);

        let log_path = scratch_path("sim_period.log");
        let log = LogWriter::new(&log_path, &["potential_energy", "temperature"], 10, true).unwrap();
        sim.add_analyzer("log", log).unwrap();
        let gsd_path = scratch_path("sim_period.gsd");
        let group = Group::all(sim.atoms());
        sim.add_analyzer("gsd", GsdWriter::new(&gsd_path, 25, group, true).unwrap())
            .unwrap();
        assert!(sim
            .add_analyzer("log", LogWriter::new(&log_path, &["volume"], 1, true).unwrap())
            .is_err());

        sim.run(50).unwrap();
        sim.run(20).unwrap();

        let text = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestep\tpotential_energy\ttemperature");
        let steps: Vec<usize> = lines[1..]
            .iter()
            .map(|l| l.split('\t').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(steps, vec![0, 10, 20, 30, 40, 50, 60, 70]);

        let mut gsd = GsdFile::open(&gsd_path, OpenMode::ReadOnly).unwrap();
        assert_eq!(gsd.nframes(), 3);
        assert_eq!(gsd.read_chunk::<u64>(2, "configuration/step").unwrap(), Some(vec![50]));
        assert_eq!(gsd.read_chunk::<u32>(0, "particles/N").unwrap(), Some(vec![64]));
        assert!(gsd.find_chunk(1, "particles/typeid").is_none());
    }

    #[test]
    fn unknown_log_quantity_fails_the_run() {
        let mut sim = lj_sim(4, 2.0);
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator.add_method(Group::all(sim.atoms()), Nve::new()).unwrap();
        sim.set_integrator(integrator);
        let log = LogWriter::new(scratch_path("sim_bad.log"), &["enthalpy"], 10, true).unwrap();
        sim.add_analyzer("log", log).unwrap();
        assert!(sim.run(1).is_err());
        assert!(sim.remove_analyzer("log"));
        sim.run(1).unwrap();
    }

    #[test]
    fn ideal_gas_without_neighbor_list() {
        let (container, atoms) = create_lattice(&UnitCell::sc(1.0, "A").unwrap(), [3, 3, 3]).unwrap();
        let mut sim = Simulation::new(context(), container, atoms);
        sim.set_atomic_potential(None_::new()).unwrap();
        assert!(sim.neighbor_list().is_none());
        let mut integrator = Integrator::new(0.01).unwrap();
        integrator
            .add_method(Group::all(sim.atoms()), Langevin::new(1.0, 5).unwrap())
            .unwrap();
        sim.set_integrator(integrator);
        sim.run(200).unwrap();
        let lo = sim.container().rect().lo();
        let hi = sim.container().rect().hi();
        for p in sim.atoms().positions() {
            for k in 0..3 {
                assert!(p[k] >= lo[k] && p[k] < hi[k]);
            }
        }
    }

    #[test]
    fn cutoff_larger_than_half_box_is_rejected() {
        let mut sim = lj_sim(2, 2.0);
        let mut integrator = Integrator::new(0.005).unwrap();
        integrator.add_method(Group::all(sim.atoms()), Nve::new()).unwrap();
        sim.set_integrator(integrator);
        assert!(matches!(sim.run(1), Err(Error::NeighborListError(_))));
    }
}
