pub use super::atom_type::AtomType;
pub use super::atomic::{AtomicPotential, AtomicPotentialTrait, EnergyShift, LJCut, LjCoeff};
pub use super::compute::Compute;
pub use super::container::{Container, BC};
pub use super::context::{Context, ContextOptions};
pub use super::group::Group;
pub use super::integrators::{Integrator, Langevin, Nve};
pub use super::lattice::{create_lattice, Lattice, UnitCell};
pub use super::output::{Analyzer, GsdWriter, LogWriter};
pub use super::region::{Rect, Region};
pub use super::simulation::Simulation;
pub use super::{Error, Result};
