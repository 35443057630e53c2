//! Lennard-Jones molecular dynamics: particles on a lattice in a periodic box,
//! integrated under a Langevin thermostat, with scalar logs and GSD
//! trajectories written along the way.

pub mod atom_type;
pub mod atomic;
pub mod atoms;
pub mod compute;
pub mod config;
pub mod container;
pub mod context;
pub mod error;
pub mod group;
pub mod integrators;
pub mod lattice;
pub mod neighbor;
pub mod output;
pub mod prelude;
pub mod region;
pub mod runner;
pub mod simulation;
pub mod utils;

pub use atom_type::AtomType;
pub use atomic::*;
pub use atoms::Atoms;
pub use config::ScriptConfig;
pub use container::{Container, BC};
pub use context::{Context, ContextOptions, ExecutionMode};
pub use error::{Error, Result};
pub use group::Group;
pub use integrators::*;
pub use lattice::{create_lattice, Lattice, UnitCell};
pub use neighbor::NeighborList;
pub use output::{GsdWriter, LogWriter};
pub use runner::{RunSummary, Runner};
pub use simulation::Simulation;
