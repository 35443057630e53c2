pub mod dump;
pub mod gsd;
pub mod log_writer;

pub use self::dump::GsdWriter;
pub use self::gsd::{GsdFile, OpenMode};
pub use self::log_writer::LogWriter;

use std::fmt::Display;

use crate::{Result, Simulation};

/// A periodic action that observes the simulation, such as writing a file
pub trait Analyzer {
    fn name(&self) -> &str;

    /// Analyze on steps that are multiples of this period
    fn period(&self) -> usize;

    /// Called once before the first step of every run
    fn attach(&mut self, sim: &Simulation) -> Result<()>;

    fn analyze(&mut self, step: usize, sim: &Simulation) -> Result<()>;
}

/// One sampled scalar
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Usize(usize),
    Float(f64),
}
impl Value {
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Usize(v) => *v as f64,
            Value::Float(v) => *v,
        }
    }
}
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Float(v) => v.fmt(f),
            Value::Usize(v) => v.fmt(f),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    /// A fresh path in a per-process scratch directory
    pub(crate) fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ljmd-tests-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("scratch directory");
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }
}
