use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where force evaluation runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Cpu,
}

#[derive(Clone, Debug)]
pub struct ContextOptions {
    pub mode: ExecutionMode,
    /// Worker threads for force evaluation, all cores when `None`
    pub num_threads: Option<usize>,
    /// Default logging threshold of the binary
    pub notice_level: LevelFilter,
}
impl ContextOptions {
    /// The notice level raised by `verbosity` steps, capped at trace
    pub fn log_level(&self, verbosity: u8) -> LevelFilter {
        LevelFilter::iter()
            .nth(self.notice_level as usize + verbosity as usize)
            .unwrap_or(LevelFilter::max())
    }
}
impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Cpu,
            num_threads: None,
            notice_level: LevelFilter::Info,
        }
    }
}

/// Execution resources shared by a simulation
#[derive(Debug)]
pub struct Context {
    options: ContextOptions,
    pool: rayon::ThreadPool,
}
impl Context {
    pub fn initialize(options: ContextOptions) -> Result<Self> {
        if options.num_threads == Some(0) {
            return Err(Error::ContextError(
                "number of threads should be positive".to_string(),
            ));
        }
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("ljmd-worker-{}", i));
        if let Some(n) = options.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| Error::ContextError(e.to_string()))?;
        info!(
            "initialized {:?} execution context with {} threads",
            options.mode,
            pool.current_num_threads()
        );
        Ok(Self { options, pool })
    }
    pub fn options(&self) -> &ContextOptions {
        &self.options
    }
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
    /// Runs `f` on the context's worker threads
    pub fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        self.pool.install(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honors_thread_count() {
        let ctx = Context::initialize(ContextOptions {
            num_threads: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.num_threads(), 2);
        assert_eq!(ctx.install(|| rayon::current_num_threads()), 2);
        assert!(Context::initialize(ContextOptions {
            num_threads: Some(0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn verbosity_raises_notice_level() {
        let options = ContextOptions::default();
        assert_eq!(options.log_level(0), LevelFilter::Info);
        assert_eq!(options.log_level(1), LevelFilter::Debug);
        assert_eq!(options.log_level(5), LevelFilter::Trace);
        let quiet = ContextOptions {
            notice_level: LevelFilter::Warn,
            ..Default::default()
        };
        assert_eq!(quiet.log_level(0), LevelFilter::Warn);
    }
}
