use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::info;

use super::Analyzer;
use crate::{compute::Compute, Error, Result, Simulation};

/// Writes selected scalar quantities to a tab-separated text file, one row per
/// sampled step.
#[derive(Debug)]
pub struct LogWriter {
    filename: PathBuf,
    quantities: Vec<String>,
    period: usize,
    overwrite: bool,
    computes: Vec<Compute>,
    file: Option<BufWriter<File>>,
}

impl LogWriter {
    pub fn new(
        filename: impl Into<PathBuf>,
        quantities: &[&str],
        period: usize,
        overwrite: bool,
    ) -> Result<Self> {
        if period == 0 {
            return Err(Error::OutputError("log period should be positive".to_string()));
        }
        if quantities.is_empty() {
            return Err(Error::OutputError("no quantities to log".to_string()));
        }
        Ok(Self {
            filename: filename.into(),
            quantities: quantities.iter().map(|q| q.to_string()).collect(),
            period,
            overwrite,
            computes: Vec::new(),
            file: None,
        })
    }
    pub fn filename(&self) -> &PathBuf {
        &self.filename
    }
    pub fn quantities(&self) -> &[String] {
        &self.quantities
    }

    fn open(&mut self) -> Result<()> {
        let file = if self.overwrite {
            File::create(&self.filename)?
        } else {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.filename)?
        };
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = BufWriter::new(file);
        if needs_header {
            let mut header = String::from("timestep");
            for c in &self.computes {
                header.push('\t');
                header.push_str(&c.name());
            }
            writeln!(writer, "{}", header)?;
            writer.flush()?;
        } else {
            info!("appending to existing log {}", self.filename.display());
        }
        self.file = Some(writer);
        Ok(())
    }
}

impl Analyzer for LogWriter {
    fn name(&self) -> &str {
        "log"
    }
    fn period(&self) -> usize {
        self.period
    }
    fn attach(&mut self, sim: &Simulation) -> Result<()> {
        self.computes = self
            .quantities
            .iter()
            .map(|q| Compute::from_name(q, sim))
            .collect::<Result<_>>()?;
        if self.file.is_none() {
            self.open()?;
        }
        Ok(())
    }
    fn analyze(&mut self, step: usize, sim: &Simulation) -> Result<()> {
        let mut row = step.to_string();
        for c in &self.computes {
            row.push('\t');
            row.push_str(&c.compute(sim).to_string());
        }
        let writer = self
            .file
            .as_mut()
            .ok_or_else(|| Error::OutputError("log writer is not attached".to_string()))?;
        writeln!(writer, "{}", row)?;
        writer.flush()?;
        Ok(())
    }
}
