use std::path::PathBuf;

use log::info;

use super::{
    gsd::{GsdFile, OpenMode},
    Analyzer,
};
use crate::{Error, Group, Result, Simulation};

const APPLICATION: &str = concat!("ljmd ", env!("CARGO_PKG_VERSION"));
const SCHEMA: &str = "hoomd";
const SCHEMA_VERSION: u32 = (1 << 16) | 4;

/// Periodically dumps snapshots of a particle group to a GSD trajectory.
///
/// Positions and images are written every frame. Type information, masses,
/// diameters, velocities and the box are written with the first frame of a
/// file, where readers fall back to for later frames.
#[derive(Debug)]
pub struct GsdWriter {
    filename: PathBuf,
    period: usize,
    group: Group,
    overwrite: bool,
    file: Option<GsdFile>,
}

impl GsdWriter {
    pub fn new(
        filename: impl Into<PathBuf>,
        period: usize,
        group: Group,
        overwrite: bool,
    ) -> Result<Self> {
        if period == 0 {
            return Err(Error::OutputError("dump period should be positive".to_string()));
        }
        Ok(Self {
            filename: filename.into(),
            period,
            group,
            overwrite,
            file: None,
        })
    }
    pub fn filename(&self) -> &PathBuf {
        &self.filename
    }

    fn open(&mut self) -> Result<GsdFile> {
        let exists = self
            .filename
            .metadata()
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !self.overwrite && exists {
            let file = GsdFile::open(&self.filename, OpenMode::Append)?;
            if file.schema() != SCHEMA {
                return Err(Error::OutputError(format!(
                    "cannot append to {} with schema {}",
                    self.filename.display(),
                    file.schema()
                )));
            }
            info!(
                "appending to {} after {} frames",
                self.filename.display(),
                file.nframes()
            );
            Ok(file)
        } else {
            GsdFile::create(&self.filename, APPLICATION, SCHEMA, SCHEMA_VERSION)
        }
    }
}

impl Analyzer for GsdWriter {
    fn name(&self) -> &str {
        "gsd"
    }
    fn period(&self) -> usize {
        self.period
    }
    fn attach(&mut self, _sim: &Simulation) -> Result<()> {
        if self.file.is_none() {
            self.file = Some(self.open()?);
        }
        Ok(())
    }
    fn analyze(&mut self, step: usize, sim: &Simulation) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::OutputError("trajectory writer is not attached".to_string()))?;
        let atoms = sim.atoms();
        let idxs = self.group.indices(atoms);
        let n = idxs.len() as u64;
        let first_frame = file.nframes() == 0;

        file.write_chunk("configuration/step", 1, 1, &[step as u64])?;
        if first_frame {
            let l = sim.container().lengths();
            file.write_chunk("configuration/dimensions", 1, 1, &[3u8])?;
            file.write_chunk(
                "configuration/box",
                6,
                1,
                &[l[0] as f32, l[1] as f32, l[2] as f32, 0.0, 0.0, 0.0],
            )?;
        }
        file.write_chunk("particles/N", 1, 1, &[n as u32])?;
        if n == 0 {
            return file.end_frame();
        }

        let position: Vec<f32> = idxs
            .iter()
            .flat_map(|&i| atoms.positions()[i].map(|x| x as f32))
            .collect();
        file.write_chunk("particles/position", n, 3, &position)?;
        let image: Vec<i32> = idxs.iter().flat_map(|&i| atoms.images()[i]).collect();
        file.write_chunk("particles/image", n, 3, &image)?;

        if first_frame {
            let names = atoms.type_names();
            let width = names.iter().map(|s| s.len()).max().unwrap_or(0) + 1;
            let mut types = vec![0i8; names.len() * width];
            for (t, name) in names.iter().enumerate() {
                for (k, b) in name.bytes().enumerate() {
                    types[t * width + k] = b as i8;
                }
            }
            file.write_chunk("particles/types", names.len() as u64, width as u32, &types)?;

            let typeid: Vec<u32> = idxs.iter().map(|&i| atoms.types()[i] as u32).collect();
            file.write_chunk("particles/typeid", n, 1, &typeid)?;
            let mass: Vec<f32> = idxs.iter().map(|&i| atoms.mass(i) as f32).collect();
            file.write_chunk("particles/mass", n, 1, &mass)?;
            let diameter: Vec<f32> = idxs
                .iter()
                .map(|&i| atoms.atom_types()[atoms.types()[i]].diameter() as f32)
                .collect();
            file.write_chunk("particles/diameter", n, 1, &diameter)?;
            let velocity: Vec<f32> = idxs
                .iter()
                .flat_map(|&i| atoms.velocities()[i].map(|x| x as f32))
                .collect();
            file.write_chunk("particles/velocity", n, 3, &velocity)?;
        }

        file.end_frame()
    }
}
