//! Reader and writer for the GSD 2.0 binary container.
//!
//! A file is a 256 byte header followed by data chunks. Each chunk is an
//! `N x M` array of one scalar type, addressed by frame and name through an
//! index of 32 byte entries and a namelist of 64 byte names. The index and
//! namelist live in preallocated blocks that are filled in place at the end of
//! each frame. A full block is copied to the end of the file with twice the
//! capacity and the header is pointed at the copy, so a file is valid
//! whenever no frame is pending.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

use num_traits::ToBytes;

use crate::{Error, Result};

pub const GSD_MAGIC: u64 = 0x65DF_65DF_65DF_65DF;
pub const GSD_VERSION: u32 = 2 << 16;
const HEADER_SIZE: usize = 256;
const INDEX_ENTRY_SIZE: usize = 32;
const NAME_SIZE: usize = 64;
const STRING_SIZE: usize = 64;
const INITIAL_INDEX_ENTRIES: usize = 128;
const INITIAL_NAMELIST_ENTRIES: usize = 64;

/// Element type of a chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkType {
    U8 = 1,
    U16 = 2,
    U32 = 3,
    U64 = 4,
    I8 = 5,
    I16 = 6,
    I32 = 7,
    I64 = 8,
    F32 = 9,
    F64 = 10,
}
impl ChunkType {
    pub fn size(&self) -> usize {
        match self {
            ChunkType::U8 | ChunkType::I8 => 1,
            ChunkType::U16 | ChunkType::I16 => 2,
            ChunkType::U32 | ChunkType::I32 | ChunkType::F32 => 4,
            ChunkType::U64 | ChunkType::I64 | ChunkType::F64 => 8,
        }
    }
    fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            1 => ChunkType::U8,
            2 => ChunkType::U16,
            3 => ChunkType::U32,
            4 => ChunkType::U64,
            5 => ChunkType::I8,
            6 => ChunkType::I16,
            7 => ChunkType::I32,
            8 => ChunkType::I64,
            9 => ChunkType::F32,
            10 => ChunkType::F64,
            _ => return None,
        })
    }
}

/// Scalars that can be stored in a chunk
pub trait GsdScalar: ToBytes + Copy {
    const TYPE: ChunkType;
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_gsd_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl GsdScalar for $t {
                const TYPE: ChunkType = ChunkType::$variant;
                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(bytes);
                    <$t>::from_le_bytes(buf)
                }
            }
        )*
    };
}
impl_gsd_scalar!(
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    f32 => F32, f64 => F64,
);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub frame: u64,
    pub n: u64,
    pub location: i64,
    pub m: u32,
    pub id: u16,
    pub chunk_type: ChunkType,
    pub flags: u8,
}
impl IndexEntry {
    fn to_bytes(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut out = [0u8; INDEX_ENTRY_SIZE];
        out[0..8].copy_from_slice(&self.frame.to_le_bytes());
        out[8..16].copy_from_slice(&self.n.to_le_bytes());
        out[16..24].copy_from_slice(&self.location.to_le_bytes());
        out[24..28].copy_from_slice(&self.m.to_le_bytes());
        out[28..30].copy_from_slice(&self.id.to_le_bytes());
        out[30] = self.chunk_type as u8;
        out[31] = self.flags;
        out
    }
    /// `None` for an unused (zeroed) slot
    fn from_bytes(bytes: &[u8]) -> Result<Option<Self>> {
        let location = i64::read_le(&bytes[16..24]);
        if location == 0 {
            return Ok(None);
        }
        let chunk_type = ChunkType::from_u8(bytes[30])
            .ok_or_else(|| Error::OutputError(format!("invalid chunk type {}", bytes[30])))?;
        Ok(Some(Self {
            frame: u64::read_le(&bytes[0..8]),
            n: u64::read_le(&bytes[8..16]),
            location,
            m: u32::read_le(&bytes[24..28]),
            id: u16::read_le(&bytes[28..30]),
            chunk_type,
            flags: bytes[31],
        }))
    }
    fn data_len(&self) -> usize {
        self.n as usize * self.m as usize * self.chunk_type.size()
    }
}

#[derive(Clone, Debug)]
struct Header {
    index_location: u64,
    index_allocated_entries: u64,
    namelist_location: u64,
    namelist_allocated_entries: u64,
    schema_version: u32,
    gsd_version: u32,
    application: String,
    schema: String,
}
impl Header {
    fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..8].copy_from_slice(&GSD_MAGIC.to_le_bytes());
        out[8..16].copy_from_slice(&self.index_location.to_le_bytes());
        out[16..24].copy_from_slice(&self.index_allocated_entries.to_le_bytes());
        out[24..32].copy_from_slice(&self.namelist_location.to_le_bytes());
        out[32..40].copy_from_slice(&self.namelist_allocated_entries.to_le_bytes());
        out[40..44].copy_from_slice(&self.schema_version.to_le_bytes());
        out[44..48].copy_from_slice(&self.gsd_version.to_le_bytes());
        write_str(&mut out[48..48 + STRING_SIZE], &self.application);
        write_str(&mut out[112..112 + STRING_SIZE], &self.schema);
        out
    }
    fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        if u64::read_le(&bytes[0..8]) != GSD_MAGIC {
            return Err(Error::OutputError("not a GSD file".to_string()));
        }
        let gsd_version = u32::read_le(&bytes[44..48]);
        if gsd_version >> 16 != 2 {
            return Err(Error::OutputError(format!(
                "unsupported GSD version {}.{}",
                gsd_version >> 16,
                gsd_version & 0xffff
            )));
        }
        Ok(Self {
            index_location: u64::read_le(&bytes[8..16]),
            index_allocated_entries: u64::read_le(&bytes[16..24]),
            namelist_location: u64::read_le(&bytes[24..32]),
            namelist_allocated_entries: u64::read_le(&bytes[32..40]),
            schema_version: u32::read_le(&bytes[40..44]),
            gsd_version,
            application: read_str(&bytes[48..48 + STRING_SIZE]),
            schema: read_str(&bytes[112..112 + STRING_SIZE]),
        })
    }
}

fn write_str(out: &mut [u8], s: &str) {
    // Always leave a terminating NUL
    let len = s.len().min(out.len() - 1);
    out[..len].copy_from_slice(&s.as_bytes()[..len]);
}

fn read_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// How an existing file is opened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    Append,
}

/// An open GSD file
#[derive(Debug)]
pub struct GsdFile {
    file: File,
    mode: OpenMode,
    header: Header,
    index: Vec<IndexEntry>,
    names: Vec<String>,
    /// Entries and names already stored in the on-disk blocks
    index_written: usize,
    names_written: usize,
    /// Frame that chunks are currently written to
    cur_frame: u64,
}
impl GsdFile {
    /// Creates (truncating) a file ready for writing
    pub fn create(
        path: impl AsRef<Path>,
        application: &str,
        schema: &str,
        schema_version: u32,
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut gsd = Self {
            file,
            mode: OpenMode::Append,
            header: Header {
                index_location: 0,
                index_allocated_entries: 0,
                namelist_location: 0,
                namelist_allocated_entries: 0,
                schema_version,
                gsd_version: GSD_VERSION,
                application: application.to_string(),
                schema: schema.to_string(),
            },
            index: Vec::new(),
            names: Vec::new(),
            index_written: 0,
            names_written: 0,
            cur_frame: 0,
        };
        gsd.file.write_all(&gsd.header.to_bytes())?;
        gsd.write_index()?;
        Ok(gsd)
    }

    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::Append)
            .open(path)?;
        let mut buf = [0u8; HEADER_SIZE];
        file.read_exact(&mut buf)?;
        let header = Header::from_bytes(&buf)?;

        let mut index_bytes = vec![0u8; header.index_allocated_entries as usize * INDEX_ENTRY_SIZE];
        file.seek(SeekFrom::Start(header.index_location))?;
        file.read_exact(&mut index_bytes)?;
        let mut index = Vec::new();
        for chunk in index_bytes.chunks_exact(INDEX_ENTRY_SIZE) {
            match IndexEntry::from_bytes(chunk)? {
                Some(entry) => index.push(entry),
                None => break,
            }
        }

        let mut name_bytes = vec![0u8; header.namelist_allocated_entries as usize * NAME_SIZE];
        file.seek(SeekFrom::Start(header.namelist_location))?;
        file.read_exact(&mut name_bytes)?;
        let names: Vec<String> = name_bytes
            .chunks_exact(NAME_SIZE)
            .map(read_str)
            .take_while(|n| !n.is_empty())
            .collect();

        if let Some(bad) = index.iter().find(|e| e.id as usize >= names.len()) {
            return Err(Error::OutputError(format!(
                "index entry refers to missing name id {}",
                bad.id
            )));
        }
        let cur_frame = index.last().map_or(0, |e| e.frame + 1);
        Ok(Self {
            file,
            mode,
            header,
            index_written: index.len(),
            names_written: names.len(),
            index,
            names,
            cur_frame,
        })
    }

    pub fn application(&self) -> &str {
        &self.header.application
    }
    pub fn schema(&self) -> &str {
        &self.header.schema
    }
    pub fn schema_version(&self) -> u32 {
        self.header.schema_version
    }
    /// Number of completed frames
    pub fn nframes(&self) -> u64 {
        self.cur_frame
    }
    pub fn find_chunk(&self, frame: u64, name: &str) -> Option<&IndexEntry> {
        let id = self.names.iter().position(|n| n == name)? as u16;
        self.index.iter().find(|e| e.frame == frame && e.id == id)
    }
    /// Names of the chunks present in a frame
    pub fn chunk_names(&self, frame: u64) -> Vec<&str> {
        self.index
            .iter()
            .filter(|e| e.frame == frame)
            .map(|e| self.names[e.id as usize].as_str())
            .collect()
    }

    pub fn write_chunk<T: GsdScalar>(&mut self, name: &str, n: u64, m: u32, data: &[T]) -> Result<()> {
        if self.mode != OpenMode::Append {
            return Err(Error::OutputError("file is open read-only".to_string()));
        }
        if name.is_empty() || name.len() >= NAME_SIZE {
            return Err(Error::OutputError(format!("invalid chunk name {:?}", name)));
        }
        if data.len() as u64 != n * m as u64 || n == 0 || m == 0 {
            return Err(Error::OutputError(format!(
                "chunk {} has {} elements, expected {} x {}",
                name,
                data.len(),
                n,
                m
            )));
        }
        let pending = &self.index[self.index_written..];
        if pending.iter().any(|e| self.names[e.id as usize] == name) {
            return Err(Error::OutputError(format!(
                "chunk {} already written in frame {}",
                name, self.cur_frame
            )));
        }
        let id = match self.names.iter().position(|x| x == name) {
            Some(id) => id,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        };

        let mut bytes = Vec::with_capacity(data.len() * T::TYPE.size());
        for value in data {
            bytes.extend_from_slice(value.to_le_bytes().as_ref());
        }
        let location = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(&bytes)?;

        self.index.push(IndexEntry {
            frame: self.cur_frame,
            n,
            location: location as i64,
            m,
            id: id as u16,
            chunk_type: T::TYPE,
            flags: 0,
        });
        Ok(())
    }

    /// Completes the current frame and makes it visible to readers
    pub fn end_frame(&mut self) -> Result<()> {
        if self.mode != OpenMode::Append {
            return Err(Error::OutputError("file is open read-only".to_string()));
        }
        self.cur_frame += 1;
        self.write_index()?;
        self.file.flush()?;
        Ok(())
    }

    pub fn read_chunk<T: GsdScalar>(&mut self, frame: u64, name: &str) -> Result<Option<Vec<T>>> {
        let entry = match self.find_chunk(frame, name) {
            Some(e) => e.clone(),
            None => return Ok(None),
        };
        if entry.chunk_type != T::TYPE {
            return Err(Error::OutputError(format!(
                "chunk {} has type {:?}, requested {:?}",
                name,
                entry.chunk_type,
                T::TYPE
            )));
        }
        let mut bytes = vec![0u8; entry.data_len()];
        self.file.seek(SeekFrom::Start(entry.location as u64))?;
        self.file.read_exact(&mut bytes)?;
        Ok(Some(
            bytes
                .chunks_exact(T::TYPE.size())
                .map(T::read_le)
                .collect(),
        ))
    }

    fn write_index(&mut self) -> Result<()> {
        let committed = self
            .index
            .iter()
            .take_while(|e| e.frame < self.cur_frame)
            .count();

        // One zeroed slot terminates the index
        let capacity = self.header.index_allocated_entries as usize;
        if committed + 1 > capacity {
            let capacity = grown_capacity(capacity, committed + 1, INITIAL_INDEX_ENTRIES);
            let mut bytes = Vec::with_capacity(capacity * INDEX_ENTRY_SIZE);
            for entry in &self.index[..committed] {
                bytes.extend_from_slice(&entry.to_bytes());
            }
            bytes.resize(capacity * INDEX_ENTRY_SIZE, 0);
            self.header.index_location = self.file.seek(SeekFrom::End(0))?;
            self.header.index_allocated_entries = capacity as u64;
            self.file.write_all(&bytes)?;
        } else if committed > self.index_written {
            let mut bytes = Vec::with_capacity((committed - self.index_written) * INDEX_ENTRY_SIZE);
            for entry in &self.index[self.index_written..committed] {
                bytes.extend_from_slice(&entry.to_bytes());
            }
            let offset = (self.index_written * INDEX_ENTRY_SIZE) as u64;
            self.file
                .seek(SeekFrom::Start(self.header.index_location + offset))?;
            self.file.write_all(&bytes)?;
        }
        self.index_written = committed;

        // Same for the namelist, which only changes when a name is new
        let num_names = self.names.len();
        let capacity = self.header.namelist_allocated_entries as usize;
        if num_names + 1 > capacity {
            let capacity = grown_capacity(capacity, num_names + 1, INITIAL_NAMELIST_ENTRIES);
            let mut bytes = vec![0u8; capacity * NAME_SIZE];
            for (k, name) in self.names.iter().enumerate() {
                write_str(&mut bytes[k * NAME_SIZE..(k + 1) * NAME_SIZE], name);
            }
            self.header.namelist_location = self.file.seek(SeekFrom::End(0))?;
            self.header.namelist_allocated_entries = capacity as u64;
            self.file.write_all(&bytes)?;
        } else if num_names > self.names_written {
            let mut bytes = vec![0u8; (num_names - self.names_written) * NAME_SIZE];
            for (k, name) in self.names[self.names_written..].iter().enumerate() {
                write_str(&mut bytes[k * NAME_SIZE..(k + 1) * NAME_SIZE], name);
            }
            let offset = (self.names_written * NAME_SIZE) as u64;
            self.file
                .seek(SeekFrom::Start(self.header.namelist_location + offset))?;
            self.file.write_all(&bytes)?;
        }
        self.names_written = num_names;

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.header.to_bytes())?;
        Ok(())
    }
}

/// Doubles `current` (or starts from `initial`) until `needed` fits
fn grown_capacity(current: usize, needed: usize, initial: usize) -> usize {
    let mut capacity = current.max(initial);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}
