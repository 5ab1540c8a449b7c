use crate::elf::{ElfFile, ELF_MAGIC};
use crate::macho::{MachOFile, MACHO_MAGIC, MACHO_MAGIC_REVERSED};
use crate::pe::{PeFile, PE_MAGIC};
use crate::{Container, Error, InterfaceType, Result};
use std::fmt;
use std::io::{self, Read};

/// Number of leading bytes inspected to pick a container reader.
pub const MAGIC_PROBE_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKind {
    Unknown,
    Elf,
    MachO,
    Pe,
}

impl BinaryKind {
    /// Classifies a container by its leading bytes.
    pub fn sniff(probe: &[u8]) -> BinaryKind {
        if probe.starts_with(ELF_MAGIC) {
            BinaryKind::Elf
        } else if probe.starts_with(PE_MAGIC) {
            BinaryKind::Pe
        } else if probe.starts_with(MACHO_MAGIC)
            || probe.get(1..).is_some_and(|p| p.starts_with(MACHO_MAGIC_REVERSED))
        {
            BinaryKind::MachO
        } else {
            BinaryKind::Unknown
        }
    }
}

impl fmt::Display for BinaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryKind::Elf => "elf",
            BinaryKind::MachO => "macho",
            BinaryKind::Pe => "pe",
            BinaryKind::Unknown => "",
        };
        write!(f, "{}", name)
    }
}

/// An opened executable, one variant per recognised container format.
#[derive(Debug)]
pub enum Binary {
    Elf(ElfFile),
    MachO(MachOFile),
    Pe(PeFile),
}

impl Binary {
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut file = std::fs::File::open(&path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        log::info!("Read {} bytes from {}", buf.len(), path.as_ref().display());
        Self::from_bytes(buf)
    }

    /// Picks a reader from the first [`MAGIC_PROBE_LEN`] bytes of `buf`.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Self> {
        let Some(probe) = buf.get(..MAGIC_PROBE_LEN) else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("need {MAGIC_PROBE_LEN} bytes to detect format, got {}", buf.len()),
            )
            .into());
        };

        match BinaryKind::sniff(probe) {
            BinaryKind::Elf => Ok(Binary::Elf(ElfFile::new(buf))),
            BinaryKind::Pe => Ok(Binary::Pe(PeFile::new(buf))),
            BinaryKind::MachO => Ok(Binary::MachO(MachOFile::parse(&buf)?)),
            BinaryKind::Unknown => Err(Error::UnknownFormat),
        }
    }

    fn container(&self) -> &dyn Container {
        match self {
            Binary::Elf(f) => f,
            Binary::MachO(f) => f,
            Binary::Pe(f) => f,
        }
    }

    pub fn kind(&self) -> BinaryKind {
        self.container().kind()
    }

    pub fn defined_interface_types(&self) -> Result<Vec<InterfaceType>> {
        self.container().defined_interface_types()
    }
}
