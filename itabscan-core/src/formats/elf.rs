use crate::{BinaryKind, Container, Error, InterfaceType, Result};

pub const ELF_MAGIC: &[u8] = b"\x7FELF";

/// ELF reader. Itab recovery is not implemented for ELF images yet.
#[derive(Debug)]
pub struct ElfFile {
    data: Vec<u8>,
}

impl ElfFile {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Container for ElfFile {
    fn kind(&self) -> BinaryKind {
        BinaryKind::Elf
    }

    fn defined_interface_types(&self) -> Result<Vec<InterfaceType>> {
        log::warn!("interface recovery requested for an ELF image");
        Err(Error::FormatUnsupported(BinaryKind::Elf))
    }
}
