use crate::{BinaryKind, Container, Error, InterfaceType, Result};

pub const PE_MAGIC: &[u8] = b"MZ";

/// PE reader. Itab recovery is not implemented for PE images yet.
#[derive(Debug)]
pub struct PeFile {
    data: Vec<u8>,
}

impl PeFile {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Container for PeFile {
    fn kind(&self) -> BinaryKind {
        BinaryKind::Pe
    }

    fn defined_interface_types(&self) -> Result<Vec<InterfaceType>> {
        log::warn!("interface recovery requested for a PE image");
        Err(Error::FormatUnsupported(BinaryKind::Pe))
    }
}
