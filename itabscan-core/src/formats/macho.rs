use crate::{itab, BinaryKind, Container, ContainerImage, InterfaceType, Result};
use goblin::mach::MachO;

/// `\xFE\xED\xFA` opens big-endian headers; little-endian ones carry
/// `\xFA\xED\xFE` one byte in.
pub const MACHO_MAGIC: &[u8] = b"\xFE\xED\xFA";
pub const MACHO_MAGIC_REVERSED: &[u8] = b"\xFA\xED\xFE";

/// Mach-O reader, the one container itab recovery is implemented for.
#[derive(Debug)]
pub struct MachOFile {
    pub image: ContainerImage,
    pub is_64: bool,
    pub little_endian: bool,
}

impl MachOFile {
    /// Parses a thin Mach-O image and copies out its sections and symbols.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let macho = MachO::parse(bytes, 0)?;
        let image = ContainerImage::from_goblin_macho(&macho)?;
        log::info!(
            "Mach-O: {}-bit {}, {} sections",
            if macho.is_64 { 64 } else { 32 },
            if macho.little_endian { "little-endian" } else { "big-endian" },
            image.sections.len()
        );
        Ok(Self {
            image,
            is_64: macho.is_64,
            little_endian: macho.little_endian,
        })
    }
}

impl Container for MachOFile {
    fn kind(&self) -> BinaryKind {
        BinaryKind::MachO
    }

    fn defined_interface_types(&self) -> Result<Vec<InterfaceType>> {
        itab::defined_interface_types(&self.image)
    }
}
