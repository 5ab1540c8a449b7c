pub mod elf;
pub mod macho;
pub mod pe;

use crate::{BinaryKind, InterfaceType, Result};

/// Capabilities every container reader exposes, whether or not it can
/// actually recover interface tables.
pub trait Container: std::fmt::Debug + Send + Sync {
    /// Returns which container format this reader handles.
    fn kind(&self) -> BinaryKind;

    /// Returns every interface implementation recorded in the binary.
    fn defined_interface_types(&self) -> Result<Vec<InterfaceType>>;
}
