use crate::BinaryKind;
use thiserror::Error;

/// Errors raised while opening a container or recovering its interface tables.
///
/// Every variant aborts the whole extraction call; no partial results are
/// returned alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The container was recognised but interface recovery is not implemented for it.
    #[error("interface recovery is not supported for {0} containers")]
    FormatUnsupported(BinaryKind),

    /// The leading magic bytes matched none of the recognised formats.
    #[error("unknown container format")]
    UnknownFormat,

    /// The byte-order probe section is missing or too short.
    #[error("failed to detect byte order: {0}")]
    ByteOrderUndetectable(String),

    /// A required section is absent or a computed span runs past its end.
    #[error("malformed section {section}: {reason}")]
    MalformedSection {
        section: &'static str,
        reason: String,
    },

    /// An itab symbol does not carry `<concrete>,<interface>` in its name.
    #[error("failed to get interface name from itab symbol {0:?}")]
    SymbolNameMalformed(String),

    /// A decoded offset or address falls outside the backing section.
    #[error("offset {offset:#x} (+{len}) out of range for section of {bound:#x} bytes")]
    OffsetOutOfRange { offset: u64, len: usize, bound: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("container parse error: {0}")]
    Container(#[from] goblin::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
