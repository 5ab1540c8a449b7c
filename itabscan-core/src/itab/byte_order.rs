use crate::{Error, Result, Section};

pub const TYPELINK_SECTION: &str = "__typelink";

pub const PROBE_LEN: usize = 16;

/// Byte of the probe read as a big-endian flag.
const BIG_ENDIAN_FLAG: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Infers the byte order of the type data from the `__typelink` probe.
///
/// The last byte of the first 16 is non-zero on big-endian images. This is a
/// toolchain convention, not something the container records.
pub fn detect_byte_order(section: Option<&Section>) -> Result<Endian> {
    let section = section.ok_or_else(|| {
        Error::ByteOrderUndetectable(format!("{TYPELINK_SECTION} section not found"))
    })?;
    let Some(probe) = section.data.get(..PROBE_LEN) else {
        return Err(Error::ByteOrderUndetectable(format!(
            "data length ({}) is smaller than {PROBE_LEN}",
            section.len()
        )));
    };

    let endian = if probe[BIG_ENDIAN_FLAG] != 0 {
        Endian::Big
    } else {
        Endian::Little
    };
    log::debug!("{TYPELINK_SECTION} probe resolved byte order {endian:?}");
    Ok(endian)
}
