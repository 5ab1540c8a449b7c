use crate::{Error, Result};

use super::decoder::RODATA_SECTION;

const NAME_HEADER_LEN: usize = 4;

/// Text starts after the flag byte and the two length bytes.
const NAME_DATA_OFFSET: usize = 3;

/// Resolves a name offset into `data` to its text.
///
/// The length is always a big-endian `u16` in header bytes 1 and 2, whatever
/// byte order the rest of the section uses.
pub fn name_off_to_text(data: &[u8], name_off: i32) -> Result<String> {
    let offset = usize::try_from(name_off).map_err(|_| Error::OffsetOutOfRange {
        offset: name_off as i64 as u64,
        len: NAME_HEADER_LEN,
        bound: data.len(),
    })?;
    let header = offset
        .checked_add(NAME_HEADER_LEN)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::OffsetOutOfRange {
            offset: offset as u64,
            len: NAME_HEADER_LEN,
            bound: data.len(),
        })?;

    let len = u16::from_be_bytes([header[1], header[2]]) as usize;
    let start = offset + NAME_DATA_OFFSET;
    let text = data
        .get(start..start + len)
        .ok_or_else(|| Error::MalformedSection {
            section: RODATA_SECTION,
            reason: format!(
                "name at {offset:#x} needs {len} bytes, section has {}",
                data.len()
            ),
        })?;
    Ok(String::from_utf8_lossy(text).into_owned())
}

/// Splits `pkg.Name` on the first `.`; a name without one has no package path.
pub fn split_pkg_path_and_name(name: &str) -> (&str, &str) {
    name.split_once('.').unwrap_or(("", name))
}

/// Drops a single leading `*`.
pub fn remove_pointer_from_name(name: &str) -> &str {
    name.strip_prefix('*').unwrap_or(name)
}
