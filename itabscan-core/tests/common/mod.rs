//! Synthetic container files for integration tests.

use std::io::Write;
use tempfile::NamedTempFile;

pub const RODATA_ADDR: u64 = 0x10_0000;
pub const ITAB_SYMBOL: &str = "go.itab.*runtime.errorString,error";

const RODATA_LEN: usize = 0x200;

/// Writes `bytes` to a fresh temporary file kept alive by the returned handle.
pub fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn put_u16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_u64(buf: &mut [u8], at: usize, v: u64) {
    buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

fn put_name(buf: &mut [u8], at: usize, text: &str) {
    buf[at] = 0x01;
    buf[at + 1..at + 3].copy_from_slice(&(text.len() as u16).to_be_bytes());
    buf[at + 3..at + 3 + text.len()].copy_from_slice(text.as_bytes());
}

/// Little-endian `__rodata` with one itab binding `*runtime.errorString` to `error`.
///
/// itab 0x00, interfacetype 0x20, method table 0x70, concrete type 0x80,
/// funcType 0xb0 (`func() string`), string type 0xf0, names from 0x140.
pub fn error_itab_rodata() -> Vec<u8> {
    let mut buf = vec![0u8; RODATA_LEN];
    let base = RODATA_ADDR;

    put_u64(&mut buf, 0x00, base + 0x20);
    put_u64(&mut buf, 0x08, base + 0x80);

    buf[0x20 + 23] = 20;
    put_u64(&mut buf, 0x20 + 56, base + 0x70);
    put_u64(&mut buf, 0x20 + 64, 1);
    put_u64(&mut buf, 0x20 + 72, 1);

    put_u32(&mut buf, 0x70, 0x140);
    put_u32(&mut buf, 0x74, 0xb0);

    buf[0x80 + 23] = 22;
    put_u32(&mut buf, 0x80 + 40, 0x150);

    buf[0xb0 + 23] = 19;
    put_u32(&mut buf, 0xb0 + 40, 0x170);
    put_u16(&mut buf, 0xb0 + 48, 0);
    put_u16(&mut buf, 0xb0 + 50, 1);
    put_u64(&mut buf, 0xb0 + 56, base + 0xf0);

    buf[0xf0 + 23] = 24;
    put_u32(&mut buf, 0xf0 + 40, 0x190);

    put_name(&mut buf, 0x140, "Error");
    put_name(&mut buf, 0x150, "*runtime.errorString");
    put_name(&mut buf, 0x170, "*func() string");
    put_name(&mut buf, 0x190, "string");
    buf
}

fn put_name16(buf: &mut [u8], at: usize, name: &str) {
    buf[at..at + name.len()].copy_from_slice(name.as_bytes());
}

/// Minimal 64-bit little-endian Mach-O executable: one `__TEXT` segment with
/// `__rodata` and `__typelink`, and a symbol table listing `symbols`.
pub fn macho_image(rodata: &[u8], symbols: &[(&str, u64)]) -> Vec<u8> {
    const HEADER_LEN: usize = 32;
    const SEGMENT_CMD_LEN: usize = 72;
    const SECTION_LEN: usize = 80;
    const SYMTAB_CMD_LEN: usize = 24;
    const NLIST_LEN: usize = 16;
    const RODATA_OFF: usize = 0x200;
    const TYPELINK_LEN: usize = 32;

    let typelink_off = RODATA_OFF + rodata.len();
    let symoff = typelink_off + TYPELINK_LEN;
    let stroff = symoff + symbols.len() * NLIST_LEN;

    let mut strtab = vec![0u8];
    let mut strx = Vec::new();
    for (name, _) in symbols {
        strx.push(strtab.len() as u32);
        strtab.extend_from_slice(name.as_bytes());
        strtab.push(0);
    }

    let mut buf = vec![0u8; stroff + strtab.len()];
    let seg_cmd_len = SEGMENT_CMD_LEN + 2 * SECTION_LEN;

    // mach_header_64
    put_u32(&mut buf, 0, 0xfeed_facf);
    put_u32(&mut buf, 4, 0x0100_0007);
    put_u32(&mut buf, 8, 3);
    put_u32(&mut buf, 12, 2);
    put_u32(&mut buf, 16, 2);
    put_u32(&mut buf, 20, (seg_cmd_len + SYMTAB_CMD_LEN) as u32);

    // LC_SEGMENT_64
    let seg = HEADER_LEN;
    put_u32(&mut buf, seg, 0x19);
    put_u32(&mut buf, seg + 4, seg_cmd_len as u32);
    put_name16(&mut buf, seg + 8, "__TEXT");
    put_u64(&mut buf, seg + 24, RODATA_ADDR);
    put_u64(&mut buf, seg + 32, 0x2000);
    put_u64(&mut buf, seg + 40, RODATA_OFF as u64);
    put_u64(&mut buf, seg + 48, (rodata.len() + TYPELINK_LEN) as u64);
    put_u32(&mut buf, seg + 56, 5);
    put_u32(&mut buf, seg + 60, 5);
    put_u32(&mut buf, seg + 64, 2);

    let sections = [
        ("__rodata", RODATA_ADDR, rodata.len(), RODATA_OFF),
        (
            "__typelink",
            RODATA_ADDR + rodata.len() as u64,
            TYPELINK_LEN,
            typelink_off,
        ),
    ];
    for (i, (name, addr, size, offset)) in sections.iter().enumerate() {
        let sect = seg + SEGMENT_CMD_LEN + i * SECTION_LEN;
        put_name16(&mut buf, sect, name);
        put_name16(&mut buf, sect + 16, "__TEXT");
        put_u64(&mut buf, sect + 32, *addr);
        put_u64(&mut buf, sect + 40, *size as u64);
        put_u32(&mut buf, sect + 48, *offset as u32);
        put_u32(&mut buf, sect + 52, 3);
    }

    // LC_SYMTAB
    let symtab = seg + seg_cmd_len;
    put_u32(&mut buf, symtab, 0x2);
    put_u32(&mut buf, symtab + 4, SYMTAB_CMD_LEN as u32);
    put_u32(&mut buf, symtab + 8, symoff as u32);
    put_u32(&mut buf, symtab + 12, symbols.len() as u32);
    put_u32(&mut buf, symtab + 16, stroff as u32);
    put_u32(&mut buf, symtab + 20, strtab.len() as u32);

    buf[RODATA_OFF..RODATA_OFF + rodata.len()].copy_from_slice(rodata);
    // __typelink stays zeroed: little-endian.

    for (i, (_, value)) in symbols.iter().enumerate() {
        let nl = symoff + i * NLIST_LEN;
        put_u32(&mut buf, nl, strx[i]);
        buf[nl + 4] = 0x0f; // N_SECT | N_EXT
        buf[nl + 5] = 1;
        put_u64(&mut buf, nl + 8, *value);
    }
    buf[stroff..].copy_from_slice(&strtab);
    buf
}
