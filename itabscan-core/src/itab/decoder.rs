//! Walks the descriptor graph behind one itab record: the itab itself, its
//! interface type and method table, each method's function type and parameter
//! types, and the concrete type.
//!
//! Addresses stored in the records are virtual addresses and are translated
//! against the section's load address. Method-table offsets (`imethod.name`,
//! `imethod.ityp`) and type name offsets are already section-relative.

use super::layout::{
    FuncTypeDescriptor, IMethod, InterfaceTypeRaw, Itab, SliceHeader, TypeDescriptor,
    FUNC_TYPE_SIZE, IMETHOD_SIZE, INTERFACE_TYPE_SIZE, ITAB_SIZE, PTR_SIZE, TYPE_SIZE,
};
use crate::{Error, Result, Section};
use byteorder::ByteOrder;
use std::io::{self, Cursor};
use std::marker::PhantomData;

pub const RODATA_SECTION: &str = "__rodata";

/// Bounds-checked view over one section's bytes.
#[derive(Debug, Clone, Copy)]
pub struct SectionReader<'a> {
    data: &'a [u8],
    base: u64,
}

impl<'a> SectionReader<'a> {
    pub fn new(section: &'a Section) -> Self {
        Self {
            data: &section.data,
            base: section.addr,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Translates a virtual address into an offset within the section.
    pub fn offset_of(&self, addr: u64) -> Result<usize> {
        addr.checked_sub(self.base)
            .and_then(|off| usize::try_from(off).ok())
            .filter(|&off| off < self.data.len())
            .ok_or(Error::OffsetOutOfRange {
                offset: addr.wrapping_sub(self.base),
                len: 0,
                bound: self.data.len(),
            })
    }

    pub fn span(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(Error::OffsetOutOfRange {
                offset: offset as u64,
                len,
                bound: self.data.len(),
            })
    }

    /// Decodes a fixed-size record from exactly `len` bytes at `offset`.
    fn record<T>(
        &self,
        offset: usize,
        len: usize,
        decode: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T> {
        let bytes = self.span(offset, len)?;
        decode(&mut Cursor::new(bytes)).map_err(|_| Error::OffsetOutOfRange {
            offset: offset as u64,
            len,
            bound: self.data.len(),
        })
    }
}

/// Interface descriptor with its method table followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub typ: TypeDescriptor,
    pub pkg_path: u64,
    pub methods: Vec<IMethod>,
}

/// One interface method with its function type and parameter types resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMethod {
    pub header: IMethod,
    pub func: FuncTypeDescriptor,
    pub inputs: Vec<TypeDescriptor>,
    pub outputs: Vec<TypeDescriptor>,
}

/// One itab record and everything reachable from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedItab {
    pub itab: Itab,
    pub interface: InterfaceDescriptor,
    pub concrete: TypeDescriptor,
    /// Non-sentinel methods in method-table order.
    pub methods: Vec<DecodedMethod>,
}

/// Decodes descriptor records from `__rodata` with byte order `B`.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorDecoder<'a, B> {
    rodata: SectionReader<'a>,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> DescriptorDecoder<'a, B> {
    pub fn new(rodata: &'a Section) -> Self {
        Self {
            rodata: SectionReader::new(rodata),
            _order: PhantomData,
        }
    }

    pub fn reader(&self) -> &SectionReader<'a> {
        &self.rodata
    }

    pub fn decode_itab(&self, addr: u64) -> Result<DecodedItab> {
        let itab = self.itab_at(self.rodata.offset_of(addr)?)?;
        let interface = self.interface_type(itab.inter)?;
        let concrete = self.type_at_addr(itab.typ)?;

        let mut methods = Vec::with_capacity(interface.methods.len());
        for (i, header) in interface.methods.iter().enumerate() {
            if header.is_sentinel(self.rodata.len()) {
                log::warn!(
                    "itab {addr:#x}: skipping padding method header #{i} ({}, {})",
                    header.name,
                    header.ityp
                );
                continue;
            }
            methods.push(self.method(*header)?);
        }

        log::trace!(
            "itab {addr:#x}: {} of {} method headers decoded",
            methods.len(),
            interface.methods.len()
        );
        Ok(DecodedItab {
            itab,
            interface,
            concrete,
            methods,
        })
    }

    pub fn itab_at(&self, offset: usize) -> Result<Itab> {
        self.rodata
            .record(offset, ITAB_SIZE, |r| Itab::from_reader::<B, _>(r))
    }

    pub fn interface_type(&self, addr: u64) -> Result<InterfaceDescriptor> {
        let offset = self.rodata.offset_of(addr)?;
        let raw = self.rodata.record(offset, INTERFACE_TYPE_SIZE, |r| {
            InterfaceTypeRaw::from_reader::<B, _>(r)
        })?;
        Ok(InterfaceDescriptor {
            typ: raw.typ,
            pkg_path: raw.pkg_path,
            methods: self.imethods(&raw.mhdr)?,
        })
    }

    /// Reads `mhdr.len` consecutive method headers starting at `mhdr.data`.
    pub fn imethods(&self, mhdr: &SliceHeader) -> Result<Vec<IMethod>> {
        if mhdr.len == 0 {
            return Ok(Vec::new());
        }
        let start = self.rodata.offset_of(mhdr.data)?;
        let count = usize::try_from(mhdr.len).unwrap_or(usize::MAX);
        let table_len = count.checked_mul(IMETHOD_SIZE).unwrap_or(usize::MAX);
        // Validate the whole table up front so a bogus length cannot drive a huge allocation.
        self.rodata.span(start, table_len)?;

        (0..count)
            .map(|i| {
                self.rodata.record(start + i * IMETHOD_SIZE, IMETHOD_SIZE, |r| {
                    IMethod::from_reader::<B, _>(r)
                })
            })
            .collect()
    }

    pub fn type_at_addr(&self, addr: u64) -> Result<TypeDescriptor> {
        let offset = self.rodata.offset_of(addr)?;
        self.rodata
            .record(offset, TYPE_SIZE, |r| TypeDescriptor::from_reader::<B, _>(r))
    }

    pub fn func_type(&self, offset: usize) -> Result<FuncTypeDescriptor> {
        self.rodata.record(offset, FUNC_TYPE_SIZE, |r| {
            FuncTypeDescriptor::from_reader::<B, _>(r)
        })
    }

    fn method(&self, header: IMethod) -> Result<DecodedMethod> {
        // Non-sentinel headers have a positive, in-section type offset.
        let func_off = header.ityp as usize;
        let func = self.func_type(func_off)?;

        let in_base = func_off + func.slots_offset();
        let out_base = in_base + func.input_count() * PTR_SIZE;
        let inputs = self.param_types(in_base, func.input_count())?;
        let outputs = self.param_types(out_base, func.output_count())?;

        Ok(DecodedMethod {
            header,
            func,
            inputs,
            outputs,
        })
    }

    /// Follows `count` pointer-sized type addresses stored from `base` on.
    fn param_types(&self, base: usize, count: usize) -> Result<Vec<TypeDescriptor>> {
        (0..count)
            .map(|i| {
                let slot = self.rodata.span(base + i * PTR_SIZE, PTR_SIZE)?;
                self.type_at_addr(B::read_u64(slot))
            })
            .collect()
    }
}
