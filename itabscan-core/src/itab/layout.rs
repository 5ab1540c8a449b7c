//! Fixed layouts of the runtime type records the Go toolchain emits into
//! `__rodata`, for 64-bit targets.
//!
//! Every record is decoded field by field from an exactly-sized slice; sizes are
//! derived from the field widths below rather than measured at runtime.

use bitflags::bitflags;
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{self, Read};

pub const PTR_SIZE: usize = 8;

const fn align_up(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}

/// `_type`: size, ptrdata, hash, tflag, align, fieldAlign, kind, equal, gcdata, str, ptrToThis.
pub const TYPE_SIZE: usize = PTR_SIZE + PTR_SIZE + 4 + 1 + 1 + 1 + 1 + PTR_SIZE + PTR_SIZE + 4 + 4;

/// `funcType`: `_type` followed by inCount and outCount, padded to pointer alignment.
pub const FUNC_TYPE_SIZE: usize = align_up(TYPE_SIZE + 2 + 2, PTR_SIZE);

/// `uncommonType`: pkgPath, mcount, xcount, moff, unused.
pub const UNCOMMON_TYPE_SIZE: usize = 4 + 2 + 2 + 4 + 4;

/// `itab`: inter, _type, hash, padding, fun[1].
pub const ITAB_SIZE: usize = PTR_SIZE + PTR_SIZE + 4 + 4 + PTR_SIZE;

pub const SLICE_HEADER_SIZE: usize = 3 * PTR_SIZE;

/// `interfacetype`: embedded `_type`, pkgpath name pointer, mhdr slice.
pub const INTERFACE_TYPE_SIZE: usize = TYPE_SIZE + PTR_SIZE + SLICE_HEADER_SIZE;

/// `imethod`: name and ityp offsets.
pub const IMETHOD_SIZE: usize = 4 + 4;

pub const KIND_MASK: u8 = (1 << 5) - 1;
pub const KIND_PTR: u8 = 22;

/// Bit 15 of `funcType.outCount` marks a variadic function.
pub const VARIADIC_FLAG: u16 = 1 << 15;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TFlag: u8 {
        const UNCOMMON = 1 << 0;
        const EXTRA_STAR = 1 << 1;
        const NAMED = 1 << 2;
        const REGULAR_MEMORY = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub size: u64,
    pub ptrdata: u64,
    pub hash: u32,
    pub tflag: TFlag,
    pub align: u8,
    pub field_align: u8,
    pub kind: u8,
    pub equal: u64,
    pub gcdata: u64,
    /// Name offset of the type's own string.
    pub str: i32,
    pub ptr_to_this: i32,
}

impl TypeDescriptor {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(TypeDescriptor {
            size: r.read_u64::<B>()?,
            ptrdata: r.read_u64::<B>()?,
            hash: r.read_u32::<B>()?,
            tflag: TFlag::from_bits_retain(r.read_u8()?),
            align: r.read_u8()?,
            field_align: r.read_u8()?,
            kind: r.read_u8()?,
            equal: r.read_u64::<B>()?,
            gcdata: r.read_u64::<B>()?,
            str: r.read_i32::<B>()?,
            ptr_to_this: r.read_i32::<B>()?,
        })
    }

    pub fn kind(&self) -> u8 {
        self.kind & KIND_MASK
    }

    pub fn is_pointer(&self) -> bool {
        self.kind() == KIND_PTR
    }

    pub fn has_uncommon(&self) -> bool {
        self.tflag.contains(TFlag::UNCOMMON)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncTypeDescriptor {
    pub typ: TypeDescriptor,
    pub in_count: u16,
    pub out_count: u16,
}

impl FuncTypeDescriptor {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        let typ = TypeDescriptor::from_reader::<B, _>(r)?;
        Ok(FuncTypeDescriptor {
            typ,
            in_count: r.read_u16::<B>()?,
            out_count: r.read_u16::<B>()?,
        })
    }

    pub fn input_count(&self) -> usize {
        self.in_count as usize
    }

    pub fn output_count(&self) -> usize {
        (self.out_count & !VARIADIC_FLAG) as usize
    }

    pub fn is_variadic(&self) -> bool {
        self.out_count & VARIADIC_FLAG != 0
    }

    /// Distance from the start of the record to the first parameter slot.
    pub fn slots_offset(&self) -> usize {
        if self.typ.has_uncommon() {
            FUNC_TYPE_SIZE + UNCOMMON_TYPE_SIZE
        } else {
            FUNC_TYPE_SIZE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Itab {
    /// Address of the interface descriptor.
    pub inter: u64,
    /// Address of the concrete type descriptor.
    pub typ: u64,
    pub hash: u32,
    /// First function-pointer slot; not decoded further.
    pub fun: u64,
}

impl Itab {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        let inter = r.read_u64::<B>()?;
        let typ = r.read_u64::<B>()?;
        let hash = r.read_u32::<B>()?;
        let _pad = r.read_u32::<B>()?;
        let fun = r.read_u64::<B>()?;
        Ok(Itab {
            inter,
            typ,
            hash,
            fun,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceHeader {
    pub data: u64,
    pub len: u64,
    pub cap: u64,
}

impl SliceHeader {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(SliceHeader {
            data: r.read_u64::<B>()?,
            len: r.read_u64::<B>()?,
            cap: r.read_u64::<B>()?,
        })
    }
}

/// `interfacetype` as laid out in the section, before the method table is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceTypeRaw {
    pub typ: TypeDescriptor,
    pub pkg_path: u64,
    pub mhdr: SliceHeader,
}

impl InterfaceTypeRaw {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(InterfaceTypeRaw {
            typ: TypeDescriptor::from_reader::<B, _>(r)?,
            pkg_path: r.read_u64::<B>()?,
            mhdr: SliceHeader::from_reader::<B, _>(r)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IMethod {
    pub name: i32,
    pub ityp: i32,
}

impl IMethod {
    pub fn from_reader<B: ByteOrder, R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(IMethod {
            name: r.read_i32::<B>()?,
            ityp: r.read_i32::<B>()?,
        })
    }

    /// Padding entries in the method table: equal offsets, or either offset
    /// non-positive or past the end of the section.
    pub fn is_sentinel(&self, section_len: usize) -> bool {
        let in_bounds = |off: i32| off > 0 && (off as usize) <= section_len;
        self.name == self.ityp || !in_bounds(self.name) || !in_bounds(self.ityp)
    }
}
