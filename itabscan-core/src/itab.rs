//! Recovery of interface implementations from Go itab records.

pub mod byte_order;
pub mod decoder;
pub mod layout;
pub mod names;
pub mod symtab;

use crate::{ContainerImage, InterfaceType, Method, Result, Type};
use byte_order::{detect_byte_order, Endian, TYPELINK_SECTION};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use decoder::{DecodedItab, DescriptorDecoder, RODATA_SECTION};
use layout::TypeDescriptor;
use names::{name_off_to_text, remove_pointer_from_name, split_pkg_path_and_name};
use symtab::{scan_itab_symbols, ItabSymbol};

/// Every interface implementation recorded in the image, in symbol-table order.
///
/// Any decode failure aborts the whole call.
pub fn defined_interface_types(image: &ContainerImage) -> Result<Vec<InterfaceType>> {
    let candidates = scan_itab_symbols(&image.symbols)?;
    let endian = detect_byte_order(image.section(TYPELINK_SECTION))?;
    let rodata = image.required_section(RODATA_SECTION)?;

    match endian {
        Endian::Big => assemble_all(&DescriptorDecoder::<BigEndian>::new(rodata), &candidates),
        Endian::Little => {
            assemble_all(&DescriptorDecoder::<LittleEndian>::new(rodata), &candidates)
        }
    }
}

fn assemble_all<B: ByteOrder>(
    decoder: &DescriptorDecoder<'_, B>,
    candidates: &[ItabSymbol<'_>],
) -> Result<Vec<InterfaceType>> {
    candidates
        .iter()
        .map(|candidate| {
            let record = decoder.decode_itab(candidate.address)?;
            assemble(decoder.reader().data(), candidate, &record)
        })
        .collect()
}

fn assemble(rodata: &[u8], candidate: &ItabSymbol<'_>, record: &DecodedItab) -> Result<InterfaceType> {
    let mut methods = Vec::with_capacity(record.methods.len());
    for m in &record.methods {
        let name = name_off_to_text(rodata, m.header.name)?;
        let signature = name_off_to_text(rodata, m.func.typ.str)?;
        methods.push(Method {
            name,
            signature: remove_pointer_from_name(&signature).to_string(),
            inputs: param_types(rodata, &m.inputs)?,
            outputs: param_types(rodata, &m.outputs)?,
        });
    }

    let (pkg_path, name) = split_pkg_path_and_name(candidate.interface);
    let implemented = name_off_to_text(rodata, record.concrete.str)?;
    log::debug!(
        "{} implements {}: {} methods",
        implemented,
        candidate.interface,
        methods.len()
    );

    Ok(InterfaceType {
        name: name.to_string(),
        implemented: remove_pointer_from_name(&implemented).to_string(),
        pkg_path: pkg_path.to_string(),
        methods,
    })
}

fn param_types(rodata: &[u8], types: &[TypeDescriptor]) -> Result<Vec<Type>> {
    types
        .iter()
        .map(|t| {
            let text = name_off_to_text(rodata, t.str)?;
            let is_pointer = t.is_pointer();
            // Only non-pointer kinds lose the marker; pointer kinds keep it in the name.
            let text = if is_pointer {
                text.as_str()
            } else {
                remove_pointer_from_name(&text)
            };
            let (pkg_path, name) = split_pkg_path_and_name(text);
            Ok(Type {
                name: name.to_string(),
                pkg_path: pkg_path.to_string(),
                is_pointer,
            })
        })
        .collect()
}
