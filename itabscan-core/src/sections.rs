use crate::{Error, Result};
use goblin::mach::segment::Section as MachSection;
use goblin::mach::MachO;

/// A named section copied out of a container, with the address it is loaded at.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub segment: String,
    pub addr: u64,
    pub data: Vec<u8>,
}

impl Section {
    pub fn new(name: impl Into<String>, addr: u64, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            segment: String::new(),
            addr,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn from_goblin_macho(sect: &MachSection, data: &[u8]) -> Result<Self> {
        Ok(Section {
            name: sect.name()?.to_string(),
            segment: sect.segname()?.to_string(),
            addr: sect.addr,
            data: data.to_vec(),
        })
    }
}

/// A symbol table entry: its name and value (the address it labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub value: u64,
}

impl Symbol {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Everything interface recovery needs from a container: named sections and
/// the symbol table in file order.
#[derive(Debug, Clone, Default)]
pub struct ContainerImage {
    pub sections: Vec<Section>,
    pub symbols: Vec<Symbol>,
}

impl ContainerImage {
    pub fn new(sections: Vec<Section>, symbols: Vec<Symbol>) -> Self {
        Self { sections, symbols }
    }

    /// First section carrying `name`, whichever segment it lives in.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn required_section(&self, name: &'static str) -> Result<&Section> {
        self.section(name).ok_or_else(|| Error::MalformedSection {
            section: name,
            reason: "section not found".to_string(),
        })
    }

    /// Copies sections and symbols out of a parsed Mach-O.
    pub fn from_goblin_macho(macho: &MachO) -> Result<Self> {
        let mut sections = Vec::new();
        for segment in macho.segments.iter() {
            for (sect, data) in segment.sections()? {
                sections.push(Section::from_goblin_macho(&sect, data)?);
            }
        }

        let mut symbols = Vec::new();
        for sym in macho.symbols() {
            let (name, nlist) = sym?;
            symbols.push(Symbol::new(name, nlist.n_value));
        }

        log::debug!(
            "Mach-O image: {} sections, {} symbols",
            sections.len(),
            symbols.len()
        );
        Ok(Self { sections, symbols })
    }
}
