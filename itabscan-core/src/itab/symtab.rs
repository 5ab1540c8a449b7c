use crate::{Error, Result, Symbol};

pub const ITAB_SYMBOL_PREFIX: &str = "go.itab.";

/// A symbol labelling one itab record, e.g. `go.itab.*errors.errorString,error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItabSymbol<'a> {
    pub symbol: &'a str,
    pub address: u64,
    /// Concrete type as written in the symbol name.
    pub concrete: &'a str,
    /// Fully qualified interface name.
    pub interface: &'a str,
}

/// Collects the itab symbols in symbol-table order.
///
/// One malformed name fails the whole scan.
pub fn scan_itab_symbols(symbols: &[Symbol]) -> Result<Vec<ItabSymbol<'_>>> {
    let mut found = Vec::new();
    for sym in symbols {
        let Some(rest) = sym.name.strip_prefix(ITAB_SYMBOL_PREFIX) else {
            continue;
        };

        let mut parts = rest.split(',');
        let (Some(concrete), Some(interface)) = (parts.next(), parts.next()) else {
            return Err(Error::SymbolNameMalformed(sym.name.clone()));
        };

        log::trace!("itab {concrete} -> {interface} at {:#x}", sym.value);
        found.push(ItabSymbol {
            symbol: &sym.name,
            address: sym.value,
            concrete,
            interface,
        });
    }
    log::debug!("found {} itab symbols", found.len());
    Ok(found)
}
