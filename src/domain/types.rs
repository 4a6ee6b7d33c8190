//! Core record types for the symbol index
//!
//! Both record types are plain address ranges with owned names. Names are
//! copied out of loader or file memory at extraction time, so neither type
//! borrows from the mapped images it was built from.

use rustc_demangle::demangle;
use std::fmt;
use std::path::PathBuf;

/// A half-open address range `[address_begin, address_end)`.
///
/// Implemented by every record the index can look up; the shared
/// binary-search helper in `index` is written against this trait.
pub trait AddressRange {
    fn address_begin(&self) -> u64;
    fn address_end(&self) -> u64;

    /// Check if an address falls within this range (end is exclusive)
    fn contains(&self, address: u64) -> bool {
        address >= self.address_begin() && address < self.address_end()
    }
}

/// One named code or data unit inside a loaded binary.
///
/// Extracted either from the dynamic-linking metadata mapped into the
/// process (exported symbols only) or from the full symbol table of the
/// backing file on disk (includes locally-bound symbols).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Runtime address of the first byte (load base already applied)
    pub address_begin: u64,
    /// Runtime address one past the last byte
    pub address_end: u64,
    /// Mangled name as stored in the string table
    pub name: String,
}

impl Symbol {
    /// Size in bytes. Zero-sized symbols are skipped at extraction, so this
    /// is always positive for indexed symbols.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.address_end - self.address_begin
    }

    /// Demangled name, falling back to the raw name for symbols that are
    /// not mangled (C symbols, section markers).
    #[must_use]
    pub fn demangled(&self) -> String {
        format!("{:#}", demangle(&self.name))
    }
}

impl AddressRange for Symbol {
    fn address_begin(&self) -> u64 {
        self.address_begin
    }

    fn address_end(&self) -> u64 {
        self.address_end
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [0x{:x}-0x{:x})", self.name, self.address_begin, self.address_end)
    }
}

/// One loaded shared library or executable.
///
/// `address_begin` is the load base reported by the dynamic loader;
/// `address_end` is the base plus the size of the backing file image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub address_begin: u64,
    pub address_end: u64,
    /// Canonical path of the backing file (or its split debug-info file)
    pub name: PathBuf,
}

impl AddressRange for Object {
    fn address_begin(&self) -> u64 {
        self.address_begin
    }

    fn address_end(&self) -> u64 {
        self.address_end
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [0x{:x}-0x{:x})", self.name.display(), self.address_begin, self.address_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(begin: u64, end: u64, name: &str) -> Symbol {
        Symbol { address_begin: begin, address_end: end, name: name.to_string() }
    }

    #[test]
    fn test_contains_is_half_open() {
        let sym = symbol(0x1100, 0x1120, "foo");

        assert!(sym.contains(0x1100));
        assert!(sym.contains(0x1110));
        assert!(sym.contains(0x111F));
        assert!(!sym.contains(0x10FF));
        assert!(!sym.contains(0x1120));
    }

    #[test]
    fn test_symbol_size() {
        assert_eq!(symbol(0x1100, 0x1120, "foo").size(), 0x20);
    }

    #[test]
    fn test_demangled_rust_symbol() {
        let sym = symbol(0, 1, "_ZN4core3fmt5write17h1234567890abcdefE");
        assert_eq!(sym.demangled(), "core::fmt::write");
    }

    #[test]
    fn test_demangled_passes_through_plain_names() {
        assert_eq!(symbol(0, 1, "malloc").demangled(), "malloc");
    }
}
