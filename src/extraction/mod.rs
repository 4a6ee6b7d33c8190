//! Symbol extraction from loaded objects
//!
//! Two extractors feed the index, run back to back over every object the
//! loader reports:
//!
//! - [`dynamic_symbols`]: reads the dynamic-linking metadata already mapped
//!   into the process. Sees only exported symbols, but needs no file access
//!   and works for deleted or unreadable backing files.
//! - [`object_file`]: re-opens the backing file (or its split debug-info
//!   counterpart) and reads the full `.symtab`, which also covers
//!   locally-bound symbols invisible to the loader.
//!
//! An exported symbol is typically found by both; the index builder removes
//! the exact-duplicate ranges after sorting.

pub mod dynamic_symbols;
pub mod object_file;

pub use dynamic_symbols::collect_dynamic_symbols;
pub use object_file::collect_file_symbols;
