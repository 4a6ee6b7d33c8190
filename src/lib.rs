//! # symindex - Address → Symbol Index for the Current Process
//!
//! symindex builds an in-process, queryable index that maps raw virtual
//! addresses (instruction pointers from a sampler, crash handler, or
//! stack-trace printer) to the named symbol and the loaded binary that
//! contain them. The dynamic loader only exposes a forward stream of
//! loaded-object descriptors; this crate turns that into a reverse lookup
//! spanning both dynamically-exported and local (non-exported) symbols.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               Dynamic Loader (dl_iterate_phdr)           │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ one callback per loaded object
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SymbolIndex::update()                 │
//! │                                                          │
//! │   ┌───────────────────┐      ┌────────────────────────┐  │
//! │   │ dynamic_symbols   │      │ object_file            │  │
//! │   │ (mapped PT_DYNAMIC│      │ (.symtab of the backing│  │
//! │   │  segment, exported│      │  file or its split     │  │
//! │   │  symbols only)    │      │  debug-info twin)      │  │
//! │   └─────────┬─────────┘      └───────────┬────────────┘  │
//! │             └───────────┬────────────────┘               │
//! │                         ▼                                │
//! │              sort by address, dedup exact                │
//! │              duplicate ranges                            │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ immutable snapshot
//!                            ▼
//!              find_symbol(addr) / find_object(addr)
//! ```
//!
//! ## Module Structure
//!
//! - [`index`]: the [`SymbolIndex`] snapshot, rebuild orchestration, and
//!   binary-search range lookup
//! - [`extraction`]: the two symbol extractors (mapped dynamic section,
//!   on-disk symbol table)
//! - [`enumeration`]: safe wrapper over `dl_iterate_phdr`
//! - [`domain`]: `Symbol`/`Object` records, the `AddressRange` seam, and
//!   structured errors
//! - [`cli`]: argument definitions for the companion `symindex` binary
//!
//! ## Key Concepts
//!
//! - **Two symbol sources**: the loader-mapped dynamic section covers
//!   exported symbols even when the backing file is gone; the on-disk
//!   `.symtab` adds locally-bound functions the loader never sees. Both
//!   feed one table, duplicates removed.
//! - **Snapshot semantics**: `update()` rebuilds wholesale and swaps at
//!   the end; queries between updates read immutable data. Rebuilds are
//!   not internally synchronized against readers (see [`index`]).
//! - **Soft failure**: a malformed object contributes fewer entries,
//!   never an error; a miss on lookup is `None`, not a failure.
//!
//! ## Typical Usage
//!
//! ```no_run
//! use symindex::SymbolIndex;
//!
//! let index = SymbolIndex::of_current_process();
//! if let Some(symbol) = index.find_symbol(0x7f12_3456_7890) {
//!     let object = index.find_object(symbol.address_begin);
//!     println!("{} in {:?}", symbol.demangled(), object.map(|o| &o.name));
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod enumeration;
pub mod extraction;
pub mod index;

pub use domain::{AddressRange, IndexError, Object, Symbol};
pub use enumeration::{for_each_loaded_object, LoadedObject};
pub use index::SymbolIndex;
