//! The queryable address → symbol index
//!
//! [`SymbolIndex`] owns two sorted range tables, one of loaded objects and
//! one of symbols, rebuilt wholesale by [`SymbolIndex::update`] and served
//! by binary-search point queries. There is no incremental indexing: every
//! update re-enumerates the loader state from scratch and swaps the
//! snapshot in only after accumulation finished, so a failed or partial
//! extraction never leaves the index inconsistent.
//!
//! `update()` must not race itself or concurrent lookups; callers that
//! rebuild while readers are active serialize access externally (an
//! `RwLock` around the index is the usual shape).

use log::info;

use crate::domain::{AddressRange, Object, Symbol};
use crate::enumeration::for_each_loaded_object;
use crate::extraction::{collect_dynamic_symbols, collect_file_symbols};

/// Index mapping virtual addresses of the current process to the symbols
/// and loaded objects containing them.
///
/// ```no_run
/// use symindex::SymbolIndex;
///
/// let index = SymbolIndex::of_current_process();
/// let address = SymbolIndex::of_current_process as usize as u64;
/// if let Some(symbol) = index.find_symbol(address) {
///     println!("{} + 0x{:x}", symbol.demangled(), address - symbol.address_begin);
/// }
/// ```
#[derive(Debug, Default)]
pub struct SymbolIndex {
    symbols: Vec<Symbol>,
    objects: Vec<Object>,
}

impl SymbolIndex {
    /// Create an empty index. Both tables stay empty until the first
    /// [`update`](Self::update).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index of the calling process in one step.
    #[must_use]
    pub fn of_current_process() -> Self {
        let mut index = Self::new();
        index.update();
        index
    }

    /// Rebuild the snapshot from the process's current set of loaded
    /// objects.
    ///
    /// Enumerates every mapped object once and runs both extractors over
    /// it. Objects whose dynamic section or backing file is missing or
    /// malformed simply contribute fewer entries; nothing here fails the
    /// rebuild. The previous snapshot stays intact until the new one is
    /// complete.
    pub fn update(&mut self) {
        let mut symbols = Vec::new();
        let mut objects = Vec::new();

        for_each_loaded_object(|loaded| {
            collect_dynamic_symbols(loaded, &mut symbols);
            collect_file_symbols(loaded, &mut symbols, &mut objects);
        });

        objects.sort_by_key(|object| object.address_begin);
        sort_and_dedup(&mut symbols);

        info!("Indexed {} objects, {} symbols", objects.len(), symbols.len());

        self.symbols = symbols;
        self.objects = objects;
    }

    /// Find the symbol whose range contains `address`.
    #[must_use]
    pub fn find_symbol(&self, address: u64) -> Option<&Symbol> {
        find_containing(&self.symbols, address)
    }

    /// Find the loaded object whose image contains `address`.
    #[must_use]
    pub fn find_object(&self, address: u64) -> Option<&Object> {
        find_containing(&self.objects, address)
    }

    /// All indexed symbols, sorted by `address_begin`.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All indexed objects, sorted by `address_begin`.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }
}

/// Sort symbols by start address and drop entries whose exact range repeats
/// the previous one. Duplicates are expected: an exported symbol is found
/// both in the mapped dynamic section and in the on-disk symbol table.
fn sort_and_dedup(symbols: &mut Vec<Symbol>) {
    symbols.sort_by_key(|symbol| symbol.address_begin);
    symbols.dedup_by(|a, b| a.address_begin == b.address_begin && a.address_end == b.address_end);
}

/// Binary-search a list sorted by `address_begin` for the entry containing
/// `address`: take the last entry starting at or below the query and check
/// containment.
///
/// Correct for non-overlapping ranges. Overlapping-but-distinct ranges can
/// occur when the two extractors disagree about a symbol's extent; in that
/// case the entry with the greatest `address_begin` at or below the query
/// wins, matching the behavior this lookup has always had.
fn find_containing<T: AddressRange>(items: &[T], address: u64) -> Option<&T> {
    // First entry strictly above the query, then one step back
    let first_above = items.partition_point(|item| item.address_begin() <= address);
    let candidate = &items[first_above.checked_sub(1)?];

    candidate.contains(address).then_some(candidate)
}
