//! Symbol extraction from the dynamic sections of loaded objects
//!
//! Walks the `PT_DYNAMIC` segment that the loader has already mapped into
//! the process image, so it needs no file access at all and keeps working
//! when the backing file was deleted or never existed. Only exported
//! (dynamically visible) symbols are reachable this way; the full table
//! lives in the on-disk file and is handled by `object_file`.
//!
//! The dynamic section does not store the symbol count directly. It has to
//! be recovered from whichever hash table the object carries: the classic
//! `DT_HASH` table stores it in its header, the `DT_GNU_HASH` table
//! requires a bucket/chain scan. The chain-scan recovery follows the musl
//! dynamic loader.

// Reads loader-owned ELF control structures through raw pointers
#![allow(unsafe_code)]

use std::ffi::CStr;

use crate::domain::Symbol;
use crate::enumeration::LoadedObject;

const PT_DYNAMIC: u32 = 2;

const DT_NULL: i64 = 0;
const DT_HASH: i64 = 4;
const DT_STRTAB: i64 = 5;
const DT_SYMTAB: i64 = 6;
const DT_GNU_HASH: i64 = 0x6fff_fef5;

/// Scan limit for a dynamic section missing its `DT_NULL` terminator.
const MAX_DYNAMIC_ENTRIES: usize = 16 * 1024;

/// Upper bound on the symbol count decoded from a hash table header.
/// A count above this is treated as corrupt and yields zero symbols.
const MAX_SYMBOLS_PER_OBJECT: u64 = 16 * 1024 * 1024;

/// `Elf64_Dyn`: one tagged entry of the dynamic section.
#[repr(C)]
#[derive(Clone, Copy)]
struct DynEntry {
    d_tag: i64,
    d_val: u64,
}

/// `Elf64_Sym`: one entry of a symbol table.
#[repr(C)]
#[derive(Clone, Copy)]
struct SymEntry {
    st_name: u32,
    st_info: u8,
    st_other: u8,
    st_shndx: u16,
    st_value: u64,
    st_size: u64,
}

/// Some loaders report dynamic-section pointers relative to the object's
/// load base, others report them absolute. An absolute pointer is always
/// above the base, so anything at or below it gets the base added.
fn correct_address(base: u64, ptr: u64) -> u64 {
    if ptr > base {
        ptr
    } else {
        base.wrapping_add(ptr)
    }
}

/// Collect exported symbols of one loaded object from its mapped dynamic
/// section. A missing or malformed dynamic section contributes nothing;
/// dynamic symbol visibility is not guaranteed for every object (static
/// executables have none).
pub fn collect_dynamic_symbols(object: &LoadedObject<'_>, symbols: &mut Vec<Symbol>) {
    for header in object.program_headers {
        if header.p_type != PT_DYNAMIC {
            continue;
        }

        let dynamic = object.base_address.wrapping_add(header.p_vaddr) as usize as *const DynEntry;
        unsafe {
            collect_from_dynamic_section(object.base_address, dynamic, symbols);
        }
    }
}

unsafe fn collect_from_dynamic_section(base: u64, dynamic: *const DynEntry, symbols: &mut Vec<Symbol>) {
    let count = symbol_count(base, dynamic);
    if count == 0 || count > MAX_SYMBOLS_PER_OBJECT {
        return;
    }

    let Some(strtab) = find_dynamic_tag(dynamic, DT_STRTAB) else {
        return;
    };
    let strtab = correct_address(base, strtab) as usize as *const u8;

    let Some(symtab) = find_dynamic_tag(dynamic, DT_SYMTAB) else {
        return;
    };
    let symtab = correct_address(base, symtab) as usize as *const SymEntry;

    for index in 0..count {
        let entry = &*symtab.add(index as usize);

        // Zero-sized entries (index 0, undefined references, markers) name
        // no address range
        if entry.st_size == 0 {
            continue;
        }

        let name = CStr::from_ptr(strtab.add(entry.st_name as usize).cast())
            .to_string_lossy()
            .into_owned();

        let address_begin = base.wrapping_add(entry.st_value);
        symbols.push(Symbol {
            address_begin,
            address_end: address_begin.wrapping_add(entry.st_size),
            name,
        });
    }
}

/// Number of entries in the dynamic symbol table, decoded from whichever
/// hash table the object carries. Zero when neither table is present.
unsafe fn symbol_count(base: u64, dynamic: *const DynEntry) -> u64 {
    if let Some(ptr) = find_dynamic_tag(dynamic, DT_HASH) {
        // Classic hash header: [nbucket, nchain, ...]; nchain equals the
        // symbol table entry count
        let hash = correct_address(base, ptr) as usize as *const u32;
        return u64::from(*hash.add(1));
    }

    if let Some(ptr) = find_dynamic_tag(dynamic, DT_GNU_HASH) {
        let hash = correct_address(base, ptr) as usize as *const u32;
        return gnu_hash_symbol_count(hash);
    }

    0
}

/// Recover the symbol table entry count from a GNU hash table.
///
/// Header layout in 32-bit words: `[nbuckets, symoffset, bloom_count,
/// bloom_shift]`, followed by `bloom_count` machine words of bloom filter,
/// `nbuckets` bucket entries, then the chain array (one entry per symbol
/// from `symoffset` up). The highest bucket value is the first symbol of
/// the last chain; walking that chain until an entry with the low bit set
/// reaches the last symbol index.
unsafe fn gnu_hash_symbol_count(hash: *const u32) -> u64 {
    let nbuckets = *hash as usize;
    let symoffset = *hash.add(1);
    let bloom_count = *hash.add(2) as usize;

    let buckets = hash.add(4 + bloom_count * (std::mem::size_of::<usize>() / 4));

    let mut max_bucket = 0u32;
    for i in 0..nbuckets {
        let bucket = *buckets.add(i);
        if bucket > max_bucket {
            max_bucket = bucket;
        }
    }

    if max_bucket == 0 || max_bucket < symoffset {
        return 0;
    }

    let mut count = u64::from(max_bucket);
    let mut chain = buckets.add(nbuckets + (max_bucket - symoffset) as usize);
    loop {
        count += 1;
        let entry = *chain;
        chain = chain.add(1);
        if entry & 1 == 1 {
            break;
        }
        if count > MAX_SYMBOLS_PER_OBJECT {
            return 0;
        }
    }

    count
}

/// Find the value of the first dynamic entry with the given tag, stopping
/// at the `DT_NULL` terminator.
unsafe fn find_dynamic_tag(dynamic: *const DynEntry, tag: i64) -> Option<u64> {
    let mut entry = dynamic;
    for _ in 0..MAX_DYNAMIC_ENTRIES {
        let current = *entry;
        if current.d_tag == DT_NULL {
            return None;
        }
        if current.d_tag == tag {
            return Some(current.d_val);
        }
        entry = entry.add(1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_correct_address_relative() {
        assert_eq!(correct_address(0x1000, 0x200), 0x1200);
    }

    #[test]
    fn test_correct_address_absolute() {
        assert_eq!(correct_address(0x1000, 0x7f00_0000), 0x7f00_0000);
    }

    #[test]
    fn test_correct_address_zero_base() {
        // Non-PIE executables have base zero and store absolute addresses
        assert_eq!(correct_address(0, 0x40_1000), 0x40_1000);
    }

    #[test]
    fn test_gnu_hash_symbol_count() {
        // Two buckets, first symbol index 1, one bloom word (two u32 slots
        // on 64-bit). Four chain entries cover symbols 1..=4; the chain
        // starting at the max bucket value (3) ends one entry later, so the
        // table describes 5 symbols in total.
        let table: Vec<u32> = vec![
            2, // nbuckets
            1, // symoffset
            1, // bloom_count
            0, // bloom_shift
            0, 0, // bloom word
            1, 3, // buckets
            3, 5, // chains for symbols 1, 2 (end bits set)
            2, 7, // chains for symbols 3, 4 (chain 3 continues into 4)
        ];

        let count = unsafe { gnu_hash_symbol_count(table.as_ptr()) };
        assert_eq!(count, 5);
    }

    #[test]
    fn test_gnu_hash_symbol_count_empty_table() {
        let table: Vec<u32> = vec![
            1, // nbuckets
            0, // symoffset
            1, // bloom_count
            0, // bloom_shift
            0, 0, // bloom word
            0, // single empty bucket
        ];

        let count = unsafe { gnu_hash_symbol_count(table.as_ptr()) };
        assert_eq!(count, 0);
    }

    /// Fabricate a dynamic section in process memory and run the extractor
    /// over it. Base zero exercises the absolute-address branch of
    /// `correct_address`, so the fabricated tables can simply be referenced
    /// by their real addresses.
    #[test]
    fn test_collect_from_fabricated_dynamic_section() {
        let strtab = b"\0foo\0bar\0".to_vec();

        let symtab = vec![
            // Index 0 is the reserved null entry
            SymEntry { st_name: 0, st_info: 0, st_other: 0, st_shndx: 0, st_value: 0, st_size: 0 },
            SymEntry {
                st_name: 1,
                st_info: 0,
                st_other: 0,
                st_shndx: 1,
                st_value: 0x1000,
                st_size: 0x10,
            },
            SymEntry {
                st_name: 5,
                st_info: 0,
                st_other: 0,
                st_shndx: 1,
                st_value: 0x2000,
                st_size: 0x20,
            },
        ];

        // Classic hash header: one bucket, three symbol entries
        let hash: Vec<u32> = vec![1, 3, 0, 0, 0];

        let dynamic = vec![
            DynEntry { d_tag: DT_HASH, d_val: hash.as_ptr() as u64 },
            DynEntry { d_tag: DT_STRTAB, d_val: strtab.as_ptr() as u64 },
            DynEntry { d_tag: DT_SYMTAB, d_val: symtab.as_ptr() as u64 },
            DynEntry { d_tag: DT_NULL, d_val: 0 },
        ];

        let phdr = libc::Elf64_Phdr {
            p_type: PT_DYNAMIC,
            p_flags: 0,
            p_offset: 0,
            p_vaddr: dynamic.as_ptr() as u64,
            p_paddr: 0,
            p_filesz: 0,
            p_memsz: 0,
            p_align: 0,
        };

        let object = LoadedObject {
            base_address: 0,
            path: PathBuf::new(),
            program_headers: std::slice::from_ref(&phdr),
        };

        let mut symbols = Vec::new();
        collect_dynamic_symbols(&object, &mut symbols);

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, "foo");
        assert_eq!(symbols[0].address_begin, 0x1000);
        assert_eq!(symbols[0].address_end, 0x1010);
        assert_eq!(symbols[1].name, "bar");
        assert_eq!(symbols[1].address_begin, 0x2000);
        assert_eq!(symbols[1].address_end, 0x2020);
    }

    #[test]
    fn test_object_without_dynamic_segment_contributes_nothing() {
        let phdr = libc::Elf64_Phdr {
            p_type: 1, // PT_LOAD
            p_flags: 0,
            p_offset: 0,
            p_vaddr: 0,
            p_paddr: 0,
            p_filesz: 0,
            p_memsz: 0,
            p_align: 0,
        };

        let object = LoadedObject {
            base_address: 0x1000,
            path: PathBuf::new(),
            program_headers: std::slice::from_ref(&phdr),
        };

        let mut symbols = Vec::new();
        collect_dynamic_symbols(&object, &mut symbols);
        assert!(symbols.is_empty());
    }
}
