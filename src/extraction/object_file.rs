//! Symbol extraction from on-disk object files
//!
//! The dynamic section of a loaded object only exposes exported symbols.
//! The full `.symtab` section of the backing file also names locally-bound
//! functions, so each enumerated object is re-opened on disk and its
//! complete symbol table folded into the index. Distributions frequently
//! split that table into a separate debug-info file under `/usr/lib/debug`;
//! when such a file exists for the canonical binary path it is preferred.
//!
//! Every failure here is per-object and soft: a deleted backing file, a
//! virtual mapping that cannot be canonicalized, or a truncated ELF reduce
//! the index, they never abort the rebuild.

use log::debug;
use object::elf::{FileHeader64, SHT_SYMTAB};
use object::read::elf::{FileHeader, Sym};
use object::Endianness;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{IndexError, Object, Symbol};
use crate::enumeration::LoadedObject;

/// Root under which distributions install split debug-info files, mirroring
/// the canonical path of the binary they describe.
const DEBUG_INFO_ROOT: &str = "/usr/lib/debug";

/// Collect the full symbol table of one loaded object from its backing file
/// and record the object itself. Failures contribute zero symbols (and no
/// object record if the file never parsed) and are only logged.
pub fn collect_file_symbols(
    loaded: &LoadedObject<'_>,
    symbols: &mut Vec<Symbol>,
    objects: &mut Vec<Object>,
) {
    if let Err(error) = try_collect(loaded, symbols, objects) {
        debug!("Skipping on-disk symbols of {}: {error}", loaded.path.display());
    }
}

fn try_collect(
    loaded: &LoadedObject<'_>,
    symbols: &mut Vec<Symbol>,
    objects: &mut Vec<Object>,
) -> Result<(), IndexError> {
    let path = resolve_backing_file(&loaded.path)?;

    let data = fs::read(&path)
        .map_err(|source| IndexError::ObjectReadFailed { path: path.clone(), source })?;

    let header = FileHeader64::<Endianness>::parse(&*data)
        .map_err(|error| parse_error(&path, error))?;
    let endian = header.endian().map_err(|error| parse_error(&path, error))?;

    // The header parsed, so the mapping is backed by a real object file;
    // record it before looking for a symbol table it may not have.
    let base = loaded.base_address;
    objects.push(Object {
        address_begin: base,
        address_end: base.wrapping_add(data.len() as u64),
        name: path.clone(),
    });

    let sections = header
        .sections(endian, &*data)
        .map_err(|error| parse_error(&path, error))?;
    let symtab = sections
        .symbols(endian, &*data, SHT_SYMTAB)
        .map_err(|error| parse_error(&path, error))?;

    let strings = symtab.strings();
    for entry in symtab.iter() {
        let value = entry.st_value(endian);
        let size = entry.st_size(endian);
        if entry.st_name(endian) == 0 || value == 0 || size == 0 {
            continue;
        }

        // A name offset past the string table marks a corrupt entry
        let Ok(name) = entry.name(endian, strings) else {
            continue;
        };

        let address_begin = base.wrapping_add(value);
        symbols.push(Symbol {
            address_begin,
            address_end: address_begin.wrapping_add(size),
            name: String::from_utf8_lossy(name).into_owned(),
        });
    }

    Ok(())
}

fn parse_error(path: &Path, error: object::read::Error) -> IndexError {
    IndexError::ObjectParseFailed { path: path.to_path_buf(), reason: error.to_string() }
}

/// Resolve the file to read symbols from: the canonical backing file of the
/// loaded object, or its split debug-info counterpart when one exists.
fn resolve_backing_file(loader_path: &Path) -> Result<PathBuf, IndexError> {
    // The loader reports an empty name for the main executable
    let path = if loader_path.as_os_str().is_empty() {
        Path::new("/proc/self/exe")
    } else {
        loader_path
    };

    let canonical = fs::canonicalize(path)
        .map_err(|source| IndexError::CanonicalizeFailed { path: path.to_path_buf(), source })?;

    let debug_path = debug_info_path(&canonical);
    if debug_path.exists() {
        Ok(debug_path)
    } else {
        Ok(canonical)
    }
}

fn debug_info_path(canonical: &Path) -> PathBuf {
    let relative = canonical.strip_prefix("/").unwrap_or(canonical);
    Path::new(DEBUG_INFO_ROOT).join(relative)
}
