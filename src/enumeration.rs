//! Enumeration of currently loaded shared objects
//!
//! Thin safe wrapper over the dynamic loader's `dl_iterate_phdr`, which
//! reports every object currently mapped into the process (the main
//! executable first, then each shared library) together with its load base
//! and program header table.
//!
//! The program headers handed to the callback point into the live process
//! image, not into a file on disk, so they remain valid only while the
//! object stays loaded.

// Raw loader callback plumbing below
#![allow(unsafe_code)]

use libc::{c_int, c_void, dl_iterate_phdr, dl_phdr_info, Elf64_Phdr};
use std::ffi::CStr;
use std::path::PathBuf;
use std::slice;

/// One loaded shared object as reported by the dynamic loader.
pub struct LoadedObject<'a> {
    /// Load base address. Zero for non-PIE executables whose segments are
    /// mapped at their link-time addresses.
    pub base_address: u64,
    /// Loader-reported path. Empty for the main executable.
    pub path: PathBuf,
    /// Program header table mapped into the process image.
    pub program_headers: &'a [Elf64_Phdr],
}

/// Invoke `callback` once for every object currently mapped by the dynamic
/// loader, including the main executable.
///
/// The callback runs synchronously on the calling thread. It must not load
/// or unload shared objects: the loader does not tolerate reentrant
/// mutation during enumeration.
pub fn for_each_loaded_object<F>(mut callback: F)
where
    F: FnMut(&LoadedObject<'_>),
{
    unsafe extern "C" fn trampoline<F>(
        info: *mut dl_phdr_info,
        _size: usize,
        data: *mut c_void,
    ) -> c_int
    where
        F: FnMut(&LoadedObject<'_>),
    {
        let callback = &mut *data.cast::<F>();
        let info = &*info;

        let path = if info.dlpi_name.is_null() {
            PathBuf::new()
        } else {
            PathBuf::from(CStr::from_ptr(info.dlpi_name).to_string_lossy().into_owned())
        };

        let program_headers = if info.dlpi_phdr.is_null() {
            &[]
        } else {
            slice::from_raw_parts(info.dlpi_phdr, usize::from(info.dlpi_phnum))
        };

        callback(&LoadedObject { base_address: info.dlpi_addr, path, program_headers });

        // Zero tells the loader to continue with the next object
        0
    }

    unsafe {
        dl_iterate_phdr(Some(trampoline::<F>), (&mut callback as *mut F).cast::<c_void>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_at_least_the_main_executable() {
        let mut count = 0usize;
        let mut saw_program_headers = false;

        for_each_loaded_object(|object| {
            count += 1;
            if !object.program_headers.is_empty() {
                saw_program_headers = true;
            }
        });

        assert!(count >= 1, "loader reported no objects");
        assert!(saw_program_headers, "no object came with program headers");
    }

    #[test]
    fn test_first_object_is_the_main_executable() {
        // The loader reports the main executable first, with an empty name
        let mut first_path = None;
        for_each_loaded_object(|object| {
            if first_path.is_none() {
                first_path = Some(object.path.clone());
            }
        });

        assert_eq!(first_path, Some(PathBuf::new()));
    }
}
