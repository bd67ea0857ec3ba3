//! Helpers for calling through native function tables

use std::ffi::{c_char, CStr, CString};

use crate::error::{Error, Result};

/// Call a slot of a native function table.
///
/// `$table` is a `NonNull<T>` to the table; the table pointer itself is
/// passed as the first argument, like every SDK method expects. Evaluates
/// to `Result<R>` where `R` is the slot's return type, or
/// `Err(Error::MissingEntry)` if the slot is null.
macro_rules! ffi_call {
    ($table:expr, $slot:ident ( $($arg:expr),* $(,)? )) => {{
        let table = $table.as_ptr();
        // SAFETY: table pointers are handed out by the live core object
        match unsafe { (*table).$slot } {
            Some(f) => Ok(unsafe { f(table, $($arg),*) }),
            None => Err($crate::error::Error::MissingEntry(stringify!($slot))),
        }
    }};
}

pub(crate) use ffi_call;

/// Convert a Rust string argument into a C string
pub(crate) fn c_string(value: &str, what: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| Error::InvalidArgument(format!("{} contains a NUL byte: {:?}", what, value)))
}

/// Decode a NUL-terminated string owned by the library
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub(crate) unsafe fn string_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Copy a byte buffer owned by the library
///
/// # Safety
/// A non-null `data` must point to at least `len` readable bytes.
pub(crate) unsafe fn bytes_from_ptr(data: *const u8, len: u32) -> Vec<u8> {
    if data.is_null() || len == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(data, len as usize).to_vec()
    }
}

/// Length of an outgoing buffer as the native `uint32_t`
pub(crate) fn buffer_len(data: &[u8]) -> Result<u32> {
    u32::try_from(data.len()).map_err(|_| {
        Error::InvalidArgument(format!("buffer of {} bytes exceeds u32::MAX", data.len()))
    })
}

/// Convert a native count into a usable index range end
pub(crate) fn count_to_len(count: i32) -> usize {
    usize::try_from(count).unwrap_or(0)
}

/// Index argument for `*_at` / `get_*_key` calls taking `int32_t`
pub(crate) fn index_i32(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| Error::InvalidArgument(format!("index {} is out of range", index)))
}

/// Index argument for calls taking `uint32_t`
pub(crate) fn index_u32(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| Error::InvalidArgument(format!("index {} is out of range", index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_string_rejects_nul() {
        assert!(c_string("save.dat", "file name").is_ok());
        let err = c_string("bad\0name", "file name").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_string_from_ptr() {
        let owned = CString::new("route").unwrap();
        assert_eq!(unsafe { string_from_ptr(owned.as_ptr()) }, "route");
        assert_eq!(unsafe { string_from_ptr(std::ptr::null()) }, "");
    }

    #[test]
    fn test_bytes_from_ptr() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(unsafe { bytes_from_ptr(data.as_ptr(), 3) }, vec![1, 2, 3]);
        assert!(unsafe { bytes_from_ptr(std::ptr::null(), 4) }.is_empty());
    }

    #[test]
    fn test_count_to_len() {
        assert_eq!(count_to_len(5), 5);
        assert_eq!(count_to_len(-1), 0);
    }

    #[test]
    fn test_index_conversion() {
        assert_eq!(index_i32(3).unwrap(), 3);
        assert!(index_i32(usize::MAX).is_err());
        assert_eq!(index_u32(7).unwrap(), 7);
    }
}
