//! Per-user cloud-synced file storage
//!
//! Files are addressed by name. Names are bounded by the width of the
//! native `filename` field and are checked before any native call.

use std::ffi::CString;

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Error, Result};
use crate::ffi::{buffer_len, c_string, count_to_len, ffi_call, index_i32};
use crate::model::{text, FileStat, Model};

/// Longest accepted file name in bytes
pub const MAX_FILE_NAME_LEN: usize = 259;

manager! {
    /// Storage manager
    StorageManager => sdk::IDiscordStorageManager
}

fn file_name(name: &str) -> Result<CString> {
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(Error::InvalidArgument(format!(
            "file name is {} bytes, at most {} are allowed",
            name.len(),
            MAX_FILE_NAME_LEN
        )));
    }
    c_string(name, "file name")
}

impl StorageManager<'_> {
    /// Read a whole file.
    ///
    /// Stats the file first and reads into a buffer of exactly that size.
    /// Fails with [`Error::SizeMismatch`] if the library reports a different
    /// number of bytes read.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let expected = self.stat(name)?.size();
        let len = usize::try_from(expected).map_err(|_| {
            Error::InvalidArgument(format!("{:?} is {} bytes, too large to read", name, expected))
        })?;

        let c_name = file_name(name)?;
        let mut data = vec![0u8; len];
        let data_length = buffer_len(&data)?;
        let mut read = 0u32;
        check(ffi_call!(
            self.handle,
            read(c_name.as_ptr(), data.as_mut_ptr(), data_length, &mut read)
        )?)?;

        if u64::from(read) != expected {
            return Err(Error::SizeMismatch {
                name: name.to_string(),
                expected,
                actual: u64::from(read),
            });
        }
        Ok(data)
    }

    pub fn read_async(&self, name: &str, completion: impl FnOnce(Result<Vec<u8>>) + 'static) -> Result<()> {
        let name = file_name(name)?;
        self.discord.pending().issue("read_async", completion, |data| {
            ffi_call!(self.handle, read_async(name.as_ptr(), data, Some(completion::on_data)))
        })
    }

    /// Read `length` bytes starting at `offset`
    pub fn read_async_partial(
        &self,
        name: &str,
        offset: u64,
        length: u64,
        completion: impl FnOnce(Result<Vec<u8>>) + 'static,
    ) -> Result<()> {
        let name = file_name(name)?;
        self.discord.pending().issue("read_async_partial", completion, |data| {
            ffi_call!(
                self.handle,
                read_async_partial(name.as_ptr(), offset, length, data, Some(completion::on_data))
            )
        })
    }

    pub fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        let name = file_name(name)?;
        let data_length = buffer_len(data)?;
        check(ffi_call!(
            self.handle,
            write(name.as_ptr(), data.as_ptr() as *mut u8, data_length)
        )?)
    }

    /// Write a file in the background; `data` is copied before returning
    pub fn write_async(
        &self,
        name: &str,
        data: &[u8],
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        let name = file_name(name)?;
        let data_length = buffer_len(data)?;
        self.discord.pending().issue("write_async", completion, |callback_data| {
            ffi_call!(
                self.handle,
                write_async(
                    name.as_ptr(),
                    data.as_ptr() as *mut u8,
                    data_length,
                    callback_data,
                    Some(completion::on_result)
                )
            )
        })
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let name = file_name(name)?;
        check(ffi_call!(self.handle, delete_(name.as_ptr()))?)
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        let name = file_name(name)?;
        let mut exists = false;
        check(ffi_call!(self.handle, exists(name.as_ptr(), &mut exists))?)?;
        Ok(exists)
    }

    /// Number of stored files
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        ffi_call!(self.handle, count(&mut count))?;
        Ok(count_to_len(count))
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        let name = file_name(name)?;
        let mut stat = FileStat::default();
        check(ffi_call!(self.handle, stat(name.as_ptr(), stat.as_raw_mut()))?)?;
        Ok(stat)
    }

    pub fn stat_at(&self, index: usize) -> Result<FileStat> {
        let index = index_i32(index)?;
        let mut stat = FileStat::default();
        check(ffi_call!(self.handle, stat_at(index, stat.as_raw_mut()))?)?;
        Ok(stat)
    }

    /// Local directory the library keeps files in
    pub fn path(&self) -> Result<String> {
        let mut path: Box<sdk::DiscordPath> = Box::new([0; 4096]);
        check(ffi_call!(self.handle, get_path(&mut *path))?)?;
        Ok(text::decode(&*path))
    }

    /// Stat of every stored file
    pub fn files(&self) -> Result<Vec<FileStat>> {
        (0..self.count()?).map(|i| self.stat_at(i)).collect()
    }
}
