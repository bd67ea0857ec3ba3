//! Avatars and other images fetched through Discord

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Error, Result};
use crate::ffi::{buffer_len, ffi_call};
use crate::model::{ImageDimensions, ImageHandle, Model};

manager! {
    /// Image manager
    ImageManager => sdk::IDiscordImageManager
}

impl ImageManager<'_> {
    /// Download an image into the library's cache.
    ///
    /// The completion receives the handle to use with [`dimensions`](Self::dimensions)
    /// and [`data`](Self::data). With `refresh` the cached copy is ignored.
    pub fn fetch(
        &self,
        handle: ImageHandle,
        refresh: bool,
        completion: impl FnOnce(Result<ImageHandle>) + 'static,
    ) -> Result<()> {
        let raw = handle.into_raw();
        self.discord.pending().issue("fetch_image", completion, |data| {
            ffi_call!(self.handle, fetch(raw, refresh, data, Some(completion::on_image_handle)))
        })
    }

    /// Size of a fetched image
    pub fn dimensions(&self, handle: &ImageHandle) -> Result<ImageDimensions> {
        let mut dimensions = ImageDimensions::default();
        check(ffi_call!(
            self.handle,
            get_dimensions(*handle.as_raw(), dimensions.as_raw_mut())
        )?)?;
        Ok(dimensions)
    }

    /// RGBA pixels of a fetched image, four bytes per pixel
    pub fn data(&self, handle: &ImageHandle) -> Result<Vec<u8>> {
        let dimensions = self.dimensions(handle)?;
        let len = (dimensions.width() as usize)
            .checked_mul(dimensions.height() as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "image of {}x{} is too large",
                    dimensions.width(),
                    dimensions.height()
                ))
            })?;

        let mut data = vec![0u8; len];
        let data_length = buffer_len(&data)?;
        check(ffi_call!(
            self.handle,
            get_data(*handle.as_raw(), data.as_mut_ptr(), data_length)
        )?)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::error::{Error, SdkError};
    use crate::model::ImageHandle;
    use crate::testing;
    use crate::types::ImageType;

    #[test]
    fn test_fetch_returns_handle() {
        let discord = testing::discord();
        let seen = Rc::new(RefCell::new(None));

        let sink = seen.clone();
        discord
            .images()
            .unwrap()
            .fetch(ImageHandle::user_avatar(42, 128), false, move |result| {
                *sink.borrow_mut() = Some(result)
            })
            .unwrap();
        discord.run_callbacks().unwrap();

        let handle = seen.borrow_mut().take().unwrap().unwrap();
        assert_eq!(handle.kind(), Ok(ImageType::User));
        assert_eq!(handle.id(), 42);
        assert_eq!(handle.size(), 128);
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("fetch").unwrap().args, ["42", "128", "false"])
        });
    }

    #[test]
    fn test_dimensions_and_data() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.image_size = (2, 3);
            stub.image_data = (0..24).collect();
        });

        let images = discord.images().unwrap();
        let handle = ImageHandle::user_avatar(42, 128);
        let dimensions = images.dimensions(&handle).unwrap();
        assert_eq!((dimensions.width(), dimensions.height()), (2, 3));

        let data = images.data(&handle).unwrap();
        assert_eq!(data.len(), 24);
        assert_eq!(data[23], 23);
        dgs_stub::with(|stub| assert_eq!(stub.last_call("get_data").unwrap().args, ["24"]));
    }

    #[test]
    fn test_data_before_fetch() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("get_dimensions", dgs_sdk::DiscordResult_NotFetched));
        let err = discord
            .images()
            .unwrap()
            .data(&ImageHandle::user_avatar(1, 64))
            .unwrap_err();
        assert!(matches!(err, Error::Sdk(SdkError::NotFetched)));
    }
}
