//! SKUs, entitlements and purchases
//!
//! The SKU and entitlement lists are only populated after the matching
//! `fetch_*` call has completed. Reading them earlier gives whatever the
//! library has cached, which is usually nothing.

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::{count_to_len, ffi_call, index_i32};
use crate::model::{Entitlement, Model, Sku};

manager! {
    /// Store manager
    StoreManager => sdk::IDiscordStoreManager
}

impl StoreManager<'_> {
    pub fn fetch_skus(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("fetch_skus", completion, |data| {
            ffi_call!(self.handle, fetch_skus(data, Some(completion::on_result)))
        })
    }

    pub fn count_skus(&self) -> Result<usize> {
        let mut count = 0;
        ffi_call!(self.handle, count_skus(&mut count))?;
        Ok(count_to_len(count))
    }

    pub fn sku(&self, sku_id: i64) -> Result<Sku> {
        let mut sku = Sku::default();
        check(ffi_call!(self.handle, get_sku(sku_id, sku.as_raw_mut()))?)?;
        Ok(sku)
    }

    pub fn sku_at(&self, index: usize) -> Result<Sku> {
        let index = index_i32(index)?;
        let mut sku = Sku::default();
        check(ffi_call!(self.handle, get_sku_at(index, sku.as_raw_mut()))?)?;
        Ok(sku)
    }

    /// Every fetched SKU
    pub fn skus(&self) -> Result<Vec<Sku>> {
        (0..self.count_skus()?).map(|i| self.sku_at(i)).collect()
    }

    pub fn fetch_entitlements(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("fetch_entitlements", completion, |data| {
            ffi_call!(self.handle, fetch_entitlements(data, Some(completion::on_result)))
        })
    }

    pub fn count_entitlements(&self) -> Result<usize> {
        let mut count = 0;
        ffi_call!(self.handle, count_entitlements(&mut count))?;
        Ok(count_to_len(count))
    }

    pub fn entitlement(&self, entitlement_id: i64) -> Result<Entitlement> {
        let mut entitlement = Entitlement::default();
        check(ffi_call!(
            self.handle,
            get_entitlement(entitlement_id, entitlement.as_raw_mut())
        )?)?;
        Ok(entitlement)
    }

    pub fn entitlement_at(&self, index: usize) -> Result<Entitlement> {
        let index = index_i32(index)?;
        let mut entitlement = Entitlement::default();
        check(ffi_call!(
            self.handle,
            get_entitlement_at(index, entitlement.as_raw_mut())
        )?)?;
        Ok(entitlement)
    }

    /// Every fetched entitlement
    pub fn entitlements(&self) -> Result<Vec<Entitlement>> {
        (0..self.count_entitlements()?)
            .map(|i| self.entitlement_at(i))
            .collect()
    }

    /// Whether the user owns `sku_id`; needs a completed [`fetch_entitlements`](Self::fetch_entitlements)
    pub fn has_sku_entitlement(&self, sku_id: i64) -> Result<bool> {
        let mut has = false;
        check(ffi_call!(self.handle, has_sku_entitlement(sku_id, &mut has))?)?;
        Ok(has)
    }

    /// Open the purchase flow for `sku_id`
    pub fn start_purchase(&self, sku_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("start_purchase", completion, |data| {
            ffi_call!(self.handle, start_purchase(sku_id, data, Some(completion::on_result)))
        })
    }

    pub fn on_entitlement_create(&self, callback: impl FnMut(&Entitlement) + 'static) -> ListenerKey {
        self.discord.events().on_entitlement_create(callback)
    }

    pub fn on_entitlement_delete(&self, callback: impl FnMut(&Entitlement) + 'static) -> ListenerKey {
        self.discord.events().on_entitlement_delete(callback)
    }
}
