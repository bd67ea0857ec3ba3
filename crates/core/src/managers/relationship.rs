//! Friends, blocks and pending requests
//!
//! The list is only readable after [`RelationshipManager::filter`] has
//! built a stable view of it, and only valid until the next
//! [`on_refresh`](RelationshipManager::on_refresh).

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};

use dgs_sdk as sdk;

use super::manager;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::{count_to_len, ffi_call, index_u32};
use crate::model::{Model, Relationship};

manager! {
    /// Relationship manager
    RelationshipManager => sdk::IDiscordRelationshipManager
}

/// Calls the predicate behind `filter_data` for one relationship
unsafe extern "C" fn filter_with<F>(
    filter_data: *mut c_void,
    relationship: *mut sdk::DiscordRelationship,
) -> bool
where
    F: FnMut(&Relationship) -> bool,
{
    let (Some(predicate), Some(raw)) = ((filter_data as *mut F).as_mut(), relationship.as_ref())
    else {
        return false;
    };
    let relationship = Relationship::from_raw_ref(raw);
    catch_unwind(AssertUnwindSafe(|| predicate(relationship))).unwrap_or_else(|_| {
        tracing::error!("Relationship filter panicked, excluding entry");
        false
    })
}

impl RelationshipManager<'_> {
    /// Build the view read by [`count`](Self::count) and [`get_at`](Self::get_at)
    /// from every relationship `predicate` accepts.
    ///
    /// The predicate runs synchronously inside this call and is not kept.
    pub fn filter<F>(&self, mut predicate: F) -> Result<()>
    where
        F: FnMut(&Relationship) -> bool,
    {
        let filter_data = &mut predicate as *mut F as *mut c_void;
        ffi_call!(self.handle, filter(filter_data, Some(filter_with::<F>)))
    }

    /// Number of relationships in the current filtered view
    pub fn count(&self) -> Result<usize> {
        let mut count = 0;
        check(ffi_call!(self.handle, count(&mut count))?)?;
        Ok(count_to_len(count))
    }

    /// The relationship with one user, regardless of the filter
    pub fn get(&self, user_id: i64) -> Result<Relationship> {
        let mut relationship = Relationship::default();
        check(ffi_call!(self.handle, get(user_id, relationship.as_raw_mut()))?)?;
        Ok(relationship)
    }

    pub fn get_at(&self, index: usize) -> Result<Relationship> {
        let mut relationship = Relationship::default();
        let index = index_u32(index)?;
        check(ffi_call!(self.handle, get_at(index, relationship.as_raw_mut()))?)?;
        Ok(relationship)
    }

    /// Snapshot of the current filtered view
    pub fn relationships(&self) -> Result<Vec<Relationship>> {
        (0..self.count()?).map(|i| self.get_at(i)).collect()
    }

    /// Called when the list is rebuilt; filter again before reading it
    pub fn on_refresh(&self, callback: impl FnMut() + 'static) -> ListenerKey {
        self.discord.events().on_relationship_refresh(callback)
    }

    pub fn on_relationship_update(&self, callback: impl FnMut(&Relationship) + 'static) -> ListenerKey {
        self.discord.events().on_relationship_update(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::testing;
    use crate::types::{RelationshipType, Status};

    fn seed_relationships() {
        dgs_stub::with(|stub| {
            stub.relationships = vec![
                dgs_stub::relationship(
                    sdk::DiscordRelationshipType_Friend,
                    dgs_stub::user(1, "ann", "0001", false),
                    sdk::DiscordStatus_Online,
                ),
                dgs_stub::relationship(
                    sdk::DiscordRelationshipType_Blocked,
                    dgs_stub::user(2, "ben", "0002", false),
                    sdk::DiscordStatus_Offline,
                ),
                dgs_stub::relationship(
                    sdk::DiscordRelationshipType_Friend,
                    dgs_stub::user(3, "cat", "0003", false),
                    sdk::DiscordStatus_Idle,
                ),
            ];
        });
    }

    #[test]
    fn test_count_requires_filter() {
        let discord = testing::discord();
        seed_relationships();
        let err = discord.relationships().unwrap().count().unwrap_err();
        assert!(matches!(err, Error::Sdk(SdkError::NotFiltered)));
    }

    #[test]
    fn test_filter_and_snapshot() {
        let discord = testing::discord();
        seed_relationships();

        let relationships = discord.relationships().unwrap();
        relationships
            .filter(|r| r.kind() == Ok(RelationshipType::Friend))
            .unwrap();
        assert_eq!(relationships.count().unwrap(), 2);

        let friends = relationships.relationships().unwrap();
        let names: Vec<_> = friends.iter().map(|r| r.user().username()).collect();
        assert_eq!(names, vec!["ann", "cat"]);
        assert_eq!(friends[1].presence().status(), Ok(Status::Idle));
    }

    #[test]
    fn test_filter_predicate_sees_every_entry() {
        let discord = testing::discord();
        seed_relationships();

        let mut seen = Vec::new();
        discord
            .relationships()
            .unwrap()
            .filter(|r| {
                seen.push(r.user().id());
                false
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(discord.relationships().unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_get_by_user() {
        let discord = testing::discord();
        seed_relationships();

        let relationship = discord.relationships().unwrap().get(2).unwrap();
        assert_eq!(relationship.kind(), Ok(RelationshipType::Blocked));
        assert!(matches!(
            discord.relationships().unwrap().get(99),
            Err(Error::Sdk(SdkError::NotFound))
        ));
    }

    #[test]
    fn test_update_event_copies_record() {
        let discord = testing::discord();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        discord
            .relationships()
            .unwrap()
            .on_relationship_update(move |r| sink.borrow_mut().push(r.user().username()));

        dgs_stub::fire_relationship_update(dgs_stub::relationship(
            sdk::DiscordRelationshipType_PendingIncoming,
            dgs_stub::user(5, "dan", "0005", false),
            sdk::DiscordStatus_Online,
        ));
        discord.run_callbacks().unwrap();
        assert_eq!(*seen.borrow(), vec!["dan".to_string()]);
    }
}
