//! Models for every record the SDK exchanges

use std::marker::PhantomData;

use dgs_macros::Model;
use dgs_sdk as sdk;

use crate::types::{
    ActivityType, EntitlementType, ImageType, InputModeType, LobbyType, RelationshipType, SkuType,
    Status,
};

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct User {
    raw: sdk::DiscordUser,
    id: PhantomData<i64>,
    #[model(text)]
    username: PhantomData<String>,
    #[model(text)]
    discriminator: PhantomData<String>,
    #[model(text)]
    avatar: PhantomData<String>,
    bot: PhantomData<bool>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct OAuth2Token {
    raw: sdk::DiscordOAuth2Token,
    #[model(text)]
    access_token: PhantomData<String>,
    #[model(text)]
    scopes: PhantomData<String>,
    expires: PhantomData<i64>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ImageHandle {
    raw: sdk::DiscordImageHandle,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<ImageType>,
    id: PhantomData<i64>,
    size: PhantomData<u32>,
}

impl ImageHandle {
    /// Handle for a user's avatar at `size` pixels square
    pub fn user_avatar(user_id: i64, size: u32) -> Self {
        let mut handle = Self::default();
        handle.set_kind(ImageType::User);
        handle.set_id(user_id);
        handle.set_size(size);
        handle
    }
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ImageDimensions {
    raw: sdk::DiscordImageDimensions,
    width: PhantomData<u32>,
    height: PhantomData<u32>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ActivityTimestamps {
    raw: sdk::DiscordActivityTimestamps,
    start: PhantomData<i64>,
    end: PhantomData<i64>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ActivityAssets {
    raw: sdk::DiscordActivityAssets,
    #[model(text)]
    large_image: PhantomData<String>,
    #[model(text)]
    large_text: PhantomData<String>,
    #[model(text)]
    small_image: PhantomData<String>,
    #[model(text)]
    small_text: PhantomData<String>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct PartySize {
    raw: sdk::DiscordPartySize,
    current_size: PhantomData<i32>,
    max_size: PhantomData<i32>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ActivityParty {
    raw: sdk::DiscordActivityParty,
    #[model(text)]
    id: PhantomData<String>,
    #[model(nested)]
    size: PhantomData<PartySize>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct ActivitySecrets {
    raw: sdk::DiscordActivitySecrets,
    #[model(field = "match_", text)]
    match_secret: PhantomData<String>,
    #[model(text)]
    join: PhantomData<String>,
    #[model(text)]
    spectate: PhantomData<String>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Activity {
    raw: sdk::DiscordActivity,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<ActivityType>,
    application_id: PhantomData<i64>,
    #[model(text)]
    name: PhantomData<String>,
    #[model(text)]
    state: PhantomData<String>,
    #[model(text)]
    details: PhantomData<String>,
    #[model(nested)]
    timestamps: PhantomData<ActivityTimestamps>,
    #[model(nested)]
    assets: PhantomData<ActivityAssets>,
    #[model(nested)]
    party: PhantomData<ActivityParty>,
    #[model(nested)]
    secrets: PhantomData<ActivitySecrets>,
    instance: PhantomData<bool>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Presence {
    raw: sdk::DiscordPresence,
    #[model(enumeration)]
    status: PhantomData<Status>,
    #[model(nested)]
    activity: PhantomData<Activity>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Relationship {
    raw: sdk::DiscordRelationship,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<RelationshipType>,
    #[model(nested)]
    user: PhantomData<User>,
    #[model(nested)]
    presence: PhantomData<Presence>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Lobby {
    raw: sdk::DiscordLobby,
    id: PhantomData<i64>,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<LobbyType>,
    owner_id: PhantomData<i64>,
    #[model(text)]
    secret: PhantomData<String>,
    capacity: PhantomData<u32>,
    locked: PhantomData<bool>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct FileStat {
    raw: sdk::DiscordFileStat,
    #[model(text)]
    filename: PhantomData<String>,
    size: PhantomData<u64>,
    last_modified: PhantomData<u64>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Entitlement {
    raw: sdk::DiscordEntitlement,
    id: PhantomData<i64>,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<EntitlementType>,
    sku_id: PhantomData<i64>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct SkuPrice {
    raw: sdk::DiscordSkuPrice,
    amount: PhantomData<u32>,
    #[model(text)]
    currency: PhantomData<String>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct Sku {
    raw: sdk::DiscordSku,
    id: PhantomData<i64>,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<SkuType>,
    #[model(text)]
    name: PhantomData<String>,
    #[model(nested)]
    price: PhantomData<SkuPrice>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct InputMode {
    raw: sdk::DiscordInputMode,
    #[model(field = "type_", enumeration)]
    kind: PhantomData<InputModeType>,
    #[model(text)]
    shortcut: PhantomData<String>,
}

#[derive(Clone, Copy, Model)]
#[repr(transparent)]
pub struct UserAchievement {
    raw: sdk::DiscordUserAchievement,
    user_id: PhantomData<i64>,
    achievement_id: PhantomData<i64>,
    percent_complete: PhantomData<u8>,
    #[model(text)]
    unlocked_at: PhantomData<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, Model, ModelError};

    #[test]
    fn test_user_accessors() {
        let mut user = User::default();
        user.set_id(42);
        user.set_username("alice").unwrap();
        user.set_discriminator("0001").unwrap();
        user.set_bot(false);

        assert_eq!(user.id(), 42);
        assert_eq!(user.username(), "alice");
        assert_eq!(user.discriminator(), "0001");
        assert!(!user.bot());
        assert_eq!(user.as_raw().id, 42);
    }

    #[test]
    fn test_text_width_limits() {
        let mut user = User::default();
        // discriminator is char[8]
        assert!(user.set_discriminator("1234567").is_ok());
        let err = user.set_discriminator("12345678").unwrap_err();
        assert!(matches!(
            err,
            ModelError::TextTooLong {
                field: "discriminator",
                len: 8,
                max: 7
            }
        ));
        assert_eq!(user.discriminator(), "1234567");
    }

    #[test]
    fn test_nested_views_alias_parent() {
        let mut activity = Activity::default();
        activity.party_mut().size_mut().set_current_size(2);
        activity.party_mut().size_mut().set_max_size(4);
        activity.secrets_mut().set_join("join-secret").unwrap();

        assert_eq!(activity.as_raw().party.size.current_size, 2);
        assert_eq!(activity.party().size().max_size(), 4);
        assert_eq!(activity.secrets().join(), "join-secret");
    }

    #[test]
    fn test_nested_setter_copies_record() {
        let mut assets = ActivityAssets::default();
        assets.set_large_image("logo").unwrap();

        let mut activity = Activity::default();
        activity.set_assets(assets);

        // The parent holds its own copy now
        assets.set_large_image("other").unwrap();
        assert_eq!(activity.assets().large_image(), "logo");
    }

    #[test]
    fn test_enum_accessors() {
        let mut lobby = Lobby::default();
        // Zeroed record: 0 is not a LobbyType
        assert!(matches!(
            lobby.kind(),
            Err(ModelError::UnknownVariant { value: 0, .. })
        ));

        lobby.set_kind(LobbyType::Public);
        assert_eq!(lobby.kind(), Ok(LobbyType::Public));
        assert_eq!(lobby.as_raw().type_, 2);

        let mut activity = Activity::default();
        assert_eq!(activity.kind(), Ok(ActivityType::Playing));
        activity.set_kind(ActivityType::Listening);
        assert_eq!(activity.as_raw().type_, 2);
    }

    #[test]
    fn test_copy_from_ptr() {
        let mut raw = sdk::DiscordLobby::default();
        raw.id = 7;
        raw.capacity = 8;
        raw.locked = true;

        let lobby = unsafe { Lobby::copy_from_ptr(&raw) }.unwrap();
        raw.id = 99;
        assert_eq!(lobby.id(), 7);
        assert_eq!(lobby.capacity(), 8);
        assert!(lobby.locked());

        assert!(unsafe { Lobby::copy_from_ptr(std::ptr::null()) }.is_none());
    }

    #[test]
    fn test_field_table() {
        assert_eq!(User::NAME, "User");
        assert_eq!(
            User::field_names(),
            vec!["id", "username", "discriminator", "avatar", "bot"]
        );

        let kind = Relationship::field("kind").unwrap();
        assert_eq!(kind.foreign, "type_");
        assert_eq!(kind.kind, FieldKind::Enum);
        assert_eq!(kind.type_name, "RelationshipType");

        assert_eq!(Activity::field("party").unwrap().kind, FieldKind::Nested);
        assert_eq!(Activity::field("instance").unwrap().kind, FieldKind::Bool);
        assert_eq!(Activity::field("name").unwrap().kind, FieldKind::Text);
        assert_eq!(Activity::field("application_id").unwrap().kind, FieldKind::Integer);
        assert!(Activity::field("missing").is_none());
    }

    #[test]
    fn test_debug_lists_properties() {
        let mut user = User::default();
        user.set_username("alice").unwrap();
        let debug = format!("{:?}", user);
        assert!(debug.starts_with("User {"));
        assert!(debug.contains("username: \"alice\""));
        assert!(debug.contains("bot: false"));
    }

    #[test]
    fn test_image_handle_for_avatar() {
        let handle = ImageHandle::user_avatar(1234, 256);
        assert_eq!(handle.kind(), Ok(ImageType::User));
        assert_eq!(handle.id(), 1234);
        assert_eq!(handle.size(), 256);
    }
}
