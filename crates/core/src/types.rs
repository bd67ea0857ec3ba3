//! Typed enums for the SDK's integer constants

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use dgs_sdk as sdk;

/// A Rust enum backed by a native 32-bit enum value.
pub trait FfiEnum: Copy + Sized + 'static {
    /// Type name for error messages
    const NAME: &'static str;

    /// Convert from the native value, `None` if there is no such member
    fn from_ffi(value: i32) -> Option<Self>;

    /// The native value
    fn to_ffi(self) -> i32;
}

/// Defines a `#[repr(i32)]` enum and its [`FfiEnum`] impl.
macro_rules! ffi_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:path ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),*
        }

        impl FfiEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn from_ffi(value: i32) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )*
                    _ => None,
                }
            }

            fn to_ffi(self) -> i32 {
                self as i32
            }
        }
    };
}

ffi_enum! {
    /// Severity of a message from the native log hook
    #[derive(PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogLevel {
        Error = sdk::DiscordLogLevel_Error,
        Warn = sdk::DiscordLogLevel_Warn,
        Info = sdk::DiscordLogLevel_Info,
        Debug = sdk::DiscordLogLevel_Debug,
    }
}

ffi_enum! {
    pub enum UserFlag {
        Partner = sdk::DiscordUserFlag_Partner,
        HypeSquadEvents = sdk::DiscordUserFlag_HypeSquadEvents,
        HypeSquadHouse1 = sdk::DiscordUserFlag_HypeSquadHouse1,
        HypeSquadHouse2 = sdk::DiscordUserFlag_HypeSquadHouse2,
        HypeSquadHouse3 = sdk::DiscordUserFlag_HypeSquadHouse3,
    }
}

ffi_enum! {
    pub enum PremiumType {
        None = sdk::DiscordPremiumType_None,
        Tier1 = sdk::DiscordPremiumType_Tier1,
        Tier2 = sdk::DiscordPremiumType_Tier2,
    }
}

ffi_enum! {
    pub enum ImageType {
        User = sdk::DiscordImageType_User,
    }
}

ffi_enum! {
    pub enum ActivityType {
        Playing = sdk::DiscordActivityType_Playing,
        Streaming = sdk::DiscordActivityType_Streaming,
        Listening = sdk::DiscordActivityType_Listening,
        Watching = sdk::DiscordActivityType_Watching,
        Custom = sdk::DiscordActivityType_Custom,
    }
}

ffi_enum! {
    pub enum ActivityActionType {
        Join = sdk::DiscordActivityActionType_Join,
        Spectate = sdk::DiscordActivityActionType_Spectate,
    }
}

ffi_enum! {
    pub enum ActivityJoinRequestReply {
        No = sdk::DiscordActivityJoinRequestReply_No,
        Yes = sdk::DiscordActivityJoinRequestReply_Yes,
        Ignore = sdk::DiscordActivityJoinRequestReply_Ignore,
    }
}

ffi_enum! {
    pub enum Status {
        Offline = sdk::DiscordStatus_Offline,
        Online = sdk::DiscordStatus_Online,
        Idle = sdk::DiscordStatus_Idle,
        DoNotDisturb = sdk::DiscordStatus_DoNotDisturb,
    }
}

ffi_enum! {
    pub enum RelationshipType {
        None = sdk::DiscordRelationshipType_None,
        Friend = sdk::DiscordRelationshipType_Friend,
        Blocked = sdk::DiscordRelationshipType_Blocked,
        PendingIncoming = sdk::DiscordRelationshipType_PendingIncoming,
        PendingOutgoing = sdk::DiscordRelationshipType_PendingOutgoing,
        Implicit = sdk::DiscordRelationshipType_Implicit,
    }
}

ffi_enum! {
    pub enum LobbyType {
        Private = sdk::DiscordLobbyType_Private,
        Public = sdk::DiscordLobbyType_Public,
    }
}

ffi_enum! {
    pub enum LobbySearchComparison {
        LessThanOrEqual = sdk::DiscordLobbySearchComparison_LessThanOrEqual,
        LessThan = sdk::DiscordLobbySearchComparison_LessThan,
        Equal = sdk::DiscordLobbySearchComparison_Equal,
        GreaterThan = sdk::DiscordLobbySearchComparison_GreaterThan,
        GreaterThanOrEqual = sdk::DiscordLobbySearchComparison_GreaterThanOrEqual,
        NotEqual = sdk::DiscordLobbySearchComparison_NotEqual,
    }
}

ffi_enum! {
    pub enum LobbySearchCast {
        String = sdk::DiscordLobbySearchCast_String,
        Number = sdk::DiscordLobbySearchCast_Number,
    }
}

ffi_enum! {
    pub enum LobbySearchDistance {
        Local = sdk::DiscordLobbySearchDistance_Local,
        Default = sdk::DiscordLobbySearchDistance_Default,
        Extended = sdk::DiscordLobbySearchDistance_Extended,
        Global = sdk::DiscordLobbySearchDistance_Global,
    }
}

ffi_enum! {
    pub enum EntitlementType {
        Purchase = sdk::DiscordEntitlementType_Purchase,
        PremiumSubscription = sdk::DiscordEntitlementType_PremiumSubscription,
        DeveloperGift = sdk::DiscordEntitlementType_DeveloperGift,
        TestModePurchase = sdk::DiscordEntitlementType_TestModePurchase,
        FreePurchase = sdk::DiscordEntitlementType_FreePurchase,
        UserGift = sdk::DiscordEntitlementType_UserGift,
        PremiumPurchase = sdk::DiscordEntitlementType_PremiumPurchase,
    }
}

ffi_enum! {
    pub enum SkuType {
        Application = sdk::DiscordSkuType_Application,
        Dlc = sdk::DiscordSkuType_DLC,
        Consumable = sdk::DiscordSkuType_Consumable,
        Bundle = sdk::DiscordSkuType_Bundle,
    }
}

ffi_enum! {
    pub enum InputModeType {
        VoiceActivity = sdk::DiscordInputModeType_VoiceActivity,
        PushToTalk = sdk::DiscordInputModeType_PushToTalk,
    }
}

bitflags! {
    /// Flags passed to `DiscordCreate`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CreateFlags: u64 {
        /// Don't fail creation when the Discord client isn't running
        const NO_REQUIRE_DISCORD = sdk::DiscordCreateFlags_NoRequireDiscord;
    }
}

impl CreateFlags {
    /// Require the Discord client to be present (native `Default`)
    pub const DEFAULT: Self = Self::empty();
}

impl Default for CreateFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ffi_known_values() {
        assert_eq!(LogLevel::from_ffi(1), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_ffi(4), Some(LogLevel::Debug));
        assert_eq!(LobbySearchComparison::from_ffi(-2), Some(LobbySearchComparison::LessThanOrEqual));
        assert_eq!(UserFlag::from_ffi(256), Some(UserFlag::HypeSquadHouse3));
        assert_eq!(EntitlementType::from_ffi(7), Some(EntitlementType::PremiumPurchase));
    }

    #[test]
    fn test_from_ffi_unknown_values() {
        assert_eq!(LogLevel::from_ffi(0), None);
        assert_eq!(LobbyType::from_ffi(0), None);
        assert_eq!(UserFlag::from_ffi(8), None);
        assert_eq!(SkuType::from_ffi(5), None);
    }

    #[test]
    fn test_to_ffi() {
        assert_eq!(ActivityActionType::Spectate.to_ffi(), 2);
        assert_eq!(LobbySearchCast::Number.to_ffi(), 2);
        assert_eq!(LobbySearchComparison::NotEqual.to_ffi(), 3);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Info);
    }

    #[test]
    fn test_log_level_serde() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            level: LogLevel,
        }
        let parsed: Wrapper = toml::from_str("level = \"warn\"").unwrap();
        assert_eq!(parsed.level, LogLevel::Warn);
    }

    #[test]
    fn test_create_flags() {
        assert_eq!(CreateFlags::default().bits(), 0);
        assert_eq!(CreateFlags::NO_REQUIRE_DISCORD.bits(), 1);
    }
}
