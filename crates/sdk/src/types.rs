//! Scalar typedefs and enum constants from `discord_game_sdk.h`
//!
//! Enums cross the boundary as plain 32-bit integers. They are declared as
//! `i32` aliases with one constant per member so that an unexpected value
//! coming back from the library is never undefined behaviour on our side.

#![allow(non_upper_case_globals)]

use std::ffi::c_char;

pub type DiscordClientId = i64;
pub type DiscordVersion = i32;
pub type DiscordSnowflake = i64;
pub type DiscordTimestamp = i64;
pub type DiscordUserId = DiscordSnowflake;
pub type DiscordLobbyId = DiscordSnowflake;
pub type DiscordNetworkPeerId = u64;
pub type DiscordNetworkChannelId = u8;

pub type DiscordLocale = [c_char; 128];
pub type DiscordBranch = [c_char; 4096];
pub type DiscordLobbySecret = [c_char; 128];
pub type DiscordMetadataKey = [c_char; 256];
pub type DiscordMetadataValue = [c_char; 4096];
pub type DiscordPath = [c_char; 4096];
pub type DiscordDateTime = [c_char; 64];

// === EDiscordResult ===

pub type EDiscordResult = i32;
pub const DiscordResult_Ok: EDiscordResult = 0;
pub const DiscordResult_ServiceUnavailable: EDiscordResult = 1;
pub const DiscordResult_InvalidVersion: EDiscordResult = 2;
pub const DiscordResult_LockFailed: EDiscordResult = 3;
pub const DiscordResult_InternalError: EDiscordResult = 4;
pub const DiscordResult_InvalidPayload: EDiscordResult = 5;
pub const DiscordResult_InvalidCommand: EDiscordResult = 6;
pub const DiscordResult_InvalidPermissions: EDiscordResult = 7;
pub const DiscordResult_NotFetched: EDiscordResult = 8;
pub const DiscordResult_NotFound: EDiscordResult = 9;
pub const DiscordResult_Conflict: EDiscordResult = 10;
pub const DiscordResult_InvalidSecret: EDiscordResult = 11;
pub const DiscordResult_InvalidJoinSecret: EDiscordResult = 12;
pub const DiscordResult_NoEligibleActivity: EDiscordResult = 13;
pub const DiscordResult_InvalidInvite: EDiscordResult = 14;
pub const DiscordResult_NotAuthenticated: EDiscordResult = 15;
pub const DiscordResult_InvalidAccessToken: EDiscordResult = 16;
pub const DiscordResult_ApplicationMismatch: EDiscordResult = 17;
pub const DiscordResult_InvalidDataUrl: EDiscordResult = 18;
pub const DiscordResult_InvalidBase64: EDiscordResult = 19;
pub const DiscordResult_NotFiltered: EDiscordResult = 20;
pub const DiscordResult_LobbyFull: EDiscordResult = 21;
pub const DiscordResult_InvalidLobbySecret: EDiscordResult = 22;
pub const DiscordResult_InvalidFilename: EDiscordResult = 23;
pub const DiscordResult_InvalidFileSize: EDiscordResult = 24;
pub const DiscordResult_InvalidEntitlement: EDiscordResult = 25;
pub const DiscordResult_NotInstalled: EDiscordResult = 26;
pub const DiscordResult_NotRunning: EDiscordResult = 27;
pub const DiscordResult_InsufficientBuffer: EDiscordResult = 28;
pub const DiscordResult_PurchaseCanceled: EDiscordResult = 29;
pub const DiscordResult_InvalidGuild: EDiscordResult = 30;
pub const DiscordResult_InvalidEvent: EDiscordResult = 31;
pub const DiscordResult_InvalidChannel: EDiscordResult = 32;
pub const DiscordResult_InvalidOrigin: EDiscordResult = 33;
pub const DiscordResult_RateLimited: EDiscordResult = 34;
pub const DiscordResult_OAuth2Error: EDiscordResult = 35;
pub const DiscordResult_SelectChannelTimeout: EDiscordResult = 36;
pub const DiscordResult_GetGuildTimeout: EDiscordResult = 37;
pub const DiscordResult_SelectVoiceForceRequired: EDiscordResult = 38;
pub const DiscordResult_CaptureShortcutAlreadyListening: EDiscordResult = 39;
pub const DiscordResult_UnauthorizedForAchievement: EDiscordResult = 40;
pub const DiscordResult_InvalidGiftCode: EDiscordResult = 41;
pub const DiscordResult_PurchaseError: EDiscordResult = 42;
pub const DiscordResult_TransactionAborted: EDiscordResult = 43;

// === EDiscordCreateFlags ===

pub type EDiscordCreateFlags = u64;
pub const DiscordCreateFlags_Default: EDiscordCreateFlags = 0;
pub const DiscordCreateFlags_NoRequireDiscord: EDiscordCreateFlags = 1;

// === EDiscordLogLevel ===

pub type EDiscordLogLevel = i32;
pub const DiscordLogLevel_Error: EDiscordLogLevel = 1;
pub const DiscordLogLevel_Warn: EDiscordLogLevel = 2;
pub const DiscordLogLevel_Info: EDiscordLogLevel = 3;
pub const DiscordLogLevel_Debug: EDiscordLogLevel = 4;

// === EDiscordUserFlag ===

pub type EDiscordUserFlag = i32;
pub const DiscordUserFlag_Partner: EDiscordUserFlag = 2;
pub const DiscordUserFlag_HypeSquadEvents: EDiscordUserFlag = 4;
pub const DiscordUserFlag_HypeSquadHouse1: EDiscordUserFlag = 64;
pub const DiscordUserFlag_HypeSquadHouse2: EDiscordUserFlag = 128;
pub const DiscordUserFlag_HypeSquadHouse3: EDiscordUserFlag = 256;

// === EDiscordPremiumType ===

pub type EDiscordPremiumType = i32;
pub const DiscordPremiumType_None: EDiscordPremiumType = 0;
pub const DiscordPremiumType_Tier1: EDiscordPremiumType = 1;
pub const DiscordPremiumType_Tier2: EDiscordPremiumType = 2;

// === EDiscordImageType ===

pub type EDiscordImageType = i32;
pub const DiscordImageType_User: EDiscordImageType = 0;

// === EDiscordActivityType ===

pub type EDiscordActivityType = i32;
pub const DiscordActivityType_Playing: EDiscordActivityType = 0;
pub const DiscordActivityType_Streaming: EDiscordActivityType = 1;
pub const DiscordActivityType_Listening: EDiscordActivityType = 2;
pub const DiscordActivityType_Watching: EDiscordActivityType = 3;
pub const DiscordActivityType_Custom: EDiscordActivityType = 4;

// === EDiscordActivityActionType ===

pub type EDiscordActivityActionType = i32;
pub const DiscordActivityActionType_Join: EDiscordActivityActionType = 1;
pub const DiscordActivityActionType_Spectate: EDiscordActivityActionType = 2;

// === EDiscordActivityJoinRequestReply ===

pub type EDiscordActivityJoinRequestReply = i32;
pub const DiscordActivityJoinRequestReply_No: EDiscordActivityJoinRequestReply = 0;
pub const DiscordActivityJoinRequestReply_Yes: EDiscordActivityJoinRequestReply = 1;
pub const DiscordActivityJoinRequestReply_Ignore: EDiscordActivityJoinRequestReply = 2;

// === EDiscordStatus ===

pub type EDiscordStatus = i32;
pub const DiscordStatus_Offline: EDiscordStatus = 0;
pub const DiscordStatus_Online: EDiscordStatus = 1;
pub const DiscordStatus_Idle: EDiscordStatus = 2;
pub const DiscordStatus_DoNotDisturb: EDiscordStatus = 3;

// === EDiscordRelationshipType ===

pub type EDiscordRelationshipType = i32;
pub const DiscordRelationshipType_None: EDiscordRelationshipType = 0;
pub const DiscordRelationshipType_Friend: EDiscordRelationshipType = 1;
pub const DiscordRelationshipType_Blocked: EDiscordRelationshipType = 2;
pub const DiscordRelationshipType_PendingIncoming: EDiscordRelationshipType = 3;
pub const DiscordRelationshipType_PendingOutgoing: EDiscordRelationshipType = 4;
pub const DiscordRelationshipType_Implicit: EDiscordRelationshipType = 5;

// === EDiscordLobbyType ===

pub type EDiscordLobbyType = i32;
pub const DiscordLobbyType_Private: EDiscordLobbyType = 1;
pub const DiscordLobbyType_Public: EDiscordLobbyType = 2;

// === EDiscordLobbySearchComparison ===

pub type EDiscordLobbySearchComparison = i32;
pub const DiscordLobbySearchComparison_LessThanOrEqual: EDiscordLobbySearchComparison = -2;
pub const DiscordLobbySearchComparison_LessThan: EDiscordLobbySearchComparison = -1;
pub const DiscordLobbySearchComparison_Equal: EDiscordLobbySearchComparison = 0;
pub const DiscordLobbySearchComparison_GreaterThan: EDiscordLobbySearchComparison = 1;
pub const DiscordLobbySearchComparison_GreaterThanOrEqual: EDiscordLobbySearchComparison = 2;
pub const DiscordLobbySearchComparison_NotEqual: EDiscordLobbySearchComparison = 3;

// === EDiscordLobbySearchCast ===

pub type EDiscordLobbySearchCast = i32;
pub const DiscordLobbySearchCast_String: EDiscordLobbySearchCast = 1;
pub const DiscordLobbySearchCast_Number: EDiscordLobbySearchCast = 2;

// === EDiscordLobbySearchDistance ===

pub type EDiscordLobbySearchDistance = i32;
pub const DiscordLobbySearchDistance_Local: EDiscordLobbySearchDistance = 0;
pub const DiscordLobbySearchDistance_Default: EDiscordLobbySearchDistance = 1;
pub const DiscordLobbySearchDistance_Extended: EDiscordLobbySearchDistance = 2;
pub const DiscordLobbySearchDistance_Global: EDiscordLobbySearchDistance = 3;

// === EDiscordEntitlementType ===

pub type EDiscordEntitlementType = i32;
pub const DiscordEntitlementType_Purchase: EDiscordEntitlementType = 1;
pub const DiscordEntitlementType_PremiumSubscription: EDiscordEntitlementType = 2;
pub const DiscordEntitlementType_DeveloperGift: EDiscordEntitlementType = 3;
pub const DiscordEntitlementType_TestModePurchase: EDiscordEntitlementType = 4;
pub const DiscordEntitlementType_FreePurchase: EDiscordEntitlementType = 5;
pub const DiscordEntitlementType_UserGift: EDiscordEntitlementType = 6;
pub const DiscordEntitlementType_PremiumPurchase: EDiscordEntitlementType = 7;

// === EDiscordSkuType ===

pub type EDiscordSkuType = i32;
pub const DiscordSkuType_Application: EDiscordSkuType = 1;
pub const DiscordSkuType_DLC: EDiscordSkuType = 2;
pub const DiscordSkuType_Consumable: EDiscordSkuType = 3;
pub const DiscordSkuType_Bundle: EDiscordSkuType = 4;

// === EDiscordInputModeType ===

pub type EDiscordInputModeType = i32;
pub const DiscordInputModeType_VoiceActivity: EDiscordInputModeType = 0;
pub const DiscordInputModeType_PushToTalk: EDiscordInputModeType = 1;
