use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod validation;

pub use validation::{
    validate, validate_integration_form, validate_notification_form, validation_rules,
    FieldValidation, FormValidation, IntegrationForm, NotificationForm, ValidationRule,
};

/// Default number of games a display rule shows when none is given
pub const DEFAULT_MAX_GAMES_TO_SHOW: u32 = 5;
/// Milestone token used when a new rule names no milestone at all
pub const DEFAULT_USER_MILESTONE: &str = "first_game";
/// Default unlock delay for the welcome bonus, in hours
pub const DEFAULT_UNLOCK_TIME_HOURS: u32 = 24;
/// Default completion deadline for the welcome bonus, in days
pub const DEFAULT_COMPLETION_DEADLINE_DAYS: u32 = 7;
pub const DEFAULT_TIMER_DESCRIPTION: &str = "Welcome bonus timer configuration";
pub const DEFAULT_TIMER_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Display rules
// ---------------------------------------------------------------------------

/// A targeting exception layered onto a display rule.
///
/// Same shape on the wire and in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentOverride {
    #[serde(rename = "type")]
    pub segment_type: String,
    pub value: String,
    pub max_games_to_show: u32,
}

impl SegmentOverride {
    /// Human condition line, e.g. `"Country: US → 3 games"`
    pub fn condition(&self) -> String {
        format!(
            "{}: {} → {} games",
            capitalize(&self.segment_type),
            self.value,
            self.max_games_to_show
        )
    }
}

/// Free-form metadata the backend stores next to a display rule.
///
/// Only `name`, `description` and `priority` are interpreted; anything else
/// is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleMetadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.extra.is_empty()
    }
}

/// Display rule as returned by `GET /api/admin/game-offers/display-rules`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDisplayRule {
    /// Mongo-style backends send `_id`, sometimes alongside an `id` virtual
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user_milestone: String,
    #[serde(default)]
    pub max_games_to_show: Option<u32>,
    #[serde(default)]
    pub segment_overrides: Vec<SegmentOverride>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub metadata: Option<RuleMetadata>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Display rule in the shape the admin screens render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRule {
    pub id: String,
    pub name: String,
    /// Title-cased label, always derivable from `user_milestone`
    pub milestone: String,
    pub description: String,
    pub max_games: u32,
    pub conditions: Vec<String>,
    pub enabled: bool,
    pub priority: i64,
    pub target_segment: String,
    /// Date only (`YYYY-MM-DD`), or `"-"` when the backend sent no timestamp
    pub last_modified: String,
    pub created_by: String,
    pub applied_count: u64,
    pub conversion_rate: String,
    pub user_milestone: String,
    pub segment_overrides: Vec<SegmentOverride>,
    pub metadata: RuleMetadata,
    pub order: i64,
}

/// Input for creating a display rule, in the screens' vocabulary.
///
/// Either `user_milestone` (token) or `milestone` (label) may be given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDisplayRule {
    pub user_milestone: Option<String>,
    pub milestone: Option<String>,
    #[serde(alias = "maxGamesToShow")]
    pub max_games: Option<u32>,
    pub segment_overrides: Option<Vec<SegmentOverride>>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
    pub priority: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<RuleMetadata>,
}

/// Partial update of a display rule. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayRulePatch {
    pub user_milestone: Option<String>,
    pub milestone: Option<String>,
    #[serde(alias = "maxGamesToShow")]
    pub max_games: Option<u32>,
    pub segment_overrides: Option<Vec<SegmentOverride>>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
    pub priority: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body of `POST /api/admin/game-offers/display-rules`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisplayRuleRequest {
    pub user_milestone: String,
    pub max_games_to_show: u32,
    pub segment_overrides: Vec<SegmentOverride>,
    pub is_enabled: bool,
    pub order: i64,
    pub metadata: RuleMetadata,
}

/// Body of `PUT /api/admin/game-offers/display-rules/{id}`; absent fields are omitted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisplayRuleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_games_to_show: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_overrides: Option<Vec<SegmentOverride>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RuleMetadata>,
}

// ---------------------------------------------------------------------------
// Welcome bonus timer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTimerOverride {
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_time_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_deadline_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpTierTimerOverride {
    #[serde(alias = "tier")]
    pub xp_tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_time_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_deadline_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimerMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDisplayRule {
    /// `_id` wins over `id` when both are present
    pub fn record_id(&self) -> Option<&str> {
        self.mongo_id.as_deref().or(self.id.as_deref())
    }
}

/// Timer configuration as the backend stores it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWelcomeBonusTimerConfig {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub unlock_time_hours: Option<u32>,
    #[serde(default)]
    pub completion_deadline_days: Option<u32>,
    #[serde(default)]
    pub game_overrides: Option<Vec<GameTimerOverride>>,
    #[serde(default)]
    pub xp_tier_overrides: Option<Vec<XpTierTimerOverride>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub metadata: Option<TimerMetadata>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl ApiWelcomeBonusTimerConfig {
    pub fn record_id(&self) -> Option<&str> {
        self.mongo_id.as_deref().or(self.id.as_deref())
    }
}

/// Welcome bonus timer with every default applied. One per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeBonusTimerConfig {
    pub id: Option<String>,
    pub unlock_time_hours: u32,
    pub completion_deadline_days: u32,
    pub game_overrides: Vec<GameTimerOverride>,
    pub xp_tier_overrides: Vec<XpTierTimerOverride>,
    pub is_active: bool,
    pub metadata: TimerMetadata,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Settings form submitted by the timer screen; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WelcomeBonusTimerUpdate {
    pub unlock_time_hours: Option<u32>,
    pub completion_deadline_days: Option<u32>,
    pub game_overrides: Option<Vec<GameTimerOverride>>,
    pub xp_tier_overrides: Option<Vec<XpTierTimerOverride>>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub version: Option<String>,
}

/// Body of `PUT /api/admin/game-offers/welcome-bonus-timer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWelcomeBonusTimerRequest {
    pub unlock_time_hours: u32,
    pub completion_deadline_days: u32,
    pub game_overrides: Vec<GameTimerOverride>,
    pub xp_tier_overrides: Vec<XpTierTimerOverride>,
    pub is_active: bool,
    pub metadata: TimerMetadata,
}

// ---------------------------------------------------------------------------
// Milestone helpers
// ---------------------------------------------------------------------------

/// Upper-cases the first character, leaving the rest as is
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `first_game` -> `First Game`
///
/// Empty segments are dropped, so `first__game` and `_first_game` also read
/// `First Game`. Only canonical tokens (non-empty lowercase words joined by
/// single underscores) survive a trip through [`milestone_token`] unchanged.
pub fn milestone_label(token: &str) -> String {
    token
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `First Game` -> `first_game`; runs of whitespace collapse to one underscore
pub fn milestone_token(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_milestone_label() {
        assert_eq!(milestone_label("first_game"), "First Game");
        assert_eq!(milestone_label("level_10_reached"), "Level 10 Reached");
        assert_eq!(milestone_label("onboarding"), "Onboarding");
        assert_eq!(milestone_label(""), "");
    }

    #[test]
    fn test_milestone_token() {
        assert_eq!(milestone_token("First Game"), "first_game");
        assert_eq!(milestone_token("  Level   10 Reached "), "level_10_reached");
    }

    #[test]
    fn test_milestone_helpers_are_mutually_derivable() {
        for token in ["first_game", "second_purchase", "vip"] {
            assert_eq!(milestone_token(&milestone_label(token)), token);
        }
        for label in ["First Game", "Second Purchase", "Vip"] {
            assert_eq!(milestone_label(&milestone_token(label)), label);
        }
    }

    #[test]
    fn test_non_canonical_tokens_normalise() {
        for token in ["first__game", "_first_game", "first_game_"] {
            assert_eq!(milestone_label(token), "First Game", "{token}");
            assert_eq!(milestone_token(&milestone_label(token)), "first_game", "{token}");
        }
    }

    #[test]
    fn test_segment_override_condition() {
        let segment = SegmentOverride {
            segment_type: "country".to_string(),
            value: "US".to_string(),
            max_games_to_show: 3,
        };
        assert_eq!(segment.condition(), "Country: US → 3 games");
    }

    #[test]
    fn test_api_display_rule_accepts_mongo_id_and_missing_fields() {
        let rule: ApiDisplayRule = serde_json::from_value(json!({
            "_id": "abc123",
            "userMilestone": "first_game",
            "segmentOverrides": [{ "type": "country", "value": "US", "maxGamesToShow": 2 }],
            "metadata": { "name": "Starter", "campaign": "spring" }
        }))
        .unwrap();

        assert_eq!(rule.record_id(), Some("abc123"));
        assert_eq!(rule.max_games_to_show, None);
        assert_eq!(rule.is_enabled, None);
        assert_eq!(rule.segment_overrides.len(), 1);

        let metadata = rule.metadata.unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Starter"));
        assert_eq!(metadata.extra.get("campaign"), Some(&json!("spring")));
    }

    #[test]
    fn test_records_with_both_id_keys_decode() {
        let rule: ApiDisplayRule = serde_json::from_value(json!({
            "_id": "abc",
            "id": "abc-virtual",
            "userMilestone": "first_game"
        }))
        .unwrap();
        assert_eq!(rule.record_id(), Some("abc"));

        let rule: ApiDisplayRule =
            serde_json::from_value(json!({ "id": "plain", "userMilestone": "first_game" })).unwrap();
        assert_eq!(rule.record_id(), Some("plain"));

        let timer: ApiWelcomeBonusTimerConfig =
            serde_json::from_value(json!({ "_id": "timer-1", "id": "timer-1" })).unwrap();
        assert_eq!(timer.record_id(), Some("timer-1"));
    }

    #[test]
    fn test_update_request_omits_absent_fields() {
        let request = UpdateDisplayRuleRequest {
            is_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "isEnabled": false }));
    }

    #[test]
    fn test_rule_metadata_is_empty() {
        assert!(RuleMetadata::default().is_empty());
        let metadata = RuleMetadata {
            priority: Some(2),
            ..Default::default()
        };
        assert!(!metadata.is_empty());
    }

    #[test]
    fn test_timer_config_keeps_explicit_false() {
        let config: ApiWelcomeBonusTimerConfig =
            serde_json::from_value(json!({ "isActive": false })).unwrap();
        assert_eq!(config.is_active, Some(false));

        let config: ApiWelcomeBonusTimerConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.is_active, None);
    }
}
