//! Mappers for the welcome bonus timer singleton.

use serde_json::{Map, Value};
use shared::{
    ApiWelcomeBonusTimerConfig, TimerMetadata, UpdateWelcomeBonusTimerRequest,
    WelcomeBonusTimerConfig, WelcomeBonusTimerUpdate, DEFAULT_COMPLETION_DEADLINE_DAYS,
    DEFAULT_TIMER_DESCRIPTION, DEFAULT_TIMER_VERSION, DEFAULT_UNLOCK_TIME_HOURS,
};

pub struct WelcomeBonusTimerMapper;

impl WelcomeBonusTimerMapper {
    /// An absent `isActive` means active; an explicit `false` is kept.
    pub fn from_wire(config: ApiWelcomeBonusTimerConfig) -> WelcomeBonusTimerConfig {
        WelcomeBonusTimerConfig {
            id: config.record_id().map(str::to_string),
            unlock_time_hours: config.unlock_time_hours.unwrap_or(DEFAULT_UNLOCK_TIME_HOURS),
            completion_deadline_days: config
                .completion_deadline_days
                .unwrap_or(DEFAULT_COMPLETION_DEADLINE_DAYS),
            game_overrides: config.game_overrides.unwrap_or_default(),
            xp_tier_overrides: config.xp_tier_overrides.unwrap_or_default(),
            is_active: config.is_active.unwrap_or(true),
            metadata: config.metadata.unwrap_or_default(),
            created_at: config.created_at,
            updated_at: config.updated_at,
            created_by: config.created_by,
            updated_by: config.updated_by,
        }
    }

    pub fn to_wire(update: WelcomeBonusTimerUpdate) -> UpdateWelcomeBonusTimerRequest {
        UpdateWelcomeBonusTimerRequest {
            unlock_time_hours: update.unlock_time_hours.unwrap_or(DEFAULT_UNLOCK_TIME_HOURS),
            completion_deadline_days: update
                .completion_deadline_days
                .unwrap_or(DEFAULT_COMPLETION_DEADLINE_DAYS),
            game_overrides: update.game_overrides.unwrap_or_default(),
            xp_tier_overrides: update.xp_tier_overrides.unwrap_or_default(),
            is_active: update.is_active.unwrap_or(true),
            metadata: TimerMetadata {
                description: Some(
                    update
                        .description
                        .unwrap_or_else(|| DEFAULT_TIMER_DESCRIPTION.to_string()),
                ),
                notes: Some(update.notes.unwrap_or_default()),
                version: Some(
                    update
                        .version
                        .unwrap_or_else(|| DEFAULT_TIMER_VERSION.to_string()),
                ),
                extra: Map::new(),
            },
        }
    }

    /// Pre-fill the settings form from the current configuration
    pub fn to_update(config: &WelcomeBonusTimerConfig) -> WelcomeBonusTimerUpdate {
        WelcomeBonusTimerUpdate {
            unlock_time_hours: Some(config.unlock_time_hours),
            completion_deadline_days: Some(config.completion_deadline_days),
            game_overrides: Some(config.game_overrides.clone()),
            xp_tier_overrides: Some(config.xp_tier_overrides.clone()),
            is_active: Some(config.is_active),
            description: config.metadata.description.clone(),
            notes: config.metadata.notes.clone(),
            version: config.metadata.version.clone(),
        }
    }

    /// The backend answers with either a list or a single object; only the first entry counts.
    pub fn first_config(
        body: Value,
    ) -> Result<Option<ApiWelcomeBonusTimerConfig>, serde_json::Error> {
        let candidate = match body {
            Value::Array(items) => items.into_iter().next(),
            Value::Null => None,
            other => Some(other),
        };

        match candidate {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }
}
