//! Mappers between the display-rule wire shape and the shape the admin screens use.

use chrono::{DateTime, Utc};
use serde_json::Map;
use shared::{
    milestone_label, milestone_token, ApiDisplayRule, CreateDisplayRuleRequest, DisplayRule,
    DisplayRulePatch, NewDisplayRule, RuleMetadata, SegmentOverride, UpdateDisplayRuleRequest,
    DEFAULT_MAX_GAMES_TO_SHOW, DEFAULT_USER_MILESTONE,
};

/// Shown when the backend does not say who created a rule
pub const DEFAULT_CREATED_BY: &str = "System";

pub struct DisplayRuleMapper;

impl DisplayRuleMapper {
    pub fn from_wire(rule: ApiDisplayRule) -> DisplayRule {
        let milestone = milestone_label(&rule.user_milestone);
        let metadata = rule.metadata.clone().unwrap_or_default();
        let order = rule.order.unwrap_or(1);

        let name = non_empty(metadata.name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} Rule", milestone));
        let description = non_empty(metadata.description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Display rule for {} users", milestone));

        let mut conditions = vec![format!("User milestone: {}", milestone)];
        conditions.extend(rule.segment_overrides.iter().map(SegmentOverride::condition));

        let target_segment = match rule.segment_overrides.len() {
            0 => "All Users".to_string(),
            n => format!("{} segment override(s)", n),
        };

        let last_modified = rule
            .updated_at
            .as_deref()
            .or(rule.created_at.as_deref())
            .map(date_only)
            .unwrap_or_else(|| "-".to_string());

        DisplayRule {
            id: rule.record_id().unwrap_or_default().to_string(),
            name,
            milestone,
            description,
            max_games: rule.max_games_to_show.unwrap_or(DEFAULT_MAX_GAMES_TO_SHOW),
            conditions,
            enabled: rule.is_enabled.unwrap_or(false),
            priority: metadata.priority.unwrap_or(order),
            target_segment,
            last_modified,
            created_by: rule
                .created_by
                .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string()),
            applied_count: 0,
            conversion_rate: "N/A".to_string(),
            user_milestone: rule.user_milestone,
            segment_overrides: rule.segment_overrides,
            metadata,
            order,
        }
    }

    /// Back to the wire shape, from the raw fields a rule keeps for editing
    pub fn to_wire(rule: &DisplayRule) -> ApiDisplayRule {
        ApiDisplayRule {
            mongo_id: Some(rule.id.clone()),
            id: None,
            user_milestone: rule.user_milestone.clone(),
            max_games_to_show: Some(rule.max_games),
            segment_overrides: rule.segment_overrides.clone(),
            is_enabled: Some(rule.enabled),
            order: Some(rule.order),
            metadata: (!rule.metadata.is_empty()).then(|| rule.metadata.clone()),
            created_at: None,
            updated_at: (rule.last_modified != "-").then(|| rule.last_modified.clone()),
            created_by: (rule.created_by != DEFAULT_CREATED_BY).then(|| rule.created_by.clone()),
        }
    }

    /// Top-level `name`/`description`/`priority` win over the same keys in `metadata`.
    pub fn create_request(draft: NewDisplayRule) -> CreateDisplayRuleRequest {
        let user_milestone = non_empty(draft.user_milestone.as_deref())
            .map(str::to_string)
            .or_else(|| {
                non_empty(draft.milestone.as_deref())
                    .map(milestone_token)
                    .filter(|token| !token.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_USER_MILESTONE.to_string());

        let mut metadata = draft.metadata.unwrap_or_default();
        if draft.name.is_some() {
            metadata.name = draft.name;
        }
        if draft.description.is_some() {
            metadata.description = draft.description;
        }
        if draft.priority.is_some() {
            metadata.priority = draft.priority;
        }

        CreateDisplayRuleRequest {
            user_milestone,
            max_games_to_show: draft.max_games.unwrap_or(DEFAULT_MAX_GAMES_TO_SHOW),
            segment_overrides: draft.segment_overrides.unwrap_or_default(),
            is_enabled: draft.enabled.unwrap_or(true),
            order: draft.order.or(draft.priority).unwrap_or(1),
            metadata,
        }
    }

    /// Only the fields present in the patch end up in the request body.
    pub fn update_request(patch: DisplayRulePatch) -> UpdateDisplayRuleRequest {
        let user_milestone = patch
            .user_milestone
            .or_else(|| patch.milestone.as_deref().map(milestone_token));

        let metadata = RuleMetadata {
            name: patch.name,
            description: patch.description,
            priority: patch.priority,
            extra: Map::new(),
        };

        UpdateDisplayRuleRequest {
            user_milestone,
            max_games_to_show: patch.max_games,
            segment_overrides: patch.segment_overrides,
            is_enabled: patch.enabled,
            order: patch.order,
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `2025-03-02T18:30:00Z` -> `2025-03-02` (UTC)
fn date_only(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed.with_timezone(&Utc).format("%Y-%m-%d").to_string(),
        Err(_) => timestamp
            .split('T')
            .next()
            .unwrap_or(timestamp)
            .to_string(),
    }
}
