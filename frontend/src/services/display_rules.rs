use reqwest::Method;
use shared::{ApiDisplayRule, DisplayRule, DisplayRulePatch, NewDisplayRule};
use tracing::{error, info};

use crate::services::api::{ApiClient, ApiError};
use crate::services::mappers::DisplayRuleMapper;

pub const DISPLAY_RULES_PATH: &str = "/api/admin/game-offers/display-rules";

/// Client for the display rules resource
#[derive(Clone, Debug)]
pub struct DisplayRulesClient {
    api: ApiClient,
}

impl DisplayRulesClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<DisplayRule>, ApiError> {
        let result: Result<Vec<DisplayRule>, ApiError> = async {
            let body = self.api.get_json(DISPLAY_RULES_PATH).await?;
            let rules: Vec<ApiDisplayRule> = serde_json::from_value(body)?;
            Ok(rules.into_iter().map(DisplayRuleMapper::from_wire).collect())
        }
        .await;

        match &result {
            Ok(rules) => info!("Fetched {} display rules", rules.len()),
            Err(e) => error!("Failed to fetch display rules: {}", e),
        }
        result
    }

    pub async fn create(&self, draft: NewDisplayRule) -> Result<DisplayRule, ApiError> {
        let request = DisplayRuleMapper::create_request(draft);
        info!("Creating display rule for milestone {}", request.user_milestone);

        let result: Result<DisplayRule, ApiError> = async {
            let body = self
                .api
                .send_json(Method::POST, DISPLAY_RULES_PATH, &request)
                .await?;
            let created: ApiDisplayRule = serde_json::from_value(body)?;
            Ok(DisplayRuleMapper::from_wire(created))
        }
        .await;

        if let Err(e) = &result {
            error!("Failed to create display rule: {}", e);
        }
        result
    }

    /// Partial update; fields left as `None` in `patch` are not sent at all
    pub async fn update(&self, id: &str, patch: DisplayRulePatch) -> Result<DisplayRule, ApiError> {
        let request = DisplayRuleMapper::update_request(patch);
        info!("Updating display rule {}", id);

        let result: Result<DisplayRule, ApiError> = async {
            let path = format!("{}/{}", DISPLAY_RULES_PATH, id);
            let body = self.api.send_json(Method::PUT, &path, &request).await?;
            let updated: ApiDisplayRule = serde_json::from_value(body)?;
            Ok(DisplayRuleMapper::from_wire(updated))
        }
        .await;

        if let Err(e) = &result {
            error!("Failed to update display rule {}: {}", id, e);
        }
        result
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        info!("Deleting display rule {}", id);
        let path = format!("{}/{}", DISPLAY_RULES_PATH, id);
        let result = self.api.delete(&path).await;

        if let Err(e) = &result {
            error!("Failed to delete display rule {}: {}", id, e);
        }
        result
    }
}
