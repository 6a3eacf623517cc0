use reqwest::Method;
use shared::{WelcomeBonusTimerConfig, WelcomeBonusTimerUpdate};
use tracing::{error, info, warn};

use crate::services::api::{ApiClient, ApiError};
use crate::services::mappers::WelcomeBonusTimerMapper;

pub const WELCOME_BONUS_TIMER_PATH: &str = "/api/admin/game-offers/welcome-bonus-timer";

/// Client for the welcome bonus timer singleton
#[derive(Clone, Debug)]
pub struct WelcomeBonusTimerClient {
    api: ApiClient,
}

impl WelcomeBonusTimerClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `Ok(None)` when the deployment has no timer configured yet
    pub async fn get(&self) -> Result<Option<WelcomeBonusTimerConfig>, ApiError> {
        let result: Result<Option<WelcomeBonusTimerConfig>, ApiError> = async {
            let body = self.api.get_json(WELCOME_BONUS_TIMER_PATH).await?;
            let config = WelcomeBonusTimerMapper::first_config(body)?;
            Ok(config.map(WelcomeBonusTimerMapper::from_wire))
        }
        .await;

        match &result {
            Ok(Some(config)) => info!(
                "Fetched welcome bonus timer: unlock after {}h, complete within {}d, active: {}",
                config.unlock_time_hours, config.completion_deadline_days, config.is_active
            ),
            Ok(None) => info!("No welcome bonus timer configured"),
            Err(e) => error!("Failed to fetch welcome bonus timer: {}", e),
        }
        result
    }

    /// Full replace. If the backend answers without a record, the submitted
    /// configuration is returned instead.
    pub async fn update(
        &self,
        update: WelcomeBonusTimerUpdate,
    ) -> Result<WelcomeBonusTimerConfig, ApiError> {
        let request = WelcomeBonusTimerMapper::to_wire(update);
        info!("Updating welcome bonus timer: {:?}", request);

        let result: Result<WelcomeBonusTimerConfig, ApiError> = async {
            let body = self
                .api
                .send_json(Method::PUT, WELCOME_BONUS_TIMER_PATH, &request)
                .await?;
            let config = match WelcomeBonusTimerMapper::first_config(body)? {
                Some(config) => config,
                None => {
                    warn!("Welcome bonus timer update returned no record, using submitted values");
                    serde_json::from_value(serde_json::to_value(&request)?)?
                }
            };
            Ok(WelcomeBonusTimerMapper::from_wire(config))
        }
        .await;

        if let Err(e) = &result {
            error!("Failed to update welcome bonus timer: {}", e);
        }
        result
    }
}
