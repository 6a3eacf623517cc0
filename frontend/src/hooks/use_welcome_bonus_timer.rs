use std::cell::RefCell;
use std::rc::Rc;

use shared::{WelcomeBonusTimerConfig, WelcomeBonusTimerUpdate};
use tracing::{debug, error};

use crate::hooks::RequestTracker;
use crate::services::api::{ApiClient, ApiError};
use crate::services::welcome_bonus_timer::WelcomeBonusTimerClient;

pub const FETCH_TIMER_ERROR: &str = "Failed to load welcome bonus timer settings.";
pub const UPDATE_TIMER_ERROR: &str = "Failed to save welcome bonus timer settings.";

#[derive(Clone, Debug, PartialEq, Default)]
pub struct WelcomeBonusTimerState {
    pub config: Option<WelcomeBonusTimerConfig>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct UseWelcomeBonusTimerHandle {
    client: WelcomeBonusTimerClient,
    state: Rc<RefCell<WelcomeBonusTimerState>>,
    requests: Rc<RequestTracker>,
}

/// Hook for managing the welcome bonus timer configuration
pub fn use_welcome_bonus_timer(api_client: &ApiClient) -> UseWelcomeBonusTimerHandle {
    UseWelcomeBonusTimerHandle::new(WelcomeBonusTimerClient::new(api_client.clone()))
}

impl UseWelcomeBonusTimerHandle {
    pub fn new(client: WelcomeBonusTimerClient) -> Self {
        Self {
            client,
            state: Rc::new(RefCell::new(WelcomeBonusTimerState::default())),
            requests: Rc::new(RequestTracker::default()),
        }
    }

    pub fn state(&self) -> WelcomeBonusTimerState {
        self.state.borrow().clone()
    }

    pub fn config(&self) -> Option<WelcomeBonusTimerConfig> {
        self.state.borrow().config.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// `Ok(None)` leaves the screen on its defaults; it is not an error
    pub async fn fetch(&self) -> Result<Option<WelcomeBonusTimerConfig>, ApiError> {
        let seq = self.start();
        let result = self.client.get().await;
        self.settle(seq, result, FETCH_TIMER_ERROR, |config| config.clone())
    }

    pub async fn update(
        &self,
        update: WelcomeBonusTimerUpdate,
    ) -> Result<WelcomeBonusTimerConfig, ApiError> {
        let seq = self.start();
        let result = self.client.update(update).await;
        self.settle(seq, result, UPDATE_TIMER_ERROR, |config| Some(config.clone()))
    }

    fn start(&self) -> u64 {
        let seq = self.requests.begin();
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
        seq
    }

    /// Both operations replace the whole config, so both are fenced
    fn settle<T>(
        &self,
        seq: u64,
        result: Result<T, ApiError>,
        message: &str,
        held: impl FnOnce(&T) -> Option<WelcomeBonusTimerConfig>,
    ) -> Result<T, ApiError> {
        let mut state = self.state.borrow_mut();
        state.loading = false;

        match result {
            Ok(value) => {
                if self.requests.try_apply(seq) {
                    state.config = held(&value);
                } else {
                    debug!("Discarding welcome bonus timer response #{}, newer state already applied", seq);
                }
                Ok(value)
            }
            Err(e) => {
                error!("{}: {}", message, e);
                state.error = Some(message.to_string());
                Err(e)
            }
        }
    }
}
