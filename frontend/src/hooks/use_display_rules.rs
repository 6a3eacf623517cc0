use std::cell::RefCell;
use std::rc::Rc;

use shared::{DisplayRule, DisplayRulePatch, NewDisplayRule};
use tracing::{debug, error};

use crate::hooks::RequestTracker;
use crate::services::api::{ApiClient, ApiError};
use crate::services::display_rules::DisplayRulesClient;

pub const FETCH_RULES_ERROR: &str = "Failed to load display rules. Please try again.";
pub const CREATE_RULE_ERROR: &str = "Failed to create display rule. Please try again.";
pub const UPDATE_RULE_ERROR: &str = "Failed to update display rule. Please try again.";
pub const DELETE_RULE_ERROR: &str = "Failed to delete display rule. Please try again.";

#[derive(Clone, Debug, PartialEq, Default)]
pub struct DisplayRulesState {
    /// Replaced wholesale on every change, never mutated in place
    pub rules: Rc<Vec<DisplayRule>>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Display rules list plus the operations that keep it in sync with the backend
#[derive(Clone)]
pub struct UseDisplayRulesHandle {
    client: DisplayRulesClient,
    state: Rc<RefCell<DisplayRulesState>>,
    requests: Rc<RequestTracker>,
}

/// Hook for managing the display rules list
pub fn use_display_rules(api_client: &ApiClient) -> UseDisplayRulesHandle {
    UseDisplayRulesHandle::new(DisplayRulesClient::new(api_client.clone()))
}

impl UseDisplayRulesHandle {
    pub fn new(client: DisplayRulesClient) -> Self {
        Self {
            client,
            state: Rc::new(RefCell::new(DisplayRulesState::default())),
            requests: Rc::new(RequestTracker::default()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> DisplayRulesState {
        self.state.borrow().clone()
    }

    pub fn rules(&self) -> Rc<Vec<DisplayRule>> {
        Rc::clone(&self.state.borrow().rules)
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub async fn fetch(&self) -> Result<Rc<Vec<DisplayRule>>, ApiError> {
        let seq = self.start();
        let result = self.client.list().await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(rules) => {
                let rules = Rc::new(rules);
                if self.requests.try_apply(seq) {
                    state.rules = Rc::clone(&rules);
                } else {
                    debug!("Discarding display rules response #{}, newer state already applied", seq);
                }
                Ok(rules)
            }
            Err(e) => {
                error!("{}: {}", FETCH_RULES_ERROR, e);
                state.error = Some(FETCH_RULES_ERROR.to_string());
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: NewDisplayRule) -> Result<DisplayRule, ApiError> {
        let seq = self.start();
        let result = self.client.create(draft).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(rule) => {
                self.requests.mark_applied(seq);
                // A fetch that landed first may already hold the new record
                let mut rules: Vec<DisplayRule> = state
                    .rules
                    .iter()
                    .filter(|existing| existing.id != rule.id)
                    .cloned()
                    .collect();
                rules.push(rule.clone());
                state.rules = Rc::new(rules);
                Ok(rule)
            }
            Err(e) => {
                error!("{}: {}", CREATE_RULE_ERROR, e);
                state.error = Some(CREATE_RULE_ERROR.to_string());
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, patch: DisplayRulePatch) -> Result<DisplayRule, ApiError> {
        let seq = self.start();
        let result = self.client.update(id, patch).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(rule) => {
                self.requests.mark_applied(seq);
                let rules = state
                    .rules
                    .iter()
                    .map(|existing| {
                        if existing.id == id {
                            rule.clone()
                        } else {
                            existing.clone()
                        }
                    })
                    .collect();
                state.rules = Rc::new(rules);
                Ok(rule)
            }
            Err(e) => {
                error!("{} ({}): {}", UPDATE_RULE_ERROR, id, e);
                state.error = Some(UPDATE_RULE_ERROR.to_string());
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let seq = self.start();
        let result = self.client.delete(id).await;

        let mut state = self.state.borrow_mut();
        state.loading = false;
        match result {
            Ok(()) => {
                self.requests.mark_applied(seq);
                let rules = state
                    .rules
                    .iter()
                    .filter(|existing| existing.id != id)
                    .cloned()
                    .collect();
                state.rules = Rc::new(rules);
                Ok(())
            }
            Err(e) => {
                error!("{} ({}): {}", DELETE_RULE_ERROR, id, e);
                state.error = Some(DELETE_RULE_ERROR.to_string());
                Err(e)
            }
        }
    }

    fn start(&self) -> u64 {
        let seq = self.requests.begin();
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
        seq
    }
}
