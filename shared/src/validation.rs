//! Field and form validation for the integration and notification settings screens.
//!
//! Validation never touches the network. Results are plain values: a field
//! either passes or carries a message, and a form collects those messages by
//! field name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::capitalize;

/// A named validation rule. Static configuration, never persisted.
#[derive(Debug)]
pub struct ValidationRule {
    pub required: bool,
    pub pattern: Option<Regex>,
    pub message: &'static str,
}

static RULES: Lazy<HashMap<&'static str, ValidationRule>> = Lazy::new(|| {
    let mut rules = HashMap::new();
    rules.insert(
        "apiKey",
        ValidationRule {
            required: true,
            pattern: Some(compile(r"^[A-Za-z0-9_-]{16,}$")),
            message: "API key must be at least 16 characters and contain only letters, numbers, underscores or dashes",
        },
    );
    rules.insert(
        "endpointUrl",
        ValidationRule {
            required: true,
            pattern: Some(compile(r"^https://[A-Za-z0-9.-]+\.[A-Za-z]{2,}(/.*)?$")),
            message: "Endpoint URL must be a valid HTTPS URL",
        },
    );
    // Only required when the notification type is "slack"; callers pass the override.
    rules.insert(
        "slackWebhookUrl",
        ValidationRule {
            required: false,
            pattern: Some(compile(
                r"^https://hooks\.slack\.com/services/[A-Z0-9]+/[A-Z0-9]+/[A-Za-z0-9]+$",
            )),
            message: "Slack webhook URL must look like https://hooks.slack.com/services/...",
        },
    );
    rules.insert(
        "integrationName",
        ValidationRule {
            required: true,
            pattern: Some(compile(r"^[A-Za-z0-9\s\-_]{2,50}$")),
            message: "Integration name must be 2-50 characters of letters, numbers, spaces, dashes or underscores",
        },
    );
    rules
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

/// The static rule table, keyed by field name
pub fn validation_rules() -> &'static HashMap<&'static str, ValidationRule> {
    &RULES
}

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Outcome of validating a whole form: field name -> message for every failure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl FormValidation {
    fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `value` against the rule named `field_name`.
///
/// `is_required` overrides the rule's own required flag when given. Unknown
/// field names always pass.
pub fn validate(field_name: &str, value: &str, is_required: Option<bool>) -> FieldValidation {
    let Some(rule) = RULES.get(field_name) else {
        return FieldValidation::valid();
    };

    let required = is_required.unwrap_or(rule.required);
    if value.trim().is_empty() {
        if required {
            return FieldValidation::invalid(format!("{} is required", capitalize(field_name)));
        }
        return FieldValidation::valid();
    }

    match &rule.pattern {
        Some(pattern) if !pattern.is_match(value) => FieldValidation::invalid(rule.message),
        _ => FieldValidation::valid(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationForm {
    pub name: String,
    pub api_key: String,
    pub endpoint_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationForm {
    pub notification_type: String,
    pub slack_webhook_url: String,
    pub recipient_roles: Vec<String>,
    pub trigger_events: Vec<String>,
}

pub fn validate_integration_form(form: &IntegrationForm) -> FormValidation {
    let checks = [
        ("name", validate("integrationName", &form.name, Some(true))),
        ("apiKey", validate("apiKey", &form.api_key, Some(true))),
        ("endpointUrl", validate("endpointUrl", &form.endpoint_url, Some(true))),
    ];

    let errors = checks
        .into_iter()
        .filter_map(|(field, result)| result.message.map(|message| (field.to_string(), message)))
        .collect();

    FormValidation::from_errors(errors)
}

/// The Slack webhook is only checked when the notification type is `slack`.
pub fn validate_notification_form(form: &NotificationForm) -> FormValidation {
    let mut errors = BTreeMap::new();

    if form.notification_type == "slack" {
        let result = validate("slackWebhookUrl", &form.slack_webhook_url, Some(true));
        if let Some(message) = result.message {
            errors.insert("slackWebhookUrl".to_string(), message);
        }
    }

    if form.recipient_roles.is_empty() {
        errors.insert(
            "recipientRoles".to_string(),
            "Select at least one recipient role".to_string(),
        );
    }

    if form.trigger_events.is_empty() {
        errors.insert(
            "triggerEvents".to_string(),
            "Select at least one trigger event".to_string(),
        );
    }

    FormValidation::from_errors(errors)
}
