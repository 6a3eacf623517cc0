pub mod api;
pub mod date_utils;
pub mod display_rules;
pub mod mappers;
pub mod welcome_bonus_timer;

pub use api::{ApiClient, ApiError, EnvToken, StaticToken, TokenProvider};
pub use display_rules::DisplayRulesClient;
pub use welcome_bonus_timer::WelcomeBonusTimerClient;
