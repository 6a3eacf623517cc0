//! Conversions between the rewards API's record shapes and the admin screens' shapes.

pub mod display_rule_mapper;
pub mod welcome_bonus_timer_mapper;

pub use display_rule_mapper::DisplayRuleMapper;
pub use welcome_bonus_timer_mapper::WelcomeBonusTimerMapper;
