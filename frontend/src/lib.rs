//! Client side of the rewards admin console.
//!
//! [`services`] talks to the rewards admin API and converts between its record
//! shapes and the shapes the admin screens render. [`hooks`] wraps those
//! clients with the list/record state, loading flag and error message a screen
//! binds to.

pub mod hooks;
pub mod services;

#[cfg(test)]
mod test_utils;

pub use hooks::{use_display_rules, use_welcome_bonus_timer};
pub use services::date_utils::{date_range_filter, DateRange, DateRangeFilter};
pub use services::{ApiClient, ApiError};
