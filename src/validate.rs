//! Per-field validation rules for form submissions.
//!
//! Validation runs before sanitization on the raw payload values, so the
//! error messages refer to what the client actually sent. The booking
//! window (allowed dates, business hours) is deployment configuration,
//! not a constant - see [`BookingWindow`].

use chrono::NaiveDate;

use crate::models::Communication;

/// The bookable calendar for one deployment: a short whitelist of dates and
/// a daily business-hours range `[open_hour, close_hour)`.
#[derive(Debug, Clone)]
pub struct BookingWindow {
    pub dates: Vec<String>,
    pub open_hour: u32,
    pub close_hour: u32,
}

/// Minutes-past-the-hour at which slots start.
const SLOT_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Validate a display name: 2-100 characters, letters plus whitespace,
/// hyphen, apostrophe and period only.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }
    if name.chars().count() > 100 {
        return Err("Name must be at most 100 characters".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.')))
    {
        return Err(format!("Name contains invalid character: {c:?}"));
    }
    Ok(())
}

/// Validate a communication channel against the fixed enum.
pub fn validate_communication(value: &str) -> Result<Communication, String> {
    value
        .parse()
        .map_err(|_| "Invalid communication method".to_string())
}

/// Validate an optional time slot of the form `YYYY-MM-DD-HH:MM`.
///
/// The date must be whitelisted, the hour inside business hours and the
/// minute on a 15-minute boundary. An absent slot is always valid.
pub fn validate_time_slot(slot: Option<&str>, window: &BookingWindow) -> Result<(), String> {
    let Some(slot) = slot else {
        return Ok(());
    };

    let (date_part, time_part) = match slot.split_at_checked(10) {
        Some((date, rest)) if rest.len() == 6 && rest.starts_with('-') => (date, &rest[1..]),
        _ => return Err("Invalid time slot format".to_string()),
    };

    if NaiveDate::parse_from_str(date_part, "%Y-%m-%d").is_err() {
        return Err("Invalid time slot format".to_string());
    }

    let (hour, minute) = match time_part.split_once(':') {
        Some((h, m)) => match (h.parse::<u32>(), m.parse::<u32>()) {
            (Ok(h), Ok(m)) if h < 24 && m < 60 => (h, m),
            _ => return Err("Invalid time slot format".to_string()),
        },
        None => return Err("Invalid time slot format".to_string()),
    };

    if !window.dates.iter().any(|d| d == date_part) {
        return Err("Selected date is not available for booking".to_string());
    }
    if hour < window.open_hour || hour >= window.close_hour {
        return Err("Selected time is outside business hours".to_string());
    }
    if !SLOT_MINUTES.contains(&minute) {
        return Err("Selected time is not on a 15-minute boundary".to_string());
    }

    Ok(())
}
