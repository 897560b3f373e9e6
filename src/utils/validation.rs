use super::datetime::is_valid_date;
use super::timezone::{TimezoneError, UserTimezone, parse_timezone};

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{month}/{day} is not a valid date")]
    InvalidDate { day: u32, month: u32 },
    #[error(transparent)]
    InvalidTimezone(#[from] TimezoneError),
    #[error("Message template {0} has neither content nor embeds")]
    EmptyTemplate(String),
}

/// Validate a birthday and resolve its timezone
pub fn validate_birthday(
    day: u32,
    month: u32,
    timezone: &str,
) -> Result<UserTimezone, ValidationError> {
    let tz = parse_timezone(timezone)?;
    if !is_valid_date(month, day) {
        return Err(ValidationError::InvalidDate { day, month });
    }
    Ok(tz)
}

/// Template names must stay inside the template directory
pub fn is_safe_template_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains(['/', '\\'])
        && !name.starts_with('.')
}
