/// Pure functions for formatting error and success messages (Discord-agnostic)

/// Format a validation error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format a success message with emoji
pub fn format_success(message: &str) -> String {
    format!("✅ {}", message)
}

/// Format an info message with emoji
pub fn format_info(message: &str) -> String {
    format!("ℹ️ {}", message)
}

/// Build an error message for command usage in the wrong channel
pub fn build_wrong_channel_error(channel_description: &str) -> String {
    format_error(&format!(
        "This command can only be used in the {} channel!",
        channel_description
    ))
}

/// Build a storage error message (generic, doesn't expose internals)
pub fn build_storage_error() -> String {
    format_error("Could not save your changes. Please try again later.")
}

/// Build the reply for a rejected birthday
pub fn build_invalid_birthday_error(reason: &str) -> String {
    format_error(&format!(
        "Invalid date or timezone! Please check your input. ({})",
        reason
    ))
}

/// Build the confirmation for a saved birthday
pub fn build_birthday_saved(month: u32, day: u32, timezone: &str) -> String {
    format_success(&format!("Birthday set to {}/{} ({})!", month, day, timezone))
}

/// Build the public birthday announcement for a user mention
pub fn build_birthday_announcement(mention: &str) -> String {
    format!("@everyone 🎉 Happy Birthday {}! 🎂", mention)
}

/// Build the reply shown while a channel is on cooldown
pub fn build_cooldown_message(remaining_secs: f64) -> String {
    format_info(&format!(
        "Message sending will be available in {:.1} seconds.",
        remaining_secs
    ))
}

/// Build the reply for a missing message template
pub fn build_template_not_found(file_name: &str) -> String {
    format_error(&format!("File not found: {}", file_name))
}

/// Build the reply for a template send that failed for good
pub fn build_send_error(reason: &str) -> String {
    format_error(&format!("Error: {}", reason))
}
