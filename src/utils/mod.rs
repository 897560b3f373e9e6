/// Utility modules for common functionality
pub mod channel_utils;
pub mod datetime;
pub mod message_formatter;
pub mod messages;
pub mod pagination;
pub mod retry;
pub mod string_utils;
pub mod timezone;
pub mod validation;
