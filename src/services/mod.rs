/// Feature services holding the bot's state and business logic
pub mod birthday_service;
pub mod message_service;
pub mod voice_service;
