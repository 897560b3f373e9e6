/// Handler modules for Discord gateway events
mod ready;
mod voice;

// Re-export main handler functions
pub use ready::handle_cache_ready;
pub use voice::handle_voice_state_update;
