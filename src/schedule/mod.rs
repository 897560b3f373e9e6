/// Periodic background tasks
mod birthday_task;

pub use birthday_task::BirthdayTask;
