use std::time::Duration;

/// How often the birthday reconciliation loop runs
pub const BIRTHDAY_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// How long a birthday role is held, in wall-clock seconds
pub const BIRTHDAY_ROLE_HOLD_SECS: i64 = 86_400;

/// Number of birthdays shown per page of `/birthdaylist`
pub const BIRTHDAY_PAGE_SIZE: usize = 30;

/// How long the `/birthdaylist` navigation buttons stay active
pub const BIRTHDAY_LIST_TIMEOUT: Duration = Duration::from_secs(180);

/// Minimum time between two template sends into the same channel
pub const MESSAGE_COOLDOWN: Duration = Duration::from_secs(5);

/// Pause before a template is sent
pub const MESSAGE_SEND_DELAY: Duration = Duration::from_millis(500);

/// Backoff before the single retry after a rate limit
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(1);

/// Minimum time between two temporary channel creations for the same member
pub const CHANNEL_CREATE_COOLDOWN: Duration = Duration::from_secs(5);

/// Delay before retrying a failed channel create/move/delete
pub const PLATFORM_RETRY_DELAY: Duration = Duration::from_secs(1);

/// User limit applied to temporary voice channels
pub const TEMP_CHANNEL_USER_LIMIT: u32 = 10;

/// File names inside the data directory
pub const BIRTHDAYS_FILE: &str = "birthdays.json";
pub const ACTIVE_ROLES_FILE: &str = "active_birthday_roles.json";
pub const TEMP_CHANNELS_FILE: &str = "temp_channels.json";

/// Sub-directory of the data directory holding message templates
pub const TEMPLATES_DIR_NAME: &str = "messages";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "cogbot_rs=info";
