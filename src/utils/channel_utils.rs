/// Pure functions for channel name and configuration
use poise::serenity_prelude::{PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId, UserId};

/// Format a temporary channel name for a user
pub fn format_temp_channel_name(user_name: &str) -> String {
    format!("{}'s Channel", user_name)
}

/// Permission overwrites applied to a freshly created temporary channel
///
/// The owner may move members and manage the channel, the blocked role cannot
/// see it, and the default role can see and join it.
pub fn temp_channel_overwrites(
    owner_id: UserId,
    blocked_role_id: RoleId,
    default_role_id: RoleId,
) -> Vec<PermissionOverwrite> {
    vec![
        PermissionOverwrite {
            allow: Permissions::MOVE_MEMBERS | Permissions::MANAGE_CHANNELS,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(owner_id),
        },
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(blocked_role_id),
        },
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::CONNECT,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(default_role_id),
        },
    ]
}
