use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::{models::Data, platform::SerenityPlatform};

/// Once the cache is populated, remove temp channels that emptied while the bot was offline
pub async fn handle_cache_ready(ctx: &serenity::Context, data: &Data) {
    let platform = SerenityPlatform::from_context(ctx);
    let report = data.voice.startup_cleanup(&platform).await;

    info!(
        "Temp channel cleanup: {} deleted, {} already gone, {} still in use",
        report.deleted.len(),
        report.forgotten.len(),
        report.kept.len()
    );
    if !report.failed.is_empty() {
        warn!("Could not check temp channels {:?}", report.failed);
    }
}
