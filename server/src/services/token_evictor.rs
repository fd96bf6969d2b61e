use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::state::AppState;

pub async fn run(state: AppState, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        let evicted = state.auth.evict_expired(Utc::now());
        if evicted > 0 {
            info!(
                "evicted {evicted} expired session tokens ({} remaining)",
                state.auth.active_tokens()
            );
        }
    }
}
