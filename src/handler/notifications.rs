use bigdecimal::{BigDecimal, FromPrimitive};
use tracing::{debug, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::calculate_difference,
    types::{ProtocolId, TELEGRAM_ID_MIN_LENGTH},
};

/// Smallest move of the health ratio that is worth an alert.
pub const HEALTH_RATIO_THRESHOLD: f64 = 0.1;

pub fn should_notify(latest: &BigDecimal, level: f64) -> bool {
    let (Some(level), Some(threshold)) = (
        BigDecimal::from_f64(level),
        BigDecimal::from_f64(HEALTH_RATIO_THRESHOLD),
    ) else {
        return false;
    };

    calculate_difference(latest, &level) >= threshold
}

/// Queues every activated subscriber whose ratio drifted from its level.
pub async fn enqueue_notifications(
    app_state: AppState<State>,
) -> Result<usize, Error> {
    let protocols: Vec<String> = ProtocolId::currently_available()
        .into_iter()
        .map(String::from)
        .collect();

    let subscribers = app_state
        .database
        .notification_data
        .get_all_activated(TELEGRAM_ID_MIN_LENGTH, &protocols)
        .await?;

    let mut count = 0;

    for subscriber in subscribers {
        let latest = app_state
            .database
            .health_ratio_level
            .get_latest(&subscriber.protocol_id, &subscriber.wallet_id)
            .await?;

        let Some(latest) = latest else {
            debug!(
                "No health ratio for {} in {}",
                subscriber.wallet_id, subscriber.protocol_id
            );
            continue;
        };

        if should_notify(&latest.value, subscriber.health_ratio_level)
            && app_state.notifications.push_back(subscriber.id)?
        {
            count += 1;
        }
    }

    info!("Enqueued {} notifications", count);

    Ok(count)
}
