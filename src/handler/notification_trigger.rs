use tokio::{time, time::Duration};
use tracing::{error, info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

pub async fn trigger(app_state: AppState<State>) -> Result<(), Error> {
    let status = app_state.http.trigger_notifications().await?;

    if status.is_success() {
        info!("Notification trigger answered {}", status);
    } else {
        warn!("Notification trigger answered {}", status);
    }

    Ok(())
}

/// Asks the API to check health ratios on every `HEALTH_CHECK_INTERVAL`.
pub async fn notification_trigger_task(
    app_state: AppState<State>,
) -> Result<(), Error> {
    let interval = app_state.config.health_check_interval;
    let mut interval = time::interval(Duration::from_secs(interval));

    tokio::spawn(async move {
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(error) = trigger(app_state.clone()).await {
                error!("Notification trigger error {}", error);
            };
        }
    })
    .await?
}
