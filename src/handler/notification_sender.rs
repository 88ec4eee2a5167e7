use teloxide::{prelude::*, RequestError};
use tokio::{time, time::Duration};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Telegram_Log,
    types::NotificationQueue,
};

const SEND_DELAY: Duration = Duration::from_millis(50);

pub fn build_message(wallet_id: &str) -> String {
    format!(
        "Warning. Your health ratio is too low for wallet_id {}",
        wallet_id
    )
}

/// Puts a throttled alert back at the head of the queue and returns the wait.
pub fn requeue_on_retry(
    queue: &NotificationQueue,
    id: Uuid,
    error: &RequestError,
) -> Result<Option<Duration>, Error> {
    match error {
        RequestError::RetryAfter(seconds) => {
            queue.push_front(id)?;
            Ok(Some(seconds.duration()))
        },
        _ => Ok(None),
    }
}

/// Sends the alert at the head of the queue.
///
/// Returns `false` once the queue is empty.
pub async fn send_next(app_state: &AppState<State>) -> Result<bool, Error> {
    let Some(id) = app_state.notifications.pop_front()? else {
        return Ok(false);
    };

    let Some(notification) =
        app_state.database.notification_data.get_by_id(id).await?
    else {
        warn!("Notification {} no longer exists", id);
        return Ok(true);
    };

    let message = build_message(&notification.wallet_id);
    let mut is_succesfully = false;

    if !notification.telegram_id.is_empty() {
        match notification.telegram_id.parse::<i64>() {
            Ok(chat_id) => {
                match app_state
                    .bot
                    .send_message(ChatId(chat_id), message.clone())
                    .await
                {
                    Ok(_) => is_succesfully = true,
                    Err(e) => {
                        match requeue_on_retry(&app_state.notifications, id, &e)? {
                            Some(delay) => {
                                warn!(
                                    "Telegram rate limit, retrying {} after {:?}",
                                    id, delay
                                );
                                time::sleep(delay).await;
                            },
                            None => {
                                error!("Failed to send notification {}: {}", id, e)
                            },
                        }
                    },
                }
            },
            Err(e) => {
                error!(
                    "Invalid telegram id {} of {}: {}",
                    notification.telegram_id, id, e
                );
            },
        }
    }

    let log = Telegram_Log {
        sent_at: chrono::Utc::now(),
        notification_data_id: id,
        is_succesfully,
        message,
    };
    app_state.database.telegram_log.insert(&log).await?;

    Ok(true)
}

pub async fn drain(app_state: AppState<State>) -> Result<usize, Error> {
    let mut sent = 0;

    while send_next(&app_state).await? {
        sent += 1;
        time::sleep(SEND_DELAY).await;
    }

    if sent > 0 {
        info!("Processed {} notifications", sent);
    }

    Ok(sent)
}

pub async fn notification_sender_task(
    app_state: AppState<State>,
) -> Result<(), Error> {
    let interval = app_state.config.notification_send_interval_ms;
    let mut interval = time::interval(Duration::from_millis(interval));

    tokio::spawn(async move {
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(error) = drain(app_state.clone()).await {
                error!("Notification sender error {}", error);
            };
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use teloxide::{types::Seconds, ApiError};

    use super::*;

    #[test]
    fn test_retry_after_requeues_at_front() {
        let queue = NotificationQueue::new();
        let waiting = Uuid::new_v4();
        let throttled = Uuid::new_v4();
        queue.push_back(waiting).unwrap();

        let error = RequestError::RetryAfter(Seconds::from_seconds(3));
        let delay = requeue_on_retry(&queue, throttled, &error).unwrap();

        assert_eq!(delay, Some(Duration::from_secs(3)));
        assert_eq!(queue.pop_front().unwrap(), Some(throttled));
        assert_eq!(queue.pop_front().unwrap(), Some(waiting));
    }

    #[test]
    fn test_other_errors_drop_the_alert() {
        let queue = NotificationQueue::new();
        let error = RequestError::Api(ApiError::BotBlocked);

        let delay = requeue_on_retry(&queue, Uuid::new_v4(), &error).unwrap();
        assert_eq!(delay, None);
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_build_message() {
        assert_eq!(
            build_message("0x0123"),
            "Warning. Your health ratio is too low for wallet_id 0x0123"
        );
    }
}
