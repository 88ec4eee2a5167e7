//! Telegram bot: deep-link activation and subscription management.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use teloxide::{dispatching::UpdateFilterExt, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
};

pub use self::handlers::Command;

mod handlers;
pub mod keyboard;

/// Payload of `https://t.me/<bot>?start=<payload>`.
pub fn encode_start_payload(id: &Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

pub fn decode_start_payload(payload: &str) -> Result<Uuid, Error> {
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim().trim_end_matches('='))?;
    let value = String::from_utf8(bytes)
        .map_err(|e| Error::Validation(format!("Invalid start payload: {}", e)))?;
    Ok(Uuid::parse_str(&value)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    GoMenu,
    ShowNotifications,
    Notifications(i64),
    Delete(Uuid),
    DeleteConfirm(Uuid),
    AllUnsubscribe,
    AllUnsubscribeConfirm,
    CreateSubscription,
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::GoMenu => write!(f, "go_menu"),
            Callback::ShowNotifications => write!(f, "show_notifications"),
            Callback::Notifications(page) => write!(f, "notifications_{}", page),
            Callback::Delete(id) => write!(f, "notification_delete_{}", id),
            Callback::DeleteConfirm(id) => {
                write!(f, "notification_delete_confirm_{}", id)
            },
            Callback::AllUnsubscribe => write!(f, "all_unsubscribe"),
            Callback::AllUnsubscribeConfirm => {
                write!(f, "all_unsubscribe_confirm")
            },
            Callback::CreateSubscription => write!(f, "create_subscription"),
        }
    }
}

impl FromStr for Callback {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let callback = match value {
            "go_menu" => Callback::GoMenu,
            "show_notifications" => Callback::ShowNotifications,
            "all_unsubscribe" => Callback::AllUnsubscribe,
            "all_unsubscribe_confirm" => Callback::AllUnsubscribeConfirm,
            "create_subscription" => Callback::CreateSubscription,
            _ => {
                if let Some(id) = value.strip_prefix("notification_delete_confirm_") {
                    Callback::DeleteConfirm(Uuid::parse_str(id)?)
                } else if let Some(id) = value.strip_prefix("notification_delete_") {
                    Callback::Delete(Uuid::parse_str(id)?)
                } else if let Some(page) = value.strip_prefix("notifications_") {
                    Callback::Notifications(page.parse()?)
                } else {
                    return Err(Error::Validation(format!(
                        "Unknown callback {}",
                        value
                    )));
                }
            },
        };

        Ok(callback)
    }
}

/// Long polling dispatcher, runs until the process stops.
pub async fn telegram_task(app_state: AppState<State>) -> Result<(), Error> {
    let bot = app_state.bot.clone();

    tokio::spawn(async move {
        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(handlers::command),
            )
            .branch(Update::filter_callback_query().endpoint(handlers::callback));

        info!("Telegram bot started");

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![app_state])
            .default_handler(|_| async {})
            .build()
            .dispatch()
            .await;
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_payload() {
        let id = Uuid::parse_str("1b4e28ba-2fa1-11d2-883f-0016d3cca427").unwrap();
        let payload = encode_start_payload(&id);
        assert!(!payload.contains('='));
        assert!(payload.len() <= 64);
        assert_eq!(decode_start_payload(&payload).unwrap(), id);
        assert!(decode_start_payload("not base64!").is_err());
    }

    #[test]
    fn test_callback_data() {
        let id = Uuid::nil();
        let items = [
            Callback::GoMenu,
            Callback::ShowNotifications,
            Callback::Notifications(3),
            Callback::Delete(id),
            Callback::DeleteConfirm(id),
            Callback::AllUnsubscribe,
            Callback::AllUnsubscribeConfirm,
            Callback::CreateSubscription,
        ];
        for item in items {
            assert_eq!(Callback::from_str(&item.to_string()).unwrap(), item);
        }

        assert_eq!(
            Callback::from_str(&format!("notification_delete_confirm_{}", id)).unwrap(),
            Callback::DeleteConfirm(id)
        );
        assert!(Callback::from_str("notifications_x").is_err());
        assert!(Callback::from_str("protocol_zkLend").is_err());
    }
}
