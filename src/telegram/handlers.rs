use std::str::FromStr;

use chrono::Utc;
use teloxide::{
    prelude::*,
    types::{InlineKeyboardMarkup, MaybeInaccessibleMessage, User},
    utils::command::BotCommands,
};
use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Notification_Data,
};

use super::{decode_start_payload, keyboard, Callback};

#[derive(Debug, BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "link this chat to a subscription.")]
    Start(String),
    #[command(description = "show the menu.")]
    Menu,
}

fn telegram_id(user: &User) -> String {
    user.id.0.to_string()
}

pub fn format_notification(item: &Notification_Data) -> String {
    format!(
        "Wallet ID: {}\nHealth Ratio Level: {}\nProtocol: {}",
        item.wallet_id, item.health_ratio_level, item.protocol_id
    )
}

pub async fn command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    app_state: AppState<State>,
) -> Result<(), Error> {
    match cmd {
        Command::Start(payload) if payload.trim().is_empty() => {
            bot.send_message(
                msg.chat.id,
                "Hello from Derisk! You subscribed for updates, will be sent here.",
            )
            .await?;
        },
        Command::Start(payload) => {
            let Some(user) = msg.from.as_ref() else {
                return Ok(());
            };

            let id = match decode_start_payload(&payload) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Invalid start payload {}: {}", payload, e);
                    bot.send_message(msg.chat.id, "Invalid subscription link.")
                        .await?;
                    return Ok(());
                },
            };

            let result = app_state
                .database
                .notification_data
                .update_telegram_id(id, &telegram_id(user))
                .await?;

            if result.rows_affected() == 0 {
                bot.send_message(msg.chat.id, "Subscription not found.")
                    .await?;
                return Ok(());
            }

            info!("Subscription {} linked at {}", id, Utc::now());
            bot.send_message(msg.chat.id, "You are subscribed to notifications.")
                .reply_markup(keyboard::go_menu())
                .await?;
        },
        Command::Menu => {
            bot.send_message(msg.chat.id, "Menu:")
                .reply_markup(keyboard::menu())
                .await?;
        },
    }

    Ok(())
}

async fn edit(
    bot: &Bot,
    message: &MaybeInaccessibleMessage,
    text: String,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<(), Error> {
    let request = bot.edit_message_text(message.chat().id, message.id(), text);

    match markup {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };

    Ok(())
}

async fn show_page(
    bot: &Bot,
    query: &CallbackQuery,
    message: &MaybeInaccessibleMessage,
    app_state: &AppState<State>,
    page: i64,
    from_pagination: bool,
) -> Result<(), Error> {
    let telegram_id = telegram_id(&query.from);
    let page = page.max(0);
    let table = &app_state.database.notification_data;

    let total = table.count_by_telegram_id(&telegram_id).await?;
    let items = table.get_page_by_telegram_id(&telegram_id, page, 1).await?;

    let Some(item) = items.first() else {
        let text = if from_pagination {
            "Not more notifications"
        } else {
            "You have no notifications"
        };
        bot.answer_callback_query(query.id.clone())
            .text(text)
            .show_alert(true)
            .await?;
        return Ok(());
    };

    bot.answer_callback_query(query.id.clone()).await?;
    edit(
        bot,
        message,
        format_notification(item),
        Some(keyboard::pagination(item.id, page, page + 1 < total)),
    )
    .await
}

pub async fn callback(
    bot: Bot,
    query: CallbackQuery,
    app_state: AppState<State>,
) -> Result<(), Error> {
    let (Some(data), Some(message)) = (query.data.as_deref(), query.message.as_ref())
    else {
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    let callback = match Callback::from_str(data) {
        Ok(callback) => callback,
        Err(e) => {
            warn!("Skipping callback: {}", e);
            bot.answer_callback_query(query.id.clone()).await?;
            return Ok(());
        },
    };

    match callback {
        Callback::GoMenu => {
            edit(&bot, message, String::from("Menu:"), Some(keyboard::menu()))
                .await?;
        },
        Callback::ShowNotifications => {
            return show_page(&bot, &query, message, &app_state, 0, false).await;
        },
        Callback::Notifications(page) => {
            return show_page(&bot, &query, message, &app_state, page, true).await;
        },
        Callback::Delete(id) => {
            let current = message
                .regular_message()
                .and_then(|item| item.text())
                .unwrap_or_default();
            edit(
                &bot,
                message,
                format!(
                    "Are you sure you want to delete this notification? \n\n{}",
                    current
                ),
                Some(keyboard::confirm_delete(id)),
            )
            .await?;
        },
        Callback::DeleteConfirm(id) => {
            app_state
                .database
                .notification_data
                .delete_by_id(id, &telegram_id(&query.from))
                .await?;
            edit(
                &bot,
                message,
                String::from("Notification deleted."),
                Some(keyboard::menu()),
            )
            .await?;
            bot.answer_callback_query(query.id.clone())
                .text("Deleted notification.")
                .await?;
            return Ok(());
        },
        Callback::AllUnsubscribe => {
            edit(
                &bot,
                message,
                String::from(
                    "Are you sure you want to unsubscribe from all notifications?",
                ),
                Some(keyboard::confirm_all_unsubscribe()),
            )
            .await?;
        },
        Callback::AllUnsubscribeConfirm => {
            app_state
                .database
                .notification_data
                .delete_by_telegram_id(&telegram_id(&query.from))
                .await?;
            edit(
                &bot,
                message,
                String::from("You are unsubscribed from all notifications."),
                Some(keyboard::menu()),
            )
            .await?;
        },
        Callback::CreateSubscription => {
            edit(
                &bot,
                message,
                String::from("Subscription is temporarily unavailable"),
                None,
            )
            .await?;
        },
    }

    bot.answer_callback_query(query.id.clone()).await?;

    Ok(())
}
