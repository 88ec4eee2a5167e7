use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use uuid::Uuid;

use super::Callback;

fn button(text: &str, callback: Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, callback.to_string())
}

pub fn go_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[button("Go to menu", Callback::GoMenu)]])
}

pub fn menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [button("Shows notifications", Callback::ShowNotifications)],
        [button("Create subscription", Callback::CreateSubscription)],
        [button("Unsubscribe all", Callback::AllUnsubscribe)],
    ])
}

pub fn confirm_delete(id: Uuid) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [button("No", Callback::GoMenu)],
        [button("Yes (delete)", Callback::DeleteConfirm(id))],
    ])
}

pub fn confirm_all_unsubscribe() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        [button("No", Callback::GoMenu)],
        [button("Yes(Unsubscribe all)", Callback::AllUnsubscribeConfirm)],
    ])
}

/// One subscription per page; `<` is hidden on the first page and `>` on
/// the last one.
pub fn pagination(id: Uuid, page: i64, has_next: bool) -> InlineKeyboardMarkup {
    let mut row = vec![];

    if page > 0 {
        row.push(button("<", Callback::Notifications(page - 1)));
    }
    row.push(button("Delete", Callback::Delete(id)));
    if has_next {
        row.push(button(">", Callback::Notifications(page + 1)));
    }

    InlineKeyboardMarkup::new(vec![row, vec![button("Go to menu", Callback::GoMenu)]])
}
