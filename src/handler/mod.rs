pub mod health_ratio;
pub mod notification_sender;
pub mod notification_trigger;
pub mod notifications;
pub mod order_books;
pub mod vesu_positions;
