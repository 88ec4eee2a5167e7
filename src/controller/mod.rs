//! API controller modules, one file per domain.

pub mod loans;
pub mod misc;
pub mod notifications;
pub mod order_book;
pub mod watcher;
