pub use self::{
    path::{get_path, read_migration},
    types::{DataBase, PoolOption, PoolType, QueryResult},
};

mod health_ratio_level;
mod interest_rate;
mod loan_state;
mod notification_data;
mod order_book;
mod path;
mod telegram_log;
mod types;
mod vesu_position;
