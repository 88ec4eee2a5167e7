use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        Health_Ratio_Level, Interest_Rate, Loan_State, Notification_Data,
        Order_Book, Table, Telegram_Log, Vesu_Position,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub loan_state: Table<Loan_State>,
    pub interest_rate: Table<Interest_Rate>,
    pub vesu_position: Table<Vesu_Position>,
    pub health_ratio_level: Table<Health_Ratio_Level>,
    pub notification_data: Table<Notification_Data>,
    pub telegram_log: Table<Telegram_Log>,
    pub order_book: Table<Order_Book>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            loan_state: Table::new(pool.clone()),
            interest_rate: Table::new(pool.clone()),
            vesu_position: Table::new(pool.clone()),
            health_ratio_level: Table::new(pool.clone()),
            notification_data: Table::new(pool.clone()),
            telegram_log: Table::new(pool.clone()),
            order_book: Table::new(pool.clone()),
            pool,
        }
    }
}
