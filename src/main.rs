use tracing::{error, Level};
use tracing_subscriber::util::SubscriberInitExt;

use derisk::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::{
        notification_sender, notification_trigger, order_books, vesu_positions,
    },
    provider::{DatabasePool, Starknet, HTTP},
    server, telegram,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    // Also forwards `log` records, used by the actix request logger.
    subscriber.try_init()?;

    let (config, database) = match init().await {
        Ok((config, database)) => (config, database),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let http = HTTP::new(config.clone())?;
    let starknet = Starknet::new(&config)?;

    let state = State::new(config, database, http, starknet).await?;
    let app_state = AppState::new(state);

    let (_, _, _, _, _, _) = tokio::try_join!(
        server::server_task(&app_state),
        notification_trigger::notification_trigger_task(app_state.clone()),
        notification_sender::notification_sender_task(app_state.clone()),
        telegram::telegram_task(app_state.clone()),
        order_books::order_books_task(app_state.clone()),
        vesu_positions::vesu_task(app_state.clone()),
    )?;

    Ok(())
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}
