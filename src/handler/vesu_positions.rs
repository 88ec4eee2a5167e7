use tokio::{time, time::Duration};
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::health_ratio,
    loan_entity::{Collector, VesuPositionCollector},
    vesu::VESU_FIRST_BLOCK,
};

/// Stores the positions touched since the last synced block.
pub async fn sync_positions(app_state: AppState<State>) -> Result<usize, Error> {
    let from_block = match app_state.database.vesu_position.get_last_block().await? {
        Some(block) => block + 1,
        None => VESU_FIRST_BLOCK,
    };
    let to_block = app_state.starknet.block_number().await?;

    if from_block > to_block {
        return Ok(0);
    }

    let collector = VesuPositionCollector {
        from_block,
        to_block,
    };
    let positions = collector.collect(&app_state).await?;

    let mut transaction = app_state.database.pool.begin().await?;
    for position in &positions {
        app_state
            .database
            .vesu_position
            .upsert(position, &mut transaction)
            .await?;
    }
    transaction.commit().await?;

    info!(
        "Synced {} Vesu positions from blocks {}..={}",
        positions.len(),
        from_block,
        to_block
    );

    Ok(positions.len())
}

/// Position sync followed by a health ratio pass.
pub async fn vesu_task(app_state: AppState<State>) -> Result<(), Error> {
    if !app_state.config.enable_sync {
        return Ok(());
    }

    let interval = app_state.config.vesu_sync_interval;
    let mut interval = time::interval(Duration::from_secs(interval));

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            if let Err(error) = sync_positions(app_state.clone()).await {
                error!("Vesu sync error {}", error);
            };
            if let Err(error) =
                health_ratio::compute_health_ratios(app_state.clone()).await
            {
                error!("Vesu health ratio error {}", error);
            };
        }
    })
    .await?
}
