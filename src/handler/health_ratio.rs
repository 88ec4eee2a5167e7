use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    loan_entity::{is_valid_health_ratio, Collector, HealthFactor, PriceCollector},
    model::Health_Ratio_Level,
    types::Prices,
    vesu::{VesuLoanEntity, PROTOCOL_ID},
};

/// Computes and stores the health ratio of every latest Vesu position.
///
/// Positions without debt are skipped, failures of single positions are
/// logged and do not stop the pass.
pub async fn compute_health_ratios(
    app_state: AppState<State>,
) -> Result<usize, Error> {
    let prices = match PriceCollector.collect(&app_state).await {
        Ok(prices) => prices,
        Err(e) => {
            warn!("Price feed unavailable: {}", e);
            Prices::new()
        },
    };

    let positions = app_state
        .database
        .vesu_position
        .get_latest_positions()
        .await?;
    let entity = VesuLoanEntity::new(&app_state, &prices);
    let mut count = 0;

    for position in positions {
        let health_factor = match entity.compute_health_factor(&position).await {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Health factor of {} in pool {}: {}",
                    position.user, position.pool_id, e
                );
                continue;
            },
        };

        if !is_valid_health_ratio(&health_factor) {
            continue;
        }

        if let HealthFactor::Finite(value) = health_factor {
            let item = Health_Ratio_Level {
                timestamp: position.block_number,
                user_id: position.user.to_owned(),
                value,
                protocol_id: PROTOCOL_ID.to_owned(),
            };
            app_state.database.health_ratio_level.insert(&item).await?;
            count += 1;
        }
    }

    info!("Stored {} Vesu health ratios", count);

    Ok(count)
}
