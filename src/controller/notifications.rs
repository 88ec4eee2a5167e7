//! Notification subscriptions and the alert trigger.

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    handler::notifications::enqueue_notifications,
    helpers::get_client_ip,
    types::{CreateSubscription, SubscriptionCreated},
};

fn ensure_available(taken: &[&str]) -> Result<(), Error> {
    match taken.first() {
        Some(field) => Err(Error::DuplicateField(field.to_string())),
        None => Ok(()),
    }
}

/// Validates, checks uniqueness and stores a subscription.
pub async fn create_subscription(
    state: &AppState<State>,
    data: &CreateSubscription,
    client_ip: Option<String>,
) -> Result<SubscriptionCreated, Error> {
    if let Some(ip) = &client_ip {
        state.subscription_limiter.check(ip).await?;
    }

    let data = data.validate(client_ip)?;

    let taken = state
        .database
        .notification_data
        .taken_fields(&data.wallet_id, &data.ip_address)
        .await?;
    ensure_available(&taken)?;

    let id = state.database.notification_data.insert(&data).await?;

    Ok(SubscriptionCreated {
        message: String::from("Subscription created successfully"),
        status: 201,
        id: id.to_string(),
        telegram_link: state.config.get_telegram_link(&id),
    })
}

#[post("/create-notifications-subscription")]
pub async fn create(
    state: web::Data<AppState<State>>,
    req: HttpRequest,
    data: web::Json<CreateSubscription>,
) -> Result<HttpResponse, Error> {
    let created = create_subscription(&state, &data, get_client_ip(&req)).await?;
    Ok(HttpResponse::Created().json(created))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendNotificationsResponse {
    pub enqueued: usize,
}

#[post("/api/send-notifications")]
pub async fn send_notifications(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    let enqueued = enqueue_notifications(state.get_ref().clone()).await?;
    Ok(HttpResponse::Ok().json(SendNotificationsResponse { enqueued }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::configuration::test_state;

    #[::core::prelude::v1::test]
    fn test_wallet_reported_before_ip() {
        assert!(ensure_available(&[]).is_ok());

        let error = ensure_available(&["wallet id", "ip address"]).unwrap_err();
        assert_eq!(error.to_string(), "Current wallet id is already taken");

        let error = ensure_available(&["ip address"]).unwrap_err();
        assert_eq!(error.to_string(), "Current ip address is already taken");
    }

    #[::core::prelude::v1::test]
    fn test_send_notifications_body() {
        let body = serde_json::to_value(SendNotificationsResponse { enqueued: 3 }).unwrap();
        assert_eq!(body, serde_json::json!({ "enqueued": 3 }));
    }

    #[actix_web::test]
    async fn test_create_is_rate_limited_per_ip() {
        let state = test_state().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(create),
        )
        .await;

        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/create-notifications-subscription")
                .insert_header(("x-forwarded-for", "203.0.113.7"))
                .set_json(serde_json::json!({ "wallet_id": "0x1" }))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }

        let req = test::TestRequest::post()
            .uri("/create-notifications-subscription")
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .set_json(serde_json::json!({ "wallet_id": "0x1" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Rate limit exceeded");
    }
}
