//! Service endpoints: welcome message, liveness and version.

use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse<'a> {
    pub version: Option<&'a str>,
}

#[get("/")]
pub async fn root() -> Result<impl Responder, Error> {
    Ok(web::Json(MessageResponse {
        message: String::from("Welcome to the DeRisk API!"),
    }))
}

#[get("/health")]
pub async fn health() -> Result<impl Responder, Error> {
    Ok(web::Json(HealthResponse {
        status: String::from("OK"),
    }))
}

#[get("/version")]
pub async fn version() -> Result<impl Responder, Error> {
    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

    Ok(web::Json(VersionResponse { version: VERSION }))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use super::*;

    #[actix_web::test]
    async fn test_root_and_health() {
        let app = test::init_service(App::new().service(root).service(health))
            .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: MessageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Welcome to the DeRisk API!");

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "OK");
    }

    #[actix_web::test]
    async fn test_version() {
        let app = test::init_service(App::new().service(version)).await;
        let req = test::TestRequest::get().uri("/version").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
