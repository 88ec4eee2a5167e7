//! HTML subscription form served at `/liquidation-watcher`.

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use tracing::info;

use crate::{
    configuration::{AppState, State},
    controller::notifications::create_subscription,
    error::Error,
    helpers::get_client_ip,
    types::{CreateSubscription, ProtocolId},
};

const TEMPLATE: &str = include_str!("../../templates/liquidation_watcher.html");

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render(message: Option<&str>) -> String {
    let protocols = ProtocolId::ALL
        .iter()
        .map(|protocol| {
            format!(
                "            <option value=\"{0}\">{0}</option>",
                protocol.as_str()
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    let message = message
        .map(|item| format!("    <p class=\"message\">{}</p>", item))
        .unwrap_or_default();

    TEMPLATE
        .replace("{{protocols}}", &protocols)
        .replace("{{message}}", &message)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/liquidation-watcher")]
pub async fn index(req: HttpRequest) -> HttpResponse {
    let ip = get_client_ip(&req).unwrap_or_default();
    info!("Liquidation watcher opened from {}", ip);

    html(render(None))
}

#[post("/liquidation-watcher")]
pub async fn submit(
    state: web::Data<AppState<State>>,
    req: HttpRequest,
    data: web::Form<CreateSubscription>,
) -> Result<HttpResponse, Error> {
    let result =
        create_subscription(&state, &data.into_inner(), get_client_ip(&req))
            .await;

    let created = match result {
        Ok(created) => created,
        Err(
            e @ (Error::Validation(_)
            | Error::MissingParams(_)
            | Error::DuplicateField(_)
            | Error::UnknownProtocol { .. }
            | Error::RateLimitExceeded),
        ) => {
            info!("Subscription form rejected: {}", e);
            return Ok(html(render(Some(&escape_html(&e.to_string())))));
        },
        Err(e) => return Err(e),
    };

    let link = escape_html(&created.telegram_link);
    let message = format!(
        "{} Activate alerts in Telegram: <a href=\"{link}\">{link}</a>",
        escape_html(&created.message),
    );

    Ok(html(render(Some(&message))))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};

    use super::*;
    use crate::configuration::test_state;

    #[actix_web::test]
    async fn test_invalid_form_renders_message() {
        let state = test_state().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(submit),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/liquidation-watcher")
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .set_form([
                ("wallet_id", "0x1"),
                ("health_ratio_level", "11"),
                ("protocol_id", "zkLend"),
            ])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Your health ratio level must be between 0 and 10"));
        assert!(body.contains("<option value=\"Vesu\">Vesu</option>"));
    }

    #[::core::prelude::v1::test]
    fn test_rendered_message_is_escaped() {
        let message = escape_html("Protocol <script>alert(1)</script> is not supported");
        let body = render(Some(&message));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!body.contains("<script>alert(1)"));
    }

    #[actix_web::test]
    async fn test_liquidation_watcher_get() {
        let app = test::init_service(App::new().service(index)).await;
        let req = test::TestRequest::get()
            .uri("/liquidation-watcher")
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("<option value=\"zkLend\">zkLend</option>"));
        assert!(!body.contains("{{"));
    }

    #[::core::prelude::v1::test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }
}
