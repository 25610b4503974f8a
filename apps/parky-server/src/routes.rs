//! Ticket API routes and handlers.
//!
//! - `POST /tickets` - issue a ticket
//! - `GET /tickets/{id}` - show what a ticket owes
//! - `POST /payments/{ticketid}` - pay a ticket
//! - `GET /health` - store liveness

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use parky_core::{parse_ticket_id, Ticket, TicketId};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tickets", post(create_ticket))
        .route("/tickets/{id}", get(show_ticket_total))
        .route("/payments/{ticketid}", post(pay_ticket))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response for a newly issued ticket.
#[derive(Debug, Serialize, Deserialize)]
pub struct TicketIssued {
    pub ticket_number: TicketId,
}

/// Body of a payment request.
///
/// The card token is passed through to the store as-is. Decoded from the raw
/// body whatever the `Content-Type` header says.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub credit_card: String,
}

impl PaymentRequest {
    fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.is_empty() {
            return Err(ApiError::bad_request("Missing payment request body"));
        }

        serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("Invalid payment request: {e}")))
    }
}

/// POST /tickets - issue a new ticket
async fn create_ticket(State(state): State<AppState>) -> ApiResult<Json<TicketIssued>> {
    let ticket = state.store.create().await?;

    Ok(Json(TicketIssued {
        ticket_number: ticket.id,
    }))
}

/// GET /tickets/{id} - show how much the ticket owes, e.g. `"$6.75"`
async fn show_ticket_total(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<String>> {
    let id = parse_ticket_id(&raw_id)?;
    let ticket = state.store.find(id).await?;

    Ok(Json(ticket.show_owing()))
}

/// POST /payments/{ticketid} - settle a ticket with a card token
async fn pay_ticket(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Ticket>> {
    let id = parse_ticket_id(&raw_id)?;
    let payment = PaymentRequest::from_body(&body)?;

    debug!(id, "Payment requested");
    let ticket = state.store.pay(id, &payment.credit_card).await?;

    Ok(Json(ticket))
}

/// GET /health
async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    if state.store.health_check().await {
        (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "unavailable" })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response};
    use chrono::Duration;
    use http_body_util::BodyExt;
    use parky_db::{StoreConfig, TicketStore};
    use tower::ServiceExt;

    async fn app_with(config: StoreConfig) -> Router {
        let store = TicketStore::open(config).await.unwrap();
        router(AppState::new(store))
    }

    async fn app() -> Router {
        app_with(StoreConfig::in_memory()).await
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn issue() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/tickets")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_ticket_number() {
        let app = app().await;

        let first = app.clone().oneshot(issue()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(body_json(first).await["ticket_number"], 1);

        let second = app.oneshot(issue()).await.unwrap();
        assert_eq!(body_json(second).await["ticket_number"], 2);
    }

    #[tokio::test]
    async fn test_show_owing_for_new_ticket() {
        let app = app().await;
        app.clone().oneshot(issue()).await.unwrap();

        let response = app.oneshot(get_req("/tickets/1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, "$3.00");
    }

    #[tokio::test]
    async fn test_show_owing_with_backdated_tickets() {
        let app = app_with(StoreConfig::in_memory().time_in_offset(Duration::minutes(350))).await;
        app.clone().oneshot(issue()).await.unwrap();

        let response = app.oneshot(get_req("/tickets/1")).await.unwrap();

        assert_eq!(body_json(response).await, "$6.75");
    }

    #[tokio::test]
    async fn test_unknown_ticket_is_404() {
        let response = app().await.oneshot(get_req("/tickets/42")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Cannot find a ticket with ID: 42"
        );
    }

    #[tokio::test]
    async fn test_bad_ticket_id_is_400() {
        let app = app().await;

        let response = app.clone().oneshot(get_req("/tickets/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get_req("/tickets/0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pay_returns_full_ticket() {
        let app = app().await;
        app.clone().oneshot(issue()).await.unwrap();

        let response = app
            .oneshot(post_json("/payments/1", r#"{"credit_card":"4111111111111111"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let ticket = body_json(response).await;
        assert_eq!(ticket["id"], 1);
        assert_eq!(ticket["paid"], 300);
        assert_eq!(ticket["card"], "4111111111111111");
        assert!(ticket["time_in"].is_string());
        assert!(ticket["time_paid"].is_string());
    }

    #[tokio::test]
    async fn test_pay_twice_is_409() {
        let app = app().await;
        app.clone().oneshot(issue()).await.unwrap();

        let body = r#"{"credit_card":"tok"}"#;
        let first = app.clone().oneshot(post_json("/payments/1", body)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.oneshot(post_json("/payments/1", body)).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_pay_unknown_ticket_is_404() {
        let response = app()
            .await
            .oneshot(post_json("/payments/9", r#"{"credit_card":"tok"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pay_with_malformed_body_is_400() {
        let app = app().await;
        app.clone().oneshot(issue()).await.unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/payments/1", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = Request::builder()
            .method("POST")
            .uri("/payments/1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // rejected requests never reached the store
        let response = app
            .oneshot(post_json("/payments/1", r#"{"credit_card":"tok"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pay_ignores_content_type() {
        let app = app().await;
        app.clone().oneshot(issue()).await.unwrap();

        let untyped = Request::builder()
            .method("POST")
            .uri("/payments/1")
            .body(Body::from(r#"{"credit_card":"4111"}"#))
            .unwrap();
        let response = app.oneshot(untyped).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["card"], "4111");
    }

    #[test]
    fn test_payment_request_decoding() {
        let payment = PaymentRequest::from_body(br#"{"credit_card":"tok"}"#).unwrap();
        assert_eq!(payment.credit_card, "tok");

        let payment = PaymentRequest::from_body(b"{}").unwrap();
        assert_eq!(payment.credit_card, "");

        let err = PaymentRequest::from_body(b"").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = PaymentRequest::from_body(b"[1,2]").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().await.oneshot(get_req("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}
