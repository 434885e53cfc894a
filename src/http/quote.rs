//! Handlers for the public endpoints.

use axum::{
    extract::{RawQuery, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};

use crate::http::server::AppState;
use crate::quoting::{GatewayResponse, Genre};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// First `genre` value of a raw query string.
fn genre_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "genre")
        .map(|(_, value)| value.into_owned())
}

/// `GET /get_quote?genre=...`
///
/// Always answers 200; upstream failures are reported in the body.
pub async fn get_quote(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<GatewayResponse> {
    let genre = Genre::normalize(genre_param(query.as_deref()).as_deref());
    Json(state.gateway.get_quote(&genre).await)
}

/// `GET /`
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
