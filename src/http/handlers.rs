//! HTTP handlers: the embedded page, session state, and the SSE chat stream.
//!
//! SSE event types for `POST /api/chat`:
//! - `render`: partial render, `{ "text": "...▌" }` (cursor-marked)
//! - `done`: final answer without the marker, `{ "text": "..." }`
//! - `error`: exchange failed, nothing persisted, `{ "message": "..." }`

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::error;

use crate::http::state::AppState;
use crate::persona::Persona;

/// GET / - the single-page UI.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// GET /health - liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/personas - selector data for the page.
pub async fn personas() -> Json<Value> {
    let personas: Vec<Value> = Persona::ALL
        .iter()
        .map(|p| {
            json!({
                "id": p.id(),
                "label": p.label(),
                "tagline": p.tagline(),
                "placeholder": p.placeholder(),
            })
        })
        .collect();

    Json(json!({ "personas": personas }))
}

/// GET /api/session - transcript for re-rendering history.
pub async fn session_state(State(state): State<AppState>) -> Json<Value> {
    let session = state.session.lock().await;

    Json(json!({
        "transcript": session.transcript.entries(),
        "total_tokens": session.memory.total_tokens(),
    }))
}

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub persona: Persona,
    pub question: String,
}

/// POST /api/chat - run one exchange, streaming renders as SSE.
///
/// An empty question ends the stream without events or state changes.
pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        let mut session = state.session.clone().lock_owned().await;

        let mut sink = |text: &str, done: bool| {
            let name = if done { "done" } else { "render" };
            let event = Event::default().event(name).data(json!({ "text": text }).to_string());
            let _ = tx.send(event);
        };

        if let Err(e) = state
            .controller
            .ask(&mut session, body.persona, &body.question, &mut sink)
            .await
        {
            error!(error = %e, "Exchange failed");
            let event = Event::default()
                .event("error")
                .data(json!({ "message": e.to_string() }).to_string());
            let _ = tx.send(event);
        }
    });

    Sse::new(UnboundedReceiverStream::new(rx).map(Ok)).keep_alive(KeepAlive::default())
}
