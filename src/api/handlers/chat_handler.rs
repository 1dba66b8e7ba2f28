//! Chat handler - dental assistant proxy.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::ChatMessage;

/// Chat request: the conversation so far.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Chat reply from the assistant.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
}

/// Create chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

/// Ask the dental assistant
#[utoipa::path(
    post,
    path = "/chat",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 400, description = "Empty conversation"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let reply = state.chat_service.chat(payload.messages).await?;
    Ok(Json(ChatReply { reply }))
}
