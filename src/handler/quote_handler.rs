use axum::extract::rejection::JsonRejection;
use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dto::quote_dto::{
    CreateQuoteRequest, MessageResponse, QuoteListResponse, QuoteResponse, SubmitQuoteResponse,
    UpdateQuoteStatusRequest,
};
use crate::middlewares::client_context::ClientContext;
use crate::model::quote::QuoteStatus;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl, DEFAULT_LIST_LIMIT};
use crate::util::error::HandlerError;

// Handler: Submit Quote (public, throttled)
pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    client: ClientContext,
    payload: Result<Json<CreateQuoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[create_quote_handler] Handler called");
    let Json(request) = payload.map_err(|e| {
        warn!("[create_quote_handler] Rejected body: {}", e.body_text());
        HandlerError::from(e)
    })?;

    let submitted = service
        .submit_quote(request, client)
        .await
        .map_err(|e| HandlerError::from_service(e, "Error saving quote request"))?;

    Ok(Json(SubmitQuoteResponse {
        success: true,
        message: "Quote request submitted successfully".to_string(),
        quote_number: submitted.quote_number,
        id: submitted.id,
    }))
}

// Handler: List Quotes
pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let limit = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);

    let status = match params.get("status").filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<QuoteStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                // No row can carry an unknown status.
                warn!("[list_quotes_handler] Unknown status filter: {}", raw);
                return Ok(Json(QuoteListResponse {
                    success: true,
                    quotes: Vec::new(),
                    count: 0,
                }));
            }
        },
    };

    let quotes = service
        .list_quotes(status, limit, offset)
        .await
        .map_err(|e| HandlerError::from_service(e, "Error retrieving quotes"))?;
    Ok(Json(QuoteListResponse {
        success: true,
        count: quotes.len(),
        quotes,
    }))
}

// Handler: Get Quote by id or quote number
pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service
        .get_quote(&identifier)
        .await
        .map_err(|e| HandlerError::from_service(e, "Error retrieving quote"))?;
    Ok(Json(QuoteResponse {
        success: true,
        quote,
    }))
}

// Handler: Update Quote Status
pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQuoteStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("[update_quote_status_handler] Rejected body: {}", e.body_text());
        HandlerError::from(e)
    })?;
    service
        .update_quote_status(&id, &payload.status)
        .await
        .map_err(|e| HandlerError::from_service(e, "Error updating quote status"))?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Quote status updated successfully".to_string(),
    }))
}
