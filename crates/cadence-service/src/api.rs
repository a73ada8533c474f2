//! HTTP API over the authorization engine.
//!
//! Callers are expected to serialize requests touching the same intent id;
//! the engine itself takes no locks.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::Json,
	routing::{get, post},
	Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::allowlist::Allowlist;
use cadence_engine::{AuthorizationEngine, EngineError};
use cadence_policy::FailureKind;
use cadence_types::ResolvedOrder;

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<AuthorizationEngine>,
	pub allowlist: Arc<dyn Allowlist>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health_check))
		.route("/orders/authorize", post(authorize_order))
		// Static segment wins over the `{id}` capture below.
		.route("/intents/id", get(compute_intent_id))
		.route("/intents/cancel", post(cancel_intents))
		.route("/intents/{id}", get(get_execution_state))
		.route("/intents/{id}/stats", get(get_statistics))
		.route("/intents/{id}/nonce", get(get_next_nonce))
		.route("/intents/{id}/active", get(get_is_active))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

pub async fn start_http_server(state: AppState, port: u16) -> anyhow::Result<()> {
	let app = router(state);
	let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

	info!("API server listening on port {}", port);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	kind: Option<FailureKind>,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn engine_error(err: EngineError) -> ApiError {
	let (status, kind, details) = match &err {
		EngineError::Authorization(inner) => {
			let kind = inner.kind();
			let status = match kind {
				FailureKind::Authorization => StatusCode::UNAUTHORIZED,
				FailureKind::Structural | FailureKind::Economic => {
					StatusCode::UNPROCESSABLE_ENTITY
				}
				FailureKind::State => StatusCode::CONFLICT,
			};
			(status, Some(kind), Some(format!("{:?}", inner)))
		}
		EngineError::IntentAlreadyCancelled => (StatusCode::CONFLICT, Some(FailureKind::State), None),
		EngineError::State(_) | EngineError::Config(_) => {
			(StatusCode::INTERNAL_SERVER_ERROR, None, None)
		}
	};

	(
		status,
		Json(ErrorBody {
			error: err.to_string(),
			kind,
			details,
		}),
	)
}

fn bad_request(message: impl Into<String>) -> ApiError {
	(
		StatusCode::BAD_REQUEST,
		Json(ErrorBody {
			error: message.into(),
			kind: None,
			details: None,
		}),
	)
}

fn parse_intent_id(id: &str) -> Result<B256, ApiError> {
	id.parse::<B256>()
		.map_err(|_| bad_request("intent id must be a 0x-prefixed 32-byte hex string"))
}

async fn health_check() -> Json<serde_json::Value> {
	Json(serde_json::json!({
		"status": "ok",
		"timestamp": chrono::Utc::now().timestamp(),
	}))
}

#[derive(Debug, Deserialize)]
struct AuthorizeRequest {
	filler: Address,
	order: ResolvedOrder,
}

async fn authorize_order(
	State(state): State<AppState>,
	Json(request): Json<AuthorizeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	if !state.allowlist.is_allowed(request.filler) {
		return Err((
			StatusCode::FORBIDDEN,
			Json(ErrorBody {
				error: format!("Filler {} is not admitted", request.filler),
				kind: None,
				details: None,
			}),
		));
	}

	let instruction = state
		.engine
		.authorize(request.filler, &request.order)
		.await
		.map_err(engine_error)?;

	Ok(Json(serde_json::json!({ "settlement": instruction })))
}

async fn get_execution_state(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let intent_id = parse_intent_id(&id)?;
	let execution = state
		.engine
		.execution_state(&intent_id)
		.await
		.map_err(engine_error)?;

	Ok(Json(serde_json::json!({
		"intent_id": intent_id,
		"state": execution,
	})))
}

async fn get_statistics(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let intent_id = parse_intent_id(&id)?;
	let stats = state
		.engine
		.statistics(&intent_id)
		.await
		.map_err(engine_error)?;

	Ok(Json(serde_json::json!({
		"intent_id": intent_id,
		"statistics": stats,
	})))
}

async fn get_next_nonce(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let intent_id = parse_intent_id(&id)?;
	let nonce = state
		.engine
		.next_order_nonce(&intent_id)
		.await
		.map_err(engine_error)?;

	Ok(Json(serde_json::json!({
		"intent_id": intent_id,
		"next_order_nonce": nonce,
	})))
}

#[derive(Debug, Deserialize)]
struct ActiveQuery {
	#[serde(default)]
	max_period: u64,
	#[serde(default)]
	deadline: u64,
}

async fn get_is_active(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Query(query): Query<ActiveQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let intent_id = parse_intent_id(&id)?;
	let active = state
		.engine
		.is_active(&intent_id, query.max_period, query.deadline)
		.await
		.map_err(engine_error)?;

	Ok(Json(serde_json::json!({
		"intent_id": intent_id,
		"active": active,
	})))
}

#[derive(Debug, Deserialize)]
struct IdQuery {
	swapper: Address,
	nonce: U256,
}

async fn compute_intent_id(
	State(state): State<AppState>,
	Query(query): Query<IdQuery>,
) -> Json<serde_json::Value> {
	let intent_id = state.engine.compute_intent_id(query.swapper, query.nonce);
	Json(serde_json::json!({ "intent_id": intent_id }))
}

/// Cancels one intent (`nonce`) or several (`nonces`, all-or-nothing).
///
/// The signature covers the cancellation itself; nobody but the swapper can
/// latch their intents through this endpoint.
#[derive(Debug, Deserialize)]
struct CancelRequest {
	swapper: Address,
	nonce: Option<U256>,
	nonces: Option<Vec<U256>>,
	signature: Bytes,
}

async fn cancel_intents(
	State(state): State<AppState>,
	Json(request): Json<CancelRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
	let nonces = match (request.nonce, request.nonces) {
		(Some(nonce), None) => vec![nonce],
		(None, Some(nonces)) if !nonces.is_empty() => nonces,
		_ => {
			return Err(bad_request(
				"Provide exactly one of `nonce` or a non-empty `nonces`",
			))
		}
	};

	state
		.engine
		.verify_cancellation(request.swapper, &nonces, &request.signature)
		.await
		.map_err(engine_error)?;

	if nonces.len() == 1 {
		state
			.engine
			.cancel(request.swapper, nonces[0])
			.await
			.map_err(engine_error)?;
	} else {
		state
			.engine
			.cancel_batch(request.swapper, &nonces)
			.await
			.map_err(engine_error)?;
	}

	Ok(Json(serde_json::json!({ "cancelled": nonces.len() })))
}
