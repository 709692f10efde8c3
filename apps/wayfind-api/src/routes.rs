use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Redirect, Response},
	routing::get,
};
use serde::Serialize;

use crate::state::AppState;
use wayfind_service::{
	DisambiguatePage, DisambiguateRequest, Error, GoParams, ListingPage, ListingRequest, Target,
};

pub fn router(state: AppState) -> Router {
	let routes = state.service.cfg.routes.clone();

	Router::new()
		.route("/health", get(health))
		.route(&routes.go, get(go))
		.route(&routes.search, get(listing))
		.route(&routes.disambiguate, get(disambiguate))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Redirect entry point. Always answers with a navigation, never an error page.
async fn go(State(state): State<AppState>, Query(params): Query<GoParams>) -> Redirect {
	let nav = state.service.orchestrate(Target::from(params)).await;

	tracing::debug!(kind = ?nav.kind, url = %nav.url, "Navigating.");

	Redirect::to(&nav.url)
}

async fn listing(
	State(state): State<AppState>,
	Query(params): Query<ListingRequest>,
) -> Result<Json<ListingPage>, ApiError> {
	let page = state.service.listing(params).await?;

	Ok(Json(page))
}

async fn disambiguate(
	State(state): State<AppState>,
	Query(params): Query<DisambiguateRequest>,
) -> Result<Json<DisambiguatePage>, ApiError> {
	let page = state.service.disambiguate(params).await?;

	Ok(Json(page))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				message,
				Some(vec!["$.q".to_string()]),
			),
			Error::Backend { message } => {
				tracing::error!(error = %message, "Backend call failed.");

				ApiError::new(StatusCode::BAD_GATEWAY, "BACKEND_ERROR", "Search backend failed.", None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
