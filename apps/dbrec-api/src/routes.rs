use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dbrec_domain::{AnswerSet, Question};
use dbrec_service::{Error, RecommendResponse};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
	pub answers: AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse<'a> {
	pub questions: &'a [Question],
	pub description: &'static str,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(info))
		.route("/health", get(health))
		.route("/questions", get(questions))
		.route("/recommend", post(recommend))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn info(State(state): State<AppState>) -> Json<Value> {
	let cfg = &state.service.cfg;
	let llm_model = if state.service.uses_llm_explanations() {
		cfg.providers.llm_explainer.model.as_str()
	} else {
		"disabled"
	};

	Json(serde_json::json!({
		"message": "Database Recommendation API",
		"version": dbrec_cli::VERSION,
		"features": {
			"vector_search": cfg.providers.embedding.model,
			"profiles": state.service.index().len(),
			"llm_explanations": state.service.uses_llm_explanations(),
			"llm_model": llm_model,
		},
		"endpoints": {
			"POST /recommend": "Get database recommendations based on your requirements",
			"GET /questions": "Get the list of questions and possible answers",
		},
	}))
}

async fn questions(State(state): State<AppState>) -> Response {
	let body = QuestionsResponse {
		questions: state.service.questions(),
		description: "Answer these questions to get personalized database recommendations",
	};

	Json(body).into_response()
}

async fn recommend(
	State(state): State<AppState>,
	Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let response = state.service.recommend(&payload.answers).await?;

	Ok(Json(response))
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
		let message = err.to_string();

		match err {
			Error::InvalidAnswer { question_id, .. } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"invalid_answer",
				message,
				Some(vec![question_id]),
			),
			Error::EmbeddingUnavailable { .. } => {
				tracing::error!(error = %message, "Embedding service unavailable.");

				ApiError::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"embedding_unavailable",
					message,
					None,
				)
			},
			Error::GenerationUnavailable { .. }
			| Error::EmptyCorpus
			| Error::InvalidCorpus { .. } => {
				tracing::error!(error = %message, "Unexpected recommendation failure.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message, None)
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
