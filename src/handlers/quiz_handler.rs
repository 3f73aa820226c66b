use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ConfigureQuizRequest, SubmitQuizRequest},
        response::{
            ConfigureQuizResponse, HistorySummary, SubmitQuizResponse, UserProgressResponse,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[get("/api/subjects")]
pub async fn list_subjects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let subjects = state.subjects.list_subjects().await?;
    Ok(HttpResponse::Ok().json(subjects))
}

/// Configures a new quiz for a user: selects questions, stamps the start
/// time, and stores the quiz under a fresh token. Overwrites any quiz the
/// user already had in flight.
#[post("/api/quiz/configure")]
pub async fn configure_quiz(
    state: web::Data<AppState>,
    request: web::Json<ConfigureQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let code = request
        .subject
        .unwrap_or_else(|| state.config.default_subject_code.clone());
    let context = state.subjects.context_for(&code).await?;

    let quiz = state
        .sessions
        .initialize_quiz(
            &context,
            &request.username,
            request.num_questions,
            request.shuffle_options,
            request.time_limit,
        )
        .await?;

    let quiz_token = Uuid::new_v4().to_string();
    state
        .sessions
        .save_quiz_state(&request.username, &quiz_token, quiz.clone())
        .await?;

    Ok(HttpResponse::Created().json(ConfigureQuizResponse { quiz_token, quiz }))
}

#[get("/api/quiz/{username}")]
pub async fn get_active_quiz(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<TokenQuery>,
) -> Result<HttpResponse, AppError> {
    let username = username.into_inner();
    match state.sessions.get_quiz_state(&username, &query.token).await? {
        Some(quiz) => Ok(HttpResponse::Ok().json(quiz)),
        None => Err(AppError::NotFound(format!(
            "No active quiz for {}",
            username
        ))),
    }
}

/// Grades a submission and stores the result under a fresh result token.
#[post("/api/quiz/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .sessions
        .get_quiz_state(&request.username, &request.quiz_token)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No active quiz for {}", request.username)))?;

    let results = state
        .grading
        .grade_quiz(&request.username, &quiz, &request.answers)
        .await?;

    let result_token = Uuid::new_v4().to_string();
    state
        .results
        .save_results(&request.username, &result_token, results.clone())
        .await?;

    // grading already deleted the active quiz; this is a no-op safety net
    state.sessions.clear_quiz_state(&request.username).await?;

    Ok(HttpResponse::Ok().json(SubmitQuizResponse {
        result_token,
        score: results.score,
        correct_count: results.correct_count,
        total_questions: results.total_questions,
    }))
}

/// Fetches a pending result and clears it: the happy path is read-once.
/// Expired or unknown tokens both present as not-found.
#[get("/api/results/{username}/{token}")]
pub async fn get_results(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (username, token) = path.into_inner();

    let results = state
        .results
        .get_results(&username, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("No results for that token".to_string()))?;

    state.results.clear_results(&username, &token).await?;

    Ok(HttpResponse::Ok().json(results))
}

/// Progress overview: bag and penalty counts plus past test summaries.
#[get("/api/users/{username}/progress")]
pub async fn user_progress(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let username = username.into_inner();

    let progress = state.sessions.get_or_create_progress(&username).await?;
    let active_quiz = state.sessions.active_quiz(&username).await?;
    let history = state.grading.user_history(&username).await?;

    Ok(HttpResponse::Ok().json(UserProgressResponse {
        username: progress.username,
        question_bag_count: progress.question_bag.len(),
        penalty_count: progress.penalty_questions.len(),
        penalty_questions: progress.penalty_questions,
        has_active_quiz: active_quiz.is_some(),
        test_history: history.iter().map(HistorySummary::from).collect(),
    }))
}
