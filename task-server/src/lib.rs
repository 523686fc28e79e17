//! Project service for the `TaskManager/v1` API.
//!
//! Every route runs its handler through `ErrorDispatch`, choosing a
//! `HandlingMode` per endpoint. Failures the mode propagates end up in
//! `AppError`, the global handler.

pub mod config;
pub mod error;
pub mod projects;

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use rest_core::{actions, Environment, ErrorDispatch, ErrorPayload, HandlingMode, Outcome};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::error::AppError;
use crate::projects::{CreateProject, Project, ProjectFilter, Store, UpdateProject};

pub const BASE_PATH: &str = "/TaskManager/v1/Project";

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub dispatch: ErrorDispatch,
}

/// Answer of the archiving pre-check: the failure is reported, not raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveCheck {
    pub archivable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

pub fn app(environment: Environment) -> Router {
    let state = AppState {
        store: projects::store(),
        dispatch: ErrorDispatch::new(environment),
    };
    Router::new()
        .route(BASE_PATH, get(list_projects).post(create_project))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(&format!("{BASE_PATH}/{}/{{id}}", actions::ARCHIVE), patch(archive_project))
        .route(&format!("{BASE_PATH}/{}/{{id}}", actions::RESTORE), patch(restore_project))
        .route(
            &format!("{BASE_PATH}/{}/{{id}}", actions::CHECK_THE_ITEM_FOR_ARCHIVING),
            get(check_archiving),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, environment: Environment) -> Result<(), std::io::Error> {
    axum::serve(listener, app(environment)).await
}

async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Outcome<Vec<Project>>, AppError> {
    let outcome = state
        .dispatch
        .view(HandlingMode::HandleAllGlobally, || projects::list(&state.store, &filter))
        .await?;
    Ok(outcome)
}

async fn get_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Outcome<Project>, AppError> {
    let outcome = state
        .dispatch
        .view(HandlingMode::HandleAllGlobally, || projects::get(&state.store, id))
        .await?;
    Ok(outcome)
}

async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> Result<Outcome<Project>, AppError> {
    let outcome = state
        .dispatch
        .view(HandlingMode::DeferDomainErrors, || projects::create(&state.store, input))
        .await?;
    Ok(outcome)
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProject>,
) -> Result<Outcome<Project>, AppError> {
    let outcome = state
        .dispatch
        .view(HandlingMode::DeferDomainErrors, || projects::update(&state.store, id, input))
        .await?;
    Ok(outcome)
}

async fn archive_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Outcome<()>, AppError> {
    let outcome = state
        .dispatch
        .view_unit(HandlingMode::DeferAll, || projects::archive(&state.store, id))
        .await?;
    Ok(outcome)
}

async fn restore_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Outcome<()>, AppError> {
    let outcome = state
        .dispatch
        .view_unit(HandlingMode::DeferAll, || projects::restore(&state.store, id))
        .await?;
    Ok(outcome)
}

async fn check_archiving(State(state): State<AppState>, Path(id): Path<Uuid>) -> Json<ArchiveCheck> {
    let error = state
        .dispatch
        .catch_domain_errors(|| projects::check_archivable(&state.store, id))
        .await;
    Json(ArchiveCheck {
        archivable: error.is_none(),
        error,
    })
}

async fn delete_project(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Outcome<()>, AppError> {
    let outcome = state
        .dispatch
        .view_unit(HandlingMode::HandleAllGlobally, || projects::delete(&state.store, id))
        .await?;
    Ok(outcome)
}
