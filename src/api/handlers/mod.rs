use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::error::ApiError;
use super::SharedStore;
use crate::models::*;
use crate::query::{self, FieldFilters, QuickFilter, SortKey, Summary};
use crate::report::{self, Dimension, StatusCounts};
use crate::workflow::{self, Action, Command};

// ============================================================
// Query parameters
// ============================================================

/// List query. Every parameter is optional; an empty value means "unset".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDirectivesQuery {
    pub quick: Option<String>,
    pub sort: Option<String>,
    pub meeting: Option<String>,
    pub large_category: Option<String>,
    pub small_category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
}

fn parse_param<T>(
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>, ApiError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown {}: {}", what, raw))),
    }
}

fn parse_dimension(raw: &str) -> Result<Dimension, ApiError> {
    Dimension::from_str(raw).ok_or_else(|| ApiError::NotFound(format!("no report by {}", raw)))
}

fn require(actor: &Actor, capability: Capability) -> Result<(), ApiError> {
    if actor.role.can(capability) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "{} may not {}",
            actor.role, capability
        )))
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Directives
// ============================================================

pub async fn list_directives(
    State(store): State<SharedStore>,
    Query(params): Query<ListDirectivesQuery>,
) -> Result<Json<Vec<Directive>>, ApiError> {
    let quick = parse_param(params.quick, QuickFilter::from_str, "quick filter")?.unwrap_or_default();
    let sort = parse_param(params.sort, SortKey::from_str, "sort key")?.unwrap_or_default();
    let fields = FieldFilters {
        meeting: params.meeting,
        large_category: params.large_category,
        small_category: params.small_category,
        priority: parse_param(params.priority, Priority::from_str, "priority")?,
        status: parse_param(params.status, DirectiveStatus::from_str, "status")?,
        assignee: params.assignee,
    };

    let store = store.lock().await;
    let filtered = query::filter(store.directives(), quick, &fields, store.today());
    Ok(Json(query::sort(&filtered, sort)))
}

pub async fn get_directive(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
) -> Result<Json<Directive>, ApiError> {
    let store = store.lock().await;
    store
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("directive {} not found", id)))
}

pub async fn create_directive(
    State(store): State<SharedStore>,
    actor: Actor,
    Json(input): Json<CreateDirectiveInput>,
) -> Result<(StatusCode, Json<Directive>), ApiError> {
    let mut store = store.lock().await;
    let directive = store.add(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(directive)))
}

pub async fn edit_directive(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
    actor: Actor,
    Json(input): Json<EditDirectiveInput>,
) -> Result<Json<Directive>, ApiError> {
    let mut store = store.lock().await;
    Ok(Json(store.edit(id, &actor, input).await?))
}

pub async fn list_actions(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
    actor: Actor,
) -> Result<Json<Vec<Action>>, ApiError> {
    let store = store.lock().await;
    let directive = store
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("directive {} not found", id)))?;
    Ok(Json(workflow::allowed_actions(directive.status, actor.role)))
}

pub async fn apply_action(
    State(store): State<SharedStore>,
    Path(id): Path<u64>,
    actor: Actor,
    Json(command): Json<Command>,
) -> Result<Json<Directive>, ApiError> {
    let mut store = store.lock().await;
    Ok(Json(store.apply(id, &actor, command).await?))
}

// ============================================================
// Dashboard
// ============================================================

pub async fn get_stats(State(store): State<SharedStore>) -> Json<Summary> {
    let store = store.lock().await;
    Json(query::summary(store.directives(), store.today()))
}

pub async fn group_report(
    State(store): State<SharedStore>,
    Path(dimension): Path<String>,
    actor: Actor,
) -> Result<Json<Vec<StatusCounts>>, ApiError> {
    require(&actor, Capability::ViewReports)?;
    let dimension = parse_dimension(&dimension)?;

    let store = store.lock().await;
    Ok(Json(report::group_counts(store.directives(), dimension)))
}

pub async fn assignee_report(
    State(store): State<SharedStore>,
    Path((dimension, group)): Path<(String, String)>,
    actor: Actor,
) -> Result<Json<Vec<StatusCounts>>, ApiError> {
    require(&actor, Capability::ViewReports)?;
    let dimension = parse_dimension(&dimension)?;

    let store = store.lock().await;
    Ok(Json(report::assignee_breakdown(
        store.directives(),
        dimension,
        &group,
    )))
}
