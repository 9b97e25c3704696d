use crate::api::AppState;
use crate::catalog::service::{RecordDraft, RecordUpdate, TierDraft, TierUpdate};
use crate::catalog::RecordFilter;
use crate::error::Result;
use crate::models::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Search the catalog for matching tech messages
pub async fn search_tech_messages(
    State(state): State<AppState>,
    Json(request): Json<SearchTechMessagesRequest>,
) -> Result<Json<SearchOutcome>> {
    let query = SearchQuery {
        search_text: request.search_text,
        occurrence_count: request.occurrence_count,
        match_mode: request.match_mode.unwrap_or_default(),
    };

    let outcome = state.search.search(&query).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTechMessagesRequest {
    pub search_text: String,
    pub occurrence_count: Option<u32>,
    pub match_mode: Option<MatchMode>,
}

/// Create a tech message record
pub async fn create_tech_message(
    State(state): State<AppState>,
    Json(request): Json<CreateTechMessageRequest>,
) -> Result<(StatusCode, Json<TechMessageRecord>)> {
    request.validate()?;

    let record = state
        .catalog
        .create_record(RecordDraft {
            category: request.category,
            severity: request.severity,
            pattern: request.pattern,
            description: request.description,
            action_tiers: request
                .action_tiers
                .into_iter()
                .map(|t| TierDraft {
                    occurrence_min: t.occurrence_min,
                    occurrence_max: t.occurrence_max,
                    action_text: t.action_text,
                    priority: t.priority,
                })
                .collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTechMessageRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub severity: Severity,
    #[validate(length(min = 1))]
    pub pattern: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub action_tiers: Vec<CreateActionTierRequest>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionTierRequest {
    #[validate(range(min = 1))]
    pub occurrence_min: u32,
    pub occurrence_max: Option<u32>,
    #[validate(length(min = 1, max = 500))]
    pub action_text: String,
    #[validate(range(min = 1))]
    pub priority: u32,
}

/// Get a tech message by ID
pub async fn get_tech_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TechMessageRecord>> {
    let record = state.catalog.get_record(&id).await?;
    Ok(Json(record))
}

/// List tech messages
pub async fn list_tech_messages(
    State(state): State<AppState>,
    Query(params): Query<ListTechMessagesQuery>,
) -> Result<Json<ListTechMessagesResponse>> {
    let filter = RecordFilter {
        categories: params.category.map(|c| vec![c]).unwrap_or_default(),
        severities: params.severity.map(|s| vec![s]).unwrap_or_default(),
    };

    let page = params.page.unwrap_or(0);
    let page_size = params.page_size.unwrap_or(20).min(100); // Max 100 per page

    let messages = state.catalog.list_records(&filter, page, page_size).await?;
    let total = state.catalog.count_records(&filter).await?;

    Ok(Json(ListTechMessagesResponse {
        messages,
        total,
        page,
        page_size,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTechMessagesQuery {
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTechMessagesResponse {
    pub messages: Vec<TechMessageRecord>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// List distinct categories for filter UIs
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>> {
    let categories = state.catalog.category_list().await?;
    Ok(Json(CategoryListResponse { categories }))
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

/// Update a tech message
pub async fn update_tech_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTechMessageRequest>,
) -> Result<Json<TechMessageRecord>> {
    request.validate()?;

    let record = state
        .catalog
        .update_record(
            &id,
            RecordUpdate {
                category: request.category,
                severity: request.severity,
                pattern: request.pattern,
                description: request.description,
            },
        )
        .await?;

    Ok(Json(record))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTechMessageRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub severity: Option<Severity>,
    #[validate(length(min = 1))]
    pub pattern: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Delete a tech message
pub async fn delete_tech_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.catalog.delete_record(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an action tier to a record
pub async fn add_action_tier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateActionTierRequest>,
) -> Result<(StatusCode, Json<TechMessageRecord>)> {
    request.validate()?;

    let record = state
        .catalog
        .add_tier(
            &id,
            TierDraft {
                occurrence_min: request.occurrence_min,
                occurrence_max: request.occurrence_max,
                action_text: request.action_text,
                priority: request.priority,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Update one action tier
pub async fn update_action_tier(
    State(state): State<AppState>,
    Path((id, tier_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateActionTierRequest>,
) -> Result<Json<TechMessageRecord>> {
    request.validate()?;

    let record = state
        .catalog
        .update_tier(
            &id,
            &tier_id,
            TierUpdate {
                occurrence_min: request.occurrence_min,
                occurrence_max: request.occurrence_max,
                action_text: request.action_text,
                priority: request.priority,
            },
        )
        .await?;

    Ok(Json(record))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActionTierRequest {
    #[validate(range(min = 1))]
    pub occurrence_min: Option<u32>,
    pub occurrence_max: Option<u32>,
    #[validate(length(min = 1, max = 500))]
    pub action_text: Option<String>,
    #[validate(range(min = 1))]
    pub priority: Option<u32>,
}

/// Remove one action tier
pub async fn delete_action_tier(
    State(state): State<AppState>,
    Path((id, tier_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TechMessageRecord>> {
    let record = state.catalog.remove_tier(&id, &tier_id).await?;
    Ok(Json(record))
}
