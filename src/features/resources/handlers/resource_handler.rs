use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::resources::dtos::{
    CreateResourceDto, ResourceIdParam, ResourceQueryParams, ResourceResponseDto,
    UpdateResourceDto,
};
use crate::features::resources::repositories::ResourceRepository;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Pagination};
use crate::shared::validation;

fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

/// Create a resource
#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created successfully", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "resources"
)]
pub async fn create_resource(
    State(repository): State<Arc<ResourceRepository>>,
    AppJson(dto): AppJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<ApiResponse<ResourceResponseDto>>)> {
    let dto = dto.trimmed();
    validation::check(&dto)?;

    let resource = repository.create(dto.into_new_resource()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(resource.into()), None)),
    ))
}

/// List resources with filters and pagination
///
/// Results are ordered newest first. `pagination.hasMore` tells whether
/// another page exists after this one.
#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceQueryParams),
    responses(
        (status = 200, description = "Resources retrieved successfully", body = ApiResponse<Vec<ResourceResponseDto>>),
        (status = 400, description = "Invalid filter parameters")
    ),
    tag = "resources"
)]
pub async fn list_resources(
    State(repository): State<Arc<ResourceRepository>>,
    AppQuery(params): AppQuery<ResourceQueryParams>,
) -> Result<Json<ApiResponse<Vec<ResourceResponseDto>>>> {
    validation::check(&params)?;
    let filters = params.into_filters();

    let (resources, total) =
        tokio::try_join!(repository.find_all(&filters), repository.count(&filters))?;

    let pagination = Pagination::new(
        total,
        filters.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        filters.offset.unwrap_or(0),
    );

    Ok(Json(ApiResponse::paginated(
        resources.into_iter().map(ResourceResponseDto::from).collect(),
        pagination,
    )))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource found", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Invalid resource ID"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn get_resource(
    State(repository): State<Arc<ResourceRepository>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let id = ResourceIdParam::parse(&id)?;

    let resource = repository.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(Some(resource.into()), None)))
}

/// Update some fields of a resource
#[utoipa::path(
    put,
    path = "/api/resources/{id}",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated successfully", body = ApiResponse<ResourceResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn update_resource(
    State(repository): State<Arc<ResourceRepository>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateResourceDto>,
) -> Result<Json<ApiResponse<ResourceResponseDto>>> {
    let id = ResourceIdParam::parse(&id)?;
    let dto = dto.trimmed();
    validation::check(&dto)?;

    let resource = repository
        .update(id, dto.into_changes())
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(Some(resource.into()), None)))
}

/// Delete a resource
#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    params(
        ("id" = i64, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource deleted successfully"),
        (status = 400, description = "Invalid resource ID"),
        (status = 404, description = "Resource not found")
    ),
    tag = "resources"
)]
pub async fn delete_resource(
    State(repository): State<Arc<ResourceRepository>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let id = ResourceIdParam::parse(&id)?;

    if !repository.delete(id).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::success(
        None,
        Some("Resource deleted successfully".to_string()),
    )))
}
