use utoipa::{Modify, OpenApi};

use crate::features::resources::models::ResourceStatus;
use crate::features::resources::{dtos as resources_dtos, handlers as resources_handlers};
use crate::shared::types::{ApiResponse, ErrorBody, Pagination};
use crate::shared::validation::FieldViolation;

#[derive(OpenApi)]
#[openapi(
    paths(
        resources_handlers::create_resource,
        resources_handlers::list_resources,
        resources_handlers::get_resource,
        resources_handlers::update_resource,
        resources_handlers::delete_resource,
    ),
    components(
        schemas(
            // Shared
            Pagination,
            ErrorBody,
            FieldViolation,
            // Resources
            ResourceStatus,
            resources_dtos::CreateResourceDto,
            resources_dtos::UpdateResourceDto,
            resources_dtos::ResourceResponseDto,
            ApiResponse<resources_dtos::ResourceResponseDto>,
            ApiResponse<Vec<resources_dtos::ResourceResponseDto>>,
        )
    ),
    tags(
        (name = "resources", description = "Resource CRUD with filtering and pagination"),
    ),
    info(
        title = "Resource Service API",
        version = "0.1.0",
        description = "CRUD API for managing resources",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
