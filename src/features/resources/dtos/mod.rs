pub mod resource_dto;

pub use resource_dto::{
    CreateResourceDto, ResourceIdParam, ResourceQueryParams, ResourceResponseDto,
    UpdateResourceDto,
};
