pub mod resource;

pub use resource::{NewResource, Resource, ResourceChanges, ResourceFilters, ResourceStatus};
