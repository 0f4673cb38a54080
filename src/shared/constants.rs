/// Default page size for resource listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;
