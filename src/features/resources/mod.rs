//! Resource CRUD feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/resources` | Create a resource |
//! | GET | `/api/resources` | List resources (category, status, search, limit, offset) |
//! | GET | `/api/resources/{id}` | Get a resource |
//! | PUT | `/api/resources/{id}` | Update some fields of a resource |
//! | DELETE | `/api/resources/{id}` | Delete a resource |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;


pub use repositories::ResourceRepository;
