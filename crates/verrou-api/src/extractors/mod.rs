//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod multipart;
pub mod pagination;
pub mod path;
pub mod query;
pub mod validated;

pub use auth::AuthUser;
pub use multipart::MultipartForm;
pub use pagination::Pagination;
pub use path::UuidPath;
pub use query::QueryParams;
pub use validated::ValidatedJson;
