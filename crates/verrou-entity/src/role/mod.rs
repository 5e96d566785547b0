//! Role domain entities.

pub mod model;
pub mod name;

pub use model::Role;
pub use name::RoleName;
