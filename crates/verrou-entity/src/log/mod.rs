//! Audit log entities.

pub mod kind;
pub mod model;

pub use kind::{LogAction, LogEntity};
pub use model::{CreateLog, Log, entity_id_from_path};
