//! Alert (theft/loss/found report) entities.

pub mod model;
pub mod motif;

pub use model::{Alerte, CreateAlerte};
pub use motif::Motif;
