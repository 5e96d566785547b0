//! Back-office and owner dashboards.

pub mod service;

pub use service::DashboardService;
