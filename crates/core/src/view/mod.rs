pub mod dashboard;
pub mod wards;

pub use dashboard::{DashboardDigest, DashboardState, DashboardView, RefreshTask};
pub use wards::{WardCard, WardsPage};
