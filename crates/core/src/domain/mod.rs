pub mod dashboard;
pub mod ward;
