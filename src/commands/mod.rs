pub mod analyze;
pub mod library;
