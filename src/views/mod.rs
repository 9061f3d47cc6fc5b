pub mod dashboard;
pub mod utils;
