pub mod cache;
pub mod paths;
