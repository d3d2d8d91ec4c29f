pub mod adf;
pub mod file_operations;
pub mod json_extract;

pub use adf::*;
pub use file_operations::*;
pub use json_extract::*;
