pub mod csv_attachment;
pub mod test_management;

pub use csv_attachment::*;
pub use test_management::*;
