pub mod case_status;
pub mod outcome;
pub mod story;
pub mod test_case;

pub use case_status::*;
pub use outcome::*;
pub use story::*;
pub use test_case::*;
