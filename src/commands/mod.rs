pub mod fetch;
pub mod generate;
pub mod publish;
pub mod sync;

pub use fetch::*;
pub use generate::*;
pub use publish::*;
pub use sync::*;
