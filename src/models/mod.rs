pub mod revenue;
pub mod summary;
pub mod transaction;

pub use revenue::*;
pub use summary::*;
pub use transaction::*;
