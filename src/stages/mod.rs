pub mod aggregate;
pub mod classify;
pub mod segment;

pub use aggregate::*;
pub use classify::*;
pub use segment::*;
