pub mod conversation;
pub mod sentiment;

pub use conversation::*;
pub use sentiment::*;
