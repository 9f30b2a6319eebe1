pub mod ids;
pub mod logging;
pub mod time;

pub use ids::{ObjectName, Uid};
