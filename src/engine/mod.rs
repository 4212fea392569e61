pub mod error;
pub mod tracker;

pub use error::*;
pub use tracker::*;
