pub mod outcome;
pub mod round;
pub mod signal;

pub use outcome::*;
pub use round::*;
pub use signal::*;
