pub mod generation;
pub mod upstream;

pub use generation::*;
pub use upstream::*;
