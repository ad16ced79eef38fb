pub mod config;
pub mod error;
pub mod hf;
pub mod logger;
pub mod models;
pub mod server;
pub mod validate;

pub use config::{Config, HfConfig};
pub use error::{BridgeError, Result};
pub use hf::HfClient;
pub use models::{GenerationRequest, Mode};
