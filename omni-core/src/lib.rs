pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;

pub use config::OmniConfig;
pub use error::OmniError;
pub use models::generation::{Generation, GenerationStatus, ModuleType};
pub use models::request::ModuleRequest;
pub use models::session::Session;
pub use provider::{create_provider, GenerationProvider, MockProvider, ProviderError};
