//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: HOP_NAME, NEXT_HOP_URL, ...)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the request handler
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup and never mutated
//! - All fields have defaults to allow minimal configs
//! - Request handling never reads the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GenerationConfig, HopConfig, IdentityConfig, ListenerConfig, ObservabilityConfig,
    RelayConfig, SecurityConfig, TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
