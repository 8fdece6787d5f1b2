//! Typed configuration for Heron.
//!
//! - TOML and JSON files
//! - Environment variable overrides (`HERON__SECTION__KEY`)
//! - Strict parsing: unknown fields are errors
//! - Validation after all layers are applied
//!
//! # Example
//!
//! ```no_run
//! use heron_config::ConfigLoader;
//!
//! # fn main() -> Result<(), heron_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("heron.toml")?
//!     .with_env_prefix("HERON")
//!     .load()?;
//!
//! println!("body limit: {} bytes", config.binding.max_body_bytes);
//! # Ok(())
//! # }
//! ```
//!
//! # File Format
//!
//! ```toml
//! [binding]
//! max_body_bytes = 1048576
//! reject_unknown_content_type = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! include_location = false
//! span_events = false
//! ```

#![doc(html_root_url = "https://docs.rs/heron-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HeronConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BindingConfig, LogFormat, LoggingSection, DEFAULT_MAX_BODY_BYTES};
