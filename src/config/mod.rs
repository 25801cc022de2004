//! Configuration loading and management.
//!
//! Configuration is a directory of YAML files describing the property, the
//! business thresholds used by the attendance and promotion rules, and the
//! third-party integrations.
//!
//! # Example
//!
//! ```no_run
//! use hotel_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/hotel").unwrap();
//! println!("Loaded property: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, FaceRecognitionConfig, HotelConfig, HotelMetadata, IntegrationsConfig,
    OvertimeCap, PaymentGatewayConfig, PayrollPolicy, PolicyConfig, PromotionPolicy, ServerConfig,
};
