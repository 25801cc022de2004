//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the hotel
//! configuration from a directory of YAML files.

use std::fs;
use std::path::Path;

use crate::error::{HotelError, HotelResult};

use super::types::{
    AttendancePolicy, HotelConfig, HotelMetadata, IntegrationsConfig, PaymentGatewayConfig,
    PolicyConfig,
};

/// Loads and provides access to the hotel configuration.
///
/// # Directory Structure
///
/// ```text
/// config/hotel/
/// ├── hotel.yaml         # Property metadata and server settings
/// ├── policy.yaml        # Attendance, promotion and payroll policy
/// └── integrations.yaml  # Face recognition API and payment gateway
/// ```
///
/// # Example
///
/// ```no_run
/// use hotel_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/hotel")?;
/// println!("Loaded property: {}", loader.metadata().name);
/// # Ok::<(), hotel_engine::error::HotelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HotelConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, is not valid YAML, or lacks a
    /// required field.
    pub fn load<P: AsRef<Path>>(path: P) -> HotelResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<HotelMetadata>(&path.join("hotel.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let integrations = Self::load_yaml::<IntegrationsConfig>(&path.join("integrations.yaml"))?;

        Self::check_policy(&policy.attendance)?;

        Ok(Self {
            config: HotelConfig::new(metadata, policy, integrations),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: HotelConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HotelResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HotelError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HotelError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn check_policy(policy: &AttendancePolicy) -> HotelResult<()> {
        let ratio = policy.checkout_min_ratio;
        if ratio.is_sign_negative() || ratio > rust_decimal::Decimal::ONE {
            return Err(HotelError::ConfigParseError {
                path: "policy.yaml".to_string(),
                message: format!("checkout_min_ratio must be within 0..=1, got {}", ratio),
            });
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HotelConfig {
        &self.config
    }

    /// Returns the property metadata.
    pub fn metadata(&self) -> &HotelMetadata {
        self.config.metadata()
    }

    /// Returns the business policy.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }

    /// Returns the attendance thresholds.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.config.policy().attendance
    }

    /// Returns the payment gateway settings.
    pub fn payment_gateway(&self) -> &PaymentGatewayConfig {
        &self.config.integrations().payment_gateway
    }
}
