//! Configuration types for the hotel engine.
//!
//! These structures are deserialized from the YAML files of a configuration
//! directory. Every business threshold the reconcilers use lives here rather
//! than in code.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Metadata about the property, loaded from `hotel.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HotelMetadata {
    /// Short property code (e.g., "RVS").
    pub code: String,
    /// The human-readable name of the property.
    pub name: String,
    /// The version of the configuration set.
    pub version: String,
    /// ISO currency code used for all money values.
    pub currency: String,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    pub bind_address: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

/// Maximum overtime hours allowed for a given number of main shifts worked.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeCap {
    /// Main shifts already worked that day.
    pub main_shifts: u32,
    /// Hours of overtime that may be requested.
    pub max_hours: Decimal,
}

/// Attendance and overtime thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendancePolicy {
    /// Share of the expected window that must elapse before check-out.
    pub checkout_min_ratio: Decimal,
    /// Minutes before shift start that check-in opens.
    pub early_check_in_grace_minutes: i64,
    /// Minutes after shift end that the shift still accepts a check-out.
    pub late_check_out_grace_minutes: i64,
    /// Check-in later than this many minutes after shift start is rejected.
    pub max_late_check_in_minutes: i64,
    /// Allowed gap between shift end and the start of after-shift overtime.
    pub after_shift_tolerance_minutes: i64,
    /// Minutes before a custom overtime window that check-in opens.
    pub overtime_early_check_in_minutes: i64,
    /// Main-shift assignments allowed per employee per day.
    pub max_main_shifts_per_day: u32,
    /// Overtime hour caps keyed by main shifts worked.
    pub overtime_caps: Vec<OvertimeCap>,
}

impl AttendancePolicy {
    /// Early check-in grace as a duration.
    pub fn early_grace(&self) -> Duration {
        Duration::minutes(self.early_check_in_grace_minutes)
    }

    /// Late check-out grace as a duration.
    pub fn late_grace(&self) -> Duration {
        Duration::minutes(self.late_check_out_grace_minutes)
    }

    /// Latest accepted check-in offset from shift start.
    pub fn max_late_check_in(&self) -> Duration {
        Duration::minutes(self.max_late_check_in_minutes)
    }

    /// After-shift overtime alignment tolerance.
    pub fn after_shift_tolerance(&self) -> Duration {
        Duration::minutes(self.after_shift_tolerance_minutes)
    }

    /// How early an overtime-only check-in may happen.
    pub fn overtime_early_check_in(&self) -> Duration {
        Duration::minutes(self.overtime_early_check_in_minutes)
    }

    /// Overtime hours allowed after `main_shifts` main shifts.
    ///
    /// Counts with no configured cap allow no overtime at all.
    pub fn overtime_cap_hours(&self, main_shifts: u32) -> Decimal {
        self.overtime_caps
            .iter()
            .find(|cap| cap.main_shifts == main_shifts)
            .map(|cap| cap.max_hours)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            checkout_min_ratio: Decimal::new(70, 2),
            early_check_in_grace_minutes: 60,
            late_check_out_grace_minutes: 240,
            max_late_check_in_minutes: 120,
            after_shift_tolerance_minutes: 5,
            overtime_early_check_in_minutes: 60,
            max_main_shifts_per_day: 2,
            overtime_caps: vec![
                OvertimeCap {
                    main_shifts: 0,
                    max_hours: Decimal::from(6),
                },
                OvertimeCap {
                    main_shifts: 1,
                    max_hours: Decimal::from(4),
                },
            ],
        }
    }
}

/// Promotion sweep settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionPolicy {
    /// Seconds between status sweeps.
    pub sweep_interval_seconds: u64,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: 3600,
        }
    }
}

/// Payroll settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollPolicy {
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            overtime_multiplier: Decimal::new(15, 1),
        }
    }
}

/// Business policy loaded from `policy.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Attendance and overtime thresholds.
    pub attendance: AttendancePolicy,
    /// Promotion sweep settings.
    pub promotions: PromotionPolicy,
    /// Payroll settings.
    pub payroll: PayrollPolicy,
}

/// Face recognition API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceRecognitionConfig {
    /// Base URL of the detection/comparison API.
    pub base_url: String,
    /// API key.
    pub api_key: String,
    /// API secret.
    pub api_secret: String,
    /// Minimum comparison confidence (0-100) accepted as a match.
    pub confidence_threshold: Decimal,
    /// Request timeout.
    pub timeout_seconds: u64,
}

/// Payment gateway settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentGatewayConfig {
    /// Shared secret for return-URL signatures.
    pub hash_secret: String,
    /// Response code that signals a successful payment.
    pub success_code: String,
}

/// Third-party integrations loaded from `integrations.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationsConfig {
    /// Face recognition API.
    pub face_recognition: FaceRecognitionConfig,
    /// Payment gateway.
    pub payment_gateway: PaymentGatewayConfig,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct HotelConfig {
    metadata: HotelMetadata,
    policy: PolicyConfig,
    integrations: IntegrationsConfig,
}

impl HotelConfig {
    /// Creates a new HotelConfig from its component parts.
    pub fn new(
        metadata: HotelMetadata,
        policy: PolicyConfig,
        integrations: IntegrationsConfig,
    ) -> Self {
        Self {
            metadata,
            policy,
            integrations,
        }
    }

    /// Returns the property metadata.
    pub fn metadata(&self) -> &HotelMetadata {
        &self.metadata
    }

    /// Returns the business policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns the integration settings.
    pub fn integrations(&self) -> &IntegrationsConfig {
        &self.integrations
    }
}
