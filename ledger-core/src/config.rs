//! Configuration for the accounting engine
//!
//! Owned by whoever drives a reconciliation run; the engine reads it but never
//! persists it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rent split configuration
    pub rent: RentConfig,

    /// Rounding tolerances
    pub tolerance: ToleranceConfig,

    /// Audit export configuration
    pub audit: AuditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rent: RentConfig::default(),
            tolerance: ToleranceConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

/// Rent split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentConfig {
    /// Fraction of total rent owed by Ryan (0.0 - 1.0)
    ///
    /// Two different splits (47/53 and 43/57) have been used historically;
    /// set this explicitly per run rather than relying on the default.
    #[serde(with = "rust_decimal::serde::str")]
    pub ryan_percentage: Decimal,
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            ryan_percentage: Decimal::new(47, 2), // 47%
        }
    }
}

/// Rounding tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Allowed drift in the double-entry invariants
    #[serde(with = "rust_decimal::serde::str")]
    pub invariant: Decimal,

    /// Net positions strictly below this are reported as balanced
    #[serde(with = "rust_decimal::serde::str")]
    pub balanced: Decimal,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            invariant: Decimal::new(2, 2), // $0.02
            balanced: Decimal::new(1, 2),  // $0.01
        }
    }
}

/// Audit export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Default destination for the exported audit trail
    pub output_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./data/audit/audit_trail.json"),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(pct) = std::env::var("LEDGER_RYAN_PERCENTAGE") {
            config.rent.ryan_percentage = Decimal::from_str(pct.trim()).map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_RYAN_PERCENTAGE '{}': {}", pct, e))
            })?;
        }

        if let Ok(path) = std::env::var("LEDGER_AUDIT_PATH") {
            config.audit.output_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        let pct = self.rent.ryan_percentage;
        if pct < Decimal::ZERO || pct > Decimal::ONE {
            return Err(crate::Error::Config(format!(
                "rent.ryan_percentage must be between 0 and 1, got {}",
                pct
            )));
        }

        if self.tolerance.invariant < Decimal::ZERO || self.tolerance.balanced < Decimal::ZERO {
            return Err(crate::Error::Config(
                "tolerances must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
