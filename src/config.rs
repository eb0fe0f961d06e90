// src/config.rs
//! Runtime configuration.
//!
//! Settings are layered: compiled defaults first, then environment
//! variables prefixed with `CERTVERIFY`. Nested keys are separated by a
//! double underscore, e.g.
//!
//! ```text
//! CERTVERIFY_SERVER__PORT=8080
//! CERTVERIFY_TIMINGS__TICK_INTERVAL_MS=50
//! CERTVERIFY_RANDOM_SEED=42
//! ```

use crate::models::upload::MAX_UPLOAD_BYTES;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub upload: UploadSettings,
    pub timings: Timings,
    /// Fixed seed for reproducible demo runs; entropy when unset.
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadSettings {
    pub max_size_bytes: u64,
}

/// Pacing of the simulated workflow, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timings {
    /// Pause between "proceed" and the first scan tick being scheduled.
    pub scan_start_delay_ms: u64,
    pub tick_interval_ms: u64,
    /// Pause between the scan reaching 100% and the fields appearing.
    pub reveal_delay_ms: u64,
    /// How long extracted fields stay on screen before checking starts.
    pub field_display_ms: u64,
    pub database_check_ms: u64,
    pub signature_check_ms: u64,
    pub fraud_check_ms: u64,
    /// Time from entering Checking to entering Result.
    pub checking_duration_ms: u64,
}

impl Timings {
    pub fn scan_start_delay(&self) -> Duration {
        Duration::from_millis(self.scan_start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn field_display(&self) -> Duration {
        Duration::from_millis(self.field_display_ms)
    }

    pub fn checking_duration(&self) -> Duration {
        Duration::from_millis(self.checking_duration_ms)
    }

    /// When Checking hands over to Result: the configured duration, pushed
    /// back to the last check if a check would finish later.
    pub fn checking_deadline(&self) -> Duration {
        self.check_offsets()
            .into_iter()
            .fold(self.checking_duration(), Duration::max)
    }

    /// Offsets of the three checks from the start of Checking, in display
    /// order.
    pub fn check_offsets(&self) -> [Duration; 3] {
        [
            Duration::from_millis(self.database_check_ms),
            Duration::from_millis(self.signature_check_ms),
            Duration::from_millis(self.fraud_check_ms),
        ]
    }

    /// Every check must finish strictly inside the Checking window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = self.checking_duration_ms;
        let offsets = [
            ("database_check_ms", self.database_check_ms),
            ("signature_check_ms", self.signature_check_ms),
            ("fraud_check_ms", self.fraud_check_ms),
        ];
        for (name, offset) in offsets {
            if offset >= window {
                return Err(ConfigError::Message(format!(
                    "timings.{} ({}) must be below timings.checking_duration_ms ({})",
                    name, offset, window
                )));
            }
        }
        Ok(())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            scan_start_delay_ms: 1_000,
            tick_interval_ms: 200,
            reveal_delay_ms: 500,
            field_display_ms: 2_000,
            database_check_ms: 1_000,
            signature_check_ms: 2_000,
            fraud_check_ms: 3_000,
            checking_duration_ms: 4_000,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: IpAddr::from([127, 0, 0, 1]),
                port: 3000,
            },
            upload: UploadSettings {
                max_size_bytes: MAX_UPLOAD_BYTES,
            },
            timings: Timings::default(),
            random_seed: None,
        }
    }
}

impl Settings {
    /// Loads defaults overlaid with `CERTVERIFY_*` environment variables.
    ///
    /// # Errors
    /// Returns `Err` if an environment value cannot be parsed into its
    /// field type, or if the timings are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Self::defaults()?.add_source(
                config::Environment::with_prefix("CERTVERIFY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder().add_source(config::Config::try_from(&Settings::default())?))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.timings.validate()?;
        Ok(settings)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}
