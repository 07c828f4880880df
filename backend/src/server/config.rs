//! Application settings loaded via OrthoConfig and the validated server
//! configuration derived from them.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use beerorder::domain::{PricingPolicy, UserPolicy};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UNIT_PRICE: f64 = 5.0;
const DEFAULT_MIN_ORDER_VALUE: f64 = 20.0;
const DEFAULT_MIN_AGE: u32 = 18;
const DEFAULT_SEED_COUNT: u64 = 25;
const DEFAULT_SEED_ENDPOINT: &str = "https://api.punkapi.com/v2/beers";
const DEFAULT_SEED_INTERVAL_MS: u64 = 1_000;
const DEFAULT_SEED_TIMEOUT_SECS: u64 = 10;

/// Raw settings layered from `BEERORDER_*` environment variables, the
/// command line and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BEERORDER")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Price of one bottle.
    pub unit_price: Option<f64>,
    /// Smallest accepted order sum.
    pub min_order_value: Option<f64>,
    /// Youngest age accepted at registration.
    pub min_age: Option<u32>,
    /// Import beers from the remote catalogue at startup.
    #[ortho_config(default = false)]
    pub seed_enabled: bool,
    /// Number of remote ids to fetch, starting at 1.
    pub seed_count: Option<u64>,
    /// Base URL of the remote catalogue.
    pub seed_endpoint: Option<String>,
    /// Pause between remote requests.
    pub seed_interval_ms: Option<u64>,
    /// Per-request timeout for the remote catalogue.
    pub seed_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Parse the bind address.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] when the address is malformed.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| invalid(format!("bind_addr {raw}: {err}")))
    }

    /// Build the order pricing policy.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] for negative or non-finite
    /// amounts.
    pub fn pricing_policy(&self) -> io::Result<PricingPolicy> {
        PricingPolicy::new(
            self.unit_price.unwrap_or(DEFAULT_UNIT_PRICE),
            self.min_order_value.unwrap_or(DEFAULT_MIN_ORDER_VALUE),
        )
        .map_err(|err| invalid(err.to_string()))
    }

    pub fn user_policy(&self) -> UserPolicy {
        UserPolicy::new(self.min_age.unwrap_or(DEFAULT_MIN_AGE))
    }

    /// Seeding plan, or `None` when seeding is disabled.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] when the endpoint is not a URL.
    pub fn seed_plan(&self) -> io::Result<Option<SeedPlan>> {
        if !self.seed_enabled {
            return Ok(None);
        }
        let raw = self
            .seed_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_SEED_ENDPOINT);
        let endpoint =
            Url::parse(raw).map_err(|err| invalid(format!("seed_endpoint {raw}: {err}")))?;
        Ok(Some(SeedPlan {
            endpoint,
            count: self.seed_count.unwrap_or(DEFAULT_SEED_COUNT),
            interval: Duration::from_millis(
                self.seed_interval_ms.unwrap_or(DEFAULT_SEED_INTERVAL_MS),
            ),
            timeout: Duration::from_secs(
                self.seed_timeout_secs.unwrap_or(DEFAULT_SEED_TIMEOUT_SECS),
            ),
        }))
    }
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

/// Remote catalogue import parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub endpoint: Url,
    pub count: u64,
    pub interval: Duration,
    pub timeout: Duration,
}

/// Validated configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pricing: PricingPolicy,
    pub(crate) users: UserPolicy,
    pub(crate) seeding: Option<SeedPlan>,
}

impl ServerConfig {
    /// Validate `settings`, failing fast on the first bad value.
    ///
    /// # Errors
    /// Propagates the [`io::Error`] of the first invalid setting.
    pub fn from_settings(settings: &AppSettings) -> io::Result<Self> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            pricing: settings.pricing_policy()?,
            users: settings.user_policy(),
            seeding: settings.seed_plan()?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 9] = [
        "BEERORDER_BIND_ADDR",
        "BEERORDER_UNIT_PRICE",
        "BEERORDER_MIN_ORDER_VALUE",
        "BEERORDER_MIN_AGE",
        "BEERORDER_SEED_ENABLED",
        "BEERORDER_SEED_COUNT",
        "BEERORDER_SEED_ENDPOINT",
        "BEERORDER_SEED_INTERVAL_MS",
        "BEERORDER_SEED_TIMEOUT_SECS",
    ];

    fn env_with<'a>(overrides: &[(&'a str, &str)]) -> Vec<(&'a str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("beerorder")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let config = ServerConfig::from_settings(&load_from_empty_args()).expect("valid defaults");
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().expect("address"));
        assert_eq!(
            config.pricing,
            PricingPolicy::new(5.0, 20.0).expect("valid policy")
        );
        assert_eq!(config.users.min_age(), 18);
        assert!(config.seeding.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BEERORDER_BIND_ADDR", "127.0.0.1:9090"),
            ("BEERORDER_UNIT_PRICE", "4.5"),
            ("BEERORDER_MIN_AGE", "21"),
            ("BEERORDER_SEED_ENABLED", "true"),
            ("BEERORDER_SEED_COUNT", "3"),
            ("BEERORDER_SEED_ENDPOINT", "http://localhost:4000/beers"),
            ("BEERORDER_SEED_INTERVAL_MS", "0"),
        ]));

        let config = ServerConfig::from_settings(&load_from_empty_args()).expect("valid settings");
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse().expect("address"));
        assert!((config.pricing.unit_price() - 4.5).abs() < f64::EPSILON);
        assert_eq!(config.users.min_age(), 21);
        assert_eq!(
            config.seeding,
            Some(SeedPlan {
                endpoint: Url::parse("http://localhost:4000/beers").expect("url"),
                count: 3,
                interval: Duration::ZERO,
                timeout: Duration::from_secs(10),
            })
        );
    }

    #[rstest]
    #[case::negative_price("BEERORDER_UNIT_PRICE", "-1")]
    #[case::bad_address("BEERORDER_BIND_ADDR", "localhost")]
    #[case::bad_endpoint("BEERORDER_SEED_ENDPOINT", "not a url")]
    fn invalid_values_abort_startup(#[case] key: &str, #[case] value: &str) {
        let _guard = lock_env(env_with(&[(key, value), ("BEERORDER_SEED_ENABLED", "true")]));

        let err = ServerConfig::from_settings(&load_from_empty_args())
            .expect_err("settings should be rejected");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
