// Run configuration
// Defaults match the local hotels setup; environment variables override them

use crate::availability::{
    ClientConfig, RequestTemplate, DEFAULT_OCCUPANCY, DEFAULT_SALES_CHANNEL,
};
use crate::pipeline::PipelineOptions;
use crate::stay::{StayWindow, DEFAULT_DAYS_AHEAD, DEFAULT_NIGHTS};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_AIRPORTS_FILE: &str = "airports.json";

// Keys kept in the final digest unless overridden
pub const DEFAULT_ALLOWLIST: [&str; 4] = [
    "cancel_penalties",
    "nonrefundable_date_ranges",
    "propertyName",
    "propertyId",
];

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub airports_file: PathBuf,
    pub allowlist: Vec<String>,
    pub denylist: Vec<String>,
    pub days_ahead: u64,
    pub nights: u64,
    pub sales_channel: String,
    pub occupancy: Vec<String>,
    pub max_concurrency: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            airports_file: PathBuf::from(DEFAULT_AIRPORTS_FILE),
            allowlist: DEFAULT_ALLOWLIST.iter().map(|k| k.to_string()).collect(),
            denylist: Vec::new(),
            days_ahead: DEFAULT_DAYS_AHEAD,
            nights: DEFAULT_NIGHTS,
            sales_channel: DEFAULT_SALES_CHANNEL.to_string(),
            occupancy: vec![DEFAULT_OCCUPANCY.to_string()],
            max_concurrency: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overrides fields from variables found through `lookup`.
    ///
    /// List values are comma separated; blank entries are ignored.
    pub fn apply_env<L>(&mut self, lookup: L) -> Result<(), ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("AVAILABILITY_BASE_URL") {
            self.client.base_url = value;
        }
        if let Some(value) = lookup("AVAILABILITY_PATH") {
            self.client.availability_path = value;
        }
        if let Some(value) = lookup("AVAILABILITY_TIMEOUT_MS") {
            self.client.timeout_ms = parse_number("AVAILABILITY_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("AIRPORTS_FILE") {
            self.airports_file = PathBuf::from(value);
        }
        if let Some(value) = lookup("AVAILABILITY_ALLOWLIST") {
            self.allowlist = split_list(&value);
        }
        if let Some(value) = lookup("AVAILABILITY_DENYLIST") {
            self.denylist = split_list(&value);
        }
        if let Some(value) = lookup("AVAILABILITY_MAX_CONCURRENCY") {
            self.max_concurrency = Some(parse_number("AVAILABILITY_MAX_CONCURRENCY", &value)?);
        }
        if let Some(value) = lookup("STAY_DAYS_AHEAD") {
            self.days_ahead = parse_number("STAY_DAYS_AHEAD", &value)?;
        }
        if let Some(value) = lookup("STAY_NIGHTS") {
            self.nights = parse_number("STAY_NIGHTS", &value)?;
        }
        if let Some(value) = lookup("SALES_CHANNEL") {
            self.sales_channel = value;
        }
        if let Some(value) = lookup("OCCUPANCY") {
            self.occupancy = split_list(&value);
        }
        Ok(())
    }

    pub fn allowlist_set(&self) -> HashSet<String> {
        self.allowlist.iter().cloned().collect()
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_concurrency: self.max_concurrency,
        }
    }

    pub fn request_template(&self) -> RequestTemplate {
        RequestTemplate {
            stay: StayWindow::from_today(self.days_ahead, self.nights),
            sales_channel: self.sales_channel.clone(),
            occupancy: self.occupancy.clone(),
        }
    }
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.client.base_url, "http://localhost:3050");
        assert_eq!(config.days_ahead, 3);
        assert_eq!(config.nights, 7);
        assert_eq!(config.occupancy, vec!["2-2"]);
        assert!(config.allowlist_set().contains("propertyId"));
        assert!(config.denylist.is_empty());
        assert_eq!(config.pipeline_options().max_concurrency, None);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(lookup_from(&[
                ("AVAILABILITY_BASE_URL", "http://hotels:8080"),
                ("AIRPORTS_FILE", "/data/airports.json"),
                ("AVAILABILITY_ALLOWLIST", "propertyId, rates ,,"),
                ("AVAILABILITY_DENYLIST", "image"),
                ("AVAILABILITY_MAX_CONCURRENCY", "8"),
                ("STAY_NIGHTS", "2"),
                ("OCCUPANCY", "2-0,1-1"),
            ]))
            .unwrap();

        assert_eq!(config.client.base_url, "http://hotels:8080");
        assert_eq!(config.airports_file, PathBuf::from("/data/airports.json"));
        assert_eq!(config.allowlist, vec!["propertyId", "rates"]);
        assert_eq!(config.denylist, vec!["image"]);
        assert_eq!(config.max_concurrency, Some(8));
        assert_eq!(config.nights, 2);
        assert_eq!(config.days_ahead, 3);
        assert_eq!(config.occupancy, vec!["2-0", "1-1"]);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup_from(&[("STAY_DAYS_AHEAD", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "STAY_DAYS_AHEAD".to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_request_template_uses_config() {
        let config = Config {
            sales_channel: "mobile".to_string(),
            nights: 1,
            ..Config::default()
        };
        let request = config.request_template().for_airport("LHR");
        assert_eq!(request.sales_channel, "mobile");
        assert_eq!(request.occupancy, vec!["2-2"]);
        assert_ne!(request.check_in, request.check_out);
    }
}
