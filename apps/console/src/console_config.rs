use std::env;
use std::time::Duration;

use rolekeeper_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_DIRECTORY_API_URL: &str = "http://localhost:3000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub directory_url: Url,
    pub http_timeout: Duration,
    pub assume_yes: bool,
    pub demo: bool,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw_url = lookup("DIRECTORY_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTORY_API_URL.to_owned());
        let directory_url = Url::parse(raw_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid DIRECTORY_API_URL '{raw_url}': {error}"))
        })?;
        if !matches!(directory_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "DIRECTORY_API_URL must use http or https, got '{}'",
                directory_url.scheme()
            )));
        }

        let timeout_secs = match lookup("DIRECTORY_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid DIRECTORY_HTTP_TIMEOUT_SECS: {error}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "DIRECTORY_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            directory_url,
            http_timeout: Duration::from_secs(timeout_secs),
            assume_yes: flag(&lookup, "ROLEKEEPER_ASSUME_YES"),
            demo: flag(&lookup, "ROLEKEEPER_DEMO"),
        })
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> bool {
    lookup(name)
        .unwrap_or_else(|| "false".to_owned())
        .trim()
        .eq_ignore_ascii_case("true")
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
