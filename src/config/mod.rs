use serde::{Deserialize, Serialize};

use std::{env, ffi::OsString, fs, path::Path};

const DEFAULT_LISTEN_PORT: u16 = 5000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SENDER_NAME: &str = "Agnia Ayurvedic Hospital";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid or incomplete environment configuration ({scope}): {source}")]
    Env {
        scope: &'static str,
        source: envy::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_port")]
    pub port: u16,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// Receives a copy of every submission.
    pub forward_email: String,
    pub appointment: FormConfig,
    pub contact: FormConfig,
}

/// Mail account and primary recipient for one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub recipient: String,
    pub smtp: SmtpAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpAccount {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login name, also used as the sender address.
    pub user: String,
    pub pass: String,
    #[serde(default)]
    pub security: SmtpSecurity,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS when the server offers it.
    #[default]
    Opportunistic,
    Starttls,
    Tls,
    None,
}

const fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

const fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_sender_name() -> String {
    DEFAULT_SENDER_NAME.to_string()
}

#[derive(Debug, Deserialize)]
struct EnvRoot {
    #[serde(default = "default_listen_port")]
    port: u16,
    #[serde(default = "default_sender_name")]
    sender_name: String,
    data_forward_email: String,
    appointment_email: String,
    contact_email: String,
}

/// Builds the configuration from `KEY=value` pairs laid out the way the
/// process environment is.
pub fn from_vars<I>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: Vec<(String, String)> = vars.into_iter().collect();

    let root: EnvRoot = envy::from_iter(vars.clone()).map_err(|source| ConfigError::Env {
        scope: "root",
        source,
    })?;

    let appointment_smtp: SmtpAccount = envy::prefixed("APPOINTMENT_SMTP_")
        .from_iter(vars.clone())
        .map_err(|source| ConfigError::Env {
            scope: "APPOINTMENT_SMTP_*",
            source,
        })?;

    let contact_smtp: SmtpAccount = envy::prefixed("CONTACT_SMTP_")
        .from_iter(vars)
        .map_err(|source| ConfigError::Env {
            scope: "CONTACT_SMTP_*",
            source,
        })?;

    Ok(Config {
        port: root.port,
        sender_name: root.sender_name,
        forward_email: root.data_forward_email,
        appointment: FormConfig {
            recipient: root.appointment_email,
            smtp: appointment_smtp,
        },
        contact: FormConfig {
            recipient: root.contact_email,
            smtp: contact_smtp,
        },
    })
}

pub fn from_yaml_str(path: &str, contents: &str) -> Result<Config, ConfigError> {
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn load_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    from_yaml_str(path, &contents)
}

/// Config files to try, in order. An explicit path comes first; the local
/// defaults are always tried after it.
fn config_candidates(explicit: Option<String>) -> Vec<String> {
    let mut candidates: Vec<String> = explicit.into_iter().collect();
    for default in ["config.yaml", "config.example.yaml"] {
        if !candidates.iter().any(|c| c == default) {
            candidates.push(default.to_string());
        }
    }
    candidates
}

/// Keeps the variables that are valid UTF-8; anything else cannot be
/// configuration for this service.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Pick up a local .env before anything reads the environment
    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!("Loaded environment overrides from {}", path.display());
    }

    let explicit = env::var("FORM_RELAY_CONFIG").ok();

    for candidate in config_candidates(explicit.clone()) {
        if !Path::new(&candidate).exists() {
            if explicit.as_deref() == Some(candidate.as_str()) {
                tracing::warn!("Config file '{}' not found, trying defaults", candidate);
            }
            continue;
        }

        if candidate == "config.example.yaml" {
            tracing::warn!(
                "Falling back to 'config.example.yaml'\
                 \n This file should not be used and should be replaced with actual data"
            );
        }
        return load_file(&candidate);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    let config = from_vars(utf8_vars(env::vars_os()))?;
    tracing::info!("Successfully loaded configuration from environment variables");
    Ok(config)
}
