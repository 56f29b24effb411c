use crate::errors::ConfigurationError;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::env::var;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub mail: MailSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub send_timeout: Duration,
    pub subject_prefix: String,
    pub signature: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            send_timeout: Duration::from_secs(10),
            subject_prefix: "[Portfolio Contact]".to_string(),
            signature: "Yanbo".to_string(),
        }
    }
}

/// Sender identity used to authenticate against the SMTP relay.
#[derive(Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub from: String,
    pub password: String,
    pub to: String,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("from", &self.from)
            .field("password", &"***")
            .field("to", &self.to)
            .finish()
    }
}

impl MailCredentials {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// `MAIL_FROM` and `MAIL_PASS` are required, `MAIL_TO` falls back to `MAIL_FROM`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigurationError::MissingVariable(key))
        };
        let from = present("MAIL_FROM")?;
        let password = present("MAIL_PASS")?;
        let to = present("MAIL_TO").unwrap_or_else(|_| from.clone());
        Ok(Self { from, password, to })
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Eq, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(ConfigurationError::UnknownEnvironment(s)),
        }
    }
}

pub fn get_env() -> Result<Environment, ConfigurationError> {
    var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "dev".into())
        .try_into()
}

pub fn get_configuration() -> Result<Settings, crate::errors::Error> {
    let environment = get_env()?;
    let second_source = format!("configuration/{}", environment.as_str());
    let port = var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .map(i64::from);
    let settings = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml).required(false))
        .set_override_option("application.port", port)?
        .build()?;
    Ok(settings.try_deserialize::<Settings>()?)
}
