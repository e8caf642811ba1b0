//! Run settings: defaults, optional settings file, `DRUPAL_*` environment,
//! then command-line flags.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{MigrateError, Result};

pub const ENV_PREFIX: &str = "DRUPAL";

/// Command-line overrides. Every field is optional so that the other
/// sources can supply it.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub prefix: Option<String>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    dbname: Option<String>,
    user: Option<String>,
    password: String,
    host: String,
    prefix: String,
    output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub prefix: String,
    pub output: PathBuf,
}

impl Settings {
    /// `env` is normally `Environment::with_prefix(ENV_PREFIX)`.
    pub fn load(overrides: Overrides, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("password", "")?
            .set_default("host", "localhost")?
            .set_default("prefix", "")?
            .set_default("output", ".")?;

        if let Some(path) = &overrides.config {
            builder = builder.add_source(File::from(path.as_path()));
        }

        let raw: RawSettings = builder
            .add_source(env)
            .set_override_option("dbname", overrides.dbname)?
            .set_override_option("user", overrides.user)?
            .set_override_option("password", overrides.password)?
            .set_override_option("host", overrides.host)?
            .set_override_option("prefix", overrides.prefix)?
            .set_override_option("output", overrides.output.map(|p| p.display().to_string()))?
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self> {
        let dbname = raw.dbname.ok_or(MigrateError::MissingOption("dbname"))?;
        let user = raw.user.ok_or(MigrateError::MissingOption("user"))?;
        if !raw
            .prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(MigrateError::InvalidPrefix(raw.prefix));
        }
        Ok(Settings {
            dbname,
            user,
            password: raw.password,
            host: raw.host,
            prefix: raw.prefix,
            output: raw.output,
        })
    }
}
