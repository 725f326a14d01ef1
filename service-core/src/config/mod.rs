use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::de::DeserializeOwned;
use validator::Validate;

pub use config::Environment;

/// Prefix shared by every service setting, e.g. `APP_DB_HOST`.
pub const ENV_PREFIX: &str = "APP";

/// An `APP_`-prefixed source reading `vars` instead of the process
/// environment.
pub fn env_from_vars<I, K, V>(vars: I) -> Environment
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let source: config::Map<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    Environment::with_prefix(ENV_PREFIX).source(Some(source))
}

/// Load settings from `.env`, an optional `configuration` file and `APP_*`
/// environment variables, then validate them.
pub fn load_settings<T>() -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    if let Err(e) = dotenvy::dotenv() {
        // Logging is not initialised yet at this point.
        eprintln!("warn_init_config: failed reading .env: {}", e);
    }

    load_settings_from(Environment::with_prefix(ENV_PREFIX))
}

/// Same as [`load_settings`] but with an explicit environment source and no
/// `.env` handling.
pub fn load_settings_from<T>(env: Environment) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let settings: T = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(env)
        .build()?
        .try_deserialize()?;

    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings<T: Validate>(settings: &T) -> Result<(), AppError> {
    let Err(errors) = settings.validate() else {
        return Ok(());
    };

    let mut failures: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(move |e| (field.to_string(), e.code.to_string()))
        })
        .collect();
    failures.sort();

    match failures.into_iter().next() {
        Some((field, rule)) => Err(AppError::ConfigError(anyhow::anyhow!(
            "invalid field: field '{}' failed on the '{}' rule",
            field,
            rule
        ))),
        None => Err(AppError::ConfigError(anyhow::anyhow!(
            "failed to validate config: {}",
            errors
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1))]
        db_host: String,
        #[validate(range(min = 1))]
        db_port: u16,
        #[serde(default)]
        log_level: Option<String>,
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        env_from_vars(vars.iter().copied())
    }

    #[test]
    fn reads_prefixed_variables() {
        let sample: Sample =
            load_settings_from(env(&[("APP_DB_HOST", "localhost"), ("APP_DB_PORT", "5432")]))
                .unwrap();
        assert_eq!(sample.db_host, "localhost");
        assert_eq!(sample.db_port, 5432);
        assert_eq!(sample.log_level, None);
    }

    #[test]
    fn missing_required_field_fails() {
        let err = load_settings_from::<Sample>(env(&[("APP_DB_HOST", "localhost")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("db_port"));
    }

    #[test]
    fn empty_required_field_names_field_and_rule() {
        let err = load_settings_from::<Sample>(env(&[("APP_DB_HOST", ""), ("APP_DB_PORT", "5432")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid field: field 'db_host' failed on the 'length' rule"
        );
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let err = load_settings_from::<Sample>(env(&[("DB_HOST", "localhost"), ("DB_PORT", "1")]))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
