use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Analysis, Config, Data, Logging, Provider};

/// Prefix of environment variables overriding file values, e.g. `INFORATIO__ANALYSIS__WINDOW=50`.
///
/// List values are comma separated: `INFORATIO__ANALYSIS__SYMBOLS="GADGX,MCSMX,^DJI"`.
pub const ENV_PREFIX: &str = "INFORATIO";

/// Loads and validates the configuration at `path`, with environment overrides applied.
///
/// The file format is inferred from the extension.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    load_with_environment(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        // Keys are matched after the source lowercases them.
        .with_list_parse_key("analysis.symbols")
        .try_parsing(true)
}

fn load_with_environment(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = config::Config::builder()
        .add_source(config::File::with_name(&path.to_string_lossy()).required(true))
        .add_source(env)
        .build()
        .and_then(|builder| builder.try_deserialize::<Config>())
        .map_err(|source| ConfigError::LoadError {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;

    Ok(config)
}
