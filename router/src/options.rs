use crate::RouterError;
use config::{Case, Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use typed_builder::TypedBuilder;

/// Options a router is created with.
///
/// Can be built in code, read from a TOML file, or taken from `ROUTER_*`
/// environment variables:
///
/// ```toml
/// initial-url = "/docs"
/// scroll-up = true
/// ```
#[derive(
    TypedBuilder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case", default)]
pub struct RouterOptions {
    /// The location to start from, instead of asking the host.
    #[builder(default, setter(into, strip_option))]
    pub initial_url: Option<String>,
    /// Scroll the host to the top after every committed navigation.
    #[builder(default)]
    pub scroll_up: bool,
}

impl RouterOptions {
    /// Reads options from `ROUTER_*` environment variables only.
    pub fn try_from_env() -> Result<Self, RouterError> {
        let config = Config::builder().add_source(env_source()).build()?;
        Ok(config.try_deserialize()?)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ROUTER").convert_case(Case::Kebab)
}

/// Parses options from the text of a TOML file.
pub fn get_options_from_str(text: &str) -> Result<RouterOptions, RouterError> {
    let config = Config::builder()
        .add_source(File::from_str(text, FileFormat::Toml))
        .build()?;
    Ok(config.try_deserialize()?)
}

/// Loads options from a TOML file.
pub fn get_options_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<RouterOptions, RouterError> {
    let text = fs::read_to_string(path.as_ref()).map_err(|e| {
        RouterError::Config(format!("{}: {e}", path.as_ref().display()))
    })?;
    get_options_from_str(&text)
}

/// Loads options from an optional TOML file, with any `ROUTER_*`
/// environment variables taking precedence over the file.
pub fn get_configuration(
    path: Option<&str>,
) -> Result<RouterOptions, RouterError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    }
    let config = builder.add_source(env_source()).build()?;
    let options = config.try_deserialize()?;
    tracing::debug!(?options, "loaded router options");
    Ok(options)
}
