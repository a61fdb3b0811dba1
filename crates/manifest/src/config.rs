use crate::{error::ManifestError, manifest::AccountAssociation};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Primary base URL variable, set explicitly for a deployment.
pub const PUBLIC_URL_ENV: &str = "NEXT_PUBLIC_URL";

/// Fallback base URL variable, supplied by the hosting platform.
pub const DEPLOYMENT_URL_ENV: &str = "VERCEL_URL";

/// Overrides the location of the config file.
pub const CONFIG_PATH_ENV: &str = "FRAME_CONFIG";

/// Default config file, looked up relative to the working directory.
pub const CONFIG_FILE_NAME: &str = "frame.toml";

/// Prefix of the environment variables that override single config keys.
pub const ENV_PREFIX: &str = "FRAME_";

/// Everything needed to build a [`FrameManifest`](crate::FrameManifest).
///
/// Resolved from, in increasing priority:
/// 1. [`ManifestConfig::default`]
/// 2. the TOML file at `$FRAME_CONFIG` or `./frame.toml`, if present
/// 3. `FRAME_`-prefixed environment variables, nested keys separated by `__`
///    (e.g. `FRAME_ACCOUNT_ASSOCIATION__HEADER`)
/// 4. `NEXT_PUBLIC_URL` and `VERCEL_URL`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Explicitly configured base URL, wins over [`Self::deployment_url`].
    pub public_url: Option<String>,
    /// Platform-provided deployment URL.
    pub deployment_url: Option<String>,
    /// Display name of the frame.
    pub name: String,
    /// Label of the button that launches the frame.
    pub button_title: String,
    /// Background color of the splash screen.
    pub splash_background_color: String,
    pub account_association: AccountAssociation,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            deployment_url: None,
            name: "Frames v2 Demo".to_string(),
            button_title: "Launch Frame".to_string(),
            splash_background_color: "#f7f7f7".to_string(),
            account_association: AccountAssociation::default(),
        }
    }
}

impl ManifestConfig {
    /// Loads the config from all layered sources.
    pub fn load() -> Result<Self, ManifestError> {
        Self::from_figment(Self::figment())
    }

    /// Extracts the config from the given [Figment].
    pub fn from_figment(figment: Figment) -> Result<Self, ManifestError> {
        let config: Self = figment.extract()?;
        trace!(target: "frame::manifest", base_url = ?config.base_url(), "extracted config");
        Ok(config)
    }

    /// Loads the config, reading the TOML layer from `path` instead of the default location.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        Self::from_figment(Self::figment_at(path))
    }

    /// Returns the default [Figment] used by [`Self::load`].
    pub fn figment() -> Figment {
        Self::figment_at(Env::var_or(CONFIG_PATH_ENV, CONFIG_FILE_NAME))
    }

    /// Returns the layered [Figment] with the TOML layer read from `path`.
    pub fn figment_at(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
            .merge(Env::raw().only(&[PUBLIC_URL_ENV]).map(|_| "public_url".into()))
            .merge(Env::raw().only(&[DEPLOYMENT_URL_ENV]).map(|_| "deployment_url".into()))
    }

    /// Overrides the explicitly configured base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// The base URL all manifest URLs are derived from.
    ///
    /// Empty values count as unset, so an empty `NEXT_PUBLIC_URL` still falls back to
    /// `VERCEL_URL`.
    pub fn base_url(&self) -> Option<&str> {
        [self.public_url.as_deref(), self.deployment_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
    }
}
