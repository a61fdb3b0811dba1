//! # frame-manifest
//!
//! The static descriptor a host client fetches from [`MANIFEST_PATH`] when it discovers a frame.
//!
//! The manifest carries two things:
//! - an [`AccountAssociation`]: an opaque, externally produced proof that the serving domain may
//!   present this frame identity
//! - a [`FrameDescriptor`]: display name, icons and URLs, all derived from a single base URL
//!
//! The base URL and the remaining fields are resolved through [`ManifestConfig`], which layers
//! defaults, an optional `frame.toml`, `FRAME_`-prefixed environment variables and the
//! deployment base-URL variables.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEPLOYMENT_URL_ENV, ENV_PREFIX, ManifestConfig,
    PUBLIC_URL_ENV,
};

mod error;
pub use error::ManifestError;

mod manifest;
pub use manifest::{
    AccountAssociation, FRAME_VERSION, FrameDescriptor, FrameManifest, ICON_PATH, IMAGE_PATH,
    MANIFEST_PATH, SPLASH_PATH, WEBHOOK_PATH,
};
