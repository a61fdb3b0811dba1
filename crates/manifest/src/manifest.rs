use crate::{config::ManifestConfig, error::ManifestError};
use serde::{Deserialize, Serialize};

/// Route the host client fetches the manifest from.
pub const MANIFEST_PATH: &str = "/.well-known/farcaster.json";

/// Manifest schema version.
pub const FRAME_VERSION: &str = "1";

pub const ICON_PATH: &str = "/icon.png";
pub const IMAGE_PATH: &str = "/frames/hello/opengraph-image";
pub const SPLASH_PATH: &str = "/splash.png";
pub const WEBHOOK_PATH: &str = "/api/webhook";

/// A signed statement binding the serving domain to an account.
///
/// All three parts are base64url strings produced by an external signing process; they are
/// carried through verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

impl Default for AccountAssociation {
    fn default() -> Self {
        Self {
            header: "eyJmaWQiOiA4ODcyNDYsICJ0eXBlIjogImN1c3RvZHkiLCAia2V5IjogIjB4N0Q0MDBGRDFGNTkyYkI0RkNkNmEzNjNCZkQyMDBBNDNEMTY3MDRlNyJ9".to_string(),
            payload: "eyJkb21haW4iOiAib25zZW5ib3QtZmxvd2xpbmtmcmFtZS1mcmFtZWNlcHRpb24tdjIudmVyY2VsLmFwcCJ9".to_string(),
            signature: "iBIlfRgBeFL0Sw-QRTZ9RKyA8BMsgPdXjbLk5wHxdJBUv-S3FDjOYzYC3lxgkFOEjJYGXgZtIB1qhxbdaNg45Rw".to_string(),
        }
    }
}

/// Identity and launch information of the frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDescriptor {
    pub version: String,
    pub name: String,
    pub icon_url: String,
    pub home_url: String,
    pub image_url: String,
    pub button_title: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
    pub webhook_url: String,
}

/// The document served at [`MANIFEST_PATH`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameManifest {
    pub account_association: AccountAssociation,
    pub frame: FrameDescriptor,
}

impl FrameManifest {
    /// Builds the manifest from the resolved config.
    ///
    /// Fails with [`ManifestError::MissingBaseUrl`] if neither base URL variable is set.
    pub fn build(config: &ManifestConfig) -> Result<Self, ManifestError> {
        let base_url = config.base_url().ok_or(ManifestError::MissingBaseUrl)?;
        debug!(target: "frame::manifest", base_url, "building manifest");
        Ok(Self::with_base_url(config, base_url))
    }

    /// Builds the manifest against an explicit base URL.
    ///
    /// URLs are plain concatenations of `base_url` and the fixed path suffixes, the base is not
    /// normalized.
    pub fn with_base_url(config: &ManifestConfig, base_url: &str) -> Self {
        let url = |suffix: &str| format!("{base_url}{suffix}");
        Self {
            account_association: config.account_association.clone(),
            frame: FrameDescriptor {
                version: FRAME_VERSION.to_string(),
                name: config.name.clone(),
                icon_url: url(ICON_PATH),
                home_url: base_url.to_string(),
                image_url: url(IMAGE_PATH),
                button_title: config.button_title.clone(),
                splash_image_url: url(SPLASH_PATH),
                splash_background_color: config.splash_background_color.clone(),
                webhook_url: url(WEBHOOK_PATH),
            },
        }
    }

    /// Serializes the manifest to compact JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const BASE: &str = "https://frames.example.com";

    fn config() -> ManifestConfig {
        ManifestConfig::default().with_base_url(BASE)
    }

    #[test]
    fn derives_urls_from_base() {
        let manifest = FrameManifest::build(&config()).unwrap();
        let frame = &manifest.frame;

        assert_eq!(frame.version, "1");
        assert_eq!(frame.icon_url, format!("{BASE}{ICON_PATH}"));
        assert_eq!(frame.home_url, BASE);
        assert_eq!(frame.image_url, format!("{BASE}{IMAGE_PATH}"));
        assert_eq!(frame.splash_image_url, format!("{BASE}{SPLASH_PATH}"));
        assert_eq!(frame.webhook_url, format!("{BASE}{WEBHOOK_PATH}"));
    }

    #[test]
    fn base_url_is_used_verbatim() {
        let config = ManifestConfig {
            deployment_url: Some("demo.vercel.app/".to_string()),
            ..Default::default()
        };
        let manifest = FrameManifest::build(&config).unwrap();
        assert_eq!(manifest.frame.icon_url, "demo.vercel.app//icon.png");
        assert_eq!(manifest.frame.home_url, "demo.vercel.app/");
    }

    #[test]
    fn missing_base_url_is_an_error() {
        let err = FrameManifest::build(&ManifestConfig::default()).unwrap_err();
        assert!(matches!(err, ManifestError::MissingBaseUrl));
        assert!(err.to_string().contains("NEXT_PUBLIC_URL"));
    }

    #[test]
    fn serializes_wire_shape() {
        let manifest = FrameManifest::build(&config()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

        let expected = serde_json::json!({
            "accountAssociation": {
                "header": AccountAssociation::default().header,
                "payload": AccountAssociation::default().payload,
                "signature": AccountAssociation::default().signature,
            },
            "frame": {
                "version": "1",
                "name": "Frames v2 Demo",
                "iconUrl": "https://frames.example.com/icon.png",
                "homeUrl": "https://frames.example.com",
                "imageUrl": "https://frames.example.com/frames/hello/opengraph-image",
                "buttonTitle": "Launch Frame",
                "splashImageUrl": "https://frames.example.com/splash.png",
                "splashBackgroundColor": "#f7f7f7",
                "webhookUrl": "https://frames.example.com/api/webhook",
            }
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn repeated_builds_are_byte_identical() {
        let first = FrameManifest::build(&config()).unwrap().to_json().unwrap();
        let second = FrameManifest::build(&config()).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }
}
