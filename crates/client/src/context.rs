//! Snapshot of the host environment delivered to the frame on launch.

use serde::{Deserialize, Serialize};

/// Context object the host hands to the frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    pub user: UserContext,
    /// Where the frame was launched from. Opaque to the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
    pub client: ClientContext,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub fid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
}

/// Information about the host client itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub client_fid: u64,
    /// Whether the user has already added this frame to the host.
    pub added: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_details: Option<NotificationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_area_insets: Option<SafeAreaInsets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_links: Option<Vec<String>>,
}

impl ClientContext {
    /// Recently visited links, empty if the host reported none.
    pub fn recent_links(&self) -> &[String] {
        self.recent_links.as_deref().unwrap_or_default()
    }

    /// Container padding derived from the safe-area insets.
    pub fn padding(&self) -> Padding {
        self.safe_area_insets.map(|insets| insets.padding()).unwrap_or_default()
    }
}

/// Push notification endpoint granted by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetails {
    pub url: String,
    pub token: String,
}

/// Screen cutouts reported by the host, in pixels. Any side may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeAreaInsets {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
}

impl SafeAreaInsets {
    pub fn padding(&self) -> Padding {
        Padding {
            top: self.top.unwrap_or_default(),
            bottom: self.bottom.unwrap_or_default(),
            left: self.left.unwrap_or_default(),
            right: self.right.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}
