//! Outcome of asking the host to add the frame.

use crate::{context::NotificationDetails, events::AddFrameRejectedReason};
use serde::{Deserialize, Serialize};

/// Successful result of an add-frame request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFrameResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_details: Option<NotificationDetails>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddFrameError {
    #[error("{0}")]
    RejectedByUser(String),
    #[error("{0}")]
    InvalidDomainManifest(String),
    /// Anything the host threw that is not one of the two known rejections.
    #[error("{0}")]
    Other(String),
}

impl AddFrameError {
    pub fn rejected_by_user() -> Self {
        Self::RejectedByUser("rejected by user".to_string())
    }

    pub fn invalid_domain_manifest() -> Self {
        Self::InvalidDomainManifest("invalid domain manifest".to_string())
    }

    /// The rejection reason, if the host declined the request.
    pub fn rejection_reason(&self) -> Option<AddFrameRejectedReason> {
        match self {
            Self::RejectedByUser(_) => Some(AddFrameRejectedReason::RejectedByUser),
            Self::InvalidDomainManifest(_) => Some(AddFrameRejectedReason::InvalidDomainManifest),
            Self::Other(_) => None,
        }
    }
}

/// Human readable description of an add-frame outcome.
pub fn describe_add_frame_outcome(outcome: &Result<AddFrameResult, AddFrameError>) -> String {
    match outcome {
        Ok(AddFrameResult { notification_details: Some(details) }) => format!(
            "Added, got notification token {} and url {}",
            details.token, details.url
        ),
        Ok(AddFrameResult { notification_details: None }) => {
            "Added, got no notification details".to_string()
        }
        Err(err @ (AddFrameError::RejectedByUser(_) | AddFrameError::InvalidDomainManifest(_))) => {
            format!("Not added: {err}")
        }
        Err(err @ AddFrameError::Other(_)) => format!("Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_success() {
        let details = NotificationDetails {
            url: "https://api.warpcast.com/v1/frame-notifications".to_string(),
            token: "abc".to_string(),
        };
        assert_eq!(
            describe_add_frame_outcome(&Ok(AddFrameResult {
                notification_details: Some(details)
            })),
            "Added, got notification token abc and url https://api.warpcast.com/v1/frame-notifications"
        );
        assert_eq!(
            describe_add_frame_outcome(&Ok(AddFrameResult::default())),
            "Added, got no notification details"
        );
    }

    #[test]
    fn describes_rejections() {
        let outcome = describe_add_frame_outcome(&Err(AddFrameError::rejected_by_user()));
        assert_eq!(outcome, "Not added: rejected by user");

        let outcome = describe_add_frame_outcome(&Err(AddFrameError::invalid_domain_manifest()));
        assert!(outcome.starts_with("Not added:"));

        let outcome = describe_add_frame_outcome(&Err(AddFrameError::Other("boom".to_string())));
        assert_eq!(outcome, "Error: boom");
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(
            AddFrameError::rejected_by_user().rejection_reason(),
            Some(AddFrameRejectedReason::RejectedByUser)
        );
        assert_eq!(AddFrameError::Other(String::new()).rejection_reason(), None);
    }
}
