//! Render model of the frame component.

use crate::{
    context::Padding,
    frame::{FramePhase, FrameState, WalletActivity},
    utils::truncate_address,
    wallet::AccountState,
};
use alloy_primitives::ChainId;
use std::fmt;

/// A profile link shown on every ready frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocialLink {
    pub name: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
}

pub const SOCIAL_LINKS: [SocialLink; 2] = [
    SocialLink { name: "Farcaster", icon: "🟣", url: "https://warpcast.com/onsenbot" },
    SocialLink { name: "GitHub", icon: "🐙", url: "https://github.com/onsenbot" },
];

/// A button that opens `url` through the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

impl From<SocialLink> for LinkButton {
    fn from(link: SocialLink) -> Self {
        Self { label: format!("{} {}", link.icon, link.name), url: link.url.to_string() }
    }
}

/// Wallet section, present when a wallet is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletView {
    /// Truncated account address.
    pub address: Option<String>,
    pub is_connected: bool,
    pub chain_id: ChainId,
    pub activity: WalletActivity,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadyView {
    pub padding: Padding,
    pub title: String,
    pub social_links: Vec<LinkButton>,
    pub recent_links: Vec<LinkButton>,
    pub context_open: bool,
    /// Pretty-printed context, only while expanded.
    pub context_json: Option<String>,
    pub wallet: Option<WalletView>,
}

impl ReadyView {
    /// Number of link buttons on screen.
    pub fn button_count(&self) -> usize {
        self.social_links.len() + self.recent_links.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrameView {
    /// Placeholder shown until initialization completes.
    Loading,
    Ready(ReadyView),
}

impl FrameView {
    pub(crate) fn new(
        title: &str,
        state: &FrameState,
        account: Option<(AccountState, ChainId)>,
    ) -> Self {
        let context = match (&state.context, state.phase) {
            (Some(context), FramePhase::Ready) => context,
            _ => return Self::Loading,
        };

        let recent_links = context
            .client
            .recent_links()
            .iter()
            .map(|link| LinkButton { label: link.clone(), url: link.clone() })
            .collect();
        let context_json = state
            .context_open
            .then(|| serde_json::to_string_pretty(context).ok())
            .flatten();
        let wallet = account.map(|(account, chain_id)| WalletView {
            address: account.address.map(|address| truncate_address(&address.to_string())),
            is_connected: account.is_connected,
            chain_id,
            activity: state.wallet.clone(),
        });

        Self::Ready(ReadyView {
            padding: context.client.padding(),
            title: title.to_string(),
            social_links: SOCIAL_LINKS.into_iter().map(Into::into).collect(),
            recent_links,
            context_open: state.context_open,
            context_json,
            wallet,
        })
    }
}

impl fmt::Display for FrameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = match self {
            Self::Loading => return f.write_str("Loading..."),
            Self::Ready(view) => view,
        };

        let Padding { top, bottom, left, right } = view.padding;
        writeln!(f, "{}", view.title)?;
        writeln!(f, "padding: {top} {right} {bottom} {left}")?;
        for link in &view.social_links {
            writeln!(f, "[{}] ➔ {}", link.label, link.url)?;
        }
        if !view.recent_links.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recent Links")?;
            for link in &view.recent_links {
                writeln!(f, "[{}] ➔", link.label)?;
            }
        }
        if let Some(context) = &view.context_json {
            writeln!(f)?;
            writeln!(f, "Context")?;
            writeln!(f, "{context}")?;
        }
        if let Some(wallet) = &view.wallet {
            writeln!(f)?;
            match &wallet.address {
                Some(address) if wallet.is_connected => writeln!(f, "Address: {address}")?,
                _ => writeln!(f, "Wallet not connected")?,
            }
            writeln!(f, "Chain ID: {}", wallet.chain_id)?;
            if let Some(hash) = &wallet.activity.tx_hash {
                writeln!(f, "Hash: {}", truncate_address(&hash.to_string()))?;
                writeln!(f, "Status: {}", wallet.activity.transaction)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClientContext, FrameContext, SafeAreaInsets};
    use alloy_primitives::address;

    fn ready_state(recent_links: Option<Vec<String>>) -> FrameState {
        FrameState {
            phase: FramePhase::Ready,
            context: Some(FrameContext {
                client: ClientContext {
                    safe_area_insets: Some(SafeAreaInsets {
                        top: Some(44.0),
                        bottom: Some(34.0),
                        ..Default::default()
                    }),
                    recent_links,
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn loading_until_ready() {
        let mut state = ready_state(None);
        state.phase = FramePhase::Loading;
        assert_eq!(FrameView::new("Demo", &state, None), FrameView::Loading);

        state.phase = FramePhase::Unavailable;
        assert_eq!(FrameView::new("Demo", &state, None), FrameView::Loading);
        assert_eq!(FrameView::Loading.to_string(), "Loading...");
    }

    #[test]
    fn renders_text_view() {
        let state = ready_state(Some(vec!["https://example.com/a".to_string()]));
        let view = FrameView::new("Frames v2 Demo", &state, None);
        let expected = "\
Frames v2 Demo
padding: 44 0 34 0
[🟣 Farcaster] ➔ https://warpcast.com/onsenbot
[🐙 GitHub] ➔ https://github.com/onsenbot

Recent Links
[https://example.com/a] ➔
";
        similar_asserts::assert_eq!(view.to_string(), expected);
    }

    #[test]
    fn renders_wallet_section() {
        let account = AccountState {
            address: Some(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
            is_connected: true,
        };
        let FrameView::Ready(view) =
            FrameView::new("Demo", &ready_state(None), Some((account, 8453)))
        else {
            panic!("expected ready view")
        };
        let wallet = view.wallet.as_ref().unwrap();
        assert_eq!(wallet.address.as_deref(), Some("0xf39F...2266"));
        assert_eq!(wallet.chain_id, 8453);

        let text = FrameView::Ready(view).to_string();
        assert!(text.contains("Address: 0xf39F...2266"));
        assert!(text.contains("Chain ID: 8453"));
    }

    #[test]
    fn expanded_context_is_rendered() {
        let mut state = ready_state(None);
        state.context_open = true;
        let FrameView::Ready(view) = FrameView::new("Demo", &state, None) else {
            panic!("expected ready view")
        };
        let json = view.context_json.unwrap();
        assert!(json.contains("\"safeAreaInsets\""));
    }
}
