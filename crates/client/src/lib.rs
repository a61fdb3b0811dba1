//! # frame-client
//!
//! A frame component running inside a host social client.
//!
//! [`Frame`] talks to the world only through injected collaborators:
//! - a [`FrameHost`] providing the launch context, lifecycle events and host actions
//! - an optional [`WalletConnector`] driving transactions, signatures and chain switches
//! - an optional [`ProviderDiscovery`] announcing injected wallet providers
//!
//! [`LocalHost`] and [`ProviderStore`] are in-process implementations used for previews and
//! tests.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod actions;
pub use actions::{AddFrameError, AddFrameResult, describe_add_frame_outcome};

pub mod context;
pub use context::{ClientContext, FrameContext, NotificationDetails, Padding, SafeAreaInsets};

pub mod discovery;
pub use discovery::{ProviderDetail, ProviderDiscovery, ProviderInfo, ProviderStore};

pub mod events;
pub use events::{AddFrameRejectedReason, EventBus, HostEvent, HostEventKind, Subscription};

mod frame;
pub use frame::{Frame, FrameOptions, FramePhase, FrameState, PROJECT_TITLE, WalletActivity};

pub mod host;
pub use host::{FrameHost, HostError, LocalHost, ReadyOptions};

pub mod utils;

pub mod view;
pub use view::{FrameView, LinkButton, ReadyView, SOCIAL_LINKS, WalletView};

pub mod wallet;
pub use wallet::{
    AccountState, ActionStatus, TransactionStatus, WalletConnector, WalletError,
    toggle_chain_target,
};
