//! The frame component.

use crate::{
    actions::describe_add_frame_outcome,
    discovery::{ProviderDetail, ProviderDiscovery},
    context::FrameContext,
    events::{HostEvent, HostEventKind, Listener, Subscription},
    host::{FrameHost, HostError, ReadyOptions},
    view::FrameView,
    wallet::{
        AccountState, ActionStatus, ReceiptStatus, TransactionStatus, WalletConnector, WalletError,
        toggle_chain_target,
    },
};
use alloy_dyn_abi::TypedData;
use alloy_primitives::{Bytes, ChainId, TxHash};
use alloy_rpc_types::TransactionRequest;
use parking_lot::Mutex;
use std::{
    fmt,
    future::Future,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};

/// Title rendered when none is configured.
pub const PROJECT_TITLE: &str = "Frames v2 Demo";

/// Lifecycle of the component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePhase {
    #[default]
    Uninitialized,
    /// Waiting for the host context.
    Loading,
    Ready,
    /// The host returned no context, or did not return one in time. Terminal.
    Unavailable,
}

/// Local state of the wallet actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletActivity {
    pub connect: ActionStatus,
    pub disconnect: ActionStatus,
    pub send_transaction: ActionStatus,
    pub sign_message: ActionStatus,
    pub sign_typed_data: ActionStatus,
    pub switch_chain: ActionStatus,
    /// Hash of the last transaction sent through the frame.
    pub tx_hash: Option<TxHash>,
    pub transaction: TransactionStatus,
    /// Last signature produced by either signing action.
    pub signature: Option<Bytes>,
}

/// Everything the component displays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameState {
    pub phase: FramePhase,
    pub context: Option<FrameContext>,
    /// Whether the frame is added to the host.
    pub added: bool,
    /// Description of the most recent host event.
    pub last_event: String,
    /// Description of the last add-frame attempt.
    pub add_frame_result: String,
    /// Whether the raw context is expanded.
    pub context_open: bool,
    pub wallet: WalletActivity,
}

impl FrameState {
    /// Applies a host event to the display state.
    pub fn apply(&mut self, event: &HostEvent) {
        match event {
            HostEvent::FrameAdded { notification_details } => {
                self.last_event = if notification_details.is_some() {
                    "frameAdded, notifications enabled".to_string()
                } else {
                    "frameAdded".to_string()
                };
                self.added = true;
            }
            HostEvent::FrameAddRejected { reason } => {
                self.last_event = format!("frameAddRejected, reason {reason}");
            }
            HostEvent::FrameRemoved => {
                self.last_event = "frameRemoved".to_string();
                self.added = false;
            }
            HostEvent::NotificationsEnabled { .. } => {
                self.last_event = "notificationsEnabled".to_string();
            }
            HostEvent::NotificationsDisabled => {
                self.last_event = "notificationsDisabled".to_string();
            }
            HostEvent::PrimaryButtonClicked => {
                self.last_event = "primaryButtonClicked".to_string();
            }
        }
    }
}

/// Optional collaborators and settings of a [`Frame`].
#[derive(Clone)]
pub struct FrameOptions {
    pub title: String,
    /// How long to wait for the host context before giving up. `None` waits forever.
    pub context_timeout: Option<Duration>,
    pub wallet: Option<Arc<dyn WalletConnector>>,
    pub discovery: Option<Arc<dyn ProviderDiscovery>>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            title: PROJECT_TITLE.to_string(),
            context_timeout: None,
            wallet: None,
            discovery: None,
        }
    }
}

impl FrameOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_context_timeout(mut self, timeout: Duration) -> Self {
        self.context_timeout = Some(timeout);
        self
    }

    pub fn with_wallet(mut self, wallet: impl WalletConnector) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    pub fn with_discovery(mut self, discovery: impl ProviderDiscovery) -> Self {
        self.discovery = Some(Arc::new(discovery));
        self
    }
}

impl fmt::Debug for FrameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameOptions")
            .field("title", &self.title)
            .field("context_timeout", &self.context_timeout)
            .field("wallet", &self.wallet.is_some())
            .field("discovery", &self.discovery.is_some())
            .finish()
    }
}

/// State shared with the initialization task and the registered listeners.
struct Shared {
    state: Mutex<FrameState>,
    /// Mirrors `state.phase` for waiters.
    phase: watch::Sender<FramePhase>,
    /// Bumped on every unmount, work started for an older generation is discarded.
    generation: AtomicU64,
    discovery: Mutex<Option<Subscription>>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            state: Mutex::default(),
            phase: watch::channel(FramePhase::default()).0,
            generation: AtomicU64::new(0),
            discovery: Mutex::default(),
        }
    }
}

impl Shared {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    fn set_phase(&self, generation: u64, phase: FramePhase) {
        let mut state = self.state.lock();
        if self.is_current(generation) {
            self.publish_phase(&mut state, phase);
        }
    }

    /// Must be called with the state lock held.
    fn publish_phase(&self, state: &mut FrameState, phase: FramePhase) {
        state.phase = phase;
        self.phase.send_replace(phase);
    }
}

#[derive(Default)]
struct Lifecycle {
    /// Set once initialization started, cleared on unmount.
    loaded: bool,
    tasks: Vec<JoinHandle<()>>,
}

/// The frame client component.
///
/// [`Frame::mount`] starts initialization in the background, [`Frame::render`] produces the view
/// for the current state and [`Frame::unmount`] tears everything down again. All host and wallet
/// access goes through the injected collaborators.
pub struct Frame {
    host: Arc<dyn FrameHost>,
    options: FrameOptions,
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl Frame {
    pub fn new(host: impl FrameHost, options: FrameOptions) -> Self {
        Self::with_host(Arc::new(host), options)
    }

    pub fn with_host(host: Arc<dyn FrameHost>, options: FrameOptions) -> Self {
        Self { host, options, shared: Arc::default(), lifecycle: Mutex::default() }
    }

    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub fn phase(&self) -> FramePhase {
        self.shared.state.lock().phase
    }

    /// Waits until initialization completed or gave up, returning the phase it settled in.
    ///
    /// Never returns if the host context never resolves and no timeout is configured.
    pub async fn settled(&self) -> FramePhase {
        let mut phase = self.shared.phase.subscribe();
        phase
            .wait_for(|phase| matches!(phase, FramePhase::Ready | FramePhase::Unavailable))
            .await
            .map_or_else(|_| self.phase(), |phase| *phase)
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> FrameState {
        self.shared.state.lock().clone()
    }

    /// Account state of the attached wallet, if any.
    pub fn account(&self) -> Option<(AccountState, ChainId)> {
        self.options.wallet.as_ref().map(|wallet| (wallet.account(), wallet.chain_id()))
    }

    /// Renders the current state.
    pub fn render(&self) -> FrameView {
        FrameView::new(&self.options.title, &self.snapshot(), self.account())
    }

    /// Starts initialization, unless it already started for this mount.
    ///
    /// Returns whether this call started it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn mount(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.loaded {
            return false;
        }
        lifecycle.loaded = true;

        info!(target: "frame::client", "Calling load");
        let generation = {
            let mut state = self.shared.state.lock();
            self.shared.publish_phase(&mut state, FramePhase::Loading);
            self.shared.generation()
        };

        let loader = Loader {
            host: self.host.clone(),
            shared: self.shared.clone(),
            generation,
            discovery: self.options.discovery.clone(),
            context_timeout: self.options.context_timeout,
        };
        lifecycle.tasks.push(tokio::spawn(loader.run()));
        true
    }

    /// Tears the component down: cancels pending work, releases the provider subscription and
    /// removes all host listeners. Local state is discarded.
    ///
    /// Does nothing if the component is not mounted, so listeners are removed exactly once per
    /// mount.
    pub fn unmount(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        if !lifecycle.loaded {
            return false;
        }
        for task in lifecycle.tasks.drain(..) {
            task.abort();
        }
        *lifecycle = Lifecycle::default();

        let mut state = self.shared.state.lock();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(subscription) = self.shared.discovery.lock().take() {
            subscription.unsubscribe();
        }
        self.host.remove_all_listeners();
        *state = FrameState::default();
        self.shared.phase.send_replace(state.phase);

        debug!(target: "frame::client", "unmounted");
        true
    }

    /// Asks the host to add the frame and records the outcome description.
    pub async fn add_frame(&self) -> String {
        let outcome = self.host.add_frame().await;
        if let Err(err) = &outcome {
            debug!(target: "frame::client", %err, "add frame failed");
        }
        let description = describe_add_frame_outcome(&outcome);
        self.shared.state.lock().add_frame_result = description.clone();
        description
    }

    /// Opens `url` through the host.
    pub async fn open_link(&self, url: &str) -> Result<(), HostError> {
        trace!(target: "frame::client", url, "opening link");
        self.host.open_url(url).await
    }

    /// Expands or collapses the raw context, returning the new value.
    pub fn toggle_context(&self) -> bool {
        let mut state = self.shared.state.lock();
        state.context_open = !state.context_open;
        state.context_open
    }

    pub async fn connect_wallet(&self) -> Result<AccountState, WalletError> {
        let wallet = self.connector()?;
        self.track(|activity| &mut activity.connect, wallet.connect()).await
    }

    pub async fn disconnect_wallet(&self) -> Result<(), WalletError> {
        let wallet = self.connector()?;
        self.track(|activity| &mut activity.disconnect, wallet.disconnect()).await
    }

    /// Toggles the wallet between Base and Optimism, returning the resulting chain.
    pub async fn switch_chain(&self) -> Result<ChainId, WalletError> {
        let wallet = self.connector()?;
        let target = toggle_chain_target(wallet.chain_id());
        debug!(target: "frame::client", chain_id = target, "switching chain");
        self.track(|activity| &mut activity.switch_chain, wallet.switch_chain(target)).await
    }

    pub async fn sign_message(&self, message: &str) -> Result<Bytes, WalletError> {
        let wallet = self.connector()?;
        let signature =
            self.track(|activity| &mut activity.sign_message, wallet.sign_message(message)).await?;
        self.shared.state.lock().wallet.signature = Some(signature.clone());
        Ok(signature)
    }

    pub async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, WalletError> {
        let wallet = self.connector()?;
        let signature = self
            .track(|activity| &mut activity.sign_typed_data, wallet.sign_typed_data(typed_data))
            .await?;
        self.shared.state.lock().wallet.signature = Some(signature.clone());
        Ok(signature)
    }

    /// Sends a transaction and waits for its receipt in the background.
    ///
    /// Returns as soon as the wallet reports the hash; the receipt outcome lands in
    /// [`WalletActivity::transaction`].
    pub async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        let wallet = self.connector()?;
        let hash = self
            .track(|activity| &mut activity.send_transaction, wallet.send_transaction(tx))
            .await?;

        let generation = {
            let mut state = self.shared.state.lock();
            state.wallet.tx_hash = Some(hash);
            state.wallet.transaction = TransactionStatus::Confirming;
            self.shared.generation()
        };
        debug!(target: "frame::client", %hash, "waiting for receipt");

        let shared = Arc::downgrade(&self.shared);
        let receipt = tokio::spawn(async move {
            let status = match wallet.wait_for_transaction_receipt(hash).await {
                Ok(ReceiptStatus::Success) => TransactionStatus::Confirmed,
                Ok(ReceiptStatus::Reverted) => {
                    TransactionStatus::Failed("transaction reverted".to_string())
                }
                Err(err) => TransactionStatus::Failed(err.to_string()),
            };
            let Some(shared) = shared.upgrade() else { return };
            let mut state = shared.state.lock();
            if shared.is_current(generation) && state.wallet.tx_hash == Some(hash) {
                state.wallet.transaction = status;
            }
        });

        let mut lifecycle = self.lifecycle.lock();
        lifecycle.tasks.retain(|task| !task.is_finished());
        lifecycle.tasks.push(receipt);
        Ok(hash)
    }

    fn connector(&self) -> Result<Arc<dyn WalletConnector>, WalletError> {
        self.options.wallet.clone().ok_or(WalletError::NoWallet)
    }

    /// Runs a wallet action, mirroring its progress into the given status slot.
    async fn track<T>(
        &self,
        slot: fn(&mut WalletActivity) -> &mut ActionStatus,
        action: impl Future<Output = Result<T, WalletError>>,
    ) -> Result<T, WalletError> {
        *slot(&mut self.shared.state.lock().wallet) = ActionStatus::Pending;
        let result = action.await;
        *slot(&mut self.shared.state.lock().wallet) = ActionStatus::from_result(&result);
        result
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("options", &self.options)
            .field("state", &*self.shared.state.lock())
            .finish_non_exhaustive()
    }
}

/// The initialization routine, run once per mount on its own task.
struct Loader {
    host: Arc<dyn FrameHost>,
    shared: Arc<Shared>,
    generation: u64,
    discovery: Option<Arc<dyn ProviderDiscovery>>,
    context_timeout: Option<Duration>,
}

impl Loader {
    async fn run(self) {
        let context = match self.context_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.host.context()).await {
                Ok(context) => context,
                Err(_) => {
                    warn!(target: "frame::client", ?timeout, "timed out waiting for host context");
                    self.shared.set_phase(self.generation, FramePhase::Unavailable);
                    return;
                }
            },
            None => self.host.context().await,
        };
        let Some(context) = context else {
            debug!(target: "frame::client", "host returned no context");
            self.shared.set_phase(self.generation, FramePhase::Unavailable);
            return;
        };

        {
            // Registration happens under the state lock so it cannot interleave with unmount.
            let mut state = self.shared.state.lock();
            if !self.shared.is_current(self.generation) {
                return;
            }
            state.added = context.client.added;
            state.context = Some(context);
            for kind in HostEventKind::ALL {
                let _ = self.host.subscribe(kind, self.listener());
            }
        }

        info!(target: "frame::client", "Calling ready");
        if let Err(err) = self.host.ready(ReadyOptions::default()).await {
            warn!(target: "frame::client", %err, "host did not accept ready signal");
        }

        if let Some(discovery) = &self.discovery {
            let mut state = self.shared.state.lock();
            if !self.shared.is_current(self.generation) {
                return;
            }
            let subscription = discovery.subscribe(Arc::new(|providers: &[ProviderDetail]| {
                info!(target: "frame::client", ?providers, "provider details");
            }));
            *self.shared.discovery.lock() = Some(subscription);
            self.shared.publish_phase(&mut state, FramePhase::Ready);
        } else {
            self.shared.set_phase(self.generation, FramePhase::Ready);
        }
    }

    fn listener(&self) -> Listener {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let generation = self.generation;
        Arc::new(move |event: &HostEvent| {
            if matches!(event, HostEvent::PrimaryButtonClicked) {
                info!(target: "frame::client", "primaryButtonClicked");
            }
            let Some(shared) = shared.upgrade() else { return };
            let mut state = shared.state.lock();
            if shared.is_current(generation) {
                state.apply(event);
            }
        })
    }
}
