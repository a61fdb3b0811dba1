//! The boundary to the application hosting the frame.

use crate::{
    actions::{AddFrameError, AddFrameResult},
    context::FrameContext,
    events::{EventBus, HostEvent, HostEventKind, Listener, Subscription},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("host failed `{action}`: {reason}")]
    Action { action: &'static str, reason: String },
}

/// Options passed along with the ready signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyOptions {
    /// Asks the host not to intercept swipe gestures.
    pub disable_native_gestures: bool,
}

/// Everything the frame needs from its host application.
///
/// The host is always injected into the component, which makes it trivial to substitute
/// [`LocalHost`] or any other test double.
#[async_trait]
pub trait FrameHost: Send + Sync + 'static {
    /// Resolves the context snapshot.
    ///
    /// Returns `None` if the frame is not running inside a compatible host. The future may never
    /// complete.
    async fn context(&self) -> Option<FrameContext>;

    /// Registers a listener for the named host event.
    fn subscribe(&self, kind: HostEventKind, listener: Listener) -> Subscription;

    /// Deregisters every listener registered through [`Self::subscribe`].
    fn remove_all_listeners(&self);

    /// Signals that the frame finished loading and may be shown.
    async fn ready(&self, options: ReadyOptions) -> Result<(), HostError>;

    /// Prompts the user to add the frame to the host.
    async fn add_frame(&self) -> Result<AddFrameResult, AddFrameError>;

    /// Asks the host to open `url`.
    async fn open_url(&self, url: &str) -> Result<(), HostError>;
}

#[derive(Debug)]
struct LocalHostInner {
    bus: EventBus,
    /// `None` until the context is resolved.
    context: watch::Sender<Option<Option<FrameContext>>>,
    add_frame_outcome: Mutex<Result<AddFrameResult, AddFrameError>>,
    opened_urls: Mutex<Vec<String>>,
    ready_calls: Mutex<Vec<ReadyOptions>>,
    listener_removals: AtomicUsize,
}

/// An in-process [`FrameHost`] with scripted behavior.
///
/// Records every action the frame performs, so it doubles as the host used by previews and
/// tests. Successful and rejected add-frame requests push the matching [`HostEvent`] to the
/// registered listeners, the way a real host does.
#[derive(Clone, Debug)]
pub struct LocalHost {
    inner: Arc<LocalHostInner>,
}

impl LocalHost {
    /// A host whose context is already resolved.
    pub fn new(context: Option<FrameContext>) -> Self {
        let host = Self::pending();
        host.resolve_context(context);
        host
    }

    /// A host whose context resolves only once [`Self::resolve_context`] is called.
    pub fn pending() -> Self {
        let (context, _) = watch::channel(None);
        Self {
            inner: Arc::new(LocalHostInner {
                bus: EventBus::new(),
                context,
                add_frame_outcome: Mutex::new(Ok(AddFrameResult::default())),
                opened_urls: Mutex::default(),
                ready_calls: Mutex::default(),
                listener_removals: AtomicUsize::new(0),
            }),
        }
    }

    pub fn resolve_context(&self, context: Option<FrameContext>) {
        self.inner.context.send_replace(Some(context));
    }

    /// Sets the outcome of subsequent add-frame requests.
    pub fn set_add_frame_outcome(&self, outcome: Result<AddFrameResult, AddFrameError>) {
        *self.inner.add_frame_outcome.lock() = outcome;
    }

    /// Pushes an event to the registered listeners.
    pub fn emit(&self, event: &HostEvent) -> usize {
        self.inner.bus.emit(event)
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.inner.opened_urls.lock().clone()
    }

    pub fn ready_calls(&self) -> Vec<ReadyOptions> {
        self.inner.ready_calls.lock().clone()
    }

    /// How many times [`FrameHost::remove_all_listeners`] was invoked.
    pub fn listener_removals(&self) -> usize {
        self.inner.listener_removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameHost for LocalHost {
    async fn context(&self) -> Option<FrameContext> {
        let mut rx = self.inner.context.subscribe();
        let resolved =
            rx.wait_for(Option::is_some).await.map(|context| (*context).clone().flatten());
        match resolved {
            Ok(context) => context,
            // the sender lives as long as `self`
            Err(_) => std::future::pending().await,
        }
    }

    fn subscribe(&self, kind: HostEventKind, listener: Listener) -> Subscription {
        self.inner.bus.subscribe(kind, listener)
    }

    fn remove_all_listeners(&self) {
        self.inner.listener_removals.fetch_add(1, Ordering::SeqCst);
        self.inner.bus.remove_all_listeners();
    }

    async fn ready(&self, options: ReadyOptions) -> Result<(), HostError> {
        self.inner.ready_calls.lock().push(options);
        Ok(())
    }

    async fn add_frame(&self) -> Result<AddFrameResult, AddFrameError> {
        let outcome = self.inner.add_frame_outcome.lock().clone();
        match &outcome {
            Ok(result) => {
                self.emit(&HostEvent::FrameAdded {
                    notification_details: result.notification_details.clone(),
                });
            }
            Err(err) => {
                if let Some(reason) = err.rejection_reason() {
                    self.emit(&HostEvent::FrameAddRejected { reason });
                }
            }
        }
        outcome
    }

    async fn open_url(&self, url: &str) -> Result<(), HostError> {
        self.inner.opened_urls.lock().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn pending_context_resolves_later() {
        let host = LocalHost::pending();
        let waiter = {
            let host = host.clone();
            tokio::spawn(async move { host.context().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        host.resolve_context(Some(FrameContext::default()));
        assert_eq!(waiter.await.unwrap(), Some(FrameContext::default()));
    }

    #[tokio::test]
    async fn add_frame_notifies_listeners() {
        let host = LocalHost::new(None);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _ = host.subscribe(HostEventKind::FrameAddRejected, {
            let seen = seen.clone();
            Arc::new(move |event: &HostEvent| seen.lock().push(event.clone()))
        });

        host.set_add_frame_outcome(Err(AddFrameError::invalid_domain_manifest()));
        assert!(host.add_frame().await.is_err());
        assert_eq!(seen.lock().len(), 1);

        host.set_add_frame_outcome(Err(AddFrameError::Other("boom".to_string())));
        assert!(host.add_frame().await.is_err());
        assert_eq!(seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn records_actions() {
        let host = LocalHost::new(None);
        host.open_url("https://github.com/onsenbot").await.unwrap();
        host.ready(ReadyOptions::default()).await.unwrap();
        host.remove_all_listeners();

        assert_eq!(host.opened_urls(), ["https://github.com/onsenbot".to_string()]);
        assert_eq!(host.ready_calls().len(), 1);
        assert_eq!(host.listener_removals(), 1);
    }
}
