//! Host lifecycle events and an in-process event bus.

use crate::context::NotificationDetails;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Weak},
};

/// Callback invoked with every event of the kind it was registered for.
pub type Listener = Arc<dyn Fn(&HostEvent) + Send + Sync>;

/// Events the host pushes to the frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum HostEvent {
    #[serde(rename_all = "camelCase")]
    FrameAdded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notification_details: Option<NotificationDetails>,
    },
    FrameAddRejected { reason: AddFrameRejectedReason },
    FrameRemoved,
    #[serde(rename_all = "camelCase")]
    NotificationsEnabled { notification_details: NotificationDetails },
    NotificationsDisabled,
    PrimaryButtonClicked,
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            Self::FrameAdded { .. } => HostEventKind::FrameAdded,
            Self::FrameAddRejected { .. } => HostEventKind::FrameAddRejected,
            Self::FrameRemoved => HostEventKind::FrameRemoved,
            Self::NotificationsEnabled { .. } => HostEventKind::NotificationsEnabled,
            Self::NotificationsDisabled => HostEventKind::NotificationsDisabled,
            Self::PrimaryButtonClicked => HostEventKind::PrimaryButtonClicked,
        }
    }
}

/// Name of a [`HostEvent`], used to register listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostEventKind {
    FrameAdded,
    FrameAddRejected,
    FrameRemoved,
    NotificationsEnabled,
    NotificationsDisabled,
    PrimaryButtonClicked,
}

impl HostEventKind {
    pub const ALL: [Self; 6] = [
        Self::FrameAdded,
        Self::FrameAddRejected,
        Self::FrameRemoved,
        Self::NotificationsEnabled,
        Self::NotificationsDisabled,
        Self::PrimaryButtonClicked,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FrameAdded => "frameAdded",
            Self::FrameAddRejected => "frameAddRejected",
            Self::FrameRemoved => "frameRemoved",
            Self::NotificationsEnabled => "notificationsEnabled",
            Self::NotificationsDisabled => "notificationsDisabled",
            Self::PrimaryButtonClicked => "primaryButtonClicked",
        }
    }
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the user's host declined to add the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddFrameRejectedReason {
    InvalidDomainManifest,
    RejectedByUser,
}

impl AddFrameRejectedReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidDomainManifest => "invalid_domain_manifest",
            Self::RejectedByUser => "rejected_by_user",
        }
    }
}

impl fmt::Display for AddFrameRejectedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposer returned when registering a listener.
///
/// Dropping a subscription keeps the listener registered, call [`Subscription::unsubscribe`] to
/// remove it.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self { dispose: Some(Box::new(dispose)) }
    }

    /// A subscription with nothing to dispose.
    pub fn noop() -> Self {
        Self { dispose: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.dispose.is_some()).finish()
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, HostEventKind, Listener)>,
}

impl Listeners {
    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry, ..)| *entry != id);
    }
}

/// In-process publish/subscribe bus for [`HostEvent`]s.
///
/// Cloning yields another handle to the same set of listeners.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for events of the given kind.
    pub fn subscribe(&self, kind: HostEventKind, listener: Listener) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, kind, listener));
            id
        };
        trace!(target: "frame::events", %kind, id, "listener registered");

        let listeners: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().remove(id);
            }
        })
    }

    /// Delivers `event` to every listener registered for its kind and returns how many were
    /// invoked.
    ///
    /// Listeners are called outside the lock, so they may subscribe or unsubscribe.
    pub fn emit(&self, event: &HostEvent) -> usize {
        let kind = event.kind();
        let targets = self
            .listeners
            .lock()
            .entries
            .iter()
            .filter(|(_, entry, _)| *entry == kind)
            .map(|(.., listener)| listener.clone())
            .collect::<Vec<_>>();
        trace!(target: "frame::events", %kind, listeners = targets.len(), "emitting event");

        for listener in &targets {
            listener(event);
        }
        targets.len()
    }

    /// Removes every listener and returns how many were registered.
    pub fn remove_all_listeners(&self) -> usize {
        let removed = std::mem::take(&mut self.listeners.lock().entries).len();
        trace!(target: "frame::events", removed, "removed all listeners");
        removed
    }

    pub fn listener_count(&self, kind: HostEventKind) -> usize {
        self.listeners.lock().entries.iter().filter(|(_, entry, _)| *entry == kind).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Listener) {
        let count = Arc::new(AtomicUsize::new(0));
        let listener: Listener = {
            let count = count.clone();
            Arc::new(move |_: &HostEvent| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        (count, listener)
    }

    #[test]
    fn delivers_only_matching_kind() {
        let bus = EventBus::new();
        let (removed, on_removed) = counter();
        let (clicked, on_clicked) = counter();
        let _ = bus.subscribe(HostEventKind::FrameRemoved, on_removed);
        let _ = bus.subscribe(HostEventKind::PrimaryButtonClicked, on_clicked);

        assert_eq!(bus.emit(&HostEvent::FrameRemoved), 1);
        assert_eq!(bus.emit(&HostEvent::FrameRemoved), 1);
        assert_eq!(bus.emit(&HostEvent::NotificationsDisabled), 0);

        assert_eq!(removed.load(Ordering::SeqCst), 2);
        assert_eq!(clicked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_removes_single_listener() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        let first = bus.subscribe(HostEventKind::FrameRemoved, listener.clone());
        let _second = bus.subscribe(HostEventKind::FrameRemoved, listener);

        first.unsubscribe();
        assert_eq!(bus.listener_count(HostEventKind::FrameRemoved), 1);
        bus.emit(&HostEvent::FrameRemoved);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_all_listeners_clears_bus() {
        let bus = EventBus::new();
        for kind in HostEventKind::ALL {
            let (_, listener) = counter();
            let _ = bus.subscribe(kind, listener);
        }
        assert_eq!(bus.len(), 6);
        assert_eq!(bus.remove_all_listeners(), 6);
        assert!(bus.is_empty());
        assert_eq!(bus.emit(&HostEvent::FrameRemoved), 0);
    }

    #[test]
    fn unsubscribe_after_bus_dropped_is_noop() {
        let bus = EventBus::new();
        let (_, listener) = counter();
        let subscription = bus.subscribe(HostEventKind::FrameRemoved, listener);
        drop(bus);
        subscription.unsubscribe();
    }

    #[test]
    fn event_wire_names() {
        let event: HostEvent = serde_json::from_value(serde_json::json!({
            "event": "frameAddRejected",
            "reason": "rejected_by_user"
        }))
        .unwrap();
        assert_eq!(
            event,
            HostEvent::FrameAddRejected { reason: AddFrameRejectedReason::RejectedByUser }
        );
        assert_eq!(event.kind().to_string(), "frameAddRejected");

        let event = serde_json::to_value(HostEvent::FrameAdded { notification_details: None })
            .unwrap();
        assert_eq!(event, serde_json::json!({ "event": "frameAdded" }));
    }
}
