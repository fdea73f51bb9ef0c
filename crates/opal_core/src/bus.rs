//! Typed event bus with scoped subscriptions
//!
//! Process-wide services (toast messages, confirmation requests) talk to the
//! components that render them through explicit publish/subscribe channels.
//! Each channel is keyed by the payload type, so a bus carries any number of
//! independent topics without the services knowing about each other.
//!
//! Subscriptions are scoped: [`subscribe`](EventBus::subscribe) returns a
//! [`Subscription`] guard and dropping the guard removes the subscriber.
//! Components hold their guards for their own lifetime and teardown needs no
//! extra bookkeeping.
//!
//! # Example
//!
//! ```
//! use opal_core::bus::EventBus;
//!
//! #[derive(Debug)]
//! struct Ping(u32);
//!
//! let bus = EventBus::new();
//! let sub = bus.subscribe::<Ping, _>(|ping| {
//!     assert_eq!(ping.0, 7);
//! });
//!
//! assert_eq!(bus.publish(&Ping(7)), 1);
//! drop(sub);
//! assert_eq!(bus.publish(&Ping(7)), 0);
//! ```

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a bus subscriber within its topic channel
    pub struct SubscriberId;
}

/// Marker trait for payloads that can travel on the bus
///
/// Blanket-implemented for every `Send + Sync + 'static` type; topics are
/// distinguished purely by their Rust type.
pub trait Topic: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Topic for T {}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Subscribers for a single topic
struct Channel<T> {
    subscribers: SlotMap<SubscriberId, Callback<T>>,
}

impl<T> Channel<T> {
    fn new() -> Self {
        Self {
            subscribers: SlotMap::with_key(),
        }
    }
}

/// Type-erased channel stored in the bus registry
trait AnyChannel: Send {
    fn remove(&mut self, id: SubscriberId) -> bool;
    fn contains(&self, id: SubscriberId) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Topic> AnyChannel for Channel<T> {
    fn remove(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type ChannelMap = FxHashMap<TypeId, Box<dyn AnyChannel>>;

/// Typed publish/subscribe bus
///
/// Cloning is cheap and every clone addresses the same channels, so a bus can
/// be handed to producers and consumers alike. Delivery is synchronous and
/// runs on the publishing thread; the callback snapshot is taken before any
/// callback runs, so callbacks may publish, subscribe, or drop subscriptions
/// without deadlocking.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Mutex<ChannelMap>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Subscribe to a topic
    ///
    /// The returned [`Subscription`] unsubscribes on drop. Call
    /// [`Subscription::detach`] to keep the subscriber alive for the bus's
    /// lifetime instead.
    pub fn subscribe<T, F>(&self, callback: F) -> Subscription
    where
        T: Topic,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut channels = self.channels.lock().unwrap();
            let channel = channels
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Box::new(Channel::<T>::new()));
            let channel = channel
                .as_any_mut()
                .downcast_mut::<Channel<T>>()
                .expect("channel type mismatch");
            channel.subscribers.insert(Arc::new(callback))
        };

        tracing::debug!(topic = std::any::type_name::<T>(), "bus subscribe");

        Subscription {
            channels: Arc::downgrade(&self.channels),
            topic: TypeId::of::<T>(),
            id,
            detached: false,
        }
    }

    /// Publish an event to every current subscriber of its topic
    ///
    /// Returns the number of subscribers the event reached. Subscribers added
    /// during delivery are not reached by this publish; subscribers removed
    /// during delivery may still receive it once (the snapshot was already
    /// taken).
    pub fn publish<T: Topic>(&self, event: &T) -> usize {
        let snapshot: SmallVec<[Callback<T>; 4]> = {
            let channels = self.channels.lock().unwrap();
            match channels.get(&TypeId::of::<T>()) {
                Some(channel) => channel
                    .as_any()
                    .downcast_ref::<Channel<T>>()
                    .expect("channel type mismatch")
                    .subscribers
                    .values()
                    .cloned()
                    .collect(),
                None => return 0,
            }
        };

        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    /// Number of current subscribers for a topic
    pub fn subscriber_count<T: Topic>(&self) -> usize {
        let channels = self.channels.lock().unwrap();
        channels
            .get(&TypeId::of::<T>())
            .map(|channel| channel.len())
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels = self.channels.lock().unwrap();
        f.debug_struct("EventBus")
            .field("topics", &channels.len())
            .finish()
    }
}

/// RAII guard for a bus subscription
///
/// Dropping the guard removes the subscriber. Holds only a weak reference to
/// the bus, so a guard outliving its bus is harmless.
#[derive(Debug)]
pub struct Subscription {
    channels: Weak<Mutex<ChannelMap>>,
    topic: TypeId,
    id: SubscriberId,
    detached: bool,
}

impl Subscription {
    /// Consume the guard, leaving the subscriber registered for the bus's
    /// lifetime
    pub fn detach(mut self) {
        self.detached = true;
    }

    /// Whether the subscriber is still registered
    pub fn is_active(&self) -> bool {
        let Some(channels) = self.channels.upgrade() else {
            return false;
        };
        let channels = channels.lock().unwrap();
        channels
            .get(&self.topic)
            .map(|channel| channel.contains(self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.detached {
            return;
        }
        if let Some(channels) = self.channels.upgrade() {
            if let Ok(mut channels) = channels.lock() {
                if let Some(channel) = channels.get_mut(&self.topic) {
                    channel.remove(self.id);
                }
            }
        }
    }
}
