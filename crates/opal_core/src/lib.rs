//! # Opal Core
//!
//! Rendering-agnostic plumbing shared by every Opal component:
//!
//! - **Event bus**: typed publish/subscribe channels with RAII-scoped
//!   subscriptions ([`bus`])
//! - **Slot registry**: named render extension points with built-in
//!   fallbacks ([`slots`])
//!
//! Opal components are headless. They compute state and announce changes;
//! the host decides how (and whether) to draw. The bus carries the
//! announcements and the slot registry carries the host's render overrides,
//! so neither side links against the other.
//!
//! # Example
//!
//! ```
//! use opal_core::{EventBus, SlotRegistry};
//!
//! #[derive(Debug)]
//! struct ItemActivated(usize);
//!
//! let bus = EventBus::new();
//! let _sub = bus.subscribe::<ItemActivated, _>(|event| {
//!     println!("active item is now {}", event.0);
//! });
//! bus.publish(&ItemActivated(2));
//!
//! let slots: SlotRegistry<usize, String> = SlotRegistry::builder()
//!     .slot("item", |index| format!("item {index}"))
//!     .build();
//! assert_eq!(slots.render("item", &2), Some("item 2".to_string()));
//! ```

pub mod bus;
pub mod slots;

pub use bus::{EventBus, SubscriberId, Subscription, Topic};
pub use slots::{SlotRegistry, SlotRegistryBuilder};
