//! Named render-slot registry
//!
//! Components expose named extension points ("header", "item", "empty") and
//! hosts fill them with render functions. The component never hard-codes a
//! host surface; it asks the registry whether a slot is filled and renders
//! through it, falling back to its built-in default otherwise.
//!
//! A registry is built once through [`SlotRegistryBuilder`] and sealed by
//! [`build`](SlotRegistryBuilder::build); after that it is read-only, so a
//! component can hold it for its whole lifetime without interior mutability.
//!
//! # Example
//!
//! ```
//! use opal_core::slots::SlotRegistry;
//!
//! let slots: SlotRegistry<u32, String> = SlotRegistry::builder()
//!     .slot("item", |n| format!("cell {n}"))
//!     .build();
//!
//! assert!(slots.has("item"));
//! assert_eq!(slots.render("item", &3), Some("cell 3".to_string()));
//! assert_eq!(slots.render_or("caption", &3, |n| n.to_string()), "3");
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

type RenderFn<C, R> = Arc<dyn Fn(&C) -> R + Send + Sync>;

/// Immutable map from slot name to render function
///
/// `C` is the context handed to render functions (the component's per-slot
/// view of its state), `R` the host's render output. Cloning shares the
/// underlying functions.
pub struct SlotRegistry<C, R> {
    slots: IndexMap<String, RenderFn<C, R>>,
}

impl<C, R> SlotRegistry<C, R> {
    /// Start building a registry
    pub fn builder() -> SlotRegistryBuilder<C, R> {
        SlotRegistryBuilder {
            slots: IndexMap::new(),
        }
    }

    /// Registry with no slots filled
    pub fn empty() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    /// Whether a slot is filled
    pub fn has(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Render through a slot, or `None` if it is not filled
    pub fn render(&self, name: &str, context: &C) -> Option<R> {
        self.slots.get(name).map(|f| f(context))
    }

    /// Render through a slot, falling back to `default` if it is not filled
    pub fn render_or<F>(&self, name: &str, context: &C, default: F) -> R
    where
        F: FnOnce(&C) -> R,
    {
        match self.slots.get(name) {
            Some(f) => f(context),
            None => default(context),
        }
    }

    /// Filled slot names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are filled
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<C, R> Clone for SlotRegistry<C, R> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<C, R> Default for SlotRegistry<C, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C, R> std::fmt::Debug for SlotRegistry<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRegistry")
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`SlotRegistry`]
pub struct SlotRegistryBuilder<C, R> {
    slots: IndexMap<String, RenderFn<C, R>>,
}

impl<C, R> SlotRegistryBuilder<C, R> {
    /// Fill a slot
    ///
    /// Registering the same name twice keeps the last registration.
    pub fn slot<F>(mut self, name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&C) -> R + Send + Sync + 'static,
    {
        let name = name.into();
        if self.slots.insert(name.clone(), Arc::new(render)).is_some() {
            tracing::debug!(slot = %name, "slot re-registered, keeping last");
        }
        self
    }

    /// Seal the registry
    pub fn build(self) -> SlotRegistry<C, R> {
        SlotRegistry { slots: self.slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_slot_renders() {
        let slots: SlotRegistry<i32, String> = SlotRegistry::builder()
            .slot("item", |n| format!("#{n}"))
            .build();

        assert!(slots.has("item"));
        assert_eq!(slots.render("item", &5), Some("#5".to_string()));
    }

    #[test]
    fn test_missing_slot_returns_none() {
        let slots: SlotRegistry<i32, String> = SlotRegistry::empty();
        assert!(!slots.has("item"));
        assert_eq!(slots.render("item", &5), None);
    }

    #[test]
    fn test_render_or_falls_back() {
        let slots: SlotRegistry<i32, String> = SlotRegistry::builder()
            .slot("header", |_| "custom header".to_string())
            .build();

        assert_eq!(
            slots.render_or("header", &0, |_| "default".to_string()),
            "custom header"
        );
        assert_eq!(
            slots.render_or("footer", &0, |_| "default".to_string()),
            "default"
        );
    }

    #[test]
    fn test_names_in_registration_order() {
        let slots: SlotRegistry<(), ()> = SlotRegistry::builder()
            .slot("header", |_| ())
            .slot("item", |_| ())
            .slot("footer", |_| ())
            .build();

        let names: Vec<&str> = slots.names().collect();
        assert_eq!(names, vec!["header", "item", "footer"]);
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn test_last_registration_wins() {
        let slots: SlotRegistry<(), &'static str> = SlotRegistry::builder()
            .slot("item", |_| "first")
            .slot("item", |_| "second")
            .build();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots.render("item", &()), Some("second"));
    }

    #[test]
    fn test_clone_shares_functions() {
        let slots: SlotRegistry<u32, u32> =
            SlotRegistry::builder().slot("double", |n| n * 2).build();
        let copy = slots.clone();

        assert_eq!(copy.render("double", &21), Some(42));
        assert_eq!(slots.render("double", &21), Some(42));
    }
}
