#![forbid(unsafe_code)]

//! Ordered listener lists with explicit unregistration.

/// Unregister handle returned by every `on_*` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw id value (stable for the lifetime of the owning component).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Allocates [`ListenerId`]s that are unique across all listener sets of one
/// component, so a single `remove_listener(id)` can search every set.
#[derive(Debug, Clone, Default)]
pub struct ListenerIds {
    next: u64,
}

impl ListenerIds {
    pub fn next_id(&mut self) -> ListenerId {
        self.next = self.next.saturating_add(1);
        ListenerId(self.next)
    }
}

type Callback<E> = Box<dyn FnMut(&E)>;

/// Listeners for one event type, invoked in registration order.
pub struct ListenerSet<E> {
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> std::fmt::Debug for ListenerSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<E> Default for ListenerSet<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> ListenerSet<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener under `id`.
    pub fn add(&mut self, id: ListenerId, callback: impl FnMut(&E) + 'static) {
        self.entries.push((id, Box::new(callback)));
    }

    /// Remove the listener registered under `id`. Returns `false` when it was
    /// never registered or is already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Invoke every listener with `event`.
    pub fn emit(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
