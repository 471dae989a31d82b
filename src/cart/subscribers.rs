//! Cart change subscriptions.

use std::fmt::{self, Debug, Formatter};

use slotmap::{SlotMap, new_key_type};

use crate::cart::CartState;

new_key_type! {
    /// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
    pub struct SubscriptionKey;
}

type Callback = Box<dyn FnMut(&CartState)>;

/// Registered callbacks, notified in subscription order.
#[derive(Default)]
pub(crate) struct Subscribers {
    callbacks: SlotMap<SubscriptionKey, Callback>,
    order: Vec<SubscriptionKey>,
}

impl Subscribers {
    pub(crate) fn insert(&mut self, callback: Callback) -> SubscriptionKey {
        let key = self.callbacks.insert(callback);
        self.order.push(key);

        key
    }

    pub(crate) fn remove(&mut self, key: SubscriptionKey) -> bool {
        if self.callbacks.remove(key).is_none() {
            return false;
        }

        self.order.retain(|&existing| existing != key);

        true
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn notify(&mut self, state: &CartState) {
        for key in &self.order {
            if let Some(callback) = self.callbacks.get_mut(*key) {
                callback(state);
            }
        }
    }
}

impl Debug for Subscribers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}
