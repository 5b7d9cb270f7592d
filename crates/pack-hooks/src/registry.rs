//! Filter registry storage and application

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::debug;

use crate::filter::{FilterArgs, FilterFn, FilterId, Filtered};

/// Priority assumed when a registration or removal names none.
pub const DEFAULT_PRIORITY: i32 = 10;

struct Registration {
    id: FilterId,
    callback: Box<FilterFn>,
}

/// Named, priority-ordered callback chains.
///
/// Within one hook name, callbacks run in ascending numeric priority;
/// callbacks sharing a priority run in registration order. The same
/// callback may be registered any number of times and will run once per
/// registration. All operations are synchronous; a chain observes the
/// bucket order as it stood when the application started, since nothing
/// can re-enter the registry mid-fold.
pub struct HookRegistry {
    hooks: HashMap<String, BTreeMap<i32, Vec<Registration>>>,
    next_id: u64,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a callback at the default priority.
    pub fn add_filter<F>(&mut self, hook: impl Into<String>, callback: F) -> FilterId
    where
        F: Fn(Value, &FilterArgs<'_>) -> Filtered + Send + Sync + 'static,
    {
        self.add_filter_at(hook, DEFAULT_PRIORITY, callback)
    }

    /// Register a callback at an explicit priority. Lower runs first.
    pub fn add_filter_at<F>(&mut self, hook: impl Into<String>, priority: i32, callback: F) -> FilterId
    where
        F: Fn(Value, &FilterArgs<'_>) -> Filtered + Send + Sync + 'static,
    {
        let id = FilterId(self.next_id);
        self.next_id += 1;
        self.hooks
            .entry(hook.into())
            .or_default()
            .entry(priority)
            .or_default()
            .push(Registration {
                id,
                callback: Box::new(callback),
            });
        id
    }

    /// Remove a registration made at the default priority.
    pub fn remove_filter(&mut self, hook: &str, id: FilterId) -> bool {
        self.remove_filter_at(hook, DEFAULT_PRIORITY, id)
    }

    /// Remove a registration at an exact `(hook, priority)` pair.
    ///
    /// Fail-soft: an unknown hook, an empty priority bucket, or an id
    /// registered under a different priority leaves the registry
    /// untouched and returns `false`.
    pub fn remove_filter_at(&mut self, hook: &str, priority: i32, id: FilterId) -> bool {
        let bucket = self
            .hooks
            .get_mut(hook)
            .and_then(|buckets| buckets.get_mut(&priority));
        let Some(bucket) = bucket else {
            debug!(hook, priority, "remove_filter: no registrations at this priority");
            return false;
        };
        let before = bucket.len();
        bucket.retain(|registration| registration.id != id);
        let removed = bucket.len() < before;
        if !removed {
            debug!(hook, priority, ?id, "remove_filter: id not found at this priority");
        }
        removed
    }

    /// Pipe a value through every callback registered for `hook`.
    ///
    /// Callbacks run in ascending priority, insertion order within a
    /// priority, each receiving the previous callback's output plus the
    /// constant `args`. An unregistered hook is the identity function.
    /// A callback answering [`Filtered::Remove`] ends the chain and
    /// suppresses the value.
    pub fn apply_filters(&self, hook: &str, value: Value, args: &FilterArgs<'_>) -> Filtered {
        let Some(buckets) = self.hooks.get(hook) else {
            return Filtered::Keep(value);
        };
        let mut current = value;
        for registration in buckets.values().flatten() {
            match (registration.callback)(current, args) {
                Filtered::Keep(next) => current = next,
                Filtered::Remove => return Filtered::Remove,
            }
        }
        Filtered::Keep(current)
    }

    /// Registration ids for `hook` in execution order.
    pub fn filter_ids(&self, hook: &str) -> Vec<FilterId> {
        self.hooks
            .get(hook)
            .map(|buckets| {
                buckets
                    .values()
                    .flatten()
                    .map(|registration| registration.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any callback is registered for `hook`.
    pub fn has_filters(&self, hook: &str) -> bool {
        !self.filter_ids(hook).is_empty()
    }

    /// Drop every registration. Test isolation helper.
    pub fn clear(&mut self) {
        self.hooks.clear();
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
