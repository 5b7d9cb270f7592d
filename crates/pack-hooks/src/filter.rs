//! Filter callback types

use serde_json::Value;

/// Outcome of one filter callback.
///
/// `Keep` carries the (possibly transformed) value onward through the
/// chain; `Remove` suppresses the fragment entirely, replacing the
/// original design's ambiguous `null` return convention with an
/// explicit variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered {
    Keep(Value),
    Remove,
}

impl Filtered {
    /// Convert into the kept value, `None` when removed.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Keep(value) => Some(value),
            Self::Remove => None,
        }
    }

    /// Whether the fragment was suppressed.
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Remove)
    }
}

/// Identifier for one registration, returned by
/// [`HookRegistry::add_filter`](crate::HookRegistry::add_filter).
///
/// Boxed closures have no useful equality, so removal is by id rather
/// than by callback reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(pub(crate) u64);

/// Extra arguments passed, unchanged, to every callback in a chain.
///
/// Replaces the variadic extra arguments of the original hook API with
/// the two values any composition seam actually forwards: the preset
/// mode driving the composition and a borrowed view of the caller's
/// configuration. Only the first positional value is threaded through
/// the fold; these stay constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterArgs<'a> {
    /// Name of the preset invoking the seam, e.g. `"development"`.
    pub preset: Option<&'a str>,
    /// The full caller-supplied configuration, when a preset is composing.
    pub config: Option<&'a Value>,
}

pub(crate) type FilterFn = dyn Fn(Value, &FilterArgs<'_>) -> Filtered + Send + Sync;
