//! Named, priority-ordered extension points
//!
//! Consumers register filter callbacks against string hook names;
//! invoking a hook folds a value through every registered callback in
//! ascending priority order. The registry is a plain owned value held
//! by a composition context, never process-global state.

pub mod filter;
pub mod registry;

pub use filter::{FilterArgs, FilterId, Filtered};
pub use registry::{HookRegistry, DEFAULT_PRIORITY};
