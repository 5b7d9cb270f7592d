//! Structural merging for configuration trees
//!
//! Provides the deep-merge composer used to layer caller overrides onto
//! preset defaults, dotted-path lookup into nested trees, and the
//! sentinel markers used to delete keys or suppress fragments.

pub mod merge;
pub mod path;
pub mod sentinel;

pub use merge::deep_merge;
pub use path::find_in;
