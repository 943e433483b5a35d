pub mod binder;
pub mod watcher;

pub use binder::{AttachOutcome, ControlProbe, PageControlProbe, TriggerBinder};
pub use watcher::{ChangeWatcher, MutationNotice, WatchOutcome, WatchSession};
