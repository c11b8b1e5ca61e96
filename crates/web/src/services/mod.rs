//! Business services sitting between routes and the store.

pub mod mirror;
pub mod pulse;

pub use mirror::{LocalMirror, MemoryMirror, MirrorError, SessionMirror};
pub use pulse::{Outcome, PulseError, PulseService, Submission};
