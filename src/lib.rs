//! posepick — pick one item from an ordered pose catalog with continuous
//! hand-tracking input.
//!
//! The engine is tick-driven: the host feeds one [`sample::TrackingSample`]
//! per tick into a [`session::Session`], which stabilizes the tracked
//! height around a dead-band, scrolls a window over the catalog (circle
//! gestures and edge proximity), optionally filters the catalog by finger
//! extension, and resolves a stable selection index. Rendering, the event
//! loop and pose application stay with the host behind the
//! [`session::PoseApplier`] trait.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod flags;
pub mod gestures;
pub mod resolver;
pub mod sample;
pub mod session;
pub mod stabilizer;
pub mod window;
