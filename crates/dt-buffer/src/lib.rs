//! `dt-buffer` — the double-buffered state mechanism and the `FlexiBarrier`
//! synchronization primitive that together let agent Roles observe each
//! other without locks on the hot path.
//!
//! # Crate layout
//!
//! | Module       | Contents                                           |
//! |--------------|-----------------------------------------------------|
//! | [`buffered`] | `DoubleBuffered<T>`, `BufferedField`, `FlipSet`     |
//! | [`barrier`]  | `FlexiBarrier`                                      |
//! | [`error`]    | `BufferError`, `BufferResult<T>`                    |
//!
//! # Why this crate hand-rolls a barrier
//!
//! `std::sync::Barrier` resets its own generation on each completed round,
//! but has no way for one thread to arrive "as" more than one party.  The
//! `contribute(k)` protocol — one Worker arriving on behalf of itself *and*
//! the sub-managed entities it sub-steps for — is not exposed by any
//! published barrier crate, so it is implemented directly here with
//! `Mutex`/`Condvar`, the same primitives a `Barrier` would use internally.

pub mod barrier;
pub mod buffered;
pub mod error;

#[cfg(test)]
mod tests;

pub use barrier::FlexiBarrier;
pub use buffered::{BufferedField, DoubleBuffered, FlipSet, Phase};
pub use error::{BufferError, BufferResult};
