//! A no-op behavior model — agents never produce intents.

use crate::BehaviorModel;

/// A [`BehaviorModel`] that never produces intents from contacts or
/// messages.
///
/// Useful as a placeholder in tests or for "passive" agent populations that
/// simply occupy space during an activity without acting on it.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {}
