//! `DoubleBuffered<T>` — the current/next/flip state mechanism (§4.1).
//!
//! # Design
//!
//! Each buffered field is a `(current, next, dirty)` triple behind `Cell`,
//! not `RefCell`: `T: Copy` so reads and writes are plain value copies, no
//! borrow ever escapes. This means `get`/`set`/`flip` all take `&self`,
//! which is what lets one `Rc<DoubleBuffered<T>>` be held both by the
//! owning Agent/Role (for `set`) and by the Worker's [`FlipSet`] (for
//! `flip`) without any borrow-checker friction — the two holders never
//! need `&mut` at the same time because the protocol itself (Tick vs.
//! Flip) already guarantees they never run concurrently.
//!
//! `DoubleBuffered` is deliberately `!Sync`/`!Send`-by-convention (never
//! shared across a thread boundary): each Agent belongs to exactly one
//! Worker thread for its entire lifetime, migrating only during the Flip
//! phase under the coordinator's control, at which point the `Rc` simply
//! moves with it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Which phase of the tick barrier cycle the calling thread is currently in.
///
/// Used only for debug-build precondition checks (§4.1's "failure modes").
/// Release builds skip the check entirely — the field is `#[cfg(debug_assertions)]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Tick,
    Flip,
    Aura,
}

thread_local! {
    static CURRENT_PHASE: Cell<Phase> = const { Cell::new(Phase::Tick) };
}

/// Record which phase this Worker thread has entered. Called once by the
/// Worker at the start of each phase of its macro-step loop (§4.5).
pub fn set_current_phase(phase: Phase) {
    CURRENT_PHASE.with(|p| p.set(phase));
}

/// The phase the calling thread believes it is in.
pub fn current_phase() -> Phase {
    CURRENT_PHASE.with(|p| p.get())
}

// ── DoubleBuffered<T> ───────────────────────────────────────────────────────────

/// A published field with two slots, `current` and `next`.
///
/// See module docs and §4.1 for the full contract.
pub struct DoubleBuffered<T: Copy> {
    current: Cell<T>,
    next: Cell<T>,
    dirty: Cell<bool>,
}

impl<T: Copy> DoubleBuffered<T> {
    /// Construct a field with both slots initialized to `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            current: Cell::new(initial),
            next: Cell::new(initial),
            dirty: Cell::new(false),
        }
    }

    /// Returns `current`. Callable from any reader at any phase.
    #[inline]
    pub fn get(&self) -> T {
        self.current.get()
    }

    /// Assigns `v` to `next`, marks dirty. Only legal in the Tick phase,
    /// from the owner.
    ///
    /// In debug builds, calling this outside the Tick phase trips a
    /// `debug_assert!` (a precondition violation, §7 kind 3). In release
    /// builds the out-of-phase write is logged once via `log::error!` and
    /// still applied — halting the simulation over a logging-only
    /// violation would be worse than the bug it is flagging.
    #[inline]
    pub fn set(&self, v: T) {
        #[cfg(debug_assertions)]
        {
            let phase = current_phase();
            debug_assert!(
                phase == Phase::Tick,
                "DoubleBuffered::set called outside Tick phase (was {phase:?})"
            );
        }
        #[cfg(not(debug_assertions))]
        {
            if current_phase() != Phase::Tick {
                log::error!("DoubleBuffered::set called outside Tick phase");
            }
        }
        self.next.set(v);
        self.dirty.set(true);
    }

    /// If dirty, copies `next` into `current` and clears dirty. Called
    /// exactly once per field per tick by the Worker during the Flip phase.
    #[inline]
    pub fn flip(&self) {
        if self.dirty.get() {
            self.current.set(self.next.get());
            self.dirty.set(false);
        }
    }

    /// `true` if `set` has been called since the last `flip`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for DoubleBuffered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleBuffered")
            .field("current", &self.current.get())
            .field("next", &self.next.get())
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

// ── FlipSet ───────────────────────────────────────────────────────────────────

/// A type-erased handle to one buffered field, so a Worker's [`FlipSet`] can
/// hold fields of heterogeneous `T` and walk them uniformly at Flip.
pub trait BufferedField {
    fn flip(&self);
}

impl<T: Copy> BufferedField for Rc<DoubleBuffered<T>> {
    #[inline]
    fn flip(&self) {
        DoubleBuffered::flip(self)
    }
}

/// The set of buffered fields a Worker must flip once per macro-step.
///
/// Fields are added when a Role (re)builds its subscription list (on
/// construction, or when it replaces a previous Role) and removed when
/// that Role is retired — see §3's "Buffered field" lifecycle and §4.8's
/// Role-swap protocol.
#[derive(Default)]
pub struct FlipSet {
    fields: Vec<Rc<dyn BufferedField>>,
}

impl FlipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a buffered field; it will be flipped on every subsequent
    /// Flip phase until [`unsubscribe_from`](Self::retain) removes it.
    pub fn subscribe(&mut self, field: Rc<dyn BufferedField>) {
        self.fields.push(field);
    }

    /// Subscribe every field in a Role's `subscriptionList()`.
    pub fn subscribe_all(&mut self, fields: impl IntoIterator<Item = Rc<dyn BufferedField>>) {
        self.fields.extend(fields);
    }

    /// Invoke `flip()` on every subscribed field. Called exactly once per
    /// macro-step by the owning Worker, during the Flip phase.
    pub fn flip_all(&self) {
        for field in &self.fields {
            field.flip();
        }
    }

    /// Number of currently subscribed fields — mostly useful for tests and
    /// diagnostics.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
