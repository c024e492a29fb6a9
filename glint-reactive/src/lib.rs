//! Reactivity for `glint`
//!
//! A minimal push-based fine-grained reactivity core: reading a
//! [`Signal`] inside a running [`Effect`] records the dependency
//! automatically, and writing the signal re-runs every dependent effect,
//! exactly once per logical update when using [`batch`].
//!
//! Everything is synchronous and single-threaded; the tracking stack and
//! the run queue are thread-local, so each thread is an isolated reactive
//! runtime.
//!
//! ```rust,no_run
//! use glint_reactive::{Effect, Signal, SignalGet, SignalSet, batch};
//!
//! let a = Signal::new(1);
//! let b = Signal::new(2);
//!
//! let effect = Effect::new({
//! 	let (a, b) = (a.clone(), b.clone());
//! 	move || println!("a + b = {}", a.get() + b.get())
//! });
//!
//! // Re-runs the effect once, not twice
//! batch(|| {
//! 	a.set(10);
//! 	b.set(20);
//! });
//!
//! effect.dispose();
//! ```

// Modules
pub mod computed;
pub mod effect;
mod effect_stack;
mod loc;
pub mod read_only;
pub mod run_queue;
pub mod signal;
pub mod trigger;

// Exports
pub use self::{
	computed::Computed,
	effect::Effect,
	effect_stack::untracked,
	read_only::ReadOnlySignal,
	run_queue::batch,
	signal::{Signal, SignalGet, SignalGetCloned, SignalReplace, SignalSet, SignalUpdate, SignalWith},
	trigger::{IntoSubscriber, Trigger, WeakTrigger},
};
