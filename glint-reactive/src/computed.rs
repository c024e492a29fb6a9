//! # Computed signals
//!
//! A computed signal, [`Computed`], is a read-only signal whose value is
//! produced by a reactive function, that is, a function that depends on
//! other signals.
//!
//! Internally it's a plain signal kept up to date by an effect wrapping
//! the evaluator: every time any dependency of the evaluator changes, the
//! inner signal is re-set, notifying anything reading the computed.
//! Reading a computed inside another effect therefore subscribes that
//! effect to the inner signal, not to the evaluator's own dependencies,
//! so computed values compose by forwarding notifications.
//!
//! ## Examples
//! ```rust,no_run
//! use glint_reactive::{Computed, Signal, SignalGet, SignalSet};
//!
//! let a = Signal::new(2);
//! let doubled = Computed::new({
//! 	let a = a.clone();
//! 	move || a.get() * 2
//! });
//! assert_eq!(doubled.get(), 4);
//!
//! a.set(5);
//! assert_eq!(doubled.get(), 10);
//! ```

// Imports
use {
	crate::{Effect, Signal, SignalSet, SignalWith},
	core::fmt,
};

/// Computed signal.
///
/// See the module documentation for more information.
pub struct Computed<T: 'static> {
	/// Inner value signal
	value: Signal<Option<T>>,

	/// Effect keeping the value up to date
	effect: Effect,
}

impl<T: 'static> Computed<T> {
	/// Creates a new computed signal.
	///
	/// Evaluates `f` once, synchronously, and then again whenever any of
	/// its dependencies change.
	#[track_caller]
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> T + 'static,
	{
		let value = Signal::new(None);
		let effect = Effect::new({
			let value = value.clone();
			move || value.set(Some(f()))
		});

		Self { value, effect }
	}

	/// Disposes of the wrapping effect.
	///
	/// The computed stops updating; reads keep returning the last
	/// computed value.
	pub fn dispose(&self) {
		self.effect.dispose();
	}

	/// Uses the computed value, without gathering dependencies
	pub fn with_raw<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&T) -> O,
	{
		self.value
			.with_raw(|value| f(value.as_ref().expect("Computed value wasn't initialized")))
	}

	/// Gets the computed value, without gathering dependencies
	#[must_use]
	pub fn get_raw(&self) -> T
	where
		T: Copy,
	{
		self.with_raw(|value| *value)
	}

	/// Gets the computed value by cloning, without gathering dependencies
	#[must_use]
	pub fn get_cloned_raw(&self) -> T
	where
		T: Clone,
	{
		self.with_raw(Clone::clone)
	}
}

impl<T: 'static> SignalWith for Computed<T> {
	type Value = T;

	fn with<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&Self::Value) -> O,
	{
		self.value
			.with(|value| f(value.as_ref().expect("Computed value wasn't initialized")))
	}
}

impl<T> Clone for Computed<T> {
	fn clone(&self) -> Self {
		Self {
			value:  self.value.clone(),
			effect: self.effect.clone(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Computed").field("value", &self.value).finish()
	}
}
