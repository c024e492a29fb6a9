//! Read-only signals
//!
//! A capability-restriction view over a [`Signal`]: it shares the
//! underlying value and subscriber set, so tracking semantics are
//! unchanged, but the write operations simply don't exist on it.

// Imports
use {
	crate::{Signal, SignalWith},
	core::fmt,
};

/// Read-only signal
pub struct ReadOnlySignal<T> {
	/// Underlying signal
	signal: Signal<T>,
}

impl<T> ReadOnlySignal<T> {
	/// Creates a read-only view over `signal`
	pub(crate) fn new(signal: Signal<T>) -> Self {
		Self { signal }
	}

	/// Uses the signal value, without gathering dependencies
	pub fn with_raw<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&T) -> O,
	{
		self.signal.with_raw(f)
	}

	/// Gets the signal value, without gathering dependencies
	#[must_use]
	pub fn get_raw(&self) -> T
	where
		T: Copy,
	{
		self.signal.get_raw()
	}

	/// Gets the signal value by cloning, without gathering dependencies
	#[must_use]
	pub fn get_cloned_raw(&self) -> T
	where
		T: Clone,
	{
		self.signal.get_cloned_raw()
	}
}

impl<T> SignalWith for ReadOnlySignal<T> {
	type Value = T;

	fn with<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&Self::Value) -> O,
	{
		self.signal.with(f)
	}
}

impl<T> From<Signal<T>> for ReadOnlySignal<T> {
	fn from(signal: Signal<T>) -> Self {
		Self::new(signal)
	}
}

impl<T> Clone for ReadOnlySignal<T> {
	fn clone(&self) -> Self {
		Self {
			signal: self.signal.clone(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for ReadOnlySignal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReadOnlySignal").field("signal", &self.signal).finish()
	}
}
