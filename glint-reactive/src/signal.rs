//! Signal
//!
//! A read-write value that automatically updates
//! any subscribers when changed.

// Modules
pub mod ops;

// Exports
pub use self::ops::{SignalGet, SignalGetCloned, SignalReplace, SignalSet, SignalUpdate, SignalWith};

// Imports
use {
	crate::{ReadOnlySignal, Trigger},
	core::{cell::RefCell, fmt, mem},
	std::rc::Rc,
};

/// Inner
struct Inner<T> {
	/// Value
	value: RefCell<T>,

	/// Trigger
	trigger: Trigger,
}

/// Signal
pub struct Signal<T> {
	/// Inner
	inner: Rc<Inner<T>>,
}

impl<T> Signal<T> {
	/// Creates a new signal
	#[track_caller]
	pub fn new(value: T) -> Self {
		let inner = Inner {
			value:   RefCell::new(value),
			trigger: Trigger::new(),
		};
		Self { inner: Rc::new(inner) }
	}

	/// Returns a read-only view of this signal.
	///
	/// The view shares this signal's value and subscribers, so tracking
	/// is unchanged, only the write capability is removed.
	#[must_use]
	pub fn read_only(&self) -> ReadOnlySignal<T> {
		ReadOnlySignal::new(self.clone())
	}

	/// Uses the signal value, without gathering dependencies
	pub fn with_raw<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&T) -> O,
	{
		let value = self
			.inner
			.value
			.try_borrow()
			.expect("Cannot use signal value while updating");
		f(&value)
	}

	/// Gets the signal value, without gathering dependencies
	#[must_use]
	pub fn get_raw(&self) -> T
	where
		T: Copy,
	{
		self.with_raw(|value| *value)
	}

	/// Gets the signal value by cloning, without gathering dependencies
	#[must_use]
	pub fn get_cloned_raw(&self) -> T
	where
		T: Clone,
	{
		self.with_raw(Clone::clone)
	}
}

impl<T> SignalWith for Signal<T> {
	type Value = T;

	fn with<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&Self::Value) -> O,
	{
		self.inner.trigger.gather_subscribers();
		self.with_raw(f)
	}
}

impl<T> SignalSet<T> for Signal<T> {
	fn set(&self, new_value: T) {
		self.update(|value| *value = new_value);
	}
}

impl<T> SignalReplace<T> for Signal<T> {
	fn replace(&self, new_value: T) -> T {
		self.update(|value| mem::replace(value, new_value))
	}
}

impl<T> SignalUpdate for Signal<T> {
	type Value = T;

	fn update<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&mut Self::Value) -> O,
	{
		// Update the value and get the output
		let output = {
			let mut value = self
				.inner
				.value
				.try_borrow_mut()
				.expect("Cannot update signal value while using it");
			f(&mut value)
		};

		// Then trigger our trigger.
		// Note: Unconditionally, writes never compare against the
		//       previous value.
		self.inner.trigger.trigger();

		output
	}
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("Signal");
		match self.inner.value.try_borrow() {
			Ok(value) => s.field("value", &*value).field("trigger", &self.inner.trigger).finish(),
			Err(_) => s.finish_non_exhaustive(),
		}
	}
}

#[cfg(test)]
mod test {
	// Imports
	use super::*;

	#[test]
	fn get_and_set() {
		let signal = Signal::new(0);
		assert_eq!(signal.get(), 0);

		signal.set(42);
		assert_eq!(signal.get(), 42);
	}

	#[test]
	fn update() {
		let signal = Signal::new(10);
		signal.update(|value| *value += 5);
		assert_eq!(signal.get(), 15);
	}

	#[test]
	fn replace() {
		let signal = Signal::new("a");
		assert_eq!(signal.replace("b"), "a");
		assert_eq!(signal.get(), "b");
	}

	#[test]
	fn get_cloned() {
		let signal = Signal::new("abc".to_owned());
		assert_eq!(signal.get_cloned(), "abc");
		assert_eq!(signal.get_cloned_raw(), "abc");
	}

	#[test]
	fn clone_shares_state() {
		let signal1 = Signal::new(0);
		let signal2 = signal1.clone();

		signal1.set(42);
		assert_eq!(signal2.get(), 42);

		signal2.set(100);
		assert_eq!(signal1.get(), 100);
	}
}
