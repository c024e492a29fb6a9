//! Trigger
//!
//! A reactivity primitive that allows re-running
//! any subscribers.
//!
//! Each signal owns a trigger, which keeps the set of effects subscribed
//! to it. Triggering it either re-runs those effects immediately or, while
//! a batch is active, defers them into the run queue.

// Imports
use {
	crate::{Effect, effect_stack, loc::Loc, run_queue},
	core::{
		cell::RefCell,
		fmt,
		hash::{Hash, Hasher},
	},
	std::{
		collections::HashSet,
		rc::{Rc, Weak},
	},
};

/// Trigger inner
struct Inner {
	/// Subscribers.
	///
	/// Set semantics: re-adding an existing subscriber is a no-op.
	/// Subscribers are held strongly, see [`Effect`] for the lifetime
	/// implications.
	subscribers: RefCell<HashSet<Effect>>,

	/// Where this trigger was defined
	defined_loc: Loc,
}

/// Trigger
pub struct Trigger {
	/// Inner
	inner: Rc<Inner>,
}

impl Trigger {
	/// Creates a new trigger
	#[must_use]
	#[track_caller]
	pub fn new() -> Self {
		let inner = Inner {
			subscribers: RefCell::new(HashSet::new()),
			defined_loc: Loc::caller(),
		};
		Self { inner: Rc::new(inner) }
	}

	/// Downgrades this trigger
	#[must_use]
	pub fn downgrade(&self) -> WeakTrigger {
		WeakTrigger {
			inner: Rc::downgrade(&self.inner),
		}
	}

	/// Returns where this trigger was defined
	pub(crate) fn defined_loc(&self) -> Loc {
		self.inner.defined_loc
	}

	/// Returns a unique identifier to this trigger.
	///
	/// Downgrading and cloning the trigger will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.inner).addr()
	}

	/// Gathers the currently running effect as a subscriber of this
	/// trigger.
	///
	/// If no effect is running, does nothing. Called by signals on every
	/// tracked read.
	pub fn gather_subscribers(&self) {
		if let Some(effect) = effect_stack::top() {
			self.add_subscriber(effect);
		}
	}

	/// Adds a subscriber to this trigger.
	///
	/// Also records the back-edge on the effect, so it can unsubscribe
	/// itself before its next run.
	pub fn add_subscriber<S>(&self, subscriber: S)
	where
		S: IntoSubscriber,
	{
		let effect = subscriber.into_subscriber();
		effect.add_dependency(self.downgrade());
		self.inner.subscribers.borrow_mut().insert(effect);
	}

	/// Removes a subscriber from this trigger
	pub(crate) fn remove_subscriber(&self, effect: &Effect) {
		self.inner.subscribers.borrow_mut().remove(effect);
	}

	/// Triggers this trigger.
	///
	/// Outside of a batch, synchronously re-runs every current subscriber.
	/// Within a batch, adds them to the run queue instead, deduplicated,
	/// to be run once when the outermost batch ends.
	///
	/// Note: The subscriber set is snapshot before running, since effects
	///       unsubscribe and re-subscribe themselves mid-run.
	pub fn trigger(&self) {
		let subscribers = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.cloned()
			.collect::<Vec<_>>();

		if run_queue::is_batching() {
			for effect in subscribers {
				run_queue::enqueue(effect);
			}
			return;
		}

		for effect in subscribers {
			tracing::trace!(
				trigger=?self,
				effect=?effect,
				"Running effect due to trigger"
			);
			effect.run();
		}
	}
}

impl Default for Trigger {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for Trigger {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for Trigger {}

impl Clone for Trigger {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl Hash for Trigger {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id().hash(state);
	}
}

impl fmt::Debug for Trigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Trigger")
			.field("id", &self.id())
			.field("defined_loc", &self.defined_loc())
			.finish()
	}
}

/// Weak trigger
///
/// Back-edge stored by effects, so that a trigger isn't kept alive
/// by its own subscribers.
pub struct WeakTrigger {
	/// Inner
	inner: Weak<Inner>,
}

impl WeakTrigger {
	/// Creates an empty weak trigger
	#[must_use]
	pub const fn new() -> Self {
		Self { inner: Weak::new() }
	}

	/// Returns a unique identifier to this trigger.
	///
	/// Upgrading and cloning the trigger will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Weak::as_ptr(&self.inner).addr()
	}

	/// Upgrades this weak trigger
	#[must_use]
	pub fn upgrade(&self) -> Option<Trigger> {
		let inner = self.inner.upgrade()?;
		Some(Trigger { inner })
	}
}

impl Default for WeakTrigger {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for WeakTrigger {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for WeakTrigger {}

impl Clone for WeakTrigger {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl Hash for WeakTrigger {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id().hash(state);
	}
}

impl fmt::Debug for WeakTrigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("WeakTrigger");

		match self.upgrade() {
			Some(trigger) => s.field("id", &trigger.id()).finish(),
			None => s.finish_non_exhaustive(),
		}
	}
}

/// Types that may be converted into a subscriber
pub trait IntoSubscriber {
	fn into_subscriber(self) -> Effect;
}

#[duplicate::duplicate_item(
	T body;
	[ Effect ] [ self ];
	[ &'_ Effect ] [ self.clone() ];
)]
impl IntoSubscriber for T {
	fn into_subscriber(self) -> Effect {
		body
	}
}

#[cfg(test)]
mod test {
	// Imports
	use {super::*, core::cell::Cell};

	#[test]
	fn basic() {
		let runs = Rc::new(Cell::new(0));

		let trigger = Trigger::new();
		let effect = Effect::new({
			let trigger = trigger.clone();
			let runs = Rc::clone(&runs);
			move || {
				trigger.gather_subscribers();
				runs.set(runs.get() + 1);
			}
		});

		assert_eq!(runs.get(), 1, "Trigger was triggered early");

		// Then trigger and ensure it was triggered
		trigger.trigger();
		assert_eq!(runs.get(), 2, "Trigger was not triggered");

		// Finally dispose the effect and try again
		effect.dispose();
		trigger.trigger();
		assert_eq!(runs.get(), 2, "Trigger was triggered after effect was disposed");
	}

	/// Ensures re-adding a subscriber mid-run doesn't run it twice per trigger
	#[test]
	fn subscriber_dedup() {
		let runs = Rc::new(Cell::new(0));

		let trigger = Trigger::new();
		let _effect = Effect::new({
			let trigger = trigger.clone();
			let runs = Rc::clone(&runs);
			move || {
				// Multiple reads of the same signal only subscribe once
				trigger.gather_subscribers();
				trigger.gather_subscribers();
				runs.set(runs.get() + 1);
			}
		});

		trigger.trigger();
		assert_eq!(runs.get(), 2, "Effect was run more than once per trigger");
	}

	#[test]
	fn weak_trigger_empty() {
		let trigger = WeakTrigger::new();
		assert_eq!(trigger.upgrade(), None);
	}

	#[test]
	fn trigger_upgrade() {
		let trigger = Trigger::new();
		let weak = trigger.downgrade();

		assert_eq!(Some(trigger), weak.upgrade());
	}
}
