//! Effect
//!
//! An effect is a function that is re-run whenever
//! one of it's dependencies changes.
//!
//! Dependencies are gathered automatically: any signal read while the
//! effect's body executes subscribes the effect to that signal. Before
//! every re-run the effect detaches from all of its previous dependencies,
//! so branches that stop reading a signal stop being re-run by it.
//!
//! An effect's body may return a cleanup function (via
//! [`Effect::new_with_cleanup`]), which is invoked before the next re-run
//! and when the effect is disposed.

// Imports
use {
	crate::{effect_stack, loc::Loc, trigger::WeakTrigger},
	core::{
		cell::{Cell, RefCell},
		fmt,
		hash::{Hash, Hasher},
		mem,
	},
	std::{
		collections::HashSet,
		panic::{self, AssertUnwindSafe},
		rc::Rc,
	},
};

/// Cleanup function, returned by an effect's body
type Cleanup = Box<dyn FnOnce()>;

/// Effect inner
struct Inner {
	/// Effect runner
	run: Box<dyn Fn() -> Option<Cleanup>>,

	/// Triggers this effect is currently subscribed to.
	///
	/// Rebuilt from scratch on every run.
	dependencies: RefCell<HashSet<WeakTrigger>>,

	/// Cleanup returned by the most recent run
	cleanup: RefCell<Option<Cleanup>>,

	/// Whether this effect has been disposed
	disposed: Cell<bool>,

	/// Where this effect was defined
	defined_loc: Loc,
}

/// Effect
///
/// Cheaply cloneable handle. Clones compare equal and share the
/// underlying computation; any of them may be used to [`dispose`](Self::dispose)
/// it.
///
/// Note that signals hold their subscribers strongly, so an effect keeps
/// re-running even after all handles to it are dropped, until it's
/// disposed or every signal it depends on is gone.
pub struct Effect {
	/// Inner
	inner: Rc<Inner>,
}

impl Effect {
	/// Creates a new effect.
	///
	/// Runs the effect once, synchronously, to gather dependencies.
	#[track_caller]
	pub fn new<F>(run: F) -> Self
	where
		F: Fn() + 'static,
	{
		Self::new_inner(
			Box::new(move || {
				run();
				None
			}),
			Loc::caller(),
		)
	}

	/// Creates a new effect whose body returns a cleanup function.
	///
	/// The cleanup is invoked before each re-run and once when
	/// the effect is disposed.
	#[track_caller]
	pub fn new_with_cleanup<F, C>(run: F) -> Self
	where
		F: Fn() -> C + 'static,
		C: FnOnce() + 'static,
	{
		Self::new_inner(Box::new(move || Some(Box::new(run()) as Cleanup)), Loc::caller())
	}

	/// Creates the effect and runs it once
	fn new_inner(run: Box<dyn Fn() -> Option<Cleanup>>, defined_loc: Loc) -> Self {
		let inner = Inner {
			run,
			dependencies: RefCell::new(HashSet::new()),
			cleanup: RefCell::new(None),
			disposed: Cell::new(false),
			defined_loc,
		};
		let effect = Self { inner: Rc::new(inner) };

		// And run it once to gather dependencies.
		effect.run();

		effect
	}

	/// Returns a unique identifier to this effect.
	///
	/// Cloning the effect will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.inner).addr()
	}

	/// Returns where this effect was defined
	pub(crate) fn defined_loc(&self) -> Loc {
		self.inner.defined_loc
	}

	/// Returns whether this effect has been disposed
	#[must_use]
	pub fn is_disposed(&self) -> bool {
		self.inner.disposed.get()
	}

	/// Runs the effect.
	///
	/// Detaches from all previous dependencies, invokes the pending
	/// cleanup, then re-runs the body with this effect on top of the
	/// effect stack, gathering dependencies anew.
	///
	/// Does nothing if the effect has been disposed. If the body panics,
	/// the effect stack is still restored and the panic propagates to
	/// whoever triggered the run.
	pub fn run(&self) {
		if self.inner.disposed.get() {
			return;
		}

		// Detach from the previous run's dependencies and run the cleanup
		self.detach();

		// Push the effect, run the body and pop it.
		// Note: Popping via guard, so that a panicking body
		//       doesn't corrupt the stack for unrelated effects.
		effect_stack::push(self.clone());
		let _guard = PopGuard;
		let cleanup = (self.inner.run)();

		*self.inner.cleanup.borrow_mut() = cleanup;
	}

	/// Disposes of this effect.
	///
	/// Detaches it from all dependencies and invokes the pending cleanup.
	/// Once disposed, the effect never re-runs, even if a previously
	/// tracked signal is written. Idempotent.
	pub fn dispose(&self) {
		if self.inner.disposed.replace(true) {
			return;
		}

		self.detach();
	}

	/// Registers `trigger` as a dependency of this effect
	pub(crate) fn add_dependency(&self, trigger: WeakTrigger) {
		self.inner.dependencies.borrow_mut().insert(trigger);
	}

	/// Detaches this effect from all of its dependencies, then invokes
	/// the pending cleanup, if any.
	///
	/// A panicking cleanup is caught and logged, so that it cannot abort
	/// the dependency detachment of a later run.
	fn detach(&self) {
		let dependencies = mem::take(&mut *self.inner.dependencies.borrow_mut());
		for trigger in dependencies {
			if let Some(trigger) = trigger.upgrade() {
				trigger.remove_subscriber(self);
			}
		}

		if let Some(cleanup) = self.inner.cleanup.borrow_mut().take() {
			if panic::catch_unwind(AssertUnwindSafe(cleanup)).is_err() {
				tracing::warn!(effect=?self, "Effect cleanup panicked");
			}
		}
	}
}

impl PartialEq for Effect {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for Effect {}

impl Clone for Effect {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl Hash for Effect {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id().hash(state);
	}
}

impl fmt::Debug for Effect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id())
			.field("defined_loc", &self.defined_loc())
			.field("disposed", &self.inner.disposed.get())
			.finish_non_exhaustive()
	}
}

/// Guard that pops the top effect of the stack on drop
struct PopGuard;

impl Drop for PopGuard {
	fn drop(&mut self) {
		effect_stack::pop();
	}
}

/// Returns the current running effect
#[must_use]
pub fn running() -> Option<Effect> {
	effect_stack::top()
}
