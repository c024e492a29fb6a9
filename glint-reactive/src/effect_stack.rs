//! Effect stack
//!
//! Thread-local stack of currently running effects, used to
//! automatically subscribe signals read during an effect's execution.

// Imports
use {crate::Effect, core::cell::RefCell};

thread_local! {
	/// Effect stack
	static EFFECT_STACK: RefCell<Vec<Effect>> = const { RefCell::new(vec![]) };
}

/// Pushes an effect onto the stack.
pub(crate) fn push(effect: Effect) {
	EFFECT_STACK.with_borrow_mut(|effects| effects.push(effect));
}

/// Pops an effect from the stack
pub(crate) fn pop() {
	EFFECT_STACK
		.with_borrow_mut(Vec::pop)
		.expect("Missing added effect");
}

/// Returns the top effect of the stack
pub(crate) fn top() -> Option<Effect> {
	EFFECT_STACK.with_borrow(|effects| effects.last().cloned())
}

/// Runs `f` without gathering dependencies for the current effect.
///
/// Temporarily pops the currently running effect off the stack, so any
/// signals read within `f` don't subscribe it. If `f` itself creates
/// effects, those still gather their own dependencies as usual.
///
/// The popped effect is restored even if `f` panics.
pub fn untracked<F, O>(f: F) -> O
where
	F: FnOnce() -> O,
{
	let _guard = UntrackedGuard {
		effect: EFFECT_STACK.with_borrow_mut(Vec::pop),
	};
	f()
}

/// Guard that restores the popped effect on drop
struct UntrackedGuard {
	/// Effect to restore, if any
	effect: Option<Effect>,
}

impl Drop for UntrackedGuard {
	fn drop(&mut self) {
		if let Some(effect) = self.effect.take() {
			self::push(effect);
		}
	}
}
