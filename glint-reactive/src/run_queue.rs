//! Run queue
//!
//! Batching coordinator: while a batch is active, triggered effects are
//! deferred into a deduplicated queue instead of running immediately.
//! The queue is flushed once, when the outermost batch ends.

// Imports
use {
	crate::Effect,
	core::{cell::RefCell, cmp::Reverse},
	priority_queue::PriorityQueue,
	std::thread,
};

/// Inner type for the queue impl
struct Inner {
	/// Queue.
	///
	/// Keyed by effect identity, so an effect triggered multiple times
	/// within a batch only runs once. The priority keeps enqueue order,
	/// although ordering isn't part of the contract.
	queue: PriorityQueue<Effect, Reverse<usize>>,

	/// Next index
	next: usize,

	/// Current batch depth.
	///
	/// Nested batches collapse: only the transition back to 0 flushes.
	depth: usize,

	/// Whether currently executing the queue
	is_exec: bool,
}

impl Inner {
	fn new() -> Self {
		Self {
			queue: PriorityQueue::new(),
			next: 0,
			depth: 0,
			is_exec: false,
		}
	}
}

thread_local! {
	/// Run queue
	static RUN_QUEUE: RefCell<Inner> = RefCell::new(Inner::new());
}

/// Runs `f` within a batch.
///
/// While the batch is active, any triggered effects are deferred and
/// deduplicated; each distinct effect runs exactly once after the
/// outermost batch ends. Batches may be nested, only the outermost one
/// flushes.
///
/// If `f` panics, the batch is still closed, but deferred effects are
/// discarded without running.
pub fn batch<F, O>(f: F) -> O
where
	F: FnOnce() -> O,
{
	RUN_QUEUE.with_borrow_mut(|inner| inner.depth += 1);
	let _guard = BatchGuard;
	f()
}

/// Returns whether a batch is currently active
pub(crate) fn is_batching() -> bool {
	RUN_QUEUE.with_borrow(|inner| inner.depth > 0)
}

/// Pushes an effect onto the queue.
///
/// Re-pushing an already queued effect keeps it deduplicated; it runs
/// once, at its latest-enqueue position.
pub(crate) fn enqueue(effect: Effect) {
	RUN_QUEUE.with_borrow_mut(|inner| {
		let next = Reverse(inner.next);
		inner.queue.push_decrease(effect, next);
		inner.next += 1;
	});
}

/// Pops the effect at the front of the queue
fn pop() -> Option<Effect> {
	RUN_QUEUE.with_borrow_mut(|inner| {
		let (effect, _) = inner.queue.pop()?;
		if inner.queue.is_empty() {
			inner.next = 0;
		}
		Some(effect)
	})
}

/// Guard that closes a batch on drop.
///
/// On the outermost batch, flushes the queue, unless unwinding,
/// in which case the queue is discarded instead.
struct BatchGuard;

impl Drop for BatchGuard {
	fn drop(&mut self) {
		let flush = RUN_QUEUE.with_borrow_mut(|inner| {
			inner.depth = inner
				.depth
				.checked_sub(1)
				.expect("Attempted to close a batch that wasn't open");
			if inner.depth > 0 {
				return false;
			}

			if thread::panicking() {
				inner.queue.clear();
				inner.next = 0;
				return false;
			}

			// A flush may itself open and close batches, don't
			// re-enter the flush loop from those.
			if inner.is_exec || inner.queue.is_empty() {
				return false;
			}
			inner.is_exec = true;
			true
		});

		if flush {
			let _exec_guard = ExecGuard;
			while let Some(effect) = self::pop() {
				tracing::trace!(
					effect=?effect,
					"Running effect due to batch flush"
				);
				effect.run();
			}
		}
	}
}

/// Execution guard
struct ExecGuard;

impl Drop for ExecGuard {
	fn drop(&mut self) {
		RUN_QUEUE.with_borrow_mut(|inner| {
			inner.is_exec = false;

			// If an effect panicked mid-flush, discard the rest of the
			// queue, same policy as a panicking batch body.
			if thread::panicking() {
				inner.queue.clear();
				inner.next = 0;
			}
		});
	}
}
