//! Batching tests

// Imports
use {
	core::cell::Cell,
	glint_reactive::{Effect, Signal, SignalGet, SignalSet, batch},
	std::{
		panic::{self, AssertUnwindSafe},
		rc::Rc,
	},
};

/// Counter helper
fn counter() -> (Rc<Cell<usize>>, impl Fn() + Clone) {
	let count = Rc::new(Cell::new(0));
	let bump = {
		let count = Rc::clone(&count);
		move || count.set(count.get() + 1)
	};
	(count, bump)
}

/// N writes inside one batch re-run a dependent effect exactly once.
#[test]
fn batch_dedups_writes() {
	let a = Signal::new(1);
	let b = Signal::new(2);
	let (runs, bump) = self::counter();

	let _effect = Effect::new({
		let (a, b) = (a.clone(), b.clone());
		move || {
			_ = a.get();
			_ = b.get();
			bump();
		}
	});
	assert_eq!(runs.get(), 1);

	batch(|| {
		a.set(10);
		b.set(20);

		// Writes are visible immediately, only notifications are deferred
		assert_eq!(a.get_raw(), 10);
		assert_eq!(runs.get(), 1, "Effect was run inside the batch");
	});
	assert_eq!(runs.get(), 2, "Effect wasn't run exactly once after the batch");
}

/// Repeated writes to the same signal also collapse to one run.
#[test]
fn batch_dedups_same_signal() {
	let a = Signal::new(0);
	let (runs, bump) = self::counter();

	let _effect = Effect::new({
		let a = a.clone();
		move || {
			_ = a.get();
			bump();
		}
	});

	batch(|| {
		for value in 0..10 {
			a.set(value);
		}
	});
	assert_eq!(runs.get(), 2, "Effect wasn't run exactly once for N batched writes");
	assert_eq!(a.get(), 9);
}

/// Nested batches collapse: only the outermost flushes.
#[test]
fn nested_batches_flush_once() {
	let a = Signal::new(0);
	let b = Signal::new(0);
	let (runs, bump) = self::counter();

	let _effect = Effect::new({
		let (a, b) = (a.clone(), b.clone());
		move || {
			_ = a.get();
			_ = b.get();
			bump();
		}
	});

	batch(|| {
		a.set(1);
		batch(|| b.set(1));
		assert_eq!(runs.get(), 1, "Inner batch flushed before the outermost ended");
	});
	assert_eq!(runs.get(), 2, "Effect wasn't run exactly once after the outermost batch");
}

/// Batch returns the closure's output.
#[test]
fn batch_returns_output() {
	assert_eq!(batch(|| 5), 5);
}

/// Distinct effects scheduled in one batch each run once.
#[test]
fn batch_runs_each_effect_once() {
	let a = Signal::new(0);
	let (runs_x, bump_x) = self::counter();
	let (runs_y, bump_y) = self::counter();

	let _x = Effect::new({
		let a = a.clone();
		move || {
			_ = a.get();
			bump_x();
		}
	});
	let _y = Effect::new({
		let a = a.clone();
		move || {
			_ = a.get();
			bump_y();
		}
	});

	batch(|| {
		a.set(1);
		a.set(2);
	});
	assert_eq!(runs_x.get(), 2);
	assert_eq!(runs_y.get(), 2);
}

/// If the batch body panics, the value writes stick but the pending
/// notifications are discarded, never flushed.
#[test]
fn batch_panic_discards_pending() {
	let a = Signal::new(1);
	let (runs, bump) = self::counter();

	let _effect = Effect::new({
		let a = a.clone();
		move || {
			_ = a.get();
			bump();
		}
	});
	assert_eq!(runs.get(), 1);

	let result = panic::catch_unwind(AssertUnwindSafe(|| {
		batch(|| {
			a.set(10);
			panic!("Batch body panic");
		})
	}));
	assert!(result.is_err(), "Batch swallowed the panic");

	// The write itself went through, but no notification was flushed
	assert_eq!(a.get_raw(), 10);
	assert_eq!(runs.get(), 1, "Pending effects were flushed on panic");

	// And batching still works afterwards
	batch(|| a.set(11));
	assert_eq!(runs.get(), 2, "Batching was broken after a panicking batch");
}

/// The same policy applies when an effect panics mid-flush: the panic
/// propagates and the rest of the queue is discarded, never flushed.
#[test]
fn effect_panic_mid_flush_discards_rest() {
	let a = Signal::new(0);
	let b = Signal::new(0);
	let armed = Rc::new(Cell::new(false));
	let (runs, bump) = self::counter();

	// Enqueued first during the batch, panics when armed
	let _panicking = Effect::new({
		let (a, armed) = (a.clone(), Rc::clone(&armed));
		move || {
			_ = a.get();
			if armed.get() {
				panic!("Effect body panic");
			}
		}
	});
	let _reader = Effect::new({
		let b = b.clone();
		move || {
			_ = b.get();
			bump();
		}
	});
	assert_eq!(runs.get(), 1);

	armed.set(true);
	let result = panic::catch_unwind(AssertUnwindSafe(|| {
		batch(|| {
			a.set(1);
			b.set(1);
		})
	}));
	assert!(result.is_err(), "Mid-flush panic wasn't propagated");
	assert_eq!(runs.get(), 1, "Effects after the panicking one were still flushed");

	// And batching still works afterwards
	armed.set(false);
	batch(|| b.set(2));
	assert_eq!(runs.get(), 2, "Batching was broken after a mid-flush panic");
}
