//! Signal operators

/// Signal with
///
/// The fundamental read operation: all other reads are built on it.
pub trait SignalWith {
	/// Value type
	type Value;

	/// Uses the signal value
	fn with<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&Self::Value) -> O;
}

/// Signal get
pub trait SignalGet {
	/// Value type
	type Value;

	/// Gets the signal value, by copying it.
	fn get(&self) -> Self::Value;
}

impl<S> SignalGet for S
where
	S: SignalWith,
	S::Value: Copy,
{
	type Value = <S as SignalWith>::Value;

	fn get(&self) -> Self::Value {
		self.with(|value| *value)
	}
}

/// Signal get, cloned
pub trait SignalGetCloned {
	/// Value type
	type Value;

	/// Gets the signal value, by cloning it.
	fn get_cloned(&self) -> Self::Value;
}

impl<S> SignalGetCloned for S
where
	S: SignalWith,
	S::Value: Clone,
{
	type Value = <S as SignalWith>::Value;

	fn get_cloned(&self) -> Self::Value {
		self.with(Clone::clone)
	}
}

/// Signal set
pub trait SignalSet<Value> {
	/// Sets the signal value.
	///
	/// Always notifies subscribers, even if `new_value` is equal
	/// to the current value.
	fn set(&self, new_value: Value);
}

/// Signal replace
pub trait SignalReplace<Value> {
	/// Replaces the signal value, returning the previous value
	fn replace(&self, new_value: Value) -> Value;
}

/// Signal update
pub trait SignalUpdate {
	/// Value type
	type Value;

	/// Updates the signal value, notifying subscribers afterwards
	fn update<F, O>(&self, f: F) -> O
	where
		F: FnOnce(&mut Self::Value) -> O;
}
