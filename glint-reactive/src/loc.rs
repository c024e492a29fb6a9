//! Location

// Imports
use core::{fmt, panic::Location};

/// Location
///
/// Records where a reactive primitive was defined, for diagnostics.
#[derive(PartialEq, Eq, Clone, Copy, Hash)]
#[derive(derive_more::Display)]
pub(crate) struct Loc {
	/// Inner location
	location: &'static Location<'static>,
}

impl Loc {
	/// Gets the caller's location
	#[track_caller]
	pub(crate) const fn caller() -> Self {
		Self {
			location: Location::caller(),
		}
	}
}

impl fmt::Debug for Loc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.location, f)
	}
}
