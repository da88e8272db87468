//! Random identifiers for doors and timer registrations.

use std::fmt;

use serde::Serialize;

macro_rules! random_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

random_id!(
    /// Identifies a [`Door`](crate::door::Door) and the adapter bound to it.
    DoorId
);

random_id!(
    /// Identifies one scheduled timer, in logs and on the failure bus.
    TimerId
);
