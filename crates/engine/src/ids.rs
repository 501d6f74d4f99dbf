//! Opaque identifiers.
//!
//! Ids are compared by value, never by identity: the same expense loaded twice
//! from storage carries equal ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Fresh random id (UUID v4).
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identity of a group member.
    MemberId
);
string_id!(
    /// Identity of a recorded expense.
    ExpenseId
);
string_id!(
    /// Identity of a group (the partition members and expenses live in).
    GroupId
);

const UNKNOWN_MEMBER: &str = "__unknown__";

impl MemberId {
    /// Synthetic bucket collecting amounts booked against members that are not
    /// part of the snapshot (deleted or archived members).
    pub fn unknown() -> Self {
        Self(UNKNOWN_MEMBER.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_MEMBER
    }
}
