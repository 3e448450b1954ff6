//! Validated identifier newtypes shared across the domain.
//!
//! Each identifier wraps a UUID and serialises transparently as its string
//! form. Construction from untrusted input goes through `parse`, which
//! rejects anything that is not a well-formed UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation failure raised when parsing an identifier from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidId {
    kind: &'static str,
}

impl InvalidId {
    fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

impl fmt::Display for InvalidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be a valid UUID", self.kind)
    }
}

impl std::error::Error for InvalidId {}

macro_rules! define_id {
    (
        $(#[$outer:meta])*
        $name:ident, $label:literal
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Validate and construct from string input.
            pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidId> {
                Uuid::parse_str(raw.as_ref())
                    .map(Self)
                    .map_err(|_| InvalidId::new($label))
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id! {
    /// Stable identifier for an application user.
    UserId, "user id"
}

define_id! {
    /// Stable identifier for a team (top-level tenant).
    TeamId, "team id"
}

define_id! {
    /// Stable identifier for an installer group (sub-tenant within a team).
    InstallerGroupId, "installer group id"
}

define_id! {
    /// Stable identifier for a lead.
    LeadId, "lead id"
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn parse_accepts_canonical_uuids() {
        let id = TeamId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = LeadId::parse("not-a-uuid").expect_err("invalid uuid");
        assert!(err.to_string().contains("lead id"));
    }

    #[test]
    fn serde_round_trips_as_string() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialise");
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[test]
    fn from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        assert_eq!(InstallerGroupId::from_uuid(uuid).as_uuid(), &uuid);
    }
}
