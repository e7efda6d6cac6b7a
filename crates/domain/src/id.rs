//! Typed identifier newtypes backed by UUIDs.

use std::fmt;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random (v4) identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Unique identifier of a row in the `users` table.
    UserId
);

define_id!(
    /// Unique identifier of a row in the `posts` table.
    PostId
);

define_id!(
    /// Unique identifier of a comment, shared by both comment projections.
    CommentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = CommentId::new();
        let b = CommentId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_generate_version_four_uuids() {
        let id = CommentId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn should_display_as_hyphenated_uuid() {
        let uuid = uuid::Uuid::new_v4();
        assert_eq!(PostId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn should_wrap_existing_uuid_when_using_from_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }
}
