/// Generic ownership guard
///
/// Every task, conversation, and message belongs to exactly one user, and
/// every read or write must verify that ownership before proceeding. This
/// module provides the single guard used for all three entity types, so the
/// check is written once instead of being duplicated per resource.
///
/// A missing resource and a resource owned by someone else are deliberately
/// indistinguishable to the caller: both yield `None`, which the API maps to
/// 404. This prevents leaking whether a given ID exists at all.
///
/// # Example
///
/// ```
/// use taskchat_shared::models::owned::{owned_by, Owned};
/// use uuid::Uuid;
///
/// struct Note {
///     user_id: Uuid,
/// }
///
/// impl Owned for Note {
///     fn owner_id(&self) -> Uuid {
///         self.user_id
///     }
/// }
///
/// let me = Uuid::new_v4();
/// let note = Note { user_id: me };
///
/// assert!(owned_by(Some(note), me).is_some());
/// assert!(owned_by(None::<Note>, me).is_none());
/// ```

use uuid::Uuid;

/// A resource with a single owning user
pub trait Owned {
    /// The ID of the user who owns this resource
    fn owner_id(&self) -> Uuid;
}

/// Filters an optional resource through the ownership check
///
/// Returns the resource only when it exists and belongs to `user_id`.
pub fn owned_by<T: Owned>(resource: Option<T>, user_id: Uuid) -> Option<T> {
    resource.filter(|r| r.owner_id() == user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        user_id: Uuid,
    }

    impl Owned for Widget {
        fn owner_id(&self) -> Uuid {
            self.user_id
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let widget = Widget { user_id: owner };

        assert!(owned_by(Some(widget), owner).is_some());
    }

    #[test]
    fn test_foreign_owner_filtered() {
        let widget = Widget {
            user_id: Uuid::new_v4(),
        };

        assert!(owned_by(Some(widget), Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_absent_resource_filtered() {
        assert!(owned_by(None::<Widget>, Uuid::new_v4()).is_none());
    }
}
