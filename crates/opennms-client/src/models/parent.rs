//! Non-owning child-to-parent links

use std::fmt;
use std::sync::{Arc, Weak};

/// Back-reference from a child entity to its parent
///
/// Children fetched on their own come back [`ParentRef::NotLoaded`]. The node
/// graph assembler links them with a [`Weak`] pointer once the parent exists,
/// so a child never keeps its parent alive.
pub enum ParentRef<T> {
    NotLoaded,
    Linked(Weak<T>),
}

impl<T> ParentRef<T> {
    pub fn linked(parent: &Weak<T>) -> Self {
        ParentRef::Linked(parent.clone())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ParentRef::Linked(_))
    }

    /// The parent, if linked and still alive
    pub fn get(&self) -> Option<Arc<T>> {
        match self {
            ParentRef::NotLoaded => None,
            ParentRef::Linked(weak) => weak.upgrade(),
        }
    }

    /// True when this reference points at exactly `parent`
    pub fn points_to(&self, parent: &Arc<T>) -> bool {
        match self {
            ParentRef::NotLoaded => false,
            ParentRef::Linked(weak) => std::ptr::eq(weak.as_ptr(), Arc::as_ptr(parent)),
        }
    }
}

impl<T> Default for ParentRef<T> {
    fn default() -> Self {
        ParentRef::NotLoaded
    }
}

impl<T> Clone for ParentRef<T> {
    fn clone(&self) -> Self {
        match self {
            ParentRef::NotLoaded => ParentRef::NotLoaded,
            ParentRef::Linked(weak) => ParentRef::Linked(weak.clone()),
        }
    }
}

// Identity comparison: two links are equal when they point at the same parent.
impl<T> PartialEq for ParentRef<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParentRef::NotLoaded, ParentRef::NotLoaded) => true,
            (ParentRef::Linked(a), ParentRef::Linked(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for ParentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::NotLoaded => f.write_str("NotLoaded"),
            ParentRef::Linked(_) => f.write_str("Linked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded() {
        let parent: ParentRef<u32> = ParentRef::default();
        assert!(!parent.is_loaded());
        assert!(parent.get().is_none());
    }

    #[test]
    fn test_linked_does_not_keep_parent_alive() {
        let owner = Arc::new(7_u32);
        let link = ParentRef::linked(&Arc::downgrade(&owner));
        assert!(link.points_to(&owner));
        assert_eq!(link.get().as_deref(), Some(&7));

        drop(owner);
        assert!(link.is_loaded());
        assert!(link.get().is_none());
    }

    #[test]
    fn test_equality_is_identity() {
        let a = Arc::new(1_u32);
        let b = Arc::new(1_u32);
        let link_a = ParentRef::linked(&Arc::downgrade(&a));
        assert_eq!(link_a, link_a.clone());
        assert_ne!(link_a, ParentRef::linked(&Arc::downgrade(&b)));
        assert_ne!(link_a, ParentRef::NotLoaded);
    }
}
