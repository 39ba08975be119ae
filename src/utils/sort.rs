//! Sorting by a projected member.
//!
//! ```rust
//! use resource_metadata::utils::sort::sort_by_member;
//!
//! struct Track { id: u32 }
//! let mut tracks = vec![Track { id: 3 }, Track { id: 1 }, Track { id: 2 }];
//! sort_by_member(&mut tracks, Ord::cmp, |t| t.id);
//! assert_eq!(tracks.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 2, 3]);
//! ```

use std::cmp::Ordering;

/// Stable sort of `items` by `compare(project(a), project(b))`
pub fn sort_by_member<T, K, C, P>(items: &mut [T], mut compare: C, mut project: P)
where
    C: FnMut(&K, &K) -> Ordering,
    P: FnMut(&T) -> K,
{
    items.sort_by(|a, b| compare(&project(a), &project(b)));
}

/// Unstable variant of [`sort_by_member`]
pub fn sort_unstable_by_member<T, K, C, P>(items: &mut [T], mut compare: C, mut project: P)
where
    C: FnMut(&K, &K) -> Ordering,
    P: FnMut(&T) -> K,
{
    items.sort_unstable_by(|a, b| compare(&project(a), &project(b)));
}

/// Stable sort through a borrowing projection, for keys that live inside `T`
pub fn sort_by_member_ref<T, K, C, P>(items: &mut [T], mut compare: C, project: P)
where
    K: ?Sized,
    C: FnMut(&K, &K) -> Ordering,
    P: for<'a> Fn(&'a T) -> &'a K,
{
    items.sort_by(|a, b| compare(project(a), project(b)));
}
