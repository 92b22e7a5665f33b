//=======================================================================//
// IMPORTS
//
//=======================================================================//

use std::{
    hash::{Hash, Hasher},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Weak
    }
};

use parking_lot::{Mutex, RwLock};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// A shared, immutable snapshot of a loaded asset. Cheap to clone; handed out by
/// [`AssetLibrary::get_if`](crate::assets::library::AssetLibrary::get_if).
pub type AssetData<T> = Arc<T>;

//=======================================================================//

/// Whether a load attempt for the underlying path has already been scheduled, is this load's own
/// in-flight attempt, or failed outright.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadStatus
{
    #[default]
    Idle,
    Pending,
    Failed
}

//=======================================================================//

/// The state shared between every [`AssetRef`] pointing at the same named asset: a weak pointer
/// to the cached data, an "exists" flag, the source path, and an
/// atomically-updated reference count. Owned by the [`AssetLibrary`](crate::assets::library::AssetLibrary)
/// that created it; an `AssetRef` never outlives its library in practice, matching the original's
/// documented constraint.
pub struct AssetState<T>
{
    pub(crate) data:        RwLock<Weak<T>>,
    pub(crate) exists:      AtomicBool,
    pub(crate) source_path: Mutex<PathBuf>,
    pub(crate) ref_count:   AtomicUsize,
    pub(crate) load_status: Mutex<LoadStatus>
}

impl<T> AssetState<T>
{
    #[inline]
    pub(crate) fn new(source_path: PathBuf) -> Self
    {
        Self {
            data: RwLock::new(Weak::new()),
            exists: AtomicBool::new(true),
            source_path: Mutex::new(source_path),
            ref_count: AtomicUsize::new(0),
            load_status: Mutex::new(LoadStatus::Idle)
        }
    }
}

//=======================================================================//

/// A handle into an [`AssetState<T>`], grounded on the original's `asset_ref<T>`. Copying or
/// cloning preserves the invariant `use_count == number of live refs`: the count only tracks
/// liveness, it never owns the cached data, which remains owned by the library as a weak pointer.
#[must_use]
pub struct AssetRef<T>
{
    pub(crate) state: Option<Arc<AssetState<T>>>
}

impl<T> AssetRef<T>
{
    /// An `AssetRef` that refers to nothing; `exists()` is false and `get_if()` always returns
    /// `None`.
    #[inline]
    pub const fn empty() -> Self { Self { state: None } }

    #[inline]
    pub(crate) fn new(state: Arc<AssetState<T>>) -> Self
    {
        state.ref_count.fetch_add(1, Ordering::Relaxed);
        Self { state: Some(state) }
    }

    /// The number of live references to the asset this ref points at, `0` if empty.
    #[inline]
    #[must_use]
    pub fn use_count(&self) -> usize
    {
        self.state
            .as_ref()
            .map_or(0, |state| state.ref_count.load(Ordering::Relaxed))
    }

    /// Whether the asset has a file on disk, i.e. has not been removed.
    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool
    {
        self.state
            .as_ref()
            .is_some_and(|state| state.exists.load(Ordering::Relaxed))
    }

    /// Whether this ref points at a known asset at all.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.state.is_none() }
}

impl<T> Clone for AssetRef<T>
{
    #[inline]
    fn clone(&self) -> Self
    {
        if let Some(state) = &self.state
        {
            state.ref_count.fetch_add(1, Ordering::Relaxed);
        }

        Self { state: self.state.clone() }
    }
}

impl<T> Drop for AssetRef<T>
{
    #[inline]
    fn drop(&mut self)
    {
        if let Some(state) = &self.state
        {
            state.ref_count.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

impl<T> Default for AssetRef<T>
{
    #[inline]
    fn default() -> Self { Self::empty() }
}

impl<T> PartialEq for AssetRef<T>
{
    #[inline]
    fn eq(&self, other: &Self) -> bool
    {
        match (&self.state, &other.state)
        {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false
        }
    }
}

impl<T> Eq for AssetRef<T> {}

impl<T> Hash for AssetRef<T>
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        match &self.state
        {
            Some(arc) => (Arc::as_ptr(arc) as usize).hash(state),
            None => 0usize.hash(state)
        }
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn empty_ref_has_zero_use_count()
    {
        let r = AssetRef::<u32>::empty();
        assert_eq!(r.use_count(), 0);
        assert!(!r.exists());
        assert!(r.is_empty());
    }

    #[test]
    fn cloning_increments_use_count()
    {
        let state = Arc::new(AssetState::<u32>::new(PathBuf::from("foo.txt")));
        let a = AssetRef::new(state);
        assert_eq!(a.use_count(), 1);

        let b = a.clone();
        assert_eq!(a.use_count(), 2);
        assert_eq!(b.use_count(), 2);

        drop(b);
        assert_eq!(a.use_count(), 1);
    }

    #[test]
    fn refs_to_the_same_state_are_equal()
    {
        let state = Arc::new(AssetState::<u32>::new(PathBuf::from("foo.txt")));
        let a = AssetRef::new(state.clone());
        let b = AssetRef::new(state);
        assert_eq!(a, b);
        assert_ne!(a, AssetRef::<u32>::empty());
    }
}
