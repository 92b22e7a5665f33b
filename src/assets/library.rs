//=======================================================================//
// IMPORTS
//
//=======================================================================//

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc
    }
};

use hashbrown::HashMap;
use log::{error, info, warn};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use threadpool::ThreadPool;

use crate::assets::{
    state::{AssetData, AssetRef, AssetState, LoadStatus},
    tree::LibraryTree
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// The underlying loader failure for one asset path, carried for logging. Never propagated past
/// [`AssetLibrary::schedule_load`]: a failed load collapses to a [`LoadEvent`] with `data: None`,
/// matching the original's `aquire_if` returning `nullptr` on a failed future.
#[derive(Debug, Error)]
#[error("failed to load asset at {path}: {source}")]
pub struct AssetLoadError
{
    pub path:   PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>
}

//=======================================================================//
// TRAITS
//
//=======================================================================//

/// Knows how to turn a path on disk into a loaded `T`. Implemented once per asset kind (ODF
/// definitions, meshes) and handed to an [`AssetLibrary`] at construction, mirroring
/// `asset_traits<T>::load` in the original.
pub trait AssetLoader<T>: Send + Sync + 'static
{
    /// Loads the asset at `path`. Errors are logged by the library and surfaced through a
    /// [`LoadEvent`] with `data: None`; they are not propagated to the caller of `get_if`.
    fn load(&self, path: &Path) -> Result<T, AssetLoadError>;
}

/// Broadcast to every registered listener when a load attempt completes, successfully or not.
#[must_use]
pub struct LoadEvent<T>
{
    pub name: Arc<str>,
    pub data: Option<AssetData<T>>
}

impl<T> Clone for LoadEvent<T>
{
    #[inline]
    fn clone(&self) -> Self
    {
        Self {
            name: self.name.clone(),
            data: self.data.clone()
        }
    }
}

//=======================================================================//

type Listener<T> = Box<dyn Fn(&LoadEvent<T>) + Send + Sync>;

/// A token returned by [`AssetLibrary::listen_for_loads`]; dropping it unsubscribes the callback.
#[must_use]
pub struct ListenerHandle<T>
{
    id:        u64,
    listeners: Arc<Mutex<Vec<(u64, Listener<T>)>>>
}

impl<T> Drop for ListenerHandle<T>
{
    #[inline]
    fn drop(&mut self) { self.listeners.lock().retain(|(id, _)| *id != self.id); }
}

//=======================================================================//

/// Lower-cases a path's file stem to use as an asset's lookup key, matching the original's
/// `lowercase_string{asset_path.stem()}`.
#[inline]
#[must_use]
fn asset_name(path: &Path) -> String
{
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

//=======================================================================//

/// The state a scheduled load job needs, kept behind its own `Arc` so background jobs can hold a
/// strong reference without borrowing the whole [`AssetLibrary`].
struct Shared<T>
{
    entries: RwLock<HashMap<String, Arc<AssetState<T>>>>,
    queue:   Mutex<Vec<LoadEvent<T>>>
}

/// Asynchronous, reference-counted, content-addressed loader and cache for one asset kind,
/// grounded on the original's `library<T>`. A single shared/exclusive lock protects the
/// known/cached tables; loads run at low priority on a shared thread pool and their results are
/// queued for the owning thread to drain via [`tick`](Self::tick), never invoking subscriber
/// callbacks from a worker thread.
pub struct AssetLibrary<T, L>
where
    T: Send + Sync + 'static,
    L: AssetLoader<T>
{
    loader:    Arc<L>,
    pool:      ThreadPool,
    shared:    Arc<Shared<T>>,
    tree:      Mutex<LibraryTree>,
    listeners: Arc<Mutex<Vec<(u64, Listener<T>)>>>,
    next_listener_id: AtomicUsize
}

impl<T, L> AssetLibrary<T, L>
where
    T: Send + Sync + 'static,
    L: AssetLoader<T>
{
    #[inline]
    pub fn new(loader: L, pool: ThreadPool) -> Self
    {
        Self {
            loader: Arc::new(loader),
            pool,
            shared: Arc::new(Shared {
                entries: RwLock::new(HashMap::new()),
                queue:   Mutex::new(Vec::new())
            }),
            tree: Mutex::new(LibraryTree::default()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicUsize::new(0)
        }
    }

    /// Registers (or re-registers) `path` under its lower-cased file stem. If the asset is
    /// currently cached, schedules a reload; if it's pending, the in-flight load is left to
    /// complete and will simply pick up the new path on its next load.
    #[inline]
    pub fn add(&self, path: PathBuf)
    {
        let name = asset_name(&path);
        if name.is_empty()
        {
            warn!("asset path {path:?} has no usable file stem, ignoring");
            return;
        }

        let reload = {
            let mut entries = self.shared.entries.write();

            match entries.get(&name)
            {
                Some(state) =>
                {
                    *state.source_path.lock() = path.clone();
                    state.exists.store(true, Ordering::Relaxed);
                    state.data.read().upgrade().is_some()
                },
                None =>
                {
                    entries.insert(name.clone(), Arc::new(AssetState::new(path.clone())));
                    false
                }
            }
        };

        self.tree.lock().insert(&path);

        if reload
        {
            self.schedule_load(name);
        }
    }

    /// Marks the asset at `path` as not existing and broadcasts a load event with `data: None` so
    /// subscribers can drop their references.
    #[inline]
    pub fn remove(&self, path: &Path)
    {
        let name = asset_name(path);

        if let Some(state) = self.shared.entries.read().get(&name)
        {
            state.exists.store(false, Ordering::Relaxed);
            *state.data.write() = std::sync::Weak::new();
        }

        self.tree.lock().remove(path);
        self.push_event(LoadEvent { name: name.into(), data: None });
    }

    /// Returns a handle keyed on `name`. Empty if `name` is unknown to this library.
    #[inline]
    #[must_use]
    pub fn acquire(&self, name: &str) -> AssetRef<T>
    {
        let name = name.to_lowercase();

        match self.shared.entries.read().get(&name)
        {
            Some(state) => AssetRef::new(state.clone()),
            None => AssetRef::empty()
        }
    }

    /// Returns the currently cached data for `asset_ref` if live, otherwise schedules a load (at
    /// most one in flight per name) and returns `None`.
    ///
    /// The original's equivalent, `asset_ref::get_if`, took a shared read lock on the asset state
    /// and then called `start_load` while still holding it, which could deadlock against the write
    /// lock `start_load` itself needed ("DEADLOCK ='("). Here the read lock is dropped before
    /// scheduling anything.
    #[inline]
    #[must_use]
    pub fn get_if(&self, asset_ref: &AssetRef<T>) -> Option<AssetData<T>>
    {
        let state = asset_ref.state.as_ref()?;

        if let Some(data) = state.data.read().upgrade()
        {
            return Some(data);
        }

        let should_schedule = {
            let mut status = state.load_status.lock();

            if *status == LoadStatus::Idle
            {
                *status = LoadStatus::Pending;
                true
            }
            else
            {
                false
            }
        };

        if should_schedule
        {
            let name = self
                .shared
                .entries
                .read()
                .iter()
                .find(|(_, s)| Arc::ptr_eq(s, state))
                .map(|(name, _)| name.clone());

            if let Some(name) = name
            {
                self.schedule_load(name);
            }
        }

        None
    }

    /// Registers `callback` to be invoked, on the draining thread, for every load event processed
    /// by [`tick`](Self::tick) after registration.
    #[inline]
    pub fn listen_for_loads<F>(&self, callback: F) -> ListenerHandle<T>
    where
        F: Fn(&LoadEvent<T>) + Send + Sync + 'static
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed) as u64;
        self.listeners.lock().push((id, Box::new(callback)));

        ListenerHandle {
            id,
            listeners: self.listeners.clone()
        }
    }

    /// Drains queued load events and invokes every live listener. Must be called from the owning
    /// (UI) thread; never invoked automatically from a worker thread.
    #[inline]
    pub fn tick(&self)
    {
        let events = std::mem::take(&mut *self.shared.queue.lock());
        if events.is_empty()
        {
            return;
        }

        let listeners = self.listeners.lock();
        for event in &events
        {
            for (_, listener) in listeners.iter()
            {
                listener(event);
            }
        }
    }

    /// A read-only view of the tree index, for the asset browser UI this core feeds.
    #[inline]
    #[must_use]
    pub fn tree(&self) -> LibraryTree { self.tree.lock().clone() }

    #[inline]
    fn push_event(&self, event: LoadEvent<T>) { self.shared.queue.lock().push(event); }

    #[inline]
    fn schedule_load(&self, name: String)
    {
        let loader = self.loader.clone();
        let path = match self.shared.entries.read().get(&name)
        {
            Some(state) => state.source_path.lock().clone(),
            None => return
        };

        let shared = self.shared.clone();

        self.pool.execute(move || {
            let result = loader.load(&path);
            let entries = &shared.entries;
            let queue = &shared.queue;

            match result
            {
                Ok(value) =>
                {
                    let data: AssetData<T> = Arc::new(value);

                    if let Some(state) = entries.read().get(&name)
                    {
                        *state.data.write() = Arc::downgrade(&data);
                        *state.load_status.lock() = LoadStatus::Idle;
                    }

                    info!("loaded asset '{name}'");
                    queue.lock().push(LoadEvent {
                        name: name.into(),
                        data: Some(data)
                    });
                },
                Err(err) =>
                {
                    if let Some(state) = entries.read().get(&name)
                    {
                        *state.load_status.lock() = LoadStatus::Failed;
                    }

                    error!("failed to load asset '{name}': {err}");
                    queue.lock().push(LoadEvent { name: name.into(), data: None });
                }
            }
        });
    }

    /// Resets a failed load so the next `get_if` retries, called by the watcher when the
    /// underlying file changes on disk.
    #[inline]
    pub fn mark_changed(&self, path: &Path)
    {
        let name = asset_name(path);

        if let Some(state) = self.shared.entries.read().get(&name)
        {
            let mut status = state.load_status.lock();
            if *status == LoadStatus::Failed
            {
                *status = LoadStatus::Idle;
            }
        }
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//
