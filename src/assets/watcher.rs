//=======================================================================//
// IMPORTS
//
//=======================================================================//

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc
    },
    thread::{self, JoinHandle},
    time::Duration
};

use log::warn;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;

use crate::error::{Result, WorldEditError};

/// How long the background thread blocks on the notification channel between checks of the
/// cancellation flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

//=======================================================================//
// TYPES
//
//=======================================================================//

/// How a watched file changed, classified from the raw OS event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange
{
    /// Content or metadata changed, or a rename delivered the new name.
    Changed(PathBuf),
    /// The file was deleted, or this is the old name of a rename.
    Removed(PathBuf),
    /// The OS notification buffer overran; subscribers must rescan from scratch.
    Unknown
}

impl FileChange
{
    #[inline]
    fn from_event(event: Event) -> Vec<Self>
    {
        match event.kind
        {
            EventKind::Modify(_) | EventKind::Create(_) =>
            {
                event.paths.into_iter().map(Self::Changed).collect()
            },
            EventKind::Remove(_) => event.paths.into_iter().map(Self::Removed).collect(),
            EventKind::Other | EventKind::Any => vec![Self::Unknown],
            EventKind::Access(_) => vec![]
        }
    }
}

//=======================================================================//

/// Changes queued by the background thread since the last drain, kept behind one lock so the
/// thread only ever blocks the owning thread for the length of a single `insert`/`drain`.
#[derive(Default)]
struct Pending
{
    changed:  HashSet<PathBuf>,
    removed:  HashSet<PathBuf>,
    overflow: bool
}

//=======================================================================//

/// Watches a single directory tree and translates OS notifications into [`FileChange`]s, grounded
/// on `ConfigWatcher`. Spawns a dedicated thread that blocks on the underlying `notify` channel via
/// `recv_timeout`, checking an `Arc<AtomicBool>` cancellation flag between polls; `Drop` sets the
/// flag and joins the thread, generalizing `ConfigWatcher`'s single-shot, non-blocking `poll()` into
/// a real background listener.
pub struct FileWatcher
{
    root:    PathBuf,
    pending: Arc<Mutex<Pending>>,
    cancel:  Arc<AtomicBool>,
    thread:  Option<JoinHandle<()>>
}

impl FileWatcher
{
    /// Starts watching `root` recursively. Returns an error if the underlying OS watch cannot be
    /// installed or the background thread cannot be spawned.
    #[inline]
    pub fn new(root: impl Into<PathBuf>) -> Result<Self>
    {
        let root = root.into();
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default()
        )?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        let pending = Arc::new(Mutex::new(Pending::default()));
        let cancel = Arc::new(AtomicBool::new(false));

        let thread_pending = pending.clone();
        let thread_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name("asset-file-watcher".to_owned())
            .spawn(move || {
                // Keeps the OS watch alive for exactly the thread's lifetime.
                let _watcher = watcher;

                loop
                {
                    if thread_cancel.load(Ordering::Acquire)
                    {
                        break;
                    }

                    match rx.recv_timeout(POLL_TIMEOUT)
                    {
                        Ok(Ok(event)) =>
                        {
                            let mut pending = thread_pending.lock();

                            for change in FileChange::from_event(event)
                            {
                                match change
                                {
                                    FileChange::Changed(path) =>
                                    {
                                        pending.removed.remove(&path);
                                        pending.changed.insert(path);
                                    },
                                    FileChange::Removed(path) =>
                                    {
                                        pending.changed.remove(&path);
                                        pending.removed.insert(path);
                                    },
                                    FileChange::Unknown => pending.overflow = true
                                }
                            }
                        },
                        Ok(Err(err)) => warn!("file watcher error: {err}"),
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break
                    }
                }
            })
            .map_err(|source| WorldEditError::Io { path: root.clone(), source })?;

        Ok(Self { root, pending, cancel, thread: Some(thread) })
    }

    /// The directory being watched.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Drains every change queued by the background thread since the last call and invokes
    /// `callback` once per distinct path, removals before changes so a rapid remove-then-recreate
    /// is reported as a single `Changed`.
    #[inline]
    pub fn evaluate_changed_files(&self, mut callback: impl FnMut(FileChange))
    {
        let mut pending = self.pending.lock();

        for path in pending.removed.drain()
        {
            callback(FileChange::Removed(path));
        }

        for path in pending.changed.drain()
        {
            callback(FileChange::Changed(path));
        }

        if std::mem::take(&mut pending.overflow)
        {
            callback(FileChange::Unknown);
        }
    }
}

impl Drop for FileWatcher
{
    #[inline]
    fn drop(&mut self)
    {
        self.cancel.store(true, Ordering::Release);

        if let Some(thread) = self.thread.take()
        {
            let _ = thread.join();
        }
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//
