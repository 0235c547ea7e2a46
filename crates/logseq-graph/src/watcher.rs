//! File watching: notify events are debounced per path and then re-indexed
//! and broadcast to every [`Watcher`].

use std::{
    collections::HashMap,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::Duration,
};

use chrono::NaiveDate;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::{
    error::{GraphError, Result, io_at},
    graph::Layout,
    index::Index,
    page::PageKind,
    search::PageResult,
};

pub(crate) type Subscribers = Arc<Mutex<Vec<(u64, Sender<ChangeEvent>)>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A page was created or written. With an index, it has already been
    /// re-indexed when the event arrives.
    PageUpdated { page: PageResult },
    PageDeleted {
        kind: PageKind,
        title: String,
        date: Option<NaiveDate>,
    },
}

/// A subscription to graph changes; dropping it unsubscribes.
pub struct Watcher {
    id: u64,
    events: Receiver<ChangeEvent>,
    subscribers: Subscribers,
    _service: Arc<WatchService>,
}

impl Watcher {
    pub(crate) fn new(
        id: u64,
        events: Receiver<ChangeEvent>,
        subscribers: Subscribers,
        service: Arc<WatchService>,
    ) -> Self {
        Watcher {
            id,
            events,
            subscribers,
            _service: service,
        }
    }

    pub fn events(&self) -> &Receiver<ChangeEvent> {
        &self.events
    }

    /// Waits up to `timeout` for the next change.
    pub fn next_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Keeps the notify watcher alive. The debouncer and handler threads wind
/// down once it is dropped and their channels close.
pub(crate) struct WatchService {
    _watcher: RecommendedWatcher,
}

impl WatchService {
    pub(crate) fn start(
        layout: Layout,
        index: Option<Index>,
        subscribers: Subscribers,
        debounce: Duration,
    ) -> Result<Self> {
        let (raw_tx, raw_rx) = mpsc::channel::<PathBuf>();
        let (debounced_tx, debounced_rx) = mpsc::channel::<PathBuf>();

        let dirs = [layout.journals_dir(), layout.pages_dir()];
        let watcher = setup_file_watcher(&dirs, raw_tx)?;

        let mut debouncer = Debouncer::new(debounced_tx, debounce);
        thread::spawn(move || debouncer.run(raw_rx));

        let handler = ChangeHandler {
            layout,
            index,
            subscribers,
        };
        thread::spawn(move || {
            while let Ok(path) = debounced_rx.recv() {
                if let Err(e) = handler.handle(&path) {
                    log::warn!("failed to handle change of {}: {e}", path.display());
                }
            }
        });

        Ok(WatchService { _watcher: watcher })
    }
}

fn setup_file_watcher(dirs: &[PathBuf], raw_tx: Sender<PathBuf>) -> Result<RecommendedWatcher> {
    let event_handler = move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in event.paths {
                if path.extension() == Some(OsStr::new("md")) {
                    let _ = raw_tx.send(path);
                }
            }
        }
        Err(e) => log::warn!("file watcher error: {e}"),
    };

    let mut watcher = RecommendedWatcher::new(event_handler, Config::default())?;
    for dir in dirs {
        fs::create_dir_all(dir).map_err(io_at(dir))?;
        watcher.watch(dir, RecursiveMode::Recursive)?;
    }
    Ok(watcher)
}

/// Forwards a path once no new event arrived for it within the window.
struct Debouncer {
    active_timers: HashMap<PathBuf, Sender<()>>,
    output_tx: Sender<PathBuf>,
    duration: Duration,
}

impl Debouncer {
    fn new(output_tx: Sender<PathBuf>, duration: Duration) -> Self {
        Debouncer {
            active_timers: HashMap::new(),
            output_tx,
            duration,
        }
    }

    fn run(&mut self, input_rx: Receiver<PathBuf>) {
        while let Ok(path) = input_rx.recv() {
            if let Some(cancel) = self.active_timers.remove(&path) {
                let _ = cancel.send(());
            }

            let (cancel_tx, cancel_rx) = mpsc::channel();
            let output_tx = self.output_tx.clone();
            let duration = self.duration;
            let key = path.clone();

            thread::spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(duration) {
                    let _ = output_tx.send(path);
                }
            });

            self.active_timers.insert(key, cancel_tx);
        }
    }
}

struct ChangeHandler {
    layout: Layout,
    index: Option<Index>,
    subscribers: Subscribers,
}

impl ChangeHandler {
    fn handle(&self, path: &Path) -> Result<()> {
        let Some(page) = self.layout.classify(path) else {
            return Ok(());
        };

        let event = if path.is_file() {
            if let Some(index) = &self.index {
                let loaded = self.layout.load(&page)?;
                index.index_page(&page.subpath, &loaded)?;
            }
            log::debug!("page updated: {}", page.subpath);
            ChangeEvent::PageUpdated { page }
        } else {
            if let Some(index) = &self.index {
                index.delete_page(&page.subpath)?;
            }
            log::debug!("page deleted: {}", page.subpath);
            ChangeEvent::PageDeleted {
                kind: page.kind,
                title: page.title,
                date: page.date,
            }
        };

        let subscribers = self
            .subscribers
            .lock()
            .map_err(|_| GraphError::Poisoned("subscribers"))?;
        for (_, tx) in subscribers.iter() {
            let _ = tx.send(event.clone());
        }
        Ok(())
    }
}
