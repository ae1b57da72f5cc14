/// Bounded-parallelism recursive directory walker.
///
/// # Scheduling
///
/// `max_workers` named threads pull [`DirTask`]s from an unbounded queue of
/// pending directories. A worker only lists one directory at a time, so the
/// worker count is the permit ceiling on open directory handles. Queuing a
/// subdirectory never blocks, which means a worker can always finish the
/// directory it holds and the walk cannot deadlock on its own queue.
///
/// # Completion
///
/// `outstanding` counts tasks that are queued or being processed. It is
/// incremented before a task is queued and decremented after the task's
/// entry list has been fully processed. The worker that brings it to zero
/// sends one [`Job::Stop`] per thread that actually started; every worker
/// then exits and drops its channel senders, which closes both output
/// streams. The root task is queued only after all threads are spawned, so
/// that count is final before any task can finish.
///
/// # Backpressure and cancellation
///
/// Records and errors are sent on bounded channels. A full channel blocks
/// the sending worker, but the send also waits on the cancellation signal,
/// so a stalled consumer can always be abandoned. Cancelled workers keep
/// draining the queue without listing anything, which lets `outstanding`
/// reach zero quickly.
use crate::config::ScanConfig;
use crate::error::{ScanError, WalkError};
use crate::gate::PathGate;
use crate::model::MetadataRecord;
use crate::scanner::cancel::CancelToken;
use crate::scanner::stats::{WalkSnapshot, WalkStats};
use crate::scanner::{clamp_workers, DEFAULT_MAX_WORKERS, ERROR_CHANNEL_CAPACITY, RECORD_CHANNEL_CAPACITY};
use crossbeam_channel::{select, Receiver, Sender};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

/// Tunables for one walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub max_workers: usize,
    /// Deepest level expanded; children of the root are depth 1.
    /// `None` means unlimited.
    pub max_depth: Option<usize>,
    pub record_buffer: usize,
    pub error_buffer: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            max_depth: None,
            record_buffer: RECORD_CHANNEL_CAPACITY,
            error_buffer: ERROR_CHANNEL_CAPACITY,
        }
    }
}

impl WalkOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        let general = &config.general;
        Self {
            max_workers: clamp_workers(general.max_workers),
            max_depth: (general.max_depth > 0).then_some(general.max_depth),
            record_buffer: general.record_buffer.max(1),
            error_buffer: general.error_buffer.max(1),
        }
    }

    fn may_descend(&self, child_depth: usize) -> bool {
        self.max_depth.map_or(true, |max| child_depth < max)
    }
}

/// A directory waiting to be listed.
#[derive(Debug, Clone)]
struct DirTask {
    path: PathBuf,
    depth: usize,
}

#[derive(Debug)]
enum Job {
    Dir(DirTask),
    Stop,
}

/// Whether a worker should keep processing its current directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// The two output streams of a running walk.
///
/// Both receivers must be drained until they disconnect. Dropping the
/// streams early is allowed: workers notice the closed channels and stop.
pub struct WalkStreams {
    pub records: Receiver<MetadataRecord>,
    pub errors: Receiver<WalkError>,
    stats: Arc<WalkStats>,
    workers: Vec<JoinHandle<()>>,
}

impl WalkStreams {
    pub fn stats(&self) -> WalkSnapshot {
        self.stats.snapshot()
    }

    /// Shared counters, for progress reporting from another thread.
    pub fn stats_handle(&self) -> Arc<WalkStats> {
        Arc::clone(&self.stats)
    }

    /// Reap the worker threads. Only returns promptly once both streams
    /// have closed.
    pub fn join(self) {
        for handle in self.workers {
            if handle.join().is_err() {
                warn!("Walker thread panicked");
            }
        }
    }
}

/// Concurrent tree walker. Cheap to clone; each [`scan`](Self::scan) is
/// independent.
#[derive(Debug, Clone)]
pub struct ConcurrentWalker {
    options: WalkOptions,
    gate: Arc<PathGate>,
}

impl ConcurrentWalker {
    /// The worker count is clamped into `1..=MAX_WORKERS_LIMIT`.
    pub fn new(mut options: WalkOptions, gate: PathGate) -> Self {
        options.max_workers = clamp_workers(options.max_workers);
        Self {
            options,
            gate: Arc::new(gate),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(WalkOptions::from_config(config), PathGate::from_config(config))
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Start walking `root` on background threads.
    ///
    /// Returns immediately with the output streams. The root itself is not
    /// emitted; every entry below it that passes the gate is.
    pub fn scan(
        &self,
        cancel: &CancelToken,
        root: impl Into<PathBuf>,
    ) -> Result<WalkStreams, ScanError> {
        let root = root.into();
        let (record_tx, records) = crossbeam_channel::bounded(self.options.record_buffer);
        let (error_tx, errors) = crossbeam_channel::bounded(self.options.error_buffer);
        let stats = Arc::new(WalkStats::default());

        if self.gate.is_excluded(&root) {
            warn!(root = %root.display(), "Scan root is excluded by the path gate; nothing to walk");
            return Ok(WalkStreams {
                records,
                errors,
                stats,
                workers: Vec::new(),
            });
        }

        let (jobs_tx, jobs_rx) = crossbeam_channel::unbounded();
        let shared = Arc::new(Shared {
            options: self.options.clone(),
            gate: Arc::clone(&self.gate),
            stats: Arc::clone(&stats),
            cancel: cancel.clone(),
            halted: AtomicBool::new(false),
            outstanding: AtomicUsize::new(1),
            running: AtomicUsize::new(0),
            jobs: jobs_tx,
        });

        let mut workers = Vec::with_capacity(self.options.max_workers);
        for id in 0..self.options.max_workers {
            let shared = Arc::clone(&shared);
            let jobs = jobs_rx.clone();
            let outlets = Outlets {
                records: record_tx.clone(),
                errors: error_tx.clone(),
            };
            let spawned = thread::Builder::new()
                .name(format!("shuruhoja-walker-{id}"))
                .spawn(move || worker_loop(id, &shared, &jobs, &outlets));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) if workers.is_empty() => return Err(ScanError::Spawn(e)),
                Err(e) => {
                    // Fewer permits than requested; the walk still completes.
                    warn!(spawned = workers.len(), error = %e, "Could not start all walker threads");
                    break;
                }
            }
        }

        shared.running.store(workers.len(), Ordering::Release);
        info!(
            root = %root.display(),
            workers = workers.len(),
            "Starting filesystem walk"
        );
        // `outstanding` already counts the root.
        let _ = shared.jobs.send(Job::Dir(DirTask { path: root, depth: 0 }));

        Ok(WalkStreams {
            records,
            errors,
            stats,
            workers,
        })
    }
}

struct Outlets {
    records: Sender<MetadataRecord>,
    errors: Sender<WalkError>,
}

struct Shared {
    options: WalkOptions,
    gate: Arc<PathGate>,
    stats: Arc<WalkStats>,
    cancel: CancelToken,
    /// Set when the consumer has dropped a stream.
    halted: AtomicBool,
    /// Join-group: queued plus in-progress directory tasks.
    outstanding: AtomicUsize,
    /// Threads actually started; each needs one `Stop`.
    running: AtomicUsize,
    jobs: Sender<Job>,
}

fn worker_loop(id: usize, shared: &Shared, jobs: &Receiver<Job>, outlets: &Outlets) {
    trace!(worker = id, "Walker thread started");
    while let Ok(job) = jobs.recv() {
        let task = match job {
            Job::Dir(task) => task,
            Job::Stop => break,
        };
        if shared.should_stop() {
            trace!(worker = id, path = %task.path.display(), "Skipping directory after stop");
        } else {
            shared.expand(&task, outlets);
        }
        shared.finish_task();
    }
    trace!(worker = id, "Walker thread exiting");
}

impl Shared {
    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.halted.load(Ordering::Relaxed)
    }

    /// List one directory and emit a record per admitted entry.
    fn expand(&self, task: &DirTask, outlets: &Outlets) -> Flow {
        let entries = match fs::read_dir(&task.path) {
            Ok(entries) => entries,
            Err(source) => {
                let err = WalkError::listing(task.path.clone(), source);
                debug!(path = %task.path.display(), error = %err, "Directory listing failed");
                return self.emit_error(err, outlets);
            }
        };

        for entry in entries {
            if self.should_stop() {
                return Flow::Stop;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    // Mid-listing failure: abandon the rest of this directory.
                    let err = WalkError::listing(task.path.clone(), source);
                    return self.emit_error(err, outlets);
                }
            };

            let path = entry.path();
            if self.gate.is_excluded(&path) {
                self.stats.record_skip();
                trace!(path = %path.display(), "Excluded by path gate");
                continue;
            }

            // `DirEntry::metadata` does not follow symlinks.
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(source) => {
                    let err = WalkError::EntryFailed { path, source };
                    if self.emit_error(err, outlets) == Flow::Stop {
                        return Flow::Stop;
                    }
                    continue;
                }
            };

            let record = MetadataRecord::from_metadata(path, &meta);
            if record.is_dir {
                self.stats.record_dir();
                let child_depth = task.depth + 1;
                if self.options.may_descend(child_depth) {
                    self.schedule(DirTask {
                        path: record.path.clone(),
                        depth: child_depth,
                    });
                }
            } else {
                self.stats.record_file(record.size);
            }

            if self.deliver(&outlets.records, record) == Flow::Stop {
                return Flow::Stop;
            }
        }

        Flow::Continue
    }

    fn schedule(&self, task: DirTask) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        // Unbounded: never blocks. Cannot fail while this worker holds a receiver.
        let _ = self.jobs.send(Job::Dir(task));
    }

    fn finish_task(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("All directory tasks finished; stopping walker threads");
            for _ in 0..self.running.load(Ordering::Acquire) {
                let _ = self.jobs.send(Job::Stop);
            }
        }
    }

    fn emit_error(&self, err: WalkError, outlets: &Outlets) -> Flow {
        self.stats.record_error();
        self.deliver(&outlets.errors, err)
    }

    /// Blocking send that gives up on cancellation or a dropped consumer.
    fn deliver<T>(&self, tx: &Sender<T>, item: T) -> Flow {
        select! {
            send(tx, item) -> sent => match sent {
                Ok(()) => Flow::Continue,
                Err(_) => {
                    self.halted.store(true, Ordering::Relaxed);
                    Flow::Stop
                }
            },
            recv(self.cancel.signal()) -> _ => Flow::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::MAX_WORKERS_LIMIT;
    use std::collections::HashSet;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn open_walker(workers: usize) -> ConcurrentWalker {
        ConcurrentWalker::new(
            WalkOptions {
                max_workers: workers,
                ..WalkOptions::default()
            },
            PathGate::default(),
        )
    }

    fn drain(streams: WalkStreams) -> (Vec<MetadataRecord>, Vec<WalkError>, WalkSnapshot) {
        let records: Vec<_> = streams.records.iter().collect();
        let errors: Vec<_> = streams.errors.iter().collect();
        let snapshot = streams.stats();
        streams.join();
        (records, errors, snapshot)
    }

    fn touch(path: &Path, len: usize) {
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn options_from_config_map_zero_depth_to_unlimited() {
        let mut cfg = ScanConfig::default();
        assert_eq!(WalkOptions::from_config(&cfg).max_depth, None);
        cfg.general.max_depth = 2;
        cfg.general.max_workers = 4;
        let opts = WalkOptions::from_config(&cfg);
        assert_eq!(opts.max_depth, Some(2));
        assert_eq!(opts.max_workers, 4);
        assert!(opts.may_descend(1));
        assert!(!opts.may_descend(2));
    }

    #[test]
    fn every_entry_is_emitted_exactly_once() {
        let tmp = TempDir::new().unwrap();
        for d in 0..5 {
            let dir = tmp.path().join(format!("d{d}"));
            fs::create_dir_all(dir.join("inner")).unwrap();
            for f in 0..10 {
                touch(&dir.join(format!("f{f}")), 10);
                touch(&dir.join("inner").join(format!("g{f}")), 1);
            }
        }

        let (records, errors, stats) = drain(open_walker(3).scan(&CancelToken::new(), tmp.path()).unwrap());
        assert!(errors.is_empty());
        // 5 dirs + 5 inner dirs + 100 files.
        assert_eq!(records.len(), 110);
        let unique: HashSet<_> = records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(unique.len(), records.len(), "duplicate records emitted");
        assert_eq!(stats.files_scanned, 100);
        assert_eq!(stats.dirs_scanned, 10);
        assert_eq!(stats.total_bytes, 5 * 10 * 10 + 5 * 10);
    }

    #[test]
    fn single_worker_cannot_deadlock_on_deep_trees() {
        let tmp = TempDir::new().unwrap();
        let mut dir = tmp.path().to_path_buf();
        for i in 0..40 {
            dir = dir.join(format!("level{i}"));
        }
        fs::create_dir_all(&dir).unwrap();
        touch(&dir.join("leaf"), 1);

        let (records, _, _) = drain(open_walker(1).scan(&CancelToken::new(), tmp.path()).unwrap());
        assert_eq!(records.len(), 41);
    }

    #[test]
    fn tiny_buffers_still_complete() {
        let tmp = TempDir::new().unwrap();
        for i in 0..200 {
            touch(&tmp.path().join(format!("f{i}")), 1);
        }
        let walker = ConcurrentWalker::new(
            WalkOptions {
                max_workers: 2,
                max_depth: None,
                record_buffer: 1,
                error_buffer: 1,
            },
            PathGate::default(),
        );
        let (records, _, _) = drain(walker.scan(&CancelToken::new(), tmp.path()).unwrap());
        assert_eq!(records.len(), 200);
    }

    #[test]
    fn depth_limit_stops_expansion() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        touch(&tmp.path().join("a/b/c/deep.txt"), 1);

        let walker = ConcurrentWalker::new(
            WalkOptions {
                max_depth: Some(2),
                ..WalkOptions::default()
            },
            PathGate::default(),
        );
        let (records, _, _) = drain(walker.scan(&CancelToken::new(), tmp.path()).unwrap());
        let paths: HashSet<_> = records.into_iter().map(|r| r.path).collect();
        assert!(paths.contains(&tmp.path().join("a")));
        assert!(paths.contains(&tmp.path().join("a/b")));
        assert!(!paths.contains(&tmp.path().join("a/b/c")));
    }

    #[test]
    fn gate_exclusions_are_silent() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".snapshot/old")).unwrap();
        touch(&tmp.path().join(".snapshot/old/file"), 1);
        touch(&tmp.path().join("kept"), 1);

        let walker = ConcurrentWalker::new(WalkOptions::default(), PathGate::new([".snapshot"]));
        let (records, errors, stats) = drain(walker.scan(&CancelToken::new(), tmp.path()).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, tmp.path().join("kept"));
        assert!(errors.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn excluded_root_yields_closed_streams() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("f"), 1);
        let root = tmp.path().to_string_lossy().to_string();
        let walker = ConcurrentWalker::new(WalkOptions::default(), PathGate::new([root]));
        let (records, errors, _) = drain(walker.scan(&CancelToken::new(), tmp.path()).unwrap());
        assert!(records.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_root_reports_one_error() {
        let tmp = TempDir::new().unwrap();
        let (records, errors, stats) =
            drain(open_walker(4).scan(&CancelToken::new(), tmp.path().join("absent")).unwrap());
        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], WalkError::ListFailed { .. }));
        assert_eq!(stats.errors, 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        touch(&tmp.path().join("real/file"), 1);
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let (records, _, _) = drain(open_walker(2).scan(&CancelToken::new(), tmp.path()).unwrap());
        assert_eq!(records.len(), 3);
        let link = records
            .iter()
            .find(|r| r.path == tmp.path().join("link"))
            .unwrap();
        assert!(!link.is_dir);
    }

    #[test]
    fn pre_cancelled_scan_emits_nothing() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("f"), 1);
        let token = CancelToken::new();
        token.cancel();
        let (records, errors, _) = drain(open_walker(2).scan(&token, tmp.path()).unwrap());
        assert!(records.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn cancellation_unblocks_stalled_producers() {
        let tmp = TempDir::new().unwrap();
        for d in 0..20 {
            let dir = tmp.path().join(format!("d{d}"));
            fs::create_dir(&dir).unwrap();
            for f in 0..20 {
                touch(&dir.join(format!("f{f}")), 1);
            }
        }
        let walker = ConcurrentWalker::new(
            WalkOptions {
                max_workers: 4,
                max_depth: None,
                record_buffer: 2,
                error_buffer: 2,
            },
            PathGate::default(),
        );
        let token = CancelToken::new();
        let streams = walker.scan(&token, tmp.path()).unwrap();
        let first: Vec<_> = streams.records.iter().take(5).collect();
        assert_eq!(first.len(), 5);

        token.cancel();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            let rest = streams.records.iter().count();
            let _ = streams.errors.iter().count();
            streams.join();
            let _ = done_tx.send(rest);
        });
        let rest = done_rx
            .recv_timeout(Duration::from_secs(30))
            .expect("cancelled walk did not wind down within 30 s");
        // The buffered records plus at most one in-flight send per worker.
        assert!(rest <= 2 + 4, "{rest} records arrived after cancellation");
    }

    #[test]
    fn oversized_worker_count_is_clamped() {
        let mut cfg = ScanConfig::default();
        cfg.general.max_workers = usize::MAX;
        let walker = ConcurrentWalker::from_config(&cfg);
        assert_eq!(walker.options().max_workers, MAX_WORKERS_LIMIT);

        let direct = open_walker(usize::MAX);
        assert_eq!(direct.options().max_workers, MAX_WORKERS_LIMIT);

        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("f"), 3);
        let streams = walker.scan(&CancelToken::new(), tmp.path()).unwrap();
        assert!(streams.workers.len() <= MAX_WORKERS_LIMIT);
        let (records, errors, _) = drain(streams);
        assert_eq!(records.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn zero_workers_still_walks() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("f"), 1);
        let walker = open_walker(0);
        assert_eq!(walker.options().max_workers, 1);
        let (records, _, _) = drain(walker.scan(&CancelToken::new(), tmp.path()).unwrap());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn dropping_streams_stops_workers() {
        let tmp = TempDir::new().unwrap();
        for i in 0..100 {
            touch(&tmp.path().join(format!("f{i}")), 1);
        }
        let walker = ConcurrentWalker::new(
            WalkOptions {
                max_workers: 2,
                max_depth: None,
                record_buffer: 1,
                error_buffer: 1,
            },
            PathGate::default(),
        );
        let streams = walker.scan(&CancelToken::new(), tmp.path()).unwrap();
        let WalkStreams {
            records, workers, ..
        } = streams;
        drop(records);
        for handle in workers {
            handle.join().unwrap();
        }
    }
}
