//! Bounded depth-first sweep of a storage tree.
//!
//! A sweep visits every node under the storage root exactly once, skipping
//! the contents of directories that are still retained and deleting the ones
//! whose retention window has passed. The wall-clock deadline is checked once
//! per visited node; an expired deadline ends the walk cleanly and leaves the
//! undecided remainder for the next scheduled run.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use walkdir::WalkDir;

use crate::retention::{self, RetentionTable};
use crate::storage::{DeviceDir, PathError};

/// How a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Every reachable node was visited.
    Completed,
    /// The wall-clock deadline fired before the walk finished.
    DeadlineExpired,
}

/// Counters from a single sweep.
#[derive(Debug)]
pub struct SweepReport {
    pub outcome: SweepOutcome,
    /// Nodes visited before the walk finished or timed out.
    pub visited: u64,
    /// Dated directories whose retention window still covers today.
    pub kept: u64,
    /// Dated directories deleted.
    pub removed: u64,
    /// Dated directories a dry run would have deleted.
    pub would_remove: u64,
}

/// Fatal sweep failures.
///
/// Per-path parse and date errors never surface here; they are the walker's
/// signal to keep going.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("walking the storage tree failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("retention decision failed: {0}")]
    Decision(#[from] PathError),
}

/// Recursive-delete capability injected into the sweep.
pub trait Remover {
    /// Remove `path` and everything beneath it. An already-absent path is
    /// success: the walk may race against its own earlier deletions.
    fn remove_all(&mut self, path: &Path) -> io::Result<()>;
}

/// [`Remover`] backed by [`std::fs::remove_dir_all`].
#[derive(Debug, Default)]
pub struct OsRemover;

impl Remover for OsRemover {
    fn remove_all(&mut self, path: &Path) -> io::Result<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Sweep parameters, assembled by the caller from configuration.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Storage root to walk; also the prefix visited paths are parsed
    /// against.
    pub storage_root: String,
    /// Wall-clock budget for the whole walk.
    pub timeout: Duration,
    /// Log expired directories instead of deleting them.
    pub dry_run: bool,
}

/// Walk the storage tree once, deleting every dated directory whose
/// retention window has passed as of `now`.
pub fn sweep<R: Remover>(
    options: &SweepOptions,
    table: &RetentionTable,
    now: DateTime<Utc>,
    remover: &mut R,
) -> Result<SweepReport, SweepError> {
    let deadline = Instant::now() + options.timeout;
    let mut report = SweepReport {
        outcome: SweepOutcome::Completed,
        visited: 0,
        kept: 0,
        removed: 0,
        would_remove: 0,
    };

    let mut walk = WalkDir::new(&options.storage_root)
        .follow_links(false)
        .into_iter();

    loop {
        if Instant::now() >= deadline {
            tracing::warn!(root = %options.storage_root, "sweep deadline expired, ending walk early");
            report.outcome = SweepOutcome::DeadlineExpired;
            break;
        }

        let entry = match walk.next() {
            None => break,
            Some(Ok(entry)) => entry,
            // Nodes that vanish mid-walk are this sweep's own earlier
            // removals.
            Some(Err(err)) if is_not_found(&err) => continue,
            Some(Err(err)) => return Err(err.into()),
        };
        report.visited += 1;

        // The unit of decision is always a directory.
        let dir: PathBuf = if entry.file_type().is_dir() {
            entry.path().to_path_buf()
        } else {
            match entry.path().parent() {
                Some(parent) => parent.to_path_buf(),
                None => continue,
            }
        };
        let dir_str = dir.to_string_lossy();
        tracing::debug!(path = %dir_str, "checking path");

        // Intermediate node above the tenant/device level, or a stray
        // subtree that does not follow the layout: not a decision point.
        let Ok(device) = DeviceDir::parse(&options.storage_root, &dir_str) else {
            continue;
        };

        let retention_days = table.resolve(device.tenant_id);
        let keep = match retention::should_keep(now, &device, &dir_str, retention_days) {
            Ok(keep) => keep,
            // Not down to a terminal date directory yet: keep descending.
            Err(PathError::DateParse { .. }) => continue,
            Err(err) => return Err(err.into()),
        };

        if keep {
            report.kept += 1;
            walk.skip_current_dir();
            continue;
        }

        if options.dry_run {
            report.would_remove += 1;
            tracing::info!(
                path = %dir_str,
                tenant = device.tenant_id,
                retention_days,
                "dry run: would remove expired directory"
            );
        } else {
            remover
                .remove_all(&dir)
                .map_err(|source| SweepError::Remove {
                    path: dir.clone(),
                    source,
                })?;
            report.removed += 1;
            tracing::info!(
                path = %dir_str,
                tenant = device.tenant_id,
                retention_days,
                "removed expired directory"
            );
        }
        // The subtree is gone (or condemned); never descend into it.
        walk.skip_current_dir();
    }

    Ok(report)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn options(root: &Path) -> SweepOptions {
        SweepOptions {
            storage_root: root.to_string_lossy().into_owned(),
            timeout: Duration::from_secs(3600),
            dry_run: false,
        }
    }

    fn default_table(days: u32) -> RetentionTable {
        RetentionTable::new([(0, days)].into_iter().collect())
    }

    /// Lay out `<root>/<tenant>/<name>/<number>/<date>` with a few files.
    fn dated_dir(root: &Path, tenant: u32, name: &str, number: u32, date: &str) -> PathBuf {
        let dir = root
            .join(tenant.to_string())
            .join(name)
            .join(number.to_string())
            .join(date);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..3 {
            fs::File::create(dir.join(format!("{i}.dat"))).unwrap();
        }
        dir
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 13, 10, 0, 0).unwrap()
    }

    #[test]
    fn removes_expired_and_keeps_fresh_directories() {
        let root = TempDir::new().unwrap();
        let expired = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/01");
        let fresh = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/12");

        let report = sweep(
            &options(root.path()),
            &default_table(5),
            now(),
            &mut OsRemover,
        )
        .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Completed);
        assert!(!expired.exists());
        assert!(fresh.join("0.dat").exists());
        assert_eq!(report.removed, 1);
        assert_eq!(report.kept, 1);
        assert_eq!(report.would_remove, 0);
    }

    #[test]
    fn tenant_specific_period_overrides_default() {
        let root = TempDir::new().unwrap();
        // Ten days old; the 5-day default would purge it, but tenant 1289
        // retains for 30 days.
        let dir = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/03");
        let table = RetentionTable::new([(0, 5), (1289, 30)].into_iter().collect());

        let report = sweep(&options(root.path()), &table, now(), &mut OsRemover).unwrap();

        assert!(dir.exists());
        assert_eq!(report.removed, 0);
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn fully_retained_tree_sweeps_clean() {
        let root = TempDir::new().unwrap();
        let kept_a = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/12");
        let kept_b = dated_dir(root.path(), 77, "j2_readnews_com", 9, "2015/08/13");

        let report = sweep(
            &options(root.path()),
            &default_table(5),
            now(),
            &mut OsRemover,
        )
        .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Completed);
        assert_eq!(report.removed, 0);
        assert!(kept_a.exists());
        assert!(kept_b.exists());
    }

    #[test]
    fn elapsed_deadline_aborts_before_the_first_node() {
        let root = TempDir::new().unwrap();
        let expired = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/01");

        let opts = SweepOptions {
            timeout: Duration::ZERO,
            ..options(root.path())
        };
        let report = sweep(&opts, &default_table(5), now(), &mut OsRemover).unwrap();

        assert_eq!(report.outcome, SweepOutcome::DeadlineExpired);
        assert_eq!(report.visited, 0);
        assert!(expired.exists());
    }

    #[test]
    fn dry_run_leaves_the_tree_intact() {
        let root = TempDir::new().unwrap();
        let expired = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/01");

        let opts = SweepOptions {
            dry_run: true,
            ..options(root.path())
        };
        let report = sweep(&opts, &default_table(5), now(), &mut OsRemover).unwrap();

        assert!(expired.exists());
        assert_eq!(report.removed, 0);
        assert_eq!(report.would_remove, 1);
    }

    #[test]
    fn stray_layouts_are_left_alone() {
        let root = TempDir::new().unwrap();
        // Not tenant-addressed: a log directory and a non-numeric tenant.
        fs::create_dir_all(root.path().join("logs")).unwrap();
        fs::write(root.path().join("logs/sweep.log"), b"x").unwrap();
        let odd = root.path().join("acme/j1_readnews_com/2466/2010/01/01");
        fs::create_dir_all(&odd).unwrap();

        let report = sweep(
            &options(root.path()),
            &default_table(5),
            now(),
            &mut OsRemover,
        )
        .unwrap();

        assert_eq!(report.removed, 0);
        assert!(root.path().join("logs/sweep.log").exists());
        assert!(odd.exists());
    }

    #[test]
    fn os_remover_tolerates_an_already_absent_path() {
        let root = TempDir::new().unwrap();
        let gone = root.path().join("never/created");
        OsRemover.remove_all(&gone).unwrap();
    }

    #[test]
    fn failed_removal_aborts_the_sweep() {
        struct FailingRemover;
        impl Remover for FailingRemover {
            fn remove_all(&mut self, _path: &Path) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "sealed"))
            }
        }

        let root = TempDir::new().unwrap();
        dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/01");

        let err = sweep(
            &options(root.path()),
            &default_table(5),
            now(),
            &mut FailingRemover,
        )
        .unwrap_err();
        assert!(matches!(err, SweepError::Remove { .. }), "{err}");
    }

    #[test]
    fn zero_day_default_purges_everything_older_than_today() {
        let root = TempDir::new().unwrap();
        let yesterday = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/12");
        let today = dated_dir(root.path(), 1289, "j1_readnews_com", 2466, "2015/08/13");

        let report = sweep(
            &options(root.path()),
            &RetentionTable::default(),
            now(),
            &mut OsRemover,
        )
        .unwrap();

        assert!(!yesterday.exists());
        assert!(today.exists());
        assert_eq!(report.removed, 1);
        assert_eq!(report.kept, 1);
    }
}
