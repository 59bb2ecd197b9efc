//! Synthetic storage trees for exercising the sweeper.
//!
//! Directories are laid out through [`DeviceDir::path_for`], so generated
//! data always satisfies the naming contract the sweeper parses.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::config::SeedSettings;
use crate::storage::DeviceDir;

/// Counters from one seeding run.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub dirs_created: u64,
    pub files_created: u64,
}

/// Clear `root` and refill it with dated directories for every configured
/// device, at dates drawn uniformly from the past `span_days` days.
pub fn seed(root: &Path, settings: &SeedSettings) -> io::Result<SeedReport> {
    match fs::remove_dir_all(root) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    fs::create_dir_all(root)?;

    let mut report = SeedReport::default();
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let base = root.to_string_lossy();

    for device in &settings.devices {
        let dir = DeviceDir::new(base.as_ref(), device.tenant, &device.name, device.number);
        for _ in 0..settings.dirs_per_device {
            let age = Duration::days(rng.gen_range(0..=i64::from(settings.span_days)));
            let path = dir.path_for(now - age);
            fs::create_dir_all(&path)?;
            report.dirs_created += 1;
            tracing::debug!(path = %path.display(), "created dated directory");

            for i in 0..settings.files_per_dir {
                fs::File::create(path.join(format!("{i}.dat")))?;
                report.files_created += 1;
            }
        }
    }

    Ok(report)
}
