use core::ops::{Deref, DerefMut};

use crate::config::StoreConfig;
use crate::manager::RecordManager;
use crate::report::{LoadReport, SaveReport};

/// An open set of records: loaded on [`open`](Self::open), saved on
/// [`close`](Self::close).
///
/// A session that is dropped without being closed (an early return, `?`, or
/// an unwinding panic) saves in its destructor and logs any failure, so
/// committed records are written on every exit path.
#[derive(Debug)]
pub struct Session {
    manager: RecordManager,
    load_report: LoadReport,
    closed: bool,
}

impl Session {
    #[must_use]
    pub fn open(config: &StoreConfig) -> Self {
        let (manager, load_report) = RecordManager::load(config);
        Self {
            manager,
            load_report,
            closed: false,
        }
    }

    /// What was found on disk when the session opened.
    #[must_use]
    pub const fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Saves without ending the session.
    pub fn save(&mut self) -> SaveReport {
        self.manager.save()
    }

    /// Saves and ends the session.
    #[must_use = "the report says which collections failed to save"]
    pub fn close(mut self) -> SaveReport {
        self.closed = true;
        self.manager.save()
    }
}

impl Deref for Session {
    type Target = RecordManager;

    fn deref(&self) -> &RecordManager {
        &self.manager
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut RecordManager {
        &mut self.manager
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        tracing::debug!("session dropped without close, saving");
        let report = self.manager.save();
        for (collection, err) in report.failures() {
            tracing::error!(%collection, error = %err, "save on exit failed");
        }
    }
}
