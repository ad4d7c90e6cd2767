//! Settings dialog trigger.
//!
//! The dialog's form logic lives elsewhere; the controller only opens and
//! closes it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Open/close handle for the settings dialog.
pub trait SettingsDialogTrigger: Send + Sync {
    fn open(&self);

    fn close(&self);

    fn is_open(&self) -> bool;
}

/// In-process settings dialog flag.
#[derive(Debug, Default)]
pub struct SettingsDialogToggle {
    open: AtomicBool,
}

impl SettingsDialogToggle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsDialogTrigger for SettingsDialogToggle {
    fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}
