//! Stderr diagnostics.
//!
//! Messages go straight to stderr unless the TUI holds the terminal, in which
//! case they are queued and printed after it is restored. Verbose-only
//! messages are dropped unless `--verbose` was given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static HELD: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn held() -> MutexGuard<'static, Option<Vec<String>>> {
    HELD.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Start queueing messages instead of printing them.
pub fn hold() {
    let mut guard = held();
    if guard.is_none() {
        *guard = Some(Vec::new());
    }
}

/// Stop queueing and return everything queued since `hold`.
pub fn release() -> Vec<String> {
    held().take().unwrap_or_default()
}

pub fn emit(msg: String) {
    let mut guard = held();
    match guard.as_mut() {
        Some(queue) => queue.push(msg),
        None => {
            drop(guard);
            eprintln!("{}", msg);
        }
    }
}

/// Like `eprintln!`, but queued while the TUI is active.
#[macro_export]
macro_rules! diag {
    ($($arg:tt)*) => {
        $crate::diagnostics::emit(format!($($arg)*))
    };
}

/// `diag!` that only fires with `--verbose`.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::diagnostics::is_verbose() {
            $crate::diagnostics::emit(format!($($arg)*))
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_queues_until_release() {
        hold();
        emit("first".to_string());
        crate::diag!("second {}", 2);
        let queued = release();
        assert!(queued.contains(&"first".to_string()));
        assert!(queued.contains(&"second 2".to_string()));
        assert!(release().is_empty());
    }
}
