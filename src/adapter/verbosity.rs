//! Verbosity mapping
//!
//! Front-end verbosity is additive and open-ended; the backend has a fixed
//! set of severities. `V(n)` adds `max(n, 0)` to the running verbosity and an
//! info-style record is emitted at [`INFO_SEVERITY`] made that many steps more
//! verbose, stopping at the most verbose level the backend defines.

use crate::core::{Backend, LogLevel};

/// Severity of an info-style record with no verbosity offset
pub const INFO_SEVERITY: LogLevel = LogLevel::Info;

/// Add a `V(requested)` call to the running verbosity; negatives count as zero
#[inline]
pub fn accumulate(current: u32, requested: i32) -> u32 {
    current.saturating_add(requested.max(0) as u32)
}

/// Backend severity for `base` made `verbosity` steps more verbose
///
/// ```
/// use rust_logr_adapter::adapter::verbosity::{compute_severity, INFO_SEVERITY};
/// use rust_logr_adapter::LogLevel;
///
/// assert_eq!(compute_severity(INFO_SEVERITY, 1), LogLevel::Debug);
/// assert_eq!(compute_severity(INFO_SEVERITY, 9), LogLevel::Trace);
/// ```
#[inline]
pub fn compute_severity(base: LogLevel, verbosity: u32) -> LogLevel {
    base.more_verbose(verbosity)
}

/// Whether the backend currently permits `severity`
///
/// The backend's minimum level is read on every call, never cached.
#[inline]
pub fn enabled(backend: &dyn Backend, severity: LogLevel) -> bool {
    backend.is_enabled_at(severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Logger;

    #[test]
    fn test_negative_requests_are_ignored() {
        assert_eq!(accumulate(0, -10), 0);
        assert_eq!(accumulate(3, -1), 3);
        assert_eq!(accumulate(1, 2), 3);
    }

    #[test]
    fn test_accumulate_saturates() {
        assert_eq!(accumulate(u32::MAX - 1, i32::MAX), u32::MAX);
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(compute_severity(INFO_SEVERITY, 0), LogLevel::Info);
        assert_eq!(compute_severity(INFO_SEVERITY, 1), LogLevel::Debug);
        assert_eq!(compute_severity(INFO_SEVERITY, 2), LogLevel::Trace);
        assert_eq!(compute_severity(INFO_SEVERITY, 3), LogLevel::Trace);
    }

    #[test]
    fn test_enabled_reads_live_level() {
        let backend = Logger::new();
        let severity = compute_severity(INFO_SEVERITY, 2);
        assert!(!enabled(&backend, severity));

        backend.set_min_level(LogLevel::Trace);
        assert!(enabled(&backend, severity));
    }
}
