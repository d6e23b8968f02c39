//! Phase reporting for install and uninstall operations.
//!
//! The installer announces every [`Phase`] through a [`ProgressReporter`]:
//! `begin` before the phase does any work, then exactly one of `succeed` or
//! `fail`. Reporters are purely observational; nothing they do can change
//! the outcome of an operation.
//!
//! Any `Fn(PhaseEvent)` closure is a reporter, which keeps tests and small
//! front ends short:
//!
//! ```rust
//! use gibson::{PhaseEvent, ProgressReporter, Phase};
//!
//! let reporter = |event: PhaseEvent| println!("{}: {}", event.phase(), event.message());
//! reporter.begin(Phase::Find, "looking for jane/Widget");
//! ```

/// A reportable step of the install pipeline.
///
/// Install runs `Find` (author/title references only), `Get`, `Download`
/// and `Install` in that order. `Uninstall` is the single phase of an
/// uninstall.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Searching the registry for an author's asset, or finding it in the cache.
    Find,
    /// Retrieving the metadata of a single asset by id.
    Get,
    /// Downloading the archive into the cache.
    Download,
    /// Extracting the archive into the install directory.
    Install,
    /// Removing an asset's cached archives.
    Uninstall,
}

/// A single phase transition, as delivered to closure reporters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseEvent {
    /// The phase is about to start.
    Begin {
        /// The phase being started.
        phase: Phase,
        /// What the phase is about to do.
        message: String,
    },

    /// The phase completed.
    Succeeded {
        /// The phase that completed.
        phase: Phase,
        /// Summary of the result.
        message: String,
    },

    /// The phase failed and the operation was aborted.
    Failed {
        /// The phase that failed.
        phase: Phase,
        /// Human-readable failure reason.
        message: String,
    },
}

impl PhaseEvent {
    /// The phase this event belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Begin { phase, .. } | Self::Succeeded { phase, .. } | Self::Failed { phase, .. } => {
                *phase
            }
        }
    }

    /// The message attached to this event.
    pub fn message(&self) -> &str {
        match self {
            Self::Begin { message, .. }
            | Self::Succeeded { message, .. }
            | Self::Failed { message, .. } => message,
        }
    }

    /// Check if this event closes its phase.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gibson::{Phase, PhaseEvent};
    ///
    /// let event = PhaseEvent::Begin { phase: Phase::Get, message: "retrieving 42 info".into() };
    /// assert!(!event.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Begin { .. })
    }
}

/// Receives phase transitions from the installer.
pub trait ProgressReporter: Send + Sync {
    /// A phase is about to start.
    fn begin(&self, phase: Phase, message: &str);

    /// A phase completed successfully.
    fn succeed(&self, phase: Phase, message: &str);

    /// A phase failed; the operation stops after this call.
    fn fail(&self, phase: Phase, message: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(PhaseEvent) + Send + Sync,
{
    fn begin(&self, phase: Phase, message: &str) {
        self(PhaseEvent::Begin {
            phase,
            message: message.to_string(),
        });
    }

    fn succeed(&self, phase: Phase, message: &str) {
        self(PhaseEvent::Succeeded {
            phase,
            message: message.to_string(),
        });
    }

    fn fail(&self, phase: Phase, message: &str) {
        self(PhaseEvent::Failed {
            phase,
            message: message.to_string(),
        });
    }
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn begin(&self, _phase: Phase, _message: &str) {}
    fn succeed(&self, _phase: Phase, _message: &str) {}
    fn fail(&self, _phase: Phase, _message: &str) {}
}

/// Reporter that forwards events to `tracing`.
///
/// Used by [`Installer::new`](crate::Installer::new) when no other reporter
/// is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn begin(&self, phase: Phase, message: &str) {
        tracing::info!(%phase, "{}", message);
    }

    fn succeed(&self, phase: Phase, message: &str) {
        tracing::info!(%phase, "{}", message);
    }

    fn fail(&self, phase: Phase, message: &str) {
        tracing::error!(%phase, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use strum::IntoEnumIterator;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Find.to_string(), "find");
        assert_eq!(Phase::Get.to_string(), "get");
        assert_eq!(Phase::Download.to_string(), "download");
        assert_eq!(Phase::Install.to_string(), "install");
        assert_eq!(Phase::Uninstall.as_ref(), "uninstall");
    }

    #[test]
    fn test_phase_order() {
        let phases: Vec<_> = Phase::iter().collect();
        assert_eq!(
            phases,
            vec![
                Phase::Find,
                Phase::Get,
                Phase::Download,
                Phase::Install,
                Phase::Uninstall
            ]
        );
    }

    #[test]
    fn test_closure_reporter_receives_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let reporter = move |event: PhaseEvent| events_clone.lock().unwrap().push(event);

        reporter.begin(Phase::Download, "downloading jane/Widget");
        reporter.fail(Phase::Download, "download failed");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            PhaseEvent::Begin {
                phase: Phase::Download,
                message: "downloading jane/Widget".to_string()
            }
        );
        assert!(!events[0].is_terminal());
        assert!(events[1].is_terminal());
        assert_eq!(events[1].phase(), Phase::Download);
        assert_eq!(events[1].message(), "download failed");
    }

    #[test]
    fn test_noop_reporter_is_object_safe() {
        let reporter: Box<dyn ProgressReporter> = Box::new(NoopReporter);
        reporter.begin(Phase::Find, "looking");
        reporter.succeed(Phase::Find, "found");
    }
}
