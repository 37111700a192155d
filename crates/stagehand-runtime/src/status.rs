//! Status display polling
//!
//! Mirrors one variable of the first target onto a host display. The
//! program may not be loaded yet when a poll fires; such polls are skipped.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use stagehand_core::{Project, ProgramView};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Program slot shared between the loader and the poller
pub type SharedProgram<P = Project> = Arc<RwLock<Option<P>>>;

/// Tracks the last text pushed to the display
#[derive(Clone, Debug)]
pub struct StatusMonitor {
    variable: String,
    last: Option<String>,
}

impl StatusMonitor {
    pub fn new(variable: impl Into<String>) -> Self {
        StatusMonitor {
            variable: variable.into(),
            last: None,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Poll once. Returns the text to display when it changed.
    pub fn update(&mut self, program: Option<&dyn ProgramView>) -> Option<String> {
        let Some(program) = program else {
            tracing::trace!("status poll skipped: no program loaded");
            return None;
        };
        let target = program.targets().first()?;
        let text = match target.variable_named(&self.variable) {
            Some(var) => var.display(),
            None => {
                tracing::trace!(variable = %self.variable, "status poll skipped: variable missing");
                return None;
            }
        };

        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text.clone());
        Some(text)
    }
}

/// Poll `program` every `period`, pushing changed text to `display` until
/// `shutdown` flips to `true` or its sender is dropped.
pub async fn run_status_poller<P, F>(
    mut monitor: StatusMonitor,
    program: SharedProgram<P>,
    period: Duration,
    mut display: F,
    mut shutdown: watch::Receiver<bool>,
) -> StatusMonitor
where
    P: ProgramView + Send + Sync,
    F: FnMut(&str),
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let text = {
                    let guard = program.read();
                    monitor.update(guard.as_ref().map(|p| p as &dyn ProgramView))
                };
                if let Some(text) = text {
                    display(&text);
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!(variable = %monitor.variable, "status poller stopped");
    monitor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stagehand_core::Target;

    fn project(hearts: serde_json::Value) -> Project {
        Project::new(vec![
            Target::stage().with_variable("v1", "hearts", hearts),
            Target::new("Cat").with_variable("v2", "hearts", json!(99)),
        ])
    }

    #[test]
    fn test_skips_without_program() {
        let mut monitor = StatusMonitor::new("hearts");
        assert_eq!(monitor.update(None), None);
        assert_eq!(monitor.update(Some(&Project::default())), None);
    }

    #[test]
    fn test_reads_first_target_and_reports_changes_only() {
        let mut monitor = StatusMonitor::new("hearts");
        assert_eq!(monitor.update(Some(&project(json!(3)))), Some("3".to_string()));
        assert_eq!(monitor.update(Some(&project(json!(3)))), None);
        assert_eq!(monitor.update(Some(&project(json!("two")))), Some("two".to_string()));
        assert_eq!(monitor.last(), Some("two"));
    }

    #[test]
    fn test_missing_variable_is_skipped() {
        let mut monitor = StatusMonitor::new("lives");
        assert_eq!(monitor.update(Some(&project(json!(3)))), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_pushes_changes_until_shutdown() {
        let shared: SharedProgram = Arc::new(RwLock::new(None));
        let (stop_tx, stop_rx) = watch::channel(false);
        let (text_tx, mut text_rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_status_poller(
            StatusMonitor::new("hearts"),
            Arc::clone(&shared),
            Duration::from_millis(100),
            move |text: &str| {
                let _ = text_tx.send(text.to_string());
            },
            stop_rx,
        ));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(text_rx.try_recv().is_err());

        *shared.write() = Some(project(json!(3)));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(text_rx.recv().await.unwrap(), "3");
        assert!(text_rx.try_recv().is_err());

        *shared.write() = Some(project(json!(2)));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(text_rx.recv().await.unwrap(), "2");

        stop_tx.send(true).unwrap();
        let monitor = handle.await.unwrap();
        assert_eq!(monitor.last(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_reads_live_target_list() {
        let shared: SharedProgram<Vec<Target>> = Arc::new(RwLock::new(None));
        let (stop_tx, stop_rx) = watch::channel(false);
        let (text_tx, mut text_rx) = tokio::sync::mpsc::unbounded_channel();

        let handle = tokio::spawn(run_status_poller(
            StatusMonitor::new("hearts"),
            Arc::clone(&shared),
            Duration::from_millis(100),
            move |text: &str| {
                let _ = text_tx.send(text.to_string());
            },
            stop_rx,
        ));

        *shared.write() = Some(vec![Target::stage().with_variable("v1", "hearts", json!(5))]);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(text_rx.recv().await.unwrap(), "5");

        // the VM edits its live targets in place
        if let Some(targets) = shared.write().as_mut() {
            targets[0] = Target::stage().with_variable("v1", "hearts", json!(4));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(text_rx.recv().await.unwrap(), "4");

        drop(stop_tx);
        let monitor = handle.await.unwrap();
        assert_eq!(monitor.last(), Some("4"));
    }
}
