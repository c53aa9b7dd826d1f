//! Async load orchestrator.
//!
//! Runs [`load_and_summarize`] exactly once in a tokio task and delivers the
//! outcome as a [`DashboardAction`] through an `mpsc` channel, so the TUI event
//! loop can apply it without any shared mutable state.

use std::sync::Arc;

use ev_core::config::{InsightConfig, LoaderConfig};
use ev_data::pipeline::load_and_summarize;
use ev_data::reader::SourceLocator;
use tokio::sync::mpsc;

use crate::store::{DashboardAction, LoadedDashboard};

// ── LoadOrchestrator ──────────────────────────────────────────────────────────

/// Background loader for the dashboard.
///
/// Call [`LoadOrchestrator::start`] to spawn the load and receive the channel
/// endpoint on which its single outcome arrives.
pub struct LoadOrchestrator {
    source: SourceLocator,
    loader: LoaderConfig,
    insights: InsightConfig,
}

impl LoadOrchestrator {
    pub fn new(source: SourceLocator, loader: LoaderConfig, insights: InsightConfig) -> Self {
        Self {
            source,
            loader,
            insights,
        }
    }

    /// Start the load.
    ///
    /// Returns:
    /// - An `mpsc::Receiver<DashboardAction>` yielding exactly one
    ///   `LoadCompleted` or `LoadFailed` before closing.
    /// - A [`LoadHandle`] that can be used to abort the load.
    pub fn start(self) -> (mpsc::Receiver<DashboardAction>, LoadHandle) {
        let (tx, rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let action = self.run().await;
            if let Err(e) = tx.send(action).await {
                tracing::warn!(error = %e, "failed to deliver load outcome; receiver dropped");
            }
        });

        (rx, LoadHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Run the pipeline and translate its result into a state action.
    async fn run(self) -> DashboardAction {
        match load_and_summarize(&self.source, &self.loader, &self.insights).await {
            Ok((dataset, summary)) => DashboardAction::LoadCompleted(Arc::new(LoadedDashboard {
                source: self.source.to_string(),
                dataset,
                summary,
            })),
            Err(e) => {
                tracing::error!(source = %self.source, error = %e, "dataset load failed");
                DashboardAction::LoadFailed(e.to_string())
            }
        }
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// A handle to the background load task.
pub struct LoadHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl LoadHandle {
    /// Immediately abort the load if it is still running.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the task has delivered its outcome or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn orchestrator_for(path: std::path::PathBuf) -> LoadOrchestrator {
        LoadOrchestrator::new(
            SourceLocator::File(path),
            LoaderConfig::default(),
            InsightConfig::default(),
        )
    }

    #[test]
    fn test_orchestrator_creation() {
        let orch = orchestrator_for("/tmp/ev.csv".into());
        assert_eq!(orch.source.to_string(), "/tmp/ev.csv");
        assert_eq!(orch.loader, LoaderConfig::default());
        assert_eq!(orch.insights, InsightConfig::default());
    }

    #[tokio::test]
    async fn test_orchestrator_delivers_loaded_dashboard() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ev.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(
            b"Make,Model,Model Year,Electric Vehicle Type,Electric Range\n\
              TESLA,MODEL 3,2020,Battery Electric Vehicle (BEV),266\n\
              NISSAN,LEAF,2013,Battery Electric Vehicle (BEV),75\n",
        )
        .unwrap();

        let (mut rx, handle) = orchestrator_for(path).start();

        let action = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for load outcome")
            .expect("channel closed before delivering outcome");

        match action {
            DashboardAction::LoadCompleted(data) => {
                assert_eq!(data.dataset.len(), 2);
                assert_eq!(data.summary.total_evs, 2);
                assert_eq!(data.summary.avg_range, 171);
                assert!(data.source.ends_with("ev.csv"));
            }
            other => panic!("unexpected action: {other:?}"),
        }

        // Exactly one outcome, then the channel closes.
        assert!(rx.recv().await.is_none());
        handle.abort();
    }

    #[tokio::test]
    async fn test_orchestrator_delivers_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut rx, _handle) = orchestrator_for(dir.path().join("missing.csv")).start();

        let action = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for load outcome")
            .expect("channel closed before delivering outcome");

        match action {
            DashboardAction::LoadFailed(msg) => assert!(msg.contains("Failed to read file")),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_orchestrator_start_and_abort() {
        let dir = tempfile::TempDir::new().unwrap();
        let (_rx, handle) = orchestrator_for(dir.path().join("ev.csv")).start();
        handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }
}
