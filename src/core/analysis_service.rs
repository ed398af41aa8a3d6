use crate::core::config::AnalysisConfig;
use crate::core::video_analyzer::VideoAnalyzer;
use crate::models::analysis::{AnalysisOutcome, SummaryRecord};
use crate::models::pose::{PoseError, PoseResult};
use crate::platform::pose::LandmarkBridge;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};
use tracing::Instrument;
use uuid::Uuid;

/// Default number of videos analyzed at the same time
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

// ==============================================================================
// Analysis Service
// ==============================================================================

/// Async front for video analysis.
///
/// Each run executes on the blocking pool with its own analyzer, classifier
/// and gait detector. Only the bridge and a snapshot of the config are shared.
pub struct AnalysisService {
    bridge: Arc<dyn LandmarkBridge>,
    config: Arc<RwLock<AnalysisConfig>>,
    permits: Arc<Semaphore>,
}

impl AnalysisService {
    pub fn new(bridge: Arc<dyn LandmarkBridge>, config: AnalysisConfig) -> Self {
        Self::with_max_concurrent(bridge, config, DEFAULT_MAX_CONCURRENT)
    }

    pub fn with_max_concurrent(
        bridge: Arc<dyn LandmarkBridge>,
        config: AnalysisConfig,
        max_concurrent: usize,
    ) -> Self {
        Self {
            bridge,
            config: Arc::new(RwLock::new(config)),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn config(&self) -> AnalysisConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration used by runs started after this call
    pub async fn update_config(&self, config: AnalysisConfig) -> PoseResult<()> {
        config.validate()?;
        *self.config.write().await = config;
        Ok(())
    }

    /// Analyze one video
    pub async fn analyze(&self, video: &str) -> AnalysisOutcome {
        self.run_future(video.to_string(), None).await.into()
    }

    /// Analyze one video, giving up after `deadline`. A run that misses the
    /// deadline produces an error, never a partial summary.
    pub async fn analyze_with_deadline(&self, video: &str, deadline: Duration) -> AnalysisOutcome {
        self.run_future(video.to_string(), Some(deadline)).await.into()
    }

    /// Analyze several videos concurrently. Outcomes keep the input order.
    pub async fn analyze_many(
        &self,
        videos: &[String],
        deadline: Option<Duration>,
    ) -> Vec<AnalysisOutcome> {
        let handles: Vec<_> = videos
            .iter()
            .map(|video| {
                let run = self.run_future(video.clone(), deadline);
                tokio::spawn(run)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PoseError::TaskFailed(e.to_string())),
            };
            outcomes.push(result.into());
        }
        outcomes
    }

    /// Build a self-contained run so it can be spawned onto the runtime
    fn run_future(
        &self,
        video: String,
        deadline: Option<Duration>,
    ) -> impl std::future::Future<Output = PoseResult<SummaryRecord>> + Send + 'static {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("analysis", %run_id, video = %video);

        execute_run(
            self.bridge.clone(),
            self.config.clone(),
            self.permits.clone(),
            video,
            deadline,
        )
        .instrument(span)
    }
}

async fn execute_run(
    bridge: Arc<dyn LandmarkBridge>,
    config: Arc<RwLock<AnalysisConfig>>,
    permits: Arc<Semaphore>,
    video: String,
    deadline: Option<Duration>,
) -> PoseResult<SummaryRecord> {
    let permit = permits
        .acquire_owned()
        .await
        .map_err(|e| PoseError::TaskFailed(e.to_string()))?;

    let config = config.read().await.clone();
    let cancel = Arc::new(AtomicBool::new(false));
    let analyzer = VideoAnalyzer::new(config).with_cancellation(cancel.clone());

    tracing::info!("starting analysis");

    let blocking_span = tracing::Span::current();
    let task_video = video.clone();
    // Held until the blocking run exits, even after a deadline fires
    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let _entered = blocking_span.enter();
        analyzer.analyze(bridge.as_ref(), &task_video)
    });

    let joined = match deadline {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                // The blocking run notices the flag between frames and exits
                cancel.store(true, Ordering::Relaxed);
                tracing::warn!(seconds = limit.as_secs_f64(), "analysis deadline exceeded");
                return Err(PoseError::DeadlineExceeded {
                    video,
                    seconds: limit.as_secs_f64(),
                });
            }
        },
        None => handle.await,
    };

    let result = joined.map_err(|e| PoseError::TaskFailed(e.to_string()))?;
    match &result {
        Ok(summary) => tracing::info!(total_frames = summary.total_frames, "analysis finished"),
        Err(e) => tracing::warn!(error = %e, "analysis failed"),
    }
    result
}
