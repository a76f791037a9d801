// Insight panel - Loading -> Success/Fallback state for the trend summary
use crate::application::analysis_service::AnalysisService;
use crate::domain::dashboard::AnalysisState;
use crate::domain::election::ElectionDataset;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct PanelSnapshot {
    generation: u64,
    state: AnalysisState,
    closed: bool,
}

struct Inflight {
    dataset: Arc<ElectionDataset>,
    task: JoinHandle<()>,
}

/// Runs one analysis request per dataset reference. A result is only
/// applied while its request is still the current one, so a late response
/// never overwrites a newer load or a torn-down panel.
pub struct InsightPanel {
    service: AnalysisService,
    state: Arc<watch::Sender<PanelSnapshot>>,
    inflight: Mutex<Option<Inflight>>,
}

impl InsightPanel {
    pub fn new(service: AnalysisService) -> Self {
        let (state, _) = watch::channel(PanelSnapshot {
            generation: 0,
            state: AnalysisState::Loading,
            closed: false,
        });
        Self {
            service,
            state: Arc::new(state),
            inflight: Mutex::new(None),
        }
    }

    /// Start analysing `dataset`. Returns false when it is the dataset
    /// already loaded, in which case nothing is re-requested.
    pub fn load(&self, dataset: Arc<ElectionDataset>) -> bool {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(current) = inflight.as_ref() {
            if Arc::ptr_eq(&current.dataset, &dataset) {
                return false;
            }
        }
        if let Some(previous) = inflight.take() {
            previous.task.abort();
        }

        let generation = self.begin_generation(AnalysisState::Loading, false);
        tracing::debug!("Loading trend summary (generation {})", generation);

        let service = self.service.clone();
        let state = self.state.clone();
        let request_dataset = dataset.clone();
        let task = tokio::spawn(async move {
            let outcome = service
                .analyze(request_dataset.parties(), request_dataset.constituencies())
                .await;

            let applied = state.send_if_modified(|snapshot| {
                if snapshot.generation != generation {
                    return false;
                }
                snapshot.state = outcome;
                true
            });

            if !applied {
                tracing::debug!("Discarding stale trend summary (generation {})", generation);
            }
        });

        *inflight = Some(Inflight { dataset, task });
        true
    }

    /// Tear the panel down. Any response still in flight is discarded and
    /// pending `settled` calls return the state as it was.
    pub fn close(&self) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = inflight.take() {
            previous.task.abort();
        }
        let current = self.state.borrow().state.clone();
        self.begin_generation(current, true);
    }

    pub fn snapshot(&self) -> AnalysisState {
        self.state.borrow().state.clone()
    }

    /// Wait until the current request has settled, or the panel is closed.
    /// A closed panel that never settled still reports `Loading`.
    pub async fn settled(&self) -> AnalysisState {
        let mut rx = self.state.subscribe();
        match rx
            .wait_for(|snapshot| snapshot.closed || !snapshot.state.is_loading())
            .await
        {
            Ok(snapshot) => snapshot.state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    fn begin_generation(&self, state: AnalysisState, closed: bool) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = state;
            snapshot.closed = closed;
            generation = snapshot.generation;
        });
        generation
    }
}

impl Drop for InsightPanel {
    fn drop(&mut self) {
        self.close();
    }
}
