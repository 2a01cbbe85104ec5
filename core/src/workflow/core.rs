//! Workflow state machine

use crate::error::WorkflowError;
use crate::router::Router;
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::trace::{TraceEntry, TraceRecorder};
use crate::workflow::{ResponseSynthesizer, WorkflowRecord};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::runtime::{Builder, Runtime};

/// Stages of one workflow invocation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Route,
    Execute,
    Synthesize,
    Done,
}

impl Stage {
    /// The stage that follows this one; `Done` is terminal
    pub fn next(self) -> Stage {
        match self {
            Stage::Route => Stage::Execute,
            Stage::Execute => Stage::Synthesize,
            Stage::Synthesize | Stage::Done => Stage::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Route => "route",
            Stage::Execute => "execute",
            Stage::Synthesize => "synthesize",
            Stage::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a successfully built workflow needs to run a query
pub(crate) struct WorkflowCore {
    pub(crate) router: Router,
    pub(crate) executor: ToolExecutor,
    pub(crate) synthesizer: ResponseSynthesizer,
    pub(crate) trace: Option<Arc<TraceRecorder>>,
}

impl WorkflowCore {
    async fn execute(&self, query: &str) -> WorkflowRecord {
        let run_id = uuid::Uuid::new_v4().to_string();
        let start_time = Instant::now();
        let mut record = WorkflowRecord::new(query);

        self.trace(TraceEntry::run_started(&run_id, query)).await;

        let mut stage = Stage::Route;
        while stage != Stage::Done {
            let stage_error = self.step(stage, &mut record).await;

            let output = match stage {
                Stage::Route => &record.selected_tool,
                Stage::Execute => &record.tool_result,
                Stage::Synthesize | Stage::Done => &record.final_response,
            };
            tracing::debug!("Stage {} completed", stage);
            self.trace(TraceEntry::stage_completed(
                &run_id,
                stage.as_str(),
                output,
                stage_error.as_deref(),
            ))
            .await;

            stage = stage.next();
            tokio::task::yield_now().await;
        }

        let duration = start_time.elapsed().as_millis() as u64;
        let error = record.has_error().then_some(record.error.as_str());
        self.trace(TraceEntry::run_completed(
            &run_id,
            &record.selected_tool,
            error,
            duration,
        ))
        .await;

        tracing::info!(
            "Query handled by {} in {}ms{}",
            record.selected_tool,
            duration,
            if record.has_error() { " with errors" } else { "" }
        );

        record
    }

    /// Run one stage, writing its field; returns the stage's failure, if any
    ///
    /// A stage that succeeds leaves an earlier stage's error in place.
    async fn step(&self, stage: Stage, record: &mut WorkflowRecord) -> Option<String> {
        match stage {
            Stage::Route => {
                let decision = self.router.decide(&record.query);
                match &decision.matched_keyword {
                    Some(keyword) => tracing::debug!("Routed to {} by keyword {:?}", decision.tool, keyword),
                    None => tracing::debug!("No keyword matched, routed to {}", decision.tool),
                }
                record.selected_tool = decision.tool;
                None
            }
            Stage::Execute => {
                let result = self
                    .executor
                    .invoke(&record.selected_tool, &record.query)
                    .await;
                record.tool_result = result.content;
                if let Some(error) = &result.error {
                    record.error = error.clone();
                }
                result.error
            }
            Stage::Synthesize => {
                let synthesis = self
                    .synthesizer
                    .synthesize(&record.query, &record.selected_tool, &record.tool_result)
                    .await;
                record.final_response = synthesis.final_response;
                if let Some(error) = &synthesis.error {
                    record.error = error.clone();
                }
                synthesis.error
            }
            Stage::Done => None,
        }
    }

    async fn trace(&self, entry: TraceEntry) {
        if let Some(recorder) = &self.trace {
            if let Err(e) = recorder.record(entry).await {
                tracing::warn!("Failed to record trace entry: {}", e);
            }
        }
    }
}

/// Runtime used by the blocking entry point
///
/// Shut down in the background on drop, so a workflow may be dropped inside
/// another runtime.
struct BlockingRuntime(Option<Runtime>);

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Linear route, execute, synthesize workflow
///
/// Built by [`WorkflowBuilder`](crate::workflow::WorkflowBuilder). A workflow
/// whose construction failed still answers every query with a fixed error
/// record. Invocations share no mutable state and may run concurrently.
pub struct Workflow {
    state: Result<Arc<WorkflowCore>, WorkflowError>,
    blocking: OnceLock<BlockingRuntime>,
}

impl Workflow {
    pub(crate) fn ready(core: WorkflowCore) -> Self {
        Self {
            state: Ok(Arc::new(core)),
            blocking: OnceLock::new(),
        }
    }

    pub(crate) fn failed(error: WorkflowError) -> Self {
        Self {
            state: Err(error),
            blocking: OnceLock::new(),
        }
    }

    /// Whether construction succeeded
    pub fn is_initialized(&self) -> bool {
        self.state.is_ok()
    }

    /// Why construction failed, if it did
    pub fn init_error(&self) -> Option<&WorkflowError> {
        self.state.as_ref().err()
    }

    /// Whether responses are tool results without generated text
    pub fn is_degraded(&self) -> bool {
        match &self.state {
            Ok(core) => core.synthesizer.is_degraded(),
            Err(_) => true,
        }
    }

    pub fn registry(&self) -> Option<&ToolRegistry> {
        self.state.as_ref().ok().map(|core| core.executor.registry())
    }

    pub fn router(&self) -> Option<&Router> {
        self.state.as_ref().ok().map(|core| &core.router)
    }

    /// Handle a query asynchronously, yielding between stages
    pub async fn arun(&self, query: &str) -> WorkflowRecord {
        match &self.state {
            Ok(core) => core.execute(query).await,
            Err(error) => {
                tracing::warn!("Rejecting query, {}", error);
                WorkflowRecord::uninitialized(query, &error.to_string())
            }
        }
    }

    /// Handle a query, blocking the calling thread
    ///
    /// Safe to call from inside an async runtime; the work runs on a
    /// dedicated runtime from a scoped thread.
    pub fn run(&self, query: &str) -> WorkflowRecord {
        let runtime = match self.blocking_runtime() {
            Ok(runtime) => runtime,
            Err(e) => {
                let error = WorkflowError::Runtime {
                    message: e.to_string(),
                };
                tracing::error!("{}", error);
                return WorkflowRecord::execution_failure(query, &error.to_string());
            }
        };

        std::thread::scope(|scope| {
            scope
                .spawn(|| runtime.block_on(self.arun(query)))
                .join()
        })
        .unwrap_or_else(|_| {
            tracing::error!("Workflow thread panicked");
            WorkflowRecord::execution_failure(query, "workflow thread panicked")
        })
    }

    fn blocking_runtime(&self) -> std::io::Result<&Runtime> {
        if self.blocking.get().is_none() {
            let runtime = Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("toolflow-blocking")
                .enable_all()
                .build()?;
            // Losing a race just shuts the extra runtime down
            let _ = self.blocking.set(BlockingRuntime(Some(runtime)));
        }

        self.blocking
            .get()
            .and_then(|runtime| runtime.0.as_ref())
            .ok_or_else(|| std::io::Error::other("blocking runtime unavailable"))
    }
}
