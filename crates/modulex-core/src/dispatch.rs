//! Background execution of ordered, delayed instruction plans.
//!
//! A [`DispatchPlan`] is an ordered list of `(delay, signal)` steps. The
//! [`Dispatcher`] detaches each plan onto its own tokio task; within a run the
//! steps are delivered strictly in declaration order, each after sleeping its
//! delay measured from the end of the previous step. Failed deliveries are
//! logged and the run moves on. Runs are never cancelled.

use crate::notifier::{Notifier, Signal};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchStep {
    pub delay: Duration,
    pub signal: Signal,
}

impl DispatchStep {
    pub fn new(delay: Duration, signal: Signal) -> Self {
        Self { delay, signal }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub name: String,
    pub steps: Vec<DispatchStep>,
}

impl DispatchPlan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step that fires `delay` after the previous one.
    pub fn then(mut self, delay: Duration, signal: Signal) -> Self {
        self.steps.push(DispatchStep::new(delay, signal));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of each step from the start of the run.
    pub fn offsets(&self) -> Vec<Duration> {
        self.steps
            .iter()
            .scan(Duration::ZERO, |at, step| {
                *at += step.delay;
                Some(*at)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running { step: usize },
    Completed,
}

/// Summary handed back through the run's join handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub plan: String,
    pub sent: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// One execution of a plan. Owned by the task that runs it.
#[derive(Debug)]
pub struct DispatchRun {
    plan: DispatchPlan,
    state: RunState,
    started_at: Option<Instant>,
}

impl DispatchRun {
    pub fn new(plan: DispatchPlan) -> Self {
        Self {
            plan,
            state: RunState::Pending,
            started_at: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Drive the run to completion. Afterwards the run reports `Completed`
    /// and keeps its start time.
    pub async fn execute(&mut self, notifier: &dyn Notifier) -> RunReport {
        let started_at = Instant::now();
        self.started_at = Some(started_at);
        let (mut sent, mut failed) = (0, 0);

        debug!(steps = self.plan.len(), "dispatch run started");
        for (index, step) in self.plan.steps.iter().enumerate() {
            self.state = RunState::Running { step: index };
            tokio::time::sleep(step.delay).await;

            let delivery = notifier.deliver(&step.signal).await;
            if delivery.is_sent() {
                sent += 1;
            } else {
                failed += 1;
                warn!(step = index, signal = %step.signal.describe(), "step delivery failed, continuing");
            }
        }
        self.state = RunState::Completed;

        let report = RunReport {
            plan: self.plan.name.clone(),
            sent,
            failed,
            elapsed: started_at.elapsed(),
        };
        info!(sent, failed, "dispatch run completed");
        report
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Launches plans onto background tasks. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Start `plan` on its own task and return immediately. Dropping the
    /// handle detaches the run; it still completes.
    pub fn launch(&self, plan: DispatchPlan) -> JoinHandle<RunReport> {
        let notifier = Arc::clone(&self.notifier);
        let span = info_span!("dispatch_run", plan = %plan.name);
        tokio::spawn(
            async move {
                let mut run = DispatchRun::new(plan);
                run.execute(notifier.as_ref()).await
            }
            .instrument(span),
        )
    }
}
