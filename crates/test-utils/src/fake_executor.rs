use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use dagmake::dag::ScheduledTarget;
use dagmake::engine::{RuntimeEvent, TargetOutcome};
use dagmake::exec::ExecutorBackend;
use dagmake::errors::Result;

/// A fake executor that:
/// - records which targets were dispatched, in order
/// - immediately reports `TargetCompleted` for each, failing the ones
///   registered with [`FakeExecutor::fail`].
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failures: HashMap<String, i32>,
    cancels: Arc<Mutex<usize>>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            failures: HashMap::new(),
            cancels: Arc::new(Mutex::new(0)),
        }
    }

    /// Make `target` fail with exit status `code`.
    pub fn fail(mut self, target: &str, code: i32) -> Self {
        self.failures.insert(target.to_string(), code);
        self
    }

    /// Shared counter of `cancel()` calls.
    pub fn cancels(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.cancels)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn dispatch(
        &mut self,
        target: ScheduledTarget,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let outcome = match self.failures.get(&target.name) {
            Some(code) => TargetOutcome::Failed(*code),
            None => TargetOutcome::Success,
        };

        Box::pin(async move {
            executed.lock().unwrap().push(target.name.clone());

            tx.send(RuntimeEvent::TargetCompleted {
                target: target.name.clone(),
                outcome,
            })
            .await
            .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }

    fn cancel(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let cancels = Arc::clone(&self.cancels);
        Box::pin(async move {
            *cancels.lock().unwrap() += 1;
            Ok(())
        })
    }
}
