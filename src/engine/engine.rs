pub mod engine {
    //! The run state machine. `Idle -> Running -> Idle`, with the `Running`
    //! state held by a `RunGuard`; a second `begin` while a guard is alive is
    //! rejected, so two transcripts can never interleave.
    use crate::document::document::document::Document;
    use crate::engine::live::live::{EvalLimits, LiveScript};
    use crate::engine::placeholder::placeholder;
    use crate::language::registry::registry::{LanguageId, Strategy};
    use crate::output::output::output::Transcript;
    use crate::util::error::error::{EngineError, EvaluationFault};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;
    use tokio::runtime::Handle;
    use tokio::sync::mpsc::UnboundedSender;
    use tracing::{info, warn};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct RunId(pub u64);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RunState {
        Idle,
        Running,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RunOutcome {
        Completed,
        Placeholder(String),
        Faulted(EvaluationFault),
    }

    impl RunOutcome {
        /// Final transcript write for a run, then mark it finished.
        pub fn apply_to(&self, transcript: &mut Transcript) {
            match self {
                RunOutcome::Completed => {}
                RunOutcome::Placeholder(text) => transcript.set(text.clone()),
                RunOutcome::Faulted(fault) => transcript.append_line(&format!("Error: {}", fault.message)),
            }
            transcript.finish();
        }
    }

    /// Progress of a background run, tagged with the run it belongs to.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RunEvent {
        Output { run: RunId, line: String },
        Finished { run: RunId, outcome: RunOutcome },
    }

    impl RunEvent {
        pub fn run(&self) -> RunId {
            match self {
                RunEvent::Output { run, .. } | RunEvent::Finished { run, .. } => *run,
            }
        }
    }

    /// Holds the engine in `Running`; dropping it returns to `Idle`.
    #[derive(Debug)]
    pub struct RunGuard {
        running: Arc<AtomicBool>,
        run: RunId,
    }

    impl RunGuard {
        pub fn run(&self) -> RunId {
            self.run
        }
    }

    impl Drop for RunGuard {
        fn drop(&mut self) {
            self.running.store(false, Ordering::Release);
        }
    }

    pub struct ExecutionEngine {
        running: Arc<AtomicBool>,
        last_run: u64,
        limits: EvalLimits,
    }

    impl ExecutionEngine {
        pub fn new(limits: EvalLimits) -> Self {
            Self {
                running: Arc::new(AtomicBool::new(false)),
                last_run: 0,
                limits,
            }
        }

        pub fn limits(&self) -> EvalLimits {
            self.limits
        }

        pub fn state(&self) -> RunState {
            if self.running.load(Ordering::Acquire) {
                RunState::Running
            } else {
                RunState::Idle
            }
        }

        pub fn is_running(&self) -> bool {
            self.state() == RunState::Running
        }

        /// Enter `Running`, or refuse if a run is already in flight.
        pub fn begin(&mut self) -> Result<RunGuard, EngineError> {
            if self
                .running
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                warn!("run rejected: another run is in progress");
                return Err(EngineError::AlreadyRunning);
            }
            self.last_run += 1;
            Ok(RunGuard {
                running: self.running.clone(),
                run: RunId(self.last_run),
            })
        }

        /// Run `document` on the calling thread, writing into `transcript`.
        pub fn run(&mut self, document: &Document, transcript: &mut Transcript) -> Result<RunId, EngineError> {
            let guard = self.begin()?;
            let run = guard.run();
            transcript.begin(run);
            info!(run = run.0, language = %document.language(), "run started");

            let started = Instant::now();
            let lines = Rc::new(RefCell::new(Vec::new()));
            let sink = lines.clone();
            let outcome = execute(document.language(), document.text(), self.limits, move |line| {
                sink.borrow_mut().push(line)
            });
            for line in lines.take() {
                transcript.append_line(&line);
            }
            outcome.apply_to(transcript);
            drop(guard);

            log_outcome(run, &outcome, started);
            Ok(run)
        }

        /// Run `document` on a blocking worker, streaming `RunEvent`s to `tx`.
        /// `transcript` is reset for the new run before this returns.
        pub fn spawn(
            &mut self,
            handle: &Handle,
            document: &Document,
            transcript: &mut Transcript,
            tx: UnboundedSender<RunEvent>,
        ) -> Result<RunId, EngineError> {
            let guard = self.begin()?;
            let run = guard.run();
            transcript.begin(run);
            info!(run = run.0, language = %document.language(), "run started");

            let language = document.language();
            let source = document.text().to_string();
            let limits = self.limits;
            handle.spawn_blocking(move || {
                let started = Instant::now();
                let lines = tx.clone();
                let outcome = execute(language, &source, limits, move |line| {
                    let _ = lines.send(RunEvent::Output { run, line });
                });
                // Idle before Finished is observed, so an immediate re-run is accepted.
                drop(guard);
                log_outcome(run, &outcome, started);
                let _ = tx.send(RunEvent::Finished { run, outcome });
            });
            Ok(run)
        }
    }

    impl Default for ExecutionEngine {
        fn default() -> Self {
            Self::new(EvalLimits::default())
        }
    }

    /// Pick the language's strategy and produce its outcome. Console lines of
    /// live runs go to `emit`.
    pub fn execute<F>(language: LanguageId, source: &str, limits: EvalLimits, emit: F) -> RunOutcome
    where
        F: FnMut(String) + 'static,
    {
        match language.strategy() {
            Strategy::Live => match LiveScript::new(limits).evaluate(source, emit) {
                Ok(()) => RunOutcome::Completed,
                Err(fault) => RunOutcome::Faulted(fault),
            },
            Strategy::Placeholder { .. } => {
                RunOutcome::Placeholder(placeholder::transcript_for(language).unwrap_or_default())
            }
        }
    }

    fn log_outcome(run: RunId, outcome: &RunOutcome, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            RunOutcome::Completed => info!(run = run.0, elapsed_ms, "run completed"),
            RunOutcome::Placeholder(_) => info!(run = run.0, elapsed_ms, "run simulated"),
            RunOutcome::Faulted(fault) => {
                info!(run = run.0, elapsed_ms, fault = %fault, "run faulted")
            }
        }
    }
}
