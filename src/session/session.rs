pub mod session {
    //! The single editing session: one document, one transcript, one engine.
    //! Every state change the UI can cause goes through here.
    use crate::document::document::document::Document;
    use crate::engine::engine::engine::{ExecutionEngine, RunEvent, RunId};
    use crate::engine::live::live::EvalLimits;
    use crate::language::registry::registry::LanguageId;
    use crate::output::output::output::Transcript;
    use crate::transfer::clipboard::clipboard::{copy_to_clipboard, ClipboardSink};
    use crate::transfer::download::download::DownloadBlob;
    use crate::util::error::error::{EngineError, TransferError};
    use std::path::{Path, PathBuf};
    use tokio::runtime::Handle;
    use tokio::sync::mpsc::UnboundedSender;
    use tracing::{debug, info};

    pub struct Session {
        document: Document,
        transcript: Transcript,
        engine: ExecutionEngine,
    }

    impl Session {
        pub fn new(language: LanguageId, limits: EvalLimits) -> Self {
            Self {
                document: Document::new(language),
                transcript: Transcript::new(),
                engine: ExecutionEngine::new(limits),
            }
        }

        pub fn document(&self) -> &Document {
            &self.document
        }

        pub fn transcript(&self) -> &Transcript {
            &self.transcript
        }

        pub fn language(&self) -> LanguageId {
            self.document.language()
        }

        pub fn is_running(&self) -> bool {
            self.engine.is_running()
        }

        /// Switch language: starter text replaces the document and the
        /// transcript is emptied. Output still arriving from an earlier run is
        /// dropped.
        pub fn set_language(&mut self, language: LanguageId) {
            info!(from = %self.document.language(), to = %language, "language switched");
            self.document.set_language(language);
            self.transcript.clear();
        }

        pub fn set_text(&mut self, text: impl Into<String>) {
            self.document.set_text(text);
        }

        /// Run on the calling thread.
        pub fn run(&mut self) -> Result<RunId, EngineError> {
            self.engine.run(&self.document, &mut self.transcript)
        }

        /// Run on a blocking worker; feed the events sent to `tx` back through
        /// [`Session::apply_run_event`].
        pub fn start_run(&mut self, handle: &Handle, tx: UnboundedSender<RunEvent>) -> Result<RunId, EngineError> {
            self.engine.spawn(handle, &self.document, &mut self.transcript, tx)
        }

        /// Apply one event from a background run. Returns `false` when the
        /// event belongs to a run the transcript is no longer tracking.
        pub fn apply_run_event(&mut self, event: RunEvent) -> bool {
            if self.transcript.run() != Some(event.run()) {
                debug!(run = event.run().0, "dropping event from stale run");
                return false;
            }
            match event {
                RunEvent::Output { line, .. } => self.transcript.append_line(&line),
                RunEvent::Finished { outcome, .. } => outcome.apply_to(&mut self.transcript),
            }
            true
        }

        /// Apply a finished upload read. On success the text replaces the
        /// document (language unchanged); on failure nothing changes and the
        /// error is handed back for the caller to report.
        pub fn apply_upload(&mut self, result: Result<String, TransferError>) -> Result<(), TransferError> {
            let text = result?;
            info!(bytes = text.len(), "upload applied");
            self.document.set_text(text);
            Ok(())
        }

        pub fn copy_to(&self, sink: &mut dyn ClipboardSink) -> Result<(), TransferError> {
            copy_to_clipboard(sink, self.document.text())
        }

        pub fn download_blob(&self) -> DownloadBlob {
            DownloadBlob::from_document(&self.document)
        }

        pub fn download_to(&self, dir: &Path) -> Result<PathBuf, TransferError> {
            self.download_blob().save_to(dir)
        }
    }

    impl Default for Session {
        fn default() -> Self {
            Self::new(LanguageId::default(), EvalLimits::default())
        }
    }
}
