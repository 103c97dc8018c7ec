pub mod clipboard {
    use crate::util::error::error::TransferError;
    use tracing::{info, warn};

    /// Somewhere plain text can be copied to.
    pub trait ClipboardSink {
        fn set_text(&mut self, text: &str) -> Result<(), TransferError>;
    }

    /// The OS clipboard. The handle is opened on first use and kept alive,
    /// since on X11 the copied text is only served while it exists.
    #[derive(Default)]
    pub struct SystemClipboard {
        inner: Option<arboard::Clipboard>,
    }

    impl SystemClipboard {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ClipboardSink for SystemClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), TransferError> {
            if self.inner.is_none() {
                let clipboard =
                    arboard::Clipboard::new().map_err(|e| TransferError::Clipboard(e.to_string()))?;
                self.inner = Some(clipboard);
            }
            let Some(clipboard) = self.inner.as_mut() else {
                return Err(TransferError::Clipboard("no clipboard handle".to_string()));
            };
            clipboard
                .set_text(text.to_string())
                .map_err(|e| TransferError::Clipboard(e.to_string()))
        }
    }

    /// Keeps the last copied text in memory.
    #[derive(Debug, Default)]
    pub struct MemoryClipboard {
        pub contents: Option<String>,
    }

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), TransferError> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    /// Best-effort copy. Failures are logged here and returned so the UI can
    /// show a notice; nothing else depends on the copy succeeding.
    pub fn copy_to_clipboard(sink: &mut dyn ClipboardSink, text: &str) -> Result<(), TransferError> {
        match sink.set_text(text) {
            Ok(()) => {
                info!(bytes = text.len(), "copied source to clipboard");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                Err(e)
            }
        }
    }
}
