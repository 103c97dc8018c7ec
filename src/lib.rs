//! polypad: a terminal code editor with a JavaScript run panel.
//!
//! The library holds everything that is not terminal rendering: the language
//! registry and highlighter, the document store, the transfer adapters
//! (clipboard, download, upload), the execution engine and the session that
//! ties them together. The `polypad` binary in `src/bin/cli` drives it.

pub mod document;
pub mod engine;
pub mod language;
pub mod output;
pub mod session;
pub mod transfer;
pub mod util;
