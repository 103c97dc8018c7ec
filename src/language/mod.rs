//! Supported languages: the fixed registry of starter text, file extensions
//! and highlight modes, plus the tree-sitter highlighter those modes drive.

pub mod highlight;
pub mod registry;
