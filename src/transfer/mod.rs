//! Moving text in and out of the editor: system clipboard, download to a
//! local file and upload from one.

pub mod clipboard;
pub mod download;
pub mod upload;
