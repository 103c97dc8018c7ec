//! Running the document: live JavaScript evaluation in an embedded QuickJS
//! runtime, or a canned transcript for languages we cannot execute.

pub mod engine;
pub mod live;
pub mod placeholder;
