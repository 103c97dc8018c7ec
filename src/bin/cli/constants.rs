pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
// Rows moved by PageUp/PageDown in the editor and output panels.
pub const PAGE_ROWS: usize = 10;
