pub mod logging {
    //! File-backed tracing. The terminal belongs to the UI, so log lines never
    //! go to stdout or stderr.
    use std::error::Error;
    use std::fs::{self, OpenOptions};
    use std::path::Path;
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    /// Environment variable holding an `EnvFilter` directive, e.g. `polypad=debug`.
    pub const LOG_ENV: &str = "POLYPAD_LOG";

    pub fn init(path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .try_init()
            .map_err(|e| e as Box<dyn Error>)?;
        Ok(())
    }
}
