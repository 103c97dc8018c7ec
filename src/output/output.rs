pub mod output {
    //! The output panel's state: the transcript of the latest run and whether
    //! that run is still going.
    use crate::engine::engine::engine::RunId;

    pub const EMPTY_PROMPT: &str = "Press F5 to run your code";
    pub const RUNNING_PROMPT: &str = "Running...";

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Transcript {
        text: String,
        in_progress: bool,
        run: Option<RunId>,
    }

    impl Transcript {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn text(&self) -> &str {
            &self.text
        }

        pub fn in_progress(&self) -> bool {
            self.in_progress
        }

        /// The run whose output this transcript is collecting, if any.
        pub fn run(&self) -> Option<RunId> {
            self.run
        }

        /// Forget everything, including which run we were tracking.
        pub fn clear(&mut self) {
            self.text.clear();
            self.in_progress = false;
            self.run = None;
        }

        pub fn begin(&mut self, run: RunId) {
            self.text.clear();
            self.in_progress = true;
            self.run = Some(run);
        }

        pub fn append_line(&mut self, line: &str) {
            self.text.push_str(line);
            self.text.push('\n');
        }

        /// Replace the whole text in one write.
        pub fn set(&mut self, text: impl Into<String>) {
            self.text = text.into();
        }

        pub fn finish(&mut self) {
            self.in_progress = false;
        }

        /// What the output panel shows.
        pub fn display_text(&self) -> &str {
            if !self.text.is_empty() {
                &self.text
            } else if self.in_progress {
                RUNNING_PROMPT
            } else {
                EMPTY_PROMPT
            }
        }
    }
}
