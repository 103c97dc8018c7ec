pub mod placeholder {
    use crate::language::registry::registry::{LanguageId, Strategy};

    /// The fixed transcript shown for a language without a runtime, or `None`
    /// when the language is executed for real. Never depends on the source.
    pub fn transcript_for(language: LanguageId) -> Option<String> {
        match language.strategy() {
            Strategy::Live => None,
            Strategy::Placeholder { sample_output } => Some(format!(
                "{label} execution is simulated in polypad.\n\
                 No {label} runtime is available, so your code was not run.\n\
                 \n\
                 Sample output:\n\
                 {sample_output}\n",
                label = language.label(),
            )),
        }
    }
}
