pub mod document {
    //! The in-memory document: selected language plus source text.
    use crate::language::registry::registry::LanguageId;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Document {
        language: LanguageId,
        source: String,
    }

    impl Document {
        /// A fresh document holding `language`'s starter text.
        pub fn new(language: LanguageId) -> Self {
            Self {
                language,
                source: language.starter_text().to_string(),
            }
        }

        pub fn language(&self) -> LanguageId {
            self.language
        }

        pub fn text(&self) -> &str {
            &self.source
        }

        /// Switch language, discarding the current text in favour of the
        /// starter text. Switching to the current language also resets.
        pub fn set_language(&mut self, language: LanguageId) {
            self.language = language;
            self.source = language.starter_text().to_string();
        }

        pub fn set_text(&mut self, text: impl Into<String>) {
            self.source = text.into();
        }

        /// Name used when the document is downloaded.
        pub fn file_name(&self) -> String {
            format!("code{}", self.language.file_extension())
        }
    }

    impl Default for Document {
        fn default() -> Self {
            Self::new(LanguageId::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::document::Document;
    use crate::language::registry::registry::LanguageId;

    #[test]
    fn starts_with_starter_text() {
        let doc = Document::default();
        assert_eq!(doc.language(), LanguageId::JavaScript);
        assert_eq!(doc.text(), LanguageId::JavaScript.starter_text());
    }

    #[test]
    fn language_switch_discards_edits() {
        let mut doc = Document::new(LanguageId::JavaScript);
        doc.set_text("let edited = true;");
        doc.set_language(LanguageId::Python);
        assert_eq!(doc.language(), LanguageId::Python);
        assert_eq!(doc.text(), LanguageId::Python.starter_text());

        doc.set_text("print(1)");
        doc.set_language(LanguageId::Python);
        assert_eq!(doc.text(), LanguageId::Python.starter_text());
    }

    #[test]
    fn set_text_accepts_anything() {
        let mut doc = Document::new(LanguageId::Java);
        doc.set_text("");
        assert_eq!(doc.text(), "");
        assert_eq!(doc.language(), LanguageId::Java);
    }

    #[test]
    fn file_name_follows_language() {
        let mut doc = Document::default();
        assert_eq!(doc.file_name(), "code.js");
        doc.set_language(LanguageId::Java);
        assert_eq!(doc.file_name(), "code.java");
        doc.set_language(LanguageId::Python);
        assert_eq!(doc.file_name(), "code.py");
    }
}
