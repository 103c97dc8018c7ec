pub mod registry {
    //! The closed set of editor languages. Every lookup here is a total match
    //! over `LanguageId`, so adding a language fails to compile until each
    //! table has an entry for it.
    use crate::util::error::error::UnknownLanguage;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LanguageId {
        #[default]
        JavaScript,
        Java,
        Python,
    }

    /// How a language is executed when the user presses Run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Strategy {
        /// Evaluated for real by the embedded JavaScript engine.
        Live,
        /// Never executed; a canned transcript ending in `sample_output` is
        /// shown instead.
        Placeholder { sample_output: &'static str },
    }

    /// Tree-sitter grammar backing a highlight mode.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Grammar {
        JavaScript,
        Java,
        Python,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ModeDescriptor {
        pub name: &'static str,
        pub grammar: Grammar,
        pub line_comment: &'static str,
        /// Keywords used when the tree-sitter path is unavailable.
        pub keywords: &'static [&'static str],
    }

    const JAVASCRIPT_STARTER: &str = r#"// JavaScript Example
console.log("Hello, World!");

const a = 5;
const b = 3;
console.log("Sum:", a + b);
"#;

    const PYTHON_STARTER: &str = r#"# Python Example
print("Hello, World!")

def add(a, b):
    return a + b

print("Sum:", add(5, 3))
"#;

    const JAVA_STARTER: &str = r#"// Java Example
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

    const JAVASCRIPT_KEYWORDS: &[&str] = &[
        "function", "const", "let", "var", "class", "return", "if", "else", "for", "while",
        "async", "await", "import", "export", "from", "new", "this", "try", "catch", "throw",
    ];

    const PYTHON_KEYWORDS: &[&str] = &[
        "def", "class", "import", "from", "return", "if", "elif", "else", "for", "while", "in",
        "with", "as", "lambda", "yield", "try", "except", "finally", "raise", "pass", "None",
        "True", "False",
    ];

    const JAVA_KEYWORDS: &[&str] = &[
        "public", "private", "protected", "class", "static", "void", "int", "boolean", "if",
        "else", "for", "while", "return", "new", "this", "super", "extends", "implements",
        "import", "package", "final",
    ];

    impl LanguageId {
        /// Display order used by the language selector.
        pub const ALL: [LanguageId; 3] = [LanguageId::JavaScript, LanguageId::Python, LanguageId::Java];

        pub fn label(self) -> &'static str {
            match self {
                LanguageId::JavaScript => "JavaScript",
                LanguageId::Java => "Java",
                LanguageId::Python => "Python",
            }
        }

        pub fn starter_text(self) -> &'static str {
            match self {
                LanguageId::JavaScript => JAVASCRIPT_STARTER,
                LanguageId::Java => JAVA_STARTER,
                LanguageId::Python => PYTHON_STARTER,
            }
        }

        /// File extension including the leading dot.
        pub fn file_extension(self) -> &'static str {
            match self {
                LanguageId::JavaScript => ".js",
                LanguageId::Java => ".java",
                LanguageId::Python => ".py",
            }
        }

        pub fn highlight_mode(self) -> ModeDescriptor {
            match self {
                LanguageId::JavaScript => ModeDescriptor {
                    name: "javascript",
                    grammar: Grammar::JavaScript,
                    line_comment: "//",
                    keywords: JAVASCRIPT_KEYWORDS,
                },
                LanguageId::Java => ModeDescriptor {
                    name: "java",
                    grammar: Grammar::Java,
                    line_comment: "//",
                    keywords: JAVA_KEYWORDS,
                },
                LanguageId::Python => ModeDescriptor {
                    name: "python",
                    grammar: Grammar::Python,
                    line_comment: "#",
                    keywords: PYTHON_KEYWORDS,
                },
            }
        }

        pub fn strategy(self) -> Strategy {
            match self {
                LanguageId::JavaScript => Strategy::Live,
                LanguageId::Java => Strategy::Placeholder {
                    sample_output: "Hello, World!",
                },
                LanguageId::Python => Strategy::Placeholder {
                    sample_output: "Hello, World!\nSum: 8",
                },
            }
        }

        /// Guess a language from a file name. `.ts`/`.tsx` map to JavaScript
        /// since that is the closest highlight mode we have.
        pub fn from_path(path: &std::path::Path) -> Option<Self> {
            match path.extension()?.to_str()?.to_lowercase().as_str() {
                "js" | "mjs" | "ts" | "tsx" => Some(LanguageId::JavaScript),
                "java" => Some(LanguageId::Java),
                "py" => Some(LanguageId::Python),
                _ => None,
            }
        }

        /// Index into `ALL`.
        pub fn position(self) -> usize {
            Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
        }
    }

    impl fmt::Display for LanguageId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    impl FromStr for LanguageId {
        type Err = UnknownLanguage;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_lowercase().as_str() {
                "javascript" | "js" => Ok(LanguageId::JavaScript),
                "java" => Ok(LanguageId::Java),
                "python" | "py" => Ok(LanguageId::Python),
                other => Err(UnknownLanguage(other.to_string())),
            }
        }
    }
}
