use polypad::language::registry::registry::LanguageId;
use polypad::session::session::session::Session;
use polypad::transfer::upload::upload::read_text;
use polypad::util::config::config::Config;
use std::path::{Path, PathBuf};
use std::{env, error::Error};

#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliArgs {
    pub language: Option<LanguageId>,
    pub open: Option<PathBuf>,
    pub run: Option<PathBuf>,
    pub help: bool,
}

pub(crate) const USAGE: &str = "\
Usage: polypad [--lang <language>] [FILE]
       polypad --run FILE [--lang <language>]

Options:
  --lang <language>   javascript (js), python (py) or java
  --run FILE          Run FILE without opening the editor and print its output
  -h, --help          Show this help

Keys:
  F5 / Ctrl+R  Run          Ctrl+L  Language     Ctrl+O  Upload
  Ctrl+S       Download     Ctrl+Y  Copy         Ctrl+T  Next theme
  Ctrl+Q       Quit";

pub(crate) fn parse_cmd_args() -> Result<CliArgs, Box<dyn Error>> {
    parse_args(env::args().skip(1))
}

pub(crate) fn parse_args<I>(args: I) -> Result<CliArgs, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" | "--language" => {
                let value = args.next().ok_or("--lang needs a value")?;
                parsed.language = Some(value.parse()?);
            }
            "--run" => {
                let value = args.next().ok_or("--run needs a file")?;
                parsed.run = Some(PathBuf::from(value));
            }
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown option: {}", flag).into());
            }
            file => {
                if parsed.open.is_some() {
                    return Err(format!("Unexpected argument: {}", file).into());
                }
                parsed.open = Some(PathBuf::from(file));
            }
        }
    }
    Ok(parsed)
}

/// Non-interactive mode: run one file and print the transcript to stdout.
pub(crate) async fn run_cmd_mode(
    path: PathBuf,
    language: Option<LanguageId>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    print!("{}", run_file(&path, language, config).await?);
    Ok(())
}

/// Read and run `path`, returning the transcript. The language comes from
/// `--lang`, then the file extension, then config.
pub(crate) async fn run_file(
    path: &Path,
    language: Option<LanguageId>,
    config: &Config,
) -> Result<String, Box<dyn Error>> {
    let source = read_text(path).await?;
    let language = language
        .or_else(|| LanguageId::from_path(path))
        .unwrap_or(config.default_language);

    let mut session = Session::new(language, config.limits());
    session.set_text(source);
    // A fresh session cannot already be running.
    session.run()?;
    Ok(session.transcript().text().to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_args, run_file, CliArgs};
    use polypad::language::registry::registry::LanguageId;
    use polypad::util::config::config::Config;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_run_mode() {
        let parsed = parse_args(args(&["--run", "demo.py", "--lang", "js"])).unwrap();
        assert_eq!(
            parsed,
            CliArgs {
                language: Some(LanguageId::JavaScript),
                run: Some(PathBuf::from("demo.py")),
                ..CliArgs::default()
            }
        );
    }

    #[test]
    fn positional_file_opens_in_editor() {
        let parsed = parse_args(args(&["Main.java"])).unwrap();
        assert_eq!(parsed.open, Some(PathBuf::from("Main.java")));
        assert_eq!(parsed.run, None);
    }

    #[test]
    fn rejects_unknown_flags_and_languages() {
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["--lang", "cobol"])).is_err());
        assert!(parse_args(args(&["--lang"])).is_err());
        assert!(parse_args(args(&["a.js", "b.js"])).is_err());
    }

    #[tokio::test]
    async fn run_file_picks_language_from_extension() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();

        let script = dir.path().join("sum.js");
        fs::write(&script, "console.log('Sum:', 5 + 3)").unwrap();
        assert_eq!(run_file(&script, None, &config).await.unwrap(), "Sum: 8\n");

        let python = dir.path().join("hello.py");
        fs::write(&python, "print('ignored')").unwrap();
        let transcript = run_file(&python, None, &config).await.unwrap();
        assert!(transcript.starts_with("Python execution is simulated"));
        assert!(transcript.ends_with("Hello, World!\nSum: 8\n"));
    }

    #[tokio::test]
    async fn run_file_prefers_flag_then_config() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("sum.py");
        fs::write(&script, "console.log(2 * 21)").unwrap();
        let config = Config::default();
        let forced = run_file(&script, Some(LanguageId::JavaScript), &config).await.unwrap();
        assert_eq!(forced, "42\n");

        let untyped = dir.path().join("snippet.txt");
        fs::write(&untyped, "System.out.println(1);").unwrap();
        let config = Config {
            default_language: LanguageId::Java,
            ..Config::default()
        };
        let transcript = run_file(&untyped, None, &config).await.unwrap();
        assert!(transcript.starts_with("Java execution is simulated"));
    }

    #[tokio::test]
    async fn run_file_reports_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.js");
        assert!(run_file(&missing, None, &Config::default()).await.is_err());
    }
}
