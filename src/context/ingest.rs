use crate::context::{Message, Summarizer};
use crate::error::DockError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Explicit per-invocation attachment. Never persisted as-is; only the
/// message derived from it ends up in the turn.
#[derive(Debug, Clone)]
pub struct FileReference {
    pub path: PathBuf,
    pub summarize: bool,
}

impl FileReference {
    pub fn new(path: impl Into<PathBuf>, summarize: bool) -> Self {
        Self {
            path: path.into(),
            summarize,
        }
    }
}

const CODE_EXTENSIONS: [&str; 5] = ["py", "js", "ts", "ipynb", "rs"];

const TEXT_SUMMARY_PROMPT: &str =
    "Summarize the following text clearly and concisely for use as context in a coding assistant:\n\n";
const CODE_SUMMARY_PROMPT: &str =
    "Analyze the following code and explain the purpose of each function and how they are interconnected.\n\n";

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(DockError::MissingFile(path.display().to_string()).into())
}

fn read_file_strict(path: &Path) -> Result<String> {
    require_file(path)?;
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_file_lossy(path: &Path) -> Result<String> {
    require_file(path)?;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    // undecodable bytes are dropped, not substituted
    Ok(String::from_utf8_lossy(&bytes).replace('\u{FFFD}', ""))
}

/// One message per reference, order preserved. `.txt` files summarize when
/// both the reference and the global switch allow it; code files summarize
/// on the per-file flag alone and otherwise arrive fenced; everything else
/// is included verbatim with lenient decoding. A missing file is fatal:
/// attachments are explicit user input, not optional context.
pub fn ingest_files(
    summarizer: &Summarizer,
    refs: &[FileReference],
    summarize_txt_files: bool,
) -> Result<Vec<Message>> {
    let mut out = Vec::with_capacity(refs.len());

    for file in refs {
        let ext = file
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let content = if ext == "txt" {
            let text = read_file_strict(&file.path)?;
            if file.summarize && summarize_txt_files {
                summarizer.summarize(format!("{TEXT_SUMMARY_PROMPT}{text}"))?
            } else {
                text
            }
        } else if CODE_EXTENSIONS.contains(&ext.as_str()) {
            let code = read_file_strict(&file.path)?;
            if file.summarize {
                summarizer.summarize(format!("{CODE_SUMMARY_PROMPT}{code}"))?
            } else {
                format!("```\n{code}\n```")
            }
        } else {
            read_file_lossy(&file.path)?
        };

        out.push(Message::user(content));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FileReference, ingest_files};
    use crate::context::Summarizer;
    use crate::error::DockError;
    use crate::openai::testing::StubClient;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn txt_without_summarize_is_verbatim() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("notes.txt");
        fs::write(&path, "hello").expect("write");

        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, false)];

        let messages = ingest_files(&summarizer, &refs, false).expect("ingest");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn txt_summarizes_when_both_flags_allow() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("notes.txt");
        fs::write(&path, "a long document").expect("write");

        let client = StubClient::with_responses(vec![Ok("condensed".to_string())]);
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, true)];

        let messages = ingest_files(&summarizer, &refs, true).expect("ingest");
        assert_eq!(messages[0].content, "condensed");
        assert_eq!(client.call_count(), 1);
        assert!(
            client.request(0).messages[0]
                .content
                .starts_with("Summarize the following text")
        );
    }

    #[test]
    fn per_file_opt_out_beats_the_global_flag() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("notes.txt");
        fs::write(&path, "keep me whole").expect("write");

        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, false)];

        let messages = ingest_files(&summarizer, &refs, true).expect("ingest");
        assert_eq!(messages[0].content, "keep me whole");
    }

    #[test]
    fn code_without_summarize_arrives_fenced() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("tool.py");
        fs::write(&path, "def main():\n    pass\n").expect("write");

        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, false)];

        let messages = ingest_files(&summarizer, &refs, false).expect("ingest");
        assert_eq!(messages[0].content, "```\ndef main():\n    pass\n\n```");
    }

    #[test]
    fn code_with_summarize_issues_an_explain_call() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("tool.rs");
        fs::write(&path, "fn main() {}\n").expect("write");

        let client = StubClient::with_responses(vec![Ok("entry point only".to_string())]);
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, true)];

        let messages = ingest_files(&summarizer, &refs, false).expect("ingest");
        assert_eq!(messages[0].content, "entry point only");
        assert!(
            client.request(0).messages[0]
                .content
                .starts_with("Analyze the following code")
        );
    }

    #[test]
    fn unknown_extensions_decode_leniently() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("blob.dat");
        fs::write(&path, b"ok\xff\xfe bytes").expect("write");

        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(&path, true)];

        let messages = ingest_files(&summarizer, &refs, true).expect("ingest");
        assert_eq!(messages[0].content, "ok bytes");
    }

    #[test]
    fn missing_file_is_fatal() {
        let tmp = tempdir().expect("tempdir");
        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [FileReference::new(tmp.path().join("absent.txt"), false)];

        let err = ingest_files(&summarizer, &refs, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DockError>(),
            Some(DockError::MissingFile(_))
        ));
    }

    #[test]
    fn order_is_preserved_across_mixed_references() {
        let tmp = tempdir().expect("tempdir");
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.dat");
        fs::write(&a, "first").expect("write");
        fs::write(&b, "second").expect("write");

        let client = StubClient::untouchable();
        let summarizer = Summarizer {
            client: &client,
            model: "gpt-3.5-turbo",
        };
        let refs = [
            FileReference::new(&a, false),
            FileReference::new(&b, false),
        ];

        let messages = ingest_files(&summarizer, &refs, false).expect("ingest");
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }
}
