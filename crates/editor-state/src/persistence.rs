use editor_core::diff_package::{self, DiffPackage};
use editor_core::encoding::{self, TextEncoding};
use editor_core::language;

use crate::document::Document;
use crate::errors::SessionResult;
use crate::session::{Layout, Mode, Session};

/// Questions the session needs a user to answer.
pub trait Prompt {
    /// Whether a diff-package file should be opened as a comparison.
    fn confirm_comparison(&mut self, file_name: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Prompt for F {
    fn confirm_comparison(&mut self, file_name: &str) -> bool {
        self(file_name)
    }
}

/// What a load ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub encoding: TextEncoding,
    pub language: String,
    pub mode: Mode,
}

/// Bytes ready to be written, with the file name to offer the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveArtifact {
    pub bytes: Vec<u8>,
    pub suggested_name: String,
}

const UNTITLED: &str = "untitled";

impl Session {
    /// Loads file contents into the session.
    ///
    /// A `.diff` file is opened as a comparison when `prompt` agrees. Any
    /// other file is decoded with the detected encoding and replaces the
    /// primary buffer (single mode) or the modified side (comparison mode).
    /// In single mode the loaded text also becomes the memorized original.
    /// Bookmarks are cleared either way.
    pub fn load_bytes(
        &mut self,
        bytes: &[u8],
        file_name: &str,
        prompt: &mut dyn Prompt,
    ) -> LoadReport {
        self.file_name = Some(file_name.to_owned());

        let detected = encoding::detect(bytes);
        let text = encoding::decode(bytes, detected);

        if language::is_diff_file(file_name) && prompt.confirm_comparison(file_name) {
            self.load_package(diff_package::unpack(&text));
        } else {
            self.encoding = detected;
            self.language = language::language_for_file(file_name).to_owned();

            let layout = match &self.layout {
                Layout::Single { .. } => {
                    self.memorized_original.clone_from(&text);
                    Layout::Single {
                        primary: Document::new(&text),
                    }
                }
                Layout::Comparison { original, .. } => Layout::Comparison {
                    original: original.clone(),
                    modified: Document::new(&text),
                },
            };
            self.replace_layout(layout);
        }

        tracing::info!(
            file_name,
            encoding = %self.encoding,
            language = %self.language,
            mode = ?self.mode(),
            "loaded"
        );
        LoadReport {
            encoding: self.encoding,
            language: self.language.clone(),
            mode: self.mode(),
        }
    }

    fn load_package(&mut self, package: DiffPackage) {
        self.encoding = TextEncoding::Utf8;
        if let Some(hint) = package.language {
            self.language = hint;
        }
        self.memorized_original.clone_from(&package.original);
        self.replace_layout(Layout::Comparison {
            original: Document::new(&package.original),
            modified: Document::new(&package.modified),
        });
    }

    /// Reads `path` and loads it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped; the session is
    /// unchanged in that case.
    pub fn open_path(
        &mut self,
        path: impl AsRef<std::path::Path>,
        prompt: &mut dyn Prompt,
    ) -> SessionResult<LoadReport> {
        let mapped = io::MappedFile::open(path)?;
        let file_name = mapped.file_name().unwrap_or(UNTITLED).to_owned();
        Ok(self.load_bytes(mapped.as_slice(), &file_name, prompt))
    }

    /// Serialises the session for saving.
    ///
    /// Single mode yields the primary text in the selected encoding.
    /// Comparison mode yields a UTF-8 diff package of both sides.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Pack`](crate::errors::SessionError::Pack) if a
    /// comparison side contains a line the package format cannot carry.
    pub fn save(&self) -> SessionResult<SaveArtifact> {
        match &self.layout {
            Layout::Single { primary } => Ok(SaveArtifact {
                bytes: encoding::encode(&primary.text(), self.encoding),
                suggested_name: self.suggested_single_name(),
            }),
            Layout::Comparison { original, modified } => {
                let package =
                    DiffPackage::new(original.text(), modified.text(), Some(&self.language));
                Ok(SaveArtifact {
                    bytes: diff_package::pack(&package)?.into_bytes(),
                    suggested_name: self.suggested_diff_name(),
                })
            }
        }
    }

    /// Saves to `path`, or to the suggested name in the working directory when
    /// `path` is `None`. Returns where the bytes went.
    ///
    /// # Errors
    ///
    /// Returns an error if serialising or writing fails. The session is not
    /// modified by a failed save and stays editable.
    pub fn save_to(&self, path: Option<&std::path::Path>) -> SessionResult<std::path::PathBuf> {
        let artifact = self.save()?;
        let target = path.map_or_else(
            || std::path::PathBuf::from(&artifact.suggested_name),
            std::path::Path::to_path_buf,
        );

        if let Err(err) = io::write_atomic(&target, &artifact.bytes) {
            tracing::error!(path = %target.display(), %err, "save failed");
            return Err(err.into());
        }
        Ok(target)
    }

    fn suggested_single_name(&self) -> String {
        let extension = language::extension_for_language(&self.language);
        match (&self.file_name, extension) {
            (Some(name), Some(ext)) => std::path::Path::new(name)
                .with_extension(ext)
                .to_string_lossy()
                .into_owned(),
            (Some(name), None) => name.clone(),
            (None, ext) => format!("{UNTITLED}.{}", ext.unwrap_or("txt")),
        }
    }

    fn suggested_diff_name(&self) -> String {
        let stem = self
            .file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .unwrap_or(UNTITLED);
        format!("{stem}.{}", language::DIFF_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextEdit;
    use crate::errors::SessionError;
    use crate::session::BufferId;
    use editor_core::position::Position;
    use pretty_assertions::assert_eq;

    fn always(answer: bool) -> impl FnMut(&str) -> bool {
        move |_| answer
    }

    #[test]
    fn test_load_utf8_source() {
        let mut session = Session::new().unwrap();
        let report = session.load_bytes(b"Sub A\nEnd Sub", "Module1.bas", &mut always(false));

        assert_eq!(
            report,
            LoadReport {
                encoding: TextEncoding::Utf8,
                language: "vb".to_string(),
                mode: Mode::Single,
            }
        );
        assert_eq!(session.text(BufferId::Primary).as_deref(), Some("Sub A\nEnd Sub"));
        assert_eq!(session.symbols(BufferId::Primary).len(), 1);
    }

    #[test]
    fn test_load_shift_jis_and_save_back() {
        let mut session = Session::new().unwrap();
        let sjis = [0x82, 0xA0, 0x0A, 0x41];
        let report = session.load_bytes(&sjis, "memo.txt", &mut always(false));

        assert_eq!(report.encoding, TextEncoding::LegacyDoubleByte);
        assert_eq!(session.text(BufferId::Primary).as_deref(), Some("あ\nA"));
        assert_eq!(session.save().unwrap().bytes, sjis.to_vec());
    }

    #[test]
    fn test_load_clears_bookmarks() {
        let mut session = Session::new().unwrap();
        session.load_bytes(b"a\nb", "a.txt", &mut always(false));
        session.toggle_bookmark(2);
        session.load_bytes(b"c\nd", "b.txt", &mut always(false));
        assert!(session.bookmarks().is_empty());
    }

    #[test]
    fn test_single_load_becomes_comparison_baseline() {
        let mut session = Session::new().unwrap();
        session.load_bytes(b"v1", "a.txt", &mut always(false));
        session
            .apply_edits(
                BufferId::Primary,
                &[TextEdit::insert(Position::new(1, 3), "+edit")],
            )
            .unwrap();
        session.toggle_mode();

        assert_eq!(session.text(BufferId::Original).as_deref(), Some("v1"));
        assert_eq!(session.text(BufferId::Modified).as_deref(), Some("v1+edit"));
    }

    #[test]
    fn test_load_in_comparison_replaces_modified_only() {
        let mut session = Session::new().unwrap();
        session.load_bytes(b"base", "a.txt", &mut always(false));
        session.toggle_mode();
        session.load_bytes(b"other", "b.txt", &mut always(false));

        assert_eq!(session.mode(), Mode::Comparison);
        assert_eq!(session.text(BufferId::Original).as_deref(), Some("base"));
        assert_eq!(session.text(BufferId::Modified).as_deref(), Some("other"));
    }

    #[test]
    fn test_diff_file_confirmed_opens_comparison() {
        let mut session = Session::new().unwrap();
        let package = "\n```sql\n select 1\n```\n\n```\n select 2\n```\n";
        let report = session.load_bytes(package.as_bytes(), "q.diff", &mut always(true));

        assert_eq!(report.mode, Mode::Comparison);
        assert_eq!(report.language, "sql");
        assert_eq!(session.text(BufferId::Original).as_deref(), Some("select 1"));
        assert_eq!(session.text(BufferId::Modified).as_deref(), Some("select 2"));
    }

    #[test]
    fn test_diff_file_declined_opens_as_text() {
        let mut session = Session::new().unwrap();
        let package = "```\n a\n```";
        let report = session.load_bytes(package.as_bytes(), "q.diff", &mut always(false));

        assert_eq!(report.mode, Mode::Single);
        assert_eq!(report.language, "plaintext");
        assert_eq!(session.text(BufferId::Primary).as_deref(), Some(package));
    }

    #[test]
    fn test_prompt_only_asked_for_diff_files() {
        let mut asked = Vec::new();
        let mut session = Session::new().unwrap();
        let mut prompt = |name: &str| {
            asked.push(name.to_owned());
            true
        };
        session.load_bytes(b"x", "a.sql", &mut prompt);
        session.load_bytes(b"", "b.diff", &mut prompt);
        assert_eq!(asked, vec!["b.diff".to_string()]);
    }

    #[test]
    fn test_comparison_save_round_trips_through_load() {
        let mut session = Session::new().unwrap();
        session.load_bytes(b"select 1\nfrom t", "query.sql", &mut always(false));
        session
            .apply_edits(
                BufferId::Primary,
                &[TextEdit::insert(Position::new(2, 7), " where x")],
            )
            .unwrap();
        session.toggle_mode();

        let artifact = session.save().unwrap();
        assert_eq!(artifact.suggested_name, "query.diff");

        let mut reloaded = Session::new().unwrap();
        reloaded.load_bytes(&artifact.bytes, &artifact.suggested_name, &mut always(true));
        assert_eq!(reloaded.language(), "sql");
        assert_eq!(reloaded.text(BufferId::Original).as_deref(), Some("select 1\nfrom t"));
        assert_eq!(
            reloaded.text(BufferId::Modified).as_deref(),
            Some("select 1\nfrom t where x")
        );
    }

    #[test]
    fn test_comparison_save_rejects_fence_lines() {
        let mut session = Session::new().unwrap();
        session.load_bytes(b"```rust\nfn main() {}\n```", "notes.md", &mut always(false));
        session.toggle_mode();
        assert!(matches!(session.save(), Err(SessionError::Pack(_))));
    }

    #[test]
    fn test_suggested_names() {
        let mut session = Session::new().unwrap();
        assert_eq!(session.save().unwrap().suggested_name, "untitled.txt");

        session.set_language("markdown");
        assert_eq!(session.save().unwrap().suggested_name, "untitled.md");

        session.load_bytes(b"x", "Report.BAS", &mut always(false));
        assert_eq!(session.save().unwrap().suggested_name, "Report.vb");

        session.load_bytes(b"x", "main.py", &mut always(false));
        assert_eq!(session.save().unwrap().suggested_name, "main.py");

        session.toggle_mode();
        assert_eq!(session.save().unwrap().suggested_name, "main.diff");
    }

    #[test]
    fn test_open_path_and_save_to() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("calc.vb");
        std::fs::write(&source, "Function Add()\nEnd Function\n").unwrap();

        let mut session = Session::new().unwrap();
        let report = session.open_path(&source, &mut always(false)).unwrap();
        assert_eq!(report.language, "vb");
        assert_eq!(session.file_name(), Some("calc.vb"));

        let target = dir.path().join("copy.vb");
        let written = session.save_to(Some(&target)).unwrap();
        assert_eq!(written, target);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "Function Add()\nEnd Function\n"
        );
    }

    #[test]
    fn test_failed_save_keeps_session_usable() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new().unwrap();
        session.load_bytes(b"keep me", "a.txt", &mut always(false));

        let missing = dir.path().join("no/such/dir/a.txt");
        assert!(matches!(
            session.save_to(Some(&missing)),
            Err(SessionError::Io(_))
        ));
        assert_eq!(session.text(BufferId::Primary).as_deref(), Some("keep me"));
        session
            .apply_edits(BufferId::Primary, &[TextEdit::insert(Position::new(1, 1), "!")])
            .unwrap();
    }

    #[test]
    fn test_open_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new().unwrap();
        let result = session.open_path(dir.path().join("gone.txt"), &mut always(false));
        assert!(matches!(result, Err(SessionError::Io(_))));
        assert_eq!(session.file_name(), None);
    }
}
