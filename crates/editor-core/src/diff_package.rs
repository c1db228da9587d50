//! The two-buffer package format used to save comparison sessions.
//!
//! A package is plain text holding two fenced blocks: the original buffer
//! first, then the modified one. Every content line carries one leading space,
//! stripped again on read:
//!
//! ````text
//!
//! ```sql
//!  select 1
//! ```
//!
//! ```
//!  select 2
//! ```
//! ````
//!
//! Saved files depend on this exact layout.

/// Delimiter line opening and closing each block.
pub const FENCE_MARKER: &str = "```";

const LINE_PREFIX: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Original,
    Modified,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Original => f.write_str("original"),
            Side::Modified => f.write_str("modified"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPackage {
    pub original: String,
    pub modified: String,
    /// Language identifier carried on the first fence. `None` and an empty
    /// hint are written identically.
    pub language: Option<String>,
}

impl DiffPackage {
    #[must_use]
    pub fn new(
        original: impl Into<String>,
        modified: impl Into<String>,
        language: Option<&str>,
    ) -> Self {
        Self {
            original: original.into(),
            modified: modified.into(),
            language: language.filter(|hint| !hint.is_empty()).map(str::to_owned),
        }
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE_MARKER)
}

fn check_packable(text: &str, side: Side) -> Result<(), crate::errors::PackError> {
    match text.split('\n').position(is_fence) {
        Some(idx) => Err(crate::errors::PackError::FenceInContent {
            side,
            line: idx + 1,
        }),
        None => Ok(()),
    }
}

fn push_prefixed(out: &mut String, text: &str) {
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push(LINE_PREFIX);
        out.push_str(line);
    }
}

/// Serialises both buffers into the package layout.
///
/// # Errors
///
/// - [`PackError::FenceInContent`](crate::errors::PackError::FenceInContent) if
///   a line of either buffer, ignoring leading whitespace, starts with
///   [`FENCE_MARKER`]. Such a line would be read back as a fence.
/// - [`PackError::InvalidLanguageHint`](crate::errors::PackError::InvalidLanguageHint)
///   if the hint contains whitespace.
pub fn pack(package: &DiffPackage) -> Result<String, crate::errors::PackError> {
    check_packable(&package.original, Side::Original)?;
    check_packable(&package.modified, Side::Modified)?;

    let hint = package.language.as_deref().unwrap_or("");
    if hint.chars().any(char::is_whitespace) {
        return Err(crate::errors::PackError::InvalidLanguageHint(hint.to_owned()));
    }

    let mut out =
        String::with_capacity(package.original.len() + package.modified.len() + hint.len() + 32);
    out.push('\n');
    out.push_str(FENCE_MARKER);
    out.push_str(hint);
    out.push('\n');
    push_prefixed(&mut out, &package.original);
    out.push('\n');
    out.push_str(FENCE_MARKER);
    out.push_str("\n\n");
    out.push_str(FENCE_MARKER);
    out.push('\n');
    push_prefixed(&mut out, &package.modified);
    out.push('\n');
    out.push_str(FENCE_MARKER);
    out.push('\n');

    Ok(out)
}

/// Reads a package back.
///
/// Never fails: text without fences yields empty buffers, and a package with
/// a missing closing fence yields whatever was read up to the end.
#[must_use]
pub fn unpack(text: &str) -> DiffPackage {
    let mut fences_crossed = 0usize;
    let mut language = None;
    let mut original: Vec<&str> = Vec::new();
    let mut modified: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if is_fence(line) {
            fences_crossed += 1;
            if fences_crossed == 1 {
                let hint = line.trim_start()[FENCE_MARKER.len()..].trim();
                language = (!hint.is_empty()).then(|| hint.to_owned());
            }
            continue;
        }

        let target = match fences_crossed {
            1 => &mut original,
            3 => &mut modified,
            _ => continue,
        };
        let mut chars = line.chars();
        chars.next();
        target.push(chars.as_str());
    }

    if fences_crossed != 4 {
        tracing::warn!(fences_crossed, "diff package is malformed; loaded leniently");
    }

    DiffPackage {
        original: original.join("\n"),
        modified: modified.join("\n"),
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PackError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_layout() {
        let package = DiffPackage::new("a\nb", "c", Some("sql"));
        assert_eq!(
            pack(&package).unwrap(),
            "\n```sql\n a\n b\n```\n\n```\n c\n```\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            ("select 1\nfrom dual", "select 2\nfrom dual\n", Some("sql")),
            ("", "", Some("sql")),
            ("\n\n", "x", None),
            ("  indented\r\nwindows", "日本語", Some("vb")),
        ];
        for (original, modified, hint) in cases {
            let package = DiffPackage::new(original, modified, hint);
            assert_eq!(unpack(&pack(&package).unwrap()), package);
        }
    }

    #[test]
    fn test_unpack_reads_hint_from_first_fence_only() {
        let text = "\n```vb\n x\n```\n\n```sql\n y\n```\n";
        let package = unpack(text);
        assert_eq!(package.language.as_deref(), Some("vb"));
        assert_eq!(package.original, "x");
        assert_eq!(package.modified, "y");
    }

    #[test]
    fn test_unpack_without_fences_is_empty() {
        assert_eq!(unpack("just some text\nmore"), DiffPackage::default());
    }

    #[test]
    fn test_unpack_with_missing_closing_fence() {
        let package = unpack("```\n a\n b");
        assert_eq!(package.original, "a\nb");
        assert_eq!(package.modified, "");
    }

    #[test]
    fn test_pack_rejects_fence_lines() {
        let package = DiffPackage::new("ok", "fine\n  ```rust\nmore", None);
        assert_eq!(
            pack(&package),
            Err(PackError::FenceInContent {
                side: Side::Modified,
                line: 2,
            })
        );
    }

    #[test]
    fn test_pack_rejects_spaced_hint() {
        let package = DiffPackage::new("a", "b", Some("visual basic"));
        assert!(matches!(
            pack(&package),
            Err(PackError::InvalidLanguageHint(_))
        ));
    }

    #[test]
    fn test_empty_hint_is_none() {
        assert_eq!(DiffPackage::new("a", "b", Some("")).language, None);
    }
}
