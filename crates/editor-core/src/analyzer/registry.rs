use std::collections::HashMap;

/// Lines that start a callable block, per language. Drawn as separators.
const SEPARATOR_PATTERNS: &[(&str, &str)] = &[
    (
        "vb",
        r"^\s*(private\s+|public\s+|protected\s+|friend\s+)?(function|sub|property)\s+",
    ),
    ("sql", r"^\s*(create\s+)?(procedure|function|trigger|view)\s+"),
    (
        "javascript",
        r"^\s*(async\s+)?(function\s+[\w$]+|\w+\s*=\s*(async\s+)?function\s*|class\s+[\w$]+)",
    ),
    (
        "typescript",
        r"^\s*(async\s+)?(function\s+[\w$]+|\w+\s*=\s*(async\s+)?function\s*|class\s+[\w$]+)",
    ),
    (
        "html",
        r"^\s*(async\s+)?(function\s+[\w$]+|\w+\s*=\s*(async\s+)?function\s*|class\s+[\w$]+)",
    ),
    ("pli", r"^\s*[\w$]+:\s*proc;"),
];

#[derive(Debug, Default)]
struct LanguageProfile {
    separator: Option<regex::Regex>,
    analyzer: Option<Box<dyn super::SourceAnalyzer>>,
}

/// Language identifier → analysis capabilities.
///
/// A language may have a separator pattern, an analyzer, both, or neither.
/// Unknown languages behave like "neither".
#[derive(Debug, Default)]
pub struct AnalyzerRegistry {
    profiles: HashMap<String, LanguageProfile>,
}

impl AnalyzerRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table: separators for every language in
    /// [`SEPARATOR_PATTERNS`] and the Basic analyzer for `vb`.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn builtin() -> Result<Self, crate::errors::AnalyzerError> {
        let mut registry = Self::empty();
        for (language, pattern) in SEPARATOR_PATTERNS {
            registry.register_separator(language, pattern)?;
        }
        registry.register_analyzer(
            "vb",
            Box::new(super::RegexAnalyzer::new(
                "vb",
                super::LinePatterns::BASIC,
            )?),
        );
        Ok(registry)
    }

    /// # Errors
    ///
    /// Returns an error if `pattern` does not compile.
    pub fn register_separator(
        &mut self,
        language: &str,
        pattern: &str,
    ) -> Result<(), crate::errors::AnalyzerError> {
        let re = regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| crate::errors::AnalyzerError::Pattern {
                language: language.to_owned(),
                role: "separator",
                source,
            })?;
        self.profiles.entry(language.to_owned()).or_default().separator = Some(re);
        Ok(())
    }

    /// Installs `analyzer` for `language`, replacing any previous one.
    pub fn register_analyzer(&mut self, language: &str, analyzer: Box<dyn super::SourceAnalyzer>) {
        self.profiles.entry(language.to_owned()).or_default().analyzer = Some(analyzer);
    }

    #[must_use]
    pub fn analyzer(&self, language: &str) -> Option<&dyn super::SourceAnalyzer> {
        self.profiles.get(language)?.analyzer.as_deref()
    }

    /// 1-based lines of `text` that open a callable block. Empty when the
    /// language has no separator pattern.
    #[must_use]
    pub fn separator_lines(&self, language: &str, text: &str) -> Vec<usize> {
        let Some(separator) = self
            .profiles
            .get(language)
            .and_then(|profile| profile.separator.as_ref())
        else {
            return Vec::new();
        };

        crate::lines::display_lines(text)
            .enumerate()
            .filter(|(_, line)| separator.is_match(line))
            .map(|(idx, _)| idx + 1)
            .collect()
    }
}
