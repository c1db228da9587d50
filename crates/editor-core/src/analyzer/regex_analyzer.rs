use super::{SourceAnalyzer, Symbol, SymbolKind};
use crate::position::LineSpan;

/// Placeholder substituted with the escaped identifier in lookup templates.
const NAME_PLACEHOLDER: &str = "{name}";

/// The line patterns describing one dialect. All matching is
/// case-insensitive.
///
/// `declaration`, `terminator` and `call` are matched against the trimmed
/// line; `declaration` and `call` must capture the identifier in group 1.
/// The two templates are matched anywhere in a line after
/// [`NAME_PLACEHOLDER`] is replaced.
#[derive(Debug, Clone, Copy)]
pub struct LinePatterns {
    pub declaration: &'static str,
    pub terminator: &'static str,
    pub call: &'static str,
    pub declaration_template: &'static str,
    pub call_template: &'static str,
}

impl LinePatterns {
    /// Block-structured Basic: `[Private|Public|Protected|Friend] Function|Sub|Property`,
    /// closed by `End Function|Sub|Property`, called with `Call Name`.
    pub const BASIC: LinePatterns = LinePatterns {
        declaration: r"^(?:(?:private|public|protected|friend)\s+)?(?:function|sub|property(?:\s+(?:get|let|set))?)\s+(\w+)",
        terminator: r"^end\s+(?:function|sub|property)\b",
        call: r"^call\s+(\w+)",
        declaration_template: r"(?:function|sub)\s+{name}",
        call_template: r"call\s+{name}",
    };
}

fn compile(
    language: &str,
    role: &'static str,
    pattern: &str,
) -> Result<regex::Regex, crate::errors::AnalyzerError> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| crate::errors::AnalyzerError::Pattern {
            language: language.to_owned(),
            role,
            source,
        })
}

#[derive(Debug)]
pub struct RegexAnalyzer {
    language: String,
    declaration: regex::Regex,
    terminator: regex::Regex,
    call: regex::Regex,
    declaration_template: &'static str,
    call_template: &'static str,
}

impl RegexAnalyzer {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Pattern`](crate::errors::AnalyzerError::Pattern)
    /// if one of the fixed patterns does not compile, or if a template does
    /// not compile once an identifier is substituted.
    pub fn new(
        language: &str,
        patterns: LinePatterns,
    ) -> Result<Self, crate::errors::AnalyzerError> {
        // Templates are compiled per query; validate them once up front.
        compile(
            language,
            "declaration template",
            &patterns.declaration_template.replace(NAME_PLACEHOLDER, "x"),
        )?;
        compile(
            language,
            "call template",
            &patterns.call_template.replace(NAME_PLACEHOLDER, "x"),
        )?;

        Ok(Self {
            language: language.to_owned(),
            declaration: compile(language, "declaration", patterns.declaration)?,
            terminator: compile(language, "terminator", patterns.terminator)?,
            call: compile(language, "call", patterns.call)?,
            declaration_template: patterns.declaration_template,
            call_template: patterns.call_template,
        })
    }

    fn lookup(&self, template: &str, name: &str, suffix: &str) -> Option<regex::Regex> {
        let pattern = format!(
            "{}{suffix}",
            template.replace(NAME_PLACEHOLDER, &regex::escape(name))
        );
        match compile(&self.language, "lookup", &pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(%err, "lookup pattern rejected");
                None
            }
        }
    }

    fn captured_name<'t>(re: &regex::Regex, line: &'t str) -> Option<&'t str> {
        re.captures(line)?.get(1).map(|m| m.as_str())
    }

    fn line_at(text: &str, line: usize) -> Option<&str> {
        crate::lines::display_lines(text).nth(line.checked_sub(1)?)
    }
}

impl SourceAnalyzer for RegexAnalyzer {
    fn document_symbols(&self, text: &str) -> Vec<Symbol> {
        let lines: Vec<&str> = crate::lines::display_lines(text).collect();
        let mut symbols = Vec::new();
        // Scanning bottom-up means a terminator is always seen before its
        // declaration.
        let mut pending_end: Option<usize> = None;

        for (idx, line) in lines.iter().enumerate().rev() {
            let line_number = idx + 1;
            let trimmed = line.trim();

            if self.terminator.is_match(trimmed) {
                pending_end = Some(line_number);
                continue;
            }

            if let Some(name) = Self::captured_name(&self.declaration, trimmed) {
                symbols.push(Symbol {
                    name: name.to_owned(),
                    kind: SymbolKind::Callable,
                    decl_range: LineSpan::whole_line(line_number, line),
                    body_end_line: pending_end.take().unwrap_or(line_number),
                });
            }
        }

        tracing::debug!(language = %self.language, count = symbols.len(), "listed symbols");
        symbols
    }

    fn definition(&self, text: &str, line: usize) -> Option<LineSpan> {
        let cursor_line = Self::line_at(text, line)?;
        let name = Self::captured_name(&self.call, cursor_line.trim())?;
        let declaration = self.lookup(self.declaration_template, name, r"\b")?;

        crate::lines::display_lines(text)
            .enumerate()
            .find(|(_, candidate)| declaration.is_match(candidate))
            .map(|(idx, candidate)| LineSpan::whole_line(idx + 1, candidate))
    }

    fn references(&self, text: &str, line: usize) -> Vec<LineSpan> {
        let Some(cursor_line) = Self::line_at(text, line) else {
            return Vec::new();
        };
        let trimmed = cursor_line.trim();
        let Some(name) = Self::captured_name(&self.declaration, trimmed)
            .or_else(|| Self::captured_name(&self.call, trimmed))
        else {
            return Vec::new();
        };
        let (Some(call), Some(declaration)) = (
            self.lookup(self.call_template, name, ""),
            self.lookup(self.declaration_template, name, ""),
        ) else {
            return Vec::new();
        };

        crate::lines::display_lines(text)
            .enumerate()
            .filter(|(_, candidate)| call.is_match(candidate) || declaration.is_match(candidate))
            .map(|(idx, candidate)| LineSpan::whole_line(idx + 1, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn basic() -> RegexAnalyzer {
        RegexAnalyzer::new("vb", LinePatterns::BASIC).unwrap()
    }

    const MODULE: &str = "\
Option Explicit
' helpers
Function Foo(a)
    Call Bar
    Foo = a
    Exit Function
End Function

Private Sub Bar()
    Call baz
End Sub

Public Property Get Count()
End Property
Sub Orphan";

    fn lines_of(spans: &[LineSpan]) -> Vec<usize> {
        spans.iter().map(|span| span.line).collect()
    }

    #[test]
    fn test_function_spans_to_terminator() {
        let text = "\n\nFunction Foo\n\n\n\nEnd Function";
        let symbols = basic().document_symbols(text);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "Foo");
        assert_eq!(symbols[0].line_range(), 3..=7);
    }

    #[test]
    fn test_symbols_in_reverse_source_order() {
        let symbols = basic().document_symbols(MODULE);
        let summary: Vec<(&str, usize, usize)> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.decl_range.line, s.body_end_line))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Orphan", 15, 15),
                ("Count", 13, 14),
                ("Bar", 9, 11),
                ("Foo", 3, 7),
            ]
        );
    }

    #[test]
    fn test_declaration_without_terminator_is_single_line() {
        let symbols = basic().document_symbols("Sub A\nSub B\nEnd Sub");
        assert_eq!(symbols[0].name, "B");
        assert_eq!(symbols[0].line_range(), 2..=3);
        assert_eq!(symbols[1].name, "A");
        assert_eq!(symbols[1].line_range(), 1..=1);
    }

    #[test]
    fn test_modifiers_and_case() {
        let text = "FRIEND FUNCTION Shout()\nend function\nprotected sub quiet\nEND SUB";
        let names: Vec<String> = basic()
            .document_symbols(text)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["quiet".to_string(), "Shout".to_string()]);
    }

    #[test]
    fn test_crlf_text() {
        let symbols = basic().document_symbols("Sub A\r\nEnd Sub\r\n");
        assert_eq!(symbols[0].line_range(), 1..=2);
        assert_eq!(symbols[0].decl_range.end_column, 6);
    }

    #[test]
    fn test_definition_from_call_line() {
        let span = basic().definition(MODULE, 4).unwrap();
        assert_eq!(span, LineSpan::whole_line(9, "Private Sub Bar()"));
    }

    #[test]
    fn test_definition_is_case_insensitive() {
        let text = "call FOO\nfunction foo()\nend function";
        assert_eq!(basic().definition(text, 1).map(|s| s.line), Some(2));
    }

    #[test]
    fn test_definition_requires_exact_identifier() {
        let text = "Call Bar\nSub Barista\nEnd Sub";
        assert_eq!(basic().definition(text, 1), None);
    }

    #[test]
    fn test_definition_misses() {
        // Not a call line.
        assert_eq!(basic().definition(MODULE, 5), None);
        // Callee never declared.
        assert_eq!(basic().definition(MODULE, 10), None);
        // Out of range.
        assert_eq!(basic().definition(MODULE, 0), None);
        assert_eq!(basic().definition(MODULE, 99), None);
    }

    #[test]
    fn test_references_from_declaration() {
        let text = "Sub Bar\nEnd Sub\nCall Bar\nx = 1\ncall bar ' again";
        let refs = basic().references(text, 1);
        assert_eq!(lines_of(&refs), vec![1, 3, 5]);
        assert_eq!(refs[1], LineSpan::whole_line(3, "Call Bar"));
    }

    #[test]
    fn test_references_from_call_site() {
        assert_eq!(lines_of(&basic().references(MODULE, 4)), vec![4, 9]);
    }

    #[test]
    fn test_references_from_plain_line_is_empty() {
        assert!(basic().references(MODULE, 1).is_empty());
        assert!(basic().references(MODULE, 42).is_empty());
    }
}
