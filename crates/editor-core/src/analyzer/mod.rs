//! Line-pattern source analysis.
//!
//! There is no parser here. A [`SourceAnalyzer`] answers outline, definition
//! and reference queries by matching each line of the full text against a
//! handful of patterns, re-scanning from scratch on every call. The
//! [`AnalyzerRegistry`] picks the analyzer by language identifier so that a
//! grammar-backed implementation can replace one without touching callers.
pub mod regex_analyzer;
pub mod registry;

pub use regex_analyzer::{LinePatterns, RegexAnalyzer};
pub use registry::AnalyzerRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A function, sub or property.
    Callable,
}

/// A named callable region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The declaration line.
    pub decl_range: crate::position::LineSpan,
    /// The terminator line, or the declaration line when there is none.
    pub body_end_line: usize,
}

impl Symbol {
    /// First and last line of the symbol's body, inclusive.
    #[must_use]
    pub fn line_range(&self) -> std::ops::RangeInclusive<usize> {
        self.decl_range.line..=self.body_end_line
    }
}

/// Read-only analysis over a whole document text. Lines are 1-based.
pub trait SourceAnalyzer: std::fmt::Debug + Send + Sync {
    /// Every symbol in the text, in reverse source order.
    fn document_symbols(&self, text: &str) -> Vec<Symbol>;

    /// Where the callee named on `line` is declared, if anywhere.
    fn definition(&self, text: &str, line: usize) -> Option<crate::position::LineSpan>;

    /// Declaration and call lines of the identifier declared or called on
    /// `line`, in source order.
    fn references(&self, text: &str, line: usize) -> Vec<crate::position::LineSpan>;
}
