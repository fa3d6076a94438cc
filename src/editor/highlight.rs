//! Syntax highlighting: classifies spans of a line for the renderer.

use crate::types::{HighlightSpan, TokenClass};
use crossterm::style::Color;
use regex::Regex;

/// Convert a token class to a crossterm color.
pub fn class_color(class: TokenClass) -> Color {
    match class {
        TokenClass::Keyword => Color::Magenta,
        TokenClass::Type => Color::Cyan,
        TokenClass::Number => Color::Yellow,
        TokenClass::Str => Color::Green,
        TokenClass::Comment => Color::DarkGrey,
        TokenClass::Preprocessor => Color::Blue,
    }
}

/// Built-in rules: (pattern, class, priority). Higher priority wins where spans overlap, so a
/// keyword inside a string or comment is shown as part of the string or comment.
const RULES: &[(&str, TokenClass, i32)] = &[
    (
        r"\b(if|else|for|while|do|switch|case|default|break|continue|return|goto|sizeof|typedef|struct|union|enum|static|const|extern|volatile|register|inline)\b",
        TokenClass::Keyword,
        1,
    ),
    (
        r"\b(void|char|short|int|long|float|double|signed|unsigned|bool|size_t|FILE)\b",
        TokenClass::Type,
        1,
    ),
    (r"\b(0[xX][0-9a-fA-F]+|[0-9]+(\.[0-9]+)?)\b", TokenClass::Number, 2),
    (r"^\s*#\s*[a-z]+", TokenClass::Preprocessor, 3),
    (r#""([^"\\]|\\.)*"?|'([^'\\]|\\.)*'?"#, TokenClass::Str, 4),
    (r"//.*$|/\*.*?(\*/|$)", TokenClass::Comment, 5),
];

/// A compiled highlight rule ready for matching.
struct CompiledRule {
    regex: Regex,
    class: TokenClass,
    priority: i32,
}

/// Turns a line of text into highlight spans.
pub struct Highlighter {
    rules: Vec<CompiledRule>,
}

impl Highlighter {
    pub fn new() -> Self {
        let mut rules = Vec::with_capacity(RULES.len());
        for &(pattern, class, priority) in RULES {
            match Regex::new(pattern) {
                Ok(regex) => rules.push(CompiledRule { regex, class, priority }),
                Err(e) => tracing::warn!(target: "runtime", pattern, error = %e, "invalid highlight pattern"),
            }
        }
        Self { rules }
    }

    /// Compute highlight spans for a line of text.
    pub fn spans(&self, text: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        for rule in &self.rules {
            for m in rule.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                // Convert byte indices to char indices
                let start = text[..m.start()].chars().count();
                let end = text[..m.end()].chars().count();
                spans.push(HighlightSpan { start, end, class: rule.class, priority: rule.priority });
            }
        }

        // Sort by start position, then by priority (higher priority last)
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.priority.cmp(&b.priority)));
        spans
    }

    /// Get the class for a specific character position, considering overlapping spans.
    pub fn class_at(spans: &[HighlightSpan], char_idx: usize) -> Option<TokenClass> {
        spans
            .iter()
            .filter(|s| char_idx >= s.start && char_idx < s.end)
            .max_by_key(|s| s.priority)
            .map(|s| s.class)
    }

    /// Split `text` into runs of chars sharing a class (`None` = plain text).
    pub fn segments(&self, text: &str) -> Vec<(Option<TokenClass>, String)> {
        let spans = self.spans(text);
        let mut out: Vec<(Option<TokenClass>, String)> = Vec::new();
        for (i, ch) in text.chars().enumerate() {
            let class = Self::class_at(&spans, i);
            match out.last_mut() {
                Some((c, run)) if *c == class => run.push(ch),
                _ => out.push((class, ch.to_string())),
            }
        }
        out
    }
}
