//! @dose
//! purpose: Recognises preprocessor directive lines (`#ifndef`, `#define`, `#endif`,
//!     `#include`, ...) so the guard scanner and the include hoister agree on what a
//!     directive looks like.
//!
//! invariants:
//!     - Only the trimmed line is inspected; indentation never hides a directive
//!     - Whitespace between `#` and the keyword is accepted (`#  include <x>`)
//!
//! gotchas:
//!     - Symbols are compared as whole tokens, so `FIG_H` never matches `FIG_HELPER`
//!     - Nothing here evaluates conditions; a directive is just a keyword and its text

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#\s*([A-Za-z_]+)\s*(.*?)\s*$").expect("directive pattern is valid")
});

/// A single preprocessor directive line, split into keyword and argument text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub keyword: &'a str,
    pub argument: &'a str,
}

impl<'a> Directive<'a> {
    /// Parse a line as a directive; `None` for ordinary source lines
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = DIRECTIVE.captures(line.trim())?;
        let keyword = caps.get(1)?.as_str();
        let argument = caps.get(2).map_or("", |m| m.as_str());
        Some(Self { keyword, argument })
    }

    /// First whitespace-separated token of the argument (the macro name for
    /// `#ifndef` / `#define`)
    pub fn symbol(&self) -> Option<&'a str> {
        self.argument.split_whitespace().next()
    }

    pub fn is(&self, keyword: &str) -> bool {
        self.keyword == keyword
    }

    /// Target of an `#include`, without its `<>` or `""` delimiters
    pub fn include_target(&self) -> Option<&'a str> {
        if !self.is("include") {
            return None;
        }
        let arg = self.argument;
        let (open, close) = match arg.chars().next()? {
            '<' => ('<', '>'),
            '"' => ('"', '"'),
            _ => return None,
        };
        let inner = arg.strip_prefix(open)?;
        let end = inner.find(close)?;
        Some(&inner[..end])
    }
}

/// True when the trimmed line is an `#include` directive of any form
pub fn is_include(line: &str) -> bool {
    Directive::parse(line).is_some_and(|d| d.is("include"))
}
