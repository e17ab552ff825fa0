//! Log pattern compiler.
//!
//! # Syntax
//! ```text
//! %<code>        field, code is a run of ASCII letters
//! %<code>{arg}   field with an argument (any text up to the next `}`)
//! %%             literal percent sign
//! anything else  literal text
//! ```
//!
//! # Design Decisions
//! - Compilation never fails outright; bad fields become visible
//!   `<<error_format %code>>` markers and set `has_error`
//! - An unterminated `{` ends the scan with a `<<pattern_error>>` marker
//! - Callers installing a pattern on a live destination check `has_error` first

use crate::logging::RenderField;

pub const PATTERN_ERROR_MARKER: &str = "<<pattern_error>>";

/// One lexical unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Literal(String),
    Field { code: String, arg: Option<String> },
}

/// Result of compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledPattern {
    pub tokens: Vec<FormatToken>,
    pub has_error: bool,
}

/// Marker emitted in place of an unresolvable field.
pub fn error_marker(code: &str) -> String {
    format!("<<error_format %{code}>>")
}

/// Tokenize `pattern` into literals and resolvable fields.
pub fn compile(pattern: &str) -> CompiledPattern {
    let chars: Vec<char> = pattern.chars().collect();
    let mut compiled = CompiledPattern::default();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            literal.push(chars[i]);
            i += 1;
            continue;
        }
        if chars.get(i + 1) == Some(&'%') {
            literal.push('%');
            i += 2;
            continue;
        }

        let code_start = i + 1;
        let mut n = code_start;
        while n < chars.len() && chars[n].is_ascii_alphabetic() {
            n += 1;
        }
        let code: String = chars[code_start..n].iter().collect();

        let mut arg = None;
        if chars.get(n) == Some(&'{') {
            match chars[n + 1..].iter().position(|&c| c == '}') {
                Some(len) => {
                    arg = Some(chars[n + 1..n + 1 + len].iter().collect::<String>());
                    n += len + 2;
                }
                None => {
                    tracing::warn!(pattern, position = i, "Unterminated argument in log pattern");
                    flush_literal(&mut literal, &mut compiled.tokens);
                    compiled.tokens.push(FormatToken::Literal(PATTERN_ERROR_MARKER.to_string()));
                    compiled.has_error = true;
                    return compiled;
                }
            }
        }

        flush_literal(&mut literal, &mut compiled.tokens);
        if RenderField::resolve(&code, arg.as_deref()).is_some() {
            compiled.tokens.push(FormatToken::Field { code, arg });
        } else {
            tracing::warn!(pattern, code = %code, "Unknown field in log pattern");
            compiled.tokens.push(FormatToken::Literal(error_marker(&code)));
            compiled.has_error = true;
        }
        i = n;
    }

    flush_literal(&mut literal, &mut compiled.tokens);
    compiled
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<FormatToken>) {
    if !literal.is_empty() {
        tokens.push(FormatToken::Literal(std::mem::take(literal)));
    }
}
