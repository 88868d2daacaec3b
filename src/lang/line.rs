// This file is part of nanocore-as, an assembler for the nanocore CPU.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// nanocore-as is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// nanocore-as is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with nanocore-as.  If not, see <http://www.gnu.org/licenses/>.

//! Line Splitter: case folding, tab normalization, and label/statement/
//! comment region extraction.

use std::ops::Range;
use crate::error::AssembleError;

pub const MAX_SYMBOL_SIZE: usize = 255;

/// A single source line, case-folded and split into its label, statement,
/// and comment regions.
///
/// All ranges are half-open byte ranges into [`SplitLine::text`]. They are
/// meaningful only alongside that string; they are not preserved across
/// lines.
pub struct SplitLine {
    /// The case-folded, tab-normalized line, stripped of its line terminator.
    pub text: String,

    /// `label:` region, excluding the trailing `:`.
    pub label: Option<Range<usize>>,

    /// Statement region, trimmed of leading/trailing ASCII whitespace.
    pub statement: Range<usize>,

    /// Comment region, excluding the leading `;`.
    pub comment: Option<Range<usize>>,
}

impl SplitLine {
    pub fn label_text(&self) -> Option<&str> {
        self.label.clone().map(|r| &self.text[r])
    }

    pub fn statement_text(&self) -> &str {
        &self.text[self.statement.clone()]
    }
}

/// Splits one raw source line (without its line terminator) into regions.
pub fn split_line(raw: &str) -> Result<SplitLine, AssembleError> {
    let folded = fold_case(raw);
    let bytes = folded.as_bytes();

    let comment_start = find_unquoted(bytes, b';');
    let search_end = comment_start.unwrap_or(bytes.len());

    let label_end = find_unquoted(&bytes[..search_end], b':');

    let label = match label_end {
        Some(end) => {
            validate_symbol_name(&folded[..end])?;
            Some(0..end)
        }
        None => None,
    };

    let stmt_start = label_end.map(|e| e + 1).unwrap_or(0);
    let stmt_range = trim_range(bytes, stmt_start, search_end);

    let comment = comment_start.map(|start| (start + 1)..bytes.len());

    Ok(SplitLine {
        text: folded,
        label,
        statement: stmt_range,
        comment,
    })
}

/// Upper-cases every byte except:
/// - the byte immediately following an unquoted `'` (character literal lead-in),
/// - bytes inside an unquoted `"..."` string, except that the letter of a
///   `\X` escape within such a string is itself case-folded.
///
/// Also normalizes `\t` to a single space everywhere.
fn fold_case(raw: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Normal,
        AfterTick,
        InString,
        InStringEscape,
    }

    let mut state = State::Normal;
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };

        match state {
            State::Normal => {
                out.push(ch.to_ascii_uppercase());
                if ch == '\'' {
                    state = State::AfterTick;
                } else if ch == '"' {
                    state = State::InString;
                }
            }
            State::AfterTick => {
                out.push(ch);
                state = State::Normal;
            }
            State::InString => {
                out.push(ch);
                if ch == '\\' {
                    state = State::InStringEscape;
                } else if ch == '"' {
                    state = State::Normal;
                }
            }
            State::InStringEscape => {
                out.push(ch.to_ascii_uppercase());
                state = State::InString;
            }
        }
    }

    out
}

/// Validates a symbol name (a label or an `EQU` target) per spec §3: it must
/// start with a letter, contain only letters/digits/underscores, and fit
/// within [`MAX_SYMBOL_SIZE`]. `name` is assumed already upper-cased.
pub fn validate_symbol_name(name: &str) -> Result<(), AssembleError> {
    if name.len() > MAX_SYMBOL_SIZE {
        return Err(AssembleError::SymbolLengthExceedsMaximum);
    }
    match name.as_bytes().first() {
        Some(b) if b.is_ascii_uppercase() => {}
        _ => return Err(AssembleError::LetterExpected),
    }
    if name.bytes().any(|b| !(b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')) {
        return Err(AssembleError::InvalidCharacter);
    }
    Ok(())
}

/// Finds the earliest occurrence of `target` that is not inside a `'x`
/// character escape or a `"..."` string, scanning `text` left to right.
fn find_unquoted(text: &[u8], target: u8) -> Option<usize> {
    enum State {
        Normal,
        AfterTick,
        InString,
        InStringEscape,
    }
    let mut state = State::Normal;

    for (i, &b) in text.iter().enumerate() {
        match state {
            State::Normal => {
                if b == target {
                    return Some(i);
                }
                if b == b'\'' {
                    state = State::AfterTick;
                } else if b == b'"' {
                    state = State::InString;
                }
            }
            State::AfterTick => {
                state = State::Normal;
            }
            State::InString => {
                if b == b'\\' {
                    state = State::InStringEscape;
                } else if b == b'"' {
                    state = State::Normal;
                }
            }
            State::InStringEscape => {
                state = State::InString;
            }
        }
    }

    None
}

/// Returns `start..end` trimmed of leading/trailing ASCII whitespace.
fn trim_range(bytes: &[u8], start: usize, end: usize) -> Range<usize> {
    let mut s = start;
    let mut e = end;
    while s < e && is_ascii_blank(bytes[s]) {
        s += 1;
    }
    while e > s && is_ascii_blank(bytes[e - 1]) {
        e -= 1;
    }
    s..e
}

#[inline]
fn is_ascii_blank(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_plain_code() {
        let line = split_line("lda #5").unwrap();
        assert_eq!(line.text, "LDA #5");
        assert!(line.label.is_none());
        assert_eq!(line.statement_text(), "LDA #5");
    }

    #[test]
    fn splits_label_and_statement() {
        let line = split_line("foo: clc").unwrap();
        assert_eq!(line.label_text(), Some("FOO"));
        assert_eq!(line.statement_text(), "CLC");
    }

    #[test]
    fn splits_comment() {
        let line = split_line("clc ; a comment").unwrap();
        assert_eq!(line.statement_text(), "CLC");
        assert_eq!(&line.text[line.comment.clone().unwrap()], " A COMMENT");
    }

    #[test]
    fn label_only_line() {
        let line = split_line("foo:").unwrap();
        assert_eq!(line.label_text(), Some("FOO"));
        assert_eq!(line.statement_text(), "");
    }

    #[test]
    fn char_literal_after_tick_not_folded() {
        let line = split_line("byte 'a'").unwrap();
        assert_eq!(line.statement_text(), "BYTE 'a'");
    }

    #[test]
    fn double_quoted_string_not_folded() {
        let line = split_line(r#"byte "Hello""#).unwrap();
        assert_eq!(line.statement_text(), r#"BYTE "Hello""#);
    }

    #[test]
    fn escape_letter_inside_string_is_folded() {
        let line = split_line(r#"byte "a\nb""#).unwrap();
        assert_eq!(line.statement_text(), r#"BYTE "a\Nb""#);
    }

    #[test]
    fn semicolon_inside_string_is_not_a_comment() {
        let line = split_line(r#"byte ";" ; real comment"#).unwrap();
        assert_eq!(line.statement_text(), r#"BYTE ";""#);
        assert_eq!(&line.text[line.comment.clone().unwrap()], " REAL COMMENT");
    }

    #[test]
    fn colon_inside_char_literal_is_not_a_label() {
        let line = split_line("lda #':").unwrap();
        assert!(line.label.is_none());
    }

    #[test]
    fn label_too_long_is_rejected() {
        let long = "A".repeat(300);
        let src = format!("{}: clc", long);
        let err = split_line(&src).unwrap_err();
        assert_eq!(err, AssembleError::SymbolLengthExceedsMaximum);
    }

    #[test]
    fn label_starting_with_digit_is_rejected() {
        let err = split_line("1FOO: clc").unwrap_err();
        assert_eq!(err, AssembleError::LetterExpected);
    }
}
