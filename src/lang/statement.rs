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

//! Statement Dispatcher and Label Handler: classifies a statement's head
//! token and routes to the matching directive or instruction handler.

use crate::error::AssembleError;
use crate::session::{Pass, Session};
use super::directives;
use super::instruction;
use super::line::{validate_symbol_name, SplitLine};

/// What a processed statement contributed: the bytes it emits (real on pass
/// two, placeholder-but-correctly-sized on pass one) and the textual fields
/// the listing formatter reconstructs a source line from.
pub struct StatementResult {
    pub bytes:    Vec<u8>,
    pub mnemonic: String,
    pub operand:  String,
    pub ends_assembly: bool,
}

impl StatementResult {
    fn empty() -> Self {
        Self { bytes: Vec::new(), mnemonic: String::new(), operand: String::new(), ends_assembly: false }
    }
}

/// Splits a statement's head token (contiguous non-whitespace) from its
/// remainder, both already trimmed.
fn split_head(statement: &str) -> (&str, &str) {
    let statement = statement.trim_start();
    match statement.find(' ') {
        Some(i) => (&statement[..i], statement[i + 1..].trim_start()),
        None => (statement, ""),
    }
}

/// Processes one source line's label and statement. `label` and
/// `label_takes_lc` follow spec §4.7: the label is recorded with the LC as
/// it stood *before* this statement runs.
pub fn dispatch(
    session: &mut Session, split: &SplitLine,
) -> Result<StatementResult, AssembleError> {
    let label_lc = session.lc;

    let statement = split.statement_text();
    let (head, rest) = split_head(statement);

    if head.is_empty() {
        handle_label(session, split, label_lc)?;
        return Ok(StatementResult::empty());
    }

    match head {
        "BYTE" => {
            handle_label(session, split, label_lc)?;
            let bytes = directives::byte(session, rest)?;
            session.note_operand_length(rest.len());
            Ok(StatementResult {
                bytes, mnemonic: "BYTE".to_owned(), operand: rest.to_owned(), ends_assembly: false,
            })
        }
        "ORG" => {
            handle_label(session, split, label_lc)?;
            directives::org(session, rest)?;
            session.note_operand_length(rest.len());
            Ok(StatementResult {
                bytes: Vec::new(), mnemonic: "ORG".to_owned(), operand: rest.to_owned(),
                ends_assembly: false,
            })
        }
        "END" => {
            directives::end(split.label.is_some(), rest)?;
            Ok(StatementResult {
                bytes: Vec::new(), mnemonic: "END".to_owned(), operand: String::new(),
                ends_assembly: true,
            })
        }
        _ if instruction::is_mnemonic(head) => {
            handle_label(session, split, label_lc)?;
            let bytes = instruction::assemble(session, head, rest)?;
            Ok(StatementResult {
                bytes, mnemonic: head.to_owned(), operand: rest.to_owned(), ends_assembly: false,
            })
        }
        _ => {
            let (keyword, expr_text) = split_head(rest);
            if keyword != "EQU" {
                return Err(AssembleError::ExpectedEquAfterSymbol);
            }
            if split.label.is_some() {
                return Err(AssembleError::LabelForbiddenOnEqu);
            }
            validate_symbol_name(head)?;
            directives::equ(session, head, expr_text)?;
            Ok(StatementResult {
                bytes: Vec::new(), mnemonic: "EQU".to_owned(), operand: expr_text.to_owned(),
                ends_assembly: false,
            })
        }
    }
}

/// Label Handler (spec §4.7): inserted at the line's starting LC on pass
/// one only — pass two trusts pass one's table and only needed the syntax
/// check the Line Splitter already performed.
fn handle_label(session: &mut Session, split: &SplitLine, label_lc: u32) -> Result<(), AssembleError> {
    if let Some(name) = split.label_text() {
        if session.pass == Pass::One {
            session.symbols.insert(name, label_lc)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ListingOption, SymbolOption};
    use crate::lang::line::split_line;

    fn new_session(pass: Pass) -> Session {
        let mut session = Session::new(ListingOption::List, SymbolOption::Sym);
        session.pass = pass;
        session
    }

    #[test]
    fn split_head_separates_first_token() {
        assert_eq!(split_head("BYTE 1, 2"), ("BYTE", "1, 2"));
        assert_eq!(split_head("CLC"), ("CLC", ""));
    }

    #[test]
    fn label_is_recorded_at_line_start_lc() {
        let mut session = new_session(Pass::One);
        session.lc = 0x10;
        let split = split_line("FOO: CLC").unwrap();
        let result = dispatch(&mut session, &split).unwrap();
        assert_eq!(session.symbols.lookup("FOO"), Some(0x10));
        assert_eq!(result.bytes, vec![0x0B]);
    }

    #[test]
    fn plain_symbol_without_equ_is_an_error() {
        let mut session = new_session(Pass::One);
        let split = split_line("FOO BAR").unwrap();
        assert_eq!(dispatch(&mut session, &split).unwrap_err(), AssembleError::ExpectedEquAfterSymbol);
    }

    #[test]
    fn equ_statement_defines_symbol() {
        let mut session = new_session(Pass::One);
        let split = split_line("FOO EQU 5").unwrap();
        dispatch(&mut session, &split).unwrap();
        assert_eq!(session.symbols.lookup("FOO"), Some(5));
    }

    #[test]
    fn end_statement_ends_assembly() {
        let mut session = new_session(Pass::Two);
        let split = split_line("END").unwrap();
        assert!(dispatch(&mut session, &split).unwrap().ends_assembly);
    }

    #[test]
    fn label_before_equ_is_rejected() {
        let mut session = new_session(Pass::One);
        let split = split_line("LBL: FOO EQU 5").unwrap();
        assert_eq!(dispatch(&mut session, &split).unwrap_err(), AssembleError::LabelForbiddenOnEqu);
    }

    #[test]
    fn equ_symbol_starting_with_digit_is_rejected() {
        let mut session = new_session(Pass::One);
        let split = split_line("1FOO EQU 5").unwrap();
        assert_eq!(dispatch(&mut session, &split).unwrap_err(), AssembleError::LetterExpected);
    }

    #[test]
    fn blank_statement_with_label_only_records_label() {
        let mut session = new_session(Pass::One);
        let split = split_line("FOO:").unwrap();
        let result = dispatch(&mut session, &split).unwrap();
        assert_eq!(session.symbols.lookup("FOO"), Some(0));
        assert!(result.bytes.is_empty());
    }
}
