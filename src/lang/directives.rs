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

//! Directive Handlers: `BYTE`, `END`, `EQU`, `ORG`.

use crate::error::AssembleError;
use crate::session::{Pass, Session};
use super::cursor::{expect_end, Cursor};
use super::expr;

/// `ORG expr`: moves the location counter forward. Evaluated strictly (not
/// tolerant of forward references) and identically on both passes, since its
/// result must keep LC in lockstep across passes (spec §3 invariant).
pub fn org(session: &mut Session, expr_text: &str) -> Result<(), AssembleError> {
    let mut cursor = Cursor::new(expr_text.as_bytes());
    let value = expr::evaluate(&mut cursor, &session.symbols, session.lc, false)?;
    expect_end(&mut cursor)?;

    if !(0..0x10000).contains(&value) {
        return Err(AssembleError::InvalidValue);
    }
    let value = value as u32;

    if value < session.lc {
        return Err(AssembleError::LocationCounterBackwards);
    }

    session.lc = value;
    Ok(())
}

/// `symbol EQU expr`: defines `symbol` as `expr`'s value. Inserted into the
/// symbol table on pass one only; pass two re-evaluates for validation but
/// performs no insertion, since the table must not see the same symbol twice.
pub fn equ(session: &mut Session, name: &str, expr_text: &str) -> Result<(), AssembleError> {
    let mut cursor = Cursor::new(expr_text.as_bytes());
    let value = expr::evaluate(&mut cursor, &session.symbols, session.lc, false)?;
    expect_end(&mut cursor)?;

    if value < 0 {
        return Err(AssembleError::InvalidValue);
    }

    if session.pass == Pass::One {
        session.symbols.insert(name, value as u32)?;
    }
    Ok(())
}

/// One `BYTE` item: either a numeric expression (always one byte) or a
/// `"…"` string (one byte per decoded character).
enum ByteItem {
    Expr(String),
    Str(Vec<u8>),
}

/// Splits `BYTE`'s comma-separated item list, decoding string items (and
/// their backslash escapes) but leaving expression items as unevaluated
/// text. Shared by both passes, per the reference's pass-one/pass-two byte
/// counting being prone to drift (spec §9): counting falls naturally out of
/// `items.len()`/decoded string length without duplicating the scan logic.
fn parse_items(text: &str) -> Result<Vec<ByteItem>, AssembleError> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut i = 0;

    loop {
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        if bytes[i] == b'"' {
            i += 1;
            let mut decoded = Vec::new();
            loop {
                if i >= bytes.len() {
                    return Err(AssembleError::UnexpectedEndOfStatement);
                }
                match bytes[i] {
                    b'"' => { i += 1; break; }
                    b'\\' => {
                        i += 1;
                        if i >= bytes.len() {
                            return Err(AssembleError::UnexpectedEndOfStatement);
                        }
                        decoded.push(match bytes[i] {
                            b'B' => 0x08,
                            b'F' => 0x0C,
                            b'N' => 0x0A,
                            b'R' => 0x0D,
                            b'T' => 0x09,
                            b'\\' => 0x5C,
                            b'"' => 0x22,
                            _ => return Err(AssembleError::InvalidCharacter),
                        });
                        i += 1;
                    }
                    b => { decoded.push(b); i += 1; }
                }
            }
            items.push(ByteItem::Str(decoded));
        } else {
            let start = i;
            while i < bytes.len() && bytes[i] != b',' {
                i += 1;
            }
            let raw = std::str::from_utf8(&bytes[start..i]).unwrap().trim();
            if raw.is_empty() {
                return Err(AssembleError::UnexpectedEndOfStatement);
            }
            items.push(ByteItem::Expr(raw.to_owned()));
        }

        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        if bytes[i] != b',' {
            return Err(AssembleError::EndOfStatementExpected);
        }
        i += 1;
    }

    if items.is_empty() {
        return Err(AssembleError::UnexpectedEndOfStatement);
    }
    Ok(items)
}

/// `BYTE item (, item)*`. Returns the emitted bytes; on pass one these are
/// placeholders of the right *count* only (values are never read by the
/// caller until pass two).
pub fn byte(session: &mut Session, text: &str) -> Result<Vec<u8>, AssembleError> {
    let items = parse_items(text)?;
    let mut out = Vec::new();

    for item in items {
        match item {
            ByteItem::Str(decoded) => out.extend(decoded),
            ByteItem::Expr(expr_text) => {
                let tolerate = session.tolerate_unknown();
                let mut cursor = Cursor::new(expr_text.as_bytes());
                let value = expr::evaluate(&mut cursor, &session.symbols, session.lc, tolerate)?;
                expect_end(&mut cursor)?;

                if session.pass == Pass::Two {
                    if !(0..=255).contains(&value) {
                        return Err(AssembleError::InvalidValue);
                    }
                    out.push(value as u8);
                } else {
                    out.push(0);
                }
            }
        }
    }

    Ok(out)
}

/// `END`: terminates assembly. No label, nothing after the mnemonic.
pub fn end(has_label: bool, rest: &str) -> Result<(), AssembleError> {
    if has_label || !rest.trim().is_empty() {
        return Err(AssembleError::EndDirectiveNotAlone);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ListingOption, SymbolOption};

    fn new_session(pass: Pass) -> Session {
        let mut session = Session::new(ListingOption::List, SymbolOption::Sym);
        session.pass = pass;
        session
    }

    #[test]
    fn org_sets_lc_forward() {
        let mut session = new_session(Pass::Two);
        org(&mut session, "$100").unwrap();
        assert_eq!(session.lc, 0x100);
    }

    #[test]
    fn org_backwards_is_rejected() {
        let mut session = new_session(Pass::Two);
        session.lc = 0x10;
        assert_eq!(org(&mut session, "5").unwrap_err(), AssembleError::LocationCounterBackwards);
    }

    #[test]
    fn org_out_of_range_is_invalid() {
        let mut session = new_session(Pass::Two);
        assert_eq!(org(&mut session, "$10000").unwrap_err(), AssembleError::InvalidValue);
    }

    #[test]
    fn equ_inserts_only_on_pass_one() {
        let mut session = new_session(Pass::One);
        equ(&mut session, "FOO", "$10+2*3").unwrap();
        assert_eq!(session.symbols.lookup("FOO"), Some(0x16));

        let mut session = new_session(Pass::Two);
        session.symbols.insert("FOO", 0x16).unwrap();
        equ(&mut session, "FOO", "$10+2*3").unwrap();
        assert_eq!(session.symbols.lookup("FOO"), Some(0x16));
    }

    #[test]
    fn byte_emits_numbers_and_strings() {
        let mut session = new_session(Pass::Two);
        assert_eq!(byte(&mut session, "$AA, $55").unwrap(), vec![0xAA, 0x55]);
        assert_eq!(byte(&mut session, r#""abc""#).unwrap(), vec![0x61, 0x62, 0x63]);
        assert_eq!(byte(&mut session, "'A'").unwrap(), vec![0x41]);
    }

    #[test]
    fn byte_out_of_range_is_invalid() {
        let mut session = new_session(Pass::Two);
        assert_eq!(byte(&mut session, "256").unwrap_err(), AssembleError::InvalidValue);
    }

    #[test]
    fn byte_pass_one_tolerates_forward_reference_and_counts_correctly() {
        let mut session = new_session(Pass::One);
        assert_eq!(byte(&mut session, "TARGET, 1, 2").unwrap().len(), 3);
    }

    #[test]
    fn end_rejects_label_or_trailing_text() {
        assert!(end(true, "").is_err());
        assert!(end(false, "garbage").is_err());
        assert!(end(false, "").is_ok());
    }
}
