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

//! Instruction Handler: addressing-mode prefix parsing, opcode-variant
//! selection, and byte emission for the 21 nanocore mnemonics.

use crate::error::AssembleError;
use crate::session::{Pass, Session};
use super::cursor::{expect_end, Cursor};
use super::expr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddrMode {
    Implied,
    Immediate,
    DirectPage,
    DirectPageIndirect,
    Absolute,
}

#[derive(Clone, Copy, Debug)]
struct Variant {
    opcode: u8,
    mode:   AddrMode,
    len:    u8,
}

const fn v(opcode: u8, mode: AddrMode, len: u8) -> Variant {
    Variant { opcode, mode, len }
}

/// The normative opcode table (spec §6): for each mnemonic, its addressing-
/// mode variants as (opcode, mode, byte length).
fn variants(mnemonic: &str) -> Option<&'static [Variant]> {
    use AddrMode::*;
    Some(match mnemonic {
        "ADD" => &[v(0x10, Immediate, 2), v(0x00, DirectPage, 2)],
        "AND" => &[v(0x12, Immediate, 2), v(0x04, DirectPage, 2)],
        "BCC" => &[v(0x17, Absolute, 3)],
        "BCS" => &[v(0x18, Absolute, 3)],
        "BZC" => &[v(0x1A, Absolute, 3)],
        "BZS" => &[v(0x1B, Absolute, 3)],
        "CLC" => &[v(0x0B, Implied, 1)],
        "DDP" => &[v(0x09, Implied, 1)],
        "IDP" => &[v(0x0A, Implied, 1)],
        "JMP" => &[v(0x16, Absolute, 3)],
        "JSR" => &[v(0x1C, Absolute, 3)],
        "LDA" => &[
            v(0x15, Immediate, 2),
            v(0x07, DirectPage, 2),
            v(0x1E, DirectPageIndirect, 3),
            v(0x0E, Absolute, 3),
        ],
        "LDP" => &[v(0x19, Immediate, 2), v(0x02, Absolute, 3)],
        "ORA" => &[v(0x13, Immediate, 2), v(0x05, DirectPage, 2)],
        "ROL" => &[v(0x03, Implied, 1)],
        "ROR" => &[v(0x0D, Implied, 1)],
        "RTS" => &[v(0x1D, Implied, 1)],
        "SEC" => &[v(0x0C, Implied, 1)],
        "STA" => &[v(0x08, DirectPage, 2), v(0x1F, DirectPageIndirect, 3), v(0x0F, Absolute, 3)],
        "SUB" => &[v(0x11, Immediate, 2), v(0x01, DirectPage, 2)],
        "XOR" => &[v(0x14, Immediate, 2), v(0x06, DirectPage, 2)],
        _ => return None,
    })
}

/// Whether `name` (already upper-cased) is one of the 21 mnemonics.
pub fn is_mnemonic(name: &str) -> bool {
    variants(name).is_some()
}

struct ParsedOperand {
    mode: AddrMode,
    text: String,
}

/// Parses the addressing-mode prefix from an instruction's operand text,
/// per spec §4.6 step 2, and strips it to leave the bare expression text.
///
/// The `(`/`)` case needs the disambiguation spec §4.2 states only loosely
/// ("DPI iff the statement's final non-whitespace char is `)`") — literally
/// read, that rule cannot distinguish `LDA (1+2)` (Absolute) from `LDA (5)`
/// (DirectPageIndirect), since both end in `)`. This resolves it by content:
/// the parens are a DPI prefix only when they span the whole operand *and*
/// their interior has no top-level binary operator; `(1+2)` has one (so it's
/// an ordinary grouped Absolute expression), `(5)` has none (so it's DPI).
fn parse_operand(operand: &str) -> Result<ParsedOperand, AssembleError> {
    let trimmed = operand.trim();

    if let Some(rest) = trimmed.strip_prefix('#') {
        return Ok(ParsedOperand { mode: AddrMode::Immediate, text: rest.trim().to_owned() });
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest.strip_suffix(']').ok_or(AssembleError::RightBracketExpected)?;
        return Ok(ParsedOperand { mode: AddrMode::DirectPage, text: inner.trim().to_owned() });
    }

    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        if let Some(inner) = matching_outer_parens(trimmed) {
            if !has_top_level_operator(inner) {
                return Ok(ParsedOperand {
                    mode: AddrMode::DirectPageIndirect,
                    text: inner.trim().to_owned(),
                });
            }
        }
    }

    Ok(ParsedOperand { mode: AddrMode::Absolute, text: trimmed.to_owned() })
}

/// Returns the interior of `s` if `s`'s leading `(` is matched by its own
/// trailing `)` (not by some earlier `)`).
fn matching_outer_parens(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return if i == bytes.len() - 1 { Some(&s[1..i]) } else { None };
                }
            }
            _ => {}
        }
    }
    None
}

/// `true` if `s` contains an additive/multiplicative/bitwise operator at
/// paren-depth 0 that is not a leading unary sign, skipping over char
/// literals (`'x` or `'\x`) so an operator-looking literal isn't miscounted.
fn has_top_level_operator(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut seen_operand_start = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => { depth += 1; seen_operand_start = true; i += 1; }
            b')' => { depth -= 1; i += 1; }
            b'\'' => {
                seen_operand_start = true;
                i += 1;
                if i < bytes.len() && bytes[i] == b'\\' { i += 1; }
                if i < bytes.len() { i += 1; }
            }
            b'+' | b'-' if depth == 0 && !seen_operand_start => { i += 1; }
            b'+' | b'-' | b'*' | b'/' | b'&' | b'|' if depth == 0 => return true,
            b' ' => { i += 1; }
            _ => { seen_operand_start = true; i += 1; }
        }
    }
    false
}

fn contains_top_level_comma(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => { depth += 1; i += 1; }
            b')' => { depth -= 1; i += 1; }
            b'\'' => {
                i += 1;
                if i < bytes.len() && bytes[i] == b'\\' { i += 1; }
                if i < bytes.len() { i += 1; }
            }
            b',' if depth == 0 => return true,
            _ => { i += 1; }
        }
    }
    false
}

/// Assembles one instruction statement, returning the bytes it contributes.
/// On pass one the returned bytes are placeholders of the correct *length*
/// only (the caller advances LC by `bytes.len()`); on pass two they are the
/// real opcode and operand bytes ready to write to memory.
pub fn assemble(
    session: &mut Session, mnemonic: &str, operand_text: &str,
) -> Result<Vec<u8>, AssembleError> {
    let table = variants(mnemonic).ok_or(AssembleError::TypeNotSupported)?;
    let trimmed = operand_text.trim();

    if table.len() == 1 && table[0].mode == AddrMode::Implied {
        if !trimmed.is_empty() {
            return Err(AssembleError::EndOfStatementExpected);
        }
        return Ok(vec![table[0].opcode]);
    }

    if trimmed.is_empty() {
        return Err(AssembleError::IncorrectNumberOfOperands);
    }

    let parsed = parse_operand(trimmed)?;
    if contains_top_level_comma(&parsed.text) {
        return Err(AssembleError::TooManyOperands);
    }

    session.note_operand_length(parsed.text.len());

    let variant = table.iter().find(|variant| variant.mode == parsed.mode)
        .ok_or(AssembleError::TypeNotSupported)?;

    emit(session, *variant, &parsed.text)
}

fn emit(session: &mut Session, variant: Variant, expr_text: &str) -> Result<Vec<u8>, AssembleError> {
    if session.pass == Pass::One {
        let mut cursor = Cursor::new(expr_text.as_bytes());
        expr::evaluate(&mut cursor, &session.symbols, session.lc, true)?;
        expect_end(&mut cursor)?;
        return Ok(vec![0u8; variant.len as usize]);
    }

    let mut cursor = Cursor::new(expr_text.as_bytes());
    let value = expr::evaluate(&mut cursor, &session.symbols, session.lc, false)?;
    expect_end(&mut cursor)?;

    let mut bytes = vec![variant.opcode];
    match variant.mode {
        AddrMode::Immediate | AddrMode::DirectPage => {
            if !(0..=255).contains(&value) {
                return Err(AssembleError::InvalidValue);
            }
            bytes.push(value as u8);
        }
        AddrMode::Absolute | AddrMode::DirectPageIndirect => {
            if !(0..=65535).contains(&value) {
                return Err(AssembleError::InvalidValue);
            }
            let value = value as u16;
            bytes.push((value & 0xFF) as u8);
            bytes.push((value >> 8) as u8);
        }
        AddrMode::Implied => unreachable!("Implied instructions return before reaching emit"),
    }
    Ok(bytes)
}
