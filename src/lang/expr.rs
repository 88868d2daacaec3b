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

//! Expression Evaluator: recursive-descent parser over a mixed precedence
//! of bitwise and arithmetic operators.
//!
//! ```text
//! b_expression := b_term   ( '|' b_term )*
//! b_term       := expr     ( '&' expr   )*
//! expr         := term     ( ('+'|'-') term )*
//! term         := signed   ( ('*'|'/') factor )*
//! signed       := ['+'|'-'] factor
//! factor       := '(' b_expression ')' | symbol | '.' | char_literal | number
//! ```

use crate::error::AssembleError;
use crate::mem::symbol_table::SymbolTable;
use super::cursor::Cursor;

/// Fixed-capacity stack that holds a partial left operand across each fold
/// of an operator loop. Shared by reference across every recursive call, so
/// nested parenthesized expressions deeper than [`NumberStack::CAPACITY`]
/// exhaust it.
struct NumberStack {
    data: [i32; Self::CAPACITY],
    len:  usize,
}

impl NumberStack {
    const CAPACITY: usize = 50;

    fn new() -> Self {
        Self { data: [0; Self::CAPACITY], len: 0 }
    }

    fn push(&mut self, value: i32) -> Result<(), AssembleError> {
        if self.len >= Self::CAPACITY {
            return Err(AssembleError::NumberStackFull);
        }
        self.data[self.len] = value;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<i32, AssembleError> {
        if self.len == 0 {
            return Err(AssembleError::NumberStackEmpty);
        }
        self.len -= 1;
        Ok(self.data[self.len])
    }
}

/// Evaluates one expression starting at the cursor, consulting `symbols` for
/// symbol factors and `lc` for `.` factors. The cursor is left positioned
/// just past the last character consumed by the expression.
///
/// `tolerate_unknown` relaxes symbol resolution: an undefined symbol yields
/// `0` instead of `UnknownSymbol`, and division by zero yields `0` instead of
/// `DivisionByZero`. Pass one sets this, since it must size an instruction or
/// `BYTE` item from its syntax alone, before every forward-referenced label
/// has been recorded; pass two always resolves strictly.
pub fn evaluate(
    cursor:  &mut Cursor,
    symbols: &SymbolTable,
    lc:      u32,
    tolerate_unknown: bool,
) -> Result<i32, AssembleError> {
    let mut stack = NumberStack::new();
    b_expression(cursor, symbols, lc, &mut stack, tolerate_unknown)
}

fn b_expression(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    let mut left = b_term(cursor, symbols, lc, stack, tol)?;
    loop {
        skip_spaces(cursor);
        if cursor.peek() != b'|' {
            break;
        }
        stack.push(left)?;
        cursor.advance();
        skip_spaces(cursor);
        let right = b_term(cursor, symbols, lc, stack, tol)?;
        left = stack.pop()? | right;
    }
    Ok(left)
}

fn b_term(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    let mut left = expr(cursor, symbols, lc, stack, tol)?;
    loop {
        skip_spaces(cursor);
        if cursor.peek() != b'&' {
            break;
        }
        stack.push(left)?;
        cursor.advance();
        skip_spaces(cursor);
        let right = expr(cursor, symbols, lc, stack, tol)?;
        left = stack.pop()? & right;
    }
    Ok(left)
}

fn expr(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    let mut left = term(cursor, symbols, lc, stack, tol)?;
    loop {
        skip_spaces(cursor);
        let op = cursor.peek();
        if op != b'+' && op != b'-' {
            break;
        }
        stack.push(left)?;
        cursor.advance();
        skip_spaces(cursor);
        let right = term(cursor, symbols, lc, stack, tol)?;
        let popped = stack.pop()?;
        left = if op == b'+' { popped.wrapping_add(right) } else { popped.wrapping_sub(right) };
    }
    Ok(left)
}

fn term(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    let mut left = signed_factor(cursor, symbols, lc, stack, tol)?;
    loop {
        skip_spaces(cursor);
        let op = cursor.peek();
        if op != b'*' && op != b'/' {
            break;
        }
        stack.push(left)?;
        cursor.advance();
        skip_spaces(cursor);
        let right = factor(cursor, symbols, lc, stack, tol)?;
        let popped = stack.pop()?;
        left = if op == b'*' {
            popped.wrapping_mul(right)
        } else if right == 0 {
            if tol { 0 } else { return Err(AssembleError::DivisionByZero); }
        } else {
            popped.wrapping_div(right)
        };
    }
    Ok(left)
}

fn signed_factor(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    skip_spaces(cursor);
    let sign = match cursor.peek() {
        b'+' => { cursor.advance(); 1 }
        b'-' => { cursor.advance(); -1 }
        _ => 1,
    };
    skip_spaces(cursor);
    let value = factor(cursor, symbols, lc, stack, tol)?;
    Ok(value.wrapping_mul(sign))
}

fn factor(
    cursor: &mut Cursor, symbols: &SymbolTable, lc: u32, stack: &mut NumberStack, tol: bool,
) -> Result<i32, AssembleError> {
    skip_spaces(cursor);

    match cursor.peek() {
        b'(' => {
            cursor.advance();
            skip_spaces(cursor);
            let value = b_expression(cursor, symbols, lc, stack, tol)?;
            skip_spaces(cursor);
            if cursor.peek() != b')' {
                return Err(AssembleError::RightParenthesisExpected);
            }
            cursor.advance();
            Ok(value)
        }
        b'.' => {
            cursor.advance();
            Ok(lc as i32)
        }
        b'\'' => parse_char_literal(cursor),
        b'%' | b'$' => parse_number(cursor),
        b'0'..=b'9' => parse_number(cursor),
        c if c.is_ascii_uppercase() => parse_symbol(cursor, symbols, tol),
        _ => Err(AssembleError::UnexpectedEndOfStatement),
    }
}

fn parse_symbol(
    cursor: &mut Cursor, symbols: &SymbolTable, tol: bool,
) -> Result<i32, AssembleError> {
    let start = cursor.position();
    while is_symbol_char(cursor.peek()) {
        cursor.advance();
    }
    let name = std::str::from_utf8(&cursor.line()[start..cursor.position()]).unwrap();

    let value = match symbols.lookup(name) {
        Some(value) => value,
        None if tol => 0,
        None => return Err(AssembleError::UnknownSymbol(name.to_owned())),
    };

    skip_one_space(cursor);
    Ok(value as i32)
}

#[inline]
fn is_symbol_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

fn parse_number(cursor: &mut Cursor) -> Result<i32, AssembleError> {
    let value = if cursor.peek() == b'%' {
        cursor.advance();
        parse_radix(cursor, 2, |b| b == b'0' || b == b'1')?
    } else if cursor.peek() == b'$' {
        cursor.advance();
        parse_radix(cursor, 16, |b| b.is_ascii_hexdigit())?
    } else if cursor.peek() == b'0' && cursor.peek_at(1) == b'B'
        && matches!(cursor.peek_at(2), b'0' | b'1')
    {
        cursor.advance();
        cursor.advance();
        parse_radix(cursor, 2, |b| b == b'0' || b == b'1')?
    } else if cursor.peek() == b'0' && cursor.peek_at(1) == b'X'
        && cursor.peek_at(2).is_ascii_hexdigit()
    {
        cursor.advance();
        cursor.advance();
        parse_radix(cursor, 16, |b| b.is_ascii_hexdigit())?
    } else {
        parse_radix(cursor, 10, |b| b.is_ascii_digit())?
    };

    skip_one_space(cursor);
    Ok(value)
}

fn parse_radix(
    cursor: &mut Cursor, radix: u32, is_digit: impl Fn(u8) -> bool,
) -> Result<i32, AssembleError> {
    let start = cursor.position();
    while is_digit(cursor.peek()) {
        cursor.advance();
    }
    if cursor.position() == start {
        return Err(AssembleError::InvalidCharacter);
    }
    let text = std::str::from_utf8(&cursor.line()[start..cursor.position()]).unwrap();
    let value = i64::from_str_radix(text, radix).map_err(|_| AssembleError::InvalidCharacter)?;
    Ok(value as i32)
}

fn parse_char_literal(cursor: &mut Cursor) -> Result<i32, AssembleError> {
    cursor.advance(); // consume opening '\''
    let c = cursor.peek();
    if c == 0 {
        return Err(AssembleError::UnexpectedEndOfStatement);
    }
    cursor.advance();

    let value = if c == b'\\' {
        let esc = cursor.peek();
        cursor.advance();
        match esc {
            b'B' => 0x08,
            b'F' => 0x0C,
            b'N' => 0x0A,
            b'R' => 0x0D,
            b'T' => 0x09,
            b'\\' => 0x5C,
            b'"' => 0x22,
            _ => return Err(AssembleError::InvalidCharacter),
        }
    } else if (0x21..=0x7E).contains(&c) {
        c as i32
    } else {
        return Err(AssembleError::InvalidCharacter);
    };

    // The terminating quote is deliberately not consumed.
    Ok(value)
}

#[inline]
fn skip_spaces(cursor: &mut Cursor) {
    while cursor.peek() == b' ' {
        cursor.advance();
    }
}

#[inline]
fn skip_one_space(cursor: &mut Cursor) {
    if cursor.peek() == b' ' {
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str, symbols: &SymbolTable, lc: u32) -> Result<i32, AssembleError> {
        let mut cursor = Cursor::new(text.as_bytes());
        evaluate(&mut cursor, symbols, lc, false)
    }

    #[test]
    fn decimal_number() {
        let table = SymbolTable::new();
        assert_eq!(eval("42", &table, 0), Ok(42));
    }

    #[test]
    fn hex_and_binary_prefixes() {
        let table = SymbolTable::new();
        assert_eq!(eval("$FF", &table, 0), Ok(255));
        assert_eq!(eval("0XFF", &table, 0), Ok(255));
        assert_eq!(eval("%101", &table, 0), Ok(5));
        assert_eq!(eval("0B101", &table, 0), Ok(5));
    }

    #[test]
    fn additive_and_multiplicative_precedence() {
        let table = SymbolTable::new();
        assert_eq!(eval("2+3*4", &table, 0), Ok(14));
        assert_eq!(eval("(2+3)*4", &table, 0), Ok(20));
    }

    #[test]
    fn bitwise_operators() {
        let table = SymbolTable::new();
        assert_eq!(eval("6|1", &table, 0), Ok(7));
        assert_eq!(eval("6&3", &table, 0), Ok(2));
    }

    #[test]
    fn unary_sign() {
        let table = SymbolTable::new();
        assert_eq!(eval("-5+10", &table, 0), Ok(5));
    }

    #[test]
    fn location_counter_factor() {
        let table = SymbolTable::new();
        assert_eq!(eval(".", &table, 0x100), Ok(0x100));
    }

    #[test]
    fn symbol_factor() {
        let mut table = SymbolTable::new();
        table.insert("FOO", 7).unwrap();
        assert_eq!(eval("FOO+1", &table, 0), Ok(8));
    }

    #[test]
    fn unknown_symbol_errors() {
        let table = SymbolTable::new();
        assert_eq!(eval("FOO", &table, 0), Err(AssembleError::UnknownSymbol("FOO".to_owned())));
    }

    #[test]
    fn division_by_zero_errors() {
        let table = SymbolTable::new();
        assert_eq!(eval("1/0", &table, 0), Err(AssembleError::DivisionByZero));
    }

    #[test]
    fn char_literal_value() {
        let table = SymbolTable::new();
        let mut cursor = Cursor::new(b"'A'");
        assert_eq!(evaluate(&mut cursor, &table, 0, false), Ok(0x41));
        assert_eq!(cursor.peek(), b'\''); // terminator not consumed
    }

    #[test]
    fn tolerant_mode_substitutes_zero_for_unknown_symbol() {
        let table = SymbolTable::new();
        assert_eq!(eval_tol("FORWARD+1", &table, 0), Ok(1));
    }

    #[test]
    fn tolerant_mode_suppresses_division_by_zero() {
        let table = SymbolTable::new();
        assert_eq!(eval_tol("1/FORWARD", &table, 0), Ok(0));
    }

    fn eval_tol(text: &str, symbols: &SymbolTable, lc: u32) -> Result<i32, AssembleError> {
        let mut cursor = Cursor::new(text.as_bytes());
        evaluate(&mut cursor, symbols, lc, true)
    }

    #[test]
    fn char_literal_escape() {
        let table = SymbolTable::new();
        assert_eq!(eval(r"'\N'", &table, 0), Ok(0x0A));
    }

    /// Builds `k|(k+1|(k+2|(...|(n|n+1)...)))` for `k` from 1 to `depth`,
    /// right-nesting each `|` inside the next so that every left operand's
    /// push stays live on the number stack while its right operand (itself
    /// another `|` fold) is evaluated. This is what actually drives the
    /// stack to `depth` simultaneous entries, unlike a flat `1|2|3|...`
    /// chain, whose push/pop pairs never overlap.
    fn nested_or(depth: u32) -> String {
        let mut s = format!("{}|{}", depth, depth + 1);
        for k in (1..depth).rev() {
            s = format!("{}|({})", k, s);
        }
        s
    }

    #[test]
    fn nested_bitwise_or_within_capacity_is_accepted() {
        let table = SymbolTable::new();
        let text = nested_or(50);
        assert!(eval(&text, &table, 0).is_ok());
    }

    #[test]
    fn nested_bitwise_or_beyond_capacity_overflows() {
        let table = SymbolTable::new();
        let text = nested_or(51);
        assert_eq!(eval(&text, &table, 0), Err(AssembleError::NumberStackFull));
    }
}
