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

//! Assembler error kinds.

use thiserror::Error;

/// Every way that assembling a source file can fail.
///
/// These mirror the error table in the original assembler's `log.c`, one
/// variant per distinct failure the pass driver can observe.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum AssembleError {
    // --- Lexical errors ---
    #[error("letter expected")]
    LetterExpected,

    #[error("invalid character")]
    InvalidCharacter,

    #[error("symbol length exceeds maximum")]
    SymbolLengthExceedsMaximum,

    // --- Syntax errors ---
    #[error("expected EQU after symbol")]
    ExpectedEquAfterSymbol,

    #[error("a label is forbidden on an EQU line")]
    LabelForbiddenOnEqu,

    #[error("end of statement expected")]
    EndOfStatementExpected,

    #[error("unexpected end of statement")]
    UnexpectedEndOfStatement,

    #[error("right parenthesis expected")]
    RightParenthesisExpected,

    #[error("right bracket expected")]
    RightBracketExpected,

    #[error("too many operands")]
    TooManyOperands,

    // --- Semantic errors ---
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("invalid value")]
    InvalidValue,

    #[error("incorrect number of operands")]
    IncorrectNumberOfOperands,

    #[error("specified addressing mode not supported by this instruction")]
    TypeNotSupported,

    #[error("END directive not alone")]
    EndDirectiveNotAlone,

    #[error("an attempt was made to move the location counter backwards")]
    LocationCounterBackwards,

    #[error("exceeded program memory")]
    ExceededProgramMemory,

    // --- Evaluator errors ---
    #[error("expression number stack full")]
    NumberStackFull,

    #[error("expression number stack empty")]
    NumberStackEmpty,

    #[error("division by zero")]
    DivisionByZero,

    // --- I/O errors ---
    #[error("could not open file: {0}")]
    FileOpen(String),

    #[error("could not write file: {0}")]
    FileWrite(String),

    #[error("could not reset file back to the beginning: {0}")]
    FileRewind(String),
}

/// Result alias used throughout the assembler core.
pub type AsmResult<T> = Result<T, AssembleError>;
