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

//! Pass Driver: runs the line stream twice over the same source, building
//! the symbol table and sizing statements on pass one, then resolving and
//! emitting bytes plus listing rows on pass two.

use crate::error::AssembleError;
use crate::lang::line::split_line;
use crate::lang::statement::dispatch;
use crate::listing::{self, ListingRow};
use crate::mem::program_memory;
use crate::session::{ListingOption, Pass, Session, SymbolOption};

/// An assembly failure, located for the caret-pointer diagnostic (spec §7).
pub struct Diagnostic {
    pub error:    AssembleError,
    pub line_no:  u32,
    pub raw_line: String,
    pub column:   usize,
}

/// The result of a successful assembly.
pub struct Assembled {
    pub binary:  Vec<u8>,
    pub listing: Option<String>,
}

/// Assembles `lines` (already split by the caller, one source line per
/// entry, terminators stripped) under `listing_option`/`symbol_option`.
/// `source_name` is used only for the listing header.
pub fn assemble(
    source_name: &str,
    lines: &[String],
    listing_option: ListingOption,
    symbol_option: SymbolOption,
) -> Result<Assembled, Diagnostic> {
    let mut session = Session::new(listing_option, symbol_option);

    run_pass(&mut session, lines, Pass::One, None)?;

    let mut rows = Vec::new();
    let collect = if session.listing_option == ListingOption::List { Some(&mut rows) } else { None };
    let last_lc = run_pass(&mut session, lines, Pass::Two, collect)?;

    let binary = session.memory.image(last_lc.saturating_sub(1));

    let listing = match session.listing_option {
        ListingOption::List => {
            let symbols = match session.symbol_option {
                SymbolOption::Sym => Some(&session.symbols),
                SymbolOption::NoSym => None,
            };
            Some(listing::render(
                source_name,
                &rows,
                symbols,
                session.symbols.largest_symbol_length(),
                session.largest_operand_length,
            ))
        }
        ListingOption::NoList => None,
    };

    Ok(Assembled { binary, listing })
}

/// Runs one full sweep, returning the LC as it stood after the last
/// processed line (spec §4.8's pseudocode).
fn run_pass(
    session: &mut Session, lines: &[String], pass: Pass, mut rows: Option<&mut Vec<ListingRow>>,
) -> Result<u32, Diagnostic> {
    session.begin_pass(pass);

    for (index, raw_line) in lines.iter().enumerate() {
        let line_no = index as u32 + 1;

        let split = split_line(raw_line).map_err(|error| Diagnostic {
            error, line_no, raw_line: raw_line.clone(), column: 0,
        })?;

        let lc_before = session.lc;

        let result = dispatch(session, &split).map_err(|error| Diagnostic {
            error, line_no, raw_line: raw_line.clone(),
            column: split.statement.start,
        })?;

        program_memory::check_bounds(lc_before, result.bytes.len() as u32).map_err(|error| {
            Diagnostic { error, line_no, raw_line: raw_line.clone(), column: split.statement.start }
        })?;

        if pass == Pass::Two {
            for (offset, &byte) in result.bytes.iter().enumerate() {
                session.memory.write(lc_before + offset as u32, byte);
            }
            if let Some(rows) = rows.as_deref_mut() {
                rows.push(ListingRow {
                    line_no,
                    lc: lc_before,
                    bytes: result.bytes.clone(),
                    label: split.label_text().map(str::to_owned),
                    mnemonic: result.mnemonic.clone(),
                    operand: result.operand.clone(),
                    comment: split.comment.clone().map(|r| split.text[r].to_owned()),
                });
            }
        }

        session.lc += result.bytes.len() as u32;

        if result.ends_assembly {
            return Ok(session.lc);
        }
    }

    Ok(session.lc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_owned).collect()
    }

    #[test]
    fn empty_program_yields_empty_binary() {
        let assembled = assemble("test.asm", &lines("END\n"), ListingOption::List, SymbolOption::Sym).unwrap();
        assert_eq!(assembled.binary, Vec::<u8>::new());
    }

    #[test]
    fn simple_constant() {
        let source = lines("ORG $100\nBYTE $AA, $55\nEND\n");
        let assembled = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(assembled.binary, vec![0xAA, 0x55]);
    }

    #[test]
    fn forward_reference_resolves() {
        let source = lines(" JMP TARGET\n BYTE 0\nTARGET: CLC\n END\n");
        let assembled = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(assembled.binary, vec![0x16, 0x04, 0x00, 0x00, 0x0B]);
    }

    #[test]
    fn equ_and_arithmetic() {
        let source = lines("FOO EQU $10+2*3\n ORG FOO\n BYTE FOO\n END\n");
        let assembled = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(assembled.binary, vec![0x16]);
    }

    #[test]
    fn direct_page_indirect_vs_grouped_expression() {
        let a = assemble("test.asm", &lines("LDA (1+2)\nEND\n"), ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(a.binary, vec![0x0E, 0x03, 0x00]);

        let b = assemble("test.asm", &lines("LDA (5)\nEND\n"), ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(b.binary, vec![0x1E, 0x05, 0x00]);
    }

    #[test]
    fn listing_symbol_appendix_lists_labels() {
        let source = lines("FOO: CLC\nEND\n");
        let assembled = assemble("test.asm", &source, ListingOption::List, SymbolOption::Sym).unwrap();
        let listing = assembled.listing.unwrap();
        assert!(listing.contains("FOO"));
        assert!(listing.contains("00000000"));
    }

    #[test]
    fn org_past_ffff_with_one_byte_is_accepted() {
        let source = lines("ORG $FFFF\nCLC\nEND\n");
        let assembled = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap();
        assert_eq!(assembled.binary, vec![0x0B]);
    }

    #[test]
    fn org_past_ffff_with_two_byte_instruction_exceeds_memory() {
        let source = lines("ORG $FFFF\nLDA #1\nEND\n");
        let error = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap_err();
        assert_eq!(error.error, AssembleError::ExceededProgramMemory);
    }

    #[test]
    fn unknown_symbol_on_pass_two_is_reported() {
        let source = lines("LDA MISSING\nEND\n");
        let error = assemble("test.asm", &source, ListingOption::NoList, SymbolOption::NoSym).unwrap_err();
        assert_eq!(error.error, AssembleError::UnknownSymbol("MISSING".to_owned()));
    }
}
