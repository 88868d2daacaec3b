// This file is part of nanocore-as, an assembler for the nanocore CPU.
// Copyright 2022 Jeffrey Sharp
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

//! Assembly session: the context threaded through both passes.

use crate::mem::program_memory::ProgramMemory;
use crate::mem::symbol_table::SymbolTable;

/// Which sweep over the source is currently running.
///
/// Pass one builds the symbol table and sizes every statement without
/// writing memory; pass two re-walks the same source, resolves every
/// symbol strictly, and emits bytes and listing rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pass {
    One,
    Two,
}

/// Whether a listing file is produced at all.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ListingOption {
    #[default]
    List,
    NoList,
}

/// Whether the listing's symbol-table appendix is produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SymbolOption {
    #[default]
    Sym,
    NoSym,
}

/// Assembler session: owns the state that must persist across (or be reset
/// between) the two passes, and the options that shape final output.
pub struct Session {
    pub pass:    Pass,
    pub lc:      u32,
    pub symbols: SymbolTable,
    pub memory:  ProgramMemory,

    /// Widest operand text seen in pass one, used to size the listing's
    /// operand column. (The symbol column instead asks the symbol table
    /// directly, via [`SymbolTable::largest_symbol_length`].)
    pub largest_operand_length: usize,

    pub listing_option: ListingOption,
    pub symbol_option:  SymbolOption,
}

impl Session {
    pub fn new(listing_option: ListingOption, symbol_option: SymbolOption) -> Self {
        Self {
            pass: Pass::One,
            lc: 0,
            symbols: SymbolTable::new(),
            memory: ProgramMemory::new(),
            largest_operand_length: 0,
            listing_option,
            symbol_option,
        }
    }

    /// Resets per-pass state (LC, current pass) while keeping the symbol
    /// table and memory image, which accumulate across passes.
    pub fn begin_pass(&mut self, pass: Pass) {
        self.pass = pass;
        self.lc = 0;
    }

    /// Pass one tolerates forward references when sizing a statement;
    /// pass two must resolve every symbol strictly.
    pub fn tolerate_unknown(&self) -> bool {
        self.pass == Pass::One
    }

    pub fn note_operand_length(&mut self, len: usize) {
        self.largest_operand_length = self.largest_operand_length.max(len);
    }
}
