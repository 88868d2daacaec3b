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

//! Command-line interface.

use clap::{Parser, ValueEnum};

use crate::session::{ListingOption, SymbolOption};

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ListingArg {
    #[value(name = "list")]
    List,
    #[value(name = "nolist")]
    NoList,
}

impl From<ListingArg> for ListingOption {
    fn from(arg: ListingArg) -> Self {
        match arg {
            ListingArg::List   => ListingOption::List,
            ListingArg::NoList => ListingOption::NoList,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum SymbolArg {
    #[value(name = "sym")]
    Sym,
    #[value(name = "nosym")]
    NoSym,
}

impl From<SymbolArg> for SymbolOption {
    fn from(arg: SymbolArg) -> Self {
        match arg {
            SymbolArg::Sym   => SymbolOption::Sym,
            SymbolArg::NoSym => SymbolOption::NoSym,
        }
    }
}

/// The string printed by `--version`, matching the listing header's own
/// version line.
pub const VERSION_STRING: &str = "VERSION 1.0.0";

/// Assembler for the nanocore CPU.
///
/// `clap`'s own `--version` handling only binds the upper-case `-V` short
/// form; spec.md §6 and `arguments.c`'s `s_aLongOptions` require lower-case
/// `-v`, so the default flag is disabled and replaced with one below.
#[derive(Parser, Debug)]
#[command(name = "nanocore-as", version = VERSION_STRING, disable_version_flag = true)]
pub struct Args {
    /// Source file to assemble.
    pub file: String,

    /// Whether to produce a listing file.
    #[arg(short, long, value_enum, default_value = "list")]
    pub listing: ListingArg,

    /// Whether to append the symbol table to the listing.
    #[arg(short, long, value_enum, default_value = "sym")]
    pub symbols: SymbolArg,

    /// Print version information and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: (),
}
