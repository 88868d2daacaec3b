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

//! Assembler for the nanocore CPU: a two-pass, line-oriented assembler that
//! turns nanocore source into a flat binary image and an optional listing.

pub mod assembler;
pub mod cli;
pub mod error;
pub mod lang;
pub mod listing;
pub mod mem;
pub mod message;
pub mod session;

/// The name of the assembler, used as the diagnostic context.
pub const PROGRAM_NAME: &str = "nanocore-as";
