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

//! Diagnostic messages: severity and caret rendering.

use std::fmt::{self, Display, Formatter};
use colored::Colorize;

use crate::error::AssembleError;

/// Message severity levels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages.
    Normal,

    /// For problems that prevent complete assembly. Assembly terminates and
    /// the assembler produces no binary or listing output.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal => "",
            Severity::Error  => "error: ",
        })
    }
}

/// Renders a caret-pointer diagnostic exactly as spec'd:
///
/// ```text
/// Line N:
/// <raw line>
/// <spaces>^
/// ```
///
/// preceded by the function context and colored error message.
pub fn render_caret_diagnostic(
    context:  &str,
    error:    &AssembleError,
    line_no:  u32,
    raw_line: &str,
    column:   usize,
) -> String {
    let caret_line: String = " ".repeat(column) + "^";

    format!(
        "{ctx}: {sev}{err}\nLine {n}:\n{raw}\n{caret}",
        ctx   = context,
        sev   = Severity::Error.to_string().red(),
        err   = error.to_string().red(),
        n     = line_no,
        raw   = raw_line,
        caret = caret_line,
    )
}
