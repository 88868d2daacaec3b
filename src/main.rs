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

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use nanocore_as::{assembler, cli::Args, message, PROGRAM_NAME};

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.file) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("{}: error: {}: {}", PROGRAM_NAME, args.file, error);
            return ExitCode::FAILURE;
        }
    };

    let lines: Vec<String> = source.lines().map(str::to_owned).collect();

    let result = assembler::assemble(
        &args.file,
        &lines,
        args.listing.into(),
        args.symbols.into(),
    );

    let assembled = match result {
        Ok(assembled) => assembled,
        Err(diagnostic) => {
            println!(
                "{}",
                message::render_caret_diagnostic(
                    PROGRAM_NAME,
                    &diagnostic.error,
                    diagnostic.line_no,
                    &diagnostic.raw_line,
                    diagnostic.column,
                )
            );
            return ExitCode::FAILURE;
        }
    };

    let stem = args.file.rsplit_once('.').map_or(args.file.as_str(), |(stem, _)| stem);

    if let Err(error) = fs::write(format!("{}.bin", stem), &assembled.binary) {
        eprintln!("{}: error: writing binary: {}", PROGRAM_NAME, error);
        return ExitCode::FAILURE;
    }

    if let Some(listing) = &assembled.listing {
        if let Err(error) = fs::write(format!("{}.lst", stem), listing) {
            eprintln!("{}: error: writing listing: {}", PROGRAM_NAME, error);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
