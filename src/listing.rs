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

//! Listing Formatter: fixed-column listing rows, header, and the
//! symbol-table appendix.

use std::time::SystemTime;

use crate::mem::symbol_table::SymbolTable;

const TITLE:   &str = "NANOCORE ASSEMBLER";
const VERSION: &str = "VERSION 1.0.0";
const WIDTH:   usize = 80;
const CRLF:    &str = "\r\n";

/// One pass-two emitted statement, in the textual fields the listing needs.
/// `bytes` beyond the first 3 spill onto continuation rows.
pub struct ListingRow {
    pub line_no:  u32,
    pub lc:       u32,
    pub bytes:    Vec<u8>,
    pub label:    Option<String>,
    pub mnemonic: String,
    pub operand:  String,
    pub comment:  Option<String>,
}

/// Renders the full listing text: header, one or more rows per statement,
/// and (if `symbols` is given) the symbol-table appendix.
pub fn render(
    source_path: &str,
    rows: &[ListingRow],
    symbols: Option<&SymbolTable>,
    largest_symbol_length: usize,
    largest_operand_length: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&header(source_path));

    for row in rows {
        out.push_str(&format_row(row, largest_symbol_length, largest_operand_length));
    }

    if let Some(symbols) = symbols {
        if !symbols.is_empty() {
            out.push_str(&appendix(symbols, largest_symbol_length));
        }
    }

    out
}

fn header(source_path: &str) -> String {
    let mut out = String::new();

    out.push_str(&center(TITLE));
    out.push_str(CRLF);

    out.push_str(&format!("{}  {}  {}", source_path, VERSION, now_local()));
    out.push_str(CRLF);

    out.push_str(&format!("{:<7}{:<6}{:<10}SOURCE", "LINE", "LC", "CODE"));
    out.push_str(CRLF);
    out.push_str(&format!("{:<7}{:<6}{:<10}{}", "----", "--", "----", "------"));
    out.push_str(CRLF);

    out.push_str(&"-".repeat(WIDTH));
    out.push_str(CRLF);

    out
}

fn center(text: &str) -> String {
    if text.len() >= WIDTH {
        return text.to_owned();
    }
    let left = (WIDTH - text.len()) / 2;
    format!("{:left$}{}", "", text, left = left)
}

fn format_row(row: &ListingRow, largest_symbol: usize, largest_operand: usize) -> String {
    let mut out = String::new();
    let mut chunks = row.bytes.chunks(3);

    let first = chunks.next().unwrap_or(&[]);
    out.push_str(&format!(
        "{:05}  {:04X}  {:<10}{}",
        row.line_no,
        row.lc,
        object_code(first),
        reconstructed_source(row, largest_symbol, largest_operand),
    ));
    out.push_str(CRLF);

    for chunk in chunks {
        out.push_str(&format!("{:05}  {:04X}  {:<10}", row.line_no, row.lc, object_code(chunk)));
        out.push_str(CRLF);
    }

    out
}

fn object_code(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}

fn reconstructed_source(row: &ListingRow, largest_symbol: usize, largest_operand: usize) -> String {
    let symbol_width = largest_symbol + 2;
    let symbol_field = row.label.clone().unwrap_or_default();

    let comment_field = row.comment.as_deref()
        .map(|c| format!("; {}", c))
        .unwrap_or_default();

    format!(
        "{:<sw$}{:<5}{:<ow$}{}",
        symbol_field, row.mnemonic, row.operand, comment_field,
        sw = symbol_width, ow = largest_operand,
    )
}

fn appendix(symbols: &SymbolTable, largest_symbol: usize) -> String {
    let width = largest_symbol.max(6) + 2;
    let mut out = String::new();

    out.push_str(CRLF);
    out.push_str(&format!("{:<w$}VALUE", "SYMBOL", w = width));
    out.push_str(CRLF);

    symbols.walk_in_order(|name, value| {
        out.push_str(&format!("{:<w$}{:08X}", name, value, w = width));
        out.push_str(CRLF);
    });

    out
}

/// A minimal civil-calendar formatter so the listing header can show a
/// date-time without pulling in a timezone-aware crate the teacher's stack
/// doesn't carry. Renders in UTC rather than true local time.
fn now_local() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let days = (secs / 86_400) as i64;
    let time_of_day = secs % 86_400;
    let (hour, minute, second) = (time_of_day / 3600, (time_of_day % 3600) / 60, time_of_day % 60);

    let (year, month, day) = civil_from_days(days);

    format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", year, month, day, hour, minute, second)
}

/// Howard Hinnant's `civil_from_days`: days-since-epoch to (year, month, day).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn object_code_formats_hex_pairs() {
        assert_eq!(object_code(&[0xAA, 0x55]), "AA 55");
        assert_eq!(object_code(&[]), "");
    }

    #[test]
    fn row_with_more_than_three_bytes_continues() {
        let row = ListingRow {
            line_no: 1, lc: 0x100,
            bytes: vec![1, 2, 3, 4, 5],
            label: None, mnemonic: "BYTE".to_owned(), operand: "1,2,3,4,5".to_owned(),
            comment: None,
        };
        let text = format_row(&row, 0, 10);
        assert_eq!(text.matches(CRLF).count(), 2);
    }

    #[test]
    fn appendix_lists_symbols_in_order() {
        let mut symbols = SymbolTable::new();
        symbols.insert("FOO", 0).unwrap();
        let text = appendix(&symbols, symbols.largest_symbol_length());
        assert!(text.contains("FOO"));
        assert!(text.contains("00000000"));
    }
}
