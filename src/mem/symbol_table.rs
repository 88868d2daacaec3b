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

//! Symbol table: an unbalanced binary search tree keyed on upper-cased
//! symbol names, ordered lexicographically for in-order traversal.

use crate::error::AssembleError;

struct Node {
    name:  String,
    value: u32,
    left:  Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Ordered mapping from symbol name to 32-bit value.
///
/// Keys are unique; once inserted, a symbol's value never changes. Ordering
/// is strict byte-wise lexicographic on the (already upper-cased) name, which
/// is what the listing's symbol-table appendix walks in order.
#[derive(Default)]
pub struct SymbolTable {
    root: Option<Box<Node>>,
    len:  usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of symbols currently in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `name` with `value` if absent. Returns `Err(DuplicateSymbol)`
    /// if a symbol with this name already exists; the existing value is left
    /// untouched.
    pub fn insert(&mut self, name: &str, value: u32) -> Result<(), AssembleError> {
        let inserted = Self::insert_into(&mut self.root, name, value)?;
        if inserted {
            self.len += 1;
        }
        Ok(())
    }

    fn insert_into(
        slot: &mut Option<Box<Node>>,
        name: &str,
        value: u32,
    ) -> Result<bool, AssembleError> {
        match slot {
            None => {
                *slot = Some(Box::new(Node {
                    name: name.to_owned(),
                    value,
                    left: None,
                    right: None,
                }));
                Ok(true)
            }
            Some(node) => {
                match name.cmp(node.name.as_str()) {
                    std::cmp::Ordering::Less    => Self::insert_into(&mut node.left,  name, value),
                    std::cmp::Ordering::Greater => Self::insert_into(&mut node.right, name, value),
                    std::cmp::Ordering::Equal   =>
                        Err(AssembleError::DuplicateSymbol(name.to_owned())),
                }
            }
        }
    }

    /// Looks up `name`, returning its value if present.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match name.cmp(node.name.as_str()) {
                std::cmp::Ordering::Less    => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal   => return Some(node.value),
            };
        }
        None
    }

    /// Visits every symbol in ascending name order.
    pub fn walk_in_order<F: FnMut(&str, u32)>(&self, mut visitor: F) {
        fn walk(node: &Option<Box<Node>>, visitor: &mut impl FnMut(&str, u32)) {
            if let Some(node) = node {
                walk(&node.left, visitor);
                visitor(&node.name, node.value);
                walk(&node.right, visitor);
            }
        }
        walk(&self.root, &mut visitor);
    }

    /// Length in characters of the longest symbol name in the table, used by
    /// the listing formatter to size the symbol column.
    pub fn largest_symbol_length(&self) -> usize {
        let mut max = 0;
        self.walk_in_order(|name, _| max = max.max(name.len()));
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut table = SymbolTable::new();
        table.insert("FOO", 10).unwrap();
        table.insert("BAR", 20).unwrap();

        assert_eq!(table.lookup("FOO"), Some(10));
        assert_eq!(table.lookup("BAR"), Some(20));
        assert_eq!(table.lookup("BAZ"), None);
    }

    #[test]
    fn duplicate_symbol_rejected() {
        let mut table = SymbolTable::new();
        table.insert("FOO", 10).unwrap();

        let err = table.insert("FOO", 99).unwrap_err();
        assert_eq!(err, AssembleError::DuplicateSymbol("FOO".to_owned()));
        // Original value is preserved.
        assert_eq!(table.lookup("FOO"), Some(10));
    }

    #[test]
    fn walk_in_order_is_sorted() {
        let mut table = SymbolTable::new();
        for name in ["FOO", "BAR", "ZED", "ABC", "MID"] {
            table.insert(name, 0).unwrap();
        }

        let mut seen = Vec::new();
        table.walk_in_order(|name, _| seen.push(name.to_owned()));

        assert_eq!(seen, vec!["ABC", "BAR", "FOO", "MID", "ZED"]);
    }

    #[test]
    fn largest_symbol_length() {
        let mut table = SymbolTable::new();
        table.insert("A", 0).unwrap();
        table.insert("LONGNAME", 0).unwrap();
        assert_eq!(table.largest_symbol_length(), 8);
    }

    #[test]
    fn empty_table_has_no_symbols() {
        let table = SymbolTable::new();
        assert!(table.is_empty());
        assert_eq!(table.largest_symbol_length(), 0);
    }
}
