// src/frontend/intern.rs
//! Symbol interning. Identifiers are deduplicated at the parser boundary
//! and flow through resolution as cheap `Symbol` handles; scope maps and
//! call binding compare handles, never strings.

use crate::frontend::ast::Symbol;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct Interner {
    symbols: FxHashMap<String, Symbol>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the existing handle when the string is
    /// already known.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.symbols.insert(name.to_owned(), sym);
        sym
    }

    /// The string a handle was created from.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }
}
