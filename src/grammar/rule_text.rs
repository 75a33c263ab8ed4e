//! Production text such as `list : item (Comma item)*`.
//!
//! ```text
//! production := NAME ':' item*
//! item       := atom ('*' | '+' | '?')?
//! atom       := NAME | NAME ':' '(' item* ')' | '(' item* ')' | '[' item* ('|' item*)* ']'
//! ```
//!
//! A name that parses as a token kind is a terminal, anything else refers to a rule. Square
//! brackets hold a choice, parentheses a nested sequence, and `label:( .. )` a labelled group.
//! An empty right-hand side matches nothing.

use std::str::FromStr;
use regex::Regex;
use crate::grammar::clause::Clause;
use crate::token::TokenKind;

lazy_static::lazy_static! {
    static ref SYMBOL: Regex = Regex::new(r"\s*(?:([A-Za-z_][A-Za-z0-9_]*)|(\S))").unwrap();
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Symbol<'t> {
    Name(&'t str),
    Punct(char)
}

struct Reader<'t> {
    symbols: Vec<(Symbol<'t>, usize)>,
    at: usize,
    len: usize
}

impl<'t> Reader<'t> {
    fn new(text: &'t str) -> Reader<'t> {
        let mut symbols = vec![];
        for captures in SYMBOL.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                symbols.push((Symbol::Name(name.as_str()), name.start()));
            } else if let Some(punct) = captures.get(2) {
                if let Some(c) = punct.as_str().chars().next() {
                    symbols.push((Symbol::Punct(c), punct.start()));
                }
            }
        }
        Reader { symbols, at: 0, len: text.len() }
    }

    fn peek(&self) -> Option<Symbol<'t>> {
        self.symbols.get(self.at).map(|(s, _)| *s)
    }

    fn peek_second(&self) -> Option<Symbol<'t>> {
        self.symbols.get(self.at + 1).map(|(s, _)| *s)
    }

    fn offset(&self) -> usize {
        self.symbols.get(self.at).map(|(_, o)| *o).unwrap_or(self.len)
    }

    fn bump(&mut self) -> Option<Symbol<'t>> {
        let symbol = self.peek();
        self.at += 1;
        symbol
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        match self.peek() {
            Some(Symbol::Punct(p)) if p == c => {
                self.at += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&format!("`{}`", c)))
        }
    }

    fn unexpected(&self, wanted: &str) -> String {
        match self.peek() {
            Some(Symbol::Name(name)) => format!("expected {} but found `{}` at offset {}", wanted, name, self.offset()),
            Some(Symbol::Punct(c)) => format!("expected {} but found `{}` at offset {}", wanted, c, self.offset()),
            None => format!("expected {} but the text ended", wanted)
        }
    }
}

/// Parses one production into its rule name and right-hand side.
pub(crate) fn parse_production<K: TokenKind + FromStr>(text: &str) -> Result<(String, Vec<Clause<K>>), String> {
    let mut reader = Reader::new(text);
    let name = match reader.bump() {
        Some(Symbol::Name(name)) if name.parse::<K>().is_err() => name.to_string(),
        Some(Symbol::Name(name)) => return Err(format!("`{}` is a token kind and cannot name a rule", name)),
        _ => {
            reader.at = 0;
            return Err(reader.unexpected("a rule name"));
        }
    };
    reader.expect(':')?;
    let clauses = sequence(&mut reader)?;
    match reader.peek() {
        None => Ok((name, clauses)),
        Some(_) => Err(reader.unexpected("a name, `(` or `[`"))
    }
}

fn sequence<K: TokenKind + FromStr>(reader: &mut Reader) -> Result<Vec<Clause<K>>, String> {
    let mut items = vec![];
    loop {
        match reader.peek() {
            Some(Symbol::Name(_)) | Some(Symbol::Punct('(')) | Some(Symbol::Punct('[')) => {
                items.push(item(reader)?);
            }
            _ => return Ok(items)
        }
    }
}

fn item<K: TokenKind + FromStr>(reader: &mut Reader) -> Result<Clause<K>, String> {
    let atom = atom(reader)?;
    Ok(match reader.peek() {
        Some(Symbol::Punct('*')) => {
            reader.bump();
            Clause::zero_or_more(atom)
        }
        Some(Symbol::Punct('+')) => {
            reader.bump();
            Clause::one_or_more(atom)
        }
        Some(Symbol::Punct('?')) => {
            reader.bump();
            Clause::option(atom)
        }
        _ => atom
    })
}

fn atom<K: TokenKind + FromStr>(reader: &mut Reader) -> Result<Clause<K>, String> {
    match reader.bump() {
        Some(Symbol::Name(label)) if reader.peek() == Some(Symbol::Punct(':')) => {
            if reader.peek_second() != Some(Symbol::Punct('(')) {
                reader.bump();
                return Err(reader.unexpected("`(` after a group label"));
            }
            reader.bump();
            reader.bump();
            let inner = sequence(reader)?;
            reader.expect(')')?;
            Ok(Clause::group(Clause::Sequence(inner), Some(label)))
        }
        Some(Symbol::Name(name)) => Ok(match name.parse::<K>() {
            Ok(kind) => Clause::Terminal(kind),
            Err(_) => Clause::non_terminal(name)
        }),
        Some(Symbol::Punct('(')) => {
            let inner = sequence(reader)?;
            reader.expect(')')?;
            Ok(Clause::Sequence(inner))
        }
        Some(Symbol::Punct('[')) => {
            let mut alternatives = vec![single(sequence(reader)?)];
            while reader.peek() == Some(Symbol::Punct('|')) {
                reader.bump();
                alternatives.push(single(sequence(reader)?));
            }
            reader.expect(']')?;
            Ok(Clause::Choice(alternatives))
        }
        _ => {
            reader.at -= 1;
            Err(reader.unexpected("a name, `(` or `[`"))
        }
    }
}

fn single<K>(mut clauses: Vec<Clause<K>>) -> Clause<K> {
    if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        Clause::Sequence(clauses)
    }
}
