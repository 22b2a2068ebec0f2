use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// One run of a [`NaturalKey`]. Text runs are stored lowercased; number runs
/// keep their digits with leading zeros stripped so any length compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Number(String),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            (Token::Number(a), Token::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Token::Text(_), Token::Number(_)) => Ordering::Less,
            (Token::Number(_), Token::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Alternating text/number runs of a name, always starting with a (possibly
/// empty) text run so keys of different names line up position by position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Token>);

impl NaturalKey {
    pub fn new(name: &str) -> Self {
        if name.is_empty() {
            return NaturalKey(Vec::new());
        }

        let mut tokens = Vec::new();
        let mut last = 0;
        for m in DIGIT_RUN.find_iter(name) {
            tokens.push(Token::Text(name[last..m.start()].to_lowercase()));
            let digits = m.as_str().trim_start_matches('0');
            tokens.push(Token::Number(digits.to_string()));
            last = m.end();
        }
        tokens.push(Token::Text(name[last..].to_lowercase()));
        NaturalKey(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// Natural order, with the raw name as a tie-break so equal-ranked names
/// like `B.png` and `b.png` always come out in the same order.
pub fn stable_natural_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b).then_with(|| a.cmp(b))
}

pub fn sort_naturally(names: &mut [String]) {
    names.sort_by_cached_key(|name| (NaturalKey::new(name), name.clone()));
}
