//! SSML to plain text conversion for display cards
//!
//! A single-pass scanner that keeps character data and drops everything
//! inside tags. It never fails: malformed or unterminated markup is handled
//! best-effort.

use std::str::Chars;

/// Longest character reference name we try to decode (`#x10FFFF`)
const MAX_ENTITY_LEN: usize = 8;

/// Scanner position relative to markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Character data, emitted
    Text,
    /// Inside `<...>`, optionally inside a quoted attribute value
    Tag { quote: Option<char> },
}

struct Scanner<'a> {
    rest: Chars<'a>,
    state: ScanState,
    out: String,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input.chars(),
            state: ScanState::Text,
            out: String::with_capacity(input.len()),
        }
    }

    fn run(mut self) -> String {
        while let Some(c) = self.rest.next() {
            match self.state {
                ScanState::Text => self.text(c),
                ScanState::Tag { quote } => self.tag(c, quote),
            }
        }
        // An unterminated tag at the end is dropped
        self.out
    }

    fn text(&mut self, c: char) {
        match c {
            '<' if self.opens_markup() => {
                if self.rest.as_str().starts_with("!--") {
                    self.skip_comment();
                } else {
                    self.state = ScanState::Tag { quote: None };
                }
            }
            '&' => self.reference(),
            _ => self.out.push(c),
        }
    }

    fn tag(&mut self, c: char, quote: Option<char>) {
        self.state = match (quote, c) {
            (None, '>') => ScanState::Text,
            (None, '"' | '\'') => ScanState::Tag { quote: Some(c) },
            (Some(q), c) if q == c => ScanState::Tag { quote: None },
            _ => return,
        };
    }

    /// `<` only opens markup when followed by a name or markup sigil
    fn opens_markup(&self) -> bool {
        self.rest
            .clone()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    }

    fn skip_comment(&mut self) {
        let rest = self.rest.as_str();
        self.rest = match rest.split_once("-->") {
            Some((_, after)) => after.chars(),
            None => "".chars(),
        };
    }

    /// Decode a character reference after `&`, or emit `&` literally
    fn reference(&mut self) {
        let name: String = self
            .rest
            .clone()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '#')
            .take(MAX_ENTITY_LEN + 1)
            .collect();

        let terminated = self.rest.clone().nth(name.len()) == Some(';');
        if name.len() <= MAX_ENTITY_LEN && terminated {
            if let Some(decoded) = decode_reference(&name) {
                self.out.push(decoded);
                // Consume the name and the ';'
                self.rest.nth(name.len());
                return;
            }
        }
        self.out.push('&');
    }
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escape text so it is spoken literally inside SSML
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip markup from SSML, keeping character data in document order
pub fn ssml_to_text(ssml: &str) -> String {
    Scanner::new(ssml).run()
}
