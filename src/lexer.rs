use crate::error::{ParseError, Source};
use crate::options::DEFAULT_SOURCE_NAME;
use crate::value::Value;
use log::trace;
use miette::NamedSource;
use std::sync::Arc;

/// Whether a number token reads as an integer or a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    /// No `.` and no exponent.
    Int,
    Float,
}

/// Represents the different kinds of tokens that the lexer can produce.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    // == Literals ==
    /// A string literal. The associated `String` holds the content with every
    /// escape sequence resolved and without the surrounding quotes.
    String(String),
    /// A run of sign, digit, decimal-point and exponent characters.
    /// The text itself is kept in [`Token::raw`].
    Number(NumberClass),
    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// The `null` literal.
    Null,

    // == Punctuation ==
    /// Left Brace: `{`
    ObjectOpen,
    /// Right Brace: `}`
    ObjectClose,
    /// Left Bracket: `[`
    ArrayOpen,
    /// Right Bracket: `]`
    ArrayClose,
    /// Comma: `,`
    Comma,
    /// Colon: `:`
    Colon,

    // == Produced while building ==
    /// A fully resolved array or object span. Never produced by the lexer.
    Composite(Value),

    /// A bare word or character that is not part of JSON. Already reported as
    /// `UnknownAtom`; the builder treats it as `null`.
    Unknown,
}

impl TokenKind {
    /// True for tokens that stand for a value rather than for structure.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Composite(_)
                | TokenKind::Unknown
        )
    }
}

/// A token with its kind, the exact source text it covers, and its byte range.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub raw: &'src str,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, raw: &'src str, pos_start: usize, pos_end: usize) -> Token<'src> {
        Token {
            kind,
            raw,
            pos_start,
            pos_end,
        }
    }
}

/// Where the scan loop currently is. Each variant remembers the byte offset at
/// which the pending token started.
#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    InString { start: usize, backslashes: usize },
    InNumber { start: usize, last: char },
    InAtom { start: usize },
}

const NUMBER_CHARS: &str = "+-.0123456789";

/// Single forward pass over the source. Every character is looked at exactly once.
pub struct Lexer<'src> {
    input: &'src str,
    source: Source,
    tokens: Vec<Token<'src>>,
    errors: Vec<ParseError>,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self::new_with_name(input, DEFAULT_SOURCE_NAME)
    }

    pub fn new_with_name(input: &'src str, name: &str) -> Self {
        Self::with_source(input, NamedSource::new(name, Arc::from(input)))
    }

    /// Uses an already shared copy of `input` for diagnostics.
    pub fn with_source(input: &'src str, source: Source) -> Self {
        Self {
            input,
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scans the whole input. Lexing never stops early: problems are
    /// collected and returned next to every token that could be produced.
    pub fn lex(mut self) -> (Vec<Token<'src>>, Vec<ParseError>) {
        let mut state = State::Idle;
        for (pos, c) in self.input.char_indices() {
            state = self.step(state, pos, c);
        }
        self.finish(state);
        (self.tokens, self.errors)
    }

    fn step(&mut self, state: State, pos: usize, c: char) -> State {
        match state {
            State::InString { start, backslashes } => {
                if c == '"' && backslashes % 2 == 0 {
                    self.emit_string(start, pos + 1, true);
                    State::Idle
                } else if c == '\\' {
                    State::InString {
                        start,
                        backslashes: backslashes + 1,
                    }
                } else {
                    State::InString {
                        start,
                        backslashes: 0,
                    }
                }
            }
            State::InNumber { start, last } => {
                if NUMBER_CHARS.contains(c) || (matches!(c, 'e' | 'E') && last.is_ascii_digit()) {
                    State::InNumber { start, last: c }
                } else {
                    self.emit_number(start, pos);
                    self.step(State::Idle, pos, c)
                }
            }
            State::InAtom { start } => {
                if c.is_ascii_alphabetic() {
                    state
                } else {
                    self.emit_atom(start, pos);
                    self.step(State::Idle, pos, c)
                }
            }
            State::Idle => match c {
                '"' => State::InString {
                    start: pos,
                    backslashes: 0,
                },
                '{' => self.single(TokenKind::ObjectOpen, pos),
                '}' => self.single(TokenKind::ObjectClose, pos),
                '[' => self.single(TokenKind::ArrayOpen, pos),
                ']' => self.single(TokenKind::ArrayClose, pos),
                ',' => self.single(TokenKind::Comma, pos),
                ':' => self.single(TokenKind::Colon, pos),
                ' ' | '\t' | '\n' | '\r' => State::Idle,
                c if NUMBER_CHARS.contains(c) => State::InNumber { start: pos, last: c },
                c if c.is_ascii_alphabetic() => State::InAtom { start: pos },
                c => {
                    let end = pos + c.len_utf8();
                    self.unknown(pos, end);
                    State::Idle
                }
            },
        }
    }

    fn finish(&mut self, state: State) {
        let end = self.input.len();
        match state {
            State::Idle => {}
            State::InNumber { start, .. } => self.emit_number(start, end),
            State::InAtom { start } => self.emit_atom(start, end),
            State::InString { start, .. } => {
                self.errors.push(ParseError::UnterminatedString {
                    src: self.source.clone(),
                    span: (start, end - start).into(),
                });
                self.emit_string(start, end, false);
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let input = self.input;
        let token = Token::new(kind, &input[start..end], start, end);
        trace!("token {:?} at {start}..{end}", token.kind);
        self.tokens.push(token);
    }

    fn single(&mut self, kind: TokenKind, pos: usize) -> State {
        self.push(kind, pos, pos + 1);
        State::Idle
    }

    /// `end` is exclusive. A closed string's span ends with its closing quote;
    /// an unterminated one runs to the end of the input.
    fn emit_string(&mut self, start: usize, end: usize, closed: bool) {
        let body_end = if closed { end - 1 } else { end };
        let value = unescape(&self.input[start + 1..body_end]);
        self.push(TokenKind::String(value), start, end);
    }

    fn emit_number(&mut self, start: usize, end: usize) {
        let raw = &self.input[start..end];
        let class = if raw.contains(['.', 'e', 'E']) {
            NumberClass::Float
        } else {
            NumberClass::Int
        };
        self.push(TokenKind::Number(class), start, end);
    }

    fn emit_atom(&mut self, start: usize, end: usize) {
        let input = self.input;
        let kind = match &input[start..end] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => {
                self.unknown(start, end);
                return;
            }
        };
        self.push(kind, start, end);
    }

    fn unknown(&mut self, start: usize, end: usize) {
        self.errors.push(ParseError::UnknownAtom {
            src: self.source.clone(),
            span: (start, end - start).into(),
            atom: self.input[start..end].to_string(),
        });
        self.push(TokenKind::Unknown, start, end);
    }
}

/// Tokenizes `input`, returning every token together with every lexical error.
pub fn tokenize(input: &str) -> (Vec<Token<'_>>, Vec<ParseError>) {
    Lexer::new(input).lex()
}

/// Resolves escape sequences in the text between a string's quotes.
/// Unknown escapes and malformed `\u` sequences are kept as written.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let consumed = match after.chars().next() {
            Some('"') => {
                out.push('"');
                1
            }
            Some('\\') => {
                out.push('\\');
                1
            }
            Some('/') => {
                out.push('/');
                1
            }
            Some('b') => {
                out.push('\u{8}');
                1
            }
            Some('f') => {
                out.push('\u{c}');
                1
            }
            Some('n') => {
                out.push('\n');
                1
            }
            Some('r') => {
                out.push('\r');
                1
            }
            Some('t') => {
                out.push('\t');
                1
            }
            Some('u') => match decode_unicode(&after[1..]) {
                Some((c, used)) => {
                    out.push(c);
                    1 + used
                }
                None => {
                    out.push_str("\\u");
                    1
                }
            },
            Some(other) => {
                out.push('\\');
                out.push(other);
                other.len_utf8()
            }
            None => {
                out.push('\\');
                0
            }
        };
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

/// Decodes the hex digits after `\u`, combining a surrogate pair when one
/// follows. Returns the character and how many bytes of `s` were used.
fn decode_unicode(s: &str) -> Option<(char, usize)> {
    let first = hex4(s)?;
    match first {
        0xD800..=0xDBFF => {
            let low = s
                .get(4..)
                .and_then(|t| t.strip_prefix("\\u"))
                .and_then(hex4)
                .filter(|low| (0xDC00..=0xDFFF).contains(low));
            match low {
                Some(low) => {
                    let code = 0x10000 + ((u32::from(first) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    Some((char::from_u32(code)?, 10))
                }
                None => Some((char::REPLACEMENT_CHARACTER, 4)),
            }
        }
        0xDC00..=0xDFFF => Some((char::REPLACEMENT_CHARACTER, 4)),
        _ => Some((char::from_u32(u32::from(first))?, 4)),
    }
}

fn hex4(s: &str) -> Option<u16> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}
