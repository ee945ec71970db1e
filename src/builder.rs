//! Folds the flat token stream into a [`Value`] tree.
//!
//! One forward pass keeps a stack of pending opener positions in the token
//! arena. When a closer arrives, everything after its opener is collapsed
//! into a single [`TokenKind::Composite`] token holding the finished value,
//! so the innermost pair is always resolved first. Structural problems are
//! recorded and skipped; the builder never gives up on a document.

use crate::error::{ParseError, Source};
use crate::lexer::{NumberClass, Token, TokenKind};
use crate::options::{DuplicateKeys, DEFAULT_MAX_DEPTH, DEFAULT_SOURCE_NAME};
use crate::value::Value;
use log::debug;
use miette::NamedSource;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Array,
    Object,
}

impl Family {
    fn of_bracket(kind: &TokenKind) -> Option<Family> {
        match kind {
            TokenKind::ArrayOpen | TokenKind::ArrayClose => Some(Family::Array),
            TokenKind::ObjectOpen | TokenKind::ObjectClose => Some(Family::Object),
            _ => None,
        }
    }

    fn opener(self) -> char {
        match self {
            Family::Array => '[',
            Family::Object => '{',
        }
    }

    fn closer(self) -> char {
        match self {
            Family::Array => ']',
            Family::Object => '}',
        }
    }
}

pub struct Builder<'src> {
    input: &'src str,
    source: Source,
    duplicate_keys: DuplicateKeys,
    max_depth: usize,
    errors: Vec<ParseError>,
}

impl<'src> Builder<'src> {
    pub fn new(input: &'src str) -> Self {
        let source = NamedSource::new(DEFAULT_SOURCE_NAME, Arc::from(input));
        Self::with_source(input, source)
    }

    pub fn with_source(input: &'src str, source: Source) -> Self {
        Self {
            input,
            source,
            duplicate_keys: DuplicateKeys::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the tree. The returned value is the best partial result; the
    /// error list is empty only for a well-formed document.
    pub fn build(mut self, tokens: Vec<Token<'src>>) -> (Value, Vec<ParseError>) {
        let mut arena: Vec<Token<'src>> = Vec::with_capacity(tokens.len());
        let mut openers: Vec<usize> = Vec::new();
        // Families of openers dropped for exceeding `max_depth`, innermost last.
        let mut too_deep: Vec<Family> = Vec::new();

        for token in tokens {
            let opening = matches!(token.kind, TokenKind::ArrayOpen | TokenKind::ObjectOpen);
            match (opening, Family::of_bracket(&token.kind)) {
                (true, Some(family)) if openers.len() >= self.max_depth => {
                    if too_deep.is_empty() {
                        self.errors.push(ParseError::NestingTooDeep {
                            src: self.source.clone(),
                            span: (token.pos_start, token.pos_end - token.pos_start).into(),
                            max_depth: self.max_depth,
                        });
                    }
                    too_deep.push(family);
                }
                (true, Some(_)) => {
                    openers.push(arena.len());
                    arena.push(token);
                }
                (false, Some(family)) => {
                    if too_deep.last() == Some(&family) {
                        too_deep.pop();
                        continue;
                    }
                    // A mismatched closer ends the over-deep region.
                    too_deep.clear();
                    self.close(&mut arena, &mut openers, token, family);
                }
                _ => arena.push(token),
            }
        }

        for &idx in openers.iter().rev() {
            let opener = &arena[idx];
            let reason = format!("`{}` is never closed", opener.raw);
            let span = (opener.pos_start, opener.pos_end - opener.pos_start);
            self.mismatched(span, reason);
        }
        remove_sorted(&mut arena, &openers);

        let root = self.take_root(arena);
        (root, self.errors)
    }

    fn close(
        &mut self,
        arena: &mut Vec<Token<'src>>,
        openers: &mut Vec<usize>,
        closer: Token<'src>,
        family: Family,
    ) {
        let depth = openers
            .iter()
            .rposition(|&idx| Family::of_bracket(&arena[idx].kind) == Some(family));
        let Some(depth) = depth else {
            let reason = format!("`{}` has no matching `{}`", family.closer(), family.opener());
            self.mismatched((closer.pos_start, closer.pos_end - closer.pos_start), reason);
            return;
        };

        // Openers of the other family inside this span can never be closed now.
        let abandoned = openers.split_off(depth + 1);
        for &idx in abandoned.iter().rev() {
            let opener = &arena[idx];
            let reason = format!(
                "`{}` is cut off by the `{}` at offset {}",
                opener.raw,
                family.closer(),
                closer.pos_start
            );
            let span = (opener.pos_start, opener.pos_end - opener.pos_start);
            self.mismatched(span, reason);
        }

        let Some(open_idx) = openers.pop() else {
            return;
        };
        let mut children = arena.split_off(open_idx + 1);
        let Some(opener) = arena.pop() else {
            return;
        };
        let offset = open_idx + 1;
        let abandoned: Vec<usize> = abandoned.into_iter().map(|idx| idx - offset).collect();
        remove_sorted(&mut children, &abandoned);

        let value = match family {
            Family::Array => self.array(children),
            Family::Object => self.object(children),
        };
        debug!(
            "materialized {:?} at {}..{}",
            value.kind(),
            opener.pos_start,
            closer.pos_end
        );
        let input = self.input;
        arena.push(Token::new(
            TokenKind::Composite(value),
            &input[opener.pos_start..closer.pos_end],
            opener.pos_start,
            closer.pos_end,
        ));
    }

    fn array(&mut self, children: Vec<Token<'src>>) -> Value {
        let mut items = Vec::with_capacity(children.len() / 2 + 1);
        for token in children {
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::Colon => self.errors.push(ParseError::StrayToken {
                    src: self.source.clone(),
                    span: (token.pos_start, token.pos_end - token.pos_start).into(),
                    token: token.raw.to_string(),
                }),
                _ => items.extend(self.value_of(token)),
            }
        }
        Value::Array(items)
    }

    fn object(&mut self, children: Vec<Token<'src>>) -> Value {
        let mut map = BTreeMap::new();
        let mut members = children
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::Comma | TokenKind::Colon));

        while let Some(key_token) = members.next() {
            let span = (key_token.pos_start, key_token.pos_end - key_token.pos_start);
            let TokenKind::String(key) = key_token.kind else {
                self.errors.push(ParseError::InvalidKey {
                    src: self.source.clone(),
                    span: span.into(),
                });
                members.next();
                continue;
            };

            let Some(value_token) = members.next() else {
                self.errors.push(ParseError::MissingValue {
                    src: self.source.clone(),
                    span: span.into(),
                    key,
                });
                break;
            };
            let Some(value) = self.value_of(value_token) else {
                continue;
            };

            match (map.entry(key), self.duplicate_keys) {
                (Entry::Vacant(slot), _) => {
                    slot.insert(value);
                }
                (Entry::Occupied(mut slot), DuplicateKeys::Overwrite) => {
                    slot.insert(value);
                }
                (Entry::Occupied(slot), DuplicateKeys::Reject) => {
                    self.errors.push(ParseError::KeyCollision {
                        src: self.source.clone(),
                        span: span.into(),
                        key: slot.key().clone(),
                    });
                }
            }
        }
        Value::Object(map)
    }

    /// Converts a value-bearing token. Separators and brackets yield `None`.
    fn value_of(&mut self, token: Token<'src>) -> Option<Value> {
        let value = match token.kind {
            TokenKind::String(s) => Value::String(s),
            TokenKind::Number(class) => self.number(class, &token),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Null | TokenKind::Unknown => Value::Null,
            TokenKind::Composite(value) => value,
            TokenKind::ObjectOpen
            | TokenKind::ObjectClose
            | TokenKind::ArrayOpen
            | TokenKind::ArrayClose
            | TokenKind::Comma
            | TokenKind::Colon => return None,
        };
        Some(value)
    }

    fn number(&mut self, class: NumberClass, token: &Token<'src>) -> Value {
        let raw = token.raw;
        if class == NumberClass::Int {
            if let Ok(value) = raw.parse::<i64>() {
                return Value::Int {
                    value,
                    raw: Some(raw.to_string()),
                };
            }
        }
        // Integers too large for i64 land here as well.
        match raw.parse::<f64>() {
            Ok(value) => Value::Float {
                value,
                raw: Some(raw.to_string()),
            },
            Err(_) => {
                self.errors.push(ParseError::MalformedNumber {
                    src: self.source.clone(),
                    span: (token.pos_start, token.pos_end - token.pos_start).into(),
                    text: raw.to_string(),
                });
                Value::Null
            }
        }
    }

    fn take_root(&mut self, arena: Vec<Token<'src>>) -> Value {
        let mut root = None;
        let mut leftover: Option<(usize, usize)> = None;

        for token in arena {
            let (start, end) = (token.pos_start, token.pos_end);
            if root.is_none() && token.kind.is_value() {
                root = self.value_of(token);
            } else {
                leftover = Some(leftover.map_or((start, end), |(first, _)| (first, end)));
            }
        }

        match (root, leftover) {
            (Some(root), None) => root,
            (Some(root), Some((start, end))) => {
                self.errors.push(ParseError::TrailingOrMissingRoot {
                    src: self.source.clone(),
                    span: (start, end - start).into(),
                    reason: "Unexpected content after the root value".to_string(),
                });
                root
            }
            (None, leftover) => {
                let (start, end) = leftover.unwrap_or((0, self.input.len()));
                self.errors.push(ParseError::TrailingOrMissingRoot {
                    src: self.source.clone(),
                    span: (start, end - start).into(),
                    reason: "No value found".to_string(),
                });
                Value::Null
            }
        }
    }

    fn mismatched(&mut self, span: (usize, usize), reason: String) {
        self.errors.push(ParseError::MismatchedBrackets {
            src: self.source.clone(),
            span: span.into(),
            reason,
        });
    }
}

/// Removes the elements at `indices` (ascending) from `tokens` in one pass.
fn remove_sorted<T>(tokens: &mut Vec<T>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let mut doomed = indices.iter().copied().peekable();
    let mut position = 0;
    tokens.retain(|_| {
        let keep = doomed.peek() != Some(&position);
        if !keep {
            doomed.next();
        }
        position += 1;
        keep
    });
}

/// Builds a tree from tokens produced by [`tokenize`](crate::lexer::tokenize) on `input`.
pub fn build<'src>(input: &'src str, tokens: Vec<Token<'src>>) -> (Value, Vec<ParseError>) {
    Builder::new(input).build(tokens)
}
