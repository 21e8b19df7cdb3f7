//! Reconstructs composition nodes from serialized save output.
//!
//! The grammar is the comment-frame form emitted by [`crate::render::save`]:
//! `<!-- bw:ns/block {json} -->inner<!-- /bw:ns/block -->`, with a
//! self-closing variant `<!-- bw:ns/block {json} /-->`. Markup between
//! frames is renderer output and carries no structure of its own, so the
//! scanner skips it; the frames alone rebuild the tree. Unknown block names
//! parse into nodes like any other — they only fail later, when validated
//! or rendered against a registry that lacks them.

use serde_json::Value;

use crate::composing::{Attrs, BlockNode};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const SELF_CLOSE: &str = "/-->";
const BLOCK_TAG: &str = "bw:";
const CLOSER_TAG: &str = "/bw:";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated comment at byte {0}")]
    UnterminatedComment(usize),
    #[error("malformed block name at byte {0}")]
    BadName(usize),
    #[error("malformed block attributes at byte {offset}")]
    BadAttrs {
        offset: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("closer {found:?} at byte {offset} does not match open block {expected:?}")]
    MismatchedCloser {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("missing closer for {name:?} opened at byte {offset}")]
    MissingCloser { name: String, offset: usize },
    #[error("closer {name:?} at byte {offset} has no matching opener")]
    StrayCloser { name: String, offset: usize },
}

/// Parse a whole serialized document into a forest of nodes.
pub fn parse_document(input: &str) -> Result<Vec<BlockNode>, ParseError> {
    let mut cursor = Cursor { input, pos: 0 };
    parse_siblings(&mut cursor, None)
}

/// Parse frames until end of input (top level) or until the closer of
/// `enclosing` is consumed.
fn parse_siblings(
    cursor: &mut Cursor<'_>,
    enclosing: Option<(&str, usize)>,
) -> Result<Vec<BlockNode>, ParseError> {
    let mut nodes = Vec::new();
    loop {
        match next_marker(cursor)? {
            Marker::End => {
                return match enclosing {
                    None => Ok(nodes),
                    Some((name, offset)) => Err(ParseError::MissingCloser {
                        name: name.to_owned(),
                        offset,
                    }),
                };
            }
            Marker::Opener {
                name,
                attrs,
                self_closing,
                offset,
            } => {
                let children = if self_closing {
                    Vec::new()
                } else {
                    parse_siblings(cursor, Some((&name, offset)))?
                };
                nodes.push(BlockNode::new(name).with_attrs(attrs).with_children(children));
            }
            Marker::Closer { name, offset } => {
                return match enclosing {
                    Some((expected, _)) if expected == name => Ok(nodes),
                    Some((expected, _)) => Err(ParseError::MismatchedCloser {
                        expected: expected.to_owned(),
                        found: name,
                        offset,
                    }),
                    None => Err(ParseError::StrayCloser { name, offset }),
                };
            }
        }
    }
}

enum Marker {
    Opener {
        name: String,
        attrs: Attrs,
        self_closing: bool,
        offset: usize,
    },
    Closer {
        name: String,
        offset: usize,
    },
    End,
}

/// Scan forward to the next block frame marker, skipping free markup and
/// ordinary comments.
fn next_marker(cursor: &mut Cursor<'_>) -> Result<Marker, ParseError> {
    loop {
        let Some(found) = cursor.rest().find(COMMENT_OPEN) else {
            cursor.pos = cursor.input.len();
            return Ok(Marker::End);
        };
        let offset = cursor.pos + found;
        cursor.pos = offset + COMMENT_OPEN.len();
        cursor.skip_ws();

        if cursor.rest().starts_with(CLOSER_TAG) {
            cursor.pos += CLOSER_TAG.len();
            let name = cursor.take_name().ok_or(ParseError::BadName(cursor.pos))?;
            cursor.skip_ws();
            if !cursor.rest().starts_with(COMMENT_CLOSE) {
                return Err(ParseError::UnterminatedComment(offset));
            }
            cursor.pos += COMMENT_CLOSE.len();
            return Ok(Marker::Closer { name, offset });
        }

        if cursor.rest().starts_with(BLOCK_TAG) {
            cursor.pos += BLOCK_TAG.len();
            let name_at = cursor.pos;
            let name = cursor.take_name().ok_or(ParseError::BadName(name_at))?;
            cursor.skip_ws();

            let attrs = if cursor.rest().starts_with('{') {
                let attrs_at = cursor.pos;
                let (value, consumed) = take_json(cursor.rest())
                    .map_err(|source| ParseError::BadAttrs { offset: attrs_at, source })?;
                cursor.pos += consumed;
                cursor.skip_ws();
                match value {
                    Value::Object(map) => map.into_iter().collect(),
                    other => {
                        return Err(ParseError::BadAttrs {
                            offset: attrs_at,
                            source: serde::de::Error::custom(format!(
                                "expected an object, got {other}"
                            )),
                        });
                    }
                }
            } else {
                Attrs::new()
            };

            if cursor.rest().starts_with(SELF_CLOSE) {
                cursor.pos += SELF_CLOSE.len();
                return Ok(Marker::Opener {
                    name,
                    attrs,
                    self_closing: true,
                    offset,
                });
            }
            if cursor.rest().starts_with(COMMENT_CLOSE) {
                cursor.pos += COMMENT_CLOSE.len();
                return Ok(Marker::Opener {
                    name,
                    attrs,
                    self_closing: false,
                    offset,
                });
            }
            return Err(ParseError::UnterminatedComment(offset));
        }

        // Ordinary comment: skip past it and keep scanning.
        match cursor.rest().find(COMMENT_CLOSE) {
            Some(end) => cursor.pos += end + COMMENT_CLOSE.len(),
            None => return Err(ParseError::UnterminatedComment(offset)),
        }
    }
}

/// Take exactly one JSON value off the front of `rest`, returning it and
/// the number of bytes consumed.
fn take_json(rest: &str) -> Result<(Value, usize), serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok((value, stream.byte_offset())),
        Some(Err(err)) => Err(err),
        None => Err(serde::de::Error::custom("empty attribute object")),
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Take a `namespace/block` name off the front of the input.
    fn take_name(&mut self) -> Option<String> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '/'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        let mut parts = name.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(block), None) if !ns.is_empty() && !block.is_empty() => {
                let owned = name.to_owned();
                self.pos += end;
                Some(owned)
            }
            _ => None,
        }
    }
}
