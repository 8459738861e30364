//! Byte cursor over an ASCII grammar with source-offset aware spans.

use crate::error::{ParseError, Span};

pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    /// Offset of `input` within the string handed to `parse`.
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, offset: usize) -> Self {
        Self {
            input,
            pos: 0,
            offset,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds. `pred` must only accept ASCII.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    pub fn slice(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    /// Span from `start` (local) to the current position, in source offsets.
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(self.offset + start, self.offset + self.pos.max(start))
    }

    /// Span of the whole input.
    pub fn full_span(&self) -> Span {
        Span::new(self.offset, self.offset + self.input.len())
    }

    /// Span of the next character, or an empty span at end of input.
    pub fn span_here(&self) -> Span {
        let width = self.input[self.pos.min(self.input.len())..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        Span::new(self.offset + self.pos, self.offset + self.pos + width)
    }

    /// Format error located at the next character.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::format(message).at(self.span_here())
    }

    /// Format error for whatever is left unconsumed.
    pub fn unexpected(&self) -> ParseError {
        match self.input[self.pos.min(self.input.len())..].chars().next() {
            Some(c) => self.error(format!("unexpected '{c}'")),
            None => self.error("unexpected end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_while_and_eat() {
        let mut cur = Cursor::new("1985-04", 0);
        assert_eq!(cur.take_while(|b| b.is_ascii_digit()), "1985");
        assert!(cur.eat(b'-'));
        assert!(!cur.eat(b'-'));
        assert_eq!(cur.bump(), Some(b'0'));
        assert_eq!(cur.slice(5), "0");
    }

    #[test]
    fn test_spans_carry_offset() {
        let mut cur = Cursor::new("ab", 10);
        assert_eq!(cur.span_here(), Span::new(10, 11));
        cur.bump();
        cur.bump();
        assert!(cur.is_eof());
        assert_eq!(cur.span_here(), Span::new(12, 12));
        assert_eq!(cur.full_span(), Span::new(10, 12));
    }

    #[test]
    fn test_unexpected_reports_character() {
        let cur = Cursor::new("é", 0);
        let err = cur.unexpected();
        assert_eq!(err.message, "unexpected 'é'");
        assert_eq!(err.position, Some(Span::new(0, 2)));
    }
}
