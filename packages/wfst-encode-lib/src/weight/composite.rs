//! Text codec for weights built from several sub-weights.
//!
//! A composite is written as its elements joined by the configured
//! separator, optionally wrapped in parentheses. Elements may themselves be
//! composites, in which case parentheses are needed to read them back.

use std::{fmt, str::Chars};

use crate::{
    config::WeightFormatConfig,
    weight::{Weight, WeightParseError},
};

/// Writes the elements of one composite weight.
#[derive(Debug)]
pub struct CompositeWeightWriter<'a, O: fmt::Write + ?Sized> {
    out: &'a mut O,
    config: &'a WeightFormatConfig,
    index: usize,
}

impl<'a, O: fmt::Write + ?Sized> CompositeWeightWriter<'a, O> {
    pub fn new(out: &'a mut O, config: &'a WeightFormatConfig) -> Self {
        CompositeWeightWriter {
            out,
            config,
            index: 0,
        }
    }

    pub fn write_begin(&mut self) -> fmt::Result {
        if *self.config.get_parentheses() {
            self.out.write_char(*self.config.get_open_paren())?;
        }
        Ok(())
    }

    pub fn write_element<W: Weight>(&mut self, weight: &W) -> fmt::Result {
        if self.index > 0 {
            self.out.write_char(*self.config.get_separator())?;
        }
        self.index += 1;
        weight.write_text(&mut *self.out, self.config)
    }

    pub fn write_end(&mut self) -> fmt::Result {
        if *self.config.get_parentheses() {
            self.out.write_char(*self.config.get_close_paren())?;
        }
        Ok(())
    }
}

/// Reads the elements of one composite weight from a character stream.
///
/// The reader keeps one character of lookahead and the current parenthesis
/// depth. After the first error it stays failed and every further call
/// returns [`WeightParseError::BadStream`].
#[derive(Debug)]
pub struct CompositeWeightReader<I: Iterator<Item = char>> {
    chars: I,
    config: WeightFormatConfig,
    lookahead: Option<char>,
    primed: bool,
    depth: usize,
    bad: bool,
}

impl<'s> CompositeWeightReader<Chars<'s>> {
    pub fn for_str(text: &'s str, config: &WeightFormatConfig) -> Self {
        Self::new(text.chars(), config)
    }
}

impl<I: Iterator<Item = char>> CompositeWeightReader<I> {
    pub fn new(chars: I, config: &WeightFormatConfig) -> Self {
        CompositeWeightReader {
            chars,
            config: config.clone(),
            lookahead: None,
            primed: false,
            depth: 0,
            bad: false,
        }
    }

    pub fn is_bad(&self) -> bool {
        self.bad
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn advance(&mut self) {
        self.lookahead = self.chars.next();
    }

    fn prime(&mut self) {
        if !self.primed {
            self.primed = true;
            self.advance();
        }
    }

    fn fail(&mut self, error: WeightParseError) -> WeightParseError {
        self.bad = true;
        error
    }

    fn check(&self) -> Result<(), WeightParseError> {
        if self.bad {
            Err(WeightParseError::BadStream)
        } else {
            Ok(())
        }
    }

    fn skip_whitespace(&mut self) {
        while self.lookahead.is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Skips leading whitespace and, with parentheses enabled, consumes the
    /// open parenthesis.
    pub fn read_begin(&mut self) -> Result<(), WeightParseError> {
        self.check()?;
        self.prime();
        self.skip_whitespace();

        if *self.config.get_parentheses() {
            if self.lookahead != Some(*self.config.get_open_paren()) {
                return Err(self.fail(WeightParseError::MissingOpenParen));
            }
            self.depth = 1;
            self.advance();
        }
        Ok(())
    }

    /// Reads the next element into `target`.
    ///
    /// With `last` set the separator no longer ends the element. Returns
    /// whether more input follows the element.
    pub fn read_element<W: Weight>(
        &mut self,
        target: &mut W,
        last: bool,
    ) -> Result<bool, WeightParseError> {
        self.check()?;
        self.prime();

        let separator = *self.config.get_separator();
        let parentheses = *self.config.get_parentheses();
        let open_paren = *self.config.get_open_paren();
        let close_paren = *self.config.get_close_paren();

        let mut buf = String::new();
        while let Some(c) = self.lookahead {
            if c.is_whitespace()
                || (c == separator && self.depth <= 1 && !last)
                || (parentheses && c == close_paren && self.depth == 1)
            {
                break;
            }

            if parentheses && c == open_paren {
                self.depth += 1;
            } else if parentheses && c == close_paren {
                if self.depth == 0 {
                    return Err(self.fail(WeightParseError::UnmatchedCloseParen));
                }
                self.depth -= 1;
            }

            buf.push(c);
            self.advance();
        }

        if buf.is_empty() {
            return Err(self.fail(WeightParseError::EmptyElement));
        }

        match W::read_text(&buf, &self.config) {
            Ok(w) => *target = w,
            Err(e) => return Err(self.fail(e)),
        }

        // Consume the separator or the closing parenthesis.
        if let Some(c) = self.lookahead
            && !c.is_whitespace()
        {
            if parentheses && c == close_paren && self.depth == 1 {
                self.depth = 0;
            }
            self.advance();
        }

        Ok(self.lookahead.is_some_and(|c| !c.is_whitespace()))
    }

    /// Checks that the composite was consumed completely.
    pub fn read_end(&mut self) -> Result<(), WeightParseError> {
        self.check()?;
        self.prime();
        self.skip_whitespace();

        if let Some(c) = self.lookahead {
            return Err(self.fail(WeightParseError::ExcessCharacter(c)));
        }
        if *self.config.get_parentheses() && self.depth != 0 {
            return Err(self.fail(WeightParseError::MissingCloseParen));
        }
        Ok(())
    }
}
