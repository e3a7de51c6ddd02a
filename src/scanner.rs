//! One‑pass lexer over a UTF‑8 byte slice.
//!
//! [`Scanner`] is a `FusedIterator` yielding `Result<Token>`.  Whitespace and
//! `//` comments produce nothing; every other lexeme produces one token or one
//! [`SinterpError::Lex`].  Errors don't end the stream: scanning picks up at
//! the next byte, and the stream always ends with exactly one `EOF`.
//!
//! Recognised lexemes:
//! - single characters `( ) { } , . - + ; * /`
//! - one‑ or two‑character operators `! != = == < <= > >=`
//! - string literals (may span lines; no escapes)
//! - number literals (`123`, `3.14`; no leading or trailing dot)
//! - identifiers and keywords, the latter via a perfect‑hash table
//!
//! ```rust
//! use sinterp::scanner::Scanner;
//!
//! let source = b"print 123; // example";
//! for result in Scanner::new(source) {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("Lex error: {}", err),
//!     }
//! }
//! ```

use crate::error::{Result, SinterpError};
use crate::token::{Literal, Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// What one call to `scan_token` recognised: a kind, plus the value for
/// strings and numbers.  `None` from `scan_token` means "nothing to emit".
type Recognised = (TokenType, Option<Literal>);

/// Lexer state.  Borrows the source; the tokens it yields own their text.
pub struct Scanner<'a> {
    src: &'a [u8],
    start: usize, // first byte of the current lexeme
    curr: usize,  // one past the last byte examined
    line: usize,  // 1‑based
    done: bool,   // EOF already emitted
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            done: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Consume one byte.  Callers guard with [`is_at_end`](Self::is_at_end).
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Current byte, or `0` past the end.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.src.get(self.curr).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.src.get(self.curr + 1).copied().unwrap_or(0)
    }

    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == expected && !self.is_at_end() {
            self.curr += 1;
            true
        } else {
            false
        }
    }

    /// `long` if the next byte is `=`, else `short`.
    #[inline]
    fn with_equals(&mut self, long: TokenType, short: TokenType) -> TokenType {
        if self.match_byte(b'=') {
            long
        } else {
            short
        }
    }

    fn lexeme(&self) -> &'a [u8] {
        &self.src[self.start..self.curr]
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan from `self.curr` past one lexeme.
    fn scan_token(&mut self) -> Result<Option<Recognised>> {
        let tt: TokenType = match self.advance() {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,

            b'!' => self.with_equals(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equals(TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.with_equals(TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.with_equals(TokenType::GREATER_EQUAL, TokenType::GREATER),

            b' ' | b'\r' | b'\t' => return Ok(None),

            b'\n' => {
                self.line += 1;
                return Ok(None);
            }

            b'/' if self.match_byte(b'/') => {
                // Jump to the newline; it is consumed (and counted) next call.
                self.curr = match memchr(b'\n', &self.src[self.curr..]) {
                    Some(pos) => self.curr + pos,
                    None => self.src.len(),
                };
                return Ok(None);
            }
            b'/' => TokenType::SLASH,

            b'"' => return self.string().map(Some),

            b'0'..=b'9' => return Ok(Some(self.number())),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            _ => {
                // Swallow UTF‑8 continuation bytes so one character is one error.
                while (self.peek() & 0b1100_0000) == 0b1000_0000 {
                    self.advance();
                }

                let ch = String::from_utf8_lossy(self.lexeme()).into_owned();

                return Err(SinterpError::lex(
                    self.line,
                    format!("Unexpected character: {}", ch),
                ));
            }
        };

        Ok(Some((tt, None)))
    }

    /// String literal; `self.start` is on the opening quote.  Newlines inside
    /// are allowed and counted.
    fn string(&mut self) -> Result<Recognised> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(SinterpError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // closing quote

        let body: &[u8] = &self.src[self.start + 1..self.curr - 1];
        let value: String = String::from_utf8_lossy(body).into_owned();

        Ok((TokenType::STRING, Some(Literal::Str(value))))
    }

    fn number(&mut self) -> Recognised {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let n: f64 = std::str::from_utf8(self.lexeme())
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0); // ASCII digits only, never taken

        (TokenType::NUMBER, Some(Literal::Number(n)))
    }

    /// Identifier or keyword.
    fn identifier(&mut self) -> TokenType {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }

        KEYWORDS
            .get(self.lexeme())
            .copied()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.curr;

            match self.scan_token() {
                Err(e) => return Some(Err(e)),

                Ok(Some((tt, literal))) => {
                    let lexeme = String::from_utf8_lossy(self.lexeme());
                    debug!("Scanned token ({:?}) on line {}", tt, self.line);

                    return Some(Ok(Token::new(tt, lexeme, literal, self.line)));
                }

                Ok(None) => {} // whitespace or comment
            }
        }

        self.done = true;
        Some(Ok(Token::new(TokenType::EOF, "", None, self.line)))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
