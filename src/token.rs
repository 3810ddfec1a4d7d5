//! Symbol classifier: encoded string → typed token stream.
//!
//! The encoded stream uses `.`, `-` and runs of spaces. A maximal run
//! of N consecutive spaces becomes exactly one gap token, never N:
//! four or more spaces separate words, fewer separate letters. Any
//! other character is rejected.
//!
//! Tokenization is pure: no lookahead past the current run, no
//! backtracking, and re-tokenizing the same string yields the same
//! sequence.

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

/// Minimum space-run length classified as a word gap.
pub const WORD_GAP_MIN_RUN: usize = 4;

/// Active-signal symbol kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Dot,
    Dash,
}

/// Silent-interval kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    /// Gap between letters of the same word (run of 1–3 spaces).
    Letter,
    /// Gap between words (run of 4 or more spaces).
    Word,
}

/// One unit of the playback stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Mark(MarkKind),
    Gap(GapKind),
}

impl Token {
    /// Textual form for transcript rendering, using the table encoder's
    /// spacing (two spaces between letters, four between words).
    pub fn glyph(self) -> &'static str {
        match self {
            Token::Mark(MarkKind::Dot) => ".",
            Token::Mark(MarkKind::Dash) => "-",
            Token::Gap(GapKind::Letter) => "  ",
            Token::Gap(GapKind::Word) => "    ",
        }
    }
}

/// Tokenize an encoded symbol string.
///
/// Returns a lazy iterator of tokens. The iterator is finite and
/// restartable: call `tokenize` again on the same input to replay it.
///
/// # Example
///
/// ```
/// use rust_morse_machine::token::{tokenize, GapKind, MarkKind, Token};
///
/// let tokens: Vec<Token> = tokenize(".- .-").map(Result::unwrap).collect();
/// assert_eq!(
///     tokens,
///     [
///         Token::Mark(MarkKind::Dot),
///         Token::Mark(MarkKind::Dash),
///         Token::Gap(GapKind::Letter),
///         Token::Mark(MarkKind::Dot),
///         Token::Mark(MarkKind::Dash),
///     ]
/// );
/// ```
pub fn tokenize(encoded: &str) -> Tokenizer<'_> {
    Tokenizer { encoded, pos: 0 }
}

/// Cursor over an encoded symbol string.
pub struct Tokenizer<'a> {
    encoded: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.encoded.as_bytes();
        let byte = *bytes.get(self.pos)?;

        match byte {
            b'.' => {
                self.pos += 1;
                Some(Ok(Token::Mark(MarkKind::Dot)))
            }
            b'-' => {
                self.pos += 1;
                Some(Ok(Token::Mark(MarkKind::Dash)))
            }
            b' ' => {
                let start = self.pos;
                while self.pos < bytes.len() && bytes[self.pos] == b' ' {
                    self.pos += 1;
                }
                let run = self.pos - start;

                let kind = if run >= WORD_GAP_MIN_RUN {
                    GapKind::Word
                } else {
                    GapKind::Letter
                };
                Some(Ok(Token::Gap(kind)))
            }
            _ => {
                let position = self.pos;
                // Safe: position is on a char boundary by construction.
                let symbol = self.encoded[position..]
                    .chars()
                    .next()
                    .expect("cursor on non-empty remainder");

                // Step past the offending character so iteration stays finite.
                self.pos += symbol.len_utf8();
                Some(Err(SequenceError::InvalidSymbol { position, symbol }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(encoded: &str) -> Vec<Token> {
        tokenize(encoded).map(Result::unwrap).collect()
    }

    #[test]
    fn test_marks() {
        assert_eq!(
            tokens(".-"),
            [Token::Mark(MarkKind::Dot), Token::Mark(MarkKind::Dash)]
        );
    }

    #[test]
    fn test_space_run_collapses_to_one_gap() {
        assert_eq!(tokens(".  ."), [
            Token::Mark(MarkKind::Dot),
            Token::Gap(GapKind::Letter),
            Token::Mark(MarkKind::Dot),
        ]);
    }

    #[test]
    fn test_gap_classification_boundary() {
        // 3 spaces is still a letter gap, 4 is a word gap.
        assert_eq!(tokens("   "), [Token::Gap(GapKind::Letter)]);
        assert_eq!(tokens("    "), [Token::Gap(GapKind::Word)]);
        // Any longer run is still a single word gap.
        assert_eq!(tokens("         "), [Token::Gap(GapKind::Word)]);
    }

    #[test]
    fn test_invalid_symbol_is_rejected_with_position() {
        let mut iter = tokenize(".x");

        assert!(matches!(iter.next(), Some(Ok(Token::Mark(MarkKind::Dot)))));
        assert!(matches!(
            iter.next(),
            Some(Err(SequenceError::InvalidSymbol {
                position: 1,
                symbol: 'x'
            }))
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_invalid_multibyte_symbol_does_not_stall() {
        let results: Vec<_> = tokenize("é-").collect();

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(SequenceError::InvalidSymbol {
                position: 0,
                symbol: 'é'
            })
        ));
        assert!(matches!(results[1], Ok(Token::Mark(MarkKind::Dash))));
    }

    #[test]
    fn test_tokenize_is_restartable() {
        let encoded = ".-  -.    .";
        assert_eq!(tokens(encoded), tokens(encoded));
    }
}
