use super::{Token, TokenKind};

use jsobf_sourcemap::{diag::Diagnostic, SourceFile, SourceSpan};

use peeking_take_while::PeekableExt;

use std::{iter::Peekable, str::CharIndices};

// ---------------------------------------------------------------------------
// LexerResult
// ---------------------------------------------------------------------------

#[derive(Default, Clone, PartialEq, Eq)]
pub struct LexerResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexerDiagnostic>,
}

// ---------------------------------------------------------------------------
// LexerDiagnostic
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq)]
pub struct LexerDiagnostic {
    pub span: SourceSpan,
    pub kind: LexerDiagnosticKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerDiagnosticKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedComment,
}

impl From<LexerDiagnostic> for Diagnostic {
    fn from(diagnostic: LexerDiagnostic) -> Self {
        match diagnostic.kind {
            LexerDiagnosticKind::UnexpectedCharacter => Diagnostic::warning(
                diagnostic.span,
                "unexpected character",
                "this character does not start any token",
            ),
            LexerDiagnosticKind::UnterminatedString => Diagnostic::warning(
                diagnostic.span,
                "unterminated string literal",
                "expected a closing quote",
            ),
            LexerDiagnosticKind::UnterminatedComment => Diagnostic::warning(
                diagnostic.span,
                "unterminated block comment",
                "expected a closing '*/'",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Reserved words and literal keywords that must never be treated as
/// plain identifiers. Contextual keywords (`async`, `of`, ...) are
/// included as well; leaving them alone is always safe.
static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "async", "await", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "export",
    "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "let", "new", "null", "of", "return", "static",
    "super", "switch", "this", "throw", "true", "try", "typeof", "var",
    "void", "while", "with", "yield",
};

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// A tolerant JavaScript tokenizer.
///
/// Malformed input produces a diagnostic and lexing continues; the caller
/// decides whether the diagnostics are worth reporting. Regular-expression
/// literals are not recognized and lex as `/` punctuators.
pub struct Lexer<'a> {
    file: &'a SourceFile,
    idx: u32,
    result: LexerResult,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a SourceFile) -> Self {
        Self {
            file,
            idx: 0,
            result: LexerResult::default(),
            chars: file.data().char_indices().peekable(),
        }
    }

    pub fn lex(mut self) -> LexerResult {
        while let Some((idx, c)) = self.chars.next() {
            self.idx = idx as u32;
            match c {
                c if c.is_whitespace() => continue,
                c if c.is_ascii_digit() => self.handle_number(),
                c if c.is_alphabetic() || c == '_' || c == '$' => self.handle_word(c),
                '\'' | '"' | '`' => self.handle_string(c),
                ';' => self.push_token(TokenKind::Semi, 1),
                ',' => self.push_token(TokenKind::Comma, 1),
                ':' => self.push_token(TokenKind::Colon, 1),
                '~' => self.push_token(TokenKind::Tilde, 1),
                '(' => self.push_token(TokenKind::LParen, 1),
                ')' => self.push_token(TokenKind::RParen, 1),
                '{' => self.push_token(TokenKind::LBrace, 1),
                '}' => self.push_token(TokenKind::RBrace, 1),
                '[' => self.push_token(TokenKind::LBrack, 1),
                ']' => self.push_token(TokenKind::RBrack, 1),
                '%' => self.try_match('=', TokenKind::PercentEq, TokenKind::Percent),
                '^' => self.try_match('=', TokenKind::CaretEq, TokenKind::Caret),
                '=' => self.handle_eq(),
                '!' => self.handle_bang(),
                '>' => self.handle_gt(),
                '?' => self.handle_question(),
                '.' => self.handle_dot(),
                '/' => self.handle_slash(),
                '<' => self.try_match2(
                    ('=', TokenKind::LtEq),
                    ('<', TokenKind::LtLt),
                    TokenKind::Lt,
                ),
                '&' => self.try_match2(
                    ('&', TokenKind::AmpAmp),
                    ('=', TokenKind::AmpEq),
                    TokenKind::Amp,
                ),
                '|' => self.try_match2(
                    ('|', TokenKind::PipePipe),
                    ('=', TokenKind::PipeEq),
                    TokenKind::Pipe,
                ),
                '+' => self.try_match2(
                    ('+', TokenKind::PlusPlus),
                    ('=', TokenKind::PlusEq),
                    TokenKind::Plus,
                ),
                '-' => self.try_match2(
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEq),
                    TokenKind::Minus,
                ),
                '*' => self.try_match2(
                    ('*', TokenKind::StarStar),
                    ('=', TokenKind::StarEq),
                    TokenKind::Star,
                ),
                _ => self.result.diagnostics.push(LexerDiagnostic {
                    kind: LexerDiagnosticKind::UnexpectedCharacter,
                    span: self.span(self.idx, self.idx + c.len_utf8() as u32),
                }),
            }
        }
        self.result
    }

    fn span(&self, begin: u32, end: u32) -> SourceSpan {
        self.file.span(begin..end).unwrap_or_default()
    }

    fn push_token(&mut self, kind: TokenKind, len: u32) {
        self.push_span(kind, self.idx, self.idx + len);
    }

    fn push_span(&mut self, kind: TokenKind, begin: u32, end: u32) {
        self.result.tokens.push(Token {
            kind,
            span: self.span(begin, end),
        });
    }

    fn try_match(&mut self, ch: char, kind: TokenKind, fallback: TokenKind) {
        match self.chars.peek() {
            Some((_, c)) if *c == ch => {
                self.chars.next();
                self.push_token(kind, 2);
            }
            _ => self.push_token(fallback, 1),
        }
    }

    fn try_match2(&mut self, alt1: (char, TokenKind), alt2: (char, TokenKind), fallback: TokenKind) {
        let (kind, len) = match self.chars.peek() {
            Some((_, c)) if *c == alt1.0 => {
                self.chars.next();
                (alt1.1, 2)
            }
            Some((_, c)) if *c == alt2.0 => {
                self.chars.next();
                (alt2.1, 2)
            }
            _ => (fallback, 1),
        };
        self.push_token(kind, len);
    }

    fn handle_eq(&mut self) {
        match self.chars.peek() {
            Some((_, '>')) => {
                self.chars.next();
                self.push_token(TokenKind::Arrow, 2);
            }
            Some((_, '=')) => {
                self.chars.next();
                match self.chars.peek() {
                    Some((_, '=')) => {
                        self.chars.next();
                        self.push_token(TokenKind::EqEqEq, 3);
                    }
                    _ => self.push_token(TokenKind::EqEq, 2),
                }
            }
            _ => self.push_token(TokenKind::Eq, 1),
        }
    }

    fn handle_bang(&mut self) {
        match self.chars.peek() {
            Some((_, '=')) => {
                self.chars.next();
                match self.chars.peek() {
                    Some((_, '=')) => {
                        self.chars.next();
                        self.push_token(TokenKind::BangEqEq, 3);
                    }
                    _ => self.push_token(TokenKind::BangEq, 2),
                }
            }
            _ => self.push_token(TokenKind::Bang, 1),
        }
    }

    fn handle_gt(&mut self) {
        match self.chars.peek() {
            Some((_, '=')) => {
                self.chars.next();
                self.push_token(TokenKind::GtEq, 2);
            }
            Some((_, '>')) => {
                self.chars.next();
                match self.chars.peek() {
                    Some((_, '>')) => {
                        self.chars.next();
                        self.push_token(TokenKind::GtGtGt, 3);
                    }
                    _ => self.push_token(TokenKind::GtGt, 2),
                }
            }
            _ => self.push_token(TokenKind::Gt, 1),
        }
    }

    fn handle_question(&mut self) {
        match self.chars.peek() {
            Some((_, '.')) => {
                self.chars.next();
                self.push_token(TokenKind::QuestionDot, 2);
            }
            Some((_, '?')) => {
                self.chars.next();
                self.push_token(TokenKind::QuestionQuestion, 2);
            }
            _ => self.push_token(TokenKind::Question, 1),
        }
    }

    // A `...` spread must lex as one token; an identifier right after it
    // is not a member access.
    fn handle_dot(&mut self) {
        if let Some((_, '.')) = self.chars.peek() {
            self.chars.next();
            if let Some((_, '.')) = self.chars.peek() {
                self.chars.next();
                self.push_token(TokenKind::DotDotDot, 3);
            } else {
                self.push_token(TokenKind::Dot, 1);
                self.push_span(TokenKind::Dot, self.idx + 1, self.idx + 2);
            }
        } else {
            self.push_token(TokenKind::Dot, 1);
        }
    }

    fn handle_slash(&mut self) {
        match self.chars.peek() {
            Some((_, '/')) => {
                self.chars
                    .peeking_take_while(|(_, c)| *c != '\n')
                    .for_each(drop);
            }
            Some((_, '*')) => {
                self.chars.next();
                let mut closed = false;
                while let Some((_, c)) = self.chars.next() {
                    if c == '*' {
                        if let Some((_, '/')) = self.chars.peek() {
                            self.chars.next();
                            closed = true;
                            break;
                        }
                    }
                }
                if !closed {
                    self.result.diagnostics.push(LexerDiagnostic {
                        kind: LexerDiagnosticKind::UnterminatedComment,
                        span: self.span(self.idx, self.file.data().len() as u32),
                    });
                }
            }
            Some((_, '=')) => {
                self.chars.next();
                self.push_token(TokenKind::SlashEq, 2);
            }
            _ => self.push_token(TokenKind::Slash, 1),
        }
    }

    fn handle_number(&mut self) {
        let begin = self.idx;
        let end = self
            .chars
            .peeking_take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .last()
            .map(|(i, _)| i as u32 + 1)
            .unwrap_or(begin + 1);
        self.push_span(TokenKind::Number, begin, end);
    }

    fn handle_word(&mut self, first: char) {
        let begin = self.idx;
        let end = self
            .chars
            .peeking_take_while(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '$')
            .last()
            .map(|(i, c)| i as u32 + c.len_utf8() as u32)
            .unwrap_or(begin + first.len_utf8() as u32);
        let text = self.file.slice(self.span(begin, end)).unwrap_or_default();
        let kind = if KEYWORDS.contains(text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push_span(kind, begin, end);
    }

    fn handle_string(&mut self, quote: char) {
        let begin = self.idx;
        let kind = if quote == '`' {
            TokenKind::Template
        } else {
            TokenKind::String
        };
        let mut end = None;
        while let Some((i, c)) = self.chars.next() {
            match c {
                '\\' => {
                    self.chars.next();
                }
                c if c == quote => {
                    end = Some(i as u32 + 1);
                    break;
                }
                _ => {}
            }
        }
        match end {
            Some(end) => self.push_span(kind, begin, end),
            None => {
                let end = self.file.data().len() as u32;
                self.push_span(kind, begin, end);
                self.result.diagnostics.push(LexerDiagnostic {
                    kind: LexerDiagnosticKind::UnterminatedString,
                    span: self.span(begin, end),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::NamedTempFile;

    fn lex_source(source: &str) -> (SourceFile, LexerResult) {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), source).unwrap();
        let file = SourceFile::new(temp.path()).unwrap();
        let result = Lexer::new(&file).lex();
        drop(temp);
        (file, result)
    }

    fn kinds(result: &LexerResult) -> Vec<TokenKind> {
        result.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_declaration_and_call() {
        let (file, r) = lex_source("const greeting = \"hi\";\nconsole.log(greeting);");
        assert!(r.diagnostics.is_empty());
        assert_eq!(
            kinds(&r),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::String,
                TokenKind::Semi,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::Semi,
            ]
        );
        assert_eq!(file.slice(r.tokens[0].span), Some("const"));
        assert_eq!(file.slice(r.tokens[1].span), Some("greeting"));
        assert_eq!(file.slice(r.tokens[3].span), Some("\"hi\""));
        assert_eq!(file.slice(r.tokens[5].span), Some("console"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let (_, r) = lex_source("a // line comment\n/* block\ncomment */ b");
        assert!(r.diagnostics.is_empty());
        assert_eq!(kinds(&r), vec![TokenKind::Identifier, TokenKind::Identifier]);
    }

    #[test]
    fn test_unterminated_string_is_tolerated() {
        let (_, r) = lex_source("f('abc");
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(
            r.diagnostics[0].kind,
            LexerDiagnosticKind::UnterminatedString
        );
        assert_eq!(
            kinds(&r),
            vec![TokenKind::Identifier, TokenKind::LParen, TokenKind::String]
        );
    }

    #[test]
    fn test_string_escapes() {
        let (file, r) = lex_source(r#"'it\'s' + "a\\b""#);
        assert!(r.diagnostics.is_empty());
        assert_eq!(
            kinds(&r),
            vec![TokenKind::String, TokenKind::Plus, TokenKind::String]
        );
        assert_eq!(file.slice(r.tokens[0].span), Some(r"'it\'s'"));
        assert_eq!(file.slice(r.tokens[2].span), Some(r#""a\\b""#));
    }

    #[test]
    fn test_spread_is_one_token() {
        let (_, r) = lex_source("f(...args)");
        assert_eq!(
            kinds(&r),
            vec![
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::DotDotDot,
                TokenKind::Identifier,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_keywords_and_operators() {
        let (_, r) = lex_source("if (a === b) return a => a ?? b;");
        assert_eq!(
            kinds(&r),
            vec![
                TokenKind::Keyword,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::EqEqEq,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::QuestionQuestion,
                TokenKind::Identifier,
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn test_template_literal_is_not_a_plain_string() {
        let (file, r) = lex_source("const t = `a ${n} b`;");
        assert_eq!(r.tokens[3].kind, TokenKind::Template);
        assert_eq!(file.slice(r.tokens[3].span), Some("`a ${n} b`"));
    }
}
