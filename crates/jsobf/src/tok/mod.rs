pub mod lex;

use jsobf_sourcemap::SourceSpan;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

// ---------------------------------------------------------------------------
// TokenKind
// ---------------------------------------------------------------------------

/// The lexical categories the tokenizer reports.
///
/// The token text itself is not stored here; it is recovered by slicing
/// the source file with the token's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The `&` token.
    Amp,
    /// The `&&` token.
    AmpAmp,
    /// The `&=` token.
    AmpEq,
    /// The `=>` token.
    Arrow,
    /// The `!` token.
    Bang,
    /// The `!=` token.
    BangEq,
    /// The `!==` token.
    BangEqEq,
    /// The `^` token.
    Caret,
    /// The `^=` token.
    CaretEq,
    /// The `:` token.
    Colon,
    /// The `,` token.
    Comma,
    /// The `.` token.
    Dot,
    /// The `...` token.
    DotDotDot,
    /// The `=` token.
    Eq,
    /// The `==` token.
    EqEq,
    /// The `===` token.
    EqEqEq,
    /// The `>` token.
    Gt,
    /// The `>=` token.
    GtEq,
    /// The `>>` token.
    GtGt,
    /// The `>>>` token.
    GtGtGt,
    /// The `{` token.
    LBrace,
    /// The `[` token.
    LBrack,
    /// The `(` token.
    LParen,
    /// The `<` token.
    Lt,
    /// The `<=` token.
    LtEq,
    /// The `<<` token.
    LtLt,
    /// The `-` token.
    Minus,
    /// The `-=` token.
    MinusEq,
    /// The `--` token.
    MinusMinus,
    /// The `%` token.
    Percent,
    /// The `%=` token.
    PercentEq,
    /// The `|` token.
    Pipe,
    /// The `|=` token.
    PipeEq,
    /// The `||` token.
    PipePipe,
    /// The `+` token.
    Plus,
    /// The `+=` token.
    PlusEq,
    /// The `++` token.
    PlusPlus,
    /// The `?` token.
    Question,
    /// The `?.` token.
    QuestionDot,
    /// The `??` token.
    QuestionQuestion,
    /// The `}` token.
    RBrace,
    /// The `]` token.
    RBrack,
    /// The `)` token.
    RParen,
    /// The `;` token.
    Semi,
    /// The `/` token.
    Slash,
    /// The `/=` token.
    SlashEq,
    /// The `*` token.
    Star,
    /// The `*=` token.
    StarEq,
    /// The `**` token.
    StarStar,
    /// The `~` token.
    Tilde,
    /// A reserved word (`const`, `function`, `return`, ...).
    Keyword,
    /// An identifier.
    Identifier,
    /// A numeric literal.
    Number,
    /// A single- or double-quoted string literal, quotes included in
    /// the span.
    String,
    /// A backtick template literal. Kept distinct from `String`:
    /// encrypting a template would freeze its interpolations into
    /// literal text, so the string pass must never target one.
    Template,
}
