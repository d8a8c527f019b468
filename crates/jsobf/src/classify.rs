use crate::tok::{Token, TokenKind};

use jsobf_sourcemap::SourceFile;

use std::collections::HashSet;

// ---------------------------------------------------------------------------
// DeclKeyword
// ---------------------------------------------------------------------------

/// The binding keywords whose following identifier is a declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Const,
    Var,
    Let,
    Function,
    Class,
}

impl DeclKeyword {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "const" => Some(Self::Const),
            "var" => Some(Self::Var),
            "let" => Some(Self::Let),
            "function" => Some(Self::Function),
            "class" => Some(Self::Class),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Var => "var",
            Self::Let => "let",
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

// ---------------------------------------------------------------------------
// IdentifierRecord
// ---------------------------------------------------------------------------

/// One identifier occurrence, in token order. Occurrences are not
/// deduplicated; the substitution engine does that per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRecord {
    pub name: String,
    /// Set when the identifier directly follows a binding keyword.
    pub declaration: Option<DeclKeyword>,
    /// Set when the identifier directly follows the `.` punctuator.
    pub chain: bool,
    /// Set for `constructor` immediately followed by `(`; renaming it
    /// would break class-construction semantics, so it is never touched.
    pub ctor: bool,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    pub identifiers: Vec<IdentifierRecord>,
    /// Distinct quoted string tokens, first-encountered order preserved.
    pub strings: Vec<String>,
}

/// Turns the raw token stream into the records the substitution engine
/// consumes. Tokens whose text cannot be recovered (defensive slices on
/// malformed spans) simply produce no record.
pub fn classify(file: &SourceFile, tokens: &[Token]) -> Classification {
    let mut result = Classification::default();
    let mut seen = HashSet::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::String => {
                let Some(text) = file.slice(token.span) else {
                    continue;
                };
                if seen.insert(text.to_string()) {
                    result.strings.push(text.to_string());
                }
            }
            TokenKind::Identifier => {
                let Some(name) = file.slice(token.span) else {
                    continue;
                };
                let mut record = IdentifierRecord {
                    name: name.to_string(),
                    declaration: None,
                    chain: false,
                    ctor: false,
                };
                if i > 0 {
                    let previous = &tokens[i - 1];
                    match previous.kind {
                        TokenKind::Keyword => {
                            record.declaration = file
                                .slice(previous.span)
                                .and_then(DeclKeyword::from_text);
                        }
                        TokenKind::Dot => record.chain = true,
                        _ => {}
                    }
                }
                if name == "constructor" {
                    if let Some(next) = tokens.get(i + 1) {
                        if next.kind == TokenKind::LParen {
                            record.ctor = true;
                        }
                    }
                }
                result.identifiers.push(record);
            }
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tok::lex::Lexer;

    use std::fs::write;
    use tempfile::NamedTempFile;

    fn classify_source(source: &str) -> Classification {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), source).unwrap();
        let file = SourceFile::new(temp.path()).unwrap();
        let result = Lexer::new(&file).lex();
        classify(&file, &result.tokens)
    }

    #[test]
    fn test_declarations() {
        let c = classify_source("const a = 1; let b; var c; function f() {} class K {}");
        let decls: Vec<_> = c
            .identifiers
            .iter()
            .map(|r| (r.name.as_str(), r.declaration))
            .collect();
        assert_eq!(
            decls,
            vec![
                ("a", Some(DeclKeyword::Const)),
                ("b", Some(DeclKeyword::Let)),
                ("c", Some(DeclKeyword::Var)),
                ("f", Some(DeclKeyword::Function)),
                ("K", Some(DeclKeyword::Class)),
            ]
        );
    }

    #[test]
    fn test_member_chain() {
        let c = classify_source("console.log(x);");
        assert_eq!(c.identifiers.len(), 3);
        assert!(!c.identifiers[0].chain);
        assert!(c.identifiers[1].chain);
        assert_eq!(c.identifiers[1].name, "log");
        assert!(!c.identifiers[2].chain);
    }

    #[test]
    fn test_constructor_flag() {
        let c = classify_source("class K { constructor(x) {} } obj.constructor();");
        let ctors: Vec<_> = c
            .identifiers
            .iter()
            .filter(|r| r.name == "constructor")
            .collect();
        assert_eq!(ctors.len(), 2);
        assert!(ctors.iter().all(|r| r.ctor));
    }

    #[test]
    fn test_constructor_without_call_is_plain() {
        let c = classify_source("const k = obj.constructor;");
        let record = c
            .identifiers
            .iter()
            .find(|r| r.name == "constructor")
            .unwrap();
        assert!(!record.ctor);
        assert!(record.chain);
    }

    #[test]
    fn test_strings_deduplicated_in_order() {
        let c = classify_source("f('b'); f('a'); f('b'); f(\"a\");");
        assert_eq!(c.strings, vec!["'b'", "'a'", "\"a\""]);
    }

    #[test]
    fn test_template_literals_are_never_collected() {
        // encrypting `a ${n} b` would decode to its raw text at runtime
        // and lose the interpolation of n
        let c = classify_source("const t = `a ${n} b`; f('plain');");
        assert_eq!(c.strings, vec!["'plain'"]);
    }

    #[test]
    fn test_keywords_produce_no_identifier_records() {
        let c = classify_source("return typeof x;");
        let names: Vec<_> = c.identifiers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["x"]);
    }
}
