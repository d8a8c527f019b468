use anyhow::{Context, Result};

use std::path::Path;

// ---------------------------------------------------------------------------
// Minifier
// ---------------------------------------------------------------------------

/// Reads the artifact back from disk and returns a compacted copy.
pub fn minify_file(path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact from {}", path.display()))?;
    Ok(minify_source(&data))
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Dropping the separator must not join two word tokens (`return x`)
/// and must not fuse sign operators into `--`/`++`.
fn needs_separator(prev: Option<char>, next: Option<char>) -> bool {
    match (prev, next) {
        (Some(p), Some(n)) => {
            (is_word(p) && is_word(n)) || (p == '-' && n == '-') || (p == '+' && n == '+')
        }
        _ => false,
    }
}

/// Whitespace minification: strips comments and collapses whitespace
/// runs outside string literals. A run is kept as a single space only
/// when dropping it would change how the text re-tokenizes; string
/// contents are copied verbatim, escapes included.
pub fn minify_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                while let Some(sc) = chars.next() {
                    out.push(sc);
                    if sc == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if sc == c {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for sc in chars.by_ref() {
                    if sc == '\n' {
                        break;
                    }
                }
                // a comment separates tokens just like whitespace does
                if needs_separator(out.chars().next_back(), chars.peek().copied()) {
                    out.push(' ');
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                while let Some(sc) = chars.next() {
                    if sc == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
                if needs_separator(out.chars().next_back(), chars.peek().copied()) {
                    out.push(' ');
                }
            }
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
                if needs_separator(out.chars().next_back(), chars.peek().copied()) {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(minify_source("const  a =  1 ;\n f( a ) ;"), "const a=1;f(a);");
    }

    #[test]
    fn test_keeps_separating_space() {
        assert_eq!(minify_source("return x;"), "return x;");
        assert_eq!(minify_source("let a = typeof b;"), "let a=typeof b;");
    }

    #[test]
    fn test_string_contents_untouched() {
        assert_eq!(
            minify_source("f( 'a  b' ,  \"c\\\"  d\" );"),
            "f('a  b',\"c\\\"  d\");"
        );
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(
            minify_source("a; // trailing\n/* block */ b;"),
            "a;b;"
        );
    }

    #[test]
    fn test_sign_operators_stay_separated() {
        // a--b is a decrement, not a subtraction of a negation
        assert_eq!(minify_source("let c = a - -b;"), "let c=a- -b;");
        assert_eq!(minify_source("let c = a + +b;"), "let c=a+ +b;");
        assert_eq!(minify_source("let c = a - b;"), "let c=a-b;");
        assert_eq!(minify_source("a-- - b;"), "a-- -b;");
    }

    #[test]
    fn test_comment_separates_words() {
        assert_eq!(minify_source("return/* c */x;"), "return x;");
        assert_eq!(minify_source("return // c\nx;"), "return x;");
    }

    #[test]
    fn test_idempotent() {
        let once = minify_source("const  a = 1;  f( a );");
        assert_eq!(minify_source(&once), once);
    }

    #[test]
    fn test_minify_file_missing_path_fails() {
        assert!(minify_file(Path::new("/nonexistent/artifact.js")).is_err());
    }

    #[test]
    fn test_minify_file_reads_from_disk() {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), "const  a  =  1;").unwrap();
        assert_eq!(minify_file(temp.path()).unwrap(), "const a=1;");
    }
}
