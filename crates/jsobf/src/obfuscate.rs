use crate::classify::IdentifierRecord;
use crate::crypto::{EncodedSecret, SecretFactory};

use anyhow::Result;
use rand::Rng;
use regex::Regex;

use std::collections::{hash_map::Entry, HashMap};

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// The program under transformation: the mutable source body plus the
/// accumulated decode declarations destined for the preamble.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub preamble: String,
    pub body: String,
}

impl Artifact {
    pub fn new(body: String) -> Self {
        Self {
            preamble: String::new(),
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// String pass
// ---------------------------------------------------------------------------

/// Replaces every distinct quoted string token with a bare alias and
/// appends one decode declaration per value to the preamble.
///
/// Must run before the identifier pass: identifier matching assumes
/// string text is already opaque and cannot be matched into.
pub fn obfuscate_strings(
    artifact: &mut Artifact,
    strings: &[String],
    factory: &SecretFactory,
) -> Result<()> {
    let mut rng = rand::thread_rng();
    for token in strings {
        let raw = &token[1..token.len() - 1];
        let alias = fresh_alias(&mut rng);
        let secret = factory.encode(raw)?;
        artifact
            .preamble
            .push_str(&format!("const {} = {};", alias, decode_expr(&secret)?));
        artifact.body = artifact.body.replace(token.as_str(), &alias);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Identifier pass
// ---------------------------------------------------------------------------

/// Per-name substitution state. One entry (and one keypair) per distinct
/// name, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentEntry {
    pub alias: String,
    pub secret: EncodedSecret,
    /// The name's binding was rewritten in place at its declaration, so
    /// every occurrence can reference the alias directly.
    pub declared: bool,
    /// The global-lookup declarations were already appended.
    pub emitted: bool,
}

/// Rewrites identifier occurrences in token order.
///
/// Declared names get their declaration rewritten to bind the alias
/// directly. Undeclared names are resolved through the ambient global
/// object in the preamble, with a `_C` companion holding the plain
/// decoded name for computed member access.
///
/// Matching is exact word-boundary textual search, not scope analysis:
/// same-named identifiers in different lexical scopes collapse into one
/// entry. Known limitation.
pub fn obfuscate_identifiers(
    artifact: &mut Artifact,
    records: &[IdentifierRecord],
    factory: &SecretFactory,
) -> Result<HashMap<String, IdentEntry>> {
    let mut rng = rand::thread_rng();
    let mut entries: HashMap<String, IdentEntry> = HashMap::new();

    for record in records {
        if record.ctor {
            continue;
        }

        let entry = match entries.entry(record.name.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(v) => v.insert(IdentEntry {
                alias: fresh_alias(&mut rng),
                secret: factory.encode(&record.name)?,
                declared: false,
                emitted: false,
            }),
        };

        if let Some(keyword) = record.declaration {
            entry.declared = true;
            let pattern = format!(
                r"\b{}\s+{}\b",
                keyword.as_str(),
                regex::escape(&record.name)
            );
            let replacement = format!("{} {}", keyword.as_str(), entry.alias);
            artifact.body = Regex::new(&pattern)?
                .replace_all(&artifact.body, replacement.as_str())
                .into_owned();
        }

        if !entry.emitted && !entry.declared {
            let expr = decode_expr(&entry.secret)?;
            artifact
                .preamble
                .push_str(&format!("const {} = W[{}];", entry.alias, expr));
            artifact
                .preamble
                .push_str(&format!("const {}_C = {};", entry.alias, expr));
            entry.emitted = true;
        }

        if !entry.declared && record.chain {
            let pattern = format!(r"\.{}\b", regex::escape(&record.name));
            let replacement = format!("[{}_C]", entry.alias);
            artifact.body = replace_guarded(&Regex::new(&pattern)?, &artifact.body, &replacement);
        } else {
            let pattern = format!(r"\b{}\b", regex::escape(&record.name));
            artifact.body = replace_guarded(&Regex::new(&pattern)?, &artifact.body, &entry.alias);
        }
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Support Functions
// ---------------------------------------------------------------------------

/// Builds the runtime expression decoding one secret, in terms of the
/// single-letter bindings the bootstrap sets up.
fn decode_expr(secret: &EncodedSecret) -> Result<String> {
    let jwk = serde_json::to_string(&secret.jwk)?;
    let cipher = serde_json::to_string(&secret.cipher)?;
    Ok(format!(
        "D(await T(O,await V(J,{},O,F,Y),new U({}).buffer))",
        jwk, cipher
    ))
}

/// A random 16-byte hex alias, re-prefixed when it would start with a
/// digit so it stays a valid identifier.
fn fresh_alias(rng: &mut impl Rng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    let mut alias: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    if alias.starts_with(|c: char| c.is_ascii_digit()) {
        alias.insert(0, '_');
    }
    alias
}

/// `replace_all` with a quote-adjacency guard: a match immediately
/// preceded or followed by a quote character is left alone, mirroring
/// the string-aware matching the passes rely on.
fn replace_guarded(re: &Regex, body: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for m in re.find_iter(body) {
        let prev = body[..m.start()].chars().next_back();
        let next = body[m.end()..].chars().next();
        let quoted = matches!(prev, Some('\'') | Some('"'))
            || matches!(next, Some('\'') | Some('"'));
        out.push_str(&body[last..m.start()]);
        if quoted {
            out.push_str(m.as_str());
        } else {
            out.push_str(replacement);
        }
        last = m.end();
    }
    out.push_str(&body[last..]);
    out
}
