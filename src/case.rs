//! Kebab-case normalization of single path segments.
//!
//! A segment is split into tokens by an explicit left-to-right tokenizer and
//! the lower-cased tokens are joined with `-`. At every position the first
//! rule that applies wins:
//!
//! 1. **Acronym run**: two or more uppercase letters. When the run is directly
//!    followed by a lowercase letter, its last capital starts the next word
//!    (`HTMLParser` -> `HTML`, `Parser`); a run that would shrink below two
//!    letters this way is not an acronym. Digits, separators and the end of
//!    the segment all end the run as a whole, so `API_Docs` is `api-docs`.
//!    Older site tooling only ended a run before a capitalized word or at a
//!    word boundary and spelled such names letter by letter (`a-p-i-docs`);
//!    this tokenizer does not.
//! 2. **Word**: an optional capital, one or more lowercase letters, then any
//!    trailing digits (`Page`, `page`, `Version2`).
//! 3. **Lone capital**: one uppercase letter plus trailing digits (`V2`, `A`).
//! 4. **Digit run**: one or more digits.
//!
//! Any other byte (`_`, `-`, spaces, punctuation, non-ASCII) separates tokens
//! and is dropped.
//!
//! Segments that are already canonical (`[a-z0-9-]*`) are returned untouched,
//! and screaming-snake segments (`[A-Z0-9_]*`) are lower-cased before
//! tokenizing so `README` becomes `readme` rather than an acronym.

/// Returns the canonical kebab-case form of `segment`.
///
/// Segments that produce no tokens at all (`.`, `..`, `_`) are returned
/// unchanged.
pub fn normalize(segment: &str) -> String {
    if is_canonical(segment) {
        return segment.to_string();
    }

    let source = if is_screaming_snake(segment) {
        segment.to_ascii_lowercase()
    } else {
        segment.to_string()
    };

    let tokens = tokenize(&source);
    if tokens.is_empty() {
        return segment.to_string();
    }

    tokens
        .iter()
        .map(|token| token.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether `segment` matches `^[a-z0-9-]*$`.
pub fn is_canonical(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_screaming_snake(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Splits `segment` into word tokens, preserving their original case.
pub fn tokenize(segment: &str) -> Vec<&str> {
    let bytes = segment.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let len = acronym_len(bytes, i)
            .or_else(|| word_len(bytes, i))
            .or_else(|| capital_len(bytes, i))
            .or_else(|| digits_len(bytes, i));

        match len {
            Some(len) => {
                tokens.push(&segment[i..i + len]);
                i += len;
            }
            None => i += 1,
        }
    }

    tokens
}

/// Length of the run starting at `start` whose bytes all satisfy `pred`.
fn run(bytes: &[u8], start: usize, pred: fn(&u8) -> bool) -> usize {
    bytes[start..].iter().take_while(|&b| pred(b)).count()
}

fn acronym_len(bytes: &[u8], i: usize) -> Option<usize> {
    let upper = run(bytes, i, u8::is_ascii_uppercase);
    if upper < 2 {
        return None;
    }
    match bytes.get(i + upper) {
        Some(next) if next.is_ascii_lowercase() => (upper > 2).then_some(upper - 1),
        _ => Some(upper),
    }
}

fn word_len(bytes: &[u8], i: usize) -> Option<usize> {
    let lead = usize::from(bytes[i].is_ascii_uppercase());
    let lower = run(bytes, i + lead, u8::is_ascii_lowercase);
    if lower == 0 {
        return None;
    }
    let digits = run(bytes, i + lead + lower, u8::is_ascii_digit);
    Some(lead + lower + digits)
}

fn capital_len(bytes: &[u8], i: usize) -> Option<usize> {
    if !bytes[i].is_ascii_uppercase() {
        return None;
    }
    Some(1 + run(bytes, i + 1, u8::is_ascii_digit))
}

fn digits_len(bytes: &[u8], i: usize) -> Option<usize> {
    let digits = run(bytes, i, u8::is_ascii_digit);
    (digits > 0).then_some(digits)
}
