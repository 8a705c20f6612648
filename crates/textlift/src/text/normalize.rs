//! Markdown-stripping text normalization.
//!
//! Extractor backends (OCR, structural DOCX parsing) emit text littered with
//! markdown artifacts: heading markers, emphasis, table plumbing. The
//! normalizer runs a fixed, ordered sequence of rewrites that strips those
//! artifacts down to plain prose. It is a cosmetic cleanup, not a markdown
//! parser; nested or malformed constructs are handled best-effort.
//!
//! The rule order is load-bearing. Inline markers are unwrapped before pipes
//! are flattened so link labels survive, and table separator rows are removed
//! before the remaining pipes become spaces.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static IMAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("Image regex pattern is valid and should compile"));
static HEADING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s*").expect("Heading regex pattern is valid and should compile"));
static BULLET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("Bullet regex pattern is valid and should compile"));
static BLOCKQUOTE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*>\s?").expect("Blockquote regex pattern is valid and should compile"));
static INLINE_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("Inline code regex pattern is valid and should compile"));
static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("Bold regex pattern is valid and should compile"));
static BOLD_UNDERSCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_]+)__").expect("Bold underscore regex pattern is valid and should compile"));
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("Link regex pattern is valid and should compile"));
static TABLE_SEPARATOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\|?[\s:|-]+\|?$").expect("Table separator regex pattern is valid and should compile")
});
static EXCESS_NEWLINES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Excess newlines regex pattern is valid and should compile"));
static EXCESS_SPACES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("Excess spaces regex pattern is valid and should compile"));

fn apply<'a>(text: Cow<'a, str>, pattern: &Regex, replacement: &str) -> Cow<'a, str> {
    if pattern.is_match(&text) {
        Cow::Owned(pattern.replace_all(&text, replacement).into_owned())
    } else {
        text
    }
}

/// Strip markdown artifacts from extracted text.
///
/// Total function: never fails, empty input yields an empty output, and the
/// result never contains a `|` character. Applying it twice is the same as
/// applying it once.
pub fn normalize_extracted_text(value: &str) -> String {
    let mut text: Cow<'_, str> = if value.contains("\r\n") {
        Cow::Owned(value.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(value)
    };

    text = apply(text, &IMAGE_PATTERN, " ");
    text = apply(text, &HEADING_PATTERN, "");
    text = apply(text, &BULLET_PATTERN, "");
    text = apply(text, &BLOCKQUOTE_PATTERN, "");
    text = apply(text, &INLINE_CODE_PATTERN, "$1");
    text = apply(text, &BOLD_PATTERN, "$1");
    text = apply(text, &BOLD_UNDERSCORE_PATTERN, "$1");
    text = apply(text, &LINK_PATTERN, "$1");
    text = apply(text, &TABLE_SEPARATOR_PATTERN, "");

    if text.contains('|') {
        text = Cow::Owned(text.replace('|', " "));
    }

    text = apply(text, &EXCESS_NEWLINES_PATTERN, "\n\n");
    text = apply(text, &EXCESS_SPACES_PATTERN, " ");

    text.trim().to_string()
}
