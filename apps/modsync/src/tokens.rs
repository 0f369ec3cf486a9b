//! Concealment and restoration of `\U`-style escape tokens, plus the
//! write-back encoder for astral code points.
//!
//! Rule text denotes Unicode code points as `\U` followed by eight uppercase
//! hex digits, including inside quoted regex literals. The structured-document
//! parser would interpret or reject those escapes, so `conceal` swaps each
//! token for a sentinel code point before parsing and `reveal` swaps it back
//! afterward. The sentinel can never occur in legitimate stored configuration
//! because `encode_special_characters` rewrites every astral code point into
//! escaped form before anything is written.

use regex::Regex;
use std::sync::LazyLock;

static ESCAPE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\U([0-9A-F]{8})").unwrap());

static CONCEALED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\u{1F986}([0-9A-F]{8})").unwrap());

/// Replace every `\U` + 8-hex-digit token with the sentinel + digits.
pub fn conceal(input: &str) -> String {
    ESCAPE_TOKEN.replace_all(input, "\u{1F986}${1}").into_owned()
}

/// Exact inverse of [`conceal`].
pub fn reveal(input: &str) -> String {
    CONCEALED_TOKEN.replace_all(input, "\\U${1}").into_owned()
}

/// Rewrite every code point above U+FFFF into `\U` + 8 uppercase hex digits,
/// leaving all other characters untouched. Applied to rule text at write-back
/// so high code points are stored in an ASCII-safe escaped form.
pub fn encode_special_characters(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        let code_point = ch as u32;
        if code_point > 0xFFFF {
            output.push_str(&format!("\\U{code_point:08X}"));
        } else {
            output.push(ch);
        }
    }
    output
}
