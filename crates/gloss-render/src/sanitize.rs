#![forbid(unsafe_code)]

//! Strip terminal control sequences from segment text.
//!
//! Segment text is data. Anything in it that a terminal would execute (an
//! escape sequence, a C0 or C1 control, DEL) is removed before presenting,
//! so embedded bytes cannot move the cursor or leak styling past the
//! segment. TAB, LF and CR are kept.
//!
//! ```
//! use gloss_render::sanitize::strip_control_sequences;
//! use std::borrow::Cow;
//!
//! assert!(matches!(strip_control_sequences("plain"), Cow::Borrowed(_)));
//! assert_eq!(strip_control_sequences("a\x1b[31mb\x1b[0mc"), "abc");
//! ```

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

use memchr::memchr2;

const ESC: char = '\x1b';
const BEL: char = '\x07';

#[inline]
fn is_stripped(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\r' => false,
        '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => true,
        _ => false,
    }
}

/// Remove escape sequences and control characters, borrowing when there is
/// nothing to remove.
pub fn strip_control_sequences(text: &str) -> Cow<'_, str> {
    // ESC and DEL are the common offenders; check them with memchr first.
    let suspicious = memchr2(0x1b, 0x7f, text.as_bytes()).is_some()
        || text.chars().any(is_stripped);
    if !suspicious {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ESC {
            skip_escape(&mut chars);
        } else if !is_stripped(ch) {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Consume the rest of an escape sequence whose ESC was already read.
fn skip_escape(chars: &mut Peekable<Chars<'_>>) {
    match chars.next() {
        // CSI: parameters then a final byte in '@'..='~'.
        Some('[') => {
            for ch in chars.by_ref() {
                if ('@'..='~').contains(&ch) {
                    break;
                }
            }
        }
        // OSC ends at BEL or ST.
        Some(']') => skip_string(chars, true),
        // DCS, SOS, PM and APC end at ST.
        Some('P' | 'X' | '^' | '_') => skip_string(chars, false),
        // Two-character escapes, or a lone ESC.
        _ => {}
    }
}

fn skip_string(chars: &mut Peekable<Chars<'_>>, bel_terminates: bool) {
    while let Some(ch) = chars.next() {
        if bel_terminates && ch == BEL {
            return;
        }
        if ch == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        for text in ["", "hello", "tab\there", "line\r\n", "日本語"] {
            assert!(matches!(strip_control_sequences(text), Cow::Borrowed(_)), "{text:?}");
        }
    }

    #[test]
    fn csi_sequences_are_removed() {
        assert_eq!(strip_control_sequences("\x1b[1;31mred\x1b[0m"), "red");
        assert_eq!(strip_control_sequences("up\x1b[2Aa"), "upa");
    }

    #[test]
    fn osc_sequences_are_removed() {
        assert_eq!(
            strip_control_sequences("\x1b]8;;http://x\x1b\\link\x1b]8;;\x1b\\"),
            "link"
        );
        assert_eq!(strip_control_sequences("\x1b]0;title\x07after"), "after");
    }

    #[test]
    fn dcs_and_apc_are_removed() {
        assert_eq!(strip_control_sequences("a\x1bPq#0\x1b\\b"), "ab");
        assert_eq!(strip_control_sequences("a\x1b_payload\x1b\\b"), "ab");
    }

    #[test]
    fn controls_are_removed_but_whitespace_kept() {
        assert_eq!(strip_control_sequences("a\x07b\x08c\x7fd"), "abcd");
        assert_eq!(strip_control_sequences("a\u{9b}31mb"), "a31mb");
        assert_eq!(strip_control_sequences("x\ty\x1b[0m\n"), "x\ty\n");
    }

    #[test]
    fn unterminated_sequences_consume_the_rest() {
        assert_eq!(strip_control_sequences("ok\x1b[12"), "ok");
        assert_eq!(strip_control_sequences("ok\x1b]8;;url"), "ok");
        assert_eq!(strip_control_sequences("ok\x1b"), "ok");
    }

    #[test]
    fn two_character_escape() {
        assert_eq!(strip_control_sequences("a\x1b7b\x1b8c"), "abc");
    }
}
