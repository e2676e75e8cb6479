use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

fn ansi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI sequences, OSC sequences ended by BEL or ST, then two-byte escapes
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
            .expect("ANSI regex is valid")
    })
}

/// Remove terminal escape sequences such as colours and cursor movement.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    ansi_regex().replace_all(text, "")
}
