/// Normalize pasted or typed text before it reaches a session buffer.
///
/// Line endings become `\n`, tabs become four spaces, and any other control
/// characters are dropped so they cannot corrupt the terminal surface.
pub fn sanitize_text_input(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut sanitized = String::with_capacity(normalized.len());

    for c in normalized.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => sanitized.push('\n'),
            _ if c.is_control() => {}
            _ => sanitized.push(c),
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_line_endings_collapse_to_one_newline() {
        assert_eq!(sanitize_text_input("one\r\ntwo\rthree"), "one\ntwo\nthree");
    }

    #[test]
    fn control_characters_are_dropped_and_tabs_expanded() {
        assert_eq!(sanitize_text_input("a\x07\tb\x00c\x1b"), "a    bc");
    }

    #[test]
    fn printable_text_is_untouched() {
        let text = "/image a red cube — ünïcödé";
        assert_eq!(sanitize_text_input(text), text);
    }
}
