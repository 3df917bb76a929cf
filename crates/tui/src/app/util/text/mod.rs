use unicode_width::UnicodeWidthChar;

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for ch in line.chars() {
        let ch_width = char_width(ch);
        if current_width + ch_width > width && !current.is_empty() {
            lines.push(current);
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    lines.push(current);
    lines
}

/// Neutralizes host-supplied text so it is drawn as literal characters.
///
/// ANSI escape sequences are dropped, tabs are expanded and other control
/// characters become spaces. Line feeds survive so multi-line body text keeps
/// its shape; callers that need a single line use [`sanitize_inline`].
pub fn sanitize_for_tui(value: &str) -> String {
    let mut out = String::new();
    let mut col = 0_usize;
    let tab_width = 4_usize;
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => {
                let Some(next) = chars.peek().copied() else {
                    continue;
                };

                if next == '[' {
                    // CSI: ESC [ ... final_byte
                    chars.next();
                    for seq in chars.by_ref() {
                        let code = seq as u32;
                        if (0x40..=0x7e).contains(&code) {
                            break;
                        }
                    }
                    continue;
                }

                if next == ']' {
                    // OSC: ESC ] ... BEL or ST (ESC \)
                    chars.next();
                    loop {
                        match chars.next() {
                            None => break,
                            Some('\x07') => break,
                            Some('\x1b') => {
                                if chars.peek().copied() == Some('\\') {
                                    chars.next();
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    continue;
                }

                // Two-byte escapes (charset selection and friends).
                let _ = chars.next();
            }
            '\n' => {
                out.push('\n');
                col = 0;
            }
            '\t' => {
                let next_stop = ((col / tab_width) + 1) * tab_width;
                let spaces = next_stop.saturating_sub(col).max(1);
                for _ in 0..spaces {
                    out.push(' ');
                }
                col += spaces;
            }
            '\r' => {}
            c if c.is_control() => {
                out.push(' ');
                col += 1;
            }
            c => {
                out.push(c);
                col += char_width(c);
            }
        }
    }

    out
}

/// Same as [`sanitize_for_tui`] but folds line breaks into spaces.
pub fn sanitize_inline(value: &str) -> String {
    sanitize_for_tui(value).replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::{sanitize_for_tui, sanitize_inline, wrap_line};

    #[test]
    fn sanitize_keeps_markup_as_literal_text() {
        let value = "<script>alert('x')</script> & <b>bold</b>";
        assert_eq!(sanitize_for_tui(value), value);
    }

    #[test]
    fn sanitize_strips_csi_and_osc_sequences() {
        let value = "a\x1b[31mred\x1b[0m b\x1b]0;title\x07c\x1b]8;;http://x\x1b\\d";
        assert_eq!(sanitize_for_tui(value), "ared bcd");
    }

    #[test]
    fn sanitize_expands_tabs_and_drops_carriage_returns() {
        assert_eq!(sanitize_for_tui("ab\tc\r\nd"), "ab  c\nd");
    }

    #[test]
    fn sanitize_replaces_other_controls_with_space() {
        assert_eq!(sanitize_for_tui("a\x07b\x00c"), "a b c");
    }

    #[test]
    fn sanitize_inline_folds_newlines() {
        assert_eq!(sanitize_inline("line1\nline2"), "line1 line2");
    }

    #[test]
    fn wrap_line_splits_on_width() {
        assert_eq!(wrap_line("abcdef", 4), vec!["abcd", "ef"]);
        assert!(wrap_line("abc", 0).is_empty());
        assert_eq!(wrap_line("", 5), vec![String::new()]);
    }
}
