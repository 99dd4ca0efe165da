use crate::text::Typeface;

/// Break `text` into lines no wider than `max_width`, one character at a time
///
/// Breaking is character-granular so scripts without spaces wrap the same way
/// as Latin text; Latin words may be split. A `'\n'` ends the current line.
/// A character wider than `max_width` on its own still gets a line, so the
/// function always makes progress and never drops text. Empty lines are not
/// emitted.
pub fn wrap_text(font: &mut dyn Typeface, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch == '\n' {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch == '\r' {
            continue;
        }

        let mut candidate = current.clone();
        candidate.push(ch);

        if current.is_empty() || font.measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{test_font_bytes, BitmapFont, OutlineFont};

    // 6px per ASCII character, 12px per wide character
    fn font() -> BitmapFont {
        BitmapFont::new(8.0)
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_text(&mut font(), "", 100).is_empty());
        assert!(wrap_text(&mut font(), "\n\n", 100).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text(&mut font(), "hello", 30), vec!["hello"]);
    }

    #[test]
    fn test_breaks_mid_word() {
        // 4 characters fit in 24px
        assert_eq!(
            wrap_text(&mut font(), "abcdefghij", 24),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let mut f = font();
        let text = "The quick brown fox jumps over the lazy dog, 光影交错 in the evening.";
        for width in [12, 30, 61, 200] {
            for line in wrap_text(&mut f, text, width) {
                assert!(f.measure(&line) <= width, "{:?} wider than {}", line, width);
            }
        }
    }

    #[test]
    fn test_preserves_every_character() {
        let mut f = font();
        let text = "晨光里的咖啡杯, steam rising";
        let lines = wrap_text(&mut f, text, 40);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_outline_metrics_fill_lines_without_overflow() {
        let mut f = OutlineFont::from_bytes(test_font_bytes(), 28.0).unwrap();
        let text = "Harbour lights 港口的灯火 drift across the water, 晚风 carries them home.";

        for width in [60, 150, 320, 560] {
            let lines = wrap_text(&mut f, text, width);
            assert!(lines.len() > 1, "expected a wrap at {}px", width);
            assert_eq!(lines.concat(), text);

            for line in &lines {
                assert!(f.measure(line) <= width, "{:?} wider than {}", line, width);
            }
            // Each break happens only once the next character no longer fits
            for pair in lines.windows(2) {
                let mut longer = pair[0].clone();
                longer.extend(pair[1].chars().next());
                assert!(f.measure(&longer) > width, "{:?} fits in {}", longer, width);
            }
        }
    }

    #[test]
    fn test_oversized_character_gets_own_line() {
        // Wide glyphs are 12px, target is 5px
        assert_eq!(wrap_text(&mut font(), "光影", 5), vec!["光", "影"]);
    }

    #[test]
    fn test_newline_forces_break() {
        assert_eq!(wrap_text(&mut font(), "ab\ncd", 100), vec!["ab", "cd"]);
        assert_eq!(wrap_text(&mut font(), "ab\r\n\ncd", 100), vec!["ab", "cd"]);
    }
}
