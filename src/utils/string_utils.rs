/// Pure string processing utilities (Discord-agnostic)

/// Characters with a markdown meaning in Discord messages
const MARKDOWN_CHARS: [char; 7] = ['\\', '*', '_', '~', '`', '|', '>'];

/// Escape Discord markdown so user names render literally
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown_plain() {
        assert_eq!(escape_markdown("alice"), "alice");
        assert_eq!(escape_markdown(""), "");
    }

    #[test]
    fn test_escape_markdown_specials() {
        assert_eq!(escape_markdown("__bob__"), "\\_\\_bob\\_\\_");
        assert_eq!(escape_markdown("*star*"), "\\*star\\*");
        assert_eq!(escape_markdown("a|b~c`d>e\\f"), "a\\|b\\~c\\`d\\>e\\\\f");
    }
}
