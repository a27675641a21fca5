//! HTML escaping for user text.
//!
//! Titles, descriptions and comments are escaped before they are written to
//! the database and unescaped when read back for display or editing.

/// Escapes `& < > " '` for safe inclusion in HTML text and attributes.
///
/// ```rust
/// use bazaar_core::html::escape;
///
/// assert_eq!(escape("<b>\"hi\" & 'bye'</b>"), "&lt;b&gt;&#34;hi&#34; &amp; &#39;bye&#39;&lt;/b&gt;");
/// ```
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`], also accepting the common named and numeric forms.
///
/// Unknown or malformed entities are kept as-is.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // Entities are short; don't scan the whole remainder for ';'.
        let decoded = tail
            .char_indices()
            .take(12)
            .find(|&(_, c)| c == ';')
            .and_then(|(end, _)| decode_entity(&tail[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape("Vintage Lamp"), "Vintage Lamp");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let raw = "Tom & Jerry's <\"great\"> lamp";
        assert_eq!(unescape(&escape(raw)), raw);
    }

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape("&quot;a&quot; &#x27;b&#x27; &#60;"), "\"a\" 'b' <");
    }

    #[test]
    fn test_unescape_keeps_unknown_entities() {
        assert_eq!(unescape("AT&T &nbsp; &#zz; &"), "AT&T &nbsp; &#zz; &");
    }
}
