//! Source literal spellings to target literal spellings.
//!
//! Only the simple literals the outline keeps reach this module: numbers, booleans, characters, regular strings,
//! `null` and `default`.

/// Target spelling of a simple literal; `None` for `default`, which the caller renders as value-initialization.
pub fn literal(text: &str) -> Option<String> {
    let text = text.trim();
    match text {
        "default" => None,
        "null" => Some("nullptr".to_string()),
        "true" | "false" => Some(text.to_string()),
        _ if text.starts_with('\'') => Some(format!("U{text}")),
        _ if text.starts_with('"') => Some(text.to_string()),
        _ => Some(match text.strip_prefix('-') {
            Some(rest) => format!("-{}", number(rest.trim())),
            None => number(text),
        }),
    }
}

/// Rewrite the numeric tokens of a constant expression (enum values), leaving names and operators alone.
pub fn constant_expression(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || (c == '.' && token.starts_with(|d: char| d.is_ascii_digit())) {
            token.push(c);
            continue;
        }
        flush(&mut out, &mut token);
        out.push(c);
    }
    flush(&mut out, &mut token);
    out
}

fn flush(out: &mut String, token: &mut String) {
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        out.push_str(&number(token));
    } else {
        out.push_str(token);
    }
    token.clear();
}

/// Digit separators become `'`, suffixes become their target forms.
fn number(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let (prefix, body) = if lower.starts_with("0x") || lower.starts_with("0b") {
        (&text[..2], text[2..].trim_start_matches('_'))
    } else {
        ("", text)
    };
    let radix_prefixed = !prefix.is_empty();
    let suffix_len = body
        .chars()
        .rev()
        .take_while(|c| {
            let c = c.to_ascii_lowercase();
            matches!(c, 'u' | 'l') || (!radix_prefixed && matches!(c, 'f' | 'd' | 'm'))
        })
        .count();
    let (digits, suffix) = body.split_at(body.len() - suffix_len);
    let digits = digits.replace('_', "'");
    let suffix = suffix.to_ascii_lowercase();
    let is_real = !radix_prefixed && (digits.contains('.') || digits.contains(|c| c == 'e' || c == 'E'));
    let target_suffix = match suffix.as_str() {
        "" => "",
        "f" => "f",
        "d" | "m" => "",
        s if s.contains('u') && s.contains('l') => "ULL",
        s if s.contains('u') => "U",
        _ => "LL",
    };
    let needs_point = matches!(suffix.as_str(), "f" | "d" | "m") && !is_real;
    format!(
        "{prefix}{digits}{}{target_suffix}",
        if needs_point { ".0" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(literal("1_000_000").as_deref(), Some("1'000'000"));
        assert_eq!(literal("0xFF_FF").as_deref(), Some("0xFF'FF"));
        assert_eq!(literal("0xDD").as_deref(), Some("0xDD"));
        assert_eq!(literal("1.5f").as_deref(), Some("1.5f"));
        assert_eq!(literal("2F").as_deref(), Some("2.0f"));
        assert_eq!(literal("3.25d").as_deref(), Some("3.25"));
        assert_eq!(literal("10L").as_deref(), Some("10LL"));
        assert_eq!(literal("10UL").as_deref(), Some("10ULL"));
        assert_eq!(literal("1e3").as_deref(), Some("1e3"));
        assert_eq!(literal("-4").as_deref(), Some("-4"));
    }

    #[test]
    fn other_literals() {
        assert_eq!(literal("null").as_deref(), Some("nullptr"));
        assert_eq!(literal("'a'").as_deref(), Some("U'a'"));
        assert_eq!(literal("\"hi\"").as_deref(), Some("\"hi\""));
        assert_eq!(literal("default"), None);
    }

    #[test]
    fn enum_values_keep_names_and_operators() {
        assert_eq!(constant_expression("1 << 4"), "1 << 4");
        assert_eq!(constant_expression("Read | Write"), "Read | Write");
        assert_eq!(constant_expression("0x1_0u"), "0x1'0U");
    }
}
