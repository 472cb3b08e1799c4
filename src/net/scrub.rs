use std::borrow::Cow;

const MAX_ERROR_BODY_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Token prefixes that start a credential.
const TOKEN_PREFIXES: &[&str] = &["sk-", "sk_", "hf_", "ghp_", "github_pat_", "ya29.", "AIza"];

/// Markers followed by a credential value.
const VALUE_MARKERS: &[&str] = &[
    "Authorization: Bearer ",
    "authorization: bearer ",
    "Bearer ",
    "\"authorization\":\"Bearer ",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"token\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn redact_after(text: &mut String, marker: &str) {
    let mut from = 0;
    while let Some(rel) = text[from..].find(marker) {
        let start = from + rel;
        let value_start = start + marker.len();
        let value_len: usize = text[value_start..]
            .chars()
            .take_while(|c| is_token_char(*c))
            .map(char::len_utf8)
            .sum();

        if value_len == 0 {
            from = value_start;
            continue;
        }

        text.replace_range(start..value_start + value_len, REDACTED);
        from = start + REDACTED.len();
    }
}

/// Replace credential-looking substrings with `[REDACTED]`.
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    let hit = TOKEN_PREFIXES
        .iter()
        .chain(VALUE_MARKERS)
        .any(|p| input.contains(p));
    if !hit {
        return Cow::Borrowed(input);
    }

    let mut text = input.to_string();
    for marker in VALUE_MARKERS.iter().chain(TOKEN_PREFIXES) {
        redact_after(&mut text, marker);
    }
    Cow::Owned(text)
}

/// Redact secrets and cap length, for response bodies that end up in logs.
pub fn sanitize_error_body(input: &str) -> String {
    let text = redact_secrets(input);
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        None => text.into_owned(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}
