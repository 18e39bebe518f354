//! Input bounds and text hygiene for visitor-submitted content.

pub const MAX_SLUG_CHARS: usize = 200;
pub const MAX_VISITOR_ID_CHARS: usize = 100;
pub const MAX_AUTHOR_CHARS: usize = 100;
pub const MAX_COMMENT_CHARS: usize = 2000;
pub const MAX_CONTACT_NAME_CHARS: usize = 100;
pub const MAX_CONTACT_SUBJECT_CHARS: usize = 200;
pub const MAX_CONTACT_MESSAGE_CHARS: usize = 5000;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_STATS_BATCH: usize = 100;

/// Escape `<`, `>` and `"` and trim surrounding whitespace.
pub fn sanitize_markup(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot with text on both
/// sides somewhere in the domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .filter(|(_, ch)| *ch == '.')
        .any(|(idx, _)| idx > 0 && idx + 1 < domain.len())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn exceeds(value: &str, max: usize) -> bool {
    char_len(value) > max
}

/// Visitor identifiers are opaque client tokens: bounded, printable, no spaces.
pub fn is_valid_visitor_id(value: &str) -> bool {
    !value.is_empty()
        && !exceeds(value, MAX_VISITOR_ID_CHARS)
        && !value
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control())
}
