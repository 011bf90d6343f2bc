use qanun_util::color::strip_ansi;

/// Escapes text for insertion into a markup fragment. Every `<`, `>`, `&`
/// and quote comes out as an entity, so no input yields live markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Makes server- or user-sourced text safe to place into terminal cells:
/// escape sequences are dropped and control characters other than newline
/// and tab are removed. Carriage returns become newlines.
pub fn sanitize_terminal(text: &str) -> String {
    let stripped = strip_ansi(text);
    let normalized = stripped.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .chars()
        .filter(|ch| *ch == '\n' || *ch == '\t' || !ch.is_control())
        .map(|ch| if ch == '\t' { ' ' } else { ch })
        .collect()
}
