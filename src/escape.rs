//! Plain-text escaping for interpolation into markup.
//!
//! Every plain-text field (titles, travel names, country names, raw URLs)
//! goes through here. Rich HTML fields go through [`crate::sanitize`] instead;
//! the two are never mixed up.
//!
//! Maud's own escaping leaves `'` untouched, so templates wrap plain text in
//! [`Text`] rather than interpolating `&str` directly.

use maud::Render;

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_into(&mut out, input);
    out
}

fn escape_into(out: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Plain text rendered through [`escape_html`] inside `html!` templates.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn render_to(&self, buffer: &mut String) {
        escape_into(buffer, self.0);
    }
}
