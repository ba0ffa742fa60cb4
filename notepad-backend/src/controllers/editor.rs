//! Editor page for the rendered (non-raw) read path.

use crate::notes::NoteName;

const EDITOR_TEMPLATE: &str = include_str!("../../templates/editor.html");

/// Escape text for embedding in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the editor page.
///
/// A new note opens straight into the textarea; an existing one opens in the
/// read-only view with an Edit toggle.
pub fn render_editor(name: &NoteName, content: &[u8], is_new_note: bool) -> String {
    let (editor_class, viewer_class) = if is_new_note {
        ("", "hidden")
    } else {
        ("hidden", "")
    };

    let escaped = escape_html(&String::from_utf8_lossy(content));

    // content goes last so nothing inside it is treated as a placeholder
    EDITOR_TEMPLATE
        .replace("{{title}}", &escape_html(name.as_str()))
        .replace("{{editor_class}}", editor_class)
        .replace("{{viewer_class}}", viewer_class)
        .replace("{{content}}", &escaped)
}
