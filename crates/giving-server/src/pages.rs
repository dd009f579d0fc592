//! HTML Pages
//!
//! Templates are compiled into the binary; `{{ name }}` placeholders are
//! replaced with HTML-escaped values.

const INDEX: &str = include_str!("../templates/index.html");
const SUCCESS: &str = include_str!("../templates/success.html");
const CANCEL: &str = include_str!("../templates/cancel.html");

/// Name used on the success page when the session has none
pub const DEFAULT_FIRST_NAME: &str = "Friend";

pub fn index(stripe_publishable_key: &str) -> String {
    render(INDEX, &[("stripe_publishable_key", stripe_publishable_key)])
}

pub fn success(first_name: &str) -> String {
    render(SUCCESS, &[("first_name", first_name)])
}

pub fn cancel() -> String {
    CANCEL.to_string()
}

fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |page, (name, value)| {
        page.replace(&format!("{{{{ {name} }}}}"), &escape_html(value))
    })
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_injects_publishable_key() {
        let page = index("pk_test_abc");
        assert!(page.contains("pk_test_abc"));
        assert!(!page.contains("{{ stripe_publishable_key }}"));
    }

    #[test]
    fn test_success_escapes_name() {
        let page = success("<script>alert(1)</script>");
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"Tom & "Jerry""#), "Tom &amp; &quot;Jerry&quot;");
    }
}
