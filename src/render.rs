//! HTML dashboard rendering
//!
//! Produces one self-contained document: embedded style sheet, one card per
//! chart, and the chart runtime inlined exactly once so the report opens offline.

pub mod dashboard;

pub use dashboard::{render, Dashboard, CHART_RUNTIME, STYLE_SHEET};

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Make serialized JSON safe to place inside a `<script>` element.
pub(crate) fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("Strom & Gas <Q1> \"Nord\" 'Süd'"),
            "Strom &amp; Gas &lt;Q1&gt; &quot;Nord&quot; &#x27;Süd&#x27;"
        );
    }

    #[test]
    fn test_script_safe_json() {
        let json = r#"{"title":"</script><b>&"}"#;
        let safe = script_safe_json(json);
        assert!(!safe.contains("</script>"));
        assert_eq!(
            safe,
            r#"{"title":"\u003c/script\u003e\u003cb\u003e\u0026"}"#
        );
    }
}
