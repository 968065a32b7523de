//! HTML rendering of the display region.

use std::sync::Mutex;

use super::sink::ResultSink;
use crate::kernel::event::SinkUpdate;
use crate::kernel::format::ContentKind;

/// Escape HTML special characters for safe rendering.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Keeps the HTML fragment a page would place in its result region.
///
/// With `escape` off, markup formats are inserted as-is and the page interprets them.
/// Plain-text formats and status messages are always escaped.
pub struct HtmlSink {
    escape: bool,
    fragment: Mutex<String>,
}

impl HtmlSink {
    pub fn new(escape: bool) -> Self {
        Self {
            escape,
            fragment: Mutex::new(String::new()),
        }
    }

    pub fn fragment(&self) -> String {
        self.fragment.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn render(&self, update: SinkUpdate<'_>) -> String {
        match update {
            SinkUpdate::Rendered { format, body } => {
                let body = match format.content_kind() {
                    ContentKind::Markup if !self.escape => body.to_string(),
                    _ => html_escape(body),
                };
                format!("<pre data-format=\"{}\">{}</pre>", format, body)
            }
            other => format!("<p class=\"status\">{}</p>", html_escape(other.text())),
        }
    }
}

impl ResultSink for HtmlSink {
    fn show(&self, update: SinkUpdate<'_>) {
        let rendered = self.render(update);
        *self.fragment.lock().unwrap_or_else(|e| e.into_inner()) = rendered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::event::FailureReason;
    use crate::kernel::format::OutputFormat;

    #[test]
    fn test_html_escape_combined() {
        assert_eq!(
            html_escape("<a href=\"test\">foo & bar</a>"),
            "&lt;a href=&quot;test&quot;&gt;foo &amp; bar&lt;/a&gt;"
        );
    }

    #[test]
    fn status_messages_are_paragraphs() {
        let sink = HtmlSink::new(false);
        sink.show(SinkUpdate::Processing);
        assert_eq!(sink.fragment(), "<p class=\"status\">Processing ...</p>");

        sink.show(SinkUpdate::Failed(FailureReason::Invocation));
        assert_eq!(sink.fragment(), "<p class=\"status\">Error invoking REST call</p>");
    }

    #[test]
    fn markup_passes_through_unless_escaping() {
        let xmi = "<xmi:XMI/>";

        let raw = HtmlSink::new(false);
        raw.show(SinkUpdate::Rendered { format: OutputFormat::Xmi, body: xmi });
        assert_eq!(raw.fragment(), "<pre data-format=\"xmi\"><xmi:XMI/></pre>");

        let escaped = HtmlSink::new(true);
        escaped.show(SinkUpdate::Rendered { format: OutputFormat::Xmi, body: xmi });
        assert_eq!(escaped.fragment(), "<pre data-format=\"xmi\">&lt;xmi:XMI/&gt;</pre>");
    }

    #[test]
    fn plain_text_is_always_escaped() {
        let sink = HtmlSink::new(false);
        sink.show(SinkUpdate::Rendered { format: OutputFormat::Pretty, body: "BP < 120" });
        assert_eq!(sink.fragment(), "<pre data-format=\"pretty\">BP &lt; 120</pre>");
    }
}
