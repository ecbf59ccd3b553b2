//! Built-in renderer: an HTML shell with the payload embedded as JSON.

use std::fmt::Write as _;

use crate::config::schema::PagesConfig;
use crate::render::{Page, PageRenderer, RenderError};

/// Emits a document whose `#page-data` script holds the page payload and
/// whose bundle `{static_prefix}/{page}.js` renders it.
#[derive(Debug, Clone)]
pub struct ShellRenderer {
    site_title: String,
    lang: String,
    static_prefix: String,
}

impl ShellRenderer {
    pub fn new(config: &PagesConfig) -> Self {
        Self {
            site_title: config.site_title.clone(),
            lang: config.lang.clone(),
            static_prefix: config.static_prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl PageRenderer for ShellRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let data = escape_script_json(&serde_json::to_string(&page.payload())?);
        let title = match page.heading() {
            Some(heading) => format!("{} - {}", heading, self.site_title),
            None => self.site_title.clone(),
        };
        let prefix = escape_html(&self.static_prefix);

        let mut html = String::with_capacity(512 + data.len());
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"{lang}\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
                "<title>{title}</title>\n",
                "<link rel=\"stylesheet\" href=\"{prefix}/app.css\">\n",
                "</head>\n",
                "<body data-page=\"{name}\">\n",
                "<main id=\"app\"></main>\n",
                "<script type=\"application/json\" id=\"page-data\">{data}</script>\n",
                "<script src=\"{prefix}/{name}.js\" defer></script>\n",
                "</body>\n",
                "</html>\n"
            ),
            lang = escape_html(&self.lang),
            title = escape_html(&title),
            prefix = prefix,
            name = page.name(),
            data = data,
        );
        Ok(html)
    }
}

/// Escape text for element content and double-quoted attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON stays valid JSON; `</script>` and comment openers can't appear.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
