use crate::error::Result;
use crate::view_model::ViewModel;

const TEMPLATE: &str = include_str!("../templates/view.html");

/// Fills the page template. The page is self-contained: styles, script and
/// graph data are all inline.
pub fn render(model: &ViewModel) -> Result<String> {
    let json = serde_json::to_string(model)?;
    let title = format!("Reachability from {}", model.start);
    Ok(fill(
        TEMPLATE,
        &[
            ("TITLE", escape_html(&title)),
            ("NODE_COUNT", model.node_count.to_string()),
            ("EDGE_COUNT", model.edge_count.to_string()),
            ("GRAPH_JSON", escape_script(&json)),
        ],
    ))
}

/// Replaces each `{{KEY}}` in one pass over `template`; substituted text is
/// never scanned again. Unknown keys are left as they are.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let value = after.find("}}").and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

// JSON inside a <script> element must not contain a closing tag.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
