//! HTML page shell. The template is compiled in; the client bundle mounts into `#app` and reads
//! its props from the `#app-props` JSON block.

use crate::manifest::ManifestChunk;
use serde::Serialize;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

pub const DEFAULT_HEADING: &str = "FastAPI Svelte Vercel Neon - Hard Code";
pub const FALLBACK_HEADING: &str = "FastAPI Svelte Vercel Neon - Error Fallback";

/// Props handed to the client component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageProps {
    pub heading: String,
}

pub struct IndexContext<'a> {
    pub title: &'a str,
    pub props: &'a PageProps,
    pub bundle: &'a ManifestChunk,
}

pub fn render_index(ctx: &IndexContext<'_>) -> String {
    let mut out = String::with_capacity(INDEX_TEMPLATE.len() + 256);
    let mut rest = INDEX_TEMPLATE;
    // Single pass: substituted values are never rescanned for placeholders.
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let name = &after[..end];
        match placeholder(ctx, name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn placeholder(ctx: &IndexContext<'_>, name: &str) -> Option<String> {
    match name {
        "title" => Some(escape_html(ctx.title)),
        "stylesheets" => Some(
            ctx.bundle
                .css_urls()
                .iter()
                .map(|href| format!(r#"    <link rel="stylesheet" href="{}">"#, escape_html(href)))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        "script" => Some(escape_html(&ctx.bundle.script_url())),
        "props" => Some(props_json(ctx.props)),
        _ => None,
    }
}

/// JSON safe to embed inside a `<script>` element.
fn props_json(props: &PageProps) -> String {
    serde_json::to_string(props)
        .unwrap_or_else(|_| "{}".into())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
