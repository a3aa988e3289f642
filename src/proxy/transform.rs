//! Response Transformer
//!
//! Decides by content type whether an upstream body is rewritten. HTML gets a
//! stylesheet link appended to `<head>` and a script appended to `<body>`;
//! everything else passes through untouched and is never decoded.
//!
//! Anchor hrefs are deliberately left as they are. Relative links already
//! resolve back through the proxy, so there is nothing to rewrite.

use std::cell::RefCell;
use std::rc::Rc;

use axum::body::Bytes;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use tracing::warn;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Content type of every rewritten HTML body.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

// == Injection ==
/// Asset references added to proxied HTML documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub stylesheet_href: String,
    pub script_src: String,
}

impl Injection {
    pub fn new(stylesheet_href: impl Into<String>, script_src: impl Into<String>) -> Self {
        Self {
            stylesheet_href: stylesheet_href.into(),
            script_src: script_src.into(),
        }
    }
}

// == Transformed ==
/// Body and content type to send back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub body: Bytes,
    pub content_type: Option<String>,
    /// Whether the assets were injected
    pub injected: bool,
}

impl Transformed {
    fn passthrough(body: Bytes, content_type: Option<&str>) -> Self {
        Self {
            body,
            content_type: content_type.map(str::to_string),
            injected: false,
        }
    }
}

/// Returns true for any content type in the `text/html` family.
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

// == Transform ==
/// Rewrites HTML bodies and passes every other body through byte-for-byte.
///
/// HTML that cannot be rewritten is also passed through unchanged; this never
/// fails.
pub fn transform(body: Bytes, content_type: Option<&str>, injection: &Injection) -> Transformed {
    if !content_type.is_some_and(is_html) {
        return Transformed::passthrough(body, content_type);
    }

    match inject_assets(&body, injection) {
        Some(html) => Transformed {
            body: Bytes::from(html),
            content_type: Some(HTML_CONTENT_TYPE.to_string()),
            injected: true,
        },
        None => {
            warn!(bytes = body.len(), "could not rewrite HTML, passing through");
            Transformed::passthrough(body, content_type)
        }
    }
}

// == Inject Assets ==
/// Parses `html`, appends the stylesheet link and the script, and serializes.
///
/// Returns None when `html` is not valid UTF-8, when the parsed document has no
/// head or body to attach to, or when serialization fails.
pub fn inject_assets(html: &[u8], injection: &Injection) -> Option<String> {
    // The parser decodes lossily; other charsets must reach the client as sent
    std::str::from_utf8(html).ok()?;

    let mut input = html;
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut input)
        .ok()?;

    let root = child_element(&dom.document, "html")?;
    let head = child_element(&root, "head")?;
    let body = child_element(&root, "body")?;

    append_child(
        &head,
        new_element(
            "link",
            &[("rel", "stylesheet"), ("href", &injection.stylesheet_href)],
        ),
    );
    append_child(&body, new_element("script", &[("src", &injection.script_src)]));

    let document: SerializableHandle = dom.document.clone().into();
    let mut out = Vec::with_capacity(html.len() + 128);
    serialize(&mut out, &document, SerializeOpts::default()).ok()?;

    String::from_utf8(out).ok()
}

/// First direct child that is an HTML element named `tag`.
fn child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            NodeData::Element { name, .. } => &*name.ns == HTML_NAMESPACE && &*name.local == tag,
            _ => false,
        })
        .cloned()
}

fn new_element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(*name)),
            value: (*value).into(),
        })
        .collect();

    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = r#"<link rel="stylesheet" href="/assets/inject.css">"#;
    const SCRIPT: &str = r#"<script src="/assets/inject.js"></script>"#;

    fn injection() -> Injection {
        Injection::new("/assets/inject.css", "/assets/inject.js")
    }

    fn rewrite(html: &str) -> String {
        let out = transform(
            Bytes::from(html.to_string()),
            Some("text/html; charset=utf-8"),
            &injection(),
        );
        assert!(out.injected);
        String::from_utf8(out.body.to_vec()).unwrap()
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("TEXT/HTML;charset=ISO-8859-1"));
        assert!(!is_html("application/xhtml+xml"));
        assert!(!is_html("image/png"));
        assert!(!is_html("application/javascript"));
        assert!(!is_html(""));
    }

    #[test]
    fn test_png_passes_through_byte_for_byte() {
        // Not valid UTF-8 on purpose
        let png = Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe]);

        let out = transform(png.clone(), Some("image/png"), &injection());

        assert_eq!(out.body, png);
        assert_eq!(out.content_type.as_deref(), Some("image/png"));
        assert!(!out.injected);
    }

    #[test]
    fn test_missing_content_type_passes_through() {
        let body = Bytes::from_static(b"<html><body>no header</body></html>");

        let out = transform(body.clone(), None, &injection());

        assert_eq!(out.body, body);
        assert_eq!(out.content_type, None);
    }

    #[test]
    fn test_html_gains_exactly_one_link_and_script() {
        let html = r#"<!DOCTYPE html><html><head><title>Home</title><link rel="icon" href="/favicon.ico"></head><body><p class="lead">Hello</p><script src="/app.js"></script></body></html>"#;

        let out = rewrite(html);

        assert_eq!(out.matches("<link").count(), 2);
        assert_eq!(out.matches("<script").count(), 2);
        assert_eq!(out.matches(LINK).count(), 1);
        assert_eq!(out.matches(SCRIPT).count(), 1);

        // Original content is preserved
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Home</title>"));
        assert!(out.contains(r#"<link rel="icon" href="/favicon.ico">"#));
        assert!(out.contains(r#"<p class="lead">Hello</p>"#));
        assert!(out.contains(r#"<script src="/app.js"></script>"#));
    }

    #[test]
    fn test_assets_are_appended_at_end_of_head_and_body() {
        let out = rewrite("<html><head><title>T</title></head><body><main>x</main></body></html>");

        assert!(out.contains(&format!("<title>T</title>{}</head>", LINK)));
        assert!(out.contains(&format!("<main>x</main>{}</body>", SCRIPT)));
    }

    #[test]
    fn test_rewritten_content_type_is_utf8_html() {
        let out = transform(
            Bytes::from_static(b"<p>hi</p>"),
            Some("text/html"),
            &injection(),
        );

        assert_eq!(out.content_type.as_deref(), Some(HTML_CONTENT_TYPE));
    }

    #[test]
    fn test_fragment_gets_synthesized_head_and_body() {
        let out = rewrite("<p>just a fragment</p>");

        assert!(out.contains("<p>just a fragment</p>"));
        assert_eq!(out.matches(LINK).count(), 1);
        assert_eq!(out.matches(SCRIPT).count(), 1);
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let soup = r#"<div><p>unclosed <b>bold <i>tag soup</div></span><td>cell<<>><!-- open comment"#;

        let out = transform(Bytes::from_static(soup.as_bytes()), Some("text/html"), &injection());
        let text = String::from_utf8_lossy(&out.body);

        if out.injected {
            assert!(text.contains("tag soup"));
            assert_eq!(text.matches(LINK).count(), 1);
            assert_eq!(text.matches(SCRIPT).count(), 1);
        } else {
            assert_eq!(&out.body[..], soup.as_bytes());
        }
    }

    #[test]
    fn test_frameset_document_passes_through_unchanged() {
        let html = "<html><head></head><frameset><frame src=\"a.html\"></frameset></html>";

        let out = transform(Bytes::from_static(html.as_bytes()), Some("text/html"), &injection());

        assert!(!out.injected);
        assert_eq!(&out.body[..], html.as_bytes());
        assert_eq!(out.content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn test_latin1_document_passes_through_unchanged() {
        let html: &[u8] = b"<html><head></head><body>caf\xe9</body></html>";

        let out = transform(
            Bytes::from_static(html),
            Some("text/html; charset=ISO-8859-1"),
            &injection(),
        );

        assert!(!out.injected);
        assert_eq!(&out.body[..], html);
        assert_eq!(out.content_type.as_deref(), Some("text/html; charset=ISO-8859-1"));
        assert_eq!(inject_assets(html, &injection()), None);
    }

    #[test]
    fn test_relative_anchor_hrefs_are_untouched() {
        let out = rewrite(r#"<body><a href="/watch/1">One</a><a href="other.html">Two</a></body>"#);

        assert!(out.contains(r#"<a href="/watch/1">One</a>"#));
        assert!(out.contains(r#"<a href="other.html">Two</a>"#));
    }

    #[test]
    fn test_injected_attributes_are_escaped() {
        let custom = Injection::new("/a.css?x=\"1\"", "/b.js");

        let html = inject_assets(b"<p>x</p>", &custom).unwrap();

        assert!(html.contains(r#"href="/a.css?x=&quot;1&quot;""#));
    }
}
