use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};
use std::collections::{HashMap, HashSet};

const EXTRA_TAGS: &[&str] = &["img", "h1", "h2", "h3", "blockquote", "pre", "code"];
const LINK_REL: &str = "nofollow noopener noreferrer";

/// Markdown to display markup. Output only contains allow-listed tags and
/// every link opens in a new tab without referrer or opener.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut raw = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut raw, Parser::new_ext(source, options));

    let tag_attributes = HashMap::from([
        ("a", HashSet::from(["href", "name"])),
        ("img", HashSet::from(["src", "alt"])),
    ]);

    Builder::default()
        .add_tags(EXTRA_TAGS)
        .tag_attributes(tag_attributes)
        .link_rel(Some(LINK_REL))
        .set_tag_attribute_value("a", "target", "_blank")
        .clean(&raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown("# Hi\n\nSome **bold** text");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn strips_scripts_and_handlers() {
        let html = render_markdown("hello <script>alert(1)</script><img src=\"x.png\" onerror=\"boom()\">");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("x.png"));
    }

    #[test]
    fn links_are_forced_external() {
        let html = render_markdown("[site](https://example.org)");
        assert!(html.contains("href=\"https://example.org\""));
        assert!(html.contains("rel=\"nofollow noopener noreferrer\""));
        assert!(html.contains("target=\"_blank\""));
    }

    #[test]
    fn javascript_urls_are_dropped() {
        let html = render_markdown("[x](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }
}
