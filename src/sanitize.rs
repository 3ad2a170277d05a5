//! Rich-text sanitization.
//!
//! Travel descriptions, recommendations and pros/cons arrive as user-authored
//! HTML from a WYSIWYG editor. Before they are embedded raw into the book they
//! pass through [`clean`], which keeps structural and formatting markup and
//! drops scripts, event-handler attributes and `javascript:` URLs.
//!
//! Both rendering front doors call this one function; there is no second,
//! weaker code path.

use ammonia::Builder;
use maud::PreEscaped;
use std::collections::HashSet;
use std::sync::LazyLock;

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let tags: HashSet<&'static str> = [
        "a", "b", "blockquote", "br", "code", "em", "figcaption", "figure", "h1", "h2", "h3",
        "h4", "h5", "h6", "hr", "i", "img", "li", "ol", "p", "pre", "s", "small", "span",
        "strong", "sub", "sup", "table", "tbody", "td", "th", "thead", "tr", "u", "ul",
    ]
    .into_iter()
    .collect();

    let clean_content: HashSet<&'static str> = ["script", "style"].into_iter().collect();
    let url_schemes: HashSet<&'static str> = ["http", "https", "mailto"].into_iter().collect();

    let mut builder = Builder::new();
    builder
        .tags(tags)
        .clean_content_tags(clean_content)
        .url_schemes(url_schemes)
        .add_tag_attributes("img", &["src", "alt", "title", "width", "height"])
        .add_tag_attributes("a", &["href", "title"])
        .add_generic_attributes(&["class"]);
    builder
});

/// Strip unsafe markup from an untrusted HTML fragment.
///
/// Never fails: anything it can't keep safely is removed.
pub fn clean(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// [`clean`] wrapped for raw embedding in a `html!` template.
pub fn rich(html: &str) -> PreEscaped<String> {
    PreEscaped(clean(html))
}
