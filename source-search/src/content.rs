//! HTML content extraction: walks the DOM, skips boilerplate, returns text.
//!
//! The extractor picks a content root (`article`, `main`, `[role="main"]`,
//! then `body`), walks its subtree while skipping non-content elements
//! (scripts, styles, navigation, forms, hidden nodes), and inserts line
//! breaks at block boundaries so paragraphs stay separated.

use crate::error::{Result, SearchError};
use crate::types::PageContent;
use scraper::{ElementRef, Html, Selector};

/// Default maximum characters to return from extracted content.
pub const DEFAULT_MAX_CHARS: usize = 100_000;

/// Elements whose whole subtree is dropped.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "form",
    "template", "button", "select", "textarea",
];

/// Elements that start a new line in the extracted text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul",
    "ol", "blockquote", "pre", "table", "tr", "dd", "dt", "figcaption", "br", "hr",
];

/// Content roots in priority order. Within one selector the element with
/// the most text wins, so a teaser `<article>` does not shadow the real one.
const CONTENT_ROOTS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Extract readable text content from raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content is found.
pub fn extract_content(html: &str, url: &str) -> Result<PageContent> {
    extract_content_with_limit(html, url, DEFAULT_MAX_CHARS)
}

/// Extract readable text content from raw HTML, keeping at most `max_chars`
/// characters of text.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no extractable content is found.
pub fn extract_content_with_limit(html: &str, url: &str, max_chars: usize) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let text = normalise_lines(&extract_main_text(&document));
    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    let text = truncate_chars(text, max_chars);
    let word_count = text.split_whitespace().count();

    Ok(PageContent {
        url: url.to_owned(),
        title,
        text,
        word_count,
    })
}

/// Page title: `<title>`, then `og:title`, then the first `<h1>`.
fn extract_title(document: &Html) -> String {
    let from_text = |sel: &str| -> Option<String> {
        let selector = Selector::parse(sel).ok()?;
        let el = document.select(&selector).next()?;
        let t = collapse_spaces(&el.text().collect::<String>());
        (!t.is_empty()).then_some(t)
    };
    let from_meta = || -> Option<String> {
        let selector = Selector::parse("meta[property=\"og:title\"]").ok()?;
        let el = document.select(&selector).next()?;
        let t = collapse_spaces(el.value().attr("content")?);
        (!t.is_empty()).then_some(t)
    };

    from_text("title")
        .or_else(from_meta)
        .or_else(|| from_text("h1"))
        .unwrap_or_default()
}

fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_ROOTS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let best = document
            .select(&selector)
            .map(|el| {
                let mut out = String::new();
                collect_text(el, &mut out);
                out
            })
            .max_by_key(|t| t.trim().len());
        if let Some(text) = best {
            if !text.trim().is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }
        let Some(child_el) = ElementRef::wrap(child) else {
            continue;
        };
        let el = child_el.value();
        let name = el.name();
        if SKIPPED_ELEMENTS.contains(&name) || is_hidden(child_el) {
            continue;
        }
        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push('\n');
        }
        collect_text(child_el, out);
        if block {
            out.push('\n');
        }
    }
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let v = el.value();
    v.attr("hidden").is_some() || v.attr("aria-hidden") == Some("true")
}

/// Collapse runs of whitespace inside each line and drop empty lines.
fn normalise_lines(text: &str) -> String {
    text.lines()
        .map(collapse_spaces)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_spaces(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `max_chars` characters (not bytes).
fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_owned(),
        None => text,
    }
}
