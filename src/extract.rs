// src/extract.rs
//
// Turns a fetched page into structured announcement records. Selector strings
// are configuration data; everything here goes through the narrow "containers
// matching X, first descendant matching Y, trimmed text" capability.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// One item on the source page at fetch time. Created during extraction,
/// consumed by the delivery pipeline within the same cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Raw displayed timestamp, trimmed.
    pub time_text: String,
    /// Displayed content, trimmed, blank-line runs collapsed.
    pub body_text: String,
    /// Full concatenated text of the container, used for fingerprinting.
    pub raw_text: String,
}

/// Parsed selectors, built once from config at startup. Invalid selector
/// strings are rejected during config validation, so failure here means the
/// process should not start.
#[derive(Debug, Clone)]
pub struct Selectors {
    container: Selector,
    body: Selector,
    time: Selector,
}

impl Selectors {
    pub fn parse(container: &str, body: &str, time_class: &str) -> Result<Self> {
        let container_sel = Selector::parse(container)
            .map_err(|e| anyhow!("announcement selector {container:?}: {e}"))?;
        let body_sel = Selector::parse(body)
            .map_err(|e| anyhow!("announcement body selector {body:?}: {e}"))?;
        let time_raw = format!(".{time_class}");
        let time_sel = Selector::parse(&time_raw)
            .map_err(|e| anyhow!("announcement time class {time_class:?}: {e}"))?;
        Ok(Self {
            container: container_sel,
            body: body_sel,
            time: time_sel,
        })
    }
}

/// Extract all announcements in document order. A container missing its time
/// label or body element is skipped with a diagnostic; one malformed item
/// never aborts the pass.
pub fn extract_announcements(html: &str, selectors: &Selectors) -> Vec<Announcement> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();
    for (index, container) in document.select(&selectors.container).enumerate() {
        if let Some(announcement) = extract_one(index, container, selectors) {
            out.push(announcement);
        }
    }
    out
}

fn extract_one(
    index: usize,
    container: ElementRef<'_>,
    selectors: &Selectors,
) -> Option<Announcement> {
    let Some(time_el) = container.select(&selectors.time).next() else {
        tracing::warn!(index, "skipping announcement container without time label");
        return None;
    };
    let Some(body_el) = container.select(&selectors.body).next() else {
        tracing::warn!(index, "skipping announcement container without body element");
        return None;
    };

    let raw_text: String = container.text().collect();
    let time_text = time_el.text().collect::<String>().trim().to_string();
    let body_text = collapse_blank_lines(body_el.text().collect::<String>().trim());

    Some(Announcement {
        time_text,
        body_text,
        raw_text,
    })
}

/// Collapse runs of blank lines (newlines with only whitespace between them)
/// to a single newline.
pub fn collapse_blank_lines(s: &str) -> String {
    static RE_BLANK: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re = RE_BLANK.get_or_init(|| regex::Regex::new(r"\n\s*\n").unwrap());
    re.replace_all(s, "\n").into_owned()
}
