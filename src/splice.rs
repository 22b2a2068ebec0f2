use crate::render::RenderedCatalog;

pub const CONTENT_START_MARKER: &str = "<!-- CONTENT START -->";
pub const CONTENT_END_MARKER: &str = "<!-- CONTENT END -->";

const SIDEBAR_NAV_OPEN: &str = r#"<nav class="sidebar-nav">"#;
const NAV_CLOSE: &str = "</nav>";
const MAIN_CONTENT_DIV: &str = r#"<div class="main-content">"#;
const MAIN_CONTENT_OPEN: &str = r#"<main class="main-content""#;
const MAIN_CLOSE: &str = "</main>";
const MODAL_OPEN: &str = r#"<div class="modal" id="imageModal""#;
const MODAL_OPEN_BARE: &str = r#"<div id="imageModal""#;

/// The document split around its replaceable content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub header: &'a str,
    pub footer: &'a str,
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack.get(from..)?.find(needle).map(|i| i + from)
}

/// Splits on the explicit content markers when both are present in order.
fn locate_by_markers(html: &str) -> Option<Region<'_>> {
    let start = html.find(CONTENT_START_MARKER)?;
    let header_end = start + CONTENT_START_MARKER.len();
    let footer_start = find_from(html, CONTENT_END_MARKER, header_end)?;
    Some(Region {
        header: &html[..header_end],
        footer: &html[footer_start..],
    })
}

/// Finds the `<main class="main-content">` body between the sidebar and the
/// image modal; the footer starts at the last `</main>` before the modal.
fn locate_by_structure(html: &str) -> Option<Region<'_>> {
    let sidebar_end = html.find(NAV_CLOSE).or_else(|| html.find(MAIN_CONTENT_DIV))?;
    let modal_start = html.find(MODAL_OPEN).or_else(|| html.find(MODAL_OPEN_BARE))?;

    let main_open = find_from(html, MAIN_CONTENT_OPEN, sidebar_end)?;
    let content_start = find_from(html, ">", main_open)? + 1;
    if content_start > modal_start {
        return None;
    }

    let closing = html[content_start..modal_start].rfind(MAIN_CLOSE)?;
    Some(Region {
        header: &html[..content_start],
        footer: &html[content_start + closing..],
    })
}

pub fn locate_region(html: &str) -> Option<Region<'_>> {
    if html.contains(CONTENT_START_MARKER) {
        if let Some(region) = locate_by_markers(html) {
            return Some(region);
        }
    }
    locate_by_structure(html)
}

/// Replaces the inner content of the sidebar `<nav>` in `header`, if present.
pub fn replace_sidebar(header: &str, sidebar: &str) -> String {
    let Some(nav_start) = header.find(SIDEBAR_NAV_OPEN) else {
        return header.to_string();
    };
    let Some(nav_end) = find_from(header, NAV_CLOSE, nav_start) else {
        return header.to_string();
    };
    let content_start = nav_start + SIDEBAR_NAV_OPEN.len();

    format!(
        "{}\n                <ul class=\"category-list\" id=\"categoryList\">\n{}\n                </ul>\n            {}",
        &header[..content_start],
        sidebar,
        &header[nav_end..]
    )
}

/// The updated document, or `None` when no content region can be found.
pub fn splice_document(html: &str, rendered: &RenderedCatalog) -> Option<String> {
    let region = locate_region(html)?;
    let header = replace_sidebar(region.header, &rendered.sidebar);
    Some(format!(
        "{}\n{}\n        {}",
        header, rendered.sections, region.footer
    ))
}
