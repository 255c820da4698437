//! Print layout to XSL-FO
//!
//! The output is what an external formatter (FOP) turns into PDF.

use marblfa_core::Element;

use crate::error::Result;
use crate::template::{failed, Params, Template};

pub const FO_NAMESPACE: &str = "http://www.w3.org/1999/XSL/Format";

const MASTER_NAME: &str = "finding-aid";

/// The `xsl-fo` template
#[derive(Debug, Clone, Copy, Default)]
pub struct XslFo;

impl XslFo {
    pub const NAME: &'static str = "xsl-fo";
}

/// Page height and width
fn page_dimensions(page_size: &str) -> (&'static str, &'static str) {
    match page_size {
        "a4" => ("297mm", "210mm"),
        _ => ("11in", "8.5in"),
    }
}

/// Font family lists are passed through to the formatter verbatim
fn valid_font_family(value: &str) -> bool {
    !value.trim().is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | ','))
}

impl Template for XslFo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> &'static [&'static str] {
        &["page_size", "font_family"]
    }

    fn apply(&self, input: &Element, params: &Params<'_>) -> Result<Element> {
        let page_size = params.choice("page_size", &["letter", "a4"], "letter")?;
        let font_family = params.get_or("font_family", "serif");
        if !valid_font_family(font_family) {
            return Err(params.invalid(
                "font_family",
                font_family,
                "letters, digits, spaces, hyphens and commas",
            ));
        }
        if !input.is("layout") {
            return Err(failed(
                Self::NAME,
                format!("expected <layout>, found <{}>", input.name),
            ));
        }

        let (height, width) = page_dimensions(page_size);
        let masters = Element::new("fo:layout-master-set").with_child(
            Element::new("fo:simple-page-master")
                .with_attr("master-name", MASTER_NAME)
                .with_attr("page-height", height)
                .with_attr("page-width", width)
                .with_attr("margin", "0.75in")
                .with_child(Element::new("fo:region-body").with_attr("margin-bottom", "0.5in"))
                .with_child(Element::new("fo:region-after").with_attr("extent", "0.4in")),
        );

        let footer = Element::new("fo:static-content")
            .with_attr("flow-name", "xsl-region-after")
            .with_child(
                Element::new("fo:block")
                    .with_attr("text-align", "center")
                    .with_attr("font-size", "9pt")
                    .with_text("Page ")
                    .with_child(Element::new("fo:page-number")),
            );

        let mut flow = Element::new("fo:flow").with_attr("flow-name", "xsl-region-body");
        for child in input.elements() {
            match child.local_name() {
                "title" => flow.push(
                    block(child.normalized_text())
                        .with_attr("font-size", "16pt")
                        .with_attr("font-weight", "bold")
                        .with_attr("space-after", "6pt"),
                ),
                "subtitle" => flow.push(
                    block(child.normalized_text())
                        .with_attr("font-size", "12pt")
                        .with_attr("space-after", "12pt"),
                ),
                "section" => flow.push(section(child)),
                other => {
                    return Err(failed(Self::NAME, format!("unexpected layout element <{}>", other)))
                }
            }
        }

        let sequence = Element::new("fo:page-sequence")
            .with_attr("master-reference", MASTER_NAME)
            .with_attr("font-family", font_family)
            .with_attr("font-size", "11pt")
            .with_child(footer)
            .with_child(flow);

        Ok(Element::new("fo:root")
            .with_attr("xmlns:fo", FO_NAMESPACE)
            .with_child(masters)
            .with_child(sequence))
    }
}

fn block(text: impl Into<String>) -> Element {
    Element::new("fo:block").with_text(text)
}

fn section(section: &Element) -> Element {
    let mut out = Element::new("fo:block").with_attr("space-before", "12pt");
    if let Some(id) = section.attr("id") {
        out.set_attr("id", id);
    }
    if let Some(heading) = section.attr("heading") {
        out.push(
            block(heading)
                .with_attr("font-size", "13pt")
                .with_attr("font-weight", "bold")
                .with_attr("keep-with-next", "always")
                .with_attr("space-after", "4pt"),
        );
    }

    for child in section.elements() {
        let text = child.normalized_text();
        let rendered = match child.local_name() {
            "field" => Element::new("fo:block")
                .with_child(
                    Element::new("fo:inline")
                        .with_attr("font-weight", "bold")
                        .with_text(format!("{}: ", child.attr("label").unwrap_or_default())),
                )
                .with_text(text),
            "para" => block(text).with_attr("space-after", "6pt"),
            "item" => block(text).with_attr("start-indent", "12pt"),
            "entry" => entry(child, text),
            _ => block(text),
        };
        out.push(rendered);
    }
    out
}

fn entry(entry: &Element, label: String) -> Element {
    let depth: usize = entry
        .attr("depth")
        .and_then(|d| d.parse().ok())
        .unwrap_or(1);
    let mut out = Element::new("fo:block").with_attr("start-indent", format!("{}pt", 12 * depth));
    if entry.attr("level") == Some("series") {
        out.set_attr("font-weight", "bold");
        out.set_attr("space-before", "6pt");
    }
    if let Some(container) = entry.attr("container") {
        out.push(
            Element::new("fo:inline")
                .with_attr("font-style", "italic")
                .with_text(container),
        );
        out.push_text(" ");
    }
    out.push_text(label);
    out
}
