//! EAD finding aid to print layout
//!
//! Produces the intermediate `<layout>` document the `xsl-fo` template
//! renders:
//!
//! ```text
//! <layout id="abbey244" mode="full">
//!   <title>Abbey Theatre collection, 1900-1950</title>
//!   <subtitle>Manuscript, Archives, and Rare Book Library</subtitle>
//!   <section id="descriptive_summary" heading="Descriptive Summary">
//!     <field label="Creator">Abbey Theatre.</field>
//!   </section>
//!   <section id="dsc" heading="Container List">
//!     <entry level="series" depth="1" container="Box 1">Series 1</entry>
//!   </section>
//! </layout>
//! ```

use marblfa_core::record::DID_PATH;
use marblfa_core::Element;

use crate::error::Result;
use crate::template::{failed, Params, Template};

/// Index terms listed under "Selected Search Terms"
const ACCESS_TERMS: &[&str] = &[
    "persname",
    "corpname",
    "famname",
    "subject",
    "geogname",
    "genreform",
    "occupation",
    "title",
];

/// The `finding-aid` template
#[derive(Debug, Clone, Copy, Default)]
pub struct FindingAidLayout;

impl FindingAidLayout {
    pub const NAME: &'static str = "finding-aid";
}

impl Template for FindingAidLayout {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> &'static [&'static str] {
        &["mode"]
    }

    fn apply(&self, input: &Element, params: &Params<'_>) -> Result<Element> {
        let mode = params.choice("mode", &["full", "summary"], "full")?;

        // Lookups arrive wrapped in <results>
        let ead = if input.is("ead") {
            input
        } else {
            input
                .child("ead")
                .ok_or_else(|| failed(Self::NAME, "input has no <ead> element"))?
        };
        let did = ead
            .find(DID_PATH)
            .ok_or_else(|| failed(Self::NAME, "finding aid has no archdesc/did"))?;
        let archdesc = ead.child("archdesc").unwrap_or(did);

        let id = ead
            .attr("id")
            .map(str::to_string)
            .or_else(|| ead.find_text("eadheader/eadid"))
            .unwrap_or_default();

        let mut layout = Element::new("layout")
            .with_attr("id", id)
            .with_attr("mode", mode)
            .with_child(Element::new("title").with_text(title(ead, did)));
        if let Some(repository) = did.find_text("repository") {
            layout.push(Element::new("subtitle").with_text(repository));
        }
        layout.push(descriptive_summary(did));

        if mode == "full" {
            for (tag, id, heading) in [
                ("bioghist", "biography", "Biographical Note"),
                ("scopecontent", "scope_content", "Scope and Content Note"),
            ] {
                if let Some(section) = archdesc.child(tag).and_then(|note| notes(note, id, heading)) {
                    layout.push(section);
                }
            }
            if let Some(terms) = archdesc.child("controlaccess").and_then(control_access) {
                layout.push(terms);
            }
            if let Some(dsc) = archdesc.child("dsc").and_then(container_list) {
                layout.push(dsc);
            }
        }
        Ok(layout)
    }
}

fn title(ead: &Element, did: &Element) -> String {
    let base = did
        .find_text("unittitle")
        .or_else(|| ead.find_text("eadheader/filedesc/titlestmt/titleproper"))
        .unwrap_or_else(|| "Untitled finding aid".to_string());
    match did.find_text("unitdate") {
        Some(date) if !base.contains(&date) => format!("{}, {}", base, date),
        _ => base,
    }
}

fn section(id: &str, heading: &str) -> Element {
    Element::new("section")
        .with_attr("id", id)
        .with_attr("heading", heading)
}

fn non_empty(section: Element) -> Option<Element> {
    let empty = section.elements().next().is_none();
    (!empty).then_some(section)
}

fn descriptive_summary(did: &Element) -> Element {
    let mut summary = section("descriptive_summary", "Descriptive Summary");
    let fields = [
        ("Creator", did.find_text("origination")),
        ("Title", did.find_text("unittitle")),
        ("Dates", did.find_text("unitdate")),
        ("Call Number", did.find_text("unitid")),
        ("Extent", did.find_text("physdesc")),
        ("Abstract", did.find_text("abstract")),
        ("Language", did.find_text("langmaterial")),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            summary.push(
                Element::new("field")
                    .with_attr("label", label)
                    .with_text(value),
            );
        }
    }
    summary
}

/// Paragraph section; `None` when the note has no text
fn notes(note: &Element, id: &str, heading: &str) -> Option<Element> {
    let mut out = section(id, heading);
    let paras = note.descendants_named("p");
    if paras.is_empty() {
        let text = note.normalized_text();
        if text.is_empty() {
            return None;
        }
        out.push(Element::new("para").with_text(text));
        return Some(out);
    }
    for p in paras {
        let text = p.normalized_text();
        if !text.is_empty() {
            out.push(Element::new("para").with_text(text));
        }
    }
    non_empty(out)
}

fn control_access(controlaccess: &Element) -> Option<Element> {
    let mut out = section("control_access", "Selected Search Terms");
    collect_access_terms(controlaccess, &mut out);
    non_empty(out)
}

fn collect_access_terms(element: &Element, out: &mut Element) {
    for child in element.elements() {
        if ACCESS_TERMS.iter().any(|term| *term == child.local_name()) {
            let text = child.normalized_text();
            if !text.is_empty() {
                out.push(
                    Element::new("item")
                        .with_attr("type", child.local_name())
                        .with_text(text),
                );
            }
        } else {
            collect_access_terms(child, out);
        }
    }
}

/// Component elements: unnumbered `c` or `c01` through `c12`
fn is_component(element: &Element) -> bool {
    match element.local_name().strip_prefix('c') {
        Some("") => true,
        Some(n) => n.len() == 2 && n.parse::<u8>().is_ok_and(|n| (1..=12).contains(&n)),
        None => false,
    }
}

fn container_list(dsc: &Element) -> Option<Element> {
    let mut out = section("dsc", "Container List");
    collect_components(dsc, 1, &mut out);
    non_empty(out)
}

fn collect_components(parent: &Element, depth: usize, out: &mut Element) {
    for component in parent.elements().filter(|e| is_component(e)) {
        let did = component.child("did");
        let mut label = did
            .and_then(|d| d.find_text("unittitle"))
            .unwrap_or_default();
        if let Some(date) = did.and_then(|d| d.find_text("unitdate")) {
            if label.is_empty() {
                label = date;
            } else {
                label = format!("{}, {}", label, date);
            }
        }

        let mut entry = Element::new("entry")
            .with_attr("level", component.attr("level").unwrap_or("file"))
            .with_attr("depth", depth.to_string());
        let container = did.map(containers).unwrap_or_default();
        if !container.is_empty() {
            entry.set_attr("container", container);
        }
        out.push(entry.with_text(label));

        collect_components(component, depth + 1, out);
    }
}

/// "Box 1 Folder 2" from `<container type="box">1</container>...`
fn containers(did: &Element) -> String {
    did.children_named("container")
        .map(|c| {
            let value = c.normalized_text();
            match c.attr("type") {
                Some(kind) => format!("{} {}", capitalize(kind), value),
                None => value,
            }
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
