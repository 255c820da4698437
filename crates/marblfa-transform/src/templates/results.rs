//! Browse and search result listing (HTML fragment)
//!
//! Input:
//!
//! ```text
//! <results>
//!   <alpha_list><letter>A</letter>...</alpha_list>
//!   <records letter="A" terms="..." page="1" pages="3" total="25">
//!     <record id="..."><name>...</name><unittitle/>...</record>
//!   </records>
//! </results>
//! ```
//!
//! Output: `<div class="content">` with the letter bar (browse mode), the
//! record list, and previous/next page links.

use marblfa_core::{sanitize_filename, Element, Record};
use url::form_urlencoded::Serializer;

use crate::error::Result;
use crate::template::{failed, Params, Template};

/// The `results` template
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsListing;

impl ResultsListing {
    pub const NAME: &'static str = "results";
}

impl Template for ResultsListing {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> &'static [&'static str] {
        &["mode", "label_text", "base_link", "pdf_link"]
    }

    fn apply(&self, input: &Element, params: &Params<'_>) -> Result<Element> {
        let mode = params.choice("mode", &["browse", "search"], "browse")?;
        let label = params.get_or("label_text", "Browse Collections Alphabetically:");
        let base_link = params.get_or("base_link", "browse");
        let pdf_link = params.get_or("pdf_link", "pdf");

        let records = input
            .child("records")
            .ok_or_else(|| failed(Self::NAME, "input has no <records> element"))?;
        let letter = records.attr("letter").unwrap_or("");
        let terms = records.attr("terms").unwrap_or("");

        let mut content = Element::new("div")
            .with_attr("class", "content")
            .with_attr("id", mode);

        if mode == "search" {
            content.push(
                Element::new("p")
                    .with_attr("class", "label")
                    .with_text(format!("Search results for: {}", terms)),
            );
        } else {
            content.push(Element::new("p").with_attr("class", "label").with_text(label));
            if let Some(alpha_list) = input.child("alpha_list") {
                content.push(letter_bar(alpha_list, letter, base_link));
            }
        }

        let total = records.attr("total").unwrap_or("0");
        let entries: Vec<&Element> = records.children_named("record").collect();
        if entries.is_empty() {
            content.push(
                Element::new("p")
                    .with_attr("class", "count")
                    .with_text("No matching collections found."),
            );
        } else {
            let noun = if total == "1" { "collection" } else { "collections" };
            content.push(
                Element::new("p")
                    .with_attr("class", "count")
                    .with_text(format!("{} {}", total, noun)),
            );
            let mut list = Element::new("dl").with_attr("class", "records");
            for entry in entries {
                let record = Record::from_result(entry)
                    .map_err(|e| failed(Self::NAME, format!("bad record: {}", e)))?;
                push_record(&mut list, &record, pdf_link);
            }
            content.push(list);
        }

        if let Some(nav) = pagination(records, mode, letter, terms, base_link) {
            content.push(nav);
        }
        Ok(content)
    }
}

fn link(base: &str, pairs: &[(&str, &str)]) -> String {
    let mut query = Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
    format!("{}?{}", base, query.finish())
}

fn letter_bar(alpha_list: &Element, current: &str, base_link: &str) -> Element {
    let mut bar = Element::new("ul").with_attr("class", "alpha-list");
    let letters = alpha_list
        .children_named("letter")
        .map(Element::normalized_text)
        .filter(|l| !l.is_empty())
        .map(|l| (l.clone(), l))
        .chain(std::iter::once(("all".to_string(), "All".to_string())));

    for (value, text) in letters {
        let mut anchor = Element::new("a").with_attr("href", link(base_link, &[("l", &value)]));
        if value == current {
            anchor.set_attr("class", "current");
        }
        bar.push(Element::new("li").with_child(anchor.with_text(text)));
    }
    bar
}

fn push_record(list: &mut Element, record: &Record, pdf_link: &str) {
    let anchor = Element::new("a")
        .with_attr("href", link(pdf_link, &[("id", &record.id)]))
        .with_text(record.list_title());
    list.push(
        Element::new("dt")
            .with_attr("id", sanitize_filename(&record.id))
            .with_child(anchor),
    );

    let mut detail = Element::new("dd");
    // Title repeats the heading when there is no origination name
    if record.origination.is_some() {
        if let Some(ref title) = record.title {
            detail.push(Element::new("span").with_attr("class", "title").with_text(title));
        }
    }
    if let Some(ref physdesc) = record.physdesc {
        detail.push(
            Element::new("span")
                .with_attr("class", "physdesc")
                .with_text(physdesc),
        );
    }
    if let Some(ref text) = record.abstract_text {
        detail.push(Element::new("p").with_attr("class", "abstract").with_text(text));
    }
    list.push(detail);
}

fn pagination(
    records: &Element,
    mode: &str,
    letter: &str,
    terms: &str,
    base_link: &str,
) -> Option<Element> {
    let page: usize = records.attr("page")?.parse().ok()?;
    let pages: usize = records.attr("pages")?.parse().ok()?;
    if pages <= 1 {
        return None;
    }

    let page_link = |number: usize| {
        let number = number.to_string();
        if mode == "search" {
            link(base_link, &[("q", terms), ("page", &number)])
        } else {
            link(base_link, &[("l", letter), ("page", &number)])
        }
    };

    let mut nav = Element::new("div").with_attr("class", "pagination");
    if page > 1 {
        nav.push(
            Element::new("a")
                .with_attr("class", "previous")
                .with_attr("href", page_link(page - 1))
                .with_text("previous"),
        );
    }
    nav.push(
        Element::new("span")
            .with_attr("class", "current")
            .with_text(format!("Page {} of {}", page, pages)),
    );
    if page < pages {
        nav.push(
            Element::new("a")
                .with_attr("class", "next")
                .with_attr("href", page_link(page + 1))
                .with_text("next"),
        );
    }
    Some(nav)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn input(records: &str, attrs: &str) -> Element {
        Element::parse(&format!(
            "<results><alpha_list><letter>A</letter><letter>B</letter></alpha_list><records {attrs}>{records}</records></results>"
        ))
        .unwrap()
    }

    fn apply(input: &Element, values: &[(&str, &str)]) -> Result<Element> {
        let values: BTreeMap<String, String> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ResultsListing.apply(input, &Params::new(ResultsListing::NAME, &values))
    }

    const ADAMS: &str = r#"<record id="coll 42"><name><persname>Adams, J.</persname></name><unittitle>Adams papers</unittitle><physdesc>1 box</physdesc><abstract>Letters.</abstract></record>"#;

    #[test]
    fn test_browse_listing() {
        let html = apply(
            &input(ADAMS, r#"letter="A" page="1" pages="1" total="1""#),
            &[("base_link", "browse-coll")],
        )
        .unwrap()
        .to_xml();
        assert!(html.contains(r#"<a href="browse-coll?l=A" class="current">A</a>"#));
        assert!(html.contains(r#"<a href="browse-coll?l=all">All</a>"#));
        assert!(html.contains(r#"<dt id="coll_42"><a href="pdf?id=coll+42">Adams, J.</a>"#));
        assert!(html.contains(r#"<span class="title">Adams papers</span>"#));
        assert!(html.contains("1 collection<"));
        assert!(!html.contains("pagination"));
    }

    #[test]
    fn test_empty_listing() {
        let html = apply(&input("", r#"letter="Q" total="0""#), &[]).unwrap().to_xml();
        assert!(html.contains("No matching collections found."));
    }

    #[test]
    fn test_search_mode_pagination() {
        let html = apply(
            &input(ADAMS, r#"terms="irish drama" page="2" pages="3" total="25""#),
            &[("mode", "search"), ("base_link", "search")],
        )
        .unwrap()
        .to_xml();
        assert!(html.contains("Search results for: irish drama"));
        assert!(!html.contains("alpha-list"));
        assert!(html.contains(r#"href="search?q=irish+drama&amp;page=1""#));
        assert!(html.contains(r#"href="search?q=irish+drama&amp;page=3""#));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn test_rejects_unknown_mode_and_bad_input() {
        let doc = input(ADAMS, "");
        assert!(apply(&doc, &[("mode", "full")]).is_err());
        assert!(apply(&Element::new("results"), &[]).is_err());
    }
}
