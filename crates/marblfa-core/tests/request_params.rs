//! Untrusted request parameters through to query text and records

use marblfa_core::query::MAX_TERMS;
use marblfa_core::{
    Element, LetterFilter, Paginator, QueryBuilder, Record, Selection, ValidationError,
};

fn builder() -> QueryBuilder {
    QueryBuilder::new("/db/findingaids")
}

#[test]
fn quotes_in_terms_stay_inside_literals() {
    let query = builder().search("o'brien ') or true() or ('").unwrap();
    let xquery = query.to_xquery();
    assert!(xquery.contains("'o''brien'"));
    assert!(!xquery.contains("') or true()"));
}

#[test]
fn lookup_id_is_escaped() {
    let xquery = builder().lookup("a'b&c").unwrap().to_xquery();
    assert!(xquery.contains("@id = 'a''b&amp;c'"));
}

#[test]
fn letter_defaults_and_all() {
    let default = builder().build(None, None).unwrap();
    let all = builder().build(Some("all"), None).unwrap();
    match (default.selection(), all.selection()) {
        (
            Selection::Browse { letter: first, .. },
            Selection::Browse { letter: second, .. },
        ) => {
            assert_eq!(first.as_param(), "A");
            assert_eq!(*second, LetterFilter::All);
        }
        other => panic!("unexpected selections {:?}", other),
    }
}

#[test]
fn oversized_requests_are_rejected() {
    let many = vec!["x"; MAX_TERMS + 1].join(" ");
    assert!(matches!(
        builder().search(&many),
        Err(ValidationError::TooManyTerms { .. })
    ));
    assert!(builder().search(&"y".repeat(65)).is_err());
    assert!(matches!(
        builder().search(" \t "),
        Err(ValidationError::EmptySearch)
    ));
}

#[test]
fn record_survives_result_element() {
    let ead = Element::parse(
        r#"<ead id="carter7"><archdesc><did>
             <origination><famname>Carter family</famname></origination>
             <unittitle>Carter family papers</unittitle>
             <physdesc>3 boxes</physdesc>
           </did></archdesc></ead>"#,
    )
    .unwrap();
    let record = Record::from_ead(&ead).unwrap();
    let back = Record::from_result(&record.to_result_element()).unwrap();

    assert_eq!(back.list_title(), "Carter family");
    assert_eq!(back.sort_key(), "carter family carter family papers");
    assert_eq!(back.physdesc.as_deref(), Some("3 boxes"));
}

#[test]
fn paging_never_leaves_range() {
    let items: Vec<u32> = (0..45).collect();
    let paginator = Paginator::new(20);

    let last = paginator.page(items.len(), Some("9"));
    assert_eq!(last.number, 3);
    assert_eq!(last.slice(&items), &items[40..]);

    let negative = paginator.page(items.len(), Some("-2"));
    assert_eq!(negative.number, 3);
    assert_eq!(negative.slice(&items).len(), 5);

    let first = paginator.page(items.len(), Some("page two"));
    assert_eq!(first.number, 1);
    assert_eq!(first.slice(&items).len(), 20);
}
