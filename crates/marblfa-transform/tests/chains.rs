//! Built-in chains end to end

use marblfa_core::Document;
use marblfa_transform::{TemplateRegistry, TransformError, TransformStage};

const EAD: &str = r#"<ead id="leverette135">
  <eadheader><eadid>leverette135.xml</eadid></eadheader>
  <archdesc level="collection">
    <did>
      <origination><persname>Leverette, Fannie Lee.</persname></origination>
      <unittitle>Fannie Lee Leverette scrapbooks</unittitle>
      <unitdate>circa 1958-1976</unitdate>
      <unitid>Manuscript Collection No. 135</unitid>
      <physdesc>0.25 linear ft. (1 box)</physdesc>
    </did>
    <bioghist><p>Born in Eatonton, Putnam County, Georgia.</p></bioghist>
    <dsc>
      <c01 level="series"><did><container type="box">1</container><unittitle>Scrapbooks</unittitle></did></c01>
    </dsc>
  </archdesc>
</ead>"#;

fn pdf_stages(mode: &str) -> Vec<TransformStage> {
    vec![
        TransformStage::new("finding-aid").param("mode", mode),
        TransformStage::new("xsl-fo")
            .param("page_size", "letter")
            .param("font_family", "serif"),
    ]
}

#[test]
fn pdf_chain_is_deterministic() {
    let registry = TemplateRegistry::with_builtins();
    let input = Document::new(EAD);
    let first = registry.apply(&input, &pdf_stages("full")).unwrap();
    let second = registry.apply(&input, &pdf_stages("full")).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn pdf_chain_produces_formatter_input() {
    let registry = TemplateRegistry::with_builtins();
    let fo = registry
        .apply(&Document::new(EAD), &pdf_stages("full"))
        .unwrap();
    let text = fo.as_str();
    assert!(text.starts_with(r#"<fo:root xmlns:fo="http://www.w3.org/1999/XSL/Format">"#));
    assert!(text.contains("Fannie Lee Leverette scrapbooks, circa 1958-1976"));
    assert!(text.contains("Born in Eatonton, Putnam County, Georgia."));
    assert!(text.contains("Box 1"));

    let root = fo.root().unwrap();
    assert_eq!(root.descendants_named("page-sequence").len(), 1);
}

#[test]
fn summary_mode_reaches_second_stage() {
    let registry = TemplateRegistry::with_builtins();
    let fo = registry
        .apply(&Document::new(EAD), &pdf_stages("summary"))
        .unwrap();
    assert!(fo.as_str().contains("Descriptive Summary"));
    assert!(!fo.as_str().contains("Container List"));
}

#[test]
fn stage_params_are_not_shared() {
    // page_size belongs to xsl-fo only
    let registry = TemplateRegistry::with_builtins();
    let err = registry
        .bind(&[TransformStage::new("finding-aid").param("page_size", "a4")])
        .unwrap_err();
    assert!(matches!(err, TransformError::UnknownParameter { .. }));
}

#[test]
fn wrong_stage_order_fails_in_second_stage() {
    let registry = TemplateRegistry::with_builtins();
    let err = registry
        .apply(
            &Document::new(EAD),
            &[TransformStage::new("xsl-fo"), TransformStage::new("finding-aid")],
        )
        .unwrap_err();
    assert!(matches!(err, TransformError::Failed { ref template, .. } if template == "xsl-fo"));
}
