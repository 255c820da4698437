//! Built-in templates

mod finding_aid;
mod results;
mod xsl_fo;

pub use finding_aid::FindingAidLayout;
pub use results::ResultsListing;
pub use xsl_fo::{XslFo, FO_NAMESPACE};
