//! Spreadsheet link parsing and rendering.

use url::Url;

use crate::entry::DatasetRef;

/// Canonical prefix of a spreadsheet edit link.
pub const CANONICAL_LINK_PREFIX: &str =
    "https://docs.google.com/a/google.com/spreadsheet/ccc?key=";

/// Canonical edit link for a dataset ref, suitable for pre-filling the
/// edit form.
pub fn canonical_link(dataset: &DatasetRef) -> String {
    format!("{CANONICAL_LINK_PREFIX}{dataset}")
}

/// Pull the dataset key out of a pasted spreadsheet URL.
///
/// Accepts any URL carrying a non-empty `key=` query parameter. Extra
/// parameters and `#gid=` fragments, which the spreadsheet UI likes to
/// append, are ignored.
pub fn dataset_ref(link: &str) -> Option<DatasetRef> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "key")
        .map(|(_, value)| DatasetRef::new(value.into_owned()))
        .filter(|dataset| !dataset.as_str().is_empty())
}
