//! File name checks

/// Extension marker of the only supported format
pub const ACCEPTED_EXTENSION: &str = "pptx";

/// Whether a dropped file may enter the pipeline.
///
/// True iff the last four characters are exactly `pptx`. Case-sensitive,
/// and names shorter than the marker are simply rejected.
pub fn is_acceptable(file_name: &str) -> bool {
    file_name.ends_with(ACCEPTED_EXTENSION)
}

/// Strip the trailing extension marker from a file name.
///
/// `.pptx` is removed together with its dot; any other name, including one
/// ending in a bare `pptx`, comes back unchanged.
pub fn derive_file_name(file_name: &str) -> String {
    let dotted = format!(".{}", ACCEPTED_EXTENSION);

    file_name
        .strip_suffix(dotted.as_str())
        .unwrap_or(file_name)
        .to_string()
}
