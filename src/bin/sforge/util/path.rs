use std::path::{Path, PathBuf};

/// Output table next to a batch input: `<stem>.csv`, or
/// `<stem>_descriptors.csv` when the input already is that file.
pub fn batch_output_for(input: &Path) -> PathBuf {
    let candidate = input.with_extension("csv");
    if candidate == input {
        with_suffix(input, "_descriptors.csv")
    } else {
        candidate
    }
}

pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    path.with_file_name(format!("{}{}", stem.to_string_lossy(), suffix))
}
