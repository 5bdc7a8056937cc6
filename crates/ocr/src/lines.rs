/// Collapse line-ending variants and return the trimmed, non-empty lines of
/// an OCR transcript, in document order.
///
/// OCR engines emit a mix of `\r\n`, lone `\r`, and `\n` depending on the
/// source platform; every downstream pass works on this one canonical
/// sequence. Empty or whitespace-only input yields an empty vector.
pub fn candidate_lines(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
