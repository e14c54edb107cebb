/// Convert a profile name or prefix to a safe file-name stem
pub fn sanitize_filename(name: &str) -> String {
    let mut stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '&' | '=' | '#' | '%' | '*' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();

    // Limit length on a char boundary
    if stem.chars().count() > 100 {
        stem = stem.chars().take(100).collect();
    }

    if stem.is_empty() {
        "listings".to_string()
    } else {
        stem
    }
}
