/// True when the text is empty or consists only of whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns the text when it is present and not blank.
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|value| !is_blank(value))
}
