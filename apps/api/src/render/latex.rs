/// Escapes LaTeX special characters so arbitrary profile or generated text
/// can be interpolated into a document body.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '<' => out.push_str(r"\textless{}"),
            '>' => out.push_str(r"\textgreater{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes each item and joins them with `sep` (which is emitted verbatim).
pub fn escape_join(items: &[String], sep: &str) -> String {
    items
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| escape_latex(s))
        .collect::<Vec<_>>()
        .join(sep)
}
