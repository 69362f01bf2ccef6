/// Splits a single line of CSV into its fields, trimming each one.
///
/// Commas inside a double-quoted span don't split fields, and a doubled quote inside such a span
/// (`""`) is read as one literal quote. An unterminated quote simply swallows the rest of the line
/// into the last field. There's always at least one field, even for an empty line (though callers
/// should skip those anyway).
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut in_quote = false;
    let mut current = String::new();

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quote && chars.peek() == Some(&'"') {
                    // Escaped quote, skip the second one
                    current.push('"');
                    chars.next();
                } else {
                    in_quote = !in_quote;
                }
            }
            ',' if !in_quote => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
