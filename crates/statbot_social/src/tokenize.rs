//! Command-line tokenization.

/// Split command text into tokens.
///
/// Unquoted text is split on whitespace. A double-quoted span is one token
/// with the quotes removed, so `stats "john doe"` yields `["stats", "john
/// doe"]`. An unterminated quote runs to the end of the input. Quotes in the
/// middle of a word join the quoted text to that word.
///
/// ```
/// use statbot_social::tokenize;
///
/// assert_eq!(tokenize(r#"stats "john doe" --platform psn"#), vec![
///     "stats", "john doe", "--platform", "psn",
/// ]);
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}
