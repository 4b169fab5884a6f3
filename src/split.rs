//! Delimiter splitting that honours backslash-escaped delimiters.
//!
//! `A\,B,C` split on `,` gives `["A,B", "C"]`. Only a backslash directly in
//! front of the delimiter is consumed; any other backslash is data.

/// Delimiter used when a list field declares none.
pub const DEFAULT_DELIMITER: &str = " ";

/// Split `input` on every `delimiter` not immediately preceded by a backslash,
/// then unescape `\<delimiter>` to `<delimiter>` inside each token.
///
/// Empty input yields one empty token and consecutive delimiters yield empty
/// tokens; callers that treat an empty string as "no items" must check first.
/// An empty `delimiter` falls back to [`DEFAULT_DELIMITER`].
pub fn split_escaped(input: &str, delimiter: &str) -> Vec<String> {
    let delimiter = if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    };
    let escaped = format!("\\{delimiter}");

    let mut tokens = Vec::new();
    let mut start = 0;
    for (idx, _) in input.match_indices(delimiter) {
        if input[..idx].ends_with('\\') {
            continue;
        }
        tokens.push(input[start..idx].replace(&escaped, delimiter));
        start = idx + delimiter.len();
    }
    tokens.push(input[start..].replace(&escaped, delimiter));
    tokens
}

/// Inverse of [`split_escaped`]: join items, escaping delimiters inside them.
pub fn join_escaped<S: AsRef<str>>(items: &[S], delimiter: &str) -> String {
    let delimiter = if delimiter.is_empty() {
        DEFAULT_DELIMITER
    } else {
        delimiter
    };
    let escaped = format!("\\{delimiter}");
    items
        .iter()
        .map(|item| item.as_ref().replace(delimiter, &escaped))
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_commas_stay_in_token() {
        assert_eq!(
            split_escaped(r"A\,B\,C,1\,2\,3", ","),
            vec!["A,B,C", "1,2,3"]
        );
    }

    #[test]
    fn default_delimiter_is_space() {
        assert_eq!(split_escaped("ABC 123", DEFAULT_DELIMITER), vec!["ABC", "123"]);
    }

    #[test]
    fn backslash_not_before_delimiter_survives() {
        assert_eq!(split_escaped(r"A\BC 123", " "), vec![r"A\BC", "123"]);
    }

    #[test]
    fn escaped_space() {
        assert_eq!(split_escaped(r"a\ b c", " "), vec!["a b", "c"]);
    }

    #[test]
    fn empty_input_yields_single_empty_token() {
        assert_eq!(split_escaped("", ","), vec![""]);
    }

    #[test]
    fn consecutive_delimiters_keep_empty_tokens() {
        assert_eq!(split_escaped("a,,b,", ","), vec!["a", "", "b", ""]);
    }

    #[test]
    fn multi_char_delimiter() {
        assert_eq!(split_escaped(r"a::b\::c::d", "::"), vec!["a", "b::c", "d"]);
    }

    #[test]
    fn empty_delimiter_falls_back_to_space() {
        assert_eq!(split_escaped("x y", ""), vec!["x", "y"]);
    }

    #[test]
    fn pure_function() {
        let input = r"one\,two,three";
        assert_eq!(split_escaped(input, ","), split_escaped(input, ","));
    }

    #[test]
    fn join_escapes_delimiters() {
        let joined = join_escaped(&["A,B", "C"], ",");
        assert_eq!(joined, r"A\,B,C");
        assert_eq!(split_escaped(&joined, ","), vec!["A,B", "C"]);
    }
}
