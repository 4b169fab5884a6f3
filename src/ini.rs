//! Minimal INI reader for flat `key = value` sections.
//!
//! Supported syntax: `[section]` headers, `key = value` or `key: value` lines,
//! full-line `#` / `;` comments and blank lines. Keys are case-sensitive and
//! values are trimmed; there are no multi-line values. Entries in a `[DEFAULT]`
//! section are inherited by every other section.

use std::path::Path;

use crate::error::CaepError;

/// Section whose entries every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// One `key = value` line.
#[derive(Debug, Clone, PartialEq)]
pub struct IniEntry {
    pub key: String,
    pub value: String,
    /// 1-indexed line number in the source file.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<IniEntry>,
}

impl IniSection {
    /// Look up a key. When a key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&IniEntry> {
        self.entries.iter().rev().find(|e| e.key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// The named section with `[DEFAULT]` entries merged underneath it.
    ///
    /// Returns `None` if the document has no section called `name`.
    pub fn section(&self, name: &str) -> Option<IniSection> {
        let own = self.sections.iter().filter(|s| s.name == name);
        let mut entries: Vec<IniEntry> = Vec::new();
        let mut found = false;
        for section in own {
            found = true;
            entries.extend(section.entries.iter().cloned());
        }
        if !found {
            return None;
        }

        if name != DEFAULT_SECTION {
            let inherited: Vec<IniEntry> = self
                .sections
                .iter()
                .filter(|s| s.name == DEFAULT_SECTION)
                .flat_map(|s| s.entries.iter())
                .filter(|d| !entries.iter().any(|e| e.key == d.key))
                .cloned()
                .collect();
            entries.splice(0..0, inherited);
        }

        Some(IniSection {
            name: name.to_string(),
            entries,
        })
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }
}

/// Parse INI text. `path` is only used for error messages.
pub fn parse(content: &str, path: &Path) -> Result<IniDocument, CaepError> {
    let syntax = |line: usize, reason: &str| CaepError::IniSyntax {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    };

    let mut doc = IniDocument::default();

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(syntax(line_no, "unterminated section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(syntax(line_no, "empty section name"));
            }
            doc.sections.push(IniSection {
                name: name.to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let Some(split_at) = trimmed.find(['=', ':']) else {
            return Err(syntax(line_no, "expected `key = value`"));
        };
        let key = trimmed[..split_at].trim();
        if key.is_empty() {
            return Err(syntax(line_no, "missing key before separator"));
        }
        let value = trimmed[split_at + 1..].trim();

        let Some(section) = doc.sections.last_mut() else {
            return Err(syntax(line_no, "key/value pair before any [section] header"));
        };
        section.entries.push(IniEntry {
            key: key.to_string(),
            value: value.to_string(),
            line: line_no,
        });
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::TEST_INI;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/test/app.ini")
    }

    #[test]
    fn parses_sections_and_values() {
        let doc = parse(TEST_INI, &path()).unwrap();
        let test = doc.section("test").unwrap();
        assert_eq!(test.get("number").unwrap().value, "3");
        assert_eq!(test.get("str_arg").unwrap().value, "from ini");
        assert_eq!(test.get("str_arg").unwrap().line, 3);
        let other = doc.section("other").unwrap();
        assert_eq!(other.get("number").unwrap().value, "99");
    }

    #[test]
    fn colon_separator() {
        let doc = parse("[s]\nhost: example.org\n", &path()).unwrap();
        assert_eq!(doc.section("s").unwrap().get("host").unwrap().value, "example.org");
    }

    #[test]
    fn value_keeps_later_separators() {
        let doc = parse("[s]\nurl = http://x/?a=b\n", &path()).unwrap();
        assert_eq!(doc.section("s").unwrap().get("url").unwrap().value, "http://x/?a=b");
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let doc = parse("# top\n\n[s]\n; note\nk = v\n", &path()).unwrap();
        let s = doc.section("s").unwrap();
        assert_eq!(s.entries.len(), 1);
        assert_eq!(s.get("k").unwrap().line, 5);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let doc = parse("[s]\nName = a\n", &path()).unwrap();
        let s = doc.section("s").unwrap();
        assert!(s.get("name").is_none());
        assert!(s.get("Name").is_some());
    }

    #[test]
    fn empty_value_allowed() {
        let doc = parse("[s]\nintlist =\n", &path()).unwrap();
        assert_eq!(doc.section("s").unwrap().get("intlist").unwrap().value, "");
    }

    #[test]
    fn duplicate_key_last_wins() {
        let doc = parse("[s]\nk = 1\nk = 2\n", &path()).unwrap();
        assert_eq!(doc.section("s").unwrap().get("k").unwrap().value, "2");
    }

    #[test]
    fn missing_section_is_none() {
        let doc = parse(TEST_INI, &path()).unwrap();
        assert!(doc.section("absent").is_none());
    }

    #[test]
    fn default_section_inherited() {
        let content = "[DEFAULT]\nnumber = 7\nenabled = yes\n[test]\nnumber = 3\n";
        let doc = parse(content, &path()).unwrap();
        let test = doc.section("test").unwrap();
        assert_eq!(test.get("number").unwrap().value, "3");
        assert_eq!(test.get("enabled").unwrap().value, "yes");
    }

    #[test]
    fn repeated_section_headers_combine() {
        let doc = parse("[s]\na = 1\n[t]\nx = 0\n[s]\nb = 2\n", &path()).unwrap();
        let s = doc.section("s").unwrap();
        assert_eq!(s.get("a").unwrap().value, "1");
        assert_eq!(s.get("b").unwrap().value, "2");
        assert_eq!(doc.section_names().count(), 3);
    }

    #[test]
    fn key_before_section_is_error() {
        let err = parse("k = v\n", &path()).unwrap_err();
        match err {
            CaepError::IniSyntax { line, .. } => assert_eq!(line, 1),
            other => panic!("Expected IniSyntax, got {other:?}"),
        }
    }

    #[test]
    fn line_without_separator_is_error() {
        let err = parse("[s]\njust words\n", &path()).unwrap_err();
        match err {
            CaepError::IniSyntax { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected IniSyntax, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_header_is_error() {
        assert!(matches!(
            parse("[s\n", &path()),
            Err(CaepError::IniSyntax { .. })
        ));
    }
}
