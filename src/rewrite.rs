//! URI rewriting module
//!
//! Appends the default document name to directory-like request URIs.
//! Only the final character is inspected: no slash collapsing, no
//! percent-decoding, no case folding.

use std::borrow::Cow;

/// Document served for directory-like paths
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Returns true when the URI ends with a path separator
///
/// `/` is a single ASCII byte, so a byte comparison is safe for any UTF-8 path.
pub fn is_directory_like(uri: &str) -> bool {
    uri.as_bytes().last() == Some(&b'/')
}

/// Append [`DEFAULT_DOCUMENT`] to a directory-like URI, otherwise return it unchanged
pub fn normalize(uri: &str) -> Cow<'_, str> {
    normalize_with(uri, DEFAULT_DOCUMENT)
}

/// Append `default_document` to a directory-like URI, otherwise return it unchanged
pub fn normalize_with<'a>(uri: &'a str, default_document: &str) -> Cow<'a, str> {
    if is_directory_like(uri) {
        let mut rewritten = String::with_capacity(uri.len() + default_document.len());
        rewritten.push_str(uri);
        rewritten.push_str(default_document);
        Cow::Owned(rewritten)
    } else {
        Cow::Borrowed(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_gets_index() {
        assert_eq!(normalize("/"), "/index.html");
    }

    #[test]
    fn test_directory_gets_index() {
        assert_eq!(normalize("/blog/"), "/blog/index.html");
        assert_eq!(normalize("/a/b/c/"), "/a/b/c/index.html");
    }

    #[test]
    fn test_file_path_unchanged() {
        assert_eq!(normalize("/blog/post"), "/blog/post");
        assert_eq!(normalize("/index.html"), "/index.html");
        assert!(matches!(normalize("/blog/post"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_unchanged() {
        assert_eq!(normalize(""), "");
        assert!(!is_directory_like(""));
    }

    #[test]
    fn test_only_last_char_inspected() {
        // Repeated slashes are kept as-is
        assert_eq!(normalize("//"), "//index.html");
        assert_eq!(normalize("/a//b//"), "/a//b//index.html");
        // Encoded slash is not a separator
        assert_eq!(normalize("/a%2F"), "/a%2F");
        // Backslash is not a separator
        assert_eq!(normalize("/a\\"), "/a\\");
    }

    #[test]
    fn test_multibyte_paths() {
        assert_eq!(normalize("/日本語/"), "/日本語/index.html");
        assert_eq!(normalize("/日本語"), "/日本語");
    }

    #[test]
    fn test_idempotent() {
        for uri in ["", "/", "/blog/", "/blog/post", "//", "/x/y/index.html"] {
            let once = normalize(uri).into_owned();
            let twice = normalize(&once).into_owned();
            assert_eq!(once, twice, "not idempotent for {uri:?}");
        }
    }

    #[test]
    fn test_appends_exactly_default_document() {
        for uri in ["/", "/blog/", "/x//"] {
            assert_eq!(normalize(uri), format!("{uri}{DEFAULT_DOCUMENT}"));
        }
    }

    #[test]
    fn test_custom_document() {
        assert_eq!(normalize_with("/docs/", "default.htm"), "/docs/default.htm");
        assert_eq!(normalize_with("/docs", "default.htm"), "/docs");
    }
}
