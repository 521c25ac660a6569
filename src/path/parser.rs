use crate::error::{MapError, MapResult};

/// Upper bound on bracket indices. Rule sets are user-entered configuration;
/// a runaway index would otherwise force the accessor to allocate that many
/// padding elements.
const MAX_ARRAY_INDEX: usize = 4096;

/// Upper bound on segment count. Deep enough for any real schema; a bound
/// keeps a generated path from building an arbitrarily deep document tree.
const MAX_PATH_DEPTH: usize = 128;

/// One step of a parsed path: an object key or an array position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parse a mixed dotted/bracketed path into segments.
///
/// `a.b[2].c` becomes `[Key(a), Key(b), Index(2), Key(c)]`. A leading bracket
/// (`[0].name`) addresses a root-level array.
///
/// # Errors
///
/// Returns `MapError::MalformedPath` for an empty path, an empty segment
/// (`a..b`, trailing dot), unbalanced brackets, a non-numeric index, or a
/// path deeper than `MAX_PATH_DEPTH` segments.
pub fn parse_path(path: &str) -> MapResult<Vec<PathSegment>> {
    if path.is_empty() {
        return Err(MapError::malformed_path(path, "empty path"));
    }

    let mut segments = Vec::new();
    let mut key = String::new();
    // A key is required after a dot; a bare `a.` or `a..b` is malformed.
    let mut key_pending = true;
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if key.is_empty() {
                    return Err(MapError::malformed_path(
                        path.to_string(),
                        format!("empty segment before '.' in '{}'", path),
                    ));
                }
                segments.push(PathSegment::Key(std::mem::take(&mut key)));
                key_pending = true;
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                } else if key_pending && !segments.is_empty() {
                    return Err(MapError::malformed_path(
                        path.to_string(),
                        "expected a key between '.' and '['".to_string(),
                    ));
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        Some(other) => {
                            return Err(MapError::malformed_path(
                                path.to_string(),
                                format!("invalid character '{}' in array index", other),
                            ));
                        }
                        None => {
                            return Err(MapError::malformed_path(
                                path.to_string(),
                                "unbalanced brackets".to_string(),
                            ));
                        }
                    }
                }
                if digits.is_empty() {
                    return Err(MapError::malformed_path(
                        path.to_string(),
                        "empty array index".to_string(),
                    ));
                }
                let index: usize = digits.parse().map_err(|_| {
                    MapError::malformed_path(
                        path.to_string(),
                        format!("array index '{}' out of range", digits),
                    )
                })?;
                if index > MAX_ARRAY_INDEX {
                    return Err(MapError::malformed_path(
                        path.to_string(),
                        format!("array index {} exceeds maximum {}", index, MAX_ARRAY_INDEX),
                    ));
                }
                segments.push(PathSegment::Index(index));
                key_pending = false;
                // After `]` only `.`, another `[`, or the end may follow.
                match chars.peek() {
                    Some('.') => {
                        chars.next();
                        key_pending = true;
                        if chars.peek().is_none() {
                            return Err(MapError::malformed_path(
                                path.to_string(),
                                "trailing '.'".to_string(),
                            ));
                        }
                    }
                    Some('[') | None => {}
                    Some(other) => {
                        return Err(MapError::malformed_path(
                            path.to_string(),
                            format!("expected '.' or '[' after ']', found '{}'", other),
                        ));
                    }
                }
            }
            ']' => {
                return Err(MapError::malformed_path(
                    path.to_string(),
                    "unbalanced brackets".to_string(),
                ));
            }
            other => {
                key.push(other);
            }
        }
    }

    if !key.is_empty() {
        segments.push(PathSegment::Key(key));
    } else if key_pending {
        return Err(MapError::malformed_path(path, "trailing '.'"));
    }

    if segments.len() > MAX_PATH_DEPTH {
        return Err(MapError::malformed_path(
            path.to_string(),
            format!(
                "path depth {} exceeds maximum {}",
                segments.len(),
                MAX_PATH_DEPTH
            ),
        ));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        assert_eq!(
            parse_path("userName").unwrap(),
            vec![PathSegment::Key("userName".to_string())]
        );
    }

    #[test]
    fn test_parse_dotted_path() {
        assert_eq!(
            parse_path("name.givenName").unwrap(),
            vec![
                PathSegment::Key("name".to_string()),
                PathSegment::Key("givenName".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_mixed_notation() {
        assert_eq!(
            parse_path("a.b[2].c").unwrap(),
            vec![
                PathSegment::Key("a".to_string()),
                PathSegment::Key("b".to_string()),
                PathSegment::Index(2),
                PathSegment::Key("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_leading_index() {
        assert_eq!(
            parse_path("[0].value").unwrap(),
            vec![
                PathSegment::Index(0),
                PathSegment::Key("value".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_consecutive_indices() {
        assert_eq!(
            parse_path("matrix[1][2]").unwrap(),
            vec![
                PathSegment::Key("matrix".to_string()),
                PathSegment::Index(1),
                PathSegment::Index(2),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        for bad in [
            "", "a..b", ".a", "a.", "emails[", "emails[]", "emails[x]", "emails]0[", "a[0]b",
            "a.[0]", "a[0].",
        ] {
            assert!(
                matches!(parse_path(bad), Err(MapError::MalformedPath { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_index() {
        assert!(parse_path("a[999999]").is_err());
    }

    #[test]
    fn test_parse_bounds_path_depth() {
        let deep = vec!["a"; 20_000].join(".");
        assert!(matches!(
            parse_path(&deep),
            Err(MapError::MalformedPath { .. })
        ));

        let acceptable = vec!["a"; 64].join(".");
        assert_eq!(parse_path(&acceptable).unwrap().len(), 64);
    }
}
