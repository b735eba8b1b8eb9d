/// Normalize an optimized path.
///
/// Empty, whitespace-only and "/" all mean the domain root and collapse to
/// `None`. Anything else gets a leading "/" and loses any trailing "/".
pub fn normalize_path(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return None;
    }
    let mut path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    Some(path)
}

/// Human-readable node label: "domain.com/path" or bare "domain.com" at root.
pub fn node_label(domain_name: &str, optimized_path: Option<&str>) -> String {
    match optimized_path {
        Some(path) if path != "/" => format!("{domain_name}{path}"),
        _ => domain_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_forms_collapse_to_none() {
        assert_eq!(normalize_path(None), None);
        assert_eq!(normalize_path(Some("")), None);
        assert_eq!(normalize_path(Some("   ")), None);
        assert_eq!(normalize_path(Some("/")), None);
    }

    #[test]
    fn leading_slash_is_ensured() {
        assert_eq!(normalize_path(Some("blog")), Some("/blog".to_string()));
        assert_eq!(normalize_path(Some("/blog")), Some("/blog".to_string()));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(normalize_path(Some("/blog/")), Some("/blog".to_string()));
        assert_eq!(normalize_path(Some("blog///")), Some("/blog".to_string()));
    }

    #[test]
    fn nested_paths_keep_inner_slashes() {
        assert_eq!(
            normalize_path(Some("blog/2024/post/")),
            Some("/blog/2024/post".to_string())
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["", "/", "blog", "/blog/", "a/b/c/"] {
            let once = normalize_path(Some(raw));
            let twice = normalize_path(once.as_deref());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(node_label("money.com", None), "money.com");
        assert_eq!(node_label("support.com", Some("/blog")), "support.com/blog");
    }
}
