/// Derives a URL slug from a title: lowercase alphanumerics joined by
/// single hyphens, everything else dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_titles() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & Axum: a CMS!  "), "rust-axum-a-cms");
        assert_eq!(slugify("already-slugged"), "already-slugged");
        assert_eq!(slugify("Ünïcode Tïtle"), "ünïcode-tïtle");
        assert_eq!(slugify("!!!"), "");
    }
}
