/// 由标题生成 URL slug
///
/// 只保留 ASCII 字母数字，空白和连字符合并为单个 `-`，全部转小写。
/// 标题中没有任何可用字符时返回 `course`。
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "course".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Rust"), "intro-to-rust");
        assert_eq!(slugify("  C++ & Python:  Basics!  "), "c-python-basics");
        assert_eq!(slugify("Data -- Science"), "data-science");
        assert_eq!(slugify("snake_case title"), "snake_case-title");
        assert_eq!(slugify("!!!"), "course");
    }
}
