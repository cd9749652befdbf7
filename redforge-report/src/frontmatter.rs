//! YAML frontmatter generation for the Markdown report artifacts.

/// Generates the leading YAML frontmatter block for one report: `id`,
/// `title`, and `tags`. Values containing YAML-special characters are
/// quoted; plain values are left bare to match how the rest of this
/// report's Markdown is kept unquoted.
#[must_use]
pub fn generate(id: &str, title: &str, tags: &[&str]) -> String {
    let mut lines = Vec::new();
    lines.push("---".to_string());
    lines.push(format!("id: {id}"));
    lines.push(format!("title: {}", quote_yaml_string(title)));

    if !tags.is_empty() {
        lines.push("tags:".to_string());
        for tag in tags {
            lines.push(format!("  - {tag}"));
        }
    }

    lines.push("---".to_string());
    lines.join("\n")
}

fn quote_yaml_string(s: &str) -> String {
    if s.contains(':') || s.contains('#') || s.contains('"') || s.starts_with(' ') {
        let escaped = s.replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_frontmatter() {
        let fm = generate("eval-1", "demo-target", &["prompt_injection"]);
        assert!(fm.starts_with("---"));
        assert!(fm.ends_with("---"));
        assert!(fm.contains("id: eval-1"));
        assert!(fm.contains("title: demo-target"));
        assert!(fm.contains("  - prompt_injection"));
    }

    #[test]
    fn no_tags_omits_tags_block() {
        let fm = generate("eval-1", "demo-target", &[]);
        assert!(!fm.contains("tags:"));
    }

    #[test]
    fn quotes_special_characters() {
        assert_eq!(quote_yaml_string("Name: with colon"), "\"Name: with colon\"");
        assert_eq!(quote_yaml_string("Plain Name"), "Plain Name");
    }
}
