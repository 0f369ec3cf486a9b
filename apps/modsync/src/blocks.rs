//! Rule block splitting and joining.
//!
//! A configuration blob is an ordered sequence of rule blocks separated by
//! delimiter lines. Any line starting with `---` is a delimiter; empty blocks
//! are dropped on both split and rejoin.

/// Marker beginning a delimiter line between rules.
pub const RULE_DELIMITER: &str = "---";

/// Collapse CRLF line endings to LF by dropping every carriage return.
/// Some stored configurations use CRLF; everything downstream assumes LF.
pub fn normalize_line_endings(input: &str) -> String {
    input.replace('\r', "")
}

/// Split a configuration blob into its non-empty rule blocks.
pub fn split_rules(blob: &str) -> Vec<String> {
    let mut rules: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in blob.split('\n') {
        if line.starts_with(RULE_DELIMITER) {
            let text = current.join("\n");
            if !text.is_empty() {
                rules.push(text);
            }
            current.clear();
        } else {
            current.push(line);
        }
    }
    let text = current.join("\n");
    if !text.is_empty() {
        rules.push(text);
    }
    rules
}

/// Join rule blocks back into a configuration blob.
pub fn join_rules(rules: &[String]) -> String {
    rules.join(&format!("\n{RULE_DELIMITER}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_delimiter_lines() {
        let blob = "first: 1\n---\nsecond: 2\nmore: 3\n----\nthird: 4";
        let rules = split_rules(blob);
        assert_eq!(rules, vec!["first: 1", "second: 2\nmore: 3", "third: 4"]);
    }

    #[test]
    fn test_split_drops_empty_blocks() {
        let blob = "---\n---\nonly: rule\n---\n";
        assert_eq!(split_rules(blob), vec!["only: rule"]);
        assert!(split_rules("").is_empty());
        assert!(split_rules("---").is_empty());
    }

    #[test]
    fn test_split_join_round_trip() {
        let rules = vec![
            "a: 1".to_string(),
            "b: 2\nc: 3".to_string(),
            "#include sub rule\nd: 4".to_string(),
        ];
        assert_eq!(split_rules(&join_rules(&rules)), rules);
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\r\n"), "a\nb\n");
        assert_eq!(normalize_line_endings("a\nb"), "a\nb");
    }
}
