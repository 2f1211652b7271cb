//! Compiled textual patterns shared by module and dependency matchers.

use std::fmt;
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::{GraphError, Result};

/// Normalize a path for prefix comparison: forward slashes, cleaned, lower case.
pub fn normalize_path(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let cleaned = path_clean::clean(raw);
    cleaned.to_string_lossy().to_lowercase()
}

fn compile(source: &str, expression: &str) -> Result<Regex> {
    RegexBuilder::new(expression)
        .case_insensitive(true)
        .build()
        .map_err(|err| GraphError::InvalidPattern {
            pattern: source.to_string(),
            reason: err.to_string(),
        })
}

/// `|`-separated alternatives with `*` wildcards, compared case-insensitively
/// against the whole value.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let alternatives: Vec<String> = pattern
            .split('|')
            .map(|alternative| regex::escape(alternative.trim()).replace(r"\*", ".*"))
            .collect();
        let expression = format!("^(?:{})$", alternatives.join("|"));
        Ok(Self {
            source: pattern.to_string(),
            regex: compile(pattern, &expression)?,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A user regular expression anchored at both ends, case-insensitive.
#[derive(Debug, Clone)]
pub struct AnchoredRegex {
    source: String,
    regex: Regex,
}

impl AnchoredRegex {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
            regex: compile(pattern, &format!("^(?:{pattern})$"))?,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for AnchoredRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// `|`-separated absolute path prefixes, compared case-insensitively.
#[derive(Debug, Clone)]
pub struct PathPrefix {
    source: String,
    prefixes: Vec<String>,
}

impl PathPrefix {
    pub fn new(pattern: &str) -> Result<Self> {
        let prefixes: Vec<String> = pattern
            .split('|')
            .map(str::trim)
            .filter(|alternative| !alternative.is_empty())
            .map(|alternative| normalize_path(Path::new(alternative)))
            .collect();
        if prefixes.is_empty() {
            return Err(GraphError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "path pattern has no alternatives".to_string(),
            });
        }
        Ok(Self {
            source: pattern.to_string(),
            prefixes,
        })
    }

    pub fn is_match(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_pattern_alternatives_and_wildcards() {
        let pattern = NamePattern::new("Company.Core|Company.Data.*").unwrap();
        assert!(pattern.is_match("company.core"));
        assert!(pattern.is_match("Company.Data.Sql"));
        assert!(!pattern.is_match("Company.Core.Tests"));
        assert!(!pattern.is_match("Company.Data"));
    }

    #[test]
    fn test_name_pattern_escapes_regex_syntax() {
        let pattern = NamePattern::new("a+b(c)").unwrap();
        assert!(pattern.is_match("A+B(C)"));
        assert!(!pattern.is_match("aab(c)"));
    }

    #[test]
    fn test_anchored_regex() {
        let regex = AnchoredRegex::new(r"Company\.(Core|Api)").unwrap();
        assert!(regex.is_match("company.api"));
        assert!(!regex.is_match("Company.Api.Tests"));
        assert!(AnchoredRegex::new("(").is_err());
    }

    #[test]
    fn test_path_prefix() {
        let prefix = PathPrefix::new(r"C:\Work\Src|/opt/libs/").unwrap();
        assert!(prefix.is_match(Path::new("c:/work/src/App/App.csproj")));
        assert!(prefix.is_match(Path::new("/OPT/libs/x.dll")));
        assert!(!prefix.is_match(Path::new("/opt/other/x.dll")));
        assert!(PathPrefix::new(" | ").is_err());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new(r"C:\A\.\B\..\C\")), "c:/a/c");
    }
}
