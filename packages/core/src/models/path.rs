//! Dotted paths into the form tree
//!
//! `emailGroup.email` addresses a field inside a group; numeric segments index
//! into lists (`addresses.0.city`). The empty path is the root group.

use crate::error::FormError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormPath {
    segments: Vec<String>,
}

impl FormPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Child path one level below this one
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Parent path, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Ancestors from the immediate parent up to and including the root
    pub fn ancestors(&self) -> Vec<FormPath> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut current = self.parent();
        while let Some(path) = current {
            current = path.parent();
            out.push(path);
        }
        out
    }
}

impl FromStr for FormPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if segments.iter().any(|seg| seg.trim().is_empty()) {
            return Err(FormError::invalid_path(s));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path: FormPath = "addresses.0.city".parse().unwrap();
        assert_eq!(path.segments(), ["addresses", "0", "city"]);
        assert_eq!(path.to_string(), "addresses.0.city");
        assert!("".parse::<FormPath>().unwrap().is_root());
    }

    #[test]
    fn test_rejects_empty_segments() {
        assert!(matches!(
            "emailGroup..email".parse::<FormPath>(),
            Err(FormError::InvalidPath { .. })
        ));
        assert!(".email".parse::<FormPath>().is_err());
    }

    #[test]
    fn test_ancestors_are_root_ward() {
        let path: FormPath = "addresses.0.city".parse().unwrap();
        let ancestors: Vec<String> = path.ancestors().iter().map(|p| p.to_string()).collect();
        assert_eq!(ancestors, vec!["addresses.0", "addresses", ""]);
        assert!(FormPath::root().ancestors().is_empty());
    }
}
