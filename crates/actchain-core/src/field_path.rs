use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPathSegment {
    Key(String),
    Index(usize),
}

/// Location inside an invocation tree or a JSON value, rendered as `$.params.text[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<FieldPathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn from_segments(segments: Vec<FieldPathSegment>) -> Self {
        Self { segments }
    }

    /// Decodes an RFC 6901 pointer such as `/params/0/name`.
    pub fn from_json_pointer(pointer: &str) -> Self {
        if pointer.is_empty() || pointer == "/" {
            return Self::root();
        }

        let mut segments = Vec::new();
        for raw_segment in pointer.trim_start_matches('/').split('/') {
            if raw_segment.is_empty() {
                continue;
            }
            let decoded = raw_segment.replace("~1", "/").replace("~0", "~");
            if let Ok(index) = decoded.parse::<usize>() {
                segments.push(FieldPathSegment::Index(index));
            } else {
                segments.push(FieldPathSegment::Key(decoded));
            }
        }
        Self::from_segments(segments)
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(FieldPathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(FieldPathSegment::Index(index));
    }

    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push_key(key);
        child
    }

    /// Path of parameter `param` of the invocation node at `self`.
    pub fn param(&self, param: &str) -> Self {
        self.child_key("params").child_key(param)
    }

    pub fn joined(&self, suffix: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                FieldPathSegment::Key(key) => write!(f, ".{key}")?,
                FieldPathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "field_path_test.rs"]
mod tests;
