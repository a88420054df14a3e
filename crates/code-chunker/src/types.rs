use crate::error::{ChunkerError, Result};
use semigraph_analyzer::{ClassInfo, FileAnalysis, MethodCall, MethodInfo};
use serde::{Deserialize, Serialize};

/// Structural context shared by every chunk of one method (or file)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkContext {
    pub file_path: String,
    pub package_name: String,
    pub class_name: String,
    pub fields: Vec<String>,
    pub method_name: String,
    pub method_signature: String,
    pub method_calls: Vec<MethodCall>,
}

impl ChunkContext {
    pub fn for_method(analysis: &FileAnalysis, class: &ClassInfo, method: &MethodInfo) -> Self {
        Self {
            file_path: analysis.file_path.clone(),
            package_name: analysis.package_name.clone(),
            class_name: class.name.clone(),
            fields: class.fields.clone(),
            method_name: method.name.clone(),
            method_signature: method.describe_signature(),
            method_calls: method.calls.clone(),
        }
    }

    /// Whole-file context with no structural metadata
    pub fn for_file(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }
}

/// An embeddable slice of a method body or file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// `lowercase(filePath::className::methodName::index/total)`
    pub chunk_id: String,

    pub file_path: String,

    /// Empty when the file declares no package
    pub package_name: String,

    pub class_name: String,

    /// Field names of the declaring class
    #[serde(default)]
    pub fields: Vec<String>,

    pub method_name: String,

    pub method_signature: String,

    /// 1-based position within the method
    pub chunk_index: usize,

    pub chunk_count: usize,

    pub content: String,

    /// Every call in the method, repeated on each of its chunks
    #[serde(default)]
    pub method_calls: Vec<MethodCall>,
}

impl CodeChunk {
    /// Create a chunk at `chunk_index` of `chunk_count` within `context`
    pub fn new(
        context: &ChunkContext,
        chunk_index: usize,
        chunk_count: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            chunk_id: Self::make_id(
                &context.file_path,
                &context.class_name,
                &context.method_name,
                chunk_index,
                chunk_count,
            ),
            file_path: context.file_path.clone(),
            package_name: context.package_name.clone(),
            class_name: context.class_name.clone(),
            fields: context.fields.clone(),
            method_name: context.method_name.clone(),
            method_signature: context.method_signature.clone(),
            chunk_index,
            chunk_count,
            content: content.into(),
            method_calls: context.method_calls.clone(),
        }
    }

    /// Deterministic chunk identity
    pub fn make_id(
        file_path: &str,
        class_name: &str,
        method_name: &str,
        chunk_index: usize,
        chunk_count: usize,
    ) -> String {
        format!("{file_path}::{class_name}::{method_name}::{chunk_index}/{chunk_count}")
            .to_lowercase()
    }

    /// True for whole-file chunks without class or method
    pub fn is_file_chunk(&self) -> bool {
        self.class_name.is_empty() && self.method_name.is_empty()
    }

    /// Check that the id and position agree with the chunk's own fields
    pub fn validate(&self) -> Result<()> {
        if self.chunk_index == 0 || self.chunk_index > self.chunk_count {
            return Err(ChunkerError::invalid_chunk_id(
                &self.chunk_id,
                format!("index {} outside 1..={}", self.chunk_index, self.chunk_count),
            ));
        }

        let expected = Self::make_id(
            &self.file_path,
            &self.class_name,
            &self.method_name,
            self.chunk_index,
            self.chunk_count,
        );
        if self.chunk_id != expected {
            return Err(ChunkerError::invalid_chunk_id(
                &self.chunk_id,
                format!("expected '{expected}'"),
            ));
        }

        Ok(())
    }

    /// Text handed to the embedding backend: a structural header, then the code
    pub fn embedding_text(&self) -> String {
        if self.is_file_chunk() {
            return format!(
                "File: {}\nChunk: {}/{}\n\n{}",
                self.file_path, self.chunk_index, self.chunk_count, self.content
            );
        }

        let package = if self.package_name.trim().is_empty() {
            "(default)"
        } else {
            self.package_name.as_str()
        };
        let fields = if self.fields.is_empty() {
            "(none)".to_string()
        } else {
            self.fields.join(", ")
        };
        let calls = if self.method_calls.is_empty() {
            "(none)".to_string()
        } else {
            self.method_calls
                .iter()
                .map(|call| format!("{}{}", call.display_name(), call.arguments_or_default()))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "File: {}\nPackage: {package}\nClass: {}\nFields: {fields}\nMethod: {}\nSignature: {}\nChunk: {}/{}\nCalls: {calls}\n\n{}",
            self.file_path,
            self.class_name,
            self.method_name,
            self.method_signature,
            self.chunk_index,
            self.chunk_count,
            self.content
        )
    }
}
