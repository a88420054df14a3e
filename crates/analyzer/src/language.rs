use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language of an indexed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Kotlin,
    JavaScript,
    TypeScript,
    Python,
    Go,
    Rust,
    Cpp,
    C,
    CSharp,
    Ruby,
    Php,
    Swift,
    Scala,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" | "pyw" => Language::Python,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "c" | "h" => Language::C,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "swift" => Language::Swift,
            "scala" | "sc" => Language::Scala,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Scala => "scala",
            Language::Unknown => "unknown",
        }
    }

    /// Check if structural analysis is available for this language
    pub fn supports_analysis(self) -> bool {
        self.grammar_profile().is_some()
    }

    /// Node-kind table used by the structural walk
    pub fn grammar_profile(self) -> Option<&'static GrammarProfile> {
        match self {
            Language::Java => Some(&JAVA_GRAMMAR),
            _ => None,
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Java => Ok(tree_sitter_java::LANGUAGE.into()),
            _ => Err(AnalyzerError::unsupported_language(self.as_str())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntax node kinds the structural walk matches on
#[derive(Debug)]
pub struct GrammarProfile {
    pub package_kinds: &'static [&'static str],
    pub package_name_kinds: &'static [&'static str],
    pub type_kinds: &'static [&'static str],
    /// Wrapper nodes inside a type body whose children are members too
    pub member_group_kinds: &'static [&'static str],
    pub field_kinds: &'static [&'static str],
    pub declarator_kind: &'static str,
    pub method_kinds: &'static [&'static str],
    pub modifiers_kind: &'static str,
    pub parameter_kinds: &'static [&'static str],
    pub spread_parameter_kind: &'static str,
    pub invocation_kind: &'static str,
    /// Record-style headers whose components become fields
    pub component_list_field: &'static str,
}

pub static JAVA_GRAMMAR: GrammarProfile = GrammarProfile {
    package_kinds: &["package_declaration"],
    package_name_kinds: &["scoped_identifier", "identifier"],
    type_kinds: &[
        "class_declaration",
        "interface_declaration",
        "enum_declaration",
        "record_declaration",
        "annotation_type_declaration",
    ],
    member_group_kinds: &["enum_body_declarations"],
    field_kinds: &["field_declaration", "constant_declaration"],
    declarator_kind: "variable_declarator",
    method_kinds: &[
        "method_declaration",
        "constructor_declaration",
        "compact_constructor_declaration",
    ],
    modifiers_kind: "modifiers",
    parameter_kinds: &["formal_parameter", "receiver_parameter"],
    spread_parameter_kind: "spread_parameter",
    invocation_kind: "method_invocation",
    component_list_field: "parameters",
};
