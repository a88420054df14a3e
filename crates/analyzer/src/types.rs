use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Structural facts extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: String,

    pub language: Language,

    /// Empty when the file declares no package
    pub package_name: String,

    /// Type declarations in document order, nested types after their parent
    pub classes: Vec<ClassInfo>,
}

impl FileAnalysis {
    /// Create an analysis with no type declarations
    pub fn empty(file_path: impl Into<String>, language: Language) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            package_name: String::new(),
            classes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total number of methods across all classes
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|class| class.methods.len()).sum()
    }
}

/// A class-like type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub fields: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// A method or constructor declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,

    /// None for constructors
    pub return_type: Option<String>,

    pub modifiers: Vec<String>,

    pub parameters: Vec<MethodParameter>,

    /// Verbatim source slice of the whole declaration
    pub body_text: String,

    /// Call sites in document order
    pub calls: Vec<MethodCall>,
}

impl MethodInfo {
    /// Render `modifiers returnType name(type name, ...)`, skipping empty parts
    pub fn describe_signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(MethodParameter::describe)
            .collect::<Vec<_>>()
            .join(", ");

        let mut parts: Vec<&str> = self.modifiers.iter().map(String::as_str).collect();
        if let Some(return_type) = self.return_type.as_deref().filter(|t| !t.is_empty()) {
            parts.push(return_type);
        }

        let head = format!("{}({params})", self.name);
        if parts.is_empty() {
            head
        } else {
            format!("{} {head}", parts.join(" "))
        }
    }

    /// Distinct callee names in first-seen order
    pub fn callee_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.calls
            .iter()
            .map(|call| call.callee_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub type_name: String,
    pub name: String,
}

impl MethodParameter {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    fn describe(&self) -> String {
        match (self.type_name.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.type_name, self.name),
            (true, _) => self.name.clone(),
            (false, true) => self.type_name.clone(),
        }
    }
}

/// A syntactic call site; not resolved to a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodCall {
    pub callee_name: String,

    /// Receiver expression text, e.g. `System.out`
    pub qualifier: Option<String>,

    /// Raw argument list text including parentheses
    pub arguments: Option<String>,
}

impl MethodCall {
    pub fn new(callee_name: impl Into<String>) -> Self {
        Self {
            callee_name: callee_name.into(),
            qualifier: None,
            arguments: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    /// `qualifier.name`, or just `name` for unqualified calls
    pub fn display_name(&self) -> String {
        match self.qualifier.as_deref().filter(|q| !q.is_empty()) {
            Some(qualifier) => format!("{qualifier}.{}", self.callee_name),
            None => self.callee_name.clone(),
        }
    }

    pub fn arguments_or_default(&self) -> &str {
        self.arguments
            .as_deref()
            .filter(|args| !args.is_empty())
            .unwrap_or("()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn method(modifiers: &[&str], return_type: Option<&str>, params: &[(&str, &str)]) -> MethodInfo {
        MethodInfo {
            name: "compute".to_string(),
            return_type: return_type.map(str::to_string),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            parameters: params
                .iter()
                .map(|(ty, name)| MethodParameter::new(*ty, *name))
                .collect(),
            body_text: String::new(),
            calls: Vec::new(),
        }
    }

    #[test]
    fn signature_includes_all_parts() {
        let m = method(&["public", "static"], Some("int"), &[("int", "a"), ("String[]", "rest")]);
        assert_eq!(m.describe_signature(), "public static int compute(int a, String[] rest)");
    }

    #[test]
    fn signature_of_constructor_skips_return_type() {
        let m = method(&[], None, &[]);
        assert_eq!(m.describe_signature(), "compute()");
    }

    #[test]
    fn call_display_uses_qualifier() {
        let call = MethodCall::new("println")
            .with_qualifier("System.out")
            .with_arguments("(\"hi\")");
        assert_eq!(call.display_name(), "System.out.println");
        assert_eq!(call.arguments_or_default(), "(\"hi\")");
        assert_eq!(MethodCall::new("run").arguments_or_default(), "()");
    }

    #[test]
    fn callee_names_are_distinct() {
        let mut m = method(&[], Some("void"), &[]);
        m.calls = vec![MethodCall::new("a"), MethodCall::new("b"), MethodCall::new("a")];
        assert_eq!(m.callee_names(), vec!["a", "b"]);
    }
}
