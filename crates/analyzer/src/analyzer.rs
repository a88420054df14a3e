use crate::error::{AnalyzerError, Result};
use crate::language::{GrammarProfile, Language};
use crate::parser::SyntaxParser;
use crate::types::{ClassInfo, FileAnalysis, MethodCall, MethodInfo, MethodParameter};
use tree_sitter::Node;

const ANONYMOUS: &str = "<anonymous>";

/// Slice `source[start..end]`, or `None` for an empty, out-of-range or
/// non-UTF-8-boundary range
pub fn slice_source(source: &str, start: usize, end: usize) -> Option<&str> {
    if start >= end || end > source.len() {
        return None;
    }
    source.get(start..end)
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> Option<&'s str> {
    slice_source(source, node.start_byte(), node.end_byte())
}

/// Extracts classes, fields, methods and call sites from source text
pub struct StructuralAnalyzer {
    parser: Box<dyn SyntaxParser>,
    profile: &'static GrammarProfile,
}

impl StructuralAnalyzer {
    pub fn new(parser: Box<dyn SyntaxParser>) -> Result<Self> {
        let language = parser.language();
        let profile = language
            .grammar_profile()
            .ok_or_else(|| AnalyzerError::unsupported_language(language.as_str()))?;
        Ok(Self { parser, profile })
    }

    pub fn language(&self) -> Language {
        self.parser.language()
    }

    /// Analyze one file. Never fails: source the parser cannot handle yields
    /// an analysis with no classes.
    pub fn analyze(&mut self, file_path: &str, source: &str) -> FileAnalysis {
        let mut analysis = FileAnalysis::empty(file_path, self.language());

        let Some(tree) = self.parser.parse(source) else {
            log::warn!("Failed to parse {file_path}");
            return analysis;
        };

        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let kind = child.kind();
            if self.profile.package_kinds.contains(&kind) {
                if analysis.package_name.is_empty() {
                    analysis.package_name = self.package_name(child, source).unwrap_or_default();
                }
            } else if self.profile.type_kinds.contains(&kind) {
                self.collect_types(child, source, &mut analysis.classes);
            }
        }

        log::debug!(
            "Analyzed {file_path}: package='{}', {} class(es), {} method(s)",
            analysis.package_name,
            analysis.classes.len(),
            analysis.method_count()
        );
        analysis
    }

    fn package_name(&self, node: Node<'_>, source: &str) -> Option<String> {
        let mut cursor = node.walk();
        let name_node = node
            .named_children(&mut cursor)
            .find(|child| self.profile.package_name_kinds.contains(&child.kind()))?;
        node_text(name_node, source).map(str::to_string)
    }

    /// Pre-order walk over a type declaration and the types nested in it
    fn collect_types(&self, root: Node<'_>, source: &str, out: &mut Vec<ClassInfo>) {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            let (class, nested) = self.parse_type(node, source);
            out.push(class);
            pending.extend(nested.into_iter().rev());
        }
    }

    fn parse_type<'t>(&self, node: Node<'t>, source: &str) -> (ClassInfo, Vec<Node<'t>>) {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| node_text(n, source))
            .unwrap_or(ANONYMOUS);
        let mut class = ClassInfo::new(name);
        let mut nested = Vec::new();

        if let Some(components) = node.child_by_field_name(self.profile.component_list_field) {
            for param in self.parameters(components, source) {
                class.fields.push(param.name);
            }
        }

        let Some(body) = node.child_by_field_name("body") else {
            return (class, nested);
        };

        for member in self.body_members(body) {
            let kind = member.kind();
            if self.profile.field_kinds.contains(&kind) {
                class.fields.extend(self.declared_names(member, source));
            } else if self.profile.method_kinds.contains(&kind) {
                class.methods.push(self.parse_method(member, source));
            } else if self.profile.type_kinds.contains(&kind) {
                nested.push(member);
            }
        }

        (class, nested)
    }

    fn body_members<'t>(&self, body: Node<'t>) -> Vec<Node<'t>> {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if self.profile.member_group_kinds.contains(&child.kind()) {
                let mut inner = child.walk();
                members.extend(child.named_children(&mut inner));
            } else {
                members.push(child);
            }
        }
        members
    }

    /// Names from every declarator in `int a, b = 2;`
    fn declared_names(&self, node: Node<'_>, source: &str) -> Vec<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == self.profile.declarator_kind)
            .filter_map(|declarator| declarator.child_by_field_name("name"))
            .filter_map(|name| node_text(name, source))
            .map(str::to_string)
            .collect()
    }

    fn parse_method(&self, node: Node<'_>, source: &str) -> MethodInfo {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| node_text(n, source))
            .unwrap_or(ANONYMOUS)
            .to_string();

        let return_type = node
            .child_by_field_name("type")
            .and_then(|n| node_text(n, source))
            .map(str::to_string);

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| self.parameters(params, source))
            .unwrap_or_default();

        let calls = node
            .child_by_field_name("body")
            .map(|body| self.collect_calls(body, source))
            .unwrap_or_default();

        MethodInfo {
            name,
            return_type,
            modifiers: self.modifiers(node, source),
            parameters,
            body_text: node_text(node, source).unwrap_or_default().to_string(),
            calls,
        }
    }

    fn modifiers(&self, node: Node<'_>, source: &str) -> Vec<String> {
        let mut cursor = node.walk();
        let Some(modifiers) = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == self.profile.modifiers_kind)
        else {
            return Vec::new();
        };

        let mut inner = modifiers.walk();
        modifiers
            .children(&mut inner)
            .filter_map(|m| node_text(m, source))
            .map(str::to_string)
            .collect()
    }

    fn parameters(&self, list: Node<'_>, source: &str) -> Vec<MethodParameter> {
        let mut cursor = list.walk();
        let mut params = Vec::new();
        for param in list.named_children(&mut cursor) {
            let kind = param.kind();
            if self.profile.parameter_kinds.contains(&kind) {
                let type_name = param
                    .child_by_field_name("type")
                    .and_then(|n| node_text(n, source))
                    .unwrap_or_default();
                let name = param
                    .child_by_field_name("name")
                    .and_then(|n| node_text(n, source))
                    .unwrap_or_default();
                params.push(MethodParameter::new(type_name, name));
            } else if kind == self.profile.spread_parameter_kind {
                params.push(self.spread_parameter(param, source));
            }
        }
        params
    }

    /// `String... args` carries its type and declarator as plain children
    fn spread_parameter(&self, node: Node<'_>, source: &str) -> MethodParameter {
        let mut cursor = node.walk();
        let mut type_name = String::new();
        let mut name = String::new();
        for child in node.named_children(&mut cursor) {
            let kind = child.kind();
            if kind == self.profile.declarator_kind {
                name = child
                    .child_by_field_name("name")
                    .and_then(|n| node_text(n, source))
                    .unwrap_or_default()
                    .to_string();
            } else if kind != self.profile.modifiers_kind && type_name.is_empty() {
                type_name = format!("{}...", node_text(child, source).unwrap_or_default());
            }
        }
        MethodParameter::new(type_name, name)
    }

    /// Every invocation under `root`, in document order
    fn collect_calls(&self, root: Node<'_>, source: &str) -> Vec<MethodCall> {
        let mut calls = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == self.profile.invocation_kind {
                if let Some(call) = Self::parse_call(node, source) {
                    calls.push(call);
                }
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        calls
    }

    fn parse_call(node: Node<'_>, source: &str) -> Option<MethodCall> {
        let name = node.child_by_field_name("name").and_then(|n| node_text(n, source))?;
        let mut call = MethodCall::new(name);
        if let Some(qualifier) = node.child_by_field_name("object").and_then(|n| node_text(n, source)) {
            call = call.with_qualifier(qualifier);
        }
        if let Some(args) = node
            .child_by_field_name("arguments")
            .and_then(|n| node_text(n, source))
        {
            call = call.with_arguments(args);
        }
        Some(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TreeSitterParser;
    use tree_sitter::Tree;

    struct NullParser;

    impl SyntaxParser for NullParser {
        fn language(&self) -> Language {
            Language::Java
        }

        fn parse(&mut self, _source: &str) -> Option<Tree> {
            None
        }
    }

    /// Parses its own text whatever source it is handed
    struct FixedTextParser(TreeSitterParser, &'static str);

    impl SyntaxParser for FixedTextParser {
        fn language(&self) -> Language {
            Language::Java
        }

        fn parse(&mut self, _source: &str) -> Option<Tree> {
            self.0.parse(self.1)
        }
    }

    #[test]
    fn unsliceable_names_fall_back_to_anonymous() {
        let parser = FixedTextParser(
            TreeSitterParser::new(Language::Java).unwrap(),
            "class Named { void run() { go(); } }",
        );
        let mut analyzer = StructuralAnalyzer::new(Box::new(parser)).unwrap();

        // every node range lies outside the empty source
        let analysis = analyzer.analyze("Stale.java", "");

        assert_eq!(analysis.classes.len(), 1);
        let class = &analysis.classes[0];
        assert_eq!(class.name, ANONYMOUS);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, ANONYMOUS);
        assert_eq!(class.methods[0].body_text, "");
        assert!(class.methods[0].calls.is_empty());
    }

    #[test]
    fn slice_rejects_bad_ranges() {
        let source = "héllo";
        assert_eq!(slice_source(source, 0, 1), Some("h"));
        assert_eq!(slice_source(source, 1, 3), Some("é"));
        assert_eq!(slice_source(source, 3, 3), None);
        assert_eq!(slice_source(source, 4, 2), None);
        assert_eq!(slice_source(source, 0, 99), None);
        // splits the two-byte 'é'
        assert_eq!(slice_source(source, 0, 2), None);
    }

    #[test]
    fn parser_failure_yields_empty_analysis() {
        let mut analyzer = StructuralAnalyzer::new(Box::new(NullParser)).unwrap();
        let analysis = analyzer.analyze("Broken.java", "class Broken {}");
        assert!(analysis.is_empty());
        assert_eq!(analysis.file_path, "Broken.java");
        assert_eq!(analysis.package_name, "");
    }
}
