use crate::analyzer::StructuralAnalyzer;
use crate::error::{AnalyzerError, Result};
use crate::language::Language;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Parser, Tree};

/// Stable parsing interface the analyzer depends on
pub trait SyntaxParser: Send {
    fn language(&self) -> Language;

    /// Parse source text; `None` when the parser gives up
    fn parse(&mut self, source: &str) -> Option<Tree>;
}

/// Tree-sitter backed parser for one language
pub struct TreeSitterParser {
    parser: Parser,
    language: Language,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        if !language.supports_analysis() {
            return Err(AnalyzerError::unsupported_language(language.as_str()));
        }

        let ts_language = language.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| AnalyzerError::parser_init(format!("Failed to set language: {e}")))?;

        Ok(Self { parser, language })
    }
}

impl SyntaxParser for TreeSitterParser {
    fn language(&self) -> Language {
        self.language
    }

    fn parse(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }
}

/// Builds a parser for a language
pub type ParserFactory = Box<dyn Fn(Language) -> Result<Box<dyn SyntaxParser>> + Send>;

fn tree_sitter_factory() -> ParserFactory {
    Box::new(|language: Language| -> Result<Box<dyn SyntaxParser>> {
        TreeSitterParser::new(language).map(|parser| Box::new(parser) as Box<dyn SyntaxParser>)
    })
}

/// Per-run cache of analyzers, one per language.
///
/// A language whose parser fails to initialize is remembered as unavailable
/// and never retried within the run. Parsers are released by [`release`]
/// or when the cache is dropped.
///
/// [`release`]: ParserCache::release
pub struct ParserCache {
    factory: ParserFactory,
    analyzers: HashMap<Language, StructuralAnalyzer>,
    unavailable: HashSet<Language>,
}

impl ParserCache {
    pub fn new() -> Self {
        Self::with_factory(tree_sitter_factory())
    }

    pub fn with_factory(factory: ParserFactory) -> Self {
        Self {
            factory,
            analyzers: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }

    /// Get or create the analyzer for `language`; `None` when unsupported
    pub fn analyzer_for(&mut self, language: Language) -> Option<&mut StructuralAnalyzer> {
        if !language.supports_analysis() || self.unavailable.contains(&language) {
            return None;
        }

        if !self.analyzers.contains_key(&language) {
            let created = (self.factory)(language).and_then(StructuralAnalyzer::new);
            match created {
                Ok(analyzer) => {
                    log::debug!("Parser initialized for {language}");
                    self.analyzers.insert(language, analyzer);
                }
                Err(err) => {
                    log::warn!("Parser for {language} unavailable, falling back to plain indexing: {err}");
                    self.unavailable.insert(language);
                    return None;
                }
            }
        }

        self.analyzers.get_mut(&language)
    }

    pub fn is_unavailable(&self, language: Language) -> bool {
        self.unavailable.contains(&language)
    }

    /// Number of live parsers
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Drop every cached parser, returning how many were released
    pub fn release(&mut self) -> usize {
        let released = self.analyzers.len();
        self.analyzers.clear();
        if released > 0 {
            log::debug!("Released {released} parser(s)");
        }
        released
    }
}

impl Default for ParserCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ParserCache {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn reuses_parser_per_language() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let mut cache = ParserCache::with_factory(Box::new(move |language: Language| -> Result<Box<dyn SyntaxParser>> {
            counter.fetch_add(1, Ordering::SeqCst);
            TreeSitterParser::new(language).map(|p| Box::new(p) as Box<dyn SyntaxParser>)
        }));

        assert!(cache.analyzer_for(Language::Java).is_some());
        assert!(cache.analyzer_for(Language::Java).is_some());
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.release(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn unsupported_language_yields_none_without_factory_call() {
        let mut cache =
            ParserCache::with_factory(Box::new(|_: Language| -> Result<Box<dyn SyntaxParser>> {
                panic!("factory must not run for unsupported languages")
            }));
        assert!(cache.analyzer_for(Language::Python).is_none());
        assert!(cache.analyzer_for(Language::Unknown).is_none());
    }

    #[test]
    fn failed_initialization_is_remembered() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let mut cache = ParserCache::with_factory(Box::new(move |_: Language| -> Result<Box<dyn SyntaxParser>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AnalyzerError::parser_init("grammar missing"))
        }));

        assert!(cache.analyzer_for(Language::Java).is_none());
        assert!(cache.analyzer_for(Language::Java).is_none());
        assert!(cache.is_unavailable(Language::Java));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
