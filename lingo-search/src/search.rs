use crate::{
    error::{RegistrationError, Result, SearchError},
    parser::{BoxedParser, Parser, ParserRegistry},
};
use lingo_syntax::{Token, Tokenizer};
use once_cell::unsync::OnceCell;
use std::{borrow::Cow, fmt};
use tracing::{debug, trace};

type DefaultParse<A> = Box<dyn Fn(&Token, &A) -> A + Send + Sync>;
type DiagnosticSink = Box<dyn Fn(&Diagnostic<'_>) + Send + Sync>;

/// A search definition: an ordered parser chain plus the fallback used for
/// tokens no parser claims.
///
/// Definitions are built once and then only read, so a single `Search` can
/// compile queries from many threads.
///
/// ```
/// use lingo_search::Search;
///
/// let search = Search::<Vec<String>>::builder("Words")
///     .parser_fn(|token, scope| {
///         let tag = token.as_str().strip_prefix('#')?;
///         let mut scope = scope.clone();
///         scope.push(format!("tag={tag}"));
///         Some(scope)
///     })
///     .default_parse(|token, scope| {
///         let mut scope = scope.clone();
///         scope.push(format!("word={}", token.term()));
///         scope
///     })
///     .build();
///
/// let scope = search.compile("#rust parsers", Vec::new()).unwrap();
/// assert_eq!(scope, ["tag=rust", "word=parsers"]);
/// ```
pub struct Search<A> {
    name: Cow<'static, str>,
    parsers: ParserRegistry<A>,
    default_parse: Option<DefaultParse<A>>,
    diagnostics: Option<DiagnosticSink>,
}

impl<A> Search<A> {
    pub fn builder(name: impl Into<Cow<'static, str>>) -> SearchBuilder<A> {
        SearchBuilder {
            search: Search {
                name: name.into(),
                parsers: ParserRegistry::new(),
                default_parse: None,
                diagnostics: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parsers(&self) -> &ParserRegistry<A> {
        &self.parsers
    }

    /// Folds every token of `query` into `scope`, left to right.
    pub fn compile(&self, query: &str, scope: A) -> Result<A> {
        let mut tokens = Tokenizer::new(query);
        let mut scope = scope;
        while let Some(token) = tokens.next_token() {
            scope = self.resolve(&mut tokens, &token, &scope)?;
        }
        Ok(scope)
    }

    /// Resolves one token freshly returned by `tokens`.
    ///
    /// The registry is tried first. A compound token nobody claims is split:
    /// its modifier fragment is retried on its own and the term is left in
    /// `tokens` for the next step. Whatever is still unclaimed goes to the
    /// default parser.
    pub fn resolve(&self, tokens: &mut Tokenizer<'_>, token: &Token, scope: &A) -> Result<A> {
        if let Some(scope) = self.try_parsers(token, scope) {
            return Ok(scope);
        }
        if !token.is_compound() {
            return self.default_parse(token, scope);
        }

        let Some(simple) = tokens.simplify() else {
            return self.default_parse(token, scope);
        };
        trace!(token = %token, simplified = %simple, "retrying simplified token");
        match self.try_parsers(&simple, scope) {
            Some(scope) => Ok(scope),
            None => self.default_parse(&simple, scope),
        }
    }

    /// Applies the fallback parser.
    pub fn default_parse(&self, token: &Token, scope: &A) -> Result<A> {
        debug!(search = %self.name, token = %token, "default_parse");
        self.emit(&Diagnostic::Fallback { token });
        match &self.default_parse {
            Some(parse) => Ok(parse(token, scope)),
            None => Err(SearchError::DefaultParseNotImplemented {
                definition: self.name.to_string(),
            }),
        }
    }

    /// Pairs a query with a starting scope; the compiled result is computed on
    /// first use. A missing query behaves like an empty one.
    pub fn search(&self, query: Option<&str>, scope: A) -> SearchRun<'_, A> {
        SearchRun {
            search: self,
            query: query.unwrap_or_default().to_string(),
            scope,
            results: OnceCell::new(),
        }
    }

    fn try_parsers(&self, token: &Token, scope: &A) -> Option<A> {
        let (parser, scope) = self.parsers.find_match(token, scope)?;
        if tracing::enabled!(tracing::Level::DEBUG) || self.diagnostics.is_some() {
            let parser = parser.describe();
            debug!(search = %self.name, parser = %parser, token = %token, "parser matched");
            self.emit(&Diagnostic::Matched { parser, token });
        }
        Some(scope)
    }

    fn emit(&self, diagnostic: &Diagnostic<'_>) {
        if let Some(sink) = &self.diagnostics {
            sink(diagnostic);
        }
    }
}

impl<A> fmt::Debug for Search<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("name", &self.name)
            .field("parsers", &self.parsers)
            .field("default_parse", &self.default_parse.is_some())
            .finish_non_exhaustive()
    }
}

/// Observational events reported to [`SearchBuilder::on_diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic<'a> {
    Matched {
        parser: Cow<'a, str>,
        token: &'a Token,
    },
    Fallback {
        token: &'a Token,
    },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Matched { parser, token } => write!(f, "parser:{parser} token={token}"),
            Diagnostic::Fallback { token } => write!(f, "default_parse token={token}"),
        }
    }
}

pub struct SearchBuilder<A> {
    search: Search<A>,
}

impl<A> SearchBuilder<A> {
    pub fn parser(mut self, parser: impl Parser<A> + 'static) -> Self {
        self.search.parsers.register(parser);
        self
    }

    /// Same as [`SearchBuilder::parser`], but pins the closure signature so
    /// argument types need not be spelled out.
    pub fn parser_fn(
        self,
        parser: impl Fn(&Token, &A) -> Option<A> + Send + Sync + 'static,
    ) -> Self {
        self.parser(parser)
    }

    /// Registers exactly one of `callable` or `block`.
    pub fn try_parser(
        mut self,
        callable: Option<BoxedParser<A>>,
        block: Option<BoxedParser<A>>,
    ) -> Result<Self, RegistrationError> {
        self.search.parsers.try_register(callable, block)?;
        Ok(self)
    }

    /// The fallback for tokens no parser claims. It must always produce a
    /// scope.
    pub fn default_parse(mut self, parse: impl Fn(&Token, &A) -> A + Send + Sync + 'static) -> Self {
        self.search.default_parse = Some(Box::new(parse));
        self
    }

    pub fn on_diagnostic(mut self, sink: impl Fn(&Diagnostic<'_>) + Send + Sync + 'static) -> Self {
        self.search.diagnostics = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Search<A> {
        self.search
    }
}

/// A query bound to a definition and a starting scope.
pub struct SearchRun<'s, A> {
    search: &'s Search<A>,
    query: String,
    scope: A,
    results: OnceCell<A>,
}

impl<A: Clone> SearchRun<'_, A> {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The starting scope, before any token was applied.
    pub fn scope(&self) -> &A {
        &self.scope
    }

    /// Compiles the query on first call; later calls return the cached value.
    /// Failures are not cached.
    pub fn results(&self) -> Result<&A> {
        self.results
            .get_or_try_init(|| self.search.compile(&self.query, self.scope.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn words(name: &'static str) -> SearchBuilder<Vec<String>> {
        Search::builder(name).default_parse(|token, scope: &Vec<String>| {
            let mut scope = scope.clone();
            scope.push(format!("default({token})"));
            scope
        })
    }

    #[test]
    fn unclaimed_compound_token_takes_two_steps() {
        let search = words("Words").build();
        let scope = search.compile("foo: bar", Vec::new()).unwrap();
        assert_eq!(scope, ["default(foo:)", "default(bar)"]);
    }

    #[test]
    fn unspaced_compound_token_takes_one_step() {
        let search = words("Words").build();
        let scope = search.compile("foo:bar", Vec::new()).unwrap();
        assert_eq!(scope, ["default(foo:bar)"]);
    }

    #[test]
    fn first_match_wins() {
        let search = words("Words")
            .parser_fn(|token, scope| {
                let mut scope = scope.clone();
                scope.push(format!("first({token})"));
                Some(scope)
            })
            .parser_fn(|_, _| panic!("never consulted"))
            .build();
        let scope = search.compile("a b", Vec::new()).unwrap();
        assert_eq!(scope, ["first(a)", "first(b)"]);
    }

    #[test]
    fn missing_default_parse_fails_only_when_reached() {
        let search = Search::<Vec<String>>::builder("Bare")
            .parser_fn(|_, scope| Some(scope.clone()))
            .build();
        assert!(search.compile("anything goes", Vec::new()).is_ok());

        let search: Search<Vec<String>> = Search::builder("Bare").build();
        assert!(search.compile("", Vec::new()).is_ok());
        assert_eq!(
            search.compile("foo", Vec::new()),
            Err(SearchError::DefaultParseNotImplemented {
                definition: "Bare".into()
            })
        );
    }

    #[test]
    fn diagnostics_describe_matches_and_fallbacks() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let search = words("Words")
            .parser_fn(|token, scope| (token.term() == "hit").then(|| scope.clone()))
            .on_diagnostic(move |event| sink.lock().unwrap().push(event.to_string()))
            .build();
        search.compile("hit miss", Vec::new()).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("parser:"));
        assert!(events[0].ends_with(" token=hit"));
        assert_eq!(events[1], "default_parse token=miss");
    }

    #[test]
    fn search_run_defaults_missing_query() {
        let search = words("Words").build();
        let run = search.search(None, vec!["start".to_string()]);
        assert_eq!(run.query(), "");
        assert_eq!(run.results().unwrap(), &["start"]);
    }
}
