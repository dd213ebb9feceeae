use crate::error::RegistrationError;
use lingo_syntax::Token;
use std::{borrow::Cow, fmt};

/// Turns a token into a refined scope, or declines it.
///
/// Returning `None` means "not mine"; the next parser in the registry gets a
/// chance. Parsers are shared by every compilation of a definition, so they
/// must not keep per-query state.
///
/// Any `Fn(&Token, &A) -> Option<A>` closure is a parser.
pub trait Parser<A>: Send + Sync {
    fn parse(&self, token: &Token, scope: &A) -> Option<A>;

    /// Identity reported in diagnostics.
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl<A, F> Parser<A> for F
where
    F: Fn(&Token, &A) -> Option<A> + Send + Sync,
{
    fn parse(&self, token: &Token, scope: &A) -> Option<A> {
        self(token, scope)
    }
}

pub type BoxedParser<A> = Box<dyn Parser<A>>;

/// Ordered, append-only list of parsers owned by a single search definition.
pub struct ParserRegistry<A> {
    parsers: Vec<BoxedParser<A>>,
}

impl<A> ParserRegistry<A> {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    pub fn register(&mut self, parser: impl Parser<A> + 'static) -> &mut Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Registers exactly one of `callable` or `block`.
    ///
    /// Useful when parsers come from configuration where either form may be
    /// present; passing neither or both is rejected.
    pub fn try_register(
        &mut self,
        callable: Option<BoxedParser<A>>,
        block: Option<BoxedParser<A>>,
    ) -> Result<&mut Self, RegistrationError> {
        let parser = match (callable, block) {
            (Some(parser), None) | (None, Some(parser)) => parser,
            (None, None) => return Err(RegistrationError::Missing),
            (Some(_), Some(_)) => return Err(RegistrationError::Ambiguous),
        };
        self.parsers.push(parser);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Parser<A>> {
        self.parsers.iter().map(|parser| parser.as_ref())
    }

    /// First parser, in registration order, that accepts `token`.
    pub fn find_match(&self, token: &Token, scope: &A) -> Option<(&dyn Parser<A>, A)> {
        self.iter()
            .find_map(|parser| parser.parse(token, scope).map(|scope| (parser, scope)))
    }
}

impl<A> Default for ParserRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for ParserRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|parser| parser.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(token: &Token, scope: &Vec<String>) -> Option<Vec<String>> {
        let mut scope = scope.clone();
        scope.push(token.term().to_string());
        Some(scope)
    }

    fn decline(_: &Token, _: &Vec<String>) -> Option<Vec<String>> {
        None
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut registry: ParserRegistry<Vec<String>> = ParserRegistry::new();
        registry.register(decline).register(echo);
        assert_eq!(registry.len(), 2);

        let (parser, scope) = registry.find_match(&Token::new("foo"), &vec![]).unwrap();
        assert!(parser.describe().ends_with("echo"));
        assert_eq!(scope, ["foo"]);
    }

    #[test]
    fn try_register_requires_exactly_one_parser() {
        let mut registry: ParserRegistry<Vec<String>> = ParserRegistry::new();
        assert_eq!(
            registry.try_register(None, None).err(),
            Some(RegistrationError::Missing)
        );
        assert_eq!(
            registry
                .try_register(Some(Box::new(echo)), Some(Box::new(decline)))
                .err(),
            Some(RegistrationError::Ambiguous)
        );
        assert!(registry.is_empty());

        registry.try_register(None, Some(Box::new(echo))).unwrap();
        registry.try_register(Some(Box::new(decline)), None).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_registry_matches_nothing() {
        let registry: ParserRegistry<Vec<String>> = ParserRegistry::default();
        assert!(registry.find_match(&Token::new("foo"), &vec![]).is_none());
    }
}
