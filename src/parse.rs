use std::collections::HashSet;
use std::iter::Peekable;

use tracing::trace;

use crate::error::{Result, TemplateError};
use crate::item::{Component, Expression, Operator, Varspec};
use crate::lex::{Lexer, Token, TokenKind};

/// Lazily turns a token stream into [`Component`]s.
///
/// The parser keeps a current token and advances explicitly; productions
/// share that cursor and may look one token further ahead. After the first
/// error the iterator is exhausted.
pub struct Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    tokens: Peekable<I>,
    current: Token<'a>,
    context: Context,
    varnames: HashSet<String>,
    done: bool,
}

/// State threaded across productions.
#[derive(Clone, Copy, Debug, Default)]
struct Context {
    /// The last literal run ended inside a path segment.
    is_partial_segment: bool,
    /// A `?` has been seen, literal or operator.
    is_query_component: bool,
    /// The current path segment already holds an expression.
    segment_has_expression: bool,
    /// Operator of the expression being parsed.
    operator: Option<Operator>,
}

pub fn parse_template(template: &str) -> Result<Vec<Component>> {
    Parser::new(Lexer::new(template)).collect()
}

impl<'a, I> Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let mut tokens = tokens.into_iter().peekable();
        let (current, done) = match tokens.next() {
            Some(token) => (token, false),
            None => (Token::end_of_template(), true),
        };
        Parser {
            tokens,
            current,
            context: Context::default(),
            varnames: HashSet::new(),
            done,
        }
    }

    fn advance(&mut self) {
        self.current = self.tokens.next().unwrap_or_else(Token::end_of_template);
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.tokens
            .peek()
            .map_or(TokenKind::EndOfTemplate, |token| token.kind)
    }

    /// Text of the next token when it is a literal.
    fn peek_literal(&mut self) -> Option<&'a str> {
        self.tokens
            .peek()
            .filter(|token| token.is(TokenKind::Literal))
            .map(|token| token.text)
    }

    fn unexpected(&self) -> TemplateError {
        TemplateError::UnexpectedCharacters {
            text: self.current.text.to_string(),
        }
    }

    fn parse_component(&mut self) -> Option<Result<Component>> {
        loop {
            match self.current.kind {
                TokenKind::EndOfTemplate => return None,
                TokenKind::RightBrace => return Some(Err(self.unexpected())),
                TokenKind::LeftBrace => {
                    self.advance();
                    let expression = match self.parse_expression() {
                        Ok(expression) => expression,
                        Err(e) => return Some(Err(e)),
                    };
                    if expression.variable_list.is_empty() {
                        continue;
                    }
                    if let Err(e) = self.register_varnames(&expression) {
                        return Some(Err(e));
                    }
                    return Some(Ok(Component::Expression(expression)));
                }
                _ => return Some(self.parse_literal().map(Component::Literal)),
            }
        }
    }

    fn register_varnames(&mut self, expression: &Expression) -> Result<()> {
        for name in expression.varnames() {
            if !self.varnames.insert(name.to_string()) {
                return Err(TemplateError::RepeatedVariableName {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn parse_literal(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let context = &mut self.context;
            match self.current.kind {
                TokenKind::LeftBrace | TokenKind::EndOfTemplate => break,
                TokenKind::RightBrace => return Err(self.unexpected()),
                TokenKind::Ampersand
                | TokenKind::Asterisk
                | TokenKind::Comma
                | TokenKind::Literal => context.is_partial_segment = true,
                TokenKind::EqualsSign => {
                    if !context.is_query_component {
                        context.is_partial_segment = true;
                    }
                }
                TokenKind::QuestionMark => {
                    context.is_partial_segment = false;
                    context.is_query_component = true;
                }
                TokenKind::Slash => {
                    context.is_partial_segment = false;
                    context.segment_has_expression = false;
                }
            }
            text.push_str(self.current.text);
            self.advance();
        }
        Ok(text)
    }

    /// RFC 6570 operators this grammar does not support, found where an
    /// operator would appear.
    fn reserved_operator(&self) -> Option<char> {
        match self.current.kind {
            TokenKind::Slash => Some('/'),
            TokenKind::Literal => self
                .current
                .text
                .chars()
                .next()
                .filter(|&c| matches!(c, '+' | '#' | '.' | ';' | '!' | '@' | '|')),
            _ => None,
        }
    }

    /// Entered on the token after `{`.
    fn parse_expression(&mut self) -> Result<Expression> {
        self.context.operator = None;

        if let Some(c) = self.reserved_operator() {
            return Err(TemplateError::UnsupportedOperator(c));
        }

        if self.current.is(TokenKind::QuestionMark) {
            if self.context.is_query_component {
                return Err(TemplateError::MultipleQuestionMarks);
            }
            self.context.operator = Some(Operator::FormQuery);
            self.context.is_query_component = true;
            self.advance();
        }
        if self.current.is(TokenKind::Ampersand) {
            if self.context.operator.is_some() {
                return Err(TemplateError::MultipleOperators);
            }
            self.context.operator = Some(Operator::FormContinuation);
            self.advance();
        }

        let operator = self.context.operator;
        if let Some(operator) = operator {
            if !self.context.is_query_component {
                return Err(TemplateError::OperatorOutsideQuery(operator));
            }
        }
        if !self.context.is_query_component
            && self.context.is_partial_segment
            && self.context.segment_has_expression
            && operator != Some(Operator::FormQuery)
        {
            return Err(TemplateError::MixedLiteralAndVariable);
        }

        let mut variable_list = Vec::new();
        self.parse_variable_list(&mut variable_list)?;
        if !self.context.is_query_component {
            self.context.segment_has_expression = true;
        }
        Ok(Expression::new(operator, variable_list))
    }

    fn parse_variable_list(&mut self, variable_list: &mut Vec<Varspec>) -> Result<()> {
        loop {
            if !self.current.is(TokenKind::Literal) {
                return Err(TemplateError::InvalidVariableName {
                    text: self.current.text.to_string(),
                });
            }
            let varname = self.current.text;
            self.advance();

            let explode = self.current.is(TokenKind::Asterisk);
            if explode {
                self.advance();
            }
            let varspec = Varspec::new(varname, explode)?;

            match self.current.kind {
                TokenKind::RightBrace => {
                    variable_list.push(varspec);
                    self.advance();
                    if self.current.is(TokenKind::LeftBrace) {
                        self.parse_adjacent(variable_list)?;
                    }
                    return Ok(());
                }
                TokenKind::Comma => {
                    if self.context.operator.is_none() {
                        return Err(TemplateError::MultipleVariablesWithoutOperator {
                            name: varspec.varname,
                        });
                    }
                    variable_list.push(varspec);
                    self.advance();
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// Handles `}{`, which is only allowed inside the query. A `{&...}`
    /// following an `&` expression is merged into it. A `{?...}` or
    /// `{&...}` after an operator-less expression, or a `{&...}` after a `?`
    /// expression, is left for the next component.
    fn parse_adjacent(&mut self, variable_list: &mut Vec<Varspec>) -> Result<()> {
        if let Some(name) = self.peek_literal() {
            if self.varnames.contains(name) || variable_list.iter().any(|v| v.varname == name) {
                return Err(TemplateError::RepeatedVariableName {
                    name: name.to_string(),
                });
            }
        }
        if !self.context.is_query_component {
            return Err(TemplateError::AdjacentVarspecs);
        }
        match self.context.operator {
            None => match self.peek_kind() {
                TokenKind::QuestionMark | TokenKind::Ampersand => Ok(()),
                _ => Err(TemplateError::AdjacentVarspecs),
            },
            Some(Operator::FormQuery) => match self.peek_kind() {
                TokenKind::Ampersand => Ok(()),
                _ => Err(TemplateError::AdjacentVarspecs),
            },
            Some(Operator::FormContinuation) => {
                self.advance();
                if !self.current.is(TokenKind::Ampersand) {
                    return Err(TemplateError::AdjacentVarspecs);
                }
                self.advance();
                trace!("merging adjacent continuation expression");
                self.parse_variable_list(variable_list)
            }
        }
    }
}

impl<'a, I> Iterator for Parser<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = Result<Component>;

    fn next(&mut self) -> Option<Result<Component>> {
        if self.done {
            return None;
        }
        let item = self.parse_component();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
