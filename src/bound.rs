use std::fmt;

use tracing::debug;

use crate::error::{Result, TemplateError};
use crate::expand::{expand_expression, expand_varspec};
use crate::item::{Component, Expression, Operator, Varspec};
use crate::uri::UriRef;
use crate::values::Values;
use crate::{UriTemplate, Variables};

/// A template together with values bound to some of its variables.
///
/// Binding never mutates: every `bind*` call returns a new value that shares
/// the underlying template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoundUriTemplate {
    template: UriTemplate,
    values: Values,
}

impl BoundUriTemplate {
    pub(crate) fn new(template: UriTemplate, values: Values) -> Self {
        BoundUriTemplate { template, values }
    }

    /// The template values are bound against.
    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Binds a single value to `name`. See [`BoundUriTemplate::bind_list`].
    pub fn bind<K, V>(&self, name: K, value: V) -> BoundUriTemplate
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.bind_list(name, [value])
    }

    /// Replaces every value bound to `name` (compared case-insensitively).
    ///
    /// Names the template does not declare are dropped rather than stored.
    pub fn bind_list<K, I, V>(&self, name: K, values: I) -> BoundUriTemplate
    where
        K: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.as_ref();
        let mut bound = self.values.clone();
        bound.remove(name);
        if self.template.contains_variable(name) {
            bound.insert(name, values);
        }
        BoundUriTemplate::new(self.template.clone(), bound)
    }

    /// Drops every value bound to `name`.
    pub fn unbind<K>(&self, name: K) -> BoundUriTemplate
    where
        K: AsRef<str>,
    {
        let mut bound = self.values.clone();
        bound.remove(name.as_ref());
        BoundUriTemplate::new(self.template.clone(), bound)
    }

    pub fn expand(&self) -> UriRef {
        self.template.expand_with(&self.values)
    }

    /// Expands the underlying template with `variables` instead of the
    /// bound values.
    pub fn expand_with<V>(&self, variables: &V) -> UriRef
    where
        V: Variables + ?Sized,
    {
        self.template.expand_with(variables)
    }

    pub fn try_bind<S>(&self, uri: S) -> Option<BoundUriTemplate>
    where
        S: AsRef<str>,
    {
        self.template.try_bind(uri)
    }

    /// Partially expands the template: bound expressions become literal
    /// text, unbound ones stay as expressions.
    ///
    /// Fails with [`TemplateError::MissingOperator`] for a partly bound
    /// expression without operator, and with
    /// [`TemplateError::FirstValueMissing`] for a partly bound `?` expression
    /// whose first variable is unbound.
    pub fn create_template(&self) -> Result<UriTemplate> {
        let components = partial_expand(self.template.components(), &self.values)?;
        let template = UriTemplate::from_components(components);
        debug!(from = %self.template, to = %template, "partially expanded template");
        Ok(template)
    }
}

impl fmt::Display for BoundUriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}

struct PartialExpander<'a> {
    values: &'a Values,
    buffer: String,
    components: Vec<Component>,
}

fn partial_expand(components: &[Component], values: &Values) -> Result<Vec<Component>> {
    let mut expander = PartialExpander {
        values,
        buffer: String::new(),
        components: Vec::new(),
    };
    for component in components {
        match component {
            Component::Literal(literal) => expander.buffer.push_str(literal),
            Component::Expression(expression) => expander.expression(expression)?,
        }
    }
    expander.flush();
    Ok(expander.components)
}

impl PartialExpander<'_> {
    fn is_bound(&self, varspec: &Varspec) -> bool {
        self.values.contains_key(&varspec.varname)
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let literal = std::mem::take(&mut self.buffer);
            self.components.push(Component::Literal(literal));
        }
    }

    fn expression(&mut self, expression: &Expression) -> Result<()> {
        let bound = expression
            .variable_list
            .iter()
            .filter(|v| self.is_bound(v))
            .count();
        if bound == expression.variable_list.len() {
            self.buffer
                .push_str(&expand_expression(expression, self.values));
            return Ok(());
        }
        if bound == 0 {
            self.flush();
            self.components
                .push(Component::Expression(expression.clone()));
            return Ok(());
        }

        let operator = match expression.operator {
            Some(operator) => operator,
            None => {
                return Err(TemplateError::MissingOperator {
                    expression: expression.to_string(),
                })
            }
        };
        let mut rest = expression.variable_list.as_slice();
        if operator == Operator::FormQuery {
            let first = &rest[0];
            if !self.is_bound(first) {
                return Err(TemplateError::FirstValueMissing {
                    name: first.varname.clone(),
                });
            }
            self.buffer.push('?');
            self.buffer
                .push_str(&expand_varspec(first, Some(operator), self.values));
            rest = &rest[1..];
        }

        while !rest.is_empty() {
            let unbound = rest.iter().take_while(|v| !self.is_bound(v)).count();
            if unbound == 0 {
                let rendered = expand_varspec(&rest[0], Some(operator), self.values);
                if !rendered.is_empty() {
                    self.buffer.push('&');
                    self.buffer.push_str(&rendered);
                }
                rest = &rest[1..];
            } else {
                self.flush();
                let hole = Expression::new(
                    Some(Operator::FormContinuation),
                    rest[..unbound].to_vec(),
                );
                self.components.push(Component::Expression(hole));
                rest = &rest[unbound..];
            }
        }
        Ok(())
    }
}
