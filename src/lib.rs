//! RFC 6570 URI templates restricted to form-style query expansion (`{var}`,
//! `{?var}`, `{&var}`), with value binding, partial expansion and reverse
//! matching of concrete URIs.
//!
//! ```
//! use uri_template_bind::UriTemplate;
//!
//! let template = UriTemplate::parse("/item/{id}/parts{?fields*}").unwrap();
//! let bound = template.bind("id", "42").bind_list("fields", ["a", "b"]);
//! assert_eq!(bound.expand().as_str(), "/item/42/parts?fields=a&fields=b");
//!
//! let matched = template.try_bind("/item/7/parts?fields=x").unwrap();
//! assert_eq!(&matched.values()["id"], ["7"]);
//! ```

mod bound;
mod error;
mod expand;
mod extract;
mod item;
mod lex;
mod parse;
#[cfg(feature = "serde")]
mod serde_impl;
mod uri;
mod values;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::expand::expand_components;
use crate::extract::extract_values;
use crate::parse::parse_template;
use crate::values::same_name;

pub use crate::bound::BoundUriTemplate;
pub use crate::error::{Result, TemplateError};
pub use crate::item::{Component, Expression, Operator, Varspec};
pub use crate::lex::{lex, Lexer, Token, TokenKind};
pub use crate::parse::Parser;
pub use crate::uri::UriRef;
pub use crate::values::Values;

/// A parsed template. Cloning is cheap; components are shared.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UriTemplate(Arc<[Component]>);

/// Variable lookup used during expansion. Lookups should ignore case.
pub trait Variables {
    fn get(&self, name: &str) -> Option<&[String]>;
}

impl UriTemplate {
    pub fn parse<S>(template: S) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let template = template.as_ref();
        match parse_template(template) {
            Ok(components) => {
                debug!(template, components = components.len(), "parsed template");
                Ok(UriTemplate(components.into()))
            }
            Err(e) => {
                debug!(template, error = %e, "invalid template");
                Err(e)
            }
        }
    }

    /// Builds a template from already parsed components. Unlike
    /// [`UriTemplate::parse`] no grammar rules are checked.
    pub fn from_components<I>(components: I) -> Self
    where
        I: IntoIterator<Item = Component>,
    {
        UriTemplate(components.into_iter().collect())
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.0.iter().filter_map(Component::as_expression)
    }

    /// Declared variable names, in template order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.expressions().flat_map(Expression::varnames)
    }

    /// Whether any expression declares `name`, ignoring case.
    pub fn contains_variable(&self, name: &str) -> bool {
        self.variable_names().any(|v| same_name(v, name))
    }

    /// Expands with no values bound.
    pub fn expand(&self) -> UriRef {
        self.expand_with(&Values::new())
    }

    pub fn expand_with<V>(&self, variables: &V) -> UriRef
    where
        V: Variables + ?Sized,
    {
        UriRef::new(expand_components(&self.0, variables))
    }

    pub fn bind<K, V>(&self, name: K, value: V) -> BoundUriTemplate
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.unbound().bind(name, value)
    }

    pub fn bind_list<K, I, V>(&self, name: K, values: I) -> BoundUriTemplate
    where
        K: AsRef<str>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.unbound().bind_list(name, values)
    }

    /// A bound template with no values yet.
    pub fn unbound(&self) -> BoundUriTemplate {
        BoundUriTemplate::new(self.clone(), Values::new())
    }

    /// Matches `uri` against the template and returns the recovered values,
    /// or `None` if its text does not fit the template's structure.
    pub fn try_bind<S>(&self, uri: S) -> Option<BoundUriTemplate>
    where
        S: AsRef<str>,
    {
        let values = extract_values(&self.0, uri.as_ref())?;
        Some(BoundUriTemplate::new(self.clone(), values))
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in self.0.iter() {
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        UriTemplate::parse(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = TemplateError;

    fn try_from(s: &str) -> Result<Self> {
        UriTemplate::parse(s)
    }
}

impl Variables for Values {
    fn get(&self, name: &str) -> Option<&[String]> {
        Values::get(self, name)
    }
}

impl Variables for Vec<(String, Vec<String>)> {
    fn get(&self, name: &str) -> Option<&[String]> {
        self.iter()
            .find(|(k, _)| same_name(k, name))
            .map(|(_, v)| v.as_slice())
    }
}

impl Variables for HashMap<String, Vec<String>> {
    fn get(&self, name: &str) -> Option<&[String]> {
        match HashMap::get(self, name) {
            Some(v) => Some(v.as_slice()),
            None => self
                .iter()
                .find(|(k, _)| same_name(k, name))
                .map(|(_, v)| v.as_slice()),
        }
    }
}

impl Variables for IndexMap<String, Vec<String>> {
    fn get(&self, name: &str) -> Option<&[String]> {
        match IndexMap::get(self, name) {
            Some(v) => Some(v.as_slice()),
            None => self
                .iter()
                .find(|(k, _)| same_name(k, name))
                .map(|(_, v)| v.as_slice()),
        }
    }
}
