use std::fmt;

use crate::error::{Result, TemplateError};

/// One piece of a parsed template: verbatim text or a `{...}` expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Component {
    Literal(String),
    Expression(Expression),
}

/// A `{...}` expression: varspecs sharing one operator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expression {
    pub operator: Option<Operator>,
    pub variable_list: Vec<Varspec>,
}

/// A variable reference inside an expression, optionally exploded (`name*`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Varspec {
    pub varname: String,
    pub explode: bool,
}

/// Expression operator. Only the form-style query operators are supported;
/// "no operator" is `None` wherever an `Option<Operator>` appears.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    FormQuery,
    FormContinuation,
}

impl Component {
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Component::Literal(_) => None,
            Component::Expression(expression) => Some(expression),
        }
    }
}

impl Expression {
    pub fn new(operator: Option<Operator>, variable_list: Vec<Varspec>) -> Self {
        Expression {
            operator,
            variable_list,
        }
    }

    pub fn varnames(&self) -> impl Iterator<Item = &str> {
        self.variable_list.iter().map(|v| v.varname.as_str())
    }
}

impl Varspec {
    /// Fails when `varname` is empty or whitespace only.
    pub fn new<S>(varname: S, explode: bool) -> Result<Self>
    where
        S: Into<String>,
    {
        let varname = varname.into();
        if varname.trim().is_empty() {
            return Err(TemplateError::InvalidVariableName { text: varname });
        }
        Ok(Varspec { varname, explode })
    }
}

impl Operator {
    pub fn as_char(self) -> char {
        match self {
            Operator::FormQuery => '?',
            Operator::FormContinuation => '&',
        }
    }

    /// Like `Operator::try_from`, except that `'\0'` maps to "no operator".
    pub fn from_char(c: char) -> Result<Option<Operator>> {
        if c == '\0' {
            Ok(None)
        } else {
            Operator::try_from(c).map(Some)
        }
    }

    /// Inverse of [`Operator::from_char`].
    pub fn to_char(operator: Option<Operator>) -> char {
        operator.map_or('\0', Operator::as_char)
    }
}

impl TryFrom<char> for Operator {
    type Error = TemplateError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            '?' => Ok(Operator::FormQuery),
            '&' => Ok(Operator::FormContinuation),
            _ => Err(TemplateError::UnsupportedOperator(c)),
        }
    }
}

impl From<Operator> for char {
    fn from(operator: Operator) -> char {
        operator.as_char()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for Varspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.varname)?;
        if self.explode {
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(operator) = self.operator {
            write!(f, "{}", operator)?;
        }
        for (i, varspec) in self.variable_list.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", varspec)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Literal(text) => f.write_str(text),
            Component::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_from_char() {
        assert_eq!(Operator::try_from('?'), Ok(Operator::FormQuery));
        assert_eq!(Operator::try_from('&'), Ok(Operator::FormContinuation));
        assert_eq!(
            Operator::try_from('#'),
            Err(TemplateError::UnsupportedOperator('#'))
        );
        assert_eq!(Operator::from_char('\0'), Ok(None));
        assert_eq!(Operator::to_char(None), '\0');
        assert_eq!(Operator::to_char(Some(Operator::FormQuery)), '?');
    }

    #[test]
    fn test_varspec_name() {
        assert!(Varspec::new("", false).is_err());
        assert!(Varspec::new("  ", false).is_err());
        let varspec = Varspec::new("list", true).unwrap();
        assert_eq!(varspec.to_string(), "list*");
    }

    #[test]
    fn test_expression_display() {
        let expression = Expression::new(
            Some(Operator::FormQuery),
            vec![
                Varspec::new("a", false).unwrap(),
                Varspec::new("b", true).unwrap(),
            ],
        );
        assert_eq!(expression.to_string(), "{?a,b*}");

        let expression = Expression::new(None, vec![Varspec::new("x", false).unwrap()]);
        assert_eq!(Component::Expression(expression).to_string(), "{x}");
    }
}
