use crate::item::{Component, Expression, Operator, Varspec};
use crate::Variables;

pub fn expand_components<V>(components: &[Component], variables: &V) -> String
where
    V: Variables + ?Sized,
{
    let mut dst = String::new();
    for component in components {
        match component {
            Component::Literal(literal) => dst.push_str(literal),
            Component::Expression(expression) => {
                dst.push_str(&expand_expression(expression, variables))
            }
        }
    }
    dst
}

pub fn expand_expression<V>(expression: &Expression, variables: &V) -> String
where
    V: Variables + ?Sized,
{
    match expression.operator {
        None => expression
            .variable_list
            .iter()
            .map(|varspec| expand_varspec(varspec, None, variables))
            .collect::<Vec<_>>()
            .join(","),
        Some(operator) => {
            let joined = expression
                .variable_list
                .iter()
                .map(|varspec| expand_varspec(varspec, Some(operator), variables))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("&");
            if joined.is_empty() {
                joined
            } else {
                format!("{}{}", operator, joined)
            }
        }
    }
}

/// Renders one varspec. Without an operator the values are comma-joined;
/// with one they become `name=v1,v2`, or `name=v1&name=v2` when exploded.
pub fn expand_varspec<V>(varspec: &Varspec, operator: Option<Operator>, variables: &V) -> String
where
    V: Variables + ?Sized,
{
    let values = match variables.get(&varspec.varname) {
        Some(values) if !values.is_empty() => values,
        _ => return String::new(),
    };
    if operator.is_none() {
        return values.join(",");
    }
    if varspec.explode {
        values
            .iter()
            .map(|v| format!("{}={}", varspec.varname, v))
            .collect::<Vec<_>>()
            .join("&")
    } else {
        let joined = values.join(",");
        if joined.is_empty() {
            joined
        } else {
            format!("{}={}", varspec.varname, joined)
        }
    }
}
