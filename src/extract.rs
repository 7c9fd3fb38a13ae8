use tracing::debug;

use crate::item::{Component, Expression, Operator, Varspec};
use crate::values::Values;

/// Recovers variable values by matching `candidate` against `components`.
///
/// Path expressions capture up to the next `/` and query expressions up to
/// the next `&`; captured text is split on `,`. Any mismatch yields `None`.
pub fn extract_values(components: &[Component], candidate: &str) -> Option<Values> {
    if components.is_empty() != candidate.is_empty() {
        debug!(candidate, "template and candidate disagree on emptiness");
        return None;
    }

    let mut extractor = Extractor {
        candidate,
        query_start: candidate.find('?').unwrap_or(candidate.len()),
        index: 0,
        values: Values::new(),
    };

    let mut components = components.iter();
    while extractor.index < extractor.query_start {
        let component = match components.next() {
            Some(component) => component,
            None => break,
        };
        extractor.match_path_component(component)?;
    }
    for component in components {
        extractor.match_query_component(component)?;
    }

    if extractor.index < candidate.len() {
        debug!(
            candidate,
            index = extractor.index,
            "unmatched text after the last component"
        );
        return None;
    }
    Some(extractor.values)
}

struct Extractor<'a> {
    candidate: &'a str,
    query_start: usize,
    index: usize,
    values: Values,
}

impl<'a> Extractor<'a> {
    fn rest(&self) -> &'a str {
        let candidate = self.candidate;
        &candidate[self.index..]
    }

    fn match_literal(&mut self, literal: &str) -> Option<()> {
        if self.rest().starts_with(literal) {
            self.index += literal.len();
            Some(())
        } else {
            debug!(
                candidate = self.candidate,
                index = self.index,
                literal,
                "literal mismatch"
            );
            None
        }
    }

    /// Takes text up to `delimiter` or `end`, whichever comes first.
    fn take_until(&mut self, delimiter: char, end: usize) -> &'a str {
        let candidate = self.candidate;
        let region = &candidate[self.index..end];
        let len = region.find(delimiter).unwrap_or(region.len());
        self.index += len;
        &region[..len]
    }

    fn bind_split(&mut self, name: &str, text: &str) {
        if !text.is_empty() {
            self.values.insert(name, text.split(','));
        }
    }

    fn match_path_component(&mut self, component: &Component) -> Option<()> {
        match component {
            Component::Literal(literal) => self.match_literal(literal),
            Component::Expression(expression) => {
                if expression.operator.is_some() {
                    debug!(
                        candidate = self.candidate,
                        index = self.index,
                        %expression,
                        "query expression met in the path"
                    );
                    return None;
                }
                let varspec = expression.variable_list.first()?;
                let text = self.take_until('/', self.query_start);
                self.bind_split(&varspec.varname, text);
                Some(())
            }
        }
    }

    fn match_query_component(&mut self, component: &Component) -> Option<()> {
        match component {
            Component::Literal(literal) => self.match_literal(literal),
            Component::Expression(Expression {
                operator: None,
                variable_list,
            }) => {
                let varspec = variable_list.first()?;
                let text = self.take_until('&', self.candidate.len());
                self.bind_split(&varspec.varname, text);
                Some(())
            }
            Component::Expression(Expression {
                operator: Some(operator),
                variable_list,
            }) => {
                self.match_named(*operator, variable_list);
                Some(())
            }
        }
    }

    /// Consumes `?name=value` / `&name=value` pairs. Varspecs whose prefix
    /// is absent are left unbound.
    fn match_named(&mut self, operator: Operator, varspecs: &[Varspec]) {
        let mut lead = operator.as_char();
        for varspec in varspecs {
            let name = varspec.varname.as_str();
            let mut exploded = Vec::new();
            loop {
                let prefix = format!("{}{}=", lead, name);
                if !self.rest().starts_with(&prefix) {
                    break;
                }
                self.index += prefix.len();
                let text = self.take_until('&', self.candidate.len());
                lead = '&';
                if varspec.explode {
                    exploded.push(text);
                } else {
                    self.bind_split(name, text);
                    break;
                }
            }
            if !exploded.is_empty() {
                self.values.insert(name, exploded);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_template;

    fn extract(template: &str, candidate: &str) -> Option<Values> {
        let components = parse_template(template).unwrap();
        extract_values(&components, candidate)
    }

    #[test]
    fn test_empty() {
        assert_eq!(extract("", ""), Some(Values::new()));
        assert_eq!(extract("", "/x"), None);
        assert_eq!(extract("/x", ""), None);
    }

    #[test]
    fn test_path() {
        let values = extract("/item/{id}/parts/{part}", "/item/42/parts/a,b").unwrap();
        assert_eq!(&values["id"], ["42"]);
        assert_eq!(&values["part"], ["a", "b"]);
    }

    #[test]
    fn test_path_literal_mismatch() {
        assert_eq!(extract("/item/{id}", "/items/42"), None);
        assert_eq!(extract("/item/{id}/x", "/item/42/y"), None);
    }

    #[test]
    fn test_trailing_text() {
        assert_eq!(extract("/item/{id}", "/item/42/extra"), None);
    }

    #[test]
    fn test_empty_capture() {
        let values = extract("/item/{id}", "/item/").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_query() {
        let values = extract("/search{?q,page,tag*}", "/search?q=rust&page=2&tag=a&tag=b").unwrap();
        assert_eq!(&values["q"], ["rust"]);
        assert_eq!(&values["page"], ["2"]);
        assert_eq!(&values["tag"], ["a", "b"]);
    }

    #[test]
    fn test_query_missing_varspec() {
        let values = extract("/search{?q,page}", "/search?page=2").unwrap();
        assert!(!values.contains_key("q"));
        assert_eq!(&values["page"], ["2"]);
    }

    #[test]
    fn test_query_list() {
        let values = extract("/s{?ids}", "/s?ids=1,2,3").unwrap();
        assert_eq!(&values["ids"], ["1", "2", "3"]);
    }

    #[test]
    fn test_query_literal_and_plain_expression() {
        let values = extract("/s?fixed=1&q={q}{&page}", "/s?fixed=1&q=x,y&page=3").unwrap();
        assert_eq!(&values["q"], ["x", "y"]);
        assert_eq!(&values["page"], ["3"]);
    }

    #[test]
    fn test_query_expression_in_path() {
        assert_eq!(extract("/s{?q}", "/sx?q=1"), None);
    }

    #[test]
    fn test_query_literal_mismatch() {
        assert_eq!(extract("/s?fixed=1{&q}", "/s?fixed=2&q=1"), None);
    }
}
