use std::fmt;

/// A lexical unit of a template string.
///
/// Symbol tokens are exactly one character long. Literal tokens are maximal
/// runs of non-symbol characters. `EndOfTemplate` carries no text.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    Ampersand,
    Asterisk,
    Comma,
    EqualsSign,
    LeftBrace,
    RightBrace,
    Slash,
    QuestionMark,
    Literal,
    EndOfTemplate,
}

/// Lazily splits a template into [`Token`]s, always finishing with a single
/// `EndOfTemplate`. Lexing cannot fail: anything that is not a symbol is
/// literal text.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    template: &'a str,
    start: usize,
    position: usize,
    pending: Option<Token<'a>>,
    finished: bool,
}

impl<'a> Token<'a> {
    pub fn end_of_template() -> Self {
        Token {
            kind: TokenKind::EndOfTemplate,
            text: "",
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.text)
    }
}

impl TokenKind {
    fn from_byte(b: u8) -> Option<TokenKind> {
        match b {
            b'&' => Some(TokenKind::Ampersand),
            b'*' => Some(TokenKind::Asterisk),
            b'{' => Some(TokenKind::LeftBrace),
            b'}' => Some(TokenKind::RightBrace),
            b',' => Some(TokenKind::Comma),
            b'=' => Some(TokenKind::EqualsSign),
            b'?' => Some(TokenKind::QuestionMark),
            b'/' => Some(TokenKind::Slash),
            _ => None,
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(template: &'a str) -> Self {
        Lexer {
            template,
            start: 0,
            position: 0,
            pending: None,
            finished: false,
        }
    }

    fn literal(&self, end: usize) -> Option<Token<'a>> {
        if self.start < end {
            Some(Token {
                kind: TokenKind::Literal,
                text: &self.template[self.start..end],
            })
        } else {
            None
        }
    }
}

/// Shorthand for [`Lexer::new`].
pub fn lex(template: &str) -> Lexer<'_> {
    Lexer::new(template)
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        // Symbols are ASCII, so every symbol byte sits on a char boundary.
        let bytes = self.template.as_bytes();
        while self.position < bytes.len() {
            let i = self.position;
            match TokenKind::from_byte(bytes[i]) {
                None => self.position += 1,
                Some(kind) => {
                    let symbol = Token {
                        kind,
                        text: &self.template[i..i + 1],
                    };
                    let literal = self.literal(i);
                    self.position = i + 1;
                    self.start = self.position;
                    return match literal {
                        Some(literal) => {
                            self.pending = Some(symbol);
                            Some(literal)
                        }
                        None => Some(symbol),
                    };
                }
            }
        }
        if let Some(literal) = self.literal(self.position) {
            self.start = self.position;
            return Some(literal);
        }
        if self.finished {
            None
        } else {
            self.finished = true;
            Some(Token::end_of_template())
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(template: &str) -> Vec<TokenKind> {
        lex(template).map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(kinds(""), [TokenKind::EndOfTemplate]);
    }

    #[test]
    fn test_literal() {
        let tokens: Vec<_> = lex("abc").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Literal);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[0].len(), 3);
        assert!(tokens[1].is_empty());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            kinds("&*{},=?/"),
            [
                TokenKind::Ampersand,
                TokenKind::Asterisk,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::EqualsSign,
                TokenKind::QuestionMark,
                TokenKind::Slash,
                TokenKind::EndOfTemplate,
            ]
        );
    }

    #[test]
    fn test_mixed() {
        let tokens: Vec<_> = lex("/foo{?bar*}baz").map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            tokens,
            [
                (TokenKind::Slash, "/"),
                (TokenKind::Literal, "foo"),
                (TokenKind::LeftBrace, "{"),
                (TokenKind::QuestionMark, "?"),
                (TokenKind::Literal, "bar"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::RightBrace, "}"),
                (TokenKind::Literal, "baz"),
                (TokenKind::EndOfTemplate, ""),
            ]
        );
    }

    #[test]
    fn test_multibyte_literal() {
        let tokens: Vec<_> = lex("é/ü").map(|t| t.text).collect();
        assert_eq!(tokens, ["é", "/", "ü", ""]);
    }

    #[test]
    fn test_fused() {
        let mut lexer = lex("a");
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_some());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }
}
