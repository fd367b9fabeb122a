use crate::ast::{LiteralDocument, LiteralKind, LiteralValue, Property};
use crate::error::LiteralError;
use crate::lexer::{Lexer, Token, TokenType};
use crate::utils::get_line_and_column;
use miette::NamedSource;
use std::sync::Arc;

/// Deepest object/array nesting accepted, the same limit `serde_json` applies.
pub const MAX_DEPTH: usize = 128;

/// A recursive descent parser for JS object literal text.
#[derive(Debug)]
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "literal.js".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        let mut lexer = Lexer::new(source_text);
        let tokens: Vec<Token> = lexer
            .lex()
            .into_iter()
            .filter(|t| !matches!(t.ttype, TokenType::Whitespace | TokenType::Comment(_)))
            .collect();

        Self {
            source,
            tokens,
            position: 0,
            depth: 0,
            source_text,
        }
    }

    // === Main Parsing Methods ===

    ///    Document ::= [ Binding ] Value [ ";" ]
    ///    Binding  ::= ( "var" | "let" | "const" ) Identifier "="
    pub fn parse_document(&mut self) -> Result<LiteralDocument, LiteralError> {
        let binding = self.parse_optional_binding()?;
        let root = self.parse_value()?;
        self.match_token(TokenType::Semicolon);
        self.expect(TokenType::Eof)?;
        Ok(LiteralDocument { binding, root })
    }

    fn parse_optional_binding(&mut self) -> Result<Option<String>, LiteralError> {
        let is_declaration = matches!(
            &self.current_token()?.ttype,
            TokenType::Identifier(word) if matches!(word.as_str(), "var" | "let" | "const")
        );
        if !is_declaration {
            return Ok(None);
        }
        self.advance();
        let name = match &self.current_token()?.ttype {
            TokenType::Identifier(name) => name.clone(),
            _ => return self.err_unexpected("a variable name"),
        };
        self.advance();
        self.expect(TokenType::Equals)?;
        Ok(Some(name))
    }

    /// Object ::= "{" [ PropertyList ] "}"
    /// PropertyList ::= Property { "," Property } [ "," ]
    fn parse_object(&mut self) -> Result<LiteralValue, LiteralError> {
        let start_token = self.current_token()?.clone();
        self.expect(TokenType::LBrace)?;
        let mut properties = Vec::new();
        if !self.check(TokenType::RBrace) {
            properties.push(self.parse_property()?);
            while self.match_token(TokenType::Comma) {
                // A comma directly before the brace is a trailing comma
                if self.check(TokenType::RBrace) {
                    break;
                }
                properties.push(self.parse_property()?);
            }
        }
        let end_token = self.current_token()?.clone();
        self.expect(TokenType::RBrace)?;
        Ok(LiteralValue {
            kind: LiteralKind::Object(properties),
            pos_start: start_token.pos_start,
            pos_end: end_token.pos_end,
        })
    }

    /// Array ::= "[" [ ValueList ] "]"
    /// ValueList ::= Value { "," Value } [ "," ]
    fn parse_array(&mut self) -> Result<LiteralValue, LiteralError> {
        let start_token = self.current_token()?.clone();
        self.expect(TokenType::LBracket)?;
        let mut values = Vec::new();
        if !self.check(TokenType::RBracket) {
            loop {
                values.push(self.parse_value()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
                if self.check(TokenType::RBracket) {
                    break; // Allow trailing comma
                }
            }
        }
        let end_token = self.current_token()?.clone();
        self.expect(TokenType::RBracket)?;
        Ok(LiteralValue {
            kind: LiteralKind::Array(values),
            pos_start: start_token.pos_start,
            pos_end: end_token.pos_end,
        })
    }

    /// Value ::= Object | Array | String | Number | "true" | "false" | "null" | "undefined"
    fn parse_value(&mut self) -> Result<LiteralValue, LiteralError> {
        let start_token = self.current_token()?.clone();

        let kind = match &start_token.ttype {
            TokenType::LBrace | TokenType::LBracket => return self.parse_nested(&start_token),
            TokenType::String(s) => LiteralKind::String(s.clone()),
            TokenType::Integer(i) => LiteralKind::Integer(*i),
            TokenType::Number(n) => LiteralKind::Number(*n),
            TokenType::True => LiteralKind::Boolean(true),
            TokenType::False => LiteralKind::Boolean(false),
            TokenType::Null => LiteralKind::Null,
            TokenType::Undefined => LiteralKind::Undefined,
            TokenType::Unknown => return self.err_invalid(&start_token),
            TokenType::Eof => return self.err_eof(),
            _ => return self.err_unexpected("a value"),
        };
        self.advance();

        Ok(LiteralValue {
            kind,
            pos_start: start_token.pos_start,
            pos_end: start_token.pos_end,
        })
    }

    fn parse_nested(&mut self, start_token: &Token) -> Result<LiteralValue, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep {
                src: (*self.source).clone(),
                span: (start_token.pos_start, start_token.pos_end - start_token.pos_start).into(),
                limit: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let nested = if start_token.ttype == TokenType::LBrace {
            self.parse_object()
        } else {
            self.parse_array()
        };
        self.depth -= 1;
        nested
    }

    /// Property ::= Key ":" Value
    fn parse_property(&mut self) -> Result<Property, LiteralError> {
        let key_token = self.current_token()?.clone();
        let key = self.parse_key()?;
        self.expect(TokenType::Colon)?;
        let value = self.parse_value()?;

        Ok(Property {
            key,
            key_span: (key_token.pos_start, key_token.pos_end - key_token.pos_start).into(),
            value,
        })
    }

    // === Sub-Rules ===

    /// Key ::= Identifier | String | Number | Keyword
    fn parse_key(&mut self) -> Result<String, LiteralError> {
        let token = self.current_token()?;
        let key = match &token.ttype {
            TokenType::Identifier(s) | TokenType::String(s) => s.clone(),
            TokenType::Integer(i) => i.to_string(),
            TokenType::Number(n) => n.to_string(),
            TokenType::True => "true".to_string(),
            TokenType::False => "false".to_string(),
            TokenType::Null => "null".to_string(),
            TokenType::Undefined => "undefined".to_string(),
            TokenType::Unknown => {
                let token = token.clone();
                return self.err_invalid(&token);
            }
            _ => return self.err_unexpected("an identifier or string for a key"),
        };
        self.advance();
        Ok(key)
    }

    // === Tokenizer Helper Methods ===

    fn current_token(&self) -> Result<&Token, LiteralError> {
        self.tokens.get(self.position).ok_or_else(|| {
            let pos = self.source_text.len().saturating_sub(1);
            LiteralError::UnexpectedEof {
                src: (*self.source).clone(),
                span: (pos, 0).into(),
            }
        })
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: TokenType) -> Result<(), LiteralError> {
        let token = self.current_token()?.clone();
        if std::mem::discriminant(&token.ttype) == std::mem::discriminant(&expected) {
            self.advance();
            Ok(())
        } else if token.ttype == TokenType::Eof {
            self.err_eof()
        } else {
            self.err_unexpected(&format!("{expected:?}"))
        }
    }

    fn match_token(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, ttype: TokenType) -> bool {
        if let Ok(token) = self.current_token() {
            std::mem::discriminant(&token.ttype) == std::mem::discriminant(&ttype)
        } else {
            false
        }
    }

    fn err_unexpected<T>(&self, expected: &str) -> Result<T, LiteralError> {
        let token = self.current_token()?;
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(LiteralError::UnexpectedToken {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            expected: expected.to_string(),
            line,
            column,
        })
    }

    fn err_invalid<T>(&self, token: &Token) -> Result<T, LiteralError> {
        Err(LiteralError::InvalidToken {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
        })
    }

    fn err_eof<T>(&self) -> Result<T, LiteralError> {
        let pos = self.source_text.len().saturating_sub(1);
        Err(LiteralError::UnexpectedEof {
            src: (*self.source).clone(),
            span: (pos, 0).into(),
        })
    }
}
