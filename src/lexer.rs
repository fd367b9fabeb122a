/// Represents the different kinds of tokens found in JS object literal text.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input.
    Eof,
    /// Represents a sequence of one or more whitespace characters.
    Whitespace,
    /// A `// line` or `/* block */` comment. The associated `String` is the trimmed body.
    Comment(String),
    /// Represents a token that could not be recognized: a stray character, an unclosed
    /// string or an unclosed block comment.
    Unknown,

    // == Literals ==
    /// An identifier, used for unquoted keys and for the `var name =` prefix.
    Identifier(String),
    /// A string literal in single or double quotes, with escapes already applied.
    String(String),
    /// A whole number that fits in an `i64` (decimal or `0x` hexadecimal).
    Integer(i64),
    /// Any other number, including `Infinity`, `-Infinity` and `NaN`.
    Number(f64),

    // == Keywords ==
    True,
    False,
    Null,
    Undefined,

    // == Punctuation ==
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Left Bracket: `[`
    LBracket,
    /// Right Bracket: `]`
    RBracket,
    /// Left Parenthesis: `(`
    LParen,
    /// Right Parenthesis: `)`
    RParen,
    /// Comma: `,`
    Comma,
    /// Colon: `:`
    Colon,
    /// Semicolon: `;` (may terminate a `var x = {...};` statement)
    Semicolon,
    /// Equals: `=`
    Equals,
}

/// A token with its type and byte position
#[derive(Debug, Clone)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.ttype == TokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        let ttype = if let Some(char) = self.advance() {
            match char {
                '{' => TokenType::LBrace,
                '}' => TokenType::RBrace,
                '[' => TokenType::LBracket,
                ']' => TokenType::RBracket,
                '(' => TokenType::LParen,
                ')' => TokenType::RParen,
                ',' => TokenType::Comma,
                ':' => TokenType::Colon,
                ';' => TokenType::Semicolon,
                '=' => TokenType::Equals,
                '/' => match self.peek() {
                    Some('/') => self.read_line_comment(),
                    Some('*') => self.read_block_comment(),
                    _ => TokenType::Unknown,
                },
                '"' | '\'' => self.read_string(char),
                c if c.is_whitespace() => self.read_whitespace(),
                c if is_identifier_start(c) => self.read_identifier(c),
                '-' if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) => {
                    self.read_negative_keyword()
                }
                c if c.is_ascii_digit()
                    || ((c == '-' || c == '+' || c == '.')
                        && self.peek().is_some_and(|c| c.is_ascii_digit() || *c == '.')) =>
                {
                    self.read_number(c)
                }
                _ => TokenType::Unknown,
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn read_whitespace(&mut self) -> TokenType {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
        TokenType::Whitespace
    }

    fn read_line_comment(&mut self) -> TokenType {
        self.advance(); // Consume the second '/'
        let mut comment_text = String::new();
        while let Some(&c) = self.peek() {
            if c == '\n' {
                break;
            }
            comment_text.push(c);
            self.advance();
        }
        TokenType::Comment(comment_text.trim().to_string())
    }

    fn read_block_comment(&mut self) -> TokenType {
        self.advance(); // Consume the '*'
        let mut comment_text = String::new();
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some(&'/') {
                self.advance();
                return TokenType::Comment(comment_text.trim().to_string());
            }
            comment_text.push(c);
        }
        TokenType::Unknown // Unclosed block comment
    }

    fn read_string(&mut self, quote: char) -> TokenType {
        let mut value = String::new();
        while let Some(c) = self.advance() {
            if c == quote {
                return TokenType::String(value);
            }
            if c == '\n' {
                return TokenType::Unknown; // Raw newline inside a string
            }
            if c != '\\' {
                value.push(c);
                continue;
            }
            match self.advance() {
                Some('n') => value.push('\n'),
                Some('r') => value.push('\r'),
                Some('t') => value.push('\t'),
                Some('b') => value.push('\u{8}'),
                Some('f') => value.push('\u{c}'),
                Some('v') => value.push('\u{b}'),
                Some('0') => value.push('\0'),
                Some('\n') => {} // Line continuation
                Some('u') => match self.read_unicode_escape() {
                    Some(decoded) => value.push(decoded),
                    None => return TokenType::Unknown,
                },
                // \" \' \\ \/ and any other escaped character stand for themselves
                Some(other) => value.push(other),
                None => return TokenType::Unknown, // Unclosed escape sequence
            }
        }
        TokenType::Unknown // Unclosed string
    }

    fn read_unicode_escape(&mut self) -> Option<char> {
        let mut digits = String::with_capacity(4);
        for _ in 0..4 {
            let c = self.advance()?;
            if !c.is_ascii_hexdigit() {
                return None;
            }
            digits.push(c);
        }
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    }

    fn read_identifier(&mut self, first_char: char) -> TokenType {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(&c) = self.peek() {
            if is_identifier_part(c) {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => TokenType::True,
            "false" => TokenType::False,
            "null" => TokenType::Null,
            "undefined" => TokenType::Undefined,
            "NaN" => TokenType::Number(f64::NAN),
            "Infinity" => TokenType::Number(f64::INFINITY),
            _ => TokenType::Identifier(ident),
        }
    }

    fn read_negative_keyword(&mut self) -> TokenType {
        let mut ident = String::new();
        while let Some(&c) = self.peek() {
            if is_identifier_part(c) {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if ident == "Infinity" {
            TokenType::Number(f64::NEG_INFINITY)
        } else {
            TokenType::Unknown
        }
    }

    fn read_number(&mut self, first_char: char) -> TokenType {
        let mut number_str = String::new();
        if first_char != '+' {
            number_str.push(first_char);
        }

        let leading_digit = if first_char.is_ascii_digit() {
            Some(first_char)
        } else {
            None
        };
        if leading_digit == Some('0') && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            return self.read_hex(false);
        }
        if first_char == '-' && self.peek() == Some(&'0') {
            number_str.push('0');
            self.advance();
            if matches!(self.peek(), Some('x' | 'X')) {
                self.advance();
                return self.read_hex(true);
            }
        }

        let mut has_dot = first_char == '.';
        let mut has_exponent = false;

        while let Some(&c) = self.peek() {
            if c.is_ascii_digit() {
                number_str.push(c);
                self.advance();
            } else if c == '.' && !has_dot && !has_exponent {
                has_dot = true;
                number_str.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E') && !has_exponent {
                has_exponent = true;
                number_str.push(c);
                self.advance();
                // Check for optional sign after 'e' or 'E'
                if let Some(&sign_char) = self.peek() {
                    if sign_char == '+' || sign_char == '-' {
                        number_str.push(sign_char);
                        self.advance();
                    }
                }
            } else {
                break;
            }
        }

        if !has_dot && !has_exponent {
            if let Ok(int) = number_str.parse::<i64>() {
                return TokenType::Integer(int);
            }
        }
        match number_str.parse::<f64>() {
            Ok(num) => TokenType::Number(num),
            Err(_) => TokenType::Unknown,
        }
    }

    fn read_hex(&mut self, negative: bool) -> TokenType {
        let mut digits = String::new();
        while let Some(&c) = self.peek() {
            if c.is_ascii_hexdigit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match i64::from_str_radix(&digits, 16) {
            Ok(int) if negative => TokenType::Integer(-int),
            Ok(int) => TokenType::Integer(int),
            Err(_) => TokenType::Unknown,
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
