use crate::token::{Token, TokenKind};

/// Hand-written scanner for Nova source text.
///
/// Positions are 1-based. Unlexable input is returned as
/// [`TokenKind::Error`] tokens whose text describes the problem, so the
/// parser can surface it as an ordinary diagnostic.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let line = self.line;
        let column = self.column;

        if self.is_at_end() {
            return Token::new(TokenKind::Eof, "", line, column);
        }

        let c = self.current();
        if c.is_ascii_alphabetic() || c == '_' {
            return self.identifier();
        }
        if c.is_ascii_digit() {
            return self.number();
        }
        if c == '"' {
            return self.string_literal();
        }

        self.advance();
        match c {
            '+' => Token::new(TokenKind::Plus, "+", line, column),
            '-' => Token::new(TokenKind::Minus, "-", line, column),
            '*' => Token::new(TokenKind::Star, "*", line, column),
            '/' => Token::new(TokenKind::Slash, "/", line, column),
            '%' => Token::new(TokenKind::Percent, "%", line, column),
            '(' => Token::new(TokenKind::LeftParen, "(", line, column),
            ')' => Token::new(TokenKind::RightParen, ")", line, column),
            '{' => Token::new(TokenKind::LeftBrace, "{", line, column),
            '}' => Token::new(TokenKind::RightBrace, "}", line, column),
            '[' => Token::new(TokenKind::LeftBracket, "[", line, column),
            ']' => Token::new(TokenKind::RightBracket, "]", line, column),
            ';' => Token::new(TokenKind::Semicolon, ";", line, column),
            ',' => Token::new(TokenKind::Comma, ",", line, column),
            '.' => Token::new(TokenKind::Dot, ".", line, column),
            '=' => {
                if self.current() == '=' {
                    self.advance();
                    Token::new(TokenKind::Equal, "==", line, column)
                } else {
                    Token::new(TokenKind::Assign, "=", line, column)
                }
            }
            '!' => {
                if self.current() == '=' {
                    self.advance();
                    Token::new(TokenKind::NotEqual, "!=", line, column)
                } else {
                    Token::new(TokenKind::Not, "!", line, column)
                }
            }
            '<' => {
                if self.current() == '=' {
                    self.advance();
                    Token::new(TokenKind::LessEqual, "<=", line, column)
                } else {
                    Token::new(TokenKind::Less, "<", line, column)
                }
            }
            '>' => {
                if self.current() == '=' {
                    self.advance();
                    Token::new(TokenKind::GreaterEqual, ">=", line, column)
                } else {
                    Token::new(TokenKind::Greater, ">", line, column)
                }
            }
            '&' => {
                if self.current() == '&' {
                    self.advance();
                    Token::new(TokenKind::And, "&&", line, column)
                } else {
                    Token::new(TokenKind::Error, "Unexpected character '&'", line, column)
                }
            }
            '|' => {
                if self.current() == '|' {
                    self.advance();
                    Token::new(TokenKind::Or, "||", line, column)
                } else {
                    Token::new(TokenKind::Error, "Unexpected character '|'", line, column)
                }
            }
            _ => Token::new(
                TokenKind::Error,
                format!("Unexpected character '{c}'"),
                line,
                column,
            ),
        }
    }

    fn identifier(&mut self) -> Token {
        let line = self.line;
        let column = self.column;
        let start = self.pos;
        while self.current().is_ascii_alphanumeric() || self.current() == '_' {
            self.advance();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let kind = keyword(&text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, line, column)
    }

    fn number(&mut self) -> Token {
        let line = self.line;
        let column = self.column;
        let start = self.pos;
        while self.current().is_ascii_digit() {
            self.advance();
        }
        let mut kind = TokenKind::IntLiteral;
        // A dot only belongs to the number when a digit follows, so "7."
        // lexes as an int followed by a dot.
        if self.current() == '.' && self.lookahead().is_ascii_digit() {
            kind = TokenKind::FloatLiteral;
            self.advance();
            while self.current().is_ascii_digit() {
                self.advance();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        Token::new(kind, text, line, column)
    }

    fn string_literal(&mut self) -> Token {
        self.advance();
        let line = self.line;
        let column = self.column;
        let mut value = String::new();
        while !self.is_at_end() && self.current() != '"' {
            if self.current() == '\\' {
                // Escapes are kept verbatim; codegen writes them back out
                // unchanged for the C compiler to interpret.
                value.push(self.current());
                self.advance();
                if !self.is_at_end() {
                    value.push(self.current());
                    self.advance();
                }
            } else {
                value.push(self.current());
                self.advance();
            }
        }
        if self.is_at_end() {
            return Token::new(TokenKind::Error, "Unterminated string", self.line, self.column);
        }
        self.advance();
        Token::new(TokenKind::StringLiteral, value, line, column)
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.current().is_ascii_whitespace() {
                self.advance();
            }
            if self.current() == '/' && self.lookahead() == '/' {
                while !self.is_at_end() && self.current() != '\n' {
                    self.advance();
                }
                continue;
            }
            break;
        }
    }

    fn current(&self) -> char {
        self.chars.get(self.pos).copied().unwrap_or('\0')
    }

    fn lookahead(&self) -> char {
        self.chars.get(self.pos + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn advance(&mut self) {
        if let Some(&c) = self.chars.get(self.pos) {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "string" => TokenKind::String,
        "bool" => TokenKind::Bool,
        "void" => TokenKind::Void,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "print" => TokenKind::Print,
        _ => return None,
    };
    Some(kind)
}
