//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with the usual operator
//! precedence.

use crate::ast::{BinaryOperator, CellReference, FormulaExpr, NumberLiteral, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Deepest parenthesis, unary or exponent nesting the parser will follow
pub const MAX_NESTING: usize = 64;

/// Most operator nodes a single formula may contain
pub const MAX_OPERATORS: usize = 1024;

/// A parsed formula and the deepest nesting the parser had to follow for it
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    pub expr: FormulaExpr,
    pub nesting: usize,
}

/// Parse a formula string into an AST
///
/// A leading `=` is stripped if present. Nesting is limited to [`MAX_NESTING`].
///
/// # Example
/// ```rust
/// use cellgrid_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=B1*(A2-3)**2").unwrap();
/// assert!(parse_formula("=1+").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    parse_formula_bounded(formula, MAX_NESTING).map(|parsed| parsed.expr)
}

/// Parse a formula, allowing at most `max_nesting` levels of nesting
///
/// `max_nesting` is clamped to [`MAX_NESTING`]. Going deeper fails with
/// [`FormulaError::TooDeeplyNested`].
///
/// # Example
/// ```rust
/// use cellgrid_formula::parser::parse_formula_bounded;
///
/// let parsed = parse_formula_bounded("=-(1+(2))", 8).unwrap();
/// assert_eq!(parsed.nesting, 3);
/// assert!(parse_formula_bounded("=-(1+(2))", 2).is_err());
/// ```
pub fn parse_formula_bounded(formula: &str, max_nesting: usize) -> FormulaResult<ParsedFormula> {
    let formula = formula.strip_prefix('=').unwrap_or(formula);

    let mut parser = FormulaParser::new(formula, max_nesting.min(MAX_NESTING));
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(ParsedFormula {
        expr,
        nesting: parser.deepest,
    })
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(NumberLiteral),
    Identifier(String),

    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Percent,

    LeftParen,
    RightParen,

    /// Character outside the formula alphabet
    Invalid(char),
    /// Numeric literal that cannot be represented
    Malformed(String),

    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    nesting: usize,
    max_nesting: usize,
    deepest: usize,
    operators: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str, max_nesting: usize) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            nesting: 0,
            max_nesting,
            deepest: 0,
            operators: 0,
        };
        parser.advance_token();
        parser
    }

    // === Token scanning ===

    fn advance_token(&mut self) {
        self.current_token = self.scan_token();
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::Eof,
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return token;
        }

        if c == '*' {
            self.advance();
            if self.peek_char() == Some('*') {
                self.advance();
                return Token::DoubleStar;
            }
            return Token::Star;
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit())) {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        self.advance();
        Token::Invalid(c)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let mut is_float = false;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            is_float = true;
            self.advance();
            self.skip_digits();
        }

        // Exponent part, only when digits actually follow
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let digits_at = match self.peek_char_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_char_at(digits_at).map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..digits_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        let literal = if is_float {
            text.parse().ok().map(NumberLiteral::Float)
        } else {
            text.parse().ok().map(NumberLiteral::Int)
        };

        match literal {
            Some(n) => Token::Number(n),
            None => Token::Malformed(text.to_string()),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::Identifier(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> Token {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token();
        token
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > self.max_nesting {
            return Err(FormulaError::TooDeeplyNested(self.max_nesting));
        }
        self.deepest = self.deepest.max(self.nesting);
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn count_operator(&mut self) -> FormulaResult<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(FormulaError::Parse("Formula has too many operators".into()));
        }
        Ok(())
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division/Modulo: *, /, %
    // 3. Unary: -
    // 4. Exponentiation: ** (right associative, binds tighter than a unary on its left)
    // 5. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            self.count_operator()?;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                Token::Percent => BinaryOperator::Modulo,
                _ => break,
            };

            self.consume();
            self.count_operator()?;
            let right = self.parse_unary()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            self.count_operator()?;
            self.enter()?;
            let operand = self.parse_unary()?;
            self.leave();
            return Ok(FormulaExpr::unary(UnaryOperator::Negate, operand));
        }

        self.parse_power()
    }

    fn parse_power(&mut self) -> FormulaResult<FormulaExpr> {
        let left = self.parse_primary()?;

        if matches!(self.current_token(), Token::DoubleStar) {
            self.consume();
            self.count_operator()?;
            self.enter()?;
            // Right associative, and the exponent may carry its own sign: 2**-1
            let right = self.parse_unary()?;
            self.leave();
            return Ok(FormulaExpr::binary(BinaryOperator::Power, left, right));
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume();
                Ok(FormulaExpr::Number(n))
            }

            Token::Identifier(name) => {
                self.consume();
                Ok(FormulaExpr::Reference(CellReference::new(name)))
            }

            Token::LeftParen => {
                self.consume();
                self.enter()?;
                let expr = self.parse_expression()?;
                self.leave();
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Malformed(text) => Err(FormulaError::Parse(format!(
                "Number literal out of range: {}",
                text
            ))),

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> FormulaExpr {
        FormulaExpr::Number(NumberLiteral::Int(n))
    }

    fn reference(text: &str) -> FormulaExpr {
        FormulaExpr::Reference(CellReference::new(text))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("=42").unwrap(), int(42));
        assert_eq!(
            parse_formula("=3.14").unwrap(),
            FormulaExpr::Number(NumberLiteral::Float(3.14))
        );
        assert_eq!(
            parse_formula("=1e3").unwrap(),
            FormulaExpr::Number(NumberLiteral::Float(1000.0))
        );
        assert_eq!(
            parse_formula("=.5").unwrap(),
            FormulaExpr::Number(NumberLiteral::Float(0.5))
        );
        assert_eq!(
            parse_formula("=2.").unwrap(),
            FormulaExpr::Number(NumberLiteral::Float(2.0))
        );
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_formula("=B1").unwrap(), reference("B1"));
        assert_eq!(parse_formula("=b12").unwrap(), reference("b12"));
        // Resolved at evaluation time, not here
        assert_eq!(parse_formula("=AA1").unwrap(), reference("AA1"));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        // 1+(2*3)
        assert_eq!(
            parse_formula("=1+2*3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Add,
                int(1),
                FormulaExpr::binary(BinaryOperator::Multiply, int(2), int(3)),
            )
        );

        // (1-2)-3
        assert_eq!(
            parse_formula("=1-2-3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Subtract,
                FormulaExpr::binary(BinaryOperator::Subtract, int(1), int(2)),
                int(3),
            )
        );

        // (B1%2)*A1
        assert_eq!(
            parse_formula("=B1 % 2 * A1").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Multiply,
                FormulaExpr::binary(BinaryOperator::Modulo, reference("B1"), int(2)),
                reference("A1"),
            )
        );
    }

    #[test]
    fn test_parse_power() {
        // 2**(3**2)
        assert_eq!(
            parse_formula("=2**3**2").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Power,
                int(2),
                FormulaExpr::binary(BinaryOperator::Power, int(3), int(2)),
            )
        );

        // -(2**2)
        assert_eq!(
            parse_formula("=-2**2").unwrap(),
            FormulaExpr::unary(
                UnaryOperator::Negate,
                FormulaExpr::binary(BinaryOperator::Power, int(2), int(2)),
            )
        );

        // 2**(-1)
        assert_eq!(
            parse_formula("=2**-1").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Power,
                int(2),
                FormulaExpr::unary(UnaryOperator::Negate, int(1)),
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(
            parse_formula("=(1+2)*3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Multiply,
                FormulaExpr::binary(BinaryOperator::Add, int(1), int(2)),
                int(3),
            )
        );
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse_formula("= B1 + 2 ").unwrap(), parse_formula("=B1+2").unwrap());
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "=", "=1+", "=(1", "=1)", "=+1", "=1 2", "=2B1", "=1^2", "=1//2", "=SUM(A1)",
            "=\"x\"", "=1e", "=99999999999999999999",
        ] {
            assert!(
                matches!(parse_formula(bad), Err(FormulaError::Parse(_))),
                "expected parse error for {bad:?}"
            );
        }
    }

    fn parens(depth: usize, inner: &str) -> String {
        format!("={}{}{}", "(".repeat(depth), inner, ")".repeat(depth))
    }

    #[test]
    fn test_parse_nesting_limit() {
        assert_eq!(parse_formula(&parens(MAX_NESTING, "1")).unwrap(), int(1));
        assert_eq!(
            parse_formula(&parens(MAX_NESTING + 1, "1")),
            Err(FormulaError::TooDeeplyNested(MAX_NESTING))
        );
        assert_eq!(
            parse_formula(&parens(250, "A1")),
            Err(FormulaError::TooDeeplyNested(MAX_NESTING))
        );

        let unary = format!("={}1", "-".repeat(MAX_NESTING + 1));
        assert_eq!(parse_formula(&unary), Err(FormulaError::TooDeeplyNested(MAX_NESTING)));

        let power = format!("={}2", "2**".repeat(MAX_NESTING + 1));
        assert_eq!(parse_formula(&power), Err(FormulaError::TooDeeplyNested(MAX_NESTING)));
    }

    #[test]
    fn test_parse_reports_nesting() {
        assert_eq!(parse_formula_bounded("=1+2*3", 8).unwrap().nesting, 0);
        assert_eq!(parse_formula_bounded("=(1)+((2))", 8).unwrap().nesting, 2);
        assert_eq!(parse_formula_bounded("=2**-B1", 8).unwrap().nesting, 2);

        let parsed = parse_formula_bounded(&parens(5, "B1"), 5).unwrap();
        assert_eq!(parsed.expr, reference("B1"));
        assert_eq!(parsed.nesting, 5);
        assert_eq!(
            parse_formula_bounded(&parens(5, "B1"), 4),
            Err(FormulaError::TooDeeplyNested(4))
        );
        assert_eq!(
            parse_formula_bounded(&parens(MAX_NESTING + 1, "1"), usize::MAX),
            Err(FormulaError::TooDeeplyNested(MAX_NESTING))
        );
    }

    #[test]
    fn test_parse_operator_limit() {
        let longest = format!("=1{}", "+1".repeat(MAX_OPERATORS));
        assert!(parse_formula(&longest).is_ok());

        let long = format!("=1{}", "+1".repeat(MAX_OPERATORS + 1));
        assert!(matches!(parse_formula(&long), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_references() {
        let ast = parse_formula("=B1+B2*-(A3)").unwrap();
        let refs: Vec<_> = ast.references().into_iter().map(|r| r.text.as_str()).collect();
        assert_eq!(refs, vec!["B1", "B2", "A3"]);
    }
}
