pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

pub struct Parser<'a> {
    pub(crate) iter: std::iter::Peekable<crate::lexer::Tokenizer<'a>>,
    pub errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: crate::lexer::Tokenizer<'a>) -> Self {
        Self {
            iter: tokenizer.peekable(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    /// Parses until the token stream is exhausted. A tree is always
    /// produced; `errors` must be checked before trusting it.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.iter.peek().is_some() {
            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    self.errors.push(error);
                    self.recover();
                }
            }
            self.iter
                .next_if(|token| token.kind == TokenKind::SemiColon);
        }

        Program { statements }
    }

    // Skip to the next statement boundary so later statements still get
    // their own diagnostics.
    fn recover(&mut self) {
        for token in self.iter.by_ref() {
            if token.kind == TokenKind::SemiColon {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::ast::{Expression, Statement};
    use crate::lexer::Tokenizer;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> (crate::ast::Program, Vec<super::ParseError>) {
        let mut parser = Parser::new(Tokenizer::new(input));
        let program = parser.parse_program();
        (program, parser.errors)
    }

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let (program, errors) = parse(input);
            assert!(errors.is_empty(), "unexpected errors for {input:?}: {errors:?}");
            assert_eq!(program.to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b", "((-a) * b);\n"),
            ("!-a", "(!(-a));\n"),
            ("a + b + c", "((a + b) + c);\n"),
            ("a + b - c", "((a + b) - c);\n"),
            ("a * b * c", "((a * b) * c);\n"),
            ("a * b / c", "((a * b) / c);\n"),
            ("a + b / c", "(a + (b / c));\n"),
            (
                "a + b * c + d / e - f",
                "(((a + (b * c)) + (d / e)) - f);\n",
            ),
            ("3 + 4; -5 * 5", "(3 + 4);\n((-5) * 5);\n"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));\n"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));\n"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));\n",
            ),
            ("true", "true;\n"),
            ("false", "false;\n"),
            ("3 < 5 == true", "((3 < 5) == true);\n"),
            ("3 > 5 == false", "((3 > 5) == false);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouped_expressions() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);\n"),
            ("(5 + 5) * 2", "((5 + 5) * 2);\n"),
            ("2 / (5 + 5)", "(2 / (5 + 5));\n"),
            ("-(5 + 5)", "(-(5 + 5));\n"),
            ("!(true == true)", "(!(true == true));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expressions() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d);\n"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));\n",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g));\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_index_expressions() {
        let tests = vec![
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d);\n",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])));\n",
            ),
            ("myArray[1 + 1]", "(myArray[(1 + 1)]);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditionals() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) {x;};\n"),
            (
                "if (x < y) { x } else { y }",
                "if (x < y) {x;} else {y;};\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional_requires_parentheses() {
        let (_, errors) = parse("if x < y { x }");
        // The leftover tokens cascade into further diagnostics; the first
        // one names the real problem.
        assert!(!errors.is_empty());
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be (, got IDENT instead."
        );
    }

    #[test]
    fn test_function_literals() {
        let tests = vec![
            ("fn() {};", "fn() {};\n"),
            ("fn(x) {};", "fn(x) {};\n"),
            ("fn(x, y, z) {};", "fn(x, y, z) {};\n"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) {(person[\"name\"]);};\n",
            ),
            ("fn(x, y) { x + y }", "fn(x, y) {(x + y);};\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_let_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;\n"),
            ("let y = true;", "let y = true;\n"),
            ("let foo = y;", "let foo = y;\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_return_statements() {
        let tests = vec![
            ("return 5;", "return 5;\n"),
            ("return 10;", "return 10;\n"),
            ("return 2 * 3;", "return (2 * 3);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements_without_semicolons() {
        let tests = vec![
            ("let a = 1 let b = 2", "let a = 1;\nlet b = 2;\n"),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                "if (10 > 1) {if (10 > 1) {return 10;}; return 1;};\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_string_literal() {
        let tests = vec![("\"hello world\";", "\"hello world\";\n")];

        test_parsing(tests)
    }

    #[test]
    fn test_array_literals() {
        let tests = vec![
            ("[]", "[];\n"),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)];\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_hash_literals() {
        let tests = vec![
            ("{}", "{};\n"),
            (
                "{\"one\": 1, \"two\": 2, \"three\": 3}",
                "{\"one\": 1, \"two\": 2, \"three\": 3};\n",
            ),
            (
                "{\"one\": 0 + 1, \"two\": 10 - 8, \"three\": 15 / 5}",
                "{\"one\": (0 + 1), \"two\": (10 - 8), \"three\": (15 / 5)};\n",
            ),
            ("{1: 2, true: 3}", "{1: 2, true: 3};\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_error_recovery() {
        let (program, errors) = parse("let x = 5; let y = 10; let 838383;");

        // The malformed third statement is dropped; the first two survive.
        assert_eq!(program.statements.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be IDENT, got INT instead."
        );
    }

    #[test]
    fn test_missing_assign() {
        let (program, errors) = parse("let x 5;");

        assert_eq!(program.statements.len(), 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "expected next token to be =, got INT instead."
        );
    }

    #[test]
    fn test_invalid_expression_sentinel() {
        let (program, errors) = parse("let x = ;");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "no prefix parse function for ; found."
        );
        match &program.statements[..] {
            [Statement::Let(statement)] => {
                assert_eq!(statement.identifier.name.as_ref(), "x");
                assert_eq!(statement.value, Expression::Invalid);
            }
            other => panic!("expected a single let statement, got {other:?}"),
        }
    }

    #[test]
    fn test_integer_literal_overflow() {
        let (program, errors) = parse("99999999999999999999999;");

        assert_eq!(errors.len(), 1);
        // The literal defaults to 0 so the expression still parses.
        assert_eq!(
            program.statements,
            vec![Statement::Expression(Expression::IntegerLiteral(0))]
        );
    }

    #[test]
    fn test_render_is_stable() {
        let inputs = vec![
            "a + b * c",
            "let x = 5; let y = x + 1;",
            "if (x < y) { x } else { y }",
            "let getName = fn(person) { person[\"name\"] };",
            "add(1, 2 * 3, [4, 5][0], {\"six\": 6})",
            "return -a * b;",
        ];
        for input in inputs {
            let (program, errors) = parse(input);
            assert!(errors.is_empty(), "unexpected errors for {input:?}: {errors:?}");
            let rendered = program.to_string();

            let (reparsed, errors) = parse(&rendered);
            assert!(errors.is_empty(), "render of {input:?} did not reparse: {errors:?}");
            assert_eq!(reparsed.to_string(), rendered, "input: {input}");
        }
    }
}
