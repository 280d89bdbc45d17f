use crate::ast::{Expression, Identifier, Statement};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::{ParseError, Parser};

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let token = parser.iter.peek();
    match token.map(|t| &t.kind) {
        Some(TokenKind::Let) => Ok(Statement::Let(parse_let_statement(parser)?)),
        Some(TokenKind::Return) => Ok(Statement::Return(parse_return_statement(parser)?)),
        _ => Ok(Statement::Expression(expression_or_invalid(parser))),
    }
}

fn parse_let_statement(parser: &mut Parser) -> Result<crate::ast::LetStatement, ParseError> {
    parser.expect_token(TokenKind::Let)?;
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = expression_or_invalid(parser);

    Ok(crate::ast::LetStatement {
        identifier: Identifier { name },
        value,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Result<crate::ast::ReturnStatement, ParseError> {
    parser.expect_token(TokenKind::Return)?;
    let value = expression_or_invalid(parser);

    Ok(crate::ast::ReturnStatement { value })
}

// A failed expression in value position does not take the whole statement
// down: the diagnostic is recorded and the sentinel keeps the tree whole.
fn expression_or_invalid(parser: &mut Parser) -> Expression {
    match parse_expression(parser, Precedence::Lowest) {
        Ok(expression) => expression,
        Err(error) => {
            parser.errors.push(error);
            Expression::Invalid
        }
    }
}
