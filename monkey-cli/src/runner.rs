use monkey_core::lexer::Tokenizer;
use monkey_core::parser::{ParseError, Parser};
use monkey_interpreter::environment::Environment;
use monkey_interpreter::evaluator;
use monkey_interpreter::object::{EvaluationError, Object};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn execute(source: &str) -> Result<(), ExecutionError> {
    let mut parser = Parser::new(Tokenizer::new(source));
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        return Err(ExecutionError::Parse(parser.errors));
    }

    let mut environment = Environment::new();
    let result = evaluator::eval_program(&program, &mut environment)?;
    if *result != Object::Null {
        println!("{result}");
    }
    Ok(())
}
