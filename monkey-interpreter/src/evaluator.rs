use std::collections::HashMap;
use std::rc::Rc;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{object_to_key, EvaluationError, Object, QuickReturn};
use monkey_core::ast;
use monkey_core::ast::Expression;

pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Rc<Object>, EvaluationError> {
    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Ok(object) => output = object,
            // A top-level `return` simply ends the program with its value.
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => return Err(error),
        };
    }
    Ok(output)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(statement.identifier.name.clone(), value);
    Ok(Object::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    Err(QuickReturn::Return(value))
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::ArrayLiteral(array) => Ok(Object::array(
            array
                .iter()
                .map(|expression| eval_expression(expression, environment))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Expression::HashLiteral(literal) => eval_hash_literal(literal, environment),
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .or_else(|| builtins::lookup(&identifier.name).map(Object::builtin_function))
            .ok_or_else(|| {
                QuickReturn::Error(EvaluationError::IdentifierNotFound(identifier.name.clone()))
            }),
        Expression::PrefixOperation(kind, expression) => {
            let right = eval_expression(expression, environment)?;
            eval_prefix_operation(kind, right)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            eval_infix_operation(kind, left, right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if is_truthy(&condition) {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            match function.as_ref() {
                Object::Function(function) => apply_function(function, arguments),
                Object::BuiltinFunction(builtin) => {
                    (builtin.func)(arguments).map_err(QuickReturn::Error)
                }
                other => Err(QuickReturn::Error(EvaluationError::NotAFunction(
                    other.type_name(),
                ))),
            }
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            eval_index_expression(left, index)
        }
        Expression::Invalid => Err(QuickReturn::Error(EvaluationError::MalformedExpression)),
    }
}

fn eval_expressions(
    arguments: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Rc<Object>>, QuickReturn> {
    let mut result = Vec::new();
    for argument in arguments {
        result.push(eval_expression(argument, environment)?);
    }
    Ok(result)
}

fn apply_function(
    function: &crate::object::Function,
    arguments: Vec<Rc<Object>>,
) -> Result<Rc<Object>, QuickReturn> {
    if function.parameters.len() != arguments.len() {
        return Err(QuickReturn::Error(
            EvaluationError::WrongNumberOfArguments {
                got: arguments.len(),
                want: function.parameters.len(),
            },
        ));
    }
    let mut call_env = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        call_env.set(parameter.name.clone(), argument);
    }
    match eval_block_statement(&function.body, &mut call_env) {
        // A `return` unwinds exactly to its call frame.
        Err(QuickReturn::Return(value)) => Ok(value),
        other => other,
    }
}

fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_hash_literal(
    literal: &[(Expression, Expression)],
    environment: &mut Environment,
) -> Result<Rc<Object>, QuickReturn> {
    let mut pairs = HashMap::new();
    for (key_expression, value_expression) in literal {
        let key = eval_expression(key_expression, environment)?;
        let value = eval_expression(value_expression, environment)?;
        let hashed_key = object_to_key(&key).map_err(QuickReturn::Error)?;
        // Textually identical keys collide here; the later pair wins.
        pairs.insert(hashed_key, (key, value));
    }
    Ok(Object::hash(pairs))
}

fn eval_index_expression(
    left: Rc<Object>,
    index: Rc<Object>,
) -> Result<Rc<Object>, QuickReturn> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(elements), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| elements.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(pairs), _) => {
            let key = object_to_key(&index).map_err(QuickReturn::Error)?;
            Ok(pairs
                .get(&key)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => Err(QuickReturn::Error(EvaluationError::IndexNotSupported(
            left.type_name(),
        ))),
    }
}

fn eval_prefix_operation(
    kind: &ast::PrefixOperationKind,
    right: Rc<Object>,
) -> Result<Rc<Object>, QuickReturn> {
    match (kind, right.as_ref()) {
        // `!` has its own table and deliberately does not go through
        // `is_truthy`: every non-boolean, non-null value negates to false.
        (ast::PrefixOperationKind::Bang, Object::Boolean(value)) => Ok(Object::boolean(!value)),
        (ast::PrefixOperationKind::Bang, Object::Null) => Ok(Object::boolean(true)),
        (ast::PrefixOperationKind::Bang, _) => Ok(Object::boolean(false)),
        (ast::PrefixOperationKind::Minus, Object::Integer(value)) => Ok(Object::integer(-value)),
        (ast::PrefixOperationKind::Minus, other) => {
            Err(QuickReturn::Error(EvaluationError::UnknownPrefixOperator {
                operator: kind.symbol(),
                right: other.type_name(),
            }))
        }
    }
}

fn eval_infix_operation(
    kind: &ast::InfixOperationKind,
    left: Rc<Object>,
    right: Rc<Object>,
) -> Result<Rc<Object>, QuickReturn> {
    use ast::InfixOperationKind;
    match (kind, left.as_ref(), right.as_ref()) {
        (InfixOperationKind::Plus, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::integer(left + right))
        }
        (InfixOperationKind::Minus, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::integer(left - right))
        }
        (InfixOperationKind::Multiply, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::integer(left * right))
        }
        (InfixOperationKind::Divide, Object::Integer(left), Object::Integer(right)) => {
            if *right == 0 {
                Err(QuickReturn::Error(EvaluationError::DivisionByZero))
            } else {
                Ok(Object::integer(left / right))
            }
        }
        (InfixOperationKind::LessThan, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left < right))
        }
        (InfixOperationKind::GreaterThan, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left > right))
        }
        (InfixOperationKind::Equal, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left == right))
        }
        (InfixOperationKind::NotEqual, Object::Integer(left), Object::Integer(right)) => {
            Ok(Object::boolean(left != right))
        }
        (InfixOperationKind::Plus, Object::String(left), Object::String(right)) => {
            Ok(Object::string(format!("{}{}", left, right)))
        }
        (InfixOperationKind::Equal, Object::Boolean(left), Object::Boolean(right)) => {
            Ok(Object::boolean(left == right))
        }
        (InfixOperationKind::NotEqual, Object::Boolean(left), Object::Boolean(right)) => {
            Ok(Object::boolean(left != right))
        }
        (kind, left, right) => {
            if left.type_name() != right.type_name() {
                Err(QuickReturn::Error(EvaluationError::TypeMismatch {
                    left: left.type_name(),
                    operator: kind.symbol(),
                    right: right.type_name(),
                }))
            } else {
                Err(QuickReturn::Error(EvaluationError::UnknownInfixOperator {
                    left: left.type_name(),
                    operator: kind.symbol(),
                    right: right.type_name(),
                }))
            }
        }
    }
}

// Conditions treat zero as falsy on top of the usual null/false rule.
fn is_truthy(object: &Object) -> bool {
    match object {
        Object::Null => false,
        Object::Boolean(value) => *value,
        Object::Integer(value) => *value != 0,
        _ => true,
    }
}
