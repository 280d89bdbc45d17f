use monkey_core::lexer::Tokenizer;
use monkey_core::parser::Parser;
use monkey_interpreter::environment::Environment;
use monkey_interpreter::evaluator;
use monkey_interpreter::object::Object;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

pub fn start() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    // One environment for the whole session, so bindings survive across
    // input lines.
    let mut environment = Environment::new();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                run_line(&line, &mut environment);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(error) => return Err(error),
        }
    }
}

fn run_line(line: &str, environment: &mut Environment) {
    let mut parser = Parser::new(Tokenizer::new(line));
    let program = parser.parse_program();

    if !parser.errors.is_empty() {
        for error in &parser.errors {
            println!("\t{error}");
        }
        return;
    }

    match evaluator::eval_program(&program, environment) {
        Ok(result) => {
            // Null results stay quiet; `let` lines and bare `puts` calls
            // would otherwise echo "null" after every input.
            if *result != Object::Null {
                println!("{result}");
            }
        }
        Err(error) => println!("{error}"),
    }
}
