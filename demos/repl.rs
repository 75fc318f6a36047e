use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sexpread::reader::{Host, Session, SessionConfig};
use std::io::Write;

/// Rustyline-backed host: the editor renders the prompt and keeps history.
struct ReadlineHost {
    editor: DefaultEditor,
}

impl Host for ReadlineHost {
    fn read_line(&mut self) -> Option<String> {
        match self.editor.readline("λ> ") {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Some(line)
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
            Err(err) => {
                eprintln!("Input error: {err:?}");
                None
            }
        }
    }

    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

fn main() {
    println!("sexpread - S-expression reader/printer");
    println!("Expressions are read and re-printed, never evaluated.");
    println!("Enter forms like: (define (square x) (* x x))");
    println!("An open list continues onto the next line. Ctrl+D to exit.");
    println!();

    let editor = DefaultEditor::new().expect("Could not initialize line editor");
    let mut host = ReadlineHost { editor };
    let mut session = Session::new(SessionConfig::default());

    match session.run(&mut host) {
        Ok(()) => println!("Goodbye!"),
        Err(err) => println!("Error: {err}"),
    }
}
