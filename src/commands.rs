// Command lines are whitespace separated: the first token is the verb and the
// rest are positional operands. There is no quoting and no flag parsing.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls(Option<String>),
    Cd(Option<String>),
    Exit,
    Uname,
    Chmod { mode: String, path: String },
    Du(Option<String>),
    /// A recognized verb with the wrong operands, carrying its diagnostic.
    Usage(String),
    Unknown(String),
}

impl Command {
    /// Parse one command line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?;
        let operands = tokens.map(str::to_string).collect::<Vec<String>>();
        let first = operands.first().cloned();
        let cmd = match verb {
            "ls" => Command::Ls(first),
            "cd" => Command::Cd(first),
            "exit" => Command::Exit,
            "uname" => Command::Uname,
            "chmod" => {
                if operands.len() != 2 {
                    return Some(Command::Usage("chmod: missing operand".to_string()));
                }
                Command::Chmod {
                    mode: operands[0].clone(),
                    path: operands[1].clone(),
                }
            }
            "du" => Command::Du(first),
            _ => Command::Unknown(verb.to_string()),
        };
        Some(cmd)
    }

    pub fn verb(&self) -> &str {
        match self {
            Command::Ls(_) => "ls",
            Command::Cd(_) => "cd",
            Command::Exit => "exit",
            Command::Uname => "uname",
            Command::Chmod { .. } | Command::Usage(_) => "chmod",
            Command::Du(_) => "du",
            Command::Unknown(verb) => verb.as_str(),
        }
    }
}
