use std::io::{BufRead, Write};

/// The operator side of the booth: asks questions and shows messages.
pub trait Prompter {
    /// Shows the prompt and reads one line, without its line ending.
    /// None when the input is exhausted.
    fn ask(&mut self, prompt: &str) -> Option<String>;

    fn say(&mut self, message: &str);
}

/// A prompter over any line input and output, such as stdin and stdout.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Terminal<R, W> {
        Terminal { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for Terminal<R, W> {
    fn ask(&mut self, prompt: &str) -> Option<String> {
        // Console errors are not recoverable here: they end the input.
        write!(self.output, "{}", prompt).ok()?;
        self.output.flush().ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(e) => {
                log::warn!("ask: cannot read input: {}", e);
                None
            }
        }
    }

    fn say(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message) {
            log::warn!("say: cannot write output: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_until_eof() {
        let mut t = Terminal::new(Cursor::new("one\r\ntwo\n"), Vec::new());
        assert_eq!(t.ask("> ").as_deref(), Some("one"));
        t.say("hello");
        assert_eq!(t.ask("> ").as_deref(), Some("two"));
        assert_eq!(t.ask("> "), None);
        let out = String::from_utf8(t.into_output()).unwrap();
        assert_eq!(out, "> hello\n> > ");
    }
}
