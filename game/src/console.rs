use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-based terminal I/O. Generic over the streams so menus can be driven
/// from in-memory buffers.
pub struct Console<R, W> {
    input: R,
    output: W,
    closed: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            closed: false,
        }
    }

    /// True once the input stream has run dry
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Print a prompt and read one trimmed line. None at end of input.
    pub fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.closed = true;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Numbered menu. Returns the zero-based index of the pick, or None when
    /// the player backs out with 0 / an empty line or the input ends.
    /// Anything else unrecognised is reported and asked again.
    pub fn choose<S: AsRef<str>>(&mut self, title: &str, options: &[S]) -> io::Result<Option<usize>> {
        self.blank()?;
        self.say(format!("=== {} ===", title))?;
        for (i, option) in options.iter().enumerate() {
            self.say(format!("{}. {}", i + 1, option.as_ref()))?;
        }

        loop {
            let Some(answer) = self.prompt("\nWhat would you like to do? (0 to go back) ")? else {
                return Ok(None);
            };
            if answer.is_empty() || answer == "0" || answer.eq_ignore_ascii_case("back") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => self.say(format!("Please enter a number between 1 and {}", options.len()))?,
            }
        }
    }

    /// Ask for a positive whole number. None on an empty answer, 0, or end of input.
    pub fn ask_number(&mut self, question: &str) -> io::Result<Option<u32>> {
        loop {
            let Some(answer) = self.prompt(question)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<u32>() {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("Please enter a valid number")?,
            }
        }
    }

    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{} (y/n) ", question))?;
        Ok(answer.map_or(false, |a| {
            a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
        }))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
