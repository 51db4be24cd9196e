//! Line-oriented terminal input/output

use std::io;
use std::io::BufRead;
use std::io::Write;

/// Prompts on `output` and reads answers from `input`.
///
/// Generic over the streams so pages can be driven by scripted input.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Asks for a value. Returns `None` at end of input.
    ///
    /// When `current` is given it is shown in brackets and an empty answer
    /// keeps it.
    pub fn prompt(&mut self, label: &str, current: Option<&str>) -> io::Result<Option<String>> {
        match current.filter(|c| !c.is_empty()) {
            Some(current) => write!(self.output, "{label} [{current}]: ")?,
            None => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        let answer = answer.trim_end_matches(['\r', '\n']).to_string();

        match current {
            Some(current) if answer.is_empty() => Ok(Some(current.to_string())),
            _ => Ok(Some(answer)),
        }
    }

    /// Yes/no question; anything starting with `s` or `y` is yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{question} (s/n)"), None)?;
        Ok(answer.is_some_and(|a| {
            matches!(a.trim().chars().next(), Some('s' | 'S' | 'y' | 'Y'))
        }))
    }

    /// Numbered menu. Returns the chosen index, or `None` at end of input.
    pub fn choose(&mut self, title: &str, options: &[&str]) -> io::Result<Option<usize>> {
        self.line("")?;
        self.line(title)?;
        for (index, option) in options.iter().enumerate() {
            self.line(format!("  {}) {}", index + 1, option))?;
        }
        loop {
            let Some(answer) = self.prompt("Opção", None)? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => self.line(format!("Escolha um número entre 1 e {}", options.len()))?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
