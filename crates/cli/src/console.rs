//! Line-oriented console I/O

use anyhow::{anyhow, bail, Context, Result};
use minibank_core::parse_amount;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Prompts on `output`, reads answers from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// A possibly empty answer; end of input is an error.
    pub fn ask_optional(&mut self, prompt: &str) -> Result<String> {
        self.read_line(prompt)?
            .ok_or_else(|| anyhow!("input closed"))
    }

    /// A non-empty answer.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer = self.ask_optional(prompt)?;
        if answer.is_empty() {
            bail!("{} is required", prompt);
        }
        Ok(answer)
    }

    pub fn ask_number<T>(&mut self, prompt: &str) -> Result<T>
    where
        T: FromStr,
    {
        let answer = self.ask(prompt)?;
        answer
            .parse()
            .map_err(|_| anyhow!("{}: {:?} is not a valid number", prompt, answer))
    }

    pub fn ask_amount(&mut self, prompt: &str) -> Result<Decimal> {
        let answer = self.ask(prompt)?;
        Ok(parse_amount(&answer)?)
    }

    /// Amount that defaults to zero when left blank.
    pub fn ask_amount_or_zero(&mut self, prompt: &str) -> Result<Decimal> {
        let answer = self.ask_optional(prompt)?;
        if answer.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Ok(parse_amount(&answer)?)
    }

    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_read_line_trims_and_detects_eof() {
        let mut c = console("  hello  \n");
        assert_eq!(c.read_line("Name").unwrap(), Some("hello".to_string()));
        assert_eq!(c.read_line("Name").unwrap(), None);
        assert_eq!(String::from_utf8_lossy(c.output()), "Name: Name: ");
    }

    #[test]
    fn test_ask_rejects_blank() {
        let mut c = console("\n");
        let err = c.ask("Name").unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_ask_number_and_amounts() {
        let mut c = console("42\nabc\n10,50\n\n");
        assert_eq!(c.ask_number::<u32>("Branch").unwrap(), 42);
        assert!(c.ask_number::<u32>("Branch").is_err());
        assert_eq!(c.ask_amount("Amount").unwrap(), dec!(10.50));
        assert_eq!(c.ask_amount_or_zero("Initial").unwrap(), Decimal::ZERO);
        assert!(c.ask_optional("More").is_err());
    }
}
