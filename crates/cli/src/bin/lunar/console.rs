use std::io::{self, BufRead, Write};

use lunar_lander::descent::{FuelRateError, Telemetry, ThrustController};
use thiserror::Error;

/// Number of dots printed after a refused fuel rate.
const REJECTION_DOTS: usize = 51;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("end of input")]
    EndOfInput,
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented pilot console: prompts on `out`, reads answers from `input`.
pub struct Console<R, W> {
    input: R,
    out: W,
    echo: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W, echo: bool) -> Self {
        Self { input, out, echo }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Read one line without its trailing newline, echoing it when requested.
    pub fn read_line(&mut self) -> Result<String, ConsoleError> {
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::EndOfInput);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        if self.echo {
            writeln!(self.out, "{line}")?;
        }
        Ok(line)
    }

    /// Anything starting with `y` or `Y` means yes; everything else is no.
    pub fn request_play_again(&mut self) -> Result<bool, ConsoleError> {
        writeln!(self.out, "\n\n\nTRY AGAIN?")?;
        write!(self.out, "(ANS. YES OR NO):")?;
        let line = self.read_line()?;
        Ok(matches!(line.trim().chars().next(), Some('y' | 'Y')))
    }

    fn print_rejection(&mut self) -> io::Result<()> {
        write!(self.out, "NOT POSSIBLE{}", ".".repeat(REJECTION_DOTS))
    }
}

impl<R: BufRead, W: Write> ThrustController for Console<R, W> {
    type Error = ConsoleError;

    fn request_fuel_rate(&mut self, _telemetry: &Telemetry) -> Result<f64, Self::Error> {
        loop {
            write!(self.out, "K=:")?;
            let line = self.read_line()?;
            match line.trim().parse::<f64>() {
                Ok(rate) => return Ok(rate),
                Err(_) => self.print_rejection()?,
            }
        }
    }

    fn rejected(&mut self, rate: f64, reason: &FuelRateError) {
        tracing::debug!(rate, %reason, "pilot input refused");
        if let Err(err) = self.print_rejection() {
            tracing::warn!(%err, "failed to print rejection");
        }
    }
}
