use crate::core::scan_bound::ScanBound;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDateTime;
use std::io::{BufRead, Write};

pub const SCAN_DATE_QUESTION: &str =
    "Enter initial WOs scraping date in format 'YYYY-MM-DD' or leave blank to scrape the default lookback: ";

/// Asks for the scan date on an interactive terminal, re-asking until the
/// answer is blank or a valid ISO date.
pub struct ScanDatePrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
    default_lookback: usize,
}

impl<R: BufRead, W: Write> ScanDatePrompt<R, W> {
    pub fn new(input: R, output: W, default_lookback: usize) -> Self {
        Self {
            input,
            output,
            default_lookback,
        }
    }

    pub fn ask(&mut self, now: NaiveDateTime) -> Result<ScanBound> {
        loop {
            write!(self.output, "{}", SCAN_DATE_QUESTION)?;
            self.output.flush()?;

            let mut answer = String::new();
            // End of input counts as a blank answer.
            if self.input.read_line(&mut answer)? == 0 {
                tracing::debug!("No answer on stdin, using default lookback");
            }

            let answer = answer
                .strip_suffix('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .unwrap_or(&answer);

            match ScanBound::from_answer(answer, now, self.default_lookback) {
                Ok(bound) => {
                    writeln!(self.output, "Scan days: {}", bound)?;
                    return Ok(bound);
                }
                Err(EtlError::InvalidScanDate { input }) => {
                    tracing::debug!("Rejected scan date answer '{}'", input);
                    writeln!(self.output, "Incorrect input!\n")?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn ask(answers: &str) -> (ScanBound, String) {
        let mut output = Vec::new();
        let bound = ScanDatePrompt::new(Cursor::new(answers.as_bytes()), &mut output, 2)
            .ask(now())
            .unwrap();
        (bound, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_blank_line_selects_default() {
        let (bound, output) = ask("\n");
        assert_eq!(bound.rows(), 2);
        assert!(output.ends_with("Scan days: 2\n"));
    }

    #[test]
    fn test_end_of_input_selects_default() {
        let (bound, _) = ask("");
        assert_eq!(bound.rows(), 2);
    }

    #[test]
    fn test_crlf_answers_are_accepted() {
        let (bound, output) = ask("2021-03-05\r\n");
        assert_eq!(bound.rows(), 5);
        assert!(!output.contains("Incorrect input!"));
    }

    #[test]
    fn test_whitespace_only_answer_is_asked_again() {
        let (bound, output) = ask("   \n2021-03-05\n");
        assert_eq!(bound.rows(), 5);
        assert_eq!(output.matches("Incorrect input!").count(), 1);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let (bound, output) = ask("last week\n2021/03/01\n2021-03-05\n");
        assert_eq!(bound.rows(), 5);
        assert_eq!(output.matches("Incorrect input!").count(), 2);
        assert_eq!(output.matches(SCAN_DATE_QUESTION).count(), 3);
    }
}
