use {
    crate::*,
    nom::{
        character::complete::{line_ending, not_line_ending},
        combinator::{map, opt, verify},
        error::Error,
        multi::many1,
        sequence::terminated,
        Err, IResult,
    },
};

const SPELLED_DIGITS: [&'static str; 9_usize] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<String>);

impl Solution {
    /// The digit starting at `line[index..]`, if any: either an ASCII digit or, when spelled
    /// digits are admitted, a digit name. Names may overlap ("eightwo"), which is why this scans
    /// per index instead of tokenizing.
    fn digit_at(line: &str, index: usize, with_spelled_digits: bool) -> Option<u32> {
        let suffix: &str = &line[index..];
        let first_char: char = suffix.chars().next()?;

        first_char.to_digit(10_u32).or_else(|| {
            with_spelled_digits
                .then(|| {
                    SPELLED_DIGITS
                        .iter()
                        .position(|spelled_digit| suffix.starts_with(spelled_digit))
                        .map(|position| position as u32 + 1_u32)
                })
                .flatten()
        })
    }

    fn calibration_value(line: &str, with_spelled_digits: bool) -> Option<u32> {
        let mut digits = (0_usize..line.len())
            .filter_map(|index| Self::digit_at(line, index, with_spelled_digits));

        let first: u32 = digits.next()?;
        let last: u32 = digits.last().unwrap_or(first);

        Some(10_u32 * first + last)
    }

    fn calibration_value_sum(&self, with_spelled_digits: bool) -> u32 {
        self.0
            .iter()
            .filter_map(|line| Self::calibration_value(line, with_spelled_digits))
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many1(terminated(
                map(
                    verify(not_line_ending, |line: &str| !line.is_empty()),
                    String::from,
                ),
                opt(line_ending),
            )),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.calibration_value_sum(false));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.calibration_value_sum(true));
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
