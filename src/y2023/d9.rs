use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many1,
        sequence::terminated,
        Err, IResult,
    },
};

#[cfg_attr(test, derive(Debug, PartialEq))]
struct History(Vec<i32>);

impl History {
    /// Collapses the difference pyramid row by row, keeping only the ends each extrapolation
    /// needs: the next value is the sum of the last entries, the previous value the alternating
    /// fold of the first ones.
    fn extrapolations(&self) -> (i32, i32) {
        let mut firsts: Vec<i32> = Vec::new();
        let mut lasts: Vec<i32> = Vec::new();
        let mut row: Vec<i32> = self.0.clone();

        while row.iter().any(|value| *value != 0_i32) {
            firsts.push(*row.first().unwrap());
            lasts.push(*row.last().unwrap());
            row = row.windows(2_usize).map(|pair| pair[1] - pair[0]).collect();
        }

        (
            firsts
                .into_iter()
                .rev()
                .fold(0_i32, |extrapolation, first| first - extrapolation),
            lasts.into_iter().sum(),
        )
    }

    fn front_extrapolation(&self) -> i32 {
        self.extrapolations().0
    }

    fn back_extrapolation(&self) -> i32 {
        self.extrapolations().1
    }
}

impl Parse for History {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many1(terminated(parse_integer::<i32>, opt(tag(" ")))),
            Self,
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<History>);

impl Solution {
    fn back_extrapolation_sum(&self) -> i32 {
        self.0.iter().map(History::back_extrapolation).sum()
    }

    fn front_extrapolation_sum(&self) -> i32 {
        self.0.iter().map(History::front_extrapolation).sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many1(terminated(History::parse, opt(line_ending))), Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.back_extrapolation_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.front_extrapolation_sum());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
