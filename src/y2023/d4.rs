use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::{line_ending, space1},
        combinator::{map, opt},
        error::Error,
        multi::many1,
        sequence::{delimited, preceded, terminated, tuple},
        Err, IResult,
    },
};

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Card {
    winning_numbers: Vec<u8>,
    own_numbers: Vec<u8>,
}

impl Card {
    fn match_count(&self) -> usize {
        self.own_numbers
            .iter()
            .filter(|own_number| self.winning_numbers.contains(own_number))
            .count()
    }

    fn points(&self) -> u32 {
        match self.match_count() {
            0_usize => 0_u32,
            match_count => 1_u32 << (match_count - 1_usize),
        }
    }
}

impl Parse for Card {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                delimited(
                    tuple((tag("Card"), space1)),
                    parse_integer::<u32>,
                    tag(":"),
                ),
                many1(preceded(space1, parse_integer::<u8>)),
                preceded(space1, tag("|")),
                many1(preceded(space1, parse_integer::<u8>)),
            )),
            |(_, winning_numbers, _, own_numbers)| Self {
                winning_numbers,
                own_numbers,
            },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Card>);

impl Solution {
    fn points_sum(&self) -> u32 {
        self.0.iter().map(Card::points).sum()
    }

    /// Each card's matches award copies of the following cards; copies compound. The cascade only
    /// ever reaches forward, so one pass suffices.
    fn total_card_count(&self) -> usize {
        let mut counts: Vec<usize> = vec![1_usize; self.0.len()];

        for (index, card) in self.0.iter().enumerate() {
            let count: usize = counts[index];
            let copies_end: usize = (index + 1_usize + card.match_count()).min(counts.len());

            for copy_count in counts[index + 1_usize..copies_end].iter_mut() {
                *copy_count += count;
            }
        }

        counts.into_iter().sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many1(terminated(Card::parse, opt(line_ending))), Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.points_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.total_card_count());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = "\
        Card 1: 41 48 83 86 17 | 83 86  6 31 17  9 48 53\n\
        Card 2: 13 32 20 16 61 | 61 30 68 82 17 32 24 19\n\
        Card 3:  1 21 53 59 44 | 69 82 63 72 16 21 14  1\n\
        Card 4: 41 92 73 84 69 | 59 84 76 51 58  5 54 83\n\
        Card 5: 87 83 26 28 32 | 88 30 70 12 93 22 82 36\n\
        Card 6: 31 18 13 56 72 | 74 77 10 23 35 67 36 11\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(solution().0.len(), 6_usize);
        assert_eq!(
            solution().0.first(),
            Some(&Card {
                winning_numbers: vec![41_u8, 48_u8, 83_u8, 86_u8, 17_u8],
                own_numbers: vec![83_u8, 86_u8, 6_u8, 31_u8, 17_u8, 9_u8, 48_u8, 53_u8],
            })
        );
    }

    #[test]
    fn test_points_sum() {
        assert_eq!(solution().points_sum(), 13_u32);
    }

    #[test]
    fn test_total_card_count() {
        assert_eq!(solution().total_card_count(), 30_usize);
    }
}
