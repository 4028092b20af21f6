use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::{line_ending, space1},
        combinator::{map_opt, opt},
        error::Error,
        multi::many1,
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
};

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone, Copy)]
struct Race {
    time: u64,
    record_dist: u64,
}

impl Race {
    /// Holding the button for `hold` of `time` milliseconds travels `hold * (time - hold)`.
    /// The winning holds form one contiguous run around `time / 2`, bounded by the roots of
    /// `hold^2 - time * hold + record_dist`; the float estimate is nudged to cover rounding.
    fn winning_hold_count(self) -> u64 {
        let time: f64 = self.time as f64;
        let discriminant: f64 = time * time - 4.0_f64 * self.record_dist as f64;

        if discriminant <= 0.0_f64 {
            return 0_u64;
        }

        let mut min_hold: u64 = (((time - discriminant.sqrt()) / 2.0_f64).floor().max(0.0_f64)
            as u64)
            .saturating_sub(1_u64)
            .max(1_u64);

        while min_hold < self.time && min_hold * (self.time - min_hold) <= self.record_dist {
            min_hold += 1_u64;
        }

        if min_hold >= self.time {
            0_u64
        } else {
            // Wins are symmetric in `hold` and `time - hold`
            self.time + 1_u64 - 2_u64 * min_hold
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Race>);

impl Solution {
    fn winning_hold_count_product(&self) -> u64 {
        self.0.iter().map(|race| race.winning_hold_count()).product()
    }

    /// All columns read as one race, as if the whitespace were kerning
    fn kerned_race(&self) -> Race {
        fn concatenate_digits<I: Iterator<Item = u64>>(values: I) -> u64 {
            values.fold(0_u64, |concatenated, value| {
                concatenated * 10_u64.pow(value.ilog10() + 1_u32) + value
            })
        }

        Race {
            time: concatenate_digits(self.0.iter().map(|race| race.time)),
            record_dist: concatenate_digits(self.0.iter().map(|race| race.record_dist)),
        }
    }

    fn kerned_winning_hold_count(&self) -> u64 {
        self.kerned_race().winning_hold_count()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_opt(
            tuple((
                preceded(
                    tag("Time:"),
                    many1(preceded(space1, parse_integer::<u64>)),
                ),
                opt(line_ending),
                preceded(
                    tag("Distance:"),
                    many1(preceded(space1, parse_integer::<u64>)),
                ),
                opt(line_ending),
            )),
            |(times, _, record_dists, _)| {
                (times.len() == record_dists.len()).then(|| {
                    Self(
                        times
                            .into_iter()
                            .zip(record_dists)
                            .map(|(time, record_dist)| Race { time, record_dist })
                            .collect(),
                    )
                })
            },
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.winning_hold_count_product());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.kerned_winning_hold_count());
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
        Time:      7  15   30\n\
        Distance:  9  40  200\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(
            solution().0,
            vec![
                Race {
                    time: 7_u64,
                    record_dist: 9_u64,
                },
                Race {
                    time: 15_u64,
                    record_dist: 40_u64,
                },
                Race {
                    time: 30_u64,
                    record_dist: 200_u64,
                },
            ]
        );
    }

    #[test]
    fn test_winning_hold_count() {
        assert_eq!(
            solution()
                .0
                .iter()
                .map(|race| race.winning_hold_count())
                .collect::<Vec<u64>>(),
            vec![4_u64, 8_u64, 9_u64]
        );
        assert_eq!(solution().winning_hold_count_product(), 288_u64);
    }

    #[test]
    fn test_kerned_race() {
        assert_eq!(
            solution().kerned_race(),
            Race {
                time: 71530_u64,
                record_dist: 940200_u64,
            }
        );
        assert_eq!(solution().kerned_winning_hold_count(), 71503_u64);
    }
}
