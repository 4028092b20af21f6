use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many1,
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

#[derive(Clone, Copy, EnumCount, EnumIter)]
#[repr(usize)]
enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    const fn tag_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl Parse for Color {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        alt((
            map(tag(Self::Red.tag_str()), |_| Self::Red),
            map(tag(Self::Green.tag_str()), |_| Self::Green),
            map(tag(Self::Blue.tag_str()), |_| Self::Blue),
        ))(input)
    }
}

/// A game reduced to the largest count seen per color across all of its revealed sets, which is
/// all both questions ask about.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct Game {
    id: u32,
    maxima: [u32; Color::COUNT],
}

impl Game {
    const BAG_CONTENTS: [u32; Color::COUNT] = [12_u32, 13_u32, 14_u32];

    fn is_possible(&self) -> bool {
        Color::iter().all(|color| self.maxima[color as usize] <= Self::BAG_CONTENTS[color as usize])
    }

    fn power(&self) -> u32 {
        self.maxima.iter().product()
    }
}

impl Parse for Game {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        let (mut input, id): (&str, u32) =
            terminated(preceded(tag("Game "), parse_integer::<u32>), tag(":"))(input)?;
        let mut maxima: [u32; Color::COUNT] = Default::default();

        loop {
            let (next_input, (count, color)): (&str, (u32, Color)) = tuple((
                preceded(tag(" "), parse_integer::<u32>),
                preceded(tag(" "), Color::parse),
            ))(input)?;
            let maximum: &mut u32 = &mut maxima[color as usize];

            *maximum = (*maximum).max(count);
            input = next_input;

            match opt(alt((tag(","), tag(";"))))(input)? {
                (next_input, Some(_)) => input = next_input,
                _ => break,
            }
        }

        Ok((input, Self { id, maxima }))
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Game>);

impl Solution {
    fn possible_game_id_sum(&self) -> u32 {
        self.0
            .iter()
            .filter_map(|game| game.is_possible().then_some(game.id))
            .sum()
    }

    fn power_sum(&self) -> u32 {
        self.0.iter().map(Game::power).sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many1(terminated(Game::parse, opt(line_ending))), Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.possible_game_id_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.power_sum());
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
        Game 1: 3 blue, 4 red; 1 red, 2 green, 6 blue; 2 green\n\
        Game 2: 1 blue, 2 green; 3 green, 4 blue, 1 red; 1 green, 1 blue\n\
        Game 3: 8 green, 6 blue, 20 red; 5 blue, 4 red, 13 green; 5 green, 1 red\n\
        Game 4: 1 green, 3 red, 6 blue; 3 green, 6 red; 3 green, 15 blue, 14 red\n\
        Game 5: 6 red, 1 blue, 3 green; 2 blue, 1 red, 2 green\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(
            solution().0.first(),
            Some(&Game {
                id: 1_u32,
                maxima: [4_u32, 2_u32, 6_u32],
            })
        );
        assert_eq!(solution().0.len(), 5_usize);
    }

    #[test]
    fn test_possible_game_id_sum() {
        assert_eq!(solution().possible_game_id_sum(), 8_u32);
    }

    #[test]
    fn test_power_sum() {
        assert_eq!(solution().power_sum(), 2286_u32);
    }
}
