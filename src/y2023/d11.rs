use {
    crate::*,
    glam::{I64Vec2, IVec2},
    nom::{combinator::map, error::Error, Err, IResult},
};

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    galaxies: Vec<IVec2>,
    empty_xs: Vec<i32>,
    empty_ys: Vec<i32>,
}

impl Solution {
    const EXPANSION_FACTOR: i64 = 2_i64;
    const LARGE_EXPANSION_FACTOR: i64 = 1_000_000_i64;

    /// Displaces each galaxy once per empty row/column between it and the origin, by the
    /// expansion factor minus the one width the empty line already occupies. A single iterative
    /// pass over precomputed indices, no grid reallocation.
    fn expanded_galaxies(&self, expansion_factor: i64) -> Vec<I64Vec2> {
        let expansion: i64 = expansion_factor - 1_i64;

        self.galaxies
            .iter()
            .map(|galaxy| {
                let crossed_xs: i64 =
                    self.empty_xs.iter().filter(|x| **x < galaxy.x).count() as i64;
                let crossed_ys: i64 =
                    self.empty_ys.iter().filter(|y| **y < galaxy.y).count() as i64;

                I64Vec2::new(
                    galaxy.x as i64 + expansion * crossed_xs,
                    galaxy.y as i64 + expansion * crossed_ys,
                )
            })
            .collect()
    }

    fn pair_dist_sum(&self, expansion_factor: i64) -> i64 {
        let galaxies: Vec<I64Vec2> = self.expanded_galaxies(expansion_factor);

        galaxies
            .iter()
            .enumerate()
            .flat_map(|(index, a)| {
                galaxies[index + 1_usize..].iter().map(|b| {
                    let delta: I64Vec2 = (*a - *b).abs();

                    delta.x + delta.y
                })
            })
            .sum()
    }

    fn expanded_pair_dist_sum(&self) -> i64 {
        self.pair_dist_sum(Self::EXPANSION_FACTOR)
    }

    fn large_expanded_pair_dist_sum(&self) -> i64 {
        self.pair_dist_sum(Self::LARGE_EXPANSION_FACTOR)
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Grid2D::<Pixel>::parse, |grid| {
            let galaxies: Vec<IVec2> = grid.iter_positions_with_cell(&Pixel::Light).collect();
            let empty_xs: Vec<i32> = (0_i32..grid.dimensions().x)
                .filter(|x| galaxies.iter().all(|galaxy| galaxy.x != *x))
                .collect();
            let empty_ys: Vec<i32> = (0_i32..grid.dimensions().y)
                .filter(|y| galaxies.iter().all(|galaxy| galaxy.y != *y))
                .collect();

            Self {
                galaxies,
                empty_xs,
                empty_ys,
            }
        })(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.expanded_pair_dist_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.large_expanded_pair_dist_sum());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
