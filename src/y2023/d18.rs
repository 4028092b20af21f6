use {
    crate::*,
    glam::{I64Vec2, IVec2},
    nom::{
        branch::alt,
        bytes::complete::{tag, take_while_m_n},
        character::complete::line_ending,
        combinator::{map, map_res, opt},
        error::Error,
        multi::many1,
        sequence::{delimited, preceded, terminated, tuple},
        AsChar, Err, IResult,
    },
    strum::IntoEnumIterator,
};

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone, Copy)]
struct DigStep {
    dir: Direction,
    dist: i32,
    color: u32,
}

impl DigStep {
    fn parse_direction_branch<'i>(
        tag_str: &'static str,
        dir: Direction,
    ) -> impl FnMut(&'i str) -> IResult<&'i str, Direction> {
        map(tag(tag_str), move |_| dir)
    }

    fn parse_direction<'i>(input: &'i str) -> IResult<&'i str, Direction> {
        alt((
            Self::parse_direction_branch("U", Direction::North),
            Self::parse_direction_branch("R", Direction::East),
            Self::parse_direction_branch("D", Direction::South),
            Self::parse_direction_branch("L", Direction::West),
        ))(input)
    }

    fn parse_color(input: &str) -> IResult<&str, u32> {
        preceded(
            tag("#"),
            map_res(
                take_while_m_n(6_usize, 6_usize, char::is_hex_digit),
                |input| u32::from_str_radix(input, 16_u32),
            ),
        )(input)
    }

    /// The swapped reading: the first five hex digits are the distance, the last one the
    /// direction
    fn decode_color(self) -> (Direction, i32) {
        let dist: i32 = (self.color >> 4_u32) as i32;
        let dir: Direction = match self.color & 0x3_u32 {
            0_u32 => Direction::East,
            1_u32 => Direction::South,
            2_u32 => Direction::West,
            3_u32 => Direction::North,
            _ => unreachable!(),
        };

        (dir, dist)
    }
}

impl Parse for DigStep {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                Self::parse_direction,
                tag(" "),
                parse_integer::<i32>,
                delimited(tag(" ("), Self::parse_color, tag(")")),
            )),
            |(dir, _, dist, color)| Self { dir, dist, color },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<DigStep>);

impl Solution {
    fn iter_corners(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.0.iter().scan(IVec2::ZERO, |pos, step| {
            let corner: IVec2 = *pos;

            *pos += step.dist * step.dir.vec();

            Some(corner)
        })
    }

    /// Draws the dig plan's perimeter into a grid just large enough to hold it, returning the
    /// grid and the plan's starting corner in grid coordinates.
    fn trench_grid(&self) -> (Grid2D<Pixel>, IVec2) {
        let (min, max): (IVec2, IVec2) = self.iter_corners().fold(
            (IVec2::ZERO, IVec2::ZERO),
            |(min, max), corner| (min.min(corner), max.max(corner)),
        );
        let mut grid: Grid2D<Pixel> = Grid2D::default(max - min + IVec2::ONE);
        let mut pos: IVec2 = -min;

        for step in self.0.iter() {
            let next_pos: IVec2 = pos + step.dist * step.dir.vec();

            for trench_pos in CellIter2D::try_from(pos..=next_pos).unwrap() {
                *grid.get_mut(trench_pos).unwrap() = Pixel::Light;
            }

            pos = next_pos;
        }

        (grid, -min)
    }

    /// Even-odd ray parity: a cell is interior iff the trench-cell count is odd along all four
    /// axis rays out of it
    fn is_interior(grid: &Grid2D<Pixel>, pos: IVec2) -> bool {
        !grid.get(pos).unwrap().is_light()
            && Direction::iter().all(|dir| {
                CellIter2D::until_boundary(grid, pos, dir)
                    .filter(|ray_pos| grid.get(*ray_pos).unwrap().is_light())
                    .count()
                    % 2_usize
                    == 1_usize
            })
    }

    /// The plan's first corner is on the perimeter, so some 8-neighbor of it is strictly inside
    fn interior_seed(grid: &Grid2D<Pixel>, start: IVec2) -> Option<IVec2> {
        grid.neighbors8(start)
            .find(|pos| Self::is_interior(grid, *pos))
    }

    /// Perimeter plus flood-filled interior
    fn lagoon_volume(&self) -> usize {
        let (grid, start): (Grid2D<Pixel>, IVec2) = self.trench_grid();
        let seed: IVec2 = Self::interior_seed(&grid, start)
            .unwrap_or_else(|| panic!("no interior cell adjacent to {start}"));
        let interior: Grid2D<Pixel> = flood_fill(&grid, seed, |pixel| !pixel.is_light());

        grid.cells()
            .iter()
            .zip(interior.cells().iter())
            .filter(|(trench, interior)| trench.is_light() || interior.is_light())
            .count()
    }

    /// Shoelace area of the corner polygon, widened back out to whole cells with Pick's theorem
    fn lava_volume<I: Iterator<Item = (Direction, i32)>>(steps: I) -> i64 {
        let mut pos: I64Vec2 = I64Vec2::ZERO;
        let mut double_signed_area: i64 = 0_i64;
        let mut perimeter: i64 = 0_i64;

        for (dir, dist) in steps {
            let next_pos: I64Vec2 = pos + dist as i64 * dir.vec().as_i64vec2();

            double_signed_area += pos.x * next_pos.y - next_pos.x * pos.y;
            perimeter += dist as i64;
            pos = next_pos;
        }

        double_signed_area.abs() / 2_i64 + perimeter / 2_i64 + 1_i64
    }

    fn small_lagoon_lava_volume(&self) -> i64 {
        Self::lava_volume(self.0.iter().map(|step| (step.dir, step.dist)))
    }

    fn large_lagoon_lava_volume(&self) -> i64 {
        Self::lava_volume(self.0.iter().map(|step| step.decode_color()))
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many1(terminated(DigStep::parse, opt(line_ending))),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            let (grid, _): (Grid2D<Pixel>, IVec2) = self.trench_grid();

            println!("{}", String::from(grid));
        }

        dbg!(self.lagoon_volume());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.large_lagoon_lava_volume());
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
        R 6 (#70c710)\n\
        D 5 (#0dc571)\n\
        L 2 (#5713f0)\n\
        D 2 (#d2c081)\n\
        R 2 (#59c680)\n\
        D 2 (#411b91)\n\
        L 5 (#8ceee2)\n\
        U 2 (#caa173)\n\
        L 1 (#1b58a2)\n\
        U 2 (#caa171)\n\
        R 2 (#7807d2)\n\
        U 3 (#a77fa3)\n\
        L 2 (#015232)\n\
        U 2 (#7a21e3)\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 14_usize);
        assert_eq!(
            solution.0.first(),
            Some(&DigStep {
                dir: Direction::East,
                dist: 6_i32,
                color: 0x70c710_u32,
            })
        );
        assert_eq!(
            solution.0.first().unwrap().decode_color(),
            (Direction::East, 461937_i32)
        );
    }

    #[test]
    fn test_lagoon_volume() {
        assert_eq!(solution().lagoon_volume(), 62_usize);
    }

    #[test]
    fn test_flood_fill_agrees_with_shoelace() {
        assert_eq!(
            solution().lagoon_volume() as i64,
            solution().small_lagoon_lava_volume()
        );
    }

    #[test]
    fn test_large_lagoon_lava_volume() {
        assert_eq!(solution().large_lagoon_lava_volume(), 952408144115_i64);
    }
}
