use {
    crate::*,
    glam::IVec2,
    nom::{combinator::map_opt, error::Error, Err, IResult},
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        slice,
        str::from_utf8_unchecked,
    },
    strum::IntoEnumIterator,
};

define_cell! {
    #[repr(u8)]
    #[derive(Copy, Clone, PartialEq)]
    enum PipeCell {
        Vertical = VERTICAL = b'|',
        Horizontal = HORIZONTAL = b'-',
        NorthEast = NORTH_EAST = b'L',
        NorthWest = NORTH_WEST = b'J',
        SouthWest = SOUTH_WEST = b'7',
        SouthEast = SOUTH_EAST = b'F',
        Ground = GROUND = b'.',
        StartingPosition = STARTING_POS = b'S',
    }
}

impl PipeCell {
    fn connection_dirs(self) -> &'static [Direction] {
        match self {
            Self::Vertical => &[Direction::North, Direction::South],
            Self::Horizontal => &[Direction::East, Direction::West],
            Self::NorthEast => &[Direction::North, Direction::East],
            Self::NorthWest => &[Direction::North, Direction::West],
            Self::SouthWest => &[Direction::South, Direction::West],
            Self::SouthEast => &[Direction::South, Direction::East],
            _ => &[],
        }
    }

    fn from_connections(is_dir_connected: [bool; 4_usize]) -> Option<Self> {
        match is_dir_connected {
            // North, East, South, West
            [true, false, true, false] => Some(Self::Vertical),
            [false, true, false, true] => Some(Self::Horizontal),
            [true, true, false, false] => Some(Self::NorthEast),
            [true, false, false, true] => Some(Self::NorthWest),
            [false, false, true, true] => Some(Self::SouthWest),
            [false, true, true, false] => Some(Self::SouthEast),
            _ => None,
        }
    }

    /// The heading a flow entering under `dir` leaves with. Only valid for a pipe that actually
    /// admits that entry, which holds for every state the loop traversal can reach.
    fn route_flow(self, dir: Direction) -> Direction {
        let [a, b]: [Direction; 2_usize] = match self.connection_dirs() {
            &[a, b] => [a, b],
            _ => panic!("flow routed through {self:?} at heading {dir:?}"),
        };

        if a == dir.rev() {
            b
        } else if b == dir.rev() {
            a
        } else {
            panic!("flow entered {self:?} at heading {dir:?}");
        }
    }
}

impl Debug for PipeCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // SAFETY: Guaranteed by `IsValidAscii`
        f.write_str(unsafe { from_utf8_unchecked(slice::from_ref(&(*self as u8))) })
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
pub struct Solution {
    grid: Grid2D<PipeCell>,
    starting_pos: IVec2,
}

impl HeadingTraversal for Solution {
    fn route(&self, pos: IVec2, dir: Direction) -> (Direction, Option<Direction>) {
        (self.grid.get(pos).unwrap().route_flow(dir), None)
    }

    fn contains(&self, pos: IVec2) -> bool {
        self.grid.contains(pos)
    }
}

impl Solution {
    /// Replaces the starting cell with the pipe its connected neighbors imply. Fails if the
    /// neighbors don't pin down exactly one shape.
    fn try_correct_starting_pos(&mut self) -> Option<()> {
        let mut is_dir_connected: [bool; 4_usize] = Default::default();

        for dir in Direction::iter() {
            is_dir_connected[dir as usize] = self
                .grid
                .get(self.starting_pos + dir.vec())
                .map_or(false, |neighbor| {
                    neighbor.connection_dirs().contains(&dir.rev())
                });
        }

        let starting_pos_cell: PipeCell = PipeCell::from_connections(is_dir_connected)?;

        *self.grid.get_mut(self.starting_pos).unwrap() = starting_pos_cell;

        Some(())
    }

    /// Walks the loop both ways at once. Cell depth is the step count of the shorter way around.
    fn loop_record(&self) -> TraversalRecord {
        let starting_pos: IVec2 = self.starting_pos;

        self.traverse(
            self.grid
                .get(starting_pos)
                .unwrap()
                .connection_dirs()
                .iter()
                .map(|connection_dir| PosDir {
                    pos: starting_pos,
                    dir: connection_dir.rev(),
                }),
        )
    }

    fn max_loop_dist(&self) -> u32 {
        self.loop_record().max_depth()
    }

    /// Doubled-resolution overlay of the loop: walls on every loop cell at `2 * pos` and on the
    /// lattice points between connected loop cells, leaving squeeze-through gaps between parallel
    /// pipes open.
    fn wall_grid(&self, loop_record: &TraversalRecord) -> Grid2D<Pixel> {
        let mut wall_grid: Grid2D<Pixel> =
            Grid2D::default(2_i32 * self.grid.dimensions() - IVec2::ONE);

        for pos in loop_record.touched_cells() {
            let wall_pos: IVec2 = 2_i32 * pos;

            *wall_grid.get_mut(wall_pos).unwrap() = Pixel::Light;

            for dir in self.grid.get(pos).unwrap().connection_dirs().iter().copied() {
                *wall_grid.get_mut(wall_pos + dir.vec()).unwrap() = Pixel::Light;
            }
        }

        wall_grid
    }

    fn inside_pos_count(&self) -> usize {
        let loop_record: TraversalRecord = self.loop_record();
        let wall_grid: Grid2D<Pixel> = self.wall_grid(&loop_record);
        let outside: Grid2D<Pixel> = flood_fill_from(
            &wall_grid,
            wall_grid.iter_positions().filter(|pos| {
                wall_grid.is_border(*pos) && !wall_grid.get(*pos).unwrap().is_light()
            }),
            |pixel| !pixel.is_light(),
        );

        self.grid
            .iter_positions()
            .filter(|pos| {
                !loop_record.was_touched(*pos)
                    && !outside.get(2_i32 * *pos).unwrap().is_light()
            })
            .count()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_opt(Grid2D::<PipeCell>::parse, |grid| {
            let starting_pos: IVec2 =
                grid.try_find_single_position_with_cell(&PipeCell::StartingPosition)?;
            let mut solution: Self = Self { grid, starting_pos };

            solution.try_correct_starting_pos()?;

            Some(solution)
        })(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_loop_dist());
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            let loop_record: TraversalRecord = self.loop_record();

            dbg!(loop_record.touched_cell_count());
        }

        dbg!(self.inside_pos_count());
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
    use super::*;

    const SIMPLE_LOOP_STR: &'static str = "\
        .....\n\
        .S-7.\n\
        .|.|.\n\
        .L-J.\n\
        .....\n";
    const COMPLEX_LOOP_STR: &'static str = "\
        ..F7.\n\
        .FJ|.\n\
        SJ.L7\n\
        |F--J\n\
        LJ...\n";
    const ENCLOSED_STR: &'static str = "\
        ...........\n\
        .S-------7.\n\
        .|F-----7|.\n\
        .||.....||.\n\
        .||.....||.\n\
        .|L-7.F-J|.\n\
        .|..|.|..|.\n\
        .L--J.L--J.\n\
        ...........\n";
    const SQUEEZED_STR: &'static str = "\
        ..........\n\
        .S------7.\n\
        .|F----7|.\n\
        .||....||.\n\
        .||....||.\n\
        .|L-7F-J|.\n\
        .|..||..|.\n\
        .L--JL--J.\n\
        ..........\n";
    const JUNK_STR: &'static str = "\
        FF7FSF7F7F7F7F7F---7\n\
        L|LJ||||||||||||F--J\n\
        FL-7LJLJ||||||LJL-77\n\
        F--JF--7||LJLJ7F7FJ-\n\
        L---JF-JLJ.||-FJLJJ7\n\
        |F|F-JF---7F7-L7L|7|\n\
        |FFJF7L7F-JF7|JL---7\n\
        7-L-JL7||F7|L7F-7F7|\n\
        L.L7LFJ|||||FJL7||LJ\n\
        L7JLJL-JLJLJL--JLJ.L\n";

    #[test]
    fn test_try_from_str() {
        let solution: Solution = Solution::try_from(SIMPLE_LOOP_STR).unwrap();

        assert_eq!(solution.starting_pos, IVec2::new(1_i32, 1_i32));
        assert_eq!(
            solution.grid.get(solution.starting_pos),
            Some(&PipeCell::SouthEast)
        );
    }

    #[test]
    fn test_max_loop_dist() {
        assert_eq!(
            Solution::try_from(SIMPLE_LOOP_STR).unwrap().max_loop_dist(),
            4_u32
        );
        assert_eq!(
            Solution::try_from(COMPLEX_LOOP_STR)
                .unwrap()
                .max_loop_dist(),
            8_u32
        );
    }

    #[test]
    fn test_inside_pos_count() {
        assert_eq!(
            Solution::try_from(ENCLOSED_STR).unwrap().inside_pos_count(),
            4_usize
        );
        assert_eq!(
            Solution::try_from(SQUEEZED_STR).unwrap().inside_pos_count(),
            4_usize
        );
        assert_eq!(
            Solution::try_from(JUNK_STR).unwrap().inside_pos_count(),
            10_usize
        );
    }
}
