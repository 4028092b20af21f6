use {
    crate::*,
    glam::IVec2,
    nom::{combinator::map, error::Error, Err, IResult},
    rayon::iter::{IntoParallelIterator, ParallelIterator},
    std::ops::Range,
};

define_cell! {
    #[repr(u8)]
    #[cfg_attr(test, derive(Debug))]
    #[derive(Clone, Copy, PartialEq)]
    enum Tile {
        EmptySpace = EMPTY_SPACE = b'.',
        UpMirror = UP_MIRROR = b'/',
        DownMirror = DOWN_MIRROR = b'\\',
        VerticalSplitter = VERTICAL_SPLITTER = b'|',
        HorizontalSplitter = HORIZONTAL_SPLITTER = b'-',
    }
}

impl Tile {
    fn route_beam(self, dir: Direction) -> (Direction, Option<Direction>) {
        match self {
            Tile::EmptySpace => (dir, None),
            Tile::UpMirror => {
                // Direction::North <=> Direction::East
                // Direction::South <=> Direction::West
                (Direction::from_u8(dir as u8 ^ 1_u8), None)
            }
            Tile::DownMirror => {
                // Direction::North <=> Direction::West
                // Direction::East <=> Direction::South
                (Direction::from_u8(!(dir as u8)), None)
            }
            Tile::VerticalSplitter => {
                if dir.is_north_or_south() {
                    (dir, None)
                } else {
                    (Direction::North, Some(Direction::South))
                }
            }
            Tile::HorizontalSplitter => {
                if dir.is_north_or_south() {
                    (Direction::East, Some(Direction::West))
                } else {
                    (dir, None)
                }
            }
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Grid2D<Tile>);

impl HeadingTraversal for Solution {
    fn route(&self, pos: IVec2, dir: Direction) -> (Direction, Option<Direction>) {
        self.0.get(pos).unwrap().route_beam(dir)
    }

    fn contains(&self, pos: IVec2) -> bool {
        self.0.contains(pos)
    }
}

impl Solution {
    const INITIAL_BEAM: PosDir = PosDir {
        pos: IVec2::ZERO,
        dir: Direction::East,
    };

    fn energized_grid(&self, initial_beam: PosDir) -> Grid2D<Pixel> {
        let record: TraversalRecord = self.traverse([initial_beam]);
        let mut energized_grid: Grid2D<Pixel> = Grid2D::default(self.0.dimensions());

        for pos in record.touched_cells() {
            *energized_grid.get_mut(pos).unwrap() = Pixel::Light;
        }

        energized_grid
    }

    fn energized_tile_count(&self) -> usize {
        self.traverse([Self::INITIAL_BEAM]).touched_cell_count()
    }

    fn corner(&self, index: usize) -> IVec2 {
        match index & 3_usize {
            0_usize => IVec2::new(self.0.max_dimensions().x, 0_i32),
            1_usize => IVec2::ZERO,
            2_usize => IVec2::new(0_i32, self.0.max_dimensions().y),
            3_usize => self.0.max_dimensions(),
            _ => unimplemented!(),
        }
    }

    /// All edge states facing inward, walking the border corner to corner
    fn iter_initial_beams(&self) -> impl Iterator<Item = PosDir> + '_ {
        (0_usize..4_usize).flat_map(|index| {
            let range: Range<IVec2> = self.corner(index)..self.corner(index + 1_usize);
            let dir: Direction = Direction::try_from(range.clone()).unwrap().prev();

            CellIter2D::try_from(range)
                .unwrap()
                .map(move |pos| PosDir { pos, dir })
        })
    }

    /// Each candidate run is a pure function of the immutable grid, so the sweep fans out across
    /// threads with no state shared between runs
    fn maximally_energized_tile_count(&self) -> usize {
        self.iter_initial_beams()
            .collect::<Vec<PosDir>>()
            .into_par_iter()
            .map(|initial_beam| self.traverse([initial_beam]).touched_cell_count())
            .max()
            .unwrap()
    }

    fn maximally_energized_grid(&self) -> Grid2D<Pixel> {
        self.iter_initial_beams()
            .max_by_key(|initial_beam| self.traverse([*initial_beam]).touched_cell_count())
            .map(|initial_beam| self.energized_grid(initial_beam))
            .unwrap()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Grid2D::<Tile>::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            let energized_grid: Grid2D<Pixel> = self.energized_grid(Self::INITIAL_BEAM);

            dbg!(self.energized_tile_count());

            println!("\n{}", String::from(energized_grid));
        } else {
            dbg!(self.energized_tile_count());
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            let energized_grid: Grid2D<Pixel> = self.maximally_energized_grid();

            dbg!(self.maximally_energized_tile_count());

            println!("\n{}", String::from(energized_grid));
        } else {
            dbg!(self.maximally_energized_tile_count());
        }
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
    use {
        super::*,
        std::{collections::HashSet, sync::OnceLock},
    };

    const SOLUTION_STR: &'static str = "\
        .|...\\....\n\
        |.-.\\.....\n\
        .....|-...\n\
        ........|.\n\
        ..........\n\
        .........\\\n\
        ..../.\\\\..\n\
        .-.-/..|..\n\
        .|....-|.\\\n\
        ..//.|....\n";
    const ENERGIZED_GRID_STR: &'static str = "\
        ######....\n\
        .#...#....\n\
        .#...#####\n\
        .#...##...\n\
        .#...##...\n\
        .#...##...\n\
        .#..####..\n\
        ########..\n\
        .#######..\n\
        .#...#.#..\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Solution::try_from(SOLUTION_STR).unwrap())
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.dimensions(), IVec2::new(10_i32, 10_i32));
        assert_eq!(
            solution.0.get(IVec2::new(1_i32, 0_i32)),
            Some(&Tile::VerticalSplitter)
        );
        assert_eq!(
            solution.0.get(IVec2::new(5_i32, 1_i32)),
            Some(&Tile::DownMirror)
        );
        assert_eq!(
            solution.0.get(IVec2::new(4_i32, 6_i32)),
            Some(&Tile::UpMirror)
        );
    }

    #[test]
    fn test_energized_grid() {
        assert_eq!(
            String::from(solution().energized_grid(Solution::INITIAL_BEAM)),
            ENERGIZED_GRID_STR
        );
    }

    #[test]
    fn test_energized_tile_count() {
        assert_eq!(solution().energized_tile_count(), 46_usize);
    }

    #[test]
    fn test_traversal_is_idempotent() {
        let solution: &Solution = solution();

        let touched_a: HashSet<IVec2> = solution
            .traverse([Solution::INITIAL_BEAM])
            .touched_cells()
            .collect();
        let touched_b: HashSet<IVec2> = solution
            .traverse([Solution::INITIAL_BEAM])
            .touched_cells()
            .collect();

        assert_eq!(touched_a, touched_b);
        assert_eq!(touched_a.len(), 46_usize);
    }

    #[test]
    fn test_maximally_energized_tile_count() {
        assert_eq!(solution().maximally_energized_tile_count(), 51_usize);
    }
}
