use {
    crate::*,
    glam::IVec2,
    nom::{character::complete::satisfy, combinator::map, error::Error, AsChar, Err, IResult},
    std::{
        collections::{HashMap, VecDeque},
        ops::Range,
    },
    strum::IntoEnumIterator,
};

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone, Copy)]
struct HeatLoss(u8);

impl Parse for HeatLoss {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(satisfy(char::is_dec_digit), |c| Self(c as u8 - b'0'))(input)
    }
}

/// A traversal state, not just a cell: the movement rules depend on the heading the crucible
/// arrived under and on how long it has held it.
#[derive(Clone, Eq, Hash, PartialEq)]
struct Vertex {
    pos: IVec2,

    /// `None` only for the start, which has no preceding direction
    dir: Option<Direction>,

    /// Consecutive steps taken in `dir`, counting the one that entered `pos`
    run_len: u8,
}

struct VertexData {
    parent: Vertex,
    cost: u32,
}

struct CruciblePathFinder<'s> {
    solution: &'s Solution,
    vertex_to_vertex_data: HashMap<Vertex, VertexData>,
    start: Vertex,
    end_pos: IVec2,

    /// `start` is the run length needed before turning or stopping, `end` the longest legal run
    run_len_range: Range<u8>,
}

impl<'s> WeightedSearch for CruciblePathFinder<'s> {
    type Vertex = Vertex;
    type Cost = u32;

    fn start(&self) -> &Self::Vertex {
        &self.start
    }

    fn is_end(&self, vertex: &Self::Vertex) -> bool {
        vertex.pos == self.end_pos && vertex.run_len >= self.run_len_range.start
    }

    fn path_to(&self, vertex: &Self::Vertex) -> Vec<Self::Vertex> {
        let mut path: VecDeque<Vertex> = VecDeque::new();
        let mut vertex: Vertex = vertex.clone();

        while vertex != self.start {
            path.push_front(vertex.clone());
            vertex = self
                .vertex_to_vertex_data
                .get(&vertex)
                .unwrap()
                .parent
                .clone();
        }

        path.push_front(vertex);

        path.into()
    }

    fn cost_from_start(&self, vertex: &Self::Vertex) -> Self::Cost {
        self.vertex_to_vertex_data
            .get(vertex)
            .map_or(u32::MAX, |vertex_data| vertex_data.cost)
    }

    fn heuristic(&self, vertex: &Self::Vertex) -> Self::Cost {
        manhattan_distance_2d(vertex.pos, self.end_pos) as u32
    }

    fn neighbors(
        &self,
        vertex: &Self::Vertex,
        neighbors: &mut Vec<OpenSetElement<Self::Vertex, Self::Cost>>,
    ) {
        neighbors.clear();
        neighbors.extend(
            Direction::iter()
                .filter_map(|dir| {
                    let pos: IVec2 = vertex.pos + dir.vec();

                    self.solution.0.get(pos)?;

                    match vertex.dir {
                        // First move: any in-bounds direction starts a run
                        None => Some(Vertex {
                            pos,
                            dir: Some(dir),
                            run_len: 1_u8,
                        }),
                        Some(current_dir) if dir == current_dir => {
                            (vertex.run_len < self.run_len_range.end).then_some(Vertex {
                                pos,
                                dir: Some(dir),
                                run_len: vertex.run_len + 1_u8,
                            })
                        }
                        Some(current_dir) if dir == current_dir.rev() => None,
                        Some(_) => (vertex.run_len >= self.run_len_range.start).then_some(Vertex {
                            pos,
                            dir: Some(dir),
                            run_len: 1_u8,
                        }),
                    }
                })
                .map(|neighbor| {
                    let cost: u32 = self.solution.0.get(neighbor.pos).unwrap().0 as u32;

                    OpenSetElement(neighbor, cost)
                }),
        );
    }

    fn update_vertex(
        &mut self,
        from: &Self::Vertex,
        to: &Self::Vertex,
        cost: Self::Cost,
        _heuristic: Self::Cost,
    ) {
        self.vertex_to_vertex_data.insert(
            to.clone(),
            VertexData {
                parent: from.clone(),
                cost,
            },
        );
    }

    fn reset(&mut self) {
        self.vertex_to_vertex_data.clear();
        self.vertex_to_vertex_data.insert(
            self.start.clone(),
            VertexData {
                parent: self.start.clone(),
                cost: 0_u32,
            },
        );
    }
}

struct PathGridCell(u8);

impl Default for PathGridCell {
    fn default() -> Self {
        Self::try_from(0_u8).unwrap()
    }
}

impl From<Direction> for PathGridCell {
    fn from(value: Direction) -> Self {
        match value {
            Direction::North => Self(b'^'),
            Direction::East => Self(b'>'),
            Direction::South => Self(b'v'),
            Direction::West => Self(b'<'),
        }
    }
}

// SAFETY: `PathGridCell` can only be constructed from valid ASCII bytes.
unsafe impl IsValidAscii for PathGridCell {}

impl TryFrom<u8> for PathGridCell {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        if (0_u8..=9_u8).contains(&value) {
            Ok(Self(value + b'0'))
        } else {
            Err(())
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Grid2D<HeatLoss>);

impl Solution {
    const REGULAR_CRUCIBLE_RUN_LEN_RANGE: Range<u8> = 0_u8..3_u8;
    const ULTRA_CRUCIBLE_RUN_LEN_RANGE: Range<u8> = 4_u8..10_u8;

    fn regular_crucible_path_finder(&self) -> CruciblePathFinder {
        CruciblePathFinder {
            solution: self,
            vertex_to_vertex_data: HashMap::new(),
            start: Vertex {
                pos: IVec2::ZERO,
                dir: None,
                run_len: 0_u8,
            },
            end_pos: self.0.max_dimensions(),
            run_len_range: Self::REGULAR_CRUCIBLE_RUN_LEN_RANGE,
        }
    }

    fn ultra_crucible_path_finder(&self) -> CruciblePathFinder {
        CruciblePathFinder {
            run_len_range: Self::ULTRA_CRUCIBLE_RUN_LEN_RANGE,
            ..self.regular_crucible_path_finder()
        }
    }

    fn minimal_heat_loss<F: for<'a> Fn(&'a Solution) -> CruciblePathFinder<'a>>(
        &self,
        path_finder: F,
    ) -> Option<u32> {
        let mut crucible_path_finder: CruciblePathFinder = path_finder(self);

        crucible_path_finder
            .run_a_star()
            .map(|path| crucible_path_finder.cost_from_start(path.last().unwrap()))
    }

    fn minimal_heat_loss_grid_and_cost<F: for<'a> Fn(&'a Solution) -> CruciblePathFinder<'a>>(
        &self,
        path_finder: F,
    ) -> Option<(Grid2D<PathGridCell>, u32)> {
        let mut crucible_path_finder: CruciblePathFinder = path_finder(self);

        crucible_path_finder.run_a_star().map(|path| {
            let cost: u32 = crucible_path_finder.cost_from_start(path.last().unwrap());
            let mut grid: Grid2D<PathGridCell> = Grid2D::try_from_cells_and_dimensions(
                self.0
                    .cells()
                    .iter()
                    .map(|heat_loss| PathGridCell::try_from(heat_loss.0).unwrap())
                    .collect(),
                self.0.dimensions(),
            )
            .unwrap();

            for vertex in path {
                if let Some(dir) = vertex.dir {
                    *grid.get_mut(vertex.pos).unwrap() = dir.into();
                }
            }

            (grid, cost)
        })
    }

    fn regular_crucible_minimal_heat_loss(&self) -> Option<u32> {
        self.minimal_heat_loss(Self::regular_crucible_path_finder)
    }

    fn ultra_crucible_minimal_heat_loss(&self) -> Option<u32> {
        self.minimal_heat_loss(Self::ultra_crucible_path_finder)
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Grid2D::<HeatLoss>::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.regular_crucible_minimal_heat_loss());
        } else if let Some((grid, minimal_heat_loss)) =
            self.minimal_heat_loss_grid_and_cost(Self::regular_crucible_path_finder)
        {
            dbg!(minimal_heat_loss);

            println!("\n{}\n", String::from(grid));
        } else {
            eprintln!("failed to find regular crucible minimal heat loss path");
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.ultra_crucible_minimal_heat_loss());
        } else if let Some((grid, minimal_heat_loss)) =
            self.minimal_heat_loss_grid_and_cost(Self::ultra_crucible_path_finder)
        {
            dbg!(minimal_heat_loss);

            println!("\n{}\n", String::from(grid));
        } else {
            eprintln!("failed to find ultra crucible minimal heat loss path");
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
    use super::*;

    const SOLUTION_STRS: &'static [&'static str] = &[
        "\
        2413432311323\n\
        3215453535623\n\
        3255245654254\n\
        3446585845452\n\
        4546657867536\n\
        1438598798454\n\
        4457876987766\n\
        3637877979653\n\
        4654967986887\n\
        4564679986453\n\
        1224686865563\n\
        2546548887735\n\
        4322674655533\n",
        "\
        111111111111\n\
        999999999991\n\
        999999999991\n\
        999999999991\n\
        999999999991\n",
    ];

    #[test]
    fn test_try_from_str() {
        let solution: Solution = Solution::try_from(SOLUTION_STRS[0_usize]).unwrap();

        assert_eq!(solution.0.dimensions(), IVec2::new(13_i32, 13_i32));
        assert_eq!(solution.0.get(IVec2::ZERO), Some(&HeatLoss(2_u8)));
        assert_eq!(
            solution.0.get(solution.0.max_dimensions()),
            Some(&HeatLoss(3_u8))
        );
    }

    #[test]
    fn test_regular_crucible_minimal_heat_loss() {
        assert_eq!(
            Solution::try_from(SOLUTION_STRS[0_usize])
                .unwrap()
                .regular_crucible_minimal_heat_loss(),
            Some(102_u32)
        );
    }

    #[test]
    fn test_ultra_crucible_minimal_heat_loss() {
        assert_eq!(
            Solution::try_from(SOLUTION_STRS[0_usize])
                .unwrap()
                .ultra_crucible_minimal_heat_loss(),
            Some(94_u32)
        );
        assert_eq!(
            Solution::try_from(SOLUTION_STRS[1_usize])
                .unwrap()
                .ultra_crucible_minimal_heat_loss(),
            Some(71_u32)
        );
    }
}
