use {
    super::{Direction, Grid2D, Pixel},
    glam::IVec2,
    num::Zero,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, HashMap, HashSet, VecDeque},
        hash::Hash,
        ops::Add,
    },
};

/// 4-connected frontier expansion over the open cells reachable from `seeds` without crossing a
/// closed cell. The returned overlay is light exactly where the fill reached; the caller's grid is
/// untouched.
///
/// Seeds must themselves be open cells: that precondition is on the caller, not defended against
/// here.
pub fn flood_fill_from<T, P: Fn(&T) -> bool, I: IntoIterator<Item = IVec2>>(
    grid: &Grid2D<T>,
    seeds: I,
    is_open: P,
) -> Grid2D<Pixel> {
    let mut filled: Grid2D<Pixel> = Grid2D::default(grid.dimensions());
    let mut frontier: VecDeque<IVec2> = seeds.into_iter().collect();

    while let Some(pos) = frontier.pop_front() {
        let cell: &mut Pixel = filled.get_mut(pos).unwrap();

        if cell.is_light() {
            continue;
        }

        *cell = Pixel::Light;

        frontier.extend(grid.neighbors4(pos).filter(|neighbor| {
            is_open(grid.get(*neighbor).unwrap()) && !filled.get(*neighbor).unwrap().is_light()
        }));
    }

    filled
}

pub fn flood_fill<T, P: Fn(&T) -> bool>(grid: &Grid2D<T>, seed: IVec2, is_open: P) -> Grid2D<Pixel> {
    flood_fill_from(grid, [seed], is_open)
}

/// A traversal state: the same cell entered under two different headings is two distinct states.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PosDir {
    pub pos: IVec2,
    pub dir: Direction,
}

/// What a `HeadingTraversal` run saw: every visited (position, heading) state, plus the frontier
/// depth at which each cell was first reached.
#[derive(Debug, Default)]
pub struct TraversalRecord {
    states: HashSet<PosDir>,
    cell_depths: HashMap<IVec2, u32>,
}

impl TraversalRecord {
    pub fn touched_cell_count(&self) -> usize {
        self.cell_depths.len()
    }

    pub fn touched_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cell_depths.keys().copied()
    }

    pub fn was_touched(&self, pos: IVec2) -> bool {
        self.cell_depths.contains_key(&pos)
    }

    pub fn depth(&self, pos: IVec2) -> Option<u32> {
        self.cell_depths.get(&pos).copied()
    }

    pub fn max_depth(&self) -> u32 {
        self.cell_depths.values().copied().max().unwrap_or_default()
    }
}

/// Breadth-first search where the visited key is the full (position, heading) state.
///
/// Keying on the heading too is what makes this terminate on looping tile layouts: a cell may
/// legitimately be re-entered under a different heading, but the same state must never be
/// processed twice.
pub trait HeadingTraversal {
    /// Maps an incoming heading at an in-bounds position to one or two outgoing headings.
    fn route(&self, pos: IVec2, dir: Direction) -> (Direction, Option<Direction>);

    fn contains(&self, pos: IVec2) -> bool;

    fn traverse<I: IntoIterator<Item = PosDir>>(&self, starts: I) -> TraversalRecord {
        let mut record: TraversalRecord = TraversalRecord::default();
        let mut frontier: VecDeque<(PosDir, u32)> =
            starts.into_iter().map(|state| (state, 0_u32)).collect();

        while let Some((state, depth)) = frontier.pop_front() {
            if !self.contains(state.pos) || !record.states.insert(state) {
                continue;
            }

            record.cell_depths.entry(state.pos).or_insert(depth);

            let (out_dir_a, out_dir_b): (Direction, Option<Direction>) =
                self.route(state.pos, state.dir);

            for out_dir in [Some(out_dir_a), out_dir_b].into_iter().flatten() {
                frontier.push_back((
                    PosDir {
                        pos: state.pos + out_dir.vec(),
                        dir: out_dir,
                    },
                    depth + 1_u32,
                ));
            }
        }

        record
    }
}

pub struct OpenSetElement<V, C>(pub V, pub C);

impl<V, C: Ord> PartialEq for OpenSetElement<V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<V, C: Ord> Eq for OpenSetElement<V, C> {}

impl<V, C: Ord> PartialOrd for OpenSetElement<V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, C: Ord> Ord for OpenSetElement<V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the order so that cost is minimized when popping from the heap
        other.1.cmp(&self.1)
    }
}

pub fn zero_heuristic<W: WeightedSearch + ?Sized>(_search: &W, _vertex: &W::Vertex) -> W::Cost {
    W::Cost::zero()
}

/// An implementation of https://en.wikipedia.org/wiki/A*_search_algorithm and
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
///
/// The implementor owns the per-vertex bookkeeping (`cost_from_start`, parents for `path_to`);
/// the driver owns the open set. Cheaper rediscoveries push duplicate heap entries, and stale
/// entries are skipped when popped.
pub trait WeightedSearch {
    type Vertex: Clone + Eq + Hash;
    type Cost: Add<Self::Cost, Output = Self::Cost> + Clone + Ord + Sized + Zero;

    fn start(&self) -> &Self::Vertex;
    fn is_end(&self, vertex: &Self::Vertex) -> bool;
    fn path_to(&self, vertex: &Self::Vertex) -> Vec<Self::Vertex>;
    fn cost_from_start(&self, vertex: &Self::Vertex) -> Self::Cost;
    fn heuristic(&self, vertex: &Self::Vertex) -> Self::Cost;

    /// The cost is from `vertex` to the neighbor.
    fn neighbors(
        &self,
        vertex: &Self::Vertex,
        neighbors: &mut Vec<OpenSetElement<Self::Vertex, Self::Cost>>,
    );

    /// `heuristic` may be zero if this is called by Dijkstra.
    fn update_vertex(
        &mut self,
        from: &Self::Vertex,
        to: &Self::Vertex,
        cost: Self::Cost,
        heuristic: Self::Cost,
    );
    fn reset(&mut self);

    fn run_internal<F: Fn(&Self, &Self::Vertex) -> Self::Cost>(
        &mut self,
        heuristic: F,
    ) -> Option<Vec<Self::Vertex>> {
        self.reset();

        let start: Self::Vertex = self.start().clone();
        let mut open_set: BinaryHeap<OpenSetElement<Self::Vertex, Self::Cost>> = BinaryHeap::new();
        let mut neighbors: Vec<OpenSetElement<Self::Vertex, Self::Cost>> = Vec::new();

        open_set.push(OpenSetElement(
            start.clone(),
            self.cost_from_start(&start) + heuristic(self, &start),
        ));

        while let Some(OpenSetElement(current, f_score)) = open_set.pop() {
            let start_to_current: Self::Cost = self.cost_from_start(&current);

            // A cheaper path to this vertex was recorded after this entry was pushed
            if f_score > start_to_current.clone() + heuristic(self, &current) {
                continue;
            }

            if self.is_end(&current) {
                return Some(self.path_to(&current));
            }

            self.neighbors(&current, &mut neighbors);

            for OpenSetElement(neighbor, edge_cost) in neighbors.drain(..) {
                let start_to_neighbor: Self::Cost = start_to_current.clone() + edge_cost;

                if start_to_neighbor < self.cost_from_start(&neighbor) {
                    let neighbor_heuristic: Self::Cost = heuristic(self, &neighbor);

                    self.update_vertex(
                        &current,
                        &neighbor,
                        start_to_neighbor.clone(),
                        neighbor_heuristic.clone(),
                    );
                    open_set.push(OpenSetElement(
                        neighbor,
                        start_to_neighbor + neighbor_heuristic,
                    ));
                }
            }
        }

        None
    }

    fn run_a_star(&mut self) -> Option<Vec<Self::Vertex>> {
        self.run_internal(Self::heuristic)
    }

    fn run_dijkstra(&mut self) -> Option<Vec<Self::Vertex>> {
        self.run_internal(zero_heuristic::<Self>)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{manhattan_distance_2d, CellIter2D},
        strum::IntoEnumIterator,
    };

    fn boundary_grid(boundary: &[IVec2], dimensions: IVec2) -> Grid2D<Pixel> {
        let mut grid: Grid2D<Pixel> = Grid2D::default(dimensions);

        for pos in boundary.iter().copied() {
            *grid.get_mut(pos).unwrap() = Pixel::Light;
        }

        grid
    }

    /// Even-odd point-in-polygon reference: a cell is interior iff the boundary-cell count is odd
    /// along all four axis rays out of it.
    fn is_interior_by_ray_count(grid: &Grid2D<Pixel>, pos: IVec2) -> bool {
        if grid.get(pos).unwrap().is_light() {
            return false;
        }

        Direction::iter().all(|dir| {
            CellIter2D::until_boundary(grid, pos, dir)
                .filter(|ray_pos| grid.get(*ray_pos).unwrap().is_light())
                .count()
                % 2_usize
                == 1_usize
        })
    }

    fn rect_boundary(min: IVec2, max: IVec2) -> Vec<IVec2> {
        [
            (min..IVec2::new(max.x, min.y)),
            (IVec2::new(max.x, min.y)..max),
            (max..IVec2::new(min.x, max.y)),
            (IVec2::new(min.x, max.y)..min),
        ]
        .into_iter()
        .flat_map(|range| CellIter2D::try_from(range).unwrap())
        .collect()
    }

    #[test]
    fn test_flood_fill_matches_ray_count() {
        let dimensions: IVec2 = IVec2::new(12_i32, 10_i32);

        for (min, max) in [
            (IVec2::new(1_i32, 1_i32), IVec2::new(10_i32, 8_i32)),
            (IVec2::new(2_i32, 3_i32), IVec2::new(6_i32, 5_i32)),
            (IVec2::new(4_i32, 2_i32), IVec2::new(6_i32, 4_i32)),
        ] {
            let grid: Grid2D<Pixel> = boundary_grid(&rect_boundary(min, max), dimensions);
            let filled: Grid2D<Pixel> =
                flood_fill(&grid, min + IVec2::ONE, |pixel| !pixel.is_light());
            let filled_count: usize = filled
                .cells()
                .iter()
                .copied()
                .filter(|pixel| pixel.is_light())
                .count();
            let interior_count: usize = grid
                .iter_positions()
                .filter(|pos| is_interior_by_ray_count(&grid, *pos))
                .count();

            assert_eq!(filled_count, interior_count);
            let extent = (max - min) - IVec2::ONE;
            assert_eq!(filled_count, (extent.x * extent.y) as usize);
        }
    }

    #[test]
    fn test_flood_fill_marks_each_cell_once() {
        let grid: Grid2D<Pixel> = boundary_grid(
            &rect_boundary(IVec2::ZERO, IVec2::new(4_i32, 4_i32)),
            IVec2::new(5_i32, 5_i32),
        );
        let filled_a: Grid2D<Pixel> = flood_fill(&grid, IVec2::ONE, |pixel| !pixel.is_light());
        let filled_b: Grid2D<Pixel> = flood_fill(&grid, IVec2::ONE, |pixel| !pixel.is_light());

        assert_eq!(filled_a, filled_b);
    }

    struct CostGridSearch {
        costs: Grid2D<u32>,
        start: IVec2,
        end: IVec2,
        pos_to_cost_and_parent: HashMap<IVec2, (u32, IVec2)>,
    }

    impl WeightedSearch for CostGridSearch {
        type Vertex = IVec2;
        type Cost = u32;

        fn start(&self) -> &IVec2 {
            &self.start
        }

        fn is_end(&self, vertex: &IVec2) -> bool {
            *vertex == self.end
        }

        fn path_to(&self, vertex: &IVec2) -> Vec<IVec2> {
            let mut path: Vec<IVec2> = vec![*vertex];

            while let Some((_, parent)) = self
                .pos_to_cost_and_parent
                .get(path.last().unwrap())
                .filter(|(_, parent)| parent != path.last().unwrap())
            {
                path.push(*parent);
            }

            path.reverse();

            path
        }

        fn cost_from_start(&self, vertex: &IVec2) -> u32 {
            self.pos_to_cost_and_parent
                .get(vertex)
                .map_or(u32::MAX, |(cost, _)| *cost)
        }

        fn heuristic(&self, vertex: &IVec2) -> u32 {
            manhattan_distance_2d(*vertex, self.end) as u32
        }

        fn neighbors(&self, vertex: &IVec2, neighbors: &mut Vec<OpenSetElement<IVec2, u32>>) {
            neighbors.clear();
            neighbors.extend(
                self.costs
                    .neighbors4(*vertex)
                    .map(|neighbor| OpenSetElement(neighbor, *self.costs.get(neighbor).unwrap())),
            );
        }

        fn update_vertex(&mut self, from: &IVec2, to: &IVec2, cost: u32, _heuristic: u32) {
            self.pos_to_cost_and_parent.insert(*to, (cost, *from));
        }

        fn reset(&mut self) {
            self.pos_to_cost_and_parent.clear();
            self.pos_to_cost_and_parent
                .insert(self.start, (0_u32, self.start));
        }
    }

    fn cost_grid_search() -> CostGridSearch {
        CostGridSearch {
            costs: Grid2D::try_from_cells_and_width(
                vec![1_u32, 2_u32, 5_u32, 4_u32, 2_u32, 9_u32, 3_u32, 2_u32, 6_u32],
                3_usize,
            )
            .unwrap(),
            start: IVec2::ZERO,
            end: IVec2::new(2_i32, 2_i32),
            pos_to_cost_and_parent: HashMap::new(),
        }
    }

    #[test]
    fn test_weighted_search_minimal_cost() {
        let mut search: CostGridSearch = cost_grid_search();

        let path: Vec<IVec2> = search.run_dijkstra().unwrap();

        assert_eq!(search.cost_from_start(path.last().unwrap()), 12_u32);
        assert_eq!(path.first(), Some(&IVec2::ZERO));

        let a_star_path: Vec<IVec2> = search.run_a_star().unwrap();

        assert_eq!(search.cost_from_start(a_star_path.last().unwrap()), 12_u32);
    }
}
