use {
    super::Parse,
    glam::IVec2,
    nom::{
        character::complete::line_ending,
        combinator::{map_res, opt},
        error::{Error as NomError, ErrorKind as NomErrorKind},
        multi::many1_count,
        sequence::tuple,
        Err, IResult,
    },
    static_assertions::const_assert,
    std::{
        fmt::{Debug, DebugList, Formatter, Result as FmtResult, Write},
        iter::Peekable,
        mem::transmute,
        ops::{Range, RangeInclusive},
        str::{from_utf8, Lines},
    },
    strum::{EnumCount, IntoEnumIterator},
};

macro_rules! define_direction {
    {
        $( #[$meta:meta] )*
        $vis:vis enum $direction:ident {
            $(
                $( #[$variant_meta:meta] )?
                $variant:ident,
            )*
        }
    } => {
        $(#[$meta])*
        $vis enum $direction {
            $(
                $( #[$variant_meta] )?
                $variant,
            )*
        }

        const VECS: [IVec2; $direction::COUNT] = [
            $( $direction::$variant.vec_internal(), )*
        ];
    };
}

define_direction! {
    #[derive(Copy, Clone, Debug, Default, strum::EnumCount, strum::EnumIter, Eq, Hash, PartialEq)]
    #[repr(u8)]
    pub enum Direction {
        #[default]
        North,
        East,
        South,
        West,
    }
}

// This guarantees we can safely convert from `u8` to `Direction` by masking the smallest 2 bits,
// which is the same as masking by `MASK`
const_assert!(Direction::COUNT == 4_usize);

impl Direction {
    pub const COUNT_U8: u8 = Self::COUNT as u8;
    pub const MASK: u8 = Self::COUNT_U8 - 1_u8;
    pub const HALF_COUNT: u8 = Self::COUNT_U8 / 2_u8;
    pub const PREV_DELTA: u8 = Self::COUNT_U8 - 1_u8;

    #[inline]
    pub const fn vec(self) -> IVec2 {
        VECS[self as usize]
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: See `const_assert` above
        unsafe { transmute(value & Self::MASK) }
    }

    #[inline]
    pub const fn next(self) -> Self {
        Self::from_u8(self as u8 + 1_u8)
    }

    #[inline]
    pub const fn rev(self) -> Self {
        Self::from_u8(self as u8 + Self::HALF_COUNT)
    }

    #[inline]
    pub const fn prev(self) -> Self {
        Self::from_u8(self as u8 + Self::PREV_DELTA)
    }

    pub const fn is_north_or_south(self) -> bool {
        (self as u8 & 1_u8) == 0_u8
    }

    const fn vec_internal(self) -> IVec2 {
        match self {
            Self::North => IVec2::NEG_Y,
            Self::East => IVec2::X,
            Self::South => IVec2::Y,
            Self::West => IVec2::NEG_X,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(value: Direction) -> Self {
        value.vec()
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl TryFrom<IVec2> for Direction {
    type Error = ();

    fn try_from(value: IVec2) -> Result<Self, Self::Error> {
        VECS.iter()
            .position(|vec| *vec == value)
            .map(|index| (index as u8).into())
            .ok_or(())
    }
}

impl TryFrom<Range<IVec2>> for Direction {
    type Error = CellIterFromRangeError;

    fn try_from(Range { start, end }: Range<IVec2>) -> Result<Self, Self::Error> {
        use CellIterFromRangeError::*;

        let delta: IVec2 = end - start;

        if delta == IVec2::ZERO {
            Err(PositionsIdentical)
        } else if delta.x != 0_i32 && delta.y != 0_i32 {
            Err(PositionsNotAligned)
        } else {
            let abs: IVec2 = delta.abs();

            Ok((delta / (abs.x + abs.y)).try_into().unwrap())
        }
    }
}

pub struct SideLen(pub usize);

impl From<SideLen> for IVec2 {
    fn from(side_len: SideLen) -> Self {
        IVec2::new(side_len.0 as i32, side_len.0 as i32)
    }
}

pub fn manhattan_magnitude_2d(pos: IVec2) -> i32 {
    let abs: IVec2 = pos.abs();

    abs.x + abs.y
}

pub fn manhattan_distance_2d(a: IVec2, b: IVec2) -> i32 {
    manhattan_magnitude_2d(a - b)
}

/// A probe of a `Grid2D` position outside `[0, width) x [0, height)`.
///
/// Bounds misses fail loudly through this: `at` never clamps and never falls back to a default
/// cell.
#[derive(Debug, Eq, PartialEq)]
pub struct GridOutOfBounds {
    pub pos: IVec2,
    pub dimensions: IVec2,
}

pub struct Grid2D<T> {
    cells: Vec<T>,

    /// Should only contain unsigned values, but is signed for ease of use for iterating
    dimensions: IVec2,
}

impl<T> Grid2D<T> {
    pub fn try_from_cells_and_dimensions(cells: Vec<T>, dimensions: IVec2) -> Option<Self> {
        (dimensions.cmpge(IVec2::ZERO).all()
            && cells.len() == dimensions.x as usize * dimensions.y as usize)
            .then_some(Self { cells, dimensions })
    }

    pub fn try_from_cells_and_width(cells: Vec<T>, width: usize) -> Option<Self> {
        let cells_len: usize = cells.len();

        (cells_len % width == 0_usize).then(|| Self {
            cells,
            dimensions: IVec2::new(width as i32, (cells_len / width) as i32),
        })
    }

    pub fn empty(dimensions: IVec2) -> Self {
        Self {
            cells: Vec::new(),
            dimensions,
        }
    }

    pub fn allocate(dimensions: IVec2) -> Self {
        Self {
            cells: Vec::with_capacity((dimensions.x * dimensions.y) as usize),
            dimensions,
        }
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    #[inline]
    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    #[inline]
    pub fn area(&self) -> usize {
        (self.dimensions.x * self.dimensions.y) as usize
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.dimensions).all()
    }

    pub fn is_border(&self, pos: IVec2) -> bool {
        self.contains(pos)
            && (pos.cmpeq(IVec2::ZERO).any() || pos.cmpeq(self.max_dimensions()).any())
    }

    #[inline]
    pub fn index_from_pos(&self, pos: IVec2) -> usize {
        pos.y as usize * self.dimensions.x as usize + pos.x as usize
    }

    pub fn try_index_from_pos(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos).then(|| self.index_from_pos(pos))
    }

    pub fn pos_from_index(&self, index: usize) -> IVec2 {
        let x: usize = self.dimensions.x as usize;

        IVec2::new((index % x) as i32, (index / x) as i32)
    }

    #[inline(always)]
    pub fn max_dimensions(&self) -> IVec2 {
        self.dimensions - IVec2::ONE
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &mut self.cells[index])
    }

    pub fn at(&self, pos: IVec2) -> Result<&T, GridOutOfBounds> {
        self.get(pos).ok_or(GridOutOfBounds {
            pos,
            dimensions: self.dimensions,
        })
    }

    /// Up to 4 in-bounds orthogonally adjacent positions, in `Direction` order
    pub fn neighbors4(&self, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        Direction::iter()
            .map(move |dir| pos + dir.vec())
            .filter(|neighbor| self.contains(*neighbor))
    }

    /// Up to 8 in-bounds adjacent positions, diagonals included
    pub fn neighbors8(&self, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
        const DELTAS: [IVec2; 8_usize] = [
            IVec2::NEG_Y,
            IVec2::new(1_i32, -1_i32),
            IVec2::X,
            IVec2::ONE,
            IVec2::Y,
            IVec2::new(-1_i32, 1_i32),
            IVec2::NEG_X,
            IVec2::NEG_ONE,
        ];

        DELTAS
            .into_iter()
            .map(move |delta| pos + delta)
            .filter(|neighbor| self.contains(*neighbor))
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = IVec2> {
        let dimensions: IVec2 = self.dimensions;

        (0_i32..dimensions.y)
            .flat_map(move |y| (0_i32..dimensions.x).map(move |x| IVec2::new(x, y)))
    }

    pub fn iter_filtered_positions<'a, P: Fn(&T) -> bool + 'a>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = IVec2> + 'a {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| predicate(cell).then(|| self.pos_from_index(index)))
    }

    pub fn iter_positions_with_cell<'a>(&'a self, target: &'a T) -> impl Iterator<Item = IVec2> + 'a
    where
        T: PartialEq,
    {
        self.iter_filtered_positions(|cell| *cell == *target)
    }

    pub fn try_find_single_position_with_cell(&self, target: &T) -> Option<IVec2>
    where
        T: PartialEq,
    {
        self.iter_positions_with_cell(target)
            .try_fold(None, |prev_pos, curr_pos| {
                prev_pos.is_none().then_some(Some(curr_pos))
            })
            .flatten()
    }
}

impl<T: Clone> Clone for Grid2D<T> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            dimensions: self.dimensions,
        }
    }
}

impl<T: Debug> Debug for Grid2D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Grid2D")?;
        let mut y_list: DebugList = f.debug_list();

        for y in 0_i32..self.dimensions.y {
            let start: usize = (y * self.dimensions.x) as usize;

            y_list.entry(&&self.cells[start..(start + self.dimensions.x as usize)]);
        }

        y_list.finish()
    }
}

impl<T: Default> Grid2D<T> {
    pub fn default(dimensions: IVec2) -> Self {
        let capacity: usize = (dimensions.x * dimensions.y) as usize;
        let mut cells: Vec<T> = Vec::with_capacity(capacity);

        cells.resize_with(capacity, T::default);

        Self { cells, dimensions }
    }
}

impl<T: Parse> Parse for Grid2D<T> {
    fn parse(input: &str) -> IResult<&str, Self> {
        let mut width: Option<usize> = None;
        let mut cells: Vec<T> = Vec::new();
        let (input, _) = many1_count(map_res(
            tuple((T::parse, opt(line_ending))),
            |(cell, opt_line_ending)| -> Result<(), ()> {
                cells.push(cell);

                if opt_line_ending.is_some() {
                    match width {
                        Some(width) => {
                            if cells.len() % width != 0_usize {
                                Err(())?;
                            }
                        }
                        None => {
                            width = Some(cells.len());
                        }
                    }
                }

                Ok(())
            },
        ))(input)?;

        let width: usize = width.unwrap_or(cells.len());

        if width != 0_usize && cells.len() % width != 0_usize {
            Err(Err::Failure(NomError::new(input, NomErrorKind::ManyMN)))
        } else {
            Ok((
                input,
                Grid2D::try_from_cells_and_width(cells, width).unwrap(),
            ))
        }
    }
}

impl<T: PartialEq> PartialEq for Grid2D<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.cells == other.cells
    }
}

#[allow(dead_code)]
#[derive(Debug, PartialEq)]
pub enum GridParseError<'s, E> {
    NoInitialToken,
    IsNotAscii(&'s str),
    InvalidLength { line: &'s str, expected_len: usize },
    CellParseError(E),
}

impl<'s, E, T: TryFrom<char, Error = E>> TryFrom<&'s str> for Grid2D<T> {
    type Error = GridParseError<'s, E>;

    fn try_from(grid_str: &'s str) -> Result<Self, Self::Error> {
        use GridParseError as Error;

        let mut grid_line_iter: Peekable<Lines> = grid_str.lines().peekable();

        let side_len: usize = grid_line_iter.peek().ok_or(Error::NoInitialToken)?.len();

        let mut grid: Grid2D<T> = Grid2D::allocate(SideLen(side_len).into());
        let mut lines: usize = 0_usize;

        for grid_line_str in grid_line_iter {
            if !grid_line_str.is_ascii() {
                return Err(Error::IsNotAscii(grid_line_str));
            }

            if grid_line_str.len() != side_len {
                return Err(Error::InvalidLength {
                    line: grid_line_str,
                    expected_len: side_len,
                });
            }

            for cell_char in grid_line_str.chars() {
                grid.cells
                    .push(cell_char.try_into().map_err(Error::CellParseError)?);
            }

            lines += 1_usize;
        }

        if lines != side_len {
            grid.dimensions.y = lines as i32;
        }

        Ok(grid)
    }
}

#[derive(Debug)]
pub enum CellIterFromRangeError {
    PositionsIdentical,
    PositionsNotAligned,
}

/// Iterator over an axis-aligned run of grid positions
pub struct CellIter2D {
    curr: IVec2,
    end: IVec2,
    dir: Direction,
}

impl CellIter2D {
    pub fn corner_for_dimensions(dimensions: IVec2, dir: Direction) -> Self {
        let dir_vec: IVec2 = dir.vec();
        let curr: IVec2 =
            (-dimensions * (dir_vec + dir_vec.perp())).clamp(IVec2::ZERO, dimensions - IVec2::ONE);

        Self::until_boundary_for_dimensions(dimensions, curr, dir)
    }

    pub fn corner<T>(grid: &Grid2D<T>, dir: Direction) -> Self {
        Self::corner_for_dimensions(grid.dimensions(), dir)
    }

    pub fn until_boundary_for_dimensions(dimensions: IVec2, curr: IVec2, dir: Direction) -> Self {
        let dir_vec: IVec2 = dir.vec();
        let end: IVec2 =
            (curr + dir_vec * dimensions).clamp(IVec2::ZERO, dimensions - IVec2::ONE) + dir_vec;

        Self { curr, end, dir }
    }

    pub fn until_boundary<T>(grid: &Grid2D<T>, curr: IVec2, dir: Direction) -> Self {
        Self::until_boundary_for_dimensions(grid.dimensions(), curr, dir)
    }
}

impl Iterator for CellIter2D {
    type Item = IVec2;

    fn next(&mut self) -> Option<Self::Item> {
        (self.curr != self.end).then(|| {
            let prev: IVec2 = self.curr;

            self.curr += self.dir.vec();

            prev
        })
    }
}

impl TryFrom<Range<IVec2>> for CellIter2D {
    type Error = CellIterFromRangeError;

    fn try_from(range: Range<IVec2>) -> Result<Self, Self::Error> {
        let curr: IVec2 = range.start;
        let end: IVec2 = range.end;

        Direction::try_from(range).map(|dir| Self { curr, end, dir })
    }
}

impl TryFrom<RangeInclusive<IVec2>> for CellIter2D {
    type Error = CellIterFromRangeError;

    fn try_from(range_inclusive: RangeInclusive<IVec2>) -> Result<Self, Self::Error> {
        let curr: IVec2 = *range_inclusive.start();
        let end: IVec2 = *range_inclusive.end();

        Direction::try_from(curr..end).map(|dir| Self {
            curr,
            end: end + dir.vec(),
            dir,
        })
    }
}

/// A marker trait to indicate that a type is a single byte, and any possible value is a valid
/// ASCII byte.
///
/// # Safety
///
/// Only implement this on a type that meets the following criteria:
///
/// * `std::mem::size_of::<Self>() == 1_usize`
/// * `std::str::from_utf8(std::mem::transmute::<[Self], [u8]>(value)).is_ok()` for any `value:
///   [Self]`.
pub unsafe trait IsValidAscii {}

impl<T: IsValidAscii> From<Grid2D<T>> for String {
    fn from(value: Grid2D<T>) -> Self {
        let dimensions: IVec2 = value.dimensions;
        let width: usize = dimensions.x as usize;
        let height: usize = dimensions.y as usize;

        // SAFETY: Guaranteed by `T` implementing `IsValidAscii`
        let bytes: &[u8] = unsafe { transmute(value.cells()) };

        let mut string: String = String::with_capacity((width + 1_usize) * height);

        for y in 0_usize..height {
            let start: usize = y * width;
            let row_str: &str = from_utf8(&bytes[start..start + width]).unwrap_or_else(|e| {
                panic!("A grid of `IsValidAscii` cells contained an invalid UTF-8 slice: {e:?}");
            });

            writeln!(&mut string, "{row_str}").unwrap();
        }

        string
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::Pixel};

    fn small_grid() -> Grid2D<Pixel> {
        use Pixel::{Dark as D, Light as L};

        Grid2D::try_from_cells_and_width(vec![D, L, D, L, D, L, D, L, D, L, D, L], 4_usize).unwrap()
    }

    #[test]
    fn test_at_in_bounds() {
        let grid: Grid2D<Pixel> = small_grid();

        assert_eq!(grid.at(IVec2::ZERO), Ok(&Pixel::Dark));
        assert_eq!(grid.at(IVec2::new(1_i32, 0_i32)), Ok(&Pixel::Light));
        assert_eq!(grid.at(grid.max_dimensions()), Ok(&Pixel::Light));
    }

    #[test]
    fn test_at_out_of_bounds() {
        let grid: Grid2D<Pixel> = small_grid();
        let dimensions: IVec2 = grid.dimensions();

        for pos in [
            IVec2::new(-1_i32, 0_i32),
            IVec2::new(0_i32, -1_i32),
            IVec2::new(dimensions.x, 0_i32),
            IVec2::new(0_i32, dimensions.y),
            IVec2::new(i32::MAX, i32::MAX),
            IVec2::NEG_ONE,
        ] {
            assert_eq!(grid.at(pos), Err(GridOutOfBounds { pos, dimensions }));
        }
    }

    #[test]
    fn test_neighbors4() {
        let grid: Grid2D<Pixel> = small_grid();

        assert_eq!(
            grid.neighbors4(IVec2::ZERO).collect::<Vec<IVec2>>(),
            vec![IVec2::X, IVec2::Y]
        );
        assert_eq!(
            grid.neighbors4(IVec2::new(1_i32, 1_i32))
                .collect::<Vec<IVec2>>(),
            vec![
                IVec2::new(1_i32, 0_i32),
                IVec2::new(2_i32, 1_i32),
                IVec2::new(1_i32, 2_i32),
                IVec2::new(0_i32, 1_i32)
            ]
        );
    }

    #[test]
    fn test_neighbors8() {
        let grid: Grid2D<Pixel> = small_grid();

        assert_eq!(grid.neighbors8(IVec2::ZERO).count(), 3_usize);
        assert_eq!(grid.neighbors8(IVec2::new(1_i32, 1_i32)).count(), 8_usize);
    }

    #[test]
    fn test_corner() {
        let grid: Grid2D<()> = Grid2D::empty(SideLen(5_usize).into());

        assert_eq!(
            Direction::iter()
                .flat_map(|dir: Direction| -> CellIter2D { CellIter2D::corner(&grid, dir) })
                .map(|pos: IVec2| -> usize { grid.index_from_pos(pos) })
                .collect::<Vec<usize>>(),
            vec![
                20, 15, 10, 5, 0, // North
                0, 1, 2, 3, 4, // East
                4, 9, 14, 19, 24, // South
                24, 23, 22, 21, 20 // West
            ]
        );
    }
}
