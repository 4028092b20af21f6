pub use {grid::*, pulse::*, search::*};

use {
    clap::Parser,
    memmap::Mmap,
    nom::{
        bytes::complete::tag,
        character::complete::digit1,
        combinator::{map, map_res, opt, rest},
        sequence::tuple,
        IResult,
    },
    num::Integer,
    std::{
        any::type_name,
        collections::BTreeMap,
        fmt::Debug,
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

pub mod grid;
pub mod pulse;
pub mod search;

#[derive(Debug, Parser)]
pub struct QuestionArgs {
    /// Print extra information, if there is any
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path, `input/y{year}/d{day}.txt` if empty
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// The year to run
    #[arg(short, long)]
    pub year: u16,

    /// The day to run
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=25))]
    pub day: u8,

    /// The question to run, both if omitted
    #[arg(short, long, default_value_t, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub question: u8,

    #[command(flatten)]
    pub question_args: QuestionArgs,
}

impl Args {
    fn try_to_intermediate<I>(&self) -> Option<I>
    where
        I: for<'a> TryFrom<&'a str>,
        for<'a> <I as TryFrom<&'a str>>::Error: Debug,
    {
        let default_file_path: String;
        let file_path: &str = if self.input_file_path.is_empty() {
            default_file_path = format!("input/y{}/d{}.txt", self.year, self.day);

            &default_file_path
        } else {
            &self.input_file_path
        };

        // SAFETY: This isn't truly safe, we're just hoping nobody touches our file before we're
        // done parsing it
        unsafe {
            open_utf8_file(file_path, |s| {
                s.try_into().map_or_else(
                    |error| {
                        eprintln!(
                            "Failed to convert file \"{file_path}\" to type {}:\n{error:#?}",
                            type_name::<I>()
                        );

                        None
                    },
                    Some,
                )
            })
        }
        .unwrap_or_else(|error| {
            eprintln!("Failed to open UTF-8 file \"{file_path}\":\n{error}");

            None
        })
    }
}

/// The two entry points of a day's puzzle, run against an already-parsed `Self`.
pub trait RunQuestions
where
    Self: Sized + for<'a> TryFrom<&'a str>,
    for<'a> <Self as TryFrom<&'a str>>::Error: Debug,
{
    fn q1_internal(&mut self, args: &QuestionArgs);
    fn q2_internal(&mut self, args: &QuestionArgs);

    fn q1(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
        }
    }

    fn q2(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q2_internal(&args.question_args);
        }
    }

    fn both(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
            intermediate.q2_internal(&args.question_args);
        }
    }
}

#[derive(Clone)]
pub struct Day {
    pub q1: fn(&Args),
    pub q2: fn(&Args),
    pub both: fn(&Args),
}

impl Day {
    fn run(&self, args: &Args) {
        match args.question {
            0 => (self.both)(args),
            1 => (self.q1)(args),
            2 => (self.q2)(args),
            question => unreachable!(
                "A valid Args will have a question value in the range 0..=2, but {question} was \
                encountered.\n\
                Args:\n\
                {args:#?}"
            ),
        }
    }
}

fn parse_tagged_int<'i, I: FromStr>(t: &str, input: &'i str) -> IResult<&'i str, I> {
    map(tuple((tag(t), map_res(rest, I::from_str))), |(_, i)| i)(input)
}

/// Registry of all runnable days, keyed on year then day.
///
/// Module identifiers like `y2023` and `d16` double as the keys: the `solutions!` macro passes
/// their stringified forms in, and they're parsed back into integers here.
#[derive(Default)]
pub struct Solutions(BTreeMap<u16, BTreeMap<u8, Day>>);

impl Solutions {
    pub fn run(&self, args: &Args) {
        let Some(days) = self.0.get(&args.year) else {
            panic!(
                "Queried year {} has no registered days.\n\
                Args:\n\
                {args:#?}",
                args.year
            );
        };

        let Some(day) = days.get(&args.day) else {
            panic!(
                "Queried day {} has no registered questions.\n\
                Args:\n\
                {args:#?}",
                args.day
            );
        };

        day.run(args);
    }

    pub fn try_from_entries(entries: Vec<(&str, Vec<(&str, Day)>)>) -> Option<Self> {
        let mut years: BTreeMap<u16, BTreeMap<u8, Day>> = BTreeMap::new();

        for (year_str, day_entries) in entries {
            let year: u16 = parse_tagged_int("y", year_str).ok()?.1;
            let days: &mut BTreeMap<u8, Day> = years.entry(year).or_default();

            for (day_str, day) in day_entries {
                days.insert(parse_tagged_int("d", day_str).ok()?.1, day);
            }
        }

        Some(Self(years))
    }
}

#[macro_export]
macro_rules! solutions {
    [ $( ( $year:ident, [ $( $day:ident ),* $(,)?] ) ),* $(,)? ] => {
        $(
            pub mod $year {
                $(
                    pub mod $day;
                )*
            }
        )*

        pub fn solutions() -> &'static Solutions {
            static ONCE_LOCK: std::sync::OnceLock<Solutions> = std::sync::OnceLock::new();

            ONCE_LOCK.get_or_init(|| Solutions::try_from_entries(vec![ $(
                (
                    stringify!($year),
                    vec![ $(
                        (
                            stringify!($day),
                            Day {
                                q1: $year::$day::Solution::q1,
                                q2: $year::$day::Solution::q2,
                                both: $year::$day::Solution::both,
                            },
                        ),
                    )* ],
                ),
            )* ]).unwrap_or_else(Solutions::default))
        }
    };
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes a `&str` over the file to a
/// provided callback function
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if the file can't be opened,
/// can't be mapped, or isn't valid UTF-8. `f` is only executed *iff* an error is not encountered.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no guarantee that an
/// external process won't modify the file after it is opened as read-only, which would be UB
/// while the contents are viewed as an immutable string slice.
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

pub fn parse_integer<'i, I: FromStr + Integer>(input: &'i str) -> IResult<&'i str, I> {
    map(
        tuple((
            map(opt(tag("-")), |minus| {
                if minus.is_some() {
                    I::zero() - I::one()
                } else {
                    I::one()
                }
            }),
            map_res(digit1, I::from_str),
        )),
        |(sign, bound)| sign * bound,
    )(input)
}

pub trait Parse: Sized {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self>;
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct PrimeFactor {
    pub prime: u32,
    pub exponent: u32,
}

fn try_get_prime_factor(value: &mut u32, divisor: u32) -> Option<PrimeFactor> {
    let mut local_value: u32 = *value;
    let mut exponent: u32 = 0_u32;

    if local_value != 1_u32 {
        while local_value % divisor == 0_u32 {
            local_value /= divisor;
            exponent += 1_u32;
        }

        *value = local_value;
    }

    if exponent != 0_u32 {
        Some(PrimeFactor {
            prime: divisor,
            exponent,
        })
    } else {
        None
    }
}

/// Iterate over the prime factors of a given number.
///
/// This is an implementation of https://www.geeksforgeeks.org/print-all-prime-factors-of-a-given-number/
pub fn iter_prime_factors(mut value: u32) -> impl Iterator<Item = PrimeFactor> {
    [2_u32]
        .into_iter()
        .chain((3_u32..=value / 2_u32).step_by(2_usize))
        .chain([value])
        .filter_map(move |divisor| try_get_prime_factor(&mut value, divisor))
}

/// Fold the prime factorizations of `values` together, keeping the largest exponent seen for each
/// prime, then expand the product back out: the least common multiple.
pub fn least_common_multiple<I: Iterator<Item = u32>>(values: I) -> u64 {
    let mut prime_to_exponent: BTreeMap<u32, u32> = BTreeMap::new();

    for value in values {
        for PrimeFactor { prime, exponent } in iter_prime_factors(value) {
            let merged_exponent: &mut u32 = prime_to_exponent.entry(prime).or_default();

            *merged_exponent = (*merged_exponent).max(exponent);
        }
    }

    prime_to_exponent
        .into_iter()
        .map(|(prime, exponent)| (prime as u64).pow(exponent))
        .product()
}

#[macro_export]
macro_rules! define_cell {
    {
        #[repr(u8)]
        $(#[$attr:meta])*
        $pub:vis enum $cell:ident { $(
            $(#[$variant_attr:meta])*
            $variant:ident = $variant_const:ident = $variant_u8:expr
        ),* $(,)? }
    } => {
        #[repr(u8)]
        $(#[$attr])*
        $pub enum $cell { $(
            $(#[$variant_attr])*
            $variant = Self::$variant_const,
        )* }

        impl $cell {
            $(
                const $variant_const: u8 = $variant_u8;
            )*
            const STR: &'static str =
                // SAFETY: Trivial
                unsafe { ::std::str::from_utf8_unchecked(&[$(
                    $cell::$variant_const,
                )*]) };
        }

        unsafe impl IsValidAscii for $cell {}

        impl Parse for $cell {
            fn parse<'i>(input: &'i str) -> ::nom::IResult<&'i str, Self> {
                ::nom::combinator::map(
                    ::nom::character::complete::one_of($cell::STR),
                    |value: char| { $cell::try_from(value).unwrap() }
                )(input)
            }
        }

        impl TryFrom<u8> for $cell {
            type Error = ();

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $(
                        Self::$variant_const => Ok(Self::$variant),
                    )*
                    _ => Err(()),
                }
            }
        }

        impl TryFrom<char> for $cell {
            type Error = ();

            fn try_from(value: char) -> Result<Self, Self::Error> {
                (value as u8).try_into()
            }
        }
    }
}

define_cell! {
    #[repr(u8)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Pixel {
        #[default]
        Dark = DARK = b'.',
        Light = LIGHT = b'#',
    }
}

impl Pixel {
    pub fn is_light(self) -> bool {
        matches!(self, Self::Light)
    }
}

impl From<bool> for Pixel {
    fn from(value: bool) -> Self {
        if value {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

impl From<Pixel> for bool {
    fn from(value: Pixel) -> Self {
        value.is_light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_prime_factors() {
        assert_eq!(
            iter_prime_factors(12_u32).collect::<Vec<PrimeFactor>>(),
            vec![
                PrimeFactor {
                    prime: 2_u32,
                    exponent: 2_u32
                },
                PrimeFactor {
                    prime: 3_u32,
                    exponent: 1_u32
                },
            ]
        );
        assert_eq!(
            iter_prime_factors(315_u32).collect::<Vec<PrimeFactor>>(),
            vec![
                PrimeFactor {
                    prime: 3_u32,
                    exponent: 2_u32
                },
                PrimeFactor {
                    prime: 5_u32,
                    exponent: 1_u32
                },
                PrimeFactor {
                    prime: 7_u32,
                    exponent: 1_u32
                },
            ]
        );
        assert_eq!(
            iter_prime_factors(41_u32).collect::<Vec<PrimeFactor>>(),
            vec![PrimeFactor {
                prime: 41_u32,
                exponent: 1_u32
            }]
        );
    }

    #[test]
    fn test_least_common_multiple() {
        assert_eq!(least_common_multiple([2_u32, 3_u32].into_iter()), 6_u64);
        assert_eq!(least_common_multiple([4_u32, 6_u32].into_iter()), 12_u64);
        assert_eq!(least_common_multiple([7_u32].into_iter()), 7_u64);
    }
}
