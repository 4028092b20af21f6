use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::{tag, take_while1},
        combinator::{map, opt},
        error::Error,
        multi::many1,
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
};

/// The holiday ASCII string helper: fold each byte in as `(acc + byte) * 17 % 256`
fn hash(string: &str) -> u8 {
    string.bytes().fold(0_u8, |acc, byte| {
        acc.wrapping_add(byte).wrapping_mul(17_u8)
    })
}

#[cfg_attr(test, derive(Debug, PartialEq))]
enum Operation {
    Remove,
    Insert(u8),
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Step {
    label: String,
    operation: Operation,
}

impl Step {
    fn full_hash(&self) -> u8 {
        let operation_str: String = match self.operation {
            Operation::Remove => "-".into(),
            Operation::Insert(focal_len) => format!("={focal_len}"),
        };

        hash(&format!("{}{operation_str}", self.label))
    }
}

impl Parse for Step {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                take_while1(|c: char| c.is_ascii_lowercase()),
                alt((
                    map(tag("-"), |_| Operation::Remove),
                    map(preceded(tag("="), parse_integer::<u8>), Operation::Insert),
                )),
            )),
            |(label, operation): (&str, Operation)| Self {
                label: label.into(),
                operation,
            },
        )(input)
    }
}

#[derive(Clone, Default)]
struct LensBox(Vec<(String, u8)>);

impl LensBox {
    fn remove(&mut self, label: &str) {
        self.0.retain(|(lens_label, _)| lens_label.as_str() != label);
    }

    fn insert(&mut self, label: &str, focal_len: u8) {
        match self
            .0
            .iter_mut()
            .find(|(lens_label, _)| lens_label.as_str() == label)
        {
            Some((_, lens_focal_len)) => *lens_focal_len = focal_len,
            None => self.0.push((label.into(), focal_len)),
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Step>);

impl Solution {
    const BOX_COUNT: usize = u8::MAX as usize + 1_usize;

    fn full_hash_sum(&self) -> u32 {
        self.0.iter().map(|step| step.full_hash() as u32).sum()
    }

    fn lens_boxes(&self) -> Vec<LensBox> {
        let mut lens_boxes: Vec<LensBox> = vec![LensBox::default(); Self::BOX_COUNT];

        for step in self.0.iter() {
            let lens_box: &mut LensBox = &mut lens_boxes[hash(&step.label) as usize];

            match step.operation {
                Operation::Remove => lens_box.remove(&step.label),
                Operation::Insert(focal_len) => lens_box.insert(&step.label, focal_len),
            }
        }

        lens_boxes
    }

    fn focusing_power(&self) -> u32 {
        self.lens_boxes()
            .into_iter()
            .enumerate()
            .flat_map(|(box_index, lens_box)| {
                lens_box
                    .0
                    .into_iter()
                    .enumerate()
                    .map(move |(lens_index, (_, focal_len))| {
                        (box_index as u32 + 1_u32)
                            * (lens_index as u32 + 1_u32)
                            * focal_len as u32
                    })
            })
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many1(terminated(Step::parse, opt(tag(",")))), Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.full_hash_sum());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.focusing_power());
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

    const SOLUTION_STR: &'static str =
        "rn=1,cm-,qp=3,cm=2,qp-,pc=4,ot=9,ab=5,pc-,pc=6,ot=7";

    #[test]
    fn test_hash() {
        assert_eq!(hash("HASH"), 52_u8);
        assert_eq!(hash("rn"), 0_u8);
        assert_eq!(hash("qp"), 1_u8);
    }

    #[test]
    fn test_try_from_str() {
        let solution: Solution = Solution::try_from(SOLUTION_STR).unwrap();

        assert_eq!(solution.0.len(), 11_usize);
        assert_eq!(
            solution.0.first(),
            Some(&Step {
                label: "rn".into(),
                operation: Operation::Insert(1_u8),
            })
        );
    }

    #[test]
    fn test_full_hash_sum() {
        assert_eq!(
            Solution::try_from(SOLUTION_STR).unwrap().full_hash_sum(),
            1320_u32
        );
    }

    #[test]
    fn test_focusing_power() {
        assert_eq!(
            Solution::try_from(SOLUTION_STR).unwrap().focusing_power(),
            145_u32
        );
    }
}
