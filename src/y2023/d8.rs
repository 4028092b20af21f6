use {
    crate::*,
    nom::{
        bytes::complete::{tag, take_while_m_n},
        character::complete::{line_ending, one_of},
        combinator::{map, map_opt, opt},
        error::Error,
        multi::many1,
        sequence::{delimited, separated_pair, terminated, tuple},
        Err, IResult,
    },
    std::collections::HashMap,
};

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone, Copy)]
enum Instruction {
    Left,
    Right,
}

impl Parse for Instruction {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(one_of("LR"), |c| {
            if c == 'L' {
                Self::Left
            } else {
                Self::Right
            }
        })(input)
    }
}

#[cfg_attr(test, derive(Debug))]
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
struct Label([u8; Self::LEN]);

impl Label {
    const LEN: usize = 3_usize;
    const START: Self = Self(*b"AAA");
    const END: Self = Self(*b"ZZZ");

    fn last_byte(self) -> u8 {
        self.0[Self::LEN - 1_usize]
    }

    fn is_ghost_start(self) -> bool {
        self.last_byte() == b'A'
    }

    fn is_ghost_end(self) -> bool {
        self.last_byte() == b'Z'
    }
}

impl Parse for Label {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            take_while_m_n(Self::LEN, Self::LEN, |c: char| c.is_ascii_alphanumeric()),
            |label: &str| {
                let mut bytes: [u8; Self::LEN] = Default::default();

                bytes.copy_from_slice(label.as_bytes());

                Self(bytes)
            },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct Node {
    label: Label,
    left: usize,
    right: usize,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    instructions: Vec<Instruction>,
    nodes: Vec<Node>,
}

impl Solution {
    fn index_of(&self, label: Label) -> Option<usize> {
        self.nodes.iter().position(|node| node.label == label)
    }

    /// Steps from `start` until `is_end` holds, following the instruction list cyclically
    fn steps_until<F: Fn(Label) -> bool>(&self, start: usize, is_end: F) -> u32 {
        let mut index: usize = start;
        let mut steps: u32 = 0_u32;

        while !is_end(self.nodes[index].label) {
            let node: &Node = &self.nodes[index];

            index = match self.instructions[steps as usize % self.instructions.len()] {
                Instruction::Left => node.left,
                Instruction::Right => node.right,
            };
            steps += 1_u32;
        }

        steps
    }

    fn steps_to_end(&self) -> u32 {
        self.steps_until(self.index_of(Label::START).unwrap(), |label| {
            label == Label::END
        })
    }

    /// Every ghost walk settles into a cycle whose length equals its distance to the first
    /// `..Z` node, so the walks all line up at the least common multiple of those distances
    fn ghost_steps_to_end(&self) -> u64 {
        least_common_multiple(
            self.nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.label.is_ghost_start())
                .map(|(index, _)| self.steps_until(index, Label::is_ghost_end)),
        )
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        let (input, instructions): (&str, Vec<Instruction>) = terminated(
            many1(Instruction::parse),
            tuple((line_ending, line_ending)),
        )(input)?;

        map_opt(
            many1(terminated(
                separated_pair(
                    Label::parse,
                    tag(" = "),
                    delimited(
                        tag("("),
                        separated_pair(Label::parse, tag(", "), Label::parse),
                        tag(")"),
                    ),
                ),
                opt(line_ending),
            )),
            move |labeled_pairs: Vec<(Label, (Label, Label))>| {
                let label_to_index: HashMap<Label, usize> = labeled_pairs
                    .iter()
                    .enumerate()
                    .map(|(index, (label, _))| (*label, index))
                    .collect();

                let nodes: Vec<Node> = labeled_pairs
                    .iter()
                    .map(|(label, (left, right))| {
                        Some(Node {
                            label: *label,
                            left: *label_to_index.get(left)?,
                            right: *label_to_index.get(right)?,
                        })
                    })
                    .collect::<Option<Vec<Node>>>()?;

                Some(Self {
                    instructions: instructions.clone(),
                    nodes,
                })
            },
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.steps_to_end());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.ghost_steps_to_end());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
