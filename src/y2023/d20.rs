use {
    crate::*,
    nom::{combinator::map, error::Error, Err, IResult},
};

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(PulseNetwork);

impl Solution {
    const WARMUP_BUTTON_PRESSES: usize = 1000_usize;
    const RECEIVER_ID: &'static str = "rx";

    fn warmup_counts(&self) -> PulseCounts {
        let mut state: NetworkState = self.0.fresh_state();

        self.0.press_many(&mut state, Self::WARMUP_BUTTON_PRESSES);

        state.counts()
    }

    fn warmup_pulse_count_product(&self) -> u64 {
        self.warmup_counts().product()
    }

    fn button_presses_until_machine_turns_on(&self) -> Option<usize> {
        self.0.presses_until_delivery(
            &mut self.0.fresh_state(),
            PulseLevel::Low,
            Self::RECEIVER_ID,
        )
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(PulseNetwork::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            let counts: PulseCounts = self.warmup_counts();

            dbg!(&counts);
            dbg!(counts.product());
        } else {
            dbg!(self.warmup_pulse_count_product());
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            print!("{}", self.0.configuration_string());
        }

        dbg!(self.button_presses_until_machine_turns_on());
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
        broadcaster -> a, b, c\n\
        %a -> b\n\
        %b -> c\n\
        %c -> inv\n\
        &inv -> a\n",
        "\
        broadcaster -> a\n\
        %a -> inv, con\n\
        &inv -> b\n\
        %b -> con\n\
        &con -> output\n",
    ];

    fn solution(index: usize) -> Solution {
        Solution::try_from(SOLUTION_STRS[index]).unwrap()
    }

    #[test]
    fn test_try_from_str_round_trips() {
        for (index, solution_str) in SOLUTION_STRS.iter().copied().enumerate() {
            assert_eq!(
                solution(index).0.configuration_string(),
                solution_str.to_owned()
            );
        }
    }

    #[test]
    fn test_warmup_pulse_count_product() {
        assert_eq!(solution(0_usize).warmup_pulse_count_product(), 32000000_u64);
        assert_eq!(solution(1_usize).warmup_pulse_count_product(), 11687500_u64);
    }

    #[test]
    fn test_warmup_counts_are_reproducible() {
        let solution: Solution = solution(0_usize);

        assert_eq!(solution.warmup_counts(), solution.warmup_counts());
    }
}
