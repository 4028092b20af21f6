use {
    super::Parse,
    bitvec::prelude::*,
    nom::{
        branch::alt,
        bytes::complete::{tag, take_while1},
        character::complete::line_ending,
        combinator::{map, map_opt, opt},
        multi::{many1, separated_list1},
        sequence::{preceded, terminated, tuple},
        IResult,
    },
    std::{
        collections::{HashMap, VecDeque},
        fmt::Write,
        ops::Range,
    },
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PulseLevel {
    Low,
    High,
}

impl PulseLevel {
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// Re-emits whatever level it receives to every output
    PassThrough,

    /// Binary latch: ignores high, flips on low and emits the new latch level
    Toggle,

    /// Remembers the last level per input; emits low iff every remembered level is high
    Gate,
}

/// One node of the network: identity, variant, and ordered input/output adjacency (indices into
/// `PulseNetwork::nodes`). A `kind` of `None` marks an id that was referenced but never declared:
/// a terminal sink, whose deliveries are counted and go no further.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct PulseNode {
    id: String,
    kind: Option<NodeKind>,
    outputs: Vec<u8>,
    inputs: Vec<u8>,
}

impl PulseNode {
    fn state_bits_len(&self) -> usize {
        match self.kind {
            Some(NodeKind::Toggle) => 1_usize,
            Some(NodeKind::Gate) => self.inputs.len(),
            _ => 0_usize,
        }
    }
}

/// A single discrete signal in flight. Ephemeral: created and consumed within one button press.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PulseEvent {
    source: u8,
    destination: u8,
    level: PulseLevel,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PulseCounts {
    pub low: u64,
    pub high: u64,
}

impl PulseCounts {
    pub fn product(self) -> u64 {
        self.low * self.high
    }
}

/// All mutable simulation state, threaded explicitly through each press. The network itself stays
/// immutable, so independent runs from fresh states can't observe each other.
pub struct NetworkState {
    /// Per node, its slice of `bits`: one latch bit for a toggle, one remembered-level bit per
    /// input for a gate
    state_ranges: Vec<Range<usize>>,
    bits: BitVec,
    queue: VecDeque<PulseEvent>,
    counts: PulseCounts,
    presses: usize,
}

impl NetworkState {
    pub fn counts(&self) -> PulseCounts {
        self.counts
    }

    pub fn presses(&self) -> usize {
        self.presses
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct PulseNetwork {
    /// Declared nodes first, in declaration order, then the undeclared sinks
    nodes: Vec<PulseNode>,
    broadcast: u8,
}

impl PulseNetwork {
    /// Synthetic source index for the button, which is not a node
    const BUTTON: u8 = u8::MAX;
    pub const BROADCAST_ID: &'static str = "broadcaster";

    pub fn fresh_state(&self) -> NetworkState {
        let mut start: usize = 0_usize;
        let state_ranges: Vec<Range<usize>> = self
            .nodes
            .iter()
            .map(|node| {
                let end: usize = start + node.state_bits_len();
                let range: Range<usize> = start..end;

                start = end;

                range
            })
            .collect();

        NetworkState {
            state_ranges,
            bits: bitvec![0; start],
            queue: VecDeque::new(),
            counts: PulseCounts::default(),
            presses: 0_usize,
        }
    }

    fn index_of(&self, id: &str) -> Option<u8> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .map(|index| index as u8)
    }

    fn send(&self, state: &mut NetworkState, source: u8, level: PulseLevel) {
        for destination in self.nodes[source as usize].outputs.iter().copied() {
            state.queue.push_back(PulseEvent {
                source,
                destination,
                level,
            });
        }
    }

    /// Runs one button press to event exhaustion, strictly FIFO. If `watch` matches an event about
    /// to be delivered, stops there and returns `true`, leaving the remaining queue dropped.
    fn press_internal(&self, state: &mut NetworkState, watch: Option<(PulseLevel, u8)>) -> bool {
        state.presses += 1_usize;
        state.queue.clear();
        state.queue.push_back(PulseEvent {
            source: Self::BUTTON,
            destination: self.broadcast,
            level: PulseLevel::Low,
        });

        while let Some(event) = state.queue.pop_front() {
            if watch == Some((event.level, event.destination)) {
                state.queue.clear();

                return true;
            }

            if event.level.is_high() {
                state.counts.high += 1_u64;
            } else {
                state.counts.low += 1_u64;
            }

            let node: &PulseNode = &self.nodes[event.destination as usize];

            let out_level: Option<PulseLevel> = match node.kind {
                None => None,
                Some(NodeKind::PassThrough) => Some(event.level),
                Some(NodeKind::Toggle) => (!event.level.is_high()).then(|| {
                    let latch_index: usize = state.state_ranges[event.destination as usize].start;
                    let is_on: bool = !state.bits[latch_index];

                    state.bits.set(latch_index, is_on);

                    if is_on {
                        PulseLevel::High
                    } else {
                        PulseLevel::Low
                    }
                }),
                Some(NodeKind::Gate) => {
                    let memory_range: Range<usize> =
                        state.state_ranges[event.destination as usize].clone();
                    let input_index: usize = node
                        .inputs
                        .iter()
                        .position(|input| *input == event.source)
                        .unwrap();

                    state
                        .bits
                        .set(memory_range.start + input_index, event.level.is_high());

                    Some(if state.bits[memory_range].all() {
                        PulseLevel::Low
                    } else {
                        PulseLevel::High
                    })
                }
            };

            if let Some(out_level) = out_level {
                self.send(state, event.destination, out_level);
            }
        }

        false
    }

    pub fn press_button(&self, state: &mut NetworkState) {
        self.press_internal(state, None);
    }

    pub fn press_many(&self, state: &mut NetworkState, presses: usize) {
        for _ in 0_usize..presses {
            self.press_internal(state, None);
        }
    }

    /// Early-exit mode: presses the button repeatedly until a `level` event is about to be
    /// delivered to the node with id `destination`, and returns the press at which that happened.
    /// Returns `None` without pressing if no such id is known to the network.
    ///
    /// This loops as long as it takes; the caller vouches that the watched delivery is reachable.
    pub fn presses_until_delivery(
        &self,
        state: &mut NetworkState,
        level: PulseLevel,
        destination: &str,
    ) -> Option<usize> {
        let destination: u8 = self.index_of(destination)?;

        while !self.press_internal(state, Some((level, destination))) {}

        Some(state.presses)
    }

    /// Renders the network back into its textual configuration: declared nodes in declaration
    /// order, outputs in declaration order. Parsing the result reproduces the network.
    pub fn configuration_string(&self) -> String {
        let mut configuration: String = String::new();

        for node in self.nodes.iter().filter(|node| node.kind.is_some()) {
            match node.kind.unwrap() {
                NodeKind::PassThrough => {}
                NodeKind::Toggle => configuration.push('%'),
                NodeKind::Gate => configuration.push('&'),
            }

            write!(&mut configuration, "{} -> ", node.id).unwrap();

            for (index, output) in node.outputs.iter().copied().enumerate() {
                if index != 0_usize {
                    configuration.push_str(", ");
                }

                configuration.push_str(&self.nodes[output as usize].id);
            }

            configuration.push('\n');
        }

        configuration
    }
}

fn parse_id(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_lowercase())(input)
}

struct NodeLine<'i> {
    kind: NodeKind,
    id: &'i str,
    outputs: Vec<&'i str>,
}

impl<'i> NodeLine<'i> {
    fn parse(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                alt((
                    map(preceded(tag("%"), parse_id), |id| (NodeKind::Toggle, id)),
                    map(preceded(tag("&"), parse_id), |id| (NodeKind::Gate, id)),
                    map(parse_id, |id| (NodeKind::PassThrough, id)),
                )),
                tag(" -> "),
                separated_list1(tag(", "), parse_id),
            )),
            |((kind, id), _, outputs)| Self { kind, id, outputs },
        )(input)
    }
}

impl Parse for PulseNetwork {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_opt(
            many1(terminated(NodeLine::parse, opt(line_ending))),
            |lines| {
                let mut nodes: Vec<PulseNode> = lines
                    .iter()
                    .map(|line| PulseNode {
                        id: line.id.into(),
                        kind: Some(line.kind),
                        outputs: Vec::new(),
                        inputs: Vec::new(),
                    })
                    .collect();
                let mut id_to_index: HashMap<&str, u8> = lines
                    .iter()
                    .enumerate()
                    .map(|(index, line)| (line.id, index as u8))
                    .collect();

                // Two or more declarations sharing an id would leave the later ones unreachable
                if id_to_index.len() != nodes.len() {
                    return None;
                }

                for (node_index, line) in lines.iter().enumerate() {
                    for output_id in line.outputs.iter().copied() {
                        let output_index: u8 = match id_to_index.get(output_id) {
                            Some(output_index) => *output_index,
                            None => {
                                // Referenced but never declared: a terminal sink
                                let output_index: u8 = nodes.len() as u8;

                                nodes.push(PulseNode {
                                    id: output_id.into(),
                                    kind: None,
                                    outputs: Vec::new(),
                                    inputs: Vec::new(),
                                });
                                id_to_index.insert(output_id, output_index);

                                output_index
                            }
                        };

                        nodes[node_index].outputs.push(output_index);
                        nodes[output_index as usize].inputs.push(node_index as u8);
                    }
                }

                // `BUTTON` doubles as a sentinel index, so the table has to stay below it
                if nodes.len() >= Self::BUTTON as usize {
                    return None;
                }

                let broadcast: u8 = *id_to_index.get(Self::BROADCAST_ID)?;

                Some(Self { nodes, broadcast })
            },
        )(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK_STRS: &'static [&'static str] = &[
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

    fn network(index: usize) -> PulseNetwork {
        PulseNetwork::parse(NETWORK_STRS[index]).unwrap().1
    }

    #[test]
    fn test_parse() {
        let network: PulseNetwork = network(1_usize);

        assert_eq!(network.nodes.len(), 6_usize);
        assert_eq!(network.broadcast, 0_u8);
        assert_eq!(network.nodes[5_usize].id, "output");
        assert_eq!(network.nodes[5_usize].kind, None);
        assert_eq!(network.nodes[4_usize].inputs, vec![1_u8, 3_u8]);
    }

    #[test]
    fn test_configuration_string_round_trip() {
        for network_str in NETWORK_STRS.iter().copied() {
            let network: PulseNetwork = PulseNetwork::parse(network_str).unwrap().1;

            assert_eq!(network.configuration_string(), network_str);
            assert_eq!(
                PulseNetwork::parse(&network.configuration_string()).unwrap().1,
                network
            );
        }
    }

    #[test]
    fn test_press_many() {
        for (index, counts) in [
            PulseCounts {
                low: 8000_u64,
                high: 4000_u64,
            },
            PulseCounts {
                low: 4250_u64,
                high: 2750_u64,
            },
        ]
        .into_iter()
        .enumerate()
        {
            let network: PulseNetwork = network(index);
            let mut state: NetworkState = network.fresh_state();

            network.press_many(&mut state, 1000_usize);

            assert_eq!(state.counts(), counts);
        }
    }

    #[test]
    fn test_counts_are_deterministic() {
        let network: PulseNetwork = network(1_usize);
        let mut state_a: NetworkState = network.fresh_state();
        let mut state_b: NetworkState = network.fresh_state();

        network.press_many(&mut state_a, 1000_usize);
        network.press_many(&mut state_b, 1000_usize);

        assert_eq!(state_a.counts(), state_b.counts());
    }

    #[test]
    fn test_presses_until_delivery() {
        let network: PulseNetwork = network(1_usize);

        // `con` emits its first low to `output` within the first press, once both its inputs have
        // gone high
        assert_eq!(
            network.presses_until_delivery(
                &mut network.fresh_state(),
                PulseLevel::Low,
                "output"
            ),
            Some(1_usize)
        );

        // `inv` only goes high once `a` has turned back off, on the second press
        assert_eq!(
            network.presses_until_delivery(&mut network.fresh_state(), PulseLevel::High, "b"),
            Some(2_usize)
        );

        assert_eq!(
            network.presses_until_delivery(&mut network.fresh_state(), PulseLevel::Low, "missing"),
            None
        );
    }
}
