use stickshift::{InputState, sim::consts::DEFAULT_TICK_RATE};

#[derive(Clone, Debug)]
pub struct ControlSeq {
    inputs: Vec<InputState>,
}

impl ControlSeq {
    pub const fn new() -> Self {
        Self { inputs: Vec::new() }
    }

    pub fn input_at_tick(&self, tick: usize) -> InputState {
        match self.inputs.get(tick) {
            Some(input) => *input,
            None => self
                .inputs
                .last()
                .map_or(InputState::DEFAULT, |last| last.without_triggers()),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Holds `input` for `seconds` at the default tick rate
    pub fn add(self, input: InputState, seconds: f32) -> Self {
        let ticks = (seconds * f32::from(DEFAULT_TICK_RATE)).round() as usize;
        self.add_ticks(input, ticks)
    }

    pub fn add_ticks(mut self, input: InputState, ticks: usize) -> Self {
        assert!(ticks > 0);
        self.inputs.extend(std::iter::repeat_n(input, ticks));
        self
    }

    /// Appends `ticks` inputs built from the tick index within the block, for ramps
    pub fn add_with(mut self, ticks: usize, make: impl Fn(usize) -> InputState) -> Self {
        assert!(ticks > 0);
        self.inputs.extend((0..ticks).map(make));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputState> {
        self.inputs.iter()
    }
}
