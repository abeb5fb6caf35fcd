//! Compact input recordings that can be re-simulated bit for bit

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec2;

use crate::{
    error::ReplayError,
    sim::{
        CarConfig, EnvironmentConfig, InputState, PedalNudge, PhysicsState, SteerNudge, Triggers,
        Vehicle, consts::DEFAULT_TICK_RATE,
    },
};

pub const REPLAY_MAGIC: [u8; 4] = *b"SSRP";
pub const REPLAY_VERSION: u16 = 1;

const MIN_TICK_RATE: u8 = 15;
const MAX_TICK_RATE: u8 = 240;
/// Upper bound on the up-front allocation for a stream's tick list
const MAX_PREALLOC_TICKS: usize = 60 * 60 * 60;

mod flags {
    pub const THROTTLE: u32 = 1 << 0;
    pub const BRAKE: u32 = 1 << 1;
    pub const CLUTCH: u32 = 1 << 2;
    pub const HANDBRAKE: u32 = 1 << 3;
    pub const LEFT: u32 = 1 << 4;
    pub const RIGHT: u32 = 1 << 5;

    pub const THROTTLE_ANALOG: u32 = 1 << 6;
    pub const BRAKE_ANALOG: u32 = 1 << 7;
    pub const CLUTCH_ANALOG: u32 = 1 << 8;
    pub const HANDBRAKE_ANALOG: u32 = 1 << 9;
    pub const STEERING_ANALOG: u32 = 1 << 10;

    // four bits each, in field order
    pub const VIRTUAL_THROTTLE_SHIFT: u32 = 11;
    pub const VIRTUAL_BRAKE_SHIFT: u32 = 15;
    pub const VIRTUAL_CLUTCH_SHIFT: u32 = 19;
    pub const VIRTUAL_STEERING_SHIFT: u32 = 23;

    pub const TOGGLE_ENGINE: u32 = 1 << 27;
    pub const SHIFT_UP: u32 = 1 << 28;
    pub const SHIFT_DOWN: u32 = 1 << 29;
    pub const RESET: u32 = 1 << 30;
    pub const TOGGLE_HANDBRAKE: u32 = 1 << 31;
}

fn check_tick_rate(tick_rate: u8) -> Result<u8, ReplayError> {
    if (MIN_TICK_RATE..=MAX_TICK_RATE).contains(&tick_rate) {
        Ok(tick_rate)
    } else {
        Err(ReplayError::InvalidTickRate(tick_rate))
    }
}

fn tick_count_field(len: usize) -> Result<u32, ReplayError> {
    u32::try_from(len).map_err(|_| ReplayError::TooLong(len))
}

fn bit(set: bool, flag: u32) -> u32 {
    if set { flag } else { 0 }
}

fn nibble(bits: [bool; 4], shift: u32) -> u32 {
    bits.into_iter()
        .enumerate()
        .fold(0, |acc, (i, set)| acc | bit(set, 1 << i)) << shift
}

fn unpack_nibble(word: u32, shift: u32) -> [bool; 4] {
    std::array::from_fn(|i| (word >> shift) & (1 << i) != 0)
}

trait ReplayCodec: Sized {
    fn write_to<W: Write>(&self, out: &mut W) -> Result<(), ReplayError>;
    fn read_from<R: Read>(bytes: &mut R) -> Result<Self, ReplayError>;
}

impl ReplayCodec for InputState {
    fn write_to<W: Write>(&self, out: &mut W) -> Result<(), ReplayError> {
        let analogs = [
            (self.throttle_analog, flags::THROTTLE_ANALOG),
            (self.brake_analog, flags::BRAKE_ANALOG),
            (self.clutch_analog, flags::CLUTCH_ANALOG),
            (self.handbrake_analog, flags::HANDBRAKE_ANALOG),
            (self.steering_analog, flags::STEERING_ANALOG),
        ];

        let pedal_bits = |n: PedalNudge| [n.increase, n.decrease, n.set_full, n.set_zero];
        let steer = self.virtual_steering;
        let triggers = self.triggers;

        let mut word = bit(self.throttle, flags::THROTTLE)
            | bit(self.brake, flags::BRAKE)
            | bit(self.clutch, flags::CLUTCH)
            | bit(self.handbrake, flags::HANDBRAKE)
            | bit(self.left, flags::LEFT)
            | bit(self.right, flags::RIGHT)
            | nibble(pedal_bits(self.virtual_throttle), flags::VIRTUAL_THROTTLE_SHIFT)
            | nibble(pedal_bits(self.virtual_brake), flags::VIRTUAL_BRAKE_SHIFT)
            | nibble(pedal_bits(self.virtual_clutch), flags::VIRTUAL_CLUTCH_SHIFT)
            | nibble(
                [steer.left, steer.right, steer.full_left, steer.full_right],
                flags::VIRTUAL_STEERING_SHIFT,
            )
            | bit(triggers.toggle_engine, flags::TOGGLE_ENGINE)
            | bit(triggers.shift_up, flags::SHIFT_UP)
            | bit(triggers.shift_down, flags::SHIFT_DOWN)
            | bit(triggers.reset, flags::RESET)
            | bit(triggers.toggle_handbrake, flags::TOGGLE_HANDBRAKE);

        for (value, flag) in analogs {
            word |= bit(value.is_some(), flag);
        }

        out.write_u32::<LittleEndian>(word)?;
        for value in analogs.into_iter().filter_map(|(value, _)| value) {
            out.write_f32::<LittleEndian>(value)?;
        }

        Ok(())
    }

    fn read_from<R: Read>(bytes: &mut R) -> Result<Self, ReplayError> {
        let word = bytes.read_u32::<LittleEndian>()?;
        let mut analog = |flag: u32| -> Result<Option<f32>, ReplayError> {
            if word & flag == 0 {
                Ok(None)
            } else {
                Ok(Some(bytes.read_f32::<LittleEndian>()?))
            }
        };

        let throttle_analog = analog(flags::THROTTLE_ANALOG)?;
        let brake_analog = analog(flags::BRAKE_ANALOG)?;
        let clutch_analog = analog(flags::CLUTCH_ANALOG)?;
        let handbrake_analog = analog(flags::HANDBRAKE_ANALOG)?;
        let steering_analog = analog(flags::STEERING_ANALOG)?;

        let pedal = |shift: u32| {
            let [increase, decrease, set_full, set_zero] = unpack_nibble(word, shift);
            PedalNudge {
                increase,
                decrease,
                set_full,
                set_zero,
            }
        };
        let [left, right, full_left, full_right] =
            unpack_nibble(word, flags::VIRTUAL_STEERING_SHIFT);

        Ok(Self {
            throttle: word & flags::THROTTLE != 0,
            brake: word & flags::BRAKE != 0,
            clutch: word & flags::CLUTCH != 0,
            handbrake: word & flags::HANDBRAKE != 0,
            left: word & flags::LEFT != 0,
            right: word & flags::RIGHT != 0,
            throttle_analog,
            brake_analog,
            clutch_analog,
            handbrake_analog,
            steering_analog,
            virtual_throttle: pedal(flags::VIRTUAL_THROTTLE_SHIFT),
            virtual_brake: pedal(flags::VIRTUAL_BRAKE_SHIFT),
            virtual_clutch: pedal(flags::VIRTUAL_CLUTCH_SHIFT),
            virtual_steering: SteerNudge {
                left,
                right,
                full_left,
                full_right,
            },
            triggers: Triggers {
                toggle_engine: word & flags::TOGGLE_ENGINE != 0,
                shift_up: word & flags::SHIFT_UP != 0,
                shift_down: word & flags::SHIFT_DOWN != 0,
                reset: word & flags::RESET != 0,
                toggle_handbrake: word & flags::TOGGLE_HANDBRAKE != 0,
            },
        })
    }
}

/// Start pose plus one input per tick
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    pub tick_rate: u8,
    pub start_position: Vec2,
    pub start_heading: f32,
    pub inputs: Vec<InputState>,
}

impl Default for Replay {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE, Vec2::ZERO, 0.0)
    }
}

impl Replay {
    #[must_use]
    pub const fn new(tick_rate: u8, start_position: Vec2, start_heading: f32) -> Self {
        Self {
            tick_rate,
            start_position,
            start_heading,
            inputs: Vec::new(),
        }
    }

    pub fn push(&mut self, input: InputState) {
        self.inputs.push(input);
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.inputs.len() as f32 / f32::from(self.tick_rate)
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), ReplayError> {
        let tick_rate = check_tick_rate(self.tick_rate)?;
        let num_ticks = tick_count_field(self.inputs.len())?;

        out.write_all(&REPLAY_MAGIC)?;
        out.write_u16::<LittleEndian>(REPLAY_VERSION)?;
        out.write_u8(tick_rate)?;
        out.write_f32::<LittleEndian>(self.start_position.x)?;
        out.write_f32::<LittleEndian>(self.start_position.y)?;
        out.write_f32::<LittleEndian>(self.start_heading)?;
        out.write_u32::<LittleEndian>(num_ticks)?;

        for input in &self.inputs {
            input.write_to(out)?;
        }

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_from<R: Read>(bytes: &mut R) -> Result<Self, ReplayError> {
        let mut magic = [0; 4];
        bytes.read_exact(&mut magic)?;
        if magic != REPLAY_MAGIC {
            return Err(ReplayError::BadMagic(magic));
        }

        let version = bytes.read_u16::<LittleEndian>()?;
        if version != REPLAY_VERSION {
            return Err(ReplayError::UnsupportedVersion(version));
        }

        let tick_rate = check_tick_rate(bytes.read_u8()?)?;

        let start_position = Vec2::new(
            bytes.read_f32::<LittleEndian>()?,
            bytes.read_f32::<LittleEndian>()?,
        );
        let start_heading = bytes.read_f32::<LittleEndian>()?;

        let num_ticks = bytes.read_u32::<LittleEndian>()? as usize;
        let mut inputs = Vec::with_capacity(num_ticks.min(MAX_PREALLOC_TICKS));
        for _ in 0..num_ticks {
            inputs.push(InputState::read_from(bytes)?);
        }

        Ok(Self {
            tick_rate,
            start_position,
            start_heading,
            inputs,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        Self::read_from(&mut Cursor::new(bytes))
    }

    /// Re-simulates the recording, returning the state after every tick
    pub fn run(
        &self,
        config: CarConfig,
        env: EnvironmentConfig,
    ) -> Result<Vec<PhysicsState>, ReplayError> {
        let tick_rate = check_tick_rate(self.tick_rate)?;
        let start = PhysicsState::spawn(self.start_position, self.start_heading);
        let mut vehicle = Vehicle::with_tick_rate(config, env, start, tick_rate);

        Ok(self
            .inputs
            .iter()
            .map(|input| {
                vehicle.step(input);
                vehicle.state
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Replay {
        let mut replay = Replay::new(60, Vec2::new(3.0, -7.5), 0.25);
        replay.push(InputState {
            triggers: Triggers {
                toggle_engine: true,
                ..Triggers::NONE
            },
            ..InputState::DEFAULT
        });
        replay.push(InputState {
            throttle: true,
            steering_analog: Some(-0.4),
            clutch_analog: Some(0.75),
            virtual_brake: PedalNudge {
                decrease: true,
                ..PedalNudge::NONE
            },
            virtual_steering: SteerNudge {
                full_right: true,
                ..SteerNudge::NONE
            },
            ..InputState::DEFAULT
        });
        replay.push(InputState {
            triggers: Triggers {
                toggle_handbrake: true,
                shift_down: true,
                ..Triggers::NONE
            },
            ..InputState::DEFAULT
        });
        replay
    }

    #[test]
    fn stream_layout() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"SSRP");
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), REPLAY_VERSION);
        // header, three flag words and two present analog values
        assert_eq!(bytes.len(), 4 + 2 + 1 + 12 + 4 + 3 * 4 + 2 * 4);
    }

    #[test]
    fn decodes_what_it_encodes() {
        let replay = sample();
        assert_eq!(Replay::from_bytes(&replay.to_bytes().unwrap()).unwrap(), replay);
    }

    #[test]
    fn rejects_foreign_streams() {
        assert!(matches!(
            Replay::from_bytes(b"RIFF\x01\x00"),
            Err(ReplayError::BadMagic(magic)) if &magic == b"RIFF"
        ));

        let mut bytes = sample().to_bytes().unwrap();
        bytes[4] = 9;
        assert!(matches!(
            Replay::from_bytes(&bytes),
            Err(ReplayError::UnsupportedVersion(9))
        ));

        let mut bytes = sample().to_bytes().unwrap();
        bytes[6] = 3;
        assert!(matches!(
            Replay::from_bytes(&bytes),
            Err(ReplayError::InvalidTickRate(3))
        ));
    }

    #[test]
    fn truncated_stream_is_reported() {
        let bytes = sample().to_bytes().unwrap();
        assert!(matches!(
            Replay::from_bytes(&bytes[..bytes.len() - 3]),
            Err(ReplayError::Truncated)
        ));
    }

    #[test]
    fn run_starts_from_recorded_pose() {
        let replay = sample();
        let states = replay
            .run(CarConfig::CIVILIAN, EnvironmentConfig::FLAT)
            .unwrap();
        assert_eq!(states.len(), 3);
        assert!(states[0].engine_on);
        assert!((states[0].heading - 0.25).abs() < 1e-6);
        assert!(states.iter().all(|s| s.position.distance(replay.start_position) < 0.1));
    }

    #[test]
    fn out_of_range_tick_rate_is_an_error() {
        let mut replay = sample();
        replay.tick_rate = 10;

        assert!(matches!(
            replay.run(CarConfig::CIVILIAN, EnvironmentConfig::FLAT),
            Err(ReplayError::InvalidTickRate(10))
        ));
        assert!(matches!(
            replay.to_bytes(),
            Err(ReplayError::InvalidTickRate(10))
        ));

        replay.tick_rate = 241;
        assert!(replay.run(CarConfig::CIVILIAN, EnvironmentConfig::FLAT).is_err());
    }

    #[test]
    fn tick_counter_overflow_is_an_error() {
        assert_eq!(tick_count_field(3).unwrap(), 3);
        assert_eq!(tick_count_field(u32::MAX as usize).unwrap(), u32::MAX);

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            tick_count_field(u32::MAX as usize + 1),
            Err(ReplayError::TooLong(_))
        ));
    }
}
