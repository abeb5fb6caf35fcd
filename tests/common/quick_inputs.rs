use stickshift::{InputState, sim::Triggers};

pub const IDLE: InputState = InputState::DEFAULT;

pub fn pedals(throttle: f32, brake: f32, clutch: f32) -> InputState {
    InputState {
        throttle_analog: Some(throttle),
        brake_analog: Some(brake),
        clutch_analog: Some(clutch),
        ..InputState::DEFAULT
    }
}

pub fn steer(steering: f32) -> InputState {
    InputState {
        steering_analog: Some(steering),
        ..InputState::DEFAULT
    }
}

pub fn trigger(triggers: Triggers) -> InputState {
    InputState {
        triggers,
        ..InputState::DEFAULT
    }
}

pub const TOGGLE_ENGINE: Triggers = Triggers {
    toggle_engine: true,
    ..Triggers::NONE
};

pub const SHIFT_UP: Triggers = Triggers {
    shift_up: true,
    ..Triggers::NONE
};

pub const SHIFT_DOWN: Triggers = Triggers {
    shift_down: true,
    ..Triggers::NONE
};
