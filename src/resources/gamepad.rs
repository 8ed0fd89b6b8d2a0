//! Gamepad identifiers and polled input values.
//!
//! Identifiers are the plain component names reported by the platform input
//! layer (`"0"`..`"31"` for numbered buttons, `"x"`, `"rx"`, `"pov"` and so
//! on for axes). The full set lives in an immutable table built on first
//! use; [`component`] looks a name up in it.
//!
//! [`GamepadState`] holds the most recent poll values. The platform layer
//! writes it between ticks; simulation systems only read it.
//!
//! # Example
//!
//! ```ignore
//! let mut pad = GamepadState::default();
//! pad.set(xbox::LEFT_STICK_X, 0.8);
//! assert_eq!(pad.poll_data(xbox::LEFT_STICK_X), 0.8);
//! assert_eq!(pad.poll_data("not-a-component"), 0.0);
//! ```

use std::sync::LazyLock;

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Button,
    Axis,
}

/// One entry of the identifier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GamepadComponent {
    pub name: &'static str,
    pub kind: ComponentKind,
}

pub mod buttons {
    /// Numbered buttons `"0"` through `"31"`.
    pub const NUMBERED: [&str; 32] = [
        "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
        "16", "17", "18", "19", "20", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30",
        "31",
    ];

    // gamepad face and system buttons
    pub const A: &str = "A";
    pub const B: &str = "B";
    pub const C: &str = "C";
    pub const X: &str = "X";
    pub const Y: &str = "Y";
    pub const Z: &str = "Z";
    pub const START: &str = "Start";
    pub const SELECT: &str = "Select";
    pub const MODE: &str = "Mode";
    pub const LEFT_THUMB: &str = "Left Thumb";
    pub const LEFT_THUMB2: &str = "Left Thumb 2";
    pub const LEFT_THUMB3: &str = "Left Thumb 3";
    pub const RIGHT_THUMB: &str = "Right Thumb";
    pub const RIGHT_THUMB2: &str = "Right Thumb 2";
    pub const RIGHT_THUMB3: &str = "Right Thumb 3";

    // joystick buttons
    pub const TRIGGER: &str = "Trigger";
    pub const THUMB: &str = "Thumb";
    pub const THUMB2: &str = "Thumb 2";
    pub const TOP: &str = "Top";
    pub const TOP2: &str = "Top 2";
    pub const PINKIE: &str = "Pinkie";
    pub const BASE: &str = "Base";
    pub const BASE2: &str = "Base 2";
    pub const BASE3: &str = "Base 3";
    pub const BASE4: &str = "Base 4";
    pub const BASE5: &str = "Base 5";
    pub const BASE6: &str = "Base 6";

    pub(super) const NAMED: [&str; 27] = [
        A,
        B,
        C,
        X,
        Y,
        Z,
        START,
        SELECT,
        MODE,
        LEFT_THUMB,
        LEFT_THUMB2,
        LEFT_THUMB3,
        RIGHT_THUMB,
        RIGHT_THUMB2,
        RIGHT_THUMB3,
        TRIGGER,
        THUMB,
        THUMB2,
        TOP,
        TOP2,
        PINKIE,
        BASE,
        BASE2,
        BASE3,
        BASE4,
        BASE5,
        BASE6,
    ];
}

pub mod axis {
    pub const X: &str = "x";
    pub const X_ACCELERATION: &str = "x-acceleration";
    pub const X_FORCE: &str = "x-force";
    pub const X_VELOCITY: &str = "x-velocity";
    pub const Y: &str = "y";
    pub const Y_ACCELERATION: &str = "y-acceleration";
    pub const Y_FORCE: &str = "y-force";
    pub const Y_VELOCITY: &str = "y-velocity";
    pub const Z: &str = "z";
    pub const Z_ACCELERATION: &str = "z-acceleration";
    pub const Z_FORCE: &str = "z-force";
    pub const Z_VELOCITY: &str = "z-velocity";
    pub const RX: &str = "rx";
    pub const RX_ACCELERATION: &str = "rx-acceleration";
    pub const RX_FORCE: &str = "rx-force";
    pub const RX_VELOCITY: &str = "rx-velocity";
    pub const RY: &str = "ry";
    pub const RY_ACCELERATION: &str = "ry-acceleration";
    pub const RY_FORCE: &str = "ry-force";
    pub const RY_VELOCITY: &str = "ry-velocity";
    pub const RZ: &str = "rz";
    pub const RZ_ACCELERATION: &str = "rz-acceleration";
    pub const RZ_FORCE: &str = "rz-force";
    pub const RZ_VELOCITY: &str = "rz-velocity";
    pub const SLIDER: &str = "slider";
    pub const SLIDER_ACCELERATION: &str = "slider-acceleration";
    pub const SLIDER_FORCE: &str = "slider-force";
    pub const SLIDER_VELOCITY: &str = "slider-velocity";
    /// Hat switch; see [`dpad`](super::dpad) for its values.
    pub const POV: &str = "pov";

    pub(super) const ALL: [&str; 29] = [
        X,
        X_ACCELERATION,
        X_FORCE,
        X_VELOCITY,
        Y,
        Y_ACCELERATION,
        Y_FORCE,
        Y_VELOCITY,
        Z,
        Z_ACCELERATION,
        Z_FORCE,
        Z_VELOCITY,
        RX,
        RX_ACCELERATION,
        RX_FORCE,
        RX_VELOCITY,
        RY,
        RY_ACCELERATION,
        RY_FORCE,
        RY_VELOCITY,
        RZ,
        RZ_ACCELERATION,
        RZ_FORCE,
        RZ_VELOCITY,
        SLIDER,
        SLIDER_ACCELERATION,
        SLIDER_FORCE,
        SLIDER_VELOCITY,
        POV,
    ];
}

/// Xbox controller layout expressed in table identifiers.
pub mod xbox {
    use super::{axis, buttons};

    pub const A: &str = buttons::NUMBERED[0];
    pub const B: &str = buttons::NUMBERED[1];
    pub const X: &str = buttons::NUMBERED[2];
    pub const Y: &str = buttons::NUMBERED[3];
    pub const LB: &str = buttons::NUMBERED[4];
    pub const RB: &str = buttons::NUMBERED[5];
    pub const SELECT: &str = buttons::NUMBERED[6];
    pub const START: &str = buttons::NUMBERED[7];
    pub const LEFT_STICK_PRESS: &str = buttons::NUMBERED[8];
    pub const RIGHT_STICK_PRESS: &str = buttons::NUMBERED[9];
    /// Both triggers share one axis: LT reads 0..1, RT reads -1..0.
    pub const LT: &str = axis::Z;
    pub const RT: &str = axis::Z;
    pub const LEFT_STICK_X: &str = axis::X;
    pub const LEFT_STICK_Y: &str = axis::Y;
    pub const RIGHT_STICK_X: &str = axis::RX;
    pub const RIGHT_STICK_Y: &str = axis::RY;
    pub const DPAD: &str = axis::POV;
}

/// Hat switch values reported on [`axis::POV`].
pub mod dpad {
    pub const OFF: f32 = 0.0;
    pub const CENTER: f32 = OFF;
    pub const UP_LEFT: f32 = 0.125;
    pub const UP: f32 = 0.25;
    pub const UP_RIGHT: f32 = 0.375;
    pub const RIGHT: f32 = 0.5;
    pub const DOWN_RIGHT: f32 = 0.625;
    pub const DOWN: f32 = 0.75;
    pub const DOWN_LEFT: f32 = 0.875;
    pub const LEFT: f32 = 1.0;

    /// Unit-grid direction for a hat value, y pointing down. Unknown values
    /// map to zero.
    pub fn direction(value: f32) -> glam::Vec2 {
        const HALF_STEP: f32 = 0.0625;
        let table = [
            (UP_LEFT, (-1.0, -1.0)),
            (UP, (0.0, -1.0)),
            (UP_RIGHT, (1.0, -1.0)),
            (RIGHT, (1.0, 0.0)),
            (DOWN_RIGHT, (1.0, 1.0)),
            (DOWN, (0.0, 1.0)),
            (DOWN_LEFT, (-1.0, 1.0)),
            (LEFT, (-1.0, 0.0)),
        ];
        table
            .iter()
            .find(|(hat, _)| (value - hat).abs() < HALF_STEP)
            .map(|&(_, (x, y))| glam::Vec2::new(x, y))
            .unwrap_or(glam::Vec2::ZERO)
    }
}

static COMPONENTS: LazyLock<FxHashMap<&'static str, GamepadComponent>> = LazyLock::new(|| {
    let buttons = buttons::NUMBERED
        .iter()
        .chain(buttons::NAMED.iter())
        .map(|&name| (name, ComponentKind::Button));
    let axes = axis::ALL.iter().map(|&name| (name, ComponentKind::Axis));
    buttons
        .chain(axes)
        .map(|(name, kind)| (name, GamepadComponent { name, kind }))
        .collect()
});

/// Look up a component identifier by name.
pub fn component(name: &str) -> Option<GamepadComponent> {
    COMPONENTS.get(name).copied()
}

/// Number of known identifiers.
pub fn component_count() -> usize {
    COMPONENTS.len()
}

/// Latest polled values of one gamepad.
#[derive(Resource, Debug, Clone, Default)]
pub struct GamepadState {
    values: FxHashMap<&'static str, f32>,
}

impl GamepadState {
    /// Store a polled value. Returns false (and stores nothing) for names
    /// outside the identifier table.
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match component(name) {
            Some(c) => {
                self.values.insert(c.name, value);
                true
            }
            None => false,
        }
    }

    /// Last polled value for `name`; 0 for unknown or never-polled names.
    pub fn poll_data(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        self.poll_data(name) != 0.0
    }

    pub fn left_stick(&self) -> Vec2 {
        Vec2::new(
            self.poll_data(xbox::LEFT_STICK_X),
            self.poll_data(xbox::LEFT_STICK_Y),
        )
    }

    pub fn dpad(&self) -> Vec2 {
        dpad::direction(self.poll_data(xbox::DPAD))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_buttons_and_axes() {
        assert_eq!(component_count(), 32 + 27 + 29);
        assert_eq!(component("0").unwrap().kind, ComponentKind::Button);
        assert_eq!(component(buttons::BASE6).unwrap().kind, ComponentKind::Button);
        assert_eq!(component(axis::SLIDER_VELOCITY).unwrap().kind, ComponentKind::Axis);
        assert!(component("nope").is_none());
    }

    #[test]
    fn test_button_and_axis_names_do_not_collide() {
        assert_eq!(component(buttons::X).unwrap().kind, ComponentKind::Button);
        assert_eq!(component(axis::X).unwrap().kind, ComponentKind::Axis);
    }

    #[test]
    fn test_xbox_triggers_share_axis() {
        assert_eq!(xbox::LT, xbox::RT);
        assert_eq!(xbox::A, "0");
        assert_eq!(xbox::START, "7");
        assert_eq!(xbox::DPAD, axis::POV);
    }

    #[test]
    fn test_poll_data_unknown_is_zero() {
        let mut pad = GamepadState::default();
        assert!(!pad.set("bogus", 1.0));
        assert_eq!(pad.poll_data("bogus"), 0.0);
        assert_eq!(pad.poll_data(xbox::A), 0.0);

        assert!(pad.set(xbox::A, 1.0));
        assert!(pad.is_pressed(xbox::A));
    }

    #[test]
    fn test_dpad_direction() {
        assert_eq!(dpad::direction(dpad::UP), Vec2::new(0.0, -1.0));
        assert_eq!(dpad::direction(dpad::DOWN_LEFT), Vec2::new(-1.0, 1.0));
        assert_eq!(dpad::direction(dpad::LEFT), Vec2::new(-1.0, 0.0));
        assert_eq!(dpad::direction(dpad::CENTER), Vec2::ZERO);
    }
}
