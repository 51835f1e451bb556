use common::{Bus, Device};
use std::cell::Cell;
use std::sync::{Arc, Mutex, MutexGuard};

/// Buttons of the standard pad, see [`StandardNESKey::REPORT_ORDER`] for the
/// order they come out of `$4016`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardNESKey {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl StandardNESKey {
    pub const REPORT_ORDER: [StandardNESKey; 8] = [
        StandardNESKey::A,
        StandardNESKey::B,
        StandardNESKey::Select,
        StandardNESKey::Start,
        StandardNESKey::Up,
        StandardNESKey::Down,
        StandardNESKey::Left,
        StandardNESKey::Right,
    ];

    fn button(self) -> StandardNESControllerState {
        match self {
            StandardNESKey::A => StandardNESControllerState::A,
            StandardNESKey::B => StandardNESControllerState::B,
            StandardNESKey::Select => StandardNESControllerState::SELECT,
            StandardNESKey::Start => StandardNESControllerState::START,
            StandardNESKey::Up => StandardNESControllerState::UP,
            StandardNESKey::Down => StandardNESControllerState::DOWN,
            StandardNESKey::Left => StandardNESControllerState::LEFT,
            StandardNESKey::Right => StandardNESControllerState::RIGHT,
        }
    }
}

bitflags! {
    /// bit N is the Nth value read after a strobe
    pub struct StandardNESControllerState: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const LEFT = 1 << 6;
        const RIGHT = 1 << 7;
    }
}

impl StandardNESControllerState {
    pub fn press(&mut self, key: StandardNESKey) {
        self.set(key.button(), true);
    }

    pub fn release(&mut self, key: StandardNESKey) {
        self.set(key.button(), false);
    }

    pub fn is_pressed(&self, key: StandardNESKey) -> bool {
        self.contains(key.button())
    }
}

/// Standard pad on port 1.
///
/// The held buttons are shared with the frontend, the CPU only sees the
/// report latched from them by the strobe bit of `$4016`.
pub struct Controller {
    buttons: Arc<Mutex<StandardNESControllerState>>,
    /// next bit in D0, refilled with 1s from the top
    report: Cell<u8>,
    strobe: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            buttons: Arc::new(Mutex::new(StandardNESControllerState::empty())),
            report: Cell::new(0),
            strobe: false,
        }
    }

    /// handle for the thread that owns the input device
    pub fn get_primary_controller_state(&self) -> Arc<Mutex<StandardNESControllerState>> {
        self.buttons.clone()
    }

    pub fn set_state(&self, key: StandardNESKey, pressed: bool) {
        let mut buttons = self.held_buttons();
        if pressed {
            buttons.press(key);
        } else {
            buttons.release(key);
        }
    }

    /// a panic on the frontend side does not lose the buttons
    fn held_buttons(&self) -> MutexGuard<StandardNESControllerState> {
        self.buttons
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn latch(&self) {
        let buttons = self.held_buttons().bits();
        self.report.set(buttons);
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Controller {
    fn read(&self, _address: u16, _device: Device) -> u8 {
        // while strobing, every read reports the current A button
        if self.strobe {
            self.latch();
        }

        let report = self.report.get();
        self.report.set(report >> 1 | 0x80);

        report & 1
    }

    fn write(&mut self, _address: u16, data: u8, _device: Device) {
        let strobe = data & 1 != 0;

        // latched while high, the last latch is kept on the falling edge
        if strobe || self.strobe {
            self.latch();
        }

        self.strobe = strobe;
    }
}
