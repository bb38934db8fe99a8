use enigo::{Axis, Enigo, InputResult, Key, Keyboard, Mouse, NewConError, Settings};

use crate::output::{direction, MouseButton, Output};

pub struct Performer {
    enigo: Enigo,
}

impl Performer {
    /// Create a new performer.
    pub fn new() -> Result<Self, NewConError> {
        let settings = Settings::default();
        let enigo = Enigo::new(&settings)?;
        Ok(Self { enigo })
    }

    pub fn perform(&mut self, output: &Output) -> InputResult<()> {
        match *output {
            Output::MouseButton { button, pressed } => self.button(button, pressed),
            Output::Scroll(notches) => self.scroll_y(notches),
            Output::Escape { pressed } => self.escape(pressed),
        }
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) -> InputResult<()> {
        self.enigo.button(button.to_enigo(), direction(pressed))
    }

    /// Scroll vertically.
    pub fn scroll_y(&mut self, value: i32) -> InputResult<()> {
        self.enigo.scroll(value, Axis::Vertical)
    }

    pub fn escape(&mut self, pressed: bool) -> InputResult<()> {
        self.enigo.key(Key::Escape, direction(pressed))
    }
}
