use std::collections::HashMap;
use std::io;
use crossterm::event::{Event, KeyCode};

// --- SimulatedInput for headless runs ---
// Frame-indexed events fed through the same mapping path as live input.
pub struct SimulatedInput {
    events: HashMap<u64, Event>,
    current_frame: u64,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Event>) -> Self {
        SimulatedInput {
            events,
            current_frame: 0,
        }
    }

    /// A short scripted flight: burn, speed up, steer, coast, quit.
    pub fn demo_script(tick_rate: f64, max_frames: u64) -> Self {
        let second = tick_rate as u64;
        let mut events = HashMap::new();
        events.insert(second, Event::Key(KeyCode::Char(' ').into()));
        events.insert(2 * second, Event::Key(KeyCode::Char('s').into()));
        events.insert(3 * second, Event::Key(KeyCode::Right.into()));
        events.insert(3 * second + second / 2, Event::Key(KeyCode::Right.into()));
        events.insert(4 * second, Event::Key(KeyCode::Char('s').into()));
        events.insert(5 * second, Event::Key(KeyCode::Char(' ').into()));
        events.insert(max_frames.saturating_sub(1), Event::Key(KeyCode::Char('q').into()));
        SimulatedInput::new(events)
    }

    pub fn poll(&mut self, frame_count: u64) -> io::Result<bool> {
        self.current_frame = frame_count;
        Ok(self.events.contains_key(&frame_count))
    }

    pub fn read(&mut self) -> io::Result<Event> {
        if let Some(event) = self.events.remove(&self.current_frame) {
            Ok(event)
        } else {
            Ok(Event::Key(KeyCode::Null.into()))
        }
    }
}
