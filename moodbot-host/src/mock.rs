//! Scripted collaborators for tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use moodbot_messages::packet::FRAME_LEN;
use moodbot_messages::{Packet, PacketDecoder, Token};

use crate::collaborators::{MotionSource, StatusDisplay, TokenReader};
use crate::error::LinkError;
use crate::link::{Line, LineLink};
use crate::motion::MotionInput;

#[derive(Debug, Clone)]
pub enum Reply {
    Line(Vec<u8>),
    Timeout,
    Fault,
}

struct LinkState {
    replies: VecDeque<Reply>,
    fallback: Reply,
    written: Vec<u8>,
    fail_writes: bool,
}

/// Test side handle to a [ScriptedLink]
#[derive(Clone)]
pub struct LinkProbe(Rc<RefCell<LinkState>>);

pub struct ScriptedLink(Rc<RefCell<LinkState>>);

impl LinkProbe {
    /// `fallback` answers every read once the scripted replies run out
    pub fn new(fallback: Reply) -> (ScriptedLink, LinkProbe) {
        let state = Rc::new(RefCell::new(LinkState {
            replies: VecDeque::new(),
            fallback,
            written: Vec::new(),
            fail_writes: false,
        }));
        (ScriptedLink(state.clone()), LinkProbe(state))
    }

    pub fn reply(&self, reply: Reply) {
        self.0.borrow_mut().replies.push_back(reply);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.borrow_mut().fail_writes = fail;
    }

    pub fn written(&self) -> Vec<u8> {
        self.0.borrow().written.clone()
    }

    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.0.borrow_mut().written)
    }

    /// Decode everything written so far as motor frames, the way the motor
    /// controller would
    pub fn frames(&self) -> Vec<Packet> {
        let mut decoder = PacketDecoder::new();
        let mut frames = Vec::new();
        for chunk in self.0.borrow().written.chunks(FRAME_LEN) {
            decoder.handle_receive(chunk);
            while let Ok(Some(packet)) = decoder.poll_receive() {
                frames.push(packet);
            }
        }
        frames
    }

    pub fn take_frames(&self) -> Vec<Packet> {
        let frames = self.frames();
        self.0.borrow_mut().written.clear();
        frames
    }
}

impl LineLink for ScriptedLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        let mut state = self.0.borrow_mut();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged").into());
        }
        state.written.extend_from_slice(bytes);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Line, LinkError> {
        let mut state = self.0.borrow_mut();
        let reply = match state.replies.pop_front() {
            Some(reply) => reply,
            None => state.fallback.clone(),
        };
        match reply {
            Reply::Line(bytes) => Ok(Line::from_slice(&bytes).expect("scripted line too long")),
            Reply::Timeout => Err(LinkError::Timeout),
            Reply::Fault => Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged").into()),
        }
    }
}

/// Joystick whose reading the test can change between ticks
#[derive(Clone)]
pub struct FixedJoystick(Rc<Cell<MotionInput>>);

impl FixedJoystick {
    pub fn new(input: MotionInput) -> Self {
        Self(Rc::new(Cell::new(input)))
    }

    pub fn set(&self, input: MotionInput) {
        self.0.set(input);
    }
}

impl MotionSource for FixedJoystick {
    fn read(&mut self) -> MotionInput {
        self.0.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Countdown(i32),
    Message(String),
    Battery(i32, bool),
}

#[derive(Clone, Default)]
pub struct RecordingDisplay(Rc<RefCell<Vec<Shown>>>);

impl RecordingDisplay {
    pub fn take(&self) -> Vec<Shown> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl StatusDisplay for RecordingDisplay {
    fn show_countdown(&mut self, seconds: i32) {
        self.0.borrow_mut().push(Shown::Countdown(seconds));
    }

    fn show_message(&mut self, text: &str) {
        self.0.borrow_mut().push(Shown::Message(text.into()));
    }

    fn show_battery_percent(&mut self, percent: i32, is_low: bool) {
        self.0.borrow_mut().push(Shown::Battery(percent, is_low));
    }
}

/// RFID reader that yields a fixed list of cards once each
#[derive(Clone)]
pub struct QueuedReader(Arc<Mutex<VecDeque<Token>>>);

impl QueuedReader {
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self(Arc::new(Mutex::new(tokens.into_iter().collect())))
    }

    pub fn is_drained(&self) -> bool {
        self.0.lock().map(|q| q.is_empty()).unwrap_or(true)
    }
}

impl TokenReader for QueuedReader {
    fn poll_once(&mut self) -> Option<Token> {
        self.0.lock().ok()?.pop_front()
    }
}
