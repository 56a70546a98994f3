//! Reassembly of 2-byte length-prefixed DNS frames (RFC 1035 §4.2.2,
//! RFC 7858 §3.3) from an arbitrarily chunked byte stream.
//!
//! The reducer is synchronous: socket code feeds it [`FrameEvent`]s and stops
//! as soon as it hands back a [`FrameOutcome`]. It produces exactly one
//! outcome; every event after that is ignored.

use dnsbench_domain::DomainError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Connecting,
    AwaitingLength,
    AwaitingBody { expected: usize },
    Done,
}

#[derive(Debug)]
pub enum FrameEvent<'a> {
    Connected,
    Data(&'a [u8]),
    TimedOut,
    SocketError(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Frame(Vec<u8>),
    TimedOut,
    SocketError(String),
    ClosedPrematurely {
        expected: Option<usize>,
        received: usize,
    },
}

impl FrameOutcome {
    /// Maps the outcome onto the error taxonomy; only `Frame` is a success.
    pub fn into_frame(self, endpoint: &str, timeout: Duration) -> Result<Vec<u8>, DomainError> {
        match self {
            FrameOutcome::Frame(frame) => Ok(frame),
            FrameOutcome::TimedOut => Err(DomainError::timeout(endpoint, timeout)),
            FrameOutcome::SocketError(message) => Err(DomainError::Connection(format!(
                "{}: {}",
                endpoint, message
            ))),
            FrameOutcome::ClosedPrematurely {
                expected: Some(expected),
                received,
            } => Err(DomainError::Connection(format!(
                "{} closed the connection after {} of {} response bytes",
                endpoint, received, expected
            ))),
            FrameOutcome::ClosedPrematurely { expected: None, .. } => Err(
                DomainError::Connection(format!("{} closed the connection before responding", endpoint)),
            ),
        }
    }
}

#[derive(Debug)]
pub struct FrameReassembler {
    state: FrameState,
    buffer: Vec<u8>,
    completed: bool,
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self {
            state: FrameState::Connecting,
            buffer: Vec::new(),
            completed: false,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn handle(&mut self, event: FrameEvent<'_>) -> Option<FrameOutcome> {
        if self.completed {
            return None;
        }

        match event {
            FrameEvent::Connected => {
                if self.state == FrameState::Connecting {
                    self.state = FrameState::AwaitingLength;
                }
                None
            }
            FrameEvent::Data(chunk) => {
                if self.state == FrameState::Connecting {
                    self.state = FrameState::AwaitingLength;
                }
                self.buffer.extend_from_slice(chunk);
                self.advance()
            }
            FrameEvent::TimedOut => Some(self.finish(FrameOutcome::TimedOut)),
            FrameEvent::SocketError(message) => Some(self.finish(FrameOutcome::SocketError(message))),
            FrameEvent::Closed => {
                let expected = match self.state {
                    FrameState::AwaitingBody { expected } => Some(expected),
                    _ => None,
                };
                let received = self.buffer.len();
                Some(self.finish(FrameOutcome::ClosedPrematurely { expected, received }))
            }
        }
    }

    fn advance(&mut self) -> Option<FrameOutcome> {
        if self.state == FrameState::AwaitingLength && self.buffer.len() >= 2 {
            let expected = u16::from_be_bytes([self.buffer[0], self.buffer[1]]) as usize;
            self.buffer.drain(..2);
            self.state = FrameState::AwaitingBody { expected };
        }

        match self.state {
            FrameState::AwaitingBody { expected } if self.buffer.len() >= expected => {
                self.buffer.truncate(expected);
                let frame = std::mem::take(&mut self.buffer);
                Some(self.finish(FrameOutcome::Frame(frame)))
            }
            _ => None,
        }
    }

    fn finish(&mut self, outcome: FrameOutcome) -> FrameOutcome {
        self.completed = true;
        self.state = FrameState::Done;
        outcome
    }
}
