//  _____       ______   ____
// |_   _|     |  ____|/ ____|  Institute of Embedded Systems
//   | |  _ __ | |__  | (___    Zurich University of Applied Sciences
//   | | | '_ \|  __|  \___ \   8401 Winterthur, Switzerland
//  _| |_| | | | |____ ____) |
// |_____|_| |_|______|_____/
//
// Copyright 2025 Institute of Embedded Systems at Zurich University of Applied Sciences.
// All rights reserved.
// SPDX-License-Identifier: MIT

//! Collaborators that record calls, for unit tests

use crate::*;

pub const TEST_EUI: Eui64 = [0x00, 0x04, 0x25, 0x19, 0x18, 0x01, 0xd3, 0x7a];
pub const TEST_TIMER: TimerId = TimerId(0);

#[derive(Debug, Default)]
pub struct MockRadio {
    pub band: Option<IsmBand>,
    pub attributes: Vec<Attribute>,
    /// Accepted join requests
    pub joins: Vec<JoinMode>,
    /// Accepted uplinks
    pub sends: Vec<(TransmissionType, u8, Vec<u8>)>,
    pub reject_attribute: Option<StackError>,
    pub reject_join: Option<StackError>,
    pub reject_send: Option<StackError>,
}

impl RadioStack for MockRadio {
    fn reset(&mut self, band: IsmBand) {
        self.band = Some(band);
        self.attributes.clear();
    }

    fn set_attribute(&mut self, attribute: Attribute) -> Result<(), StackError> {
        if let Some(err) = self.reject_attribute {
            return Err(err);
        }
        self.attributes.push(attribute);
        Ok(())
    }

    fn join(&mut self, mode: JoinMode) -> Result<(), StackError> {
        if let Some(err) = self.reject_join {
            return Err(err);
        }
        self.joins.push(mode);
        Ok(())
    }

    fn send(&mut self, request: &SendRequest<'_>) -> Result<(), StackError> {
        if let Some(err) = self.reject_send {
            return Err(err);
        }
        self.sends
            .push((request.transmission, request.port, request.buffer.to_vec()));
        Ok(())
    }
}

/// Single timer, refuses to be started twice without expiring in between
#[derive(Debug, Default)]
pub struct MockTimer {
    pub created: u8,
    pub starts: Vec<(TimerId, TimeMs)>,
    pub armed: bool,
    pub no_resources: bool,
}

impl MockTimer {
    /// Let the pending arm run out
    pub fn expire(&mut self) {
        assert!(self.armed, "timer expired without being armed");
        self.armed = false;
    }
}

impl TimerService for MockTimer {
    fn create(&mut self) -> Result<TimerId, TimerError> {
        if self.no_resources {
            return Err(TimerError::NoResources);
        }
        self.created += 1;
        Ok(TEST_TIMER)
    }

    fn start(&mut self, id: TimerId, duration_ms: TimeMs) -> Result<(), TimerError> {
        if id != TEST_TIMER {
            return Err(TimerError::InvalidTimerId);
        }
        if self.armed {
            return Err(TimerError::AlreadyArmed);
        }
        self.armed = true;
        self.starts.push((id, duration_ms));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockSensors {
    pub illuminance: Result<u16, SensorError>,
    pub temperature: Result<f32, SensorError>,
}

impl Default for MockSensors {
    fn default() -> Self {
        Self {
            illuminance: Ok(0),
            temperature: Ok(25.0),
        }
    }
}

impl Sensors for MockSensors {
    fn read_illuminance(&mut self) -> Result<u16, SensorError> {
        self.illuminance
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature
    }
}

#[derive(Debug, Default)]
pub struct MockIndicator {
    pub writes: Vec<(Color, bool)>,
}

impl Indicator for MockIndicator {
    fn set(&mut self, color: Color, on: bool) {
        self.writes.push((color, on));
    }
}

pub struct MockEui(pub Eui64);

impl EuiSource for MockEui {
    fn read_eui64(&mut self) -> Eui64 {
        self.0
    }
}

pub type TestSession = DeviceSession<MockRadio, MockTimer, MockSensors, MockIndicator>;

pub fn peripherals() -> Peripherals<MockRadio, MockTimer, MockSensors, MockIndicator> {
    Peripherals {
        radio: MockRadio::default(),
        timer: MockTimer::default(),
        sensors: MockSensors::default(),
        indicator: MockIndicator::default(),
    }
}

/// Session that has not been started
pub fn session() -> TestSession {
    DeviceSession::new(
        SessionConfig::default(),
        &mut MockEui(TEST_EUI),
        peripherals(),
    )
}

/// Session with an accepted join request
pub fn started_session() -> TestSession {
    let mut session = session();
    session.start(0).unwrap();
    session
}

/// Joined session with the application timer armed
pub fn joined_session() -> TestSession {
    let mut session = started_session();
    session.dispatch(1_000, join_outcome(true)).unwrap();
    session
}

pub fn timer_expired() -> Event {
    Event::TimerExpired(TEST_TIMER)
}

pub fn join_outcome(accepted: bool) -> Event {
    Event::JoinOutcome { accepted }
}

pub fn transaction_complete(status: TransactionStatus) -> Event {
    Event::TransactionComplete(status)
}

pub fn downlink(data: &[u8]) -> Event {
    Event::Downlink(Downlink::received(data).unwrap())
}
