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

//! Simulated collaborators of the sensor session
//!
//! Requests are accepted or rejected immediately like on the device. Their outcomes are queued as
//! events with a delay relative to the request and picked up by the main loop.

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rand::{Rng, RngCore};
use rand_chacha::ChaCha8Rng;

use node_api::*;

/// Join request until join accept, including both receive windows
pub const JOIN_DURATION_MS: TimeMs = 6_000;
/// Uplink until the end of the second receive window
pub const TRANSACTION_DURATION_MS: TimeMs = 2_000;
/// Largest application payload at the highest data rate
pub const MAX_UPLINK_SIZE: usize = 222;
/// Timers the simulated timer service hands out
pub const MAX_TIMERS: u8 = 4;
pub const MAX_DATA_RATE: u8 = 7;

/// Probabilities in parts per thousand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioParams {
    pub join_denial_ppt: u32,
    pub tx_failure_ppt: u32,
    pub downlink_ppt: u32,
}

fn chance(rng: &mut impl RngCore, ppt: u32) -> bool {
    rng.next_u32() % 1000 < ppt
}

/// Event due `delay` after the request that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub delay: TimeMs,
    pub event: Event,
}

#[derive(Debug)]
pub struct SimRadio {
    params: RadioParams,
    rng: ChaCha8Rng,
    band: Option<IsmBand>,
    has_keys: bool,
    joined: bool,
    /// Join or uplink in progress
    busy: bool,
    pending: Vec<Pending>,
    sent: Vec<Vec<u8>>,
    join_requests: usize,
}

impl SimRadio {
    pub fn new(params: RadioParams, rng: ChaCha8Rng) -> Self {
        Self {
            params,
            rng,
            band: None,
            has_keys: false,
            joined: false,
            busy: false,
            pending: Vec::new(),
            sent: Vec::new(),
            join_requests: 0,
        }
    }

    /// Outcome events queued since the last call
    pub fn take_pending(&mut self) -> Vec<Pending> {
        std::mem::take(&mut self.pending)
    }

    /// Payloads of uplinks accepted since the last call
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.sent)
    }

    /// Finish the request an outcome event belongs to, before the event is delivered
    pub fn complete(&mut self, event: &Event) {
        match event {
            Event::JoinOutcome { accepted } => {
                self.busy = false;
                self.joined = *accepted;
            }
            Event::TransactionComplete(_) => self.busy = false,
            Event::TimerExpired(_) | Event::Downlink(_) => {}
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn join_requests(&self) -> usize {
        self.join_requests
    }

    fn transaction_status(&mut self) -> TransactionStatus {
        if !chance(&mut self.rng, self.params.tx_failure_ppt) {
            return TransactionStatus::Success;
        }
        match self.rng.gen_range(0..3) {
            0 => TransactionStatus::NoChannelsFound,
            1 => TransactionStatus::Busy,
            _ => TransactionStatus::Failed(StackError::Other(self.rng.gen())),
        }
    }

    fn random_downlink(&mut self) -> Option<Downlink> {
        let port = self.rng.gen_range(1..=223);
        let len = self.rng.gen_range(0..=8);
        let mut data = vec![port];
        data.extend((0..len).map(|_| self.rng.gen::<u8>()));
        Downlink::received(&data)
    }
}

impl RadioStack for SimRadio {
    fn reset(&mut self, band: IsmBand) {
        info!("radio stack reset to {:?}", band);
        self.band = Some(band);
        self.has_keys = false;
        self.joined = false;
        self.busy = false;
        self.pending.clear();
    }

    fn set_attribute(&mut self, attribute: Attribute) -> Result<(), StackError> {
        if self.band.is_none() {
            return Err(StackError::InvalidRequest);
        }
        match attribute {
            Attribute::DataRate(dr) if dr > MAX_DATA_RATE => Err(StackError::InvalidParameter),
            Attribute::AppKey(_) => {
                self.has_keys = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn join(&mut self, mode: JoinMode) -> Result<(), StackError> {
        if !self.has_keys {
            return Err(StackError::KeysNotInitialized);
        }
        if self.busy {
            return Err(StackError::Busy);
        }
        self.busy = true;
        self.join_requests += 1;

        let accepted = !chance(&mut self.rng, self.params.join_denial_ppt);
        debug!("{:?} join request, network will accept: {}", mode, accepted);
        self.pending.push(Pending {
            delay: JOIN_DURATION_MS,
            event: Event::JoinOutcome { accepted },
        });
        Ok(())
    }

    fn send(&mut self, request: &SendRequest<'_>) -> Result<(), StackError> {
        if !self.joined {
            return Err(StackError::NotJoined);
        }
        if self.busy {
            return Err(StackError::Busy);
        }
        if request.buffer.len() > MAX_UPLINK_SIZE {
            return Err(StackError::InvalidBufferLength);
        }
        self.busy = true;
        self.sent.push(request.buffer.to_vec());

        let status = self.transaction_status();
        if status == TransactionStatus::Success {
            let downlink = if chance(&mut self.rng, self.params.downlink_ppt) {
                self.random_downlink()
            } else if request.transmission == TransmissionType::Confirmed {
                // ack only
                Downlink::received(&[])
            } else {
                None
            };
            if let Some(downlink) = downlink {
                self.pending.push(Pending {
                    delay: TRANSACTION_DURATION_MS,
                    event: Event::Downlink(downlink),
                });
            }
        }
        self.pending.push(Pending {
            delay: TRANSACTION_DURATION_MS,
            event: Event::TransactionComplete(status),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSlot {
    Idle,
    /// Started, not yet picked up by the main loop
    Started(TimeMs),
    /// Expiry queued in the main loop
    Running,
}

#[derive(Debug, Default)]
pub struct SimTimer {
    slots: Vec<TimerSlot>,
}

impl SimTimer {
    /// Timers started since the last call
    pub fn take_pending(&mut self) -> Vec<Pending> {
        let mut pending = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if let TimerSlot::Started(delay) = *slot {
                *slot = TimerSlot::Running;
                pending.push(Pending {
                    delay,
                    event: Event::TimerExpired(TimerId(id as u8)),
                });
            }
        }
        pending
    }

    /// Release the timer before its expiry is delivered
    pub fn expire(&mut self, id: TimerId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            *slot = TimerSlot::Idle;
        }
    }
}

impl TimerService for SimTimer {
    fn create(&mut self) -> Result<TimerId, TimerError> {
        if self.slots.len() >= MAX_TIMERS as usize {
            return Err(TimerError::NoResources);
        }
        self.slots.push(TimerSlot::Idle);
        Ok(TimerId(self.slots.len() as u8 - 1))
    }

    fn start(&mut self, id: TimerId, duration_ms: TimeMs) -> Result<(), TimerError> {
        match self.slots.get_mut(id.0 as usize) {
            None => Err(TimerError::InvalidTimerId),
            Some(slot) if *slot == TimerSlot::Idle => {
                *slot = TimerSlot::Started(duration_ms);
                Ok(())
            }
            Some(_) => Err(TimerError::AlreadyArmed),
        }
    }
}

/// Light and temperature doing a random walk
#[derive(Debug)]
pub struct SimSensors {
    rng: ChaCha8Rng,
    light: f32,
    temperature: f32,
}

impl SimSensors {
    pub const LIGHT_RANGE: (f32, f32) = (0.0, 255.0);
    pub const TEMPERATURE_RANGE: (f32, f32) = (-20.0, 50.0);

    pub fn new(mut rng: ChaCha8Rng) -> Self {
        let light = rng.gen_range(Self::LIGHT_RANGE.0..=Self::LIGHT_RANGE.1);
        let temperature = rng.gen_range(15.0..=25.0);
        Self {
            rng,
            light,
            temperature,
        }
    }
}

impl Sensors for SimSensors {
    fn read_illuminance(&mut self) -> Result<u16, SensorError> {
        self.light = (self.light + self.rng.gen_range(-20.0..=20.0))
            .clamp(Self::LIGHT_RANGE.0, Self::LIGHT_RANGE.1);
        Ok(self.light.round() as u16)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature = (self.temperature + self.rng.gen_range(-0.5..=0.5))
            .clamp(Self::TEMPERATURE_RANGE.0, Self::TEMPERATURE_RANGE.1);
        Ok(self.temperature)
    }
}

#[derive(Debug, Default)]
pub struct SimIndicator {
    green: bool,
    amber: bool,
}

impl Indicator for SimIndicator {
    fn set(&mut self, color: Color, on: bool) {
        let led = match color {
            Color::Green => &mut self.green,
            Color::Amber => &mut self.amber,
        };
        if *led != on {
            debug!("{:?} LED {}", color, if on { "on" } else { "off" });
        }
        *led = on;
    }
}

/// Debug EUI register
#[derive(Debug)]
pub struct SimEui(pub Eui64);

impl SimEui {
    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut eui = [0; 8];
        rng.fill_bytes(&mut eui);
        Self(eui)
    }
}

impl EuiSource for SimEui {
    fn read_eui64(&mut self) -> Eui64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn radio(params: RadioParams) -> SimRadio {
        let mut radio = SimRadio::new(params, ChaCha8Rng::seed_from_u64(0));
        radio.reset(IsmBand::Eu868);
        radio.set_attribute(Attribute::AppKey([0; 16])).unwrap();
        radio
    }

    fn joined_radio(params: RadioParams) -> SimRadio {
        let mut radio = radio(params);
        radio.join(JoinMode::Otaa).unwrap();
        let outcome = radio.take_pending().remove(0).event;
        radio.complete(&outcome);
        assert!(radio.is_joined());
        radio
    }

    fn uplink(transmission: TransmissionType) -> SendRequest<'static> {
        SendRequest {
            transmission,
            port: 2,
            buffer: &[50, b'2', b'5', b'.', b'0'],
        }
    }

    #[test]
    fn join_needs_keys() {
        let mut radio = SimRadio::new(RadioParams::default(), ChaCha8Rng::seed_from_u64(0));
        radio.reset(IsmBand::Eu868);
        assert_eq!(
            radio.join(JoinMode::Otaa),
            Err(StackError::KeysNotInitialized)
        );
    }

    #[test]
    fn attribute_before_reset() {
        let mut radio = SimRadio::new(RadioParams::default(), ChaCha8Rng::seed_from_u64(0));
        assert_eq!(
            radio.set_attribute(Attribute::Adr(false)),
            Err(StackError::InvalidRequest)
        );
    }

    #[test]
    fn invalid_data_rate() {
        let mut radio = radio(RadioParams::default());
        assert_eq!(
            radio.set_attribute(Attribute::DataRate(8)),
            Err(StackError::InvalidParameter)
        );
    }

    #[test]
    fn overlapping_join_is_rejected() {
        let mut radio = radio(RadioParams::default());
        radio.join(JoinMode::Otaa).unwrap();
        assert_eq!(radio.join(JoinMode::Otaa), Err(StackError::Busy));
        assert_eq!(
            radio.take_pending(),
            [Pending {
                delay: JOIN_DURATION_MS,
                event: Event::JoinOutcome { accepted: true }
            }]
        );
        assert_eq!(radio.join_requests(), 1);
    }

    #[test]
    fn denied_join() {
        let mut radio = radio(RadioParams {
            join_denial_ppt: 1000,
            ..Default::default()
        });
        radio.join(JoinMode::Otaa).unwrap();
        let outcome = radio.take_pending().remove(0).event;
        assert_eq!(outcome, Event::JoinOutcome { accepted: false });
        radio.complete(&outcome);
        assert!(!radio.is_joined());
        assert_eq!(
            radio.send(&uplink(TransmissionType::Unconfirmed)),
            Err(StackError::NotJoined)
        );
    }

    #[test]
    fn unconfirmed_uplink() {
        let mut radio = joined_radio(RadioParams::default());
        radio.send(&uplink(TransmissionType::Unconfirmed)).unwrap();
        assert_eq!(
            radio.send(&uplink(TransmissionType::Unconfirmed)),
            Err(StackError::Busy)
        );
        assert_eq!(radio.take_sent(), [vec![50, b'2', b'5', b'.', b'0']]);
        assert_eq!(
            radio.take_pending(),
            [Pending {
                delay: TRANSACTION_DURATION_MS,
                event: Event::TransactionComplete(TransactionStatus::Success)
            }]
        );
    }

    #[test]
    fn confirmed_uplink_is_acked() {
        let mut radio = joined_radio(RadioParams::default());
        radio.send(&uplink(TransmissionType::Confirmed)).unwrap();
        let events: Vec<_> = radio.take_pending().into_iter().map(|p| p.event).collect();
        assert_eq!(
            events,
            [
                Event::Downlink(Downlink::received(&[]).unwrap()),
                Event::TransactionComplete(TransactionStatus::Success)
            ]
        );
    }

    #[test]
    fn failed_transaction_has_no_downlink() {
        let mut radio = joined_radio(RadioParams {
            tx_failure_ppt: 1000,
            downlink_ppt: 1000,
            ..Default::default()
        });
        radio.send(&uplink(TransmissionType::Unconfirmed)).unwrap();
        let pending = radio.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(matches!(
            pending[0].event,
            Event::TransactionComplete(status) if status != TransactionStatus::Success
        ));
    }

    #[test]
    fn downlink_has_port() {
        let mut radio = joined_radio(RadioParams {
            downlink_ppt: 1000,
            ..Default::default()
        });
        radio.send(&uplink(TransmissionType::Unconfirmed)).unwrap();
        match &radio.take_pending()[0].event {
            Event::Downlink(downlink) => {
                assert!(downlink.status.is_ok());
                assert!(matches!(downlink.port(), Some(1..=223)));
            }
            event => panic!("unexpected event {:?}", event),
        }
    }

    #[test]
    fn oversized_uplink() {
        let mut radio = joined_radio(RadioParams::default());
        let buffer = [0; MAX_UPLINK_SIZE + 1];
        let request = SendRequest {
            transmission: TransmissionType::Unconfirmed,
            port: 2,
            buffer: &buffer,
        };
        assert_eq!(radio.send(&request), Err(StackError::InvalidBufferLength));
        assert!(radio.take_sent().is_empty());
    }

    #[test]
    fn timer_single_arm() {
        let mut timer = SimTimer::default();
        let id = timer.create().unwrap();
        assert_eq!(timer.start(TimerId(3), 10), Err(TimerError::InvalidTimerId));
        timer.start(id, 60_000).unwrap();
        assert_eq!(timer.start(id, 60_000), Err(TimerError::AlreadyArmed));
        assert_eq!(
            timer.take_pending(),
            [Pending {
                delay: 60_000,
                event: Event::TimerExpired(id)
            }]
        );
        assert!(timer.take_pending().is_empty());
        // still running until the expiry is delivered
        assert_eq!(timer.start(id, 60_000), Err(TimerError::AlreadyArmed));

        timer.expire(id);
        timer.start(id, 30_000).unwrap();
        assert_eq!(timer.take_pending()[0].delay, 30_000);
    }

    #[test]
    fn timer_resources() {
        let mut timer = SimTimer::default();
        for n in 0..MAX_TIMERS {
            assert_eq!(timer.create(), Ok(TimerId(n)));
        }
        assert_eq!(timer.create(), Err(TimerError::NoResources));
    }

    #[test]
    fn sensors_stay_in_range() {
        let mut sensors = SimSensors::new(ChaCha8Rng::seed_from_u64(3));
        for _ in 0..1000 {
            assert!(sensors.read_illuminance().unwrap() <= 255);
            let temperature = sensors.read_temperature().unwrap();
            assert!((-20.0..=50.0).contains(&temperature));
        }
    }

    #[test]
    fn indicator() {
        let mut indicator = SimIndicator::default();
        indicator.set(Color::Amber, true);
        indicator.set(Color::Green, false);
        assert!(indicator.amber);
        assert!(!indicator.green);
    }
}
