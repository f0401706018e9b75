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

use crate::indicator::StatusLeds;
use crate::*;

/// Drivers and services the session talks to
#[derive(Debug)]
pub struct Peripherals<R, T, S, I> {
    pub radio: R,
    pub timer: T,
    pub sensors: S,
    pub indicator: I,
}

/// Application state of the sensor node
///
/// The session is the only writer of the join state, the application timer and the LEDs. Events
/// have to be passed to [`DeviceSession::dispatch`] one at a time.
#[derive(Debug)]
pub struct DeviceSession<R, T, S, I> {
    pub(crate) config: SessionConfig,
    pub(crate) identity: DeviceIdentity,
    pub(crate) state: SessionState,
    pub(crate) radio: R,
    pub(crate) timer: T,
    pub(crate) timer_id: Option<TimerId>,
    /// Application timer was started and has not expired yet
    pub(crate) timer_armed: bool,
    pub(crate) sampler: SensorSampler<S>,
    pub(crate) leds: StatusLeds<I>,
    /// Last encoded payload
    pub(crate) payload: UplinkPayload,
}

impl<R, T, S, I> DeviceSession<R, T, S, I>
where
    R: RadioStack,
    T: TimerService,
    S: Sensors,
    I: Indicator,
{
    /// The device EUI is read from `eui_source` once and stays fixed for the lifetime of the
    /// session.
    pub fn new(
        config: SessionConfig,
        eui_source: &mut impl EuiSource,
        peripherals: Peripherals<R, T, S, I>,
    ) -> Self {
        let identity = DeviceIdentity::resolve(&config.identity, eui_source);
        Self {
            config,
            identity,
            state: SessionState::default(),
            radio: peripherals.radio,
            timer: peripherals.timer,
            timer_id: None,
            timer_armed: false,
            sampler: SensorSampler::new(peripherals.sensors),
            leds: StatusLeds::new(peripherals.indicator),
            payload: UplinkPayload::default(),
        }
    }

    /// Configure the stack, create the application timer and request the first join
    ///
    /// Fails if the stack or the timer service refuse the configuration. A refused join request
    /// is not an error, the join is retried on the next timer expiry.
    pub fn start(&mut self, now: TimeMs) -> Result<(), Error> {
        self.show(now, Outcome::Reset);
        info!("-- LoRaWAN light and temperature sensor --");
        info!("DevEUI: {}", Hex(&self.identity.dev_eui));
        info!("AppEUI: {}", Hex(&self.identity.app_eui));
        debug!("AppKey: {}", Hex(&self.identity.app_key));
        event_log_start!(now, self.device_id(), self.config.band);

        self.radio.reset(self.config.band);
        for attribute in self.config.stack_attributes(&self.identity) {
            self.radio
                .set_attribute(attribute)
                .map_err(Error::Configuration)?;
        }

        self.timer_id = Some(self.timer.create()?);

        match self.request_join(now) {
            Ok(()) => self.show(now, Outcome::JoinRequested),
            Err(err) => warn!("first join: {}", err),
        }
        Ok(())
    }

    /// Handle a single event
    ///
    /// The returned error only reports what went wrong, the session has already handled it.
    pub fn dispatch(&mut self, now: TimeMs, event: Event) -> Result<(), Error> {
        debug!("event: {:?}", event);
        match event {
            Event::TimerExpired(id) => self.on_timer_expired(now, id),
            Event::JoinOutcome { accepted } => self.on_join_outcome(now, accepted),
            Event::TransactionComplete(status) => self.on_transaction_complete(now, status),
            Event::Downlink(downlink) => self.on_downlink(&downlink),
        }
    }

    pub(crate) fn set_state(&mut self, now: TimeMs, state: SessionState) {
        if self.state != state {
            event_log_state!(now, self.device_id(), state);
            self.state = state;
        }
    }

    pub(crate) fn show(&mut self, now: TimeMs, outcome: Outcome) {
        self.leds.show(outcome);
        event_log_indicator!(now, self.device_id(), self.leds.state());
    }

    /// Start the application timer unless it is already running
    pub(crate) fn arm_timer(&mut self) -> Result<(), Error> {
        if self.timer_armed {
            debug!("application timer already armed");
            return Ok(());
        }
        let id = self.timer_id.ok_or(TimerError::InvalidTimerId)?;
        self.timer.start(id, self.config.uplink_interval_ms)?;
        self.timer_armed = true;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn indicator_state(&self) -> IndicatorState {
        self.leds.state()
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Payload of the last timer expiry
    pub fn payload(&self) -> &UplinkPayload {
        &self.payload
    }

    pub fn device_id(&self) -> u64 {
        self.identity.device_id()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn sensors(&self) -> &S {
        self.sampler.sensors()
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        self.sampler.sensors_mut()
    }

    pub fn indicator(&self) -> &I {
        self.leds.driver()
    }
}
