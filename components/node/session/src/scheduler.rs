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

use crate::*;

impl<R, T, S, I> DeviceSession<R, T, S, I>
where
    R: RadioStack,
    T: TimerService,
    S: Sensors,
    I: Indicator,
{
    /// Sample, encode and send (or join if not joined yet), then rearm the timer
    ///
    /// The timer is rearmed whatever happened before, so a failure only costs one cycle.
    pub(crate) fn on_timer_expired(&mut self, now: TimeMs, id: TimerId) -> Result<(), Error> {
        if self.timer_id != Some(id) {
            warn!("expiry of unknown timer {:?}", id);
            return Ok(());
        }
        self.timer_armed = false;
        info!("application timer expired");

        let measurement = self.sampler.sample();
        info!("light sensor value: {}", measurement.illuminance.0);
        info!(
            "temperature: {} C / {} F",
            Tenths(measurement.temperature.0),
            Tenths(measurement.temperature.to_fahrenheit())
        );

        self.payload = UplinkPayload::encode(measurement.illuminance, measurement.temperature);
        info!("payload ({} bytes): {}", PAYLOAD_SIZE, self.payload);

        let request = if self.state.is_joined() {
            self.send_uplink(now)
        } else {
            self.request_join(now)
        };

        let rearm = self.arm_timer();
        if let Err(err) = rearm {
            error!("unable to restart the application timer: {}", err);
        }

        request?;
        rearm?;
        match measurement.error {
            Some(err) => Err(Error::SensorReadUnavailable(err)),
            None => Ok(()),
        }
    }

    fn send_uplink(&mut self, now: TimeMs) -> Result<(), Error> {
        let request = SendRequest {
            transmission: self.config.transmission,
            port: self.config.uplink_port,
            buffer: self.payload.as_bytes(),
        };
        match self.radio.send(&request) {
            Ok(()) => {
                info!("uplink message sent");
                event_log_uplink!(now, self.device_id(), self.config.uplink_port, self.payload);
                self.show(now, Outcome::UplinkSubmitted);
                Ok(())
            }
            Err(err) => {
                warn!("uplink rejected: {}", err);
                self.show(now, Outcome::UplinkRejected);
                Err(Error::RequestRejected(err))
            }
        }
    }
}
