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

/// Light sensor sample, 8 bit ADC resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Illuminance(pub u8);

impl TryFrom<u16> for Illuminance {
    type Error = SensorError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        u8::try_from(raw)
            .map(Illuminance)
            .map_err(|_| SensorError::OutOfRange(raw))
    }
}

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Celsius(pub f32);

impl Celsius {
    /// Only used for diagnostics, the uplink carries Celsius
    pub fn to_fahrenheit(self) -> f32 {
        self.0 * 9.0 / 5.0 + 32.0
    }
}

/// Formats a value with one fractional digit
#[derive(Debug, Clone, Copy)]
pub struct Tenths(pub f32);

impl core::fmt::Display for Tenths {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Tenths {
    /// Value in tenths, rounded half away from zero
    pub fn rounded(self) -> i32 {
        let scaled = self.0 * 10.0;
        if scaled < 0.0 {
            (scaled - 0.5) as i32
        } else {
            (scaled + 0.5) as i32
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Tenths {
    fn format(&self, fmt: defmt::Formatter) {
        let tenths = self.rounded();
        let sign = if tenths < 0 { "-" } else { "" };
        let abs = tenths.unsigned_abs();
        defmt::write!(fmt, "{=str}{=u32}.{=u32}", sign, abs / 10, abs % 10)
    }
}

/// Result of sampling both sensors once
///
/// Values are always usable. If a sensor could not be read a fallback value is used and `error`
/// holds the last failure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub illuminance: Illuminance,
    pub temperature: Celsius,
    pub error: Option<SensorError>,
}

/// Turns raw driver readings into typed samples
///
/// Owns the sensor drivers so they are only accessed from the scheduler.
#[derive(Debug)]
pub struct SensorSampler<S> {
    sensors: S,
}

impl<S: Sensors> SensorSampler<S> {
    pub fn new(sensors: S) -> Self {
        Self { sensors }
    }

    /// Rejects raw values above 255
    pub fn read_illuminance(&mut self) -> Result<Illuminance, SensorError> {
        Illuminance::try_from(self.sensors.read_illuminance()?)
    }

    pub fn read_temperature(&mut self) -> Result<Celsius, SensorError> {
        let celsius = self.sensors.read_temperature()?;
        if celsius.is_finite() {
            Ok(Celsius(celsius))
        } else {
            Err(SensorError::Invalid)
        }
    }

    /// Read both sensors, substituting fallback values for failed reads
    ///
    /// An out of range light reading saturates, any other failure reads as zero.
    pub fn sample(&mut self) -> Measurement {
        let mut measurement = Measurement::default();

        match self.read_illuminance() {
            Ok(illuminance) => measurement.illuminance = illuminance,
            Err(err) => {
                warn!("light sensor: {}", err);
                if let SensorError::OutOfRange(_) = err {
                    measurement.illuminance = Illuminance(u8::MAX);
                }
                measurement.error = Some(err);
            }
        }

        match self.read_temperature() {
            Ok(temperature) => measurement.temperature = temperature,
            Err(err) => {
                warn!("temperature sensor: {}", err);
                measurement.error = Some(err);
            }
        }

        measurement
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }
}
