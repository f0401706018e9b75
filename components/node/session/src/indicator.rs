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

//! Status LEDs
//!
//! Green signals a request that was accepted by the stack, amber signals a failure. Both off
//! means the last join or transmission completed successfully.

use crate::*;

/// Something that happened to the session which is shown on the LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Session starts, nothing happened yet
    Reset,
    /// Stack accepted a join request
    JoinRequested,
    Joined,
    JoinDenied,
    /// Stack accepted an uplink
    UplinkSubmitted,
    /// Stack refused an uplink
    UplinkRejected,
    Transaction(TransactionStatus),
}

/// LED writes caused by an [`Outcome`], `None` leaves the LED as it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorChange {
    pub green: Option<bool>,
    pub amber: Option<bool>,
}

impl Outcome {
    pub const fn indicator_change(&self) -> IndicatorChange {
        let (green, amber) = match self {
            Outcome::Reset | Outcome::Joined => (Some(false), Some(false)),
            Outcome::JoinRequested => (Some(true), None),
            Outcome::JoinDenied | Outcome::UplinkRejected => (Some(false), Some(true)),
            Outcome::UplinkSubmitted => (Some(true), Some(false)),
            Outcome::Transaction(TransactionStatus::Success) => (Some(false), Some(false)),
            Outcome::Transaction(_) => (None, Some(true)),
        };
        IndicatorChange { green, amber }
    }
}

/// Current LED output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    pub green: bool,
    pub amber: bool,
}

impl IndicatorState {
    pub fn get(&self, color: Color) -> bool {
        match color {
            Color::Green => self.green,
            Color::Amber => self.amber,
        }
    }

    /// LED state after applying `change`
    pub fn with(self, change: IndicatorChange) -> Self {
        Self {
            green: change.green.unwrap_or(self.green),
            amber: change.amber.unwrap_or(self.amber),
        }
    }
}

/// Indicator driver together with the state last written to it
#[derive(Debug)]
pub(crate) struct StatusLeds<I> {
    driver: I,
    state: IndicatorState,
}

impl<I: Indicator> StatusLeds<I> {
    pub(crate) fn new(driver: I) -> Self {
        Self {
            driver,
            state: IndicatorState::default(),
        }
    }

    pub(crate) fn show(&mut self, outcome: Outcome) {
        let change = outcome.indicator_change();
        if let Some(on) = change.green {
            self.driver.set(Color::Green, on);
        }
        if let Some(on) = change.amber {
            self.driver.set(Color::Amber, on);
        }
        self.state = self.state.with(change);
    }

    pub(crate) fn state(&self) -> IndicatorState {
        self.state
    }

    pub(crate) fn driver(&self) -> &I {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockIndicator;

    #[test]
    fn transaction_failures_only_touch_amber() {
        for status in [
            TransactionStatus::NoChannelsFound,
            TransactionStatus::Busy,
            TransactionStatus::Failed(StackError::Other(7)),
        ] {
            let change = Outcome::Transaction(status).indicator_change();
            assert_eq!(change.green, None);
            assert_eq!(change.amber, Some(true));
        }
    }

    #[test]
    fn successful_transaction_clears_both() {
        let state = IndicatorState {
            green: true,
            amber: true,
        };
        let state = state.with(Outcome::Transaction(TransactionStatus::Success).indicator_change());
        assert_eq!(state, IndicatorState::default());
    }

    #[test]
    fn join_denied_then_requested() {
        let state = IndicatorState::default()
            .with(Outcome::JoinDenied.indicator_change())
            .with(Outcome::JoinRequested.indicator_change());
        assert!(state.get(Color::Green));
        assert!(state.get(Color::Amber));
    }

    #[test]
    fn leds_mirror_driver_writes() {
        let mut leds = StatusLeds::new(MockIndicator::default());
        leds.show(Outcome::UplinkSubmitted);
        leds.show(Outcome::Transaction(TransactionStatus::Busy));
        assert_eq!(
            leds.driver().writes,
            [
                (Color::Green, true),
                (Color::Amber, false),
                (Color::Amber, true)
            ]
        );
        assert_eq!(
            leds.state(),
            IndicatorState {
                green: true,
                amber: true
            }
        );
    }
}
