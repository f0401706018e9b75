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
    /// Only the LEDs react, a failed uplink is not repeated before the next timer expiry
    pub(crate) fn on_transaction_complete(
        &mut self,
        now: TimeMs,
        status: TransactionStatus,
    ) -> Result<(), Error> {
        event_log_transaction!(now, self.device_id(), transaction_status_as_json(&status));
        self.show(now, Outcome::Transaction(status));
        match TransmitFailure::from_status(status) {
            None => {
                info!("transmission success");
                Ok(())
            }
            Some(failure) => {
                warn!("transmission failed: {}", failure);
                Err(Error::TransmitFailed(failure))
            }
        }
    }

    /// Downlink content is only logged
    pub(crate) fn on_downlink(&self, downlink: &Downlink) -> Result<(), Error> {
        if let Err(err) = downlink.status {
            warn!("downlink reception failed: {}", err);
            return Ok(());
        }
        match downlink.port() {
            Some(port) => {
                info!(
                    "received downlink on port {}, length {}, payload: {}",
                    port,
                    downlink.data.len(),
                    Hex(downlink.payload())
                );
            }
            None => info!("received ack for confirmed data"),
        }
        Ok(())
    }
}

fn transaction_status_as_json(status: &TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Success => "\"success\"",
        TransactionStatus::NoChannelsFound => "\"no_channels_found\"",
        TransactionStatus::Busy => "\"busy\"",
        TransactionStatus::Failed(_) => "\"failed\"",
    }
}
