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

use serde::{Deserialize, Serialize};

use crate::*;

/// Value read from the debugger chip when no EUI is programmed
pub const UNPROGRAMMED_EUI: Eui64 = [0xff; 8];

/// OTAA credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    pub dev_eui: Eui64,
    pub app_eui: Eui64,
    pub app_key: AesKey,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            dev_eui: DEFAULT_DEV_EUI,
            app_eui: DEFAULT_APP_EUI,
            app_key: DEFAULT_APP_KEY,
        }
    }
}

impl DeviceIdentity {
    /// Take the device EUI from `source` unless it is unprogrammed
    pub fn resolve(configured: &DeviceIdentity, source: &mut impl EuiSource) -> Self {
        let eui = source.read_eui64();
        if eui == UNPROGRAMMED_EUI {
            warn!("no device EUI programmed, using configured one");
            *configured
        } else {
            Self {
                dev_eui: eui,
                ..*configured
            }
        }
    }

    /// Device EUI as number, used to tag event log lines
    pub fn device_id(&self) -> u64 {
        u64::from_be_bytes(self.dev_eui)
    }
}
