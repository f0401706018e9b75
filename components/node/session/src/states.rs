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

/// Network join state
///
/// There is no failed state: a denied join immediately starts a new attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unjoined,
    /// Join request accepted by the stack, waiting for the outcome
    JoinPending,
    Joined,
}

impl SessionState {
    pub fn is_joined(&self) -> bool {
        *self == SessionState::Joined
    }

    fn state_as_string(&self) -> &'static str {
        match self {
            SessionState::Unjoined => "Unjoined",
            SessionState::JoinPending => "JoinPending",
            SessionState::Joined => "Joined",
        }
    }
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(fmt, "{}", self.state_as_string())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SessionState {
    fn format(&self, fmt: defmt::Formatter) {
        use defmt::write;
        write!(fmt, "{}", self.state_as_string())
    }
}
