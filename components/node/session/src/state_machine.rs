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

//! Join state transitions
//!
//! ```text
//! Unjoined --join request accepted--> JoinPending --accepted--> Joined
//!    ^                                     |
//!    +---------------denied----------------+  (new join request in the same event)
//! ```

use crate::*;

impl<R, T, S, I> DeviceSession<R, T, S, I>
where
    R: RadioStack,
    T: TimerService,
    S: Sensors,
    I: Indicator,
{
    /// Ask the stack to join, enters `JoinPending` if the request is accepted
    ///
    /// A rejected request leaves the state as it is. This includes the stack refusing a join while
    /// another one is still in progress. The application timer is armed so the next expiry
    /// retries the join.
    pub(crate) fn request_join(&mut self, now: TimeMs) -> Result<(), Error> {
        match self.radio.join(self.config.join_mode) {
            Ok(()) => {
                info!("join request sent to the network server");
                self.set_state(now, SessionState::JoinPending);
                Ok(())
            }
            Err(err) => {
                warn!("join request rejected: {}", err);
                if let Err(timer_err) = self.arm_timer() {
                    error!("unable to schedule the join retry: {}", timer_err);
                }
                Err(Error::RequestRejected(err))
            }
        }
    }

    pub(crate) fn on_join_outcome(&mut self, now: TimeMs, accepted: bool) -> Result<(), Error> {
        if accepted {
            info!("join successful");
            self.set_state(now, SessionState::Joined);
            self.show(now, Outcome::Joined);
            if let Err(err) = self.arm_timer() {
                error!("unable to start the application timer: {}", err);
                return Err(err);
            }
            Ok(())
        } else {
            warn!("join denied, trying to join again");
            self.set_state(now, SessionState::Unjoined);
            self.show(now, Outcome::JoinDenied);
            self.request_join(now)?;
            self.show(now, Outcome::JoinRequested);
            Err(Error::JoinDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;

    #[test]
    fn accepted_join_arms_timer_once() {
        let mut session = started_session();
        assert_eq!(session.dispatch(10, join_outcome(true)), Ok(()));

        assert_eq!(session.state(), SessionState::Joined);
        assert_eq!(session.indicator_state(), IndicatorState::default());
        assert_eq!(session.timer().starts, [(TEST_TIMER, APP_TIMEOUT_MS)]);
        assert!(session.is_timer_armed());
    }

    #[test]
    fn repeated_join_success_does_not_rearm() {
        let mut session = started_session();
        session.dispatch(10, join_outcome(true)).unwrap();
        session.dispatch(20, join_outcome(true)).unwrap();

        assert_eq!(session.state(), SessionState::Joined);
        assert_eq!(session.timer().starts.len(), 1);
    }

    #[test]
    fn denied_join_rejoins_immediately() {
        let mut session = started_session();
        assert_eq!(
            session.dispatch(10, join_outcome(false)),
            Err(Error::JoinDenied)
        );

        assert_eq!(session.radio().joins, [JoinMode::Otaa, JoinMode::Otaa]);
        assert_eq!(session.state(), SessionState::JoinPending);
        assert_eq!(
            session.indicator_state(),
            IndicatorState {
                green: true,
                amber: true
            }
        );
        assert!(session.timer().starts.is_empty());
    }

    #[test]
    fn denied_join_with_refused_rejoin_stays_unjoined() {
        let mut session = started_session();
        session.radio_mut().reject_join = Some(StackError::Busy);
        assert_eq!(
            session.dispatch(10, join_outcome(false)),
            Err(Error::RequestRejected(StackError::Busy))
        );

        assert_eq!(session.state(), SessionState::Unjoined);
        assert_eq!(
            session.indicator_state(),
            IndicatorState {
                green: false,
                amber: true
            }
        );
        assert!(session.is_timer_armed());
        assert_eq!(session.timer().starts, [(TEST_TIMER, APP_TIMEOUT_MS)]);
    }

    #[test]
    fn refused_rejoin_is_retried_on_expiry() {
        let mut session = started_session();
        session.radio_mut().reject_join = Some(StackError::Busy);
        session.dispatch(10, join_outcome(false)).unwrap_err();

        session.radio_mut().reject_join = None;
        session.timer_mut().expire();
        session.dispatch(60_010, timer_expired()).unwrap();

        assert_eq!(session.radio().joins, [JoinMode::Otaa, JoinMode::Otaa]);
        assert_eq!(session.state(), SessionState::JoinPending);
        assert!(session.radio().sends.is_empty());
        assert_eq!(session.timer().starts.len(), 2);
    }

    #[test]
    fn refused_first_join_is_retried_on_expiry() {
        let mut session = session();
        session.radio_mut().reject_join = Some(StackError::MacPaused);
        session.start(0).unwrap();
        assert_eq!(session.state(), SessionState::Unjoined);
        assert!(session.is_timer_armed());
        assert!(session.radio().joins.is_empty());

        session.radio_mut().reject_join = None;
        session.timer_mut().expire();
        session.dispatch(APP_TIMEOUT_MS, timer_expired()).unwrap();

        assert_eq!(session.radio().joins, [JoinMode::Otaa]);
        assert_eq!(session.state(), SessionState::JoinPending);
        assert!(session.is_timer_armed());
    }

    #[test]
    fn refused_join_with_armed_timer_does_not_rearm() {
        let mut session = session();
        session.start(0).unwrap();
        session.set_state(0, SessionState::Unjoined);
        session.radio_mut().reject_join = Some(StackError::Busy);

        // expiry path: the refused join arms once, the rearm after it is skipped
        assert_eq!(
            session.dispatch(100, timer_expired()),
            Err(Error::RequestRejected(StackError::Busy))
        );
        assert_eq!(session.timer().starts.len(), 1);
        assert!(session.is_timer_armed());
    }

    #[test]
    fn denied_join_from_unjoined() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Unjoined);
        session.dispatch(0, join_outcome(false)).unwrap_err();
        assert_eq!(session.radio().joins.len(), 1);
    }

    #[test]
    fn join_after_denials() {
        let mut session = started_session();
        for time in 1..=3 {
            session.dispatch(time, join_outcome(false)).unwrap_err();
        }
        session.dispatch(4, join_outcome(true)).unwrap();

        assert_eq!(session.radio().joins.len(), 4);
        assert_eq!(session.state(), SessionState::Joined);
        assert_eq!(session.indicator_state(), IndicatorState::default());
        assert_eq!(session.timer().starts.len(), 1);
    }
}
