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

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{env, fs::File, io::BufReader, path::Path, process, time::Duration};

use timer_queue::TimerQueue;

use node_api::{Event, TimeMs};
use sensor_session::{DeviceSession, IndicatorState, Peripherals, SessionConfig, SessionState};

mod logger;
mod sim;

use crate::sim::*;

type SimSession = DeviceSession<SimRadio, SimTimer, SimSensors, SimIndicator>;

const EVENT_FILE_PATH: &str = "/tmp/session_events.csv";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    seed: u64,
    minutes: u64,
    radio: RadioParams,
    config: SessionConfig,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0,
            minutes: 90,
            radio: RadioParams::default(),
            config: SessionConfig::default(),
        }
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq)]
struct Report {
    state: SessionState,
    indicator: IndicatorState,
    join_requests: usize,
    /// Accepted uplinks with the time they were requested
    uplinks: Vec<(TimeMs, Vec<u8>)>,
    /// Events the session reported an error for
    errors: usize,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if let Err(err) = simulate(&args[1..]) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn simulate(args: &[String]) -> Result<(), String> {
    let args = parse_args(args)?;

    logger::init(log::Level::Trace, Some(Path::new(EVENT_FILE_PATH)))?;

    let report = run(args.config, args.radio, args.minutes, get_rng(args.seed))?;

    println!(
        "state: {}, join requests: {}, uplinks: {}, errors: {}",
        report.state,
        report.join_requests,
        report.uplinks.len(),
        report.errors
    );
    log::logger().flush();
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    if args.len() % 2 != 0 {
        return Err(format!("missing value for argument {}", args[args.len() - 1]));
    }

    let mut parsed = Args::default();
    for chunk in args.chunks_exact(2) {
        let (arg, val) = (&chunk[0], &chunk[1]);
        let invalid = |what: &str| format!("invalid {what}: {val}");
        match arg.as_str() {
            "--seed" => parsed.seed = val.parse().map_err(|_| invalid("rng seed"))?,
            "--time_min" => {
                parsed.minutes = val
                    .parse()
                    .map_err(|_| invalid("number of simulation minutes"))?
            }
            "--join_denial_ppt" => {
                parsed.radio.join_denial_ppt = parse_ppt(val).ok_or_else(|| invalid("ppt"))?
            }
            "--tx_failure_ppt" => {
                parsed.radio.tx_failure_ppt = parse_ppt(val).ok_or_else(|| invalid("ppt"))?
            }
            "--downlink_ppt" => {
                parsed.radio.downlink_ppt = parse_ppt(val).ok_or_else(|| invalid("ppt"))?
            }
            "--config" => parsed.config = load_config(Path::new(val))?,
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }
    Ok(parsed)
}

fn parse_ppt(val: &str) -> Option<u32> {
    val.parse().ok().filter(|ppt| *ppt <= 1000)
}

fn load_config(path: &Path) -> Result<SessionConfig, String> {
    let file =
        File::open(path).map_err(|err| format!("unable to open {}: {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("invalid config {}: {err}", path.display()))
}

fn get_rng(rng_seed: u64) -> ChaCha8Rng {
    println!("RNG seed: {rng_seed:#x}");
    ChaCha8Rng::seed_from_u64(rng_seed)
}

fn run(
    config: SessionConfig,
    radio: RadioParams,
    minutes: u64,
    mut rng: ChaCha8Rng,
) -> Result<Report, String> {
    let mut eui = SimEui::random(&mut rng);
    let peripherals = Peripherals {
        radio: SimRadio::new(radio, ChaCha8Rng::seed_from_u64(rng.next_u64())),
        timer: SimTimer::default(),
        sensors: SimSensors::new(ChaCha8Rng::seed_from_u64(rng.next_u64())),
        indicator: SimIndicator::default(),
    };
    let mut session = SimSession::new(config, &mut eui, peripherals);

    let end: TimeMs = minutes * 60 * 1000;
    let mut time: TimeMs = 0;
    let mut event_queue = TimerQueue::new();
    let mut uplinks = Vec::new();
    let mut errors = 0;

    session
        .start(time)
        .map_err(|err| format!("unable to start session: {err}"))?;
    collect(&mut session, time, &mut event_queue, &mut uplinks);

    while let Some((at, event)) = event_queue.pop() {
        if at > end {
            break;
        }
        assert!(at >= time, "bug: time cannot go backwards");
        time = at;
        info!(
            "{:=^60}",
            format!(
                " {}min {:>7?} ({}ms) ",
                time / (1000 * 60),
                Duration::from_millis(time % (1000 * 60)),
                time
            )
        );

        match &event {
            Event::TimerExpired(id) => session.timer_mut().expire(*id),
            Event::JoinOutcome { .. } | Event::TransactionComplete(_) => {
                session.radio_mut().complete(&event)
            }
            Event::Downlink(_) => {}
        }

        if let Err(err) = session.dispatch(time, event) {
            warn!("{}", err);
            errors += 1;
        }
        assert_eq!(
            session.radio().is_joined(),
            session.state().is_joined(),
            "bug: session and radio stack disagree about the join"
        );
        collect(&mut session, time, &mut event_queue, &mut uplinks);
    }

    Ok(Report {
        state: session.state(),
        indicator: session.indicator_state(),
        join_requests: session.radio().join_requests(),
        uplinks,
        errors,
    })
}

/// Queue the outcomes of the requests the session made at `time`
fn collect(
    session: &mut SimSession,
    time: TimeMs,
    event_queue: &mut TimerQueue<Event>,
    uplinks: &mut Vec<(TimeMs, Vec<u8>)>,
) {
    let pending = session
        .radio_mut()
        .take_pending()
        .into_iter()
        .chain(session.timer_mut().take_pending());
    for Pending { delay, event } in pending {
        debug!("{:?} in {:?}", event, Duration::from_millis(delay));
        event_queue.push(time + delay, event);
    }
    trace!("{} events queued", event_queue.len());
    uplinks.extend(
        session
            .radio_mut()
            .take_sent()
            .into_iter()
            .map(|payload| (time, payload)),
    );
}
