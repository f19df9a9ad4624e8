//! End-to-end dispatch scenarios on the virtual clock.

use std::collections::HashSet;
use std::time::Duration;

use liftdispatch::config::{BuildingConfig, Policy};
use liftdispatch::elevio::{CallButton, CallType, RenderCall};
use liftdispatch::error::LiftError;
use liftdispatch::manager::{Assignment, Simulation};
use liftdispatch::world_view::{DoorPhase, Floor, LiftState};
use proptest::prelude::*;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn direct(floors: u8, lifts: u8) -> Simulation {
    Simulation::new(BuildingConfig::new(floors, lifts).unwrap()).unwrap()
}

fn queued(floors: u8, lifts: u8) -> Simulation {
    Simulation::new(BuildingConfig::new(floors, lifts).unwrap().with_policy(Policy::Queue)).unwrap()
}

fn state(sim: &Simulation, lift: u8) -> LiftState {
    sim.view().lift(lift).unwrap().state
}

fn floor(sim: &Simulation, lift: u8) -> Floor {
    sim.view().lift(lift).unwrap().current_floor
}

#[test]
fn travel_takes_unit_time_per_floor() {
    let mut sim = direct(5, 1);
    assert_eq!(sim.submit_request(3), Ok(Assignment::Dispatched(0)));
    assert_eq!(
        sim.renderer().calls[0],
        RenderCall::MoveStart { lift_id: 0, from: 0, to: 3, duration: ms(9000) }
    );

    sim.advance(ms(8999));
    assert_eq!(state(&sim, 0), LiftState::Moving);
    assert_eq!(floor(&sim, 0), 0, "floor only changes on arrival");

    sim.advance(ms(1));
    assert_eq!(state(&sim, 0), LiftState::DoorsOpen);
    assert_eq!(floor(&sim, 0), 3);

    assert_eq!(sim.run_until_idle(), ms(14000));
    assert_eq!(state(&sim, 0), LiftState::Idle);
}

#[test]
fn request_at_current_floor_only_cycles_doors() {
    let mut sim = direct(6, 1);
    sim.submit_request(4).unwrap();
    sim.run_until_idle();
    sim.renderer_mut().clear();
    let start = sim.now();

    assert_eq!(sim.submit_request(4), Ok(Assignment::DoorCycle(0)));
    assert_eq!(state(&sim, 0), LiftState::DoorsOpen);
    sim.step();
    assert_eq!(state(&sim, 0), LiftState::DoorsClosing);
    sim.step();
    assert_eq!(state(&sim, 0), LiftState::Idle);

    assert_eq!(sim.now() - start, ms(5000));
    assert_eq!(sim.renderer().move_count(), 0);
    assert_eq!(
        sim.renderer().calls,
        vec![
            RenderCall::DoorPhase { lift_id: 0, phase: DoorPhase::Open, duration: ms(2500) },
            RenderCall::DoorPhase { lift_id: 0, phase: DoorPhase::Close, duration: ms(2500) },
        ]
    );
}

#[test]
fn second_request_to_single_busy_lift_is_a_no_op() {
    let mut sim = direct(3, 1);
    assert_eq!(sim.submit_request(2), Ok(Assignment::Dispatched(0)));
    assert_eq!(sim.submit_request(0), Err(LiftError::NoAvailableLift { floor: 0 }));

    sim.run_until_idle();
    assert_eq!(floor(&sim, 0), 2);
    assert_eq!(state(&sim, 0), LiftState::Idle);
    assert_eq!(sim.renderer().move_count(), 1);
    assert_eq!(sim.renderer().door_cycle_count(), 1);
    assert_eq!(sim.view().dropped_requests, 1);
}

#[test]
fn repeated_requests_are_not_duplicated() {
    let mut sim = direct(8, 2);
    sim.submit_request(5).unwrap();
    assert_eq!(sim.submit_request(5), Ok(Assignment::AlreadyServed(0)));
    sim.advance(ms(15000));
    // doors open at 5
    assert_eq!(sim.submit_request(5), Ok(Assignment::AlreadyServed(0)));
    assert_eq!(sim.renderer().move_count(), 1);
    assert_eq!(state(&sim, 1), LiftState::Idle);

    let mut sim = queued(8, 1);
    sim.submit_request(5).unwrap();
    sim.submit_request(3).unwrap();
    sim.submit_request(5).unwrap();
    sim.submit_request(3).unwrap();
    assert_eq!(sim.view().lifts[0].pending_stops, vec![5, 3]);
}

#[test]
fn nearest_idle_lift_after_real_moves() {
    let mut sim = direct(10, 3);
    assert_eq!(sim.submit_request(9), Ok(Assignment::Dispatched(0)));
    assert_eq!(sim.submit_request(5), Ok(Assignment::Dispatched(1)));
    sim.run_until_idle();
    let floors: Vec<Floor> = sim.view().lifts.iter().map(|l| l.current_floor).collect();
    assert_eq!(floors, vec![9, 5, 0]);

    assert_eq!(sim.dispatcher().nearest_idle(6), Some(1));
    assert_eq!(sim.dispatcher().nearest_idle(7), Some(0), "tie goes to the lower id");
    assert_eq!(sim.dispatcher().nearest_idle(2), Some(2));
}

#[test]
fn queue_policy_stops_on_the_way() {
    let mut sim = queued(8, 1);
    assert_eq!(sim.submit_request(5), Ok(Assignment::Queued(0)));
    assert_eq!(sim.submit_request(2), Ok(Assignment::Queued(0)));

    sim.advance(ms(4000));
    assert_eq!(floor(&sim, 0), 2);
    assert_eq!(state(&sim, 0), LiftState::DoorsOpen);

    assert_eq!(sim.run_until_idle(), ms(20000));
    assert_eq!(floor(&sim, 0), 5);
    assert!(sim.view().is_quiescent());
}

#[test]
fn queue_policy_never_drops() {
    let mut sim = queued(6, 1);
    sim.submit_request(5).unwrap();
    sim.submit_request(1).unwrap();
    sim.submit_request(3).unwrap();
    sim.run_until_idle();
    assert_eq!(sim.view().dropped_requests, 0);
    assert!(sim.view().is_quiescent());
    assert_eq!(sim.renderer().door_cycle_count(), 3);
}

#[test]
fn regenerate_discards_in_flight_timers() {
    let mut sim = direct(6, 1);
    sim.submit_request(4).unwrap();
    sim.advance(ms(1000));
    assert_eq!(sim.pending_timers(), 1);

    let config = BuildingConfig::new(10, 3).unwrap();
    sim.regenerate(config).unwrap();
    sim.renderer_mut().clear();

    let view = sim.view();
    assert_eq!(view.generation, 1);
    assert_eq!(view.get_num_lifts(), 3);
    assert!(view.is_quiescent());

    sim.run_until_idle();
    assert!(sim.renderer().calls.is_empty());
    assert!(sim.view().lifts.iter().all(|l| l.current_floor == 0));
}

#[test]
fn hall_buttons_are_validated() {
    let mut sim = direct(4, 1);
    let top_up = CallButton { floor: 3, call_type: CallType::UP };
    assert!(matches!(sim.submit_call(top_up), Err(LiftError::InvalidCall { .. })));

    let outside = CallButton { floor: 7, call_type: CallType::DOWN };
    assert!(matches!(sim.submit_call(outside), Err(LiftError::InvalidFloor { .. })));
    assert!(sim.renderer().calls.is_empty());

    let down = CallButton { floor: 3, call_type: CallType::DOWN };
    assert_eq!(sim.submit_call(down), Ok(Assignment::Dispatched(0)));
}

#[test]
fn invalid_floor_touches_nothing() {
    let mut sim = direct(4, 2);
    assert_eq!(sim.submit_request(4), Err(LiftError::InvalidFloor { floor: 4, floor_count: 4 }));
    assert_eq!(sim.pending_timers(), 0);
    assert_eq!(sim.view().dropped_requests, 0);
}

/// Runs `requests` against a queue building, firing `gaps[i]` timers after each request, and
/// checks that every lift passes through DoorsOpen between Moving and Idle and that every
/// requested floor gets its doors opened.
fn check_queue_run(floors: u8, lifts: u8, requests: &[Floor], gaps: &[usize]) -> Result<(), TestCaseError> {
    let mut sim = queued(floors, lifts);
    let mut last: Vec<LiftState> = vec![LiftState::Idle; lifts as usize];
    let mut opened: HashSet<Floor> = HashSet::new();

    let mut observe = |sim: &Simulation, last: &mut Vec<LiftState>| -> Result<(), TestCaseError> {
        for lift in &sim.view().lifts {
            let prev = last[lift.lift_id as usize];
            prop_assert!(
                !(prev == LiftState::Moving && lift.state == LiftState::Idle),
                "lift {} went from Moving to Idle", lift.lift_id
            );
            if lift.state == LiftState::DoorsOpen {
                opened.insert(lift.current_floor);
            }
            last[lift.lift_id as usize] = lift.state;
        }
        Ok(())
    };

    for (&request, &gap) in requests.iter().zip(gaps) {
        prop_assert!(sim.submit_request(request).is_ok());
        observe(&sim, &mut last)?;
        for _ in 0..gap {
            if sim.step().is_none() {
                break;
            }
            observe(&sim, &mut last)?;
        }
    }
    while sim.step().is_some() {
        observe(&sim, &mut last)?;
    }

    prop_assert!(sim.view().is_quiescent());
    prop_assert_eq!(sim.view().dropped_requests, 0);
    for floor in requests {
        prop_assert!(opened.contains(floor), "floor {} never served", floor);
    }
    Ok(())
}

proptest! {
    #[test]
    fn queue_runs_serve_every_request(
        lifts in 1u8..4,
        requests in proptest::collection::vec(0u8..8, 1..12),
        gaps in proptest::collection::vec(0usize..6, 12),
    ) {
        check_queue_run(8, lifts, &requests, &gaps)?;
    }
}
