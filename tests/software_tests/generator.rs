use std::io::{ErrorKind, Write};

use rotator_traffic_gen::{
    communication::RotatorCommand,
    generator::{GeneratorError, TrafficGenerator},
    target::{Orientation, TargetGenerator},
};

use crate::common::*;

#[test]
fn startup_prints_banner_and_queries_orientation() {
    let sim = SimRotator::booted(Orientation::new(145, 0));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "startup");

    let echoed = generator.startup().unwrap();

    assert_eq!(echoed, vec![BANNER[0], BANNER[1], "current_orientation: 145 0"]);
    assert_eq!(generator.link().commands, vec![RotatorCommand::GetOrientation]);
    assert_eq!(
        output_lines(&generator),
        vec![BANNER[0], BANNER[1], "get current position", "current_orientation: 145 0"]
    );
}

#[test]
fn startup_applies_read_timeout() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "timeout");

    generator.startup().unwrap();

    assert_eq!(generator.link().timeout, Some(NO_PACING.read_timeout));
}

#[test]
fn silent_rotator_still_gets_queried() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "silent");

    let echoed = generator.startup().unwrap();

    // Only the answer to `g` arrives
    assert_eq!(echoed, vec!["current_orientation: 0 0"]);
}

#[test]
fn step_sends_target_within_bounds() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let azimuth = bounds(-130, -100);
    let elevation = bounds(0, 25);
    let mut generator = prepare_generator(sim, azimuth, elevation, "step");

    for _ in 0..50 {
        let report = generator.step().unwrap();
        assert!(azimuth.contains(report.target.azimuth), "{}", report.target);
        assert!(elevation.contains(report.target.elevation), "{}", report.target);
    }

    let sim = generator.link();
    assert_eq!(sim.commands.len(), 50);
    assert!(sim.rejected.is_empty(), "{:?}", sim.rejected);
    for command in &sim.commands {
        match command {
            RotatorCommand::Target(o) => {
                assert!(azimuth.contains(o.azimuth) && elevation.contains(o.elevation), "{o}")
            }
            c => panic!("Expected only targets, got {c:?}"),
        }
    }
}

#[test]
fn step_prints_echo_of_previous_target() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "echo");

    let first = generator.step().unwrap();
    assert!(first.echoed.is_empty());

    let second = generator.step().unwrap();
    let expected = format!("set_target: {} {}", first.target.azimuth, first.target.elevation);
    assert_eq!(second.echoed, vec![expected.clone()]);
    assert_eq!(output_lines(&generator), vec![expected]);
}

#[test]
fn run_stops_after_iterations_and_prints_last_echo() {
    let sim = SimRotator::booted(Orientation::new(-120, 5));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "run");

    let sent = generator.run(Some(3)).unwrap();

    assert_eq!(sent, 3);
    let sim = generator.link();
    assert_eq!(sim.commands.len(), 4);
    assert_eq!(sim.commands[0], RotatorCommand::GetOrientation);

    let output = output_lines(&generator);
    let echoes = output.iter().filter(|l| l.starts_with("set_target:")).count();
    assert_eq!(echoes, 3);
    let last = sim.orientation;
    assert_eq!(output.last().unwrap(), &format!("set_target: {} {}", last.azimuth, last.elevation));
}

#[test]
fn zero_iterations_only_queries_orientation() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "zero");

    assert_eq!(generator.run(Some(0)).unwrap(), 0);
    assert_eq!(generator.link().commands, vec![RotatorCommand::GetOrientation]);
}

#[test]
fn unsolicited_output_is_printed_verbatim() {
    let mut sim = SimRotator::new(Orientation::new(0, 0));
    sim.send_line("EMERGENCY Stop motors");
    sim.send_raw(b"partial");
    let mut generator = prepare_generator(sim, bounds(-130, -100), bounds(0, 25), "unsolicited");

    let report = generator.step().unwrap();

    assert_eq!(report.echoed, vec!["EMERGENCY Stop motors", "partial"]);
}

#[test]
fn degenerate_bounds_repeat_the_same_target() {
    let sim = SimRotator::new(Orientation::new(0, 0));
    let mut generator = prepare_generator(sim, bounds(-115, -115), bounds(10, 10), "degenerate");

    generator.run(Some(5)).unwrap();

    let sim = generator.link();
    assert!(sim.commands[1..]
        .iter()
        .all(|c| *c == RotatorCommand::Target(Orientation::new(-115, 10))));
}

#[test]
fn write_timeout_ends_run_as_unresponsive() {
    let targets = TargetGenerator::from_seed(bounds(-130, -100), bounds(0, 25), Some(1));
    let mut generator =
        TrafficGenerator::new(FailingLink::new(ErrorKind::TimedOut), Vec::new(), targets, NO_PACING);

    let result = generator.run(None);

    assert!(matches!(result, Err(GeneratorError::Unresponsive(_))), "{result:?}");
    assert_eq!(generator.link().write_attempts, 1);
    assert_eq!(String::from_utf8_lossy(generator.output()), "get current position\n");
}

#[test]
fn broken_link_ends_run_as_non_recoverable() {
    let targets = TargetGenerator::from_seed(bounds(-130, -100), bounds(0, 25), Some(1));
    let mut generator =
        TrafficGenerator::new(FailingLink::new(ErrorKind::BrokenPipe), Vec::new(), targets, NO_PACING);

    let result = generator.run(None);

    assert!(matches!(result, Err(GeneratorError::NonRecoverable(_))), "{result:?}");
    assert_eq!(generator.link().write_attempts, 1);
}

#[test]
fn bare_line_end_asks_rotator_for_help() {
    let mut sim = SimRotator::new(Orientation::new(0, 0));

    sim.write_all(b"\n").unwrap();

    assert_eq!(sim.commands, vec![RotatorCommand::Help]);
    assert!(sim.rejected.is_empty(), "{:?}", sim.rejected);
}
