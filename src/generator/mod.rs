use std::{io::Write, time::Duration};

use rand::{rngs::StdRng, Rng};

use crate::communication::{RotatorCommand, RotatorLink, RotatorReply};
use crate::target::{Orientation, TargetGenerator};

mod error;
pub use error::GeneratorError;

type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// How long a single read waits for the rotator
    pub read_timeout: Duration,
    /// Pause before reading the rotator output during startup and shutdown
    pub settle: Duration,
    /// Pause between two targets
    pub interval: Duration,
}

/// What happened during a single iteration of the main loop
#[derive(Debug)]
pub struct StepReport {
    /// Lines the rotator sent since the previous step
    pub echoed: Vec<String>,
    pub target: Orientation,
}

/// Sends random targets to the rotator at a fixed interval and prints everything it sends back
/// to `out`.
pub struct TrafficGenerator<L: RotatorLink, W: Write, R: Rng = StdRng> {
    link: L,
    out: W,
    targets: TargetGenerator<R>,
    pacing: Pacing,
    last_target: Option<Orientation>,
}

impl<L: RotatorLink, W: Write, R: Rng> TrafficGenerator<L, W, R> {
    pub fn new(link: L, out: W, targets: TargetGenerator<R>, pacing: Pacing) -> Self {
        TrafficGenerator { link, out, targets, pacing, last_target: None }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Gives the rotator time to boot, prints its banner and asks for the current orientation.
    /// Returns all lines that were received.
    pub fn startup(&mut self) -> GeneratorResult<Vec<String>> {
        let mut echoed = Vec::new();
        self.link.set_timeout(self.pacing.read_timeout)?;

        std::thread::sleep(self.pacing.settle);
        echoed.extend(self.echo_incoming()?);
        std::thread::sleep(self.pacing.settle);
        echoed.extend(self.echo_incoming()?);

        writeln!(self.out, "get current position")?;
        self.link.send_command(&RotatorCommand::GetOrientation)?;
        std::thread::sleep(self.pacing.settle);
        echoed.extend(self.echo_incoming()?);

        Ok(echoed)
    }

    /// Prints pending output, waits one interval and sends the next random target
    pub fn step(&mut self) -> GeneratorResult<StepReport> {
        let echoed = self.echo_incoming()?;
        std::thread::sleep(self.pacing.interval);

        let target = self.targets.next_target();
        log::info!("Sending target {target}");
        self.link.send_command(&RotatorCommand::Target(target))?;
        self.last_target = Some(target);

        Ok(StepReport { echoed, target })
    }

    /// Waits for the answer to the last target and prints it
    pub fn finish(&mut self) -> GeneratorResult<Vec<String>> {
        std::thread::sleep(self.pacing.settle);
        self.echo_incoming()
    }

    /// Runs the startup sequence followed by the main loop. Without a limit this only returns
    /// on error. Returns the number of targets sent.
    pub fn run(&mut self, iterations: Option<u64>) -> GeneratorResult<u64> {
        self.startup()?;

        let mut sent = 0;
        while iterations.map_or(true, |limit| sent < limit) {
            self.step()?;
            sent += 1;
        }

        self.finish()?;
        log::info!("Sent {sent} targets");
        Ok(sent)
    }

    fn echo_incoming(&mut self) -> GeneratorResult<Vec<String>> {
        let lines = self.link.drain_incoming()?;
        for line in &lines {
            writeln!(self.out, "{line}")?;
            self.log_reply(RotatorReply::parse(line));
        }
        self.out.flush()?;
        Ok(lines)
    }

    fn log_reply(&self, reply: RotatorReply) {
        match &reply {
            RotatorReply::TargetSet(o) => {
                if self.last_target.is_some_and(|t| t != *o) {
                    log::warn!("Rotator confirmed {o}, last target sent was {:?}", self.last_target);
                } else {
                    log::info!("Rotator confirmed target {o}");
                }
            }
            RotatorReply::CurrentOrientation(o) => log::info!("Rotator is at {o}"),
            RotatorReply::EmergencyStopping => log::warn!("Rotator reports emergency stop"),
            RotatorReply::Stopping | RotatorReply::Homing => log::info!("Rotator: {reply}"),
            RotatorReply::Text(t) => log::debug!("Rotator: {t}"),
        }
    }
}
