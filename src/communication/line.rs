use crate::target::Orientation;

pub const LINE_END: u8 = b'\n';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotatorCommand {
    /// Move to the given azimuth and elevation
    Target(Orientation),
    /// Move to the given azimuth, elevation is set to 0 by the rotator
    TargetAzimuth(i32),
    GetOrientation,
    /// Stop the motors by ramping down
    Stop,
    EmergencyStop,
    /// Move to (0,0)
    Home,
    Help,
}

#[derive(Clone, Copy, strum::FromRepr)]
#[repr(u8)]
pub enum CommandHeader {
    Target = b't',
    GetOrientation = b'g',
    Stop = b's',
    EmergencyStop = b'e',
    Home = b'h',
    Help = b'?',
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Empty input")]
    EmptyLine,
    #[error("Unknown command {0:?}")]
    UnknownCommand(char),
    #[error("Invalid number {0:?}")]
    InvalidNumber(String),
    #[error("Unexpected arguments {0:?}")]
    UnexpectedArguments(String),
}

impl RotatorCommand {
    pub const fn header(&self) -> u8 {
        let header = match self {
            RotatorCommand::Target(_) | RotatorCommand::TargetAzimuth(_) => CommandHeader::Target,
            RotatorCommand::GetOrientation => CommandHeader::GetOrientation,
            RotatorCommand::Stop => CommandHeader::Stop,
            RotatorCommand::EmergencyStop => CommandHeader::EmergencyStop,
            RotatorCommand::Home => CommandHeader::Home,
            RotatorCommand::Help => CommandHeader::Help,
        };
        header as u8
    }

    /// Returns the newline terminated ASCII line for this command
    pub fn serialize(&self) -> Vec<u8> {
        let mut v = vec![self.header()];
        match self {
            RotatorCommand::Target(o) => {
                v.extend(format!("{},{}", o.azimuth, o.elevation).into_bytes());
            }
            RotatorCommand::TargetAzimuth(az) => v.extend(az.to_string().into_bytes()),
            _ => (),
        }
        v.push(LINE_END);
        v
    }

    /// Parses a single command line. The line ending is optional and the command letter is
    /// case insensitive, like the rotator firmware accepts it. A bare line ending asks for help.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        if line.is_empty() {
            return Err(ProtocolError::EmptyLine);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Ok(RotatorCommand::Help);
        }
        let first = line.as_bytes()[0];
        let header = CommandHeader::from_repr(first.to_ascii_lowercase())
            .ok_or(ProtocolError::UnknownCommand(first as char))?;
        let args = &line[1..];

        let command = match header {
            CommandHeader::Target => match args.split_once(',') {
                Some((az, el)) => {
                    RotatorCommand::Target(Orientation::new(parse_degrees(az)?, parse_degrees(el)?))
                }
                None => RotatorCommand::TargetAzimuth(parse_degrees(args)?),
            },
            CommandHeader::GetOrientation => no_args(args, RotatorCommand::GetOrientation)?,
            CommandHeader::Stop => no_args(args, RotatorCommand::Stop)?,
            CommandHeader::EmergencyStop => no_args(args, RotatorCommand::EmergencyStop)?,
            CommandHeader::Home => no_args(args, RotatorCommand::Home)?,
            CommandHeader::Help => no_args(args, RotatorCommand::Help)?,
        };

        Ok(command)
    }
}

impl From<&RotatorCommand> for Vec<u8> {
    fn from(value: &RotatorCommand) -> Self {
        value.serialize()
    }
}

fn parse_degrees(s: &str) -> Result<i32, ProtocolError> {
    s.trim().parse().map_err(|_| ProtocolError::InvalidNumber(s.to_string()))
}

fn no_args(args: &str, command: RotatorCommand) -> Result<RotatorCommand, ProtocolError> {
    if args.trim().is_empty() {
        Ok(command)
    } else {
        Err(ProtocolError::UnexpectedArguments(args.to_string()))
    }
}

/// A line echoed by the rotator. Lines the firmware does not produce for a command are kept
/// as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotatorReply {
    TargetSet(Orientation),
    CurrentOrientation(Orientation),
    Stopping,
    EmergencyStopping,
    Homing,
    Text(String),
}

const TARGET_SET_PREFIX: &str = "set_target:";
const CURRENT_ORIENTATION_PREFIX: &str = "current_orientation:";
const STOPPING: &str = "Stopping motors";
const EMERGENCY_STOPPING: &str = "EMERGENCY Stop motors";
const HOMING: &str = "Move to Home orientation (0,0)";

impl RotatorReply {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        let orientation = |rest: &str| {
            let mut values = rest.split_whitespace().map(str::parse::<i32>);
            match (values.next(), values.next(), values.next()) {
                (Some(Ok(azimuth)), Some(Ok(elevation)), None) => {
                    Some(Orientation { azimuth, elevation })
                }
                _ => None,
            }
        };

        if let Some(o) = trimmed.strip_prefix(TARGET_SET_PREFIX).and_then(orientation) {
            return RotatorReply::TargetSet(o);
        }
        if let Some(o) = trimmed.strip_prefix(CURRENT_ORIENTATION_PREFIX).and_then(orientation) {
            return RotatorReply::CurrentOrientation(o);
        }

        match trimmed {
            STOPPING => RotatorReply::Stopping,
            EMERGENCY_STOPPING => RotatorReply::EmergencyStopping,
            HOMING => RotatorReply::Homing,
            _ => RotatorReply::Text(line.to_string()),
        }
    }
}

impl std::fmt::Display for RotatorReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotatorReply::TargetSet(o) => {
                write!(f, "{TARGET_SET_PREFIX} {} {}", o.azimuth, o.elevation)
            }
            RotatorReply::CurrentOrientation(o) => {
                write!(f, "{CURRENT_ORIENTATION_PREFIX} {} {}", o.azimuth, o.elevation)
            }
            RotatorReply::Stopping => f.write_str(STOPPING),
            RotatorReply::EmergencyStopping => f.write_str(EMERGENCY_STOPPING),
            RotatorReply::Homing => f.write_str(HOMING),
            RotatorReply::Text(t) => f.write_str(t),
        }
    }
}
