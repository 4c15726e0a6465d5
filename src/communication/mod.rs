mod line;
pub use line::{CommandHeader, ProtocolError, RotatorCommand, RotatorReply, LINE_END};

use std::{
    io::{Read, Write},
    time::Duration,
};

pub type ComResult<T> = Result<T, CommunicationError>;

/// A line based connection to the rotator controller
pub trait RotatorLink: Read + Write {
    /// Returns the number of bytes the controller sent which have not been read yet
    fn bytes_waiting(&mut self) -> ComResult<u32>;

    /// Sets how long a single read waits for the controller before giving up
    fn set_timeout(&mut self, timeout: Duration) -> ComResult<()>;

    fn send_command(&mut self, command: &RotatorCommand) -> ComResult<()> {
        let bytes = Vec::from(command);
        self.write_all(&bytes)?;
        self.flush()?;
        log::debug!("Sent {command:?}");
        Ok(())
    }

    /// Reads a single line, without its line ending. If the read times out, whatever was
    /// received up to then is returned. `None` means nothing arrived at all.
    fn read_line(&mut self) -> ComResult<Option<String>> {
        let mut buffer = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == LINE_END => {
                    buffer.push(LINE_END);
                    break;
                }
                Ok(_) => buffer.push(byte[0]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if buffer.is_empty() {
            return Ok(None);
        }
        if buffer.last() != Some(&LINE_END) {
            log::warn!("Read timed out on incomplete line");
        }

        let line = String::from_utf8_lossy(&buffer);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reads lines as long as the controller has sent data that was not yet read
    fn drain_incoming(&mut self) -> ComResult<Vec<String>> {
        let mut lines = Vec::new();
        while self.bytes_waiting()? > 0 {
            match self.read_line()? {
                Some(line) => lines.push(line),
                None => break,
            }
        }
        Ok(lines)
    }
}

impl RotatorLink for Box<dyn serialport::SerialPort> {
    fn bytes_waiting(&mut self) -> ComResult<u32> {
        Ok(serialport::SerialPort::bytes_to_read(self.as_ref())?)
    }

    fn set_timeout(&mut self, timeout: Duration) -> ComResult<()> {
        Ok(serialport::SerialPort::set_timeout(self.as_mut(), timeout)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    /// The underlying sending or receiving failed. Not recoverable on its own.
    #[error("Serial I/O failed: {0}")]
    Io(std::io::Error),
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),
    #[error("Communication timed out")]
    TimedOut,
}

impl From<std::io::Error> for CommunicationError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::TimedOut => CommunicationError::TimedOut,
            _ => CommunicationError::Io(value),
        }
    }
}
