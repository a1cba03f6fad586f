//! Game channels: the byte-level interface a client talks to.
//!
//! Each [`Device`] owns one [`Game`] and its last reply behind its own mutex.
//! A write runs one whole command while holding that lock, so no other
//! caller can see a half-applied move. A read hands back the last reply and
//! clears it. Devices in a [`DevicePool`] share nothing.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::constants::{MAX_INSTANCES, REPLY_CAPACITY};
use crate::game::Game;
use crate::protocol::{CommandError, frame};

/// Reply held by a device that has not processed any command yet.
pub const NO_MESSAGE: &str = "NOMSG\n";

struct Slot {
    game: Game,
    reply: String,
}

/// One game instance.
pub struct Device {
    number: usize,
    slot: Mutex<Slot>,
}

impl Device {
    pub fn new(number: usize) -> Self {
        let mut reply = String::with_capacity(REPLY_CAPACITY);
        reply.push_str(NO_MESSAGE);
        Self {
            number,
            slot: Mutex::new(Slot {
                game: Game::new(),
                reply,
            }),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// A session is consistent between commands, so a poisoned lock is
    /// still safe to use.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Process one command and store its reply. Returns the bytes consumed.
    pub fn write(&self, buf: &[u8]) -> usize {
        debug!(device = self.number, len = buf.len(), "write");
        let mut slot = self.lock();
        let response = match frame(buf) {
            Ok(line) => slot.game.execute_line(&line),
            Err(e) => CommandError::from(e).response(),
        };
        slot.reply = response.line();
        buf.len()
    }

    /// Take the stored reply, leaving the device with none.
    pub fn read(&self) -> String {
        debug!(device = self.number, "read");
        std::mem::take(&mut self.lock().reply)
    }

    /// Run `f` against the game while holding the device lock.
    pub fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&self.lock().game)
    }
}

/// A fixed set of independent game instances.
pub struct DevicePool {
    devices: Vec<Device>,
}

impl DevicePool {
    /// Create `count` devices, clamped to `1..=MAX_INSTANCES`.
    pub fn new(count: usize) -> Self {
        let clamped = count.clamp(1, MAX_INSTANCES);
        if clamped != count {
            warn!(requested = count, using = clamped, "instance count out of range");
        }
        Self {
            devices: (0..clamped).map(Device::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, number: usize) -> Option<&Device> {
        self.devices.get(number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(dev: &Device, cmd: &str) -> String {
        dev.write(cmd.as_bytes());
        dev.read()
    }

    #[test]
    fn test_initial_reply() {
        let dev = Device::new(0);
        assert_eq!(dev.read(), NO_MESSAGE);
        assert_eq!(dev.read(), "");
    }

    #[test]
    fn test_write_reports_length() {
        let dev = Device::new(0);
        assert_eq!(dev.write(b"00 W\n"), 5);
        assert_eq!(dev.read(), "OK\n");
    }

    #[test]
    fn test_missing_newline() {
        let dev = Device::new(0);
        assert_eq!(roundtrip(&dev, "00 W"), "INVFMT\n");
        assert_eq!(roundtrip(&dev, "\n"), "INVFMT\n");
    }

    #[test]
    fn test_text_after_last_newline_is_dropped() {
        let dev = Device::new(0);
        assert_eq!(roundtrip(&dev, "00 W\n02 WPe2"), "OK\n");
        assert_eq!(roundtrip(&dev, "03\n01"), "OOT\n");
    }

    #[test]
    fn test_non_ascii_code_counts_bytes() {
        let dev = Device::new(0);
        dev.write(&[0xff, b'0', b'\n']);
        assert_eq!(dev.read(), "UNKCMD\n");
        dev.write(&[0xff, 0xfe, 0xfd, b'\n']);
        assert_eq!(dev.read(), "INVFMT\n");
    }

    #[test]
    fn test_reply_replaced_by_each_write() {
        let dev = Device::new(0);
        dev.write(b"00 W\n");
        dev.write(b"05\n");
        assert_eq!(dev.read(), "UNKCMD\n");
    }

    #[test]
    fn test_pool_clamps() {
        assert_eq!(DevicePool::new(0).len(), 1);
        assert_eq!(DevicePool::new(99).len(), MAX_INSTANCES);
        let pool = DevicePool::new(2);
        assert_eq!(pool.get(1).map(Device::number), Some(1));
        assert!(pool.get(2).is_none());
    }

    #[test]
    fn test_devices_are_independent() {
        let pool = DevicePool::new(2);
        let (a, b) = (pool.get(0).unwrap(), pool.get(1).unwrap());
        assert_eq!(roundtrip(a, "00 W\n"), "OK\n");
        assert_eq!(roundtrip(b, "02 WPe2-e4\n"), "NOGAME\n");
        assert_eq!(roundtrip(a, "02 WPe2-e4\n"), "OK\n");
        assert!(b.with_game(|g| g.state() == crate::game::State::NoGame));
    }
}
