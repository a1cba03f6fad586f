//! Chess-Device: a single-player chess engine behind a line protocol.
//!
//! A client plays one color against the engine. Every command is one text
//! line; the engine enforces piece movement, captures, promotion, check and
//! checkmate, and answers with a short status token or a board snapshot.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, the fixed piece layout, protocol limits
//! - [`board`] - Squares, piece records, and the occupancy grid
//! - [`movegen`] - Candidate destinations per piece kind
//! - [`rules`] - Move validation, check detection, the engine's move choice
//! - [`protocol`] - Command decoding and reply tokens
//! - [`game`] - Turn order and game state
//! - [`device`] - Lockable game channels and the instance pool
//!
//! ## Example
//!
//! ```
//! use chess_device::device::Device;
//!
//! let dev = Device::new(0);
//! dev.write(b"00 W\n");
//! assert_eq!(dev.read(), "OK\n");
//!
//! dev.write(b"02 WPe2-e4\n");
//! assert_eq!(dev.read(), "OK\n");
//!
//! // The engine answers with its first legal move.
//! dev.write(b"03\n");
//! assert_eq!(dev.read(), "OK\n");
//! ```

pub mod board;
pub mod constants;
pub mod device;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod rules;
