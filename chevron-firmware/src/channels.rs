//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use chevron_protocol::{CanonicalCommand, LINE_CAPACITY};

/// Channel capacity for forwarded commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// A canonical command line received on the link
pub type Command = CanonicalCommand<LINE_CAPACITY>;

/// Commands handed from the receive task to the command task
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();
