//! Wire protocol
//!
//! JSON frames with a `type` discriminator, one enum per direction.

mod messages;

pub use messages::{decode_frame, DecodedFrame, FrameError, InboundMessage, OutboundEvent, WireFrame};
