//! Wire protocol: inbound event schemas, outbound intents, Socket.IO
//! framing.

pub mod inbound;
pub mod outbound;
pub mod socket_io;

pub use inbound::InboundEvent;
pub use outbound::Outbound;
pub use socket_io::Packet;
