/// Errors that can occur while decoding from a packet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacketError {
    /// A decode requested more bytes than remain in the packet.
    #[error("packet underrun (needed {needed} bytes, {remaining} remaining)")]
    Underrun { needed: usize, remaining: usize },
}

pub type Result<T> = std::result::Result<T, PacketError>;
