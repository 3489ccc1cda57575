use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier for a view bound to a channel.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<ViewId>` to be pointer-optimized
///
/// A `ViewId` is only a routing key: it never keeps the owning channel alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewId(NonZeroU32);

impl ViewId {
    /// Create an id from a 0-based slot index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based slot index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.index())
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Hardware channel identifier (e.g. `"ao0"`, `"port0/line3"`).
///
/// Assigned once when the channel is created and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = ViewId::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_view_id_is_small() {
        assert_eq!(
            core::mem::size_of::<ViewId>(),
            core::mem::size_of::<Option<ViewId>>()
        );
    }

    #[test]
    fn channel_id_display() {
        let id = ChannelId::from("ao3");
        assert_eq!(id.to_string(), "ao3");
        assert_eq!(id.as_str(), "ao3");
    }
}
