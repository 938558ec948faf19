//! Core data model: operations, size groups, and device context.

/// A benchmarked flash operation.
///
/// The raw results log spells the program operation as either `program` or
/// `write`; both normalise to [`Operation::Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A read from the chip.
    Read,
    /// A page program (write).
    Program,
    /// A sector/block/chip erase.
    Erase,
}

impl Operation {
    /// Parse a raw log token into an [`Operation`], normalising
    /// `"write"` to [`Operation::Program`]. Returns `None` for anything
    /// else.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "read" => Some(Self::Read),
            "program" | "write" => Some(Self::Program),
            "erase" => Some(Self::Erase),
            _ => None,
        }
    }

    /// The lowercase report column name for this operation.
    pub fn column(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Program => "write",
            Self::Erase => "erase",
        }
    }
}

/// A closed size-group enumeration. `Whole` resolves to the observed
/// device capacity and is only ever reachable when that capacity is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeGroup {
    /// 1 byte.
    B1,
    /// 256 bytes.
    B256,
    /// 4 KiB.
    K4,
    /// 32 KiB.
    K32,
    /// 64 KiB.
    K64,
    /// The full device capacity.
    Whole,
}

impl SizeGroup {
    /// All size groups, in the closed report order.
    pub const ALL: [SizeGroup; 6] = [
        SizeGroup::B1,
        SizeGroup::B256,
        SizeGroup::K4,
        SizeGroup::K32,
        SizeGroup::K64,
        SizeGroup::Whole,
    ];

    /// The fixed byte width of this group, or `None` for [`SizeGroup::Whole`]
    /// absent a known capacity (callers should use [`SizeGroup::classify`]
    /// instead of calling this directly for classification).
    pub fn fixed_bytes(self) -> Option<u64> {
        match self {
            SizeGroup::B1 => Some(1),
            SizeGroup::B256 => Some(256),
            SizeGroup::K4 => Some(4096),
            SizeGroup::K32 => Some(32768),
            SizeGroup::K64 => Some(65536),
            SizeGroup::Whole => None,
        }
    }

    /// Classify a byte size into a group given the device's total capacity
    /// (`0` meaning "unknown", which disables [`SizeGroup::Whole`]).
    /// Returns `None` if `size_bytes` matches none of the fixed widths and
    /// isn't the (known) whole-device size.
    pub fn classify(size_bytes: u64, capacity_bytes: u64) -> Option<Self> {
        for group in [
            SizeGroup::B1,
            SizeGroup::B256,
            SizeGroup::K4,
            SizeGroup::K32,
            SizeGroup::K64,
        ] {
            if group.fixed_bytes() == Some(size_bytes) {
                return Some(group);
            }
        }
        if capacity_bytes > 0 && size_bytes == capacity_bytes {
            return Some(SizeGroup::Whole);
        }
        None
    }

    /// The report row suffix for this group, e.g. `"4096B"` or `"WHOLE"`.
    pub fn label(self) -> &'static str {
        match self {
            SizeGroup::B1 => "1B",
            SizeGroup::B256 => "256B",
            SizeGroup::K4 => "4096B",
            SizeGroup::K32 => "32768B",
            SizeGroup::K64 => "65536B",
            SizeGroup::Whole => "WHOLE",
        }
    }
}

/// The device-context value type (§6): what the firmware already knows
/// about the chip under test, independent of the benchmark samples.
#[derive(Debug, Clone, Default)]
pub struct DeviceContext {
    /// Observed JEDEC id, normalised the same way as catalogue rows
    /// (see [`crate::catalogue::normalise_jedec`]). `None` means unknown.
    pub jedec_norm_observed: Option<String>,
    /// Observed SPI clock in MHz. `0.0` (or absent) disables read matching.
    pub sck_mhz: f64,
    /// Observed device capacity in bytes. `0` disables WHOLE classification.
    pub capacity_bytes: u64,
}

impl DeviceContext {
    /// Whether read-timing matching is enabled for this context.
    pub fn read_matching_enabled(&self) -> bool {
        self.sck_mhz > 0.0
    }
}
