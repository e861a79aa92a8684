use std::ops::{BitOr, BitOrAssign};

/// Per-site status: a set of independent flags combined with `|`.
///
/// The numeric values match the classic byte encoding (closed 0, open 4, open and
/// bottom-connected 5, open and top-connected 6, percolating 7) so a status can be
/// logged as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SiteStatus(u8);

impl SiteStatus {
    pub const CLOSED: SiteStatus = SiteStatus(0);
    pub const BOTTOM: SiteStatus = SiteStatus(1);
    pub const TOP: SiteStatus = SiteStatus(2);
    pub const OPEN: SiteStatus = SiteStatus(4);
    /// Open and connected to both the top and the bottom row.
    pub const PERCOLATING: SiteStatus = SiteStatus(7);

    /// Status of a freshly opened site in `row` (1-based) of a grid with `size` rows.
    pub fn opened_in_row(row: usize, size: usize) -> SiteStatus {
        let mut status = SiteStatus::OPEN;
        if row == 1 {
            status |= SiteStatus::TOP;
        }
        if row == size {
            status |= SiteStatus::BOTTOM;
        }
        status
    }

    /// True if every flag in `other` is also set in `self`.
    pub fn contains(self, other: SiteStatus) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_open(self) -> bool {
        self.contains(SiteStatus::OPEN)
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for SiteStatus {
    type Output = SiteStatus;

    fn bitor(self, rhs: SiteStatus) -> SiteStatus {
        SiteStatus(self.0 | rhs.0)
    }
}

impl BitOrAssign for SiteStatus {
    fn bitor_assign(&mut self, rhs: SiteStatus) {
        self.0 |= rhs.0;
    }
}
