use crate::disjoint_set::DisjointSet;
use crate::status::SiteStatus;
use anyhow::Result;
use percolation_common::SiteState;

// Calculates the linear index of a 1-based (row, col) site on an n x n grid
#[inline(always)]
pub fn get_site_idx(row: usize, col: usize, size: usize) -> Option<usize> {
    if row < 1 || row > size || col < 1 || col > size {
        return None;
    }
    Some((col - 1) + (row - 1) * size)
}

/// Calls `f` with the index of each in-bounds 4-neighbour of (row, col),
/// in the order left, right, up, down.
#[inline(always)]
fn for_each_neighbor<F>(row: usize, col: usize, size: usize, mut f: F)
where
    F: FnMut(usize),
{
    let candidates = [
        (row, col.wrapping_sub(1)),
        (row, col + 1),
        (row.wrapping_sub(1), col),
        (row + 1, col),
    ];
    for (r, c) in candidates {
        if let Some(idx) = get_site_idx(r, c, size) {
            f(idx);
        }
    }
}

/// An N x N grid of sites that open one at a time and track top/bottom connectivity.
///
/// Row 1 is the top and row N the bottom. Connectivity lives in a [`DisjointSet`];
/// the top/bottom flags of a component are OR-ed into its root's status as sites
/// join, so queries only ever look at the root.
#[derive(Debug, Clone)]
pub struct SiteGrid {
    size: usize,
    sets: DisjointSet,
    status: Vec<SiteStatus>,
    open_sites: usize,
    percolated: bool,
}

impl SiteGrid {
    /// Allocates an all-closed grid of side `size`.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            anyhow::bail!("Grid size must be greater than 0.");
        }
        let site_count = size
            .checked_mul(size)
            .ok_or_else(|| anyhow::anyhow!("Grid size {} overflows the site count.", size))?;

        let mut status = Vec::new();
        status
            .try_reserve_exact(site_count)
            .map_err(|e| anyhow::anyhow!("Failed to allocate status grid of {} sites: {}", site_count, e))?;
        status.resize(site_count, SiteStatus::CLOSED);
        let sets = DisjointSet::try_new(site_count)?;

        Ok(Self {
            size,
            sets,
            status,
            open_sites: 0,
            percolated: false,
        })
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of sites, N^2.
    pub fn site_count(&self) -> usize {
        self.status.len()
    }

    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        get_site_idx(row, col, self.size)
    }

    fn expect_index(&self, row: usize, col: usize) -> usize {
        match self.index_of(row, col) {
            Some(idx) => idx,
            None => panic!(
                "site ({}, {}) is outside the {}x{} grid",
                row, col, self.size, self.size
            ),
        }
    }

    /// Opens the site at (row, col).
    ///
    /// Returns `false` without touching anything if the site was already open.
    ///
    /// # Panics
    /// Panics if the coordinates are outside `[1, N] x [1, N]`.
    pub fn open(&mut self, row: usize, col: usize) -> bool {
        let idx = self.expect_index(row, col);
        if self.status[idx].is_open() {
            return false;
        }

        let mut status = SiteStatus::opened_in_row(row, self.size);
        self.status[idx] = status;

        let mut neighbors = [0usize; 4];
        let mut neighbor_count = 0;
        for_each_neighbor(row, col, self.size, |n| {
            neighbors[neighbor_count] = n;
            neighbor_count += 1;
        });

        for &neighbor in &neighbors[..neighbor_count] {
            if !self.status[neighbor].is_open() {
                continue;
            }
            // Pick up the neighbour component's flags before its root may be re-parented.
            let neighbor_root = self.sets.find(neighbor);
            status |= self.status[neighbor_root];
            self.sets.union(idx, neighbor);
        }

        self.status[idx] = status;
        let root = self.sets.find(idx);
        self.status[root] |= status;
        self.open_sites += 1;

        if self.status[root].contains(SiteStatus::PERCOLATING) {
            self.percolated = true;
        }
        true
    }

    /// True if the site itself has been opened.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.status[self.expect_index(row, col)].is_open()
    }

    /// True if the site is open and its component reaches the top row.
    pub fn is_full(&self, row: usize, col: usize) -> bool {
        let idx = self.expect_index(row, col);
        self.status[idx].is_open() && self.component_status(idx).contains(SiteStatus::TOP)
    }

    /// Aggregated status of the component containing `idx`.
    fn component_status(&self, idx: usize) -> SiteStatus {
        self.status[self.sets.root(idx)]
    }

    pub fn open_site_count(&self) -> usize {
        self.open_sites
    }

    /// Sticky: once a grid percolates it keeps reporting so.
    pub fn percolates(&self) -> bool {
        self.percolated
    }

    /// Fraction of sites that are open.
    pub fn threshold(&self) -> f64 {
        self.open_sites as f64 / self.site_count() as f64
    }

    /// Display state of a single site.
    pub fn site_state(&self, row: usize, col: usize) -> SiteState {
        if self.is_full(row, col) {
            SiteState::Full
        } else if self.is_open(row, col) {
            SiteState::Open
        } else {
            SiteState::Closed
        }
    }

    /// Row-major iterator over every site's display state.
    pub fn states(&self) -> impl Iterator<Item = SiteState> + '_ {
        (1..=self.size).flat_map(move |row| (1..=self.size).map(move |col| self.site_state(row, col)))
    }
}
