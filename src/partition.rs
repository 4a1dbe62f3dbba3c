//! Splitting open water after a trail closes.
//!
//! Trail, border and claimed cells are walls. The open cells touching the
//! closed trail are grouped into 4-connected regions; one region stays open and
//! every other region is claimed together with the trail itself.

use crate::entity::Position;
use crate::grid::{CellState, Grid};
use crate::trail::Trail;
use serde::Serialize;

/// One connected patch of open water.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    cells: Vec<Position>,
    roamers: usize,
}

impl Region {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn roamers(&self) -> usize {
        self.roamers
    }
}

/// Collects every open cell 4-connected to `start`, marking them in `visited`.
/// Uses an explicit stack so call depth stays flat on large fields.
pub fn open_component(grid: &Grid, start: Position, visited: &mut [bool]) -> Vec<Position> {
    let mut region = Vec::new();
    let Some(start_index) = grid.index(start) else {
        return region;
    };
    if visited[start_index] || grid.classify(start) != CellState::Open {
        return region;
    }

    visited[start_index] = true;
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        region.push(pos);
        for next in grid.neighbors4(pos) {
            let Some(index) = grid.index(next) else {
                continue;
            };
            if visited[index] || grid.classify(next) != CellState::Open {
                continue;
            }
            visited[index] = true;
            stack.push(next);
        }
    }
    region
}

/// Open regions bordering a closed trail, labelled per cell.
#[derive(Debug, Clone)]
pub struct RegionMap {
    labels: Vec<Option<usize>>,
    regions: Vec<Region>,
}

impl RegionMap {
    pub fn around_trail(grid: &Grid, trail: &Trail, roamers: &[Position]) -> Self {
        let mut visited = vec![false; grid.len()];
        let mut labels = vec![None; grid.len()];
        let mut regions = Vec::new();

        for &point in trail.points() {
            for seed in grid.neighbors4(point) {
                let cells = open_component(grid, seed, &mut visited);
                if cells.is_empty() {
                    continue;
                }
                let label = regions.len();
                for &cell in &cells {
                    if let Some(index) = grid.index(cell) {
                        labels[index] = Some(label);
                    }
                }
                regions.push(Region { cells, roamers: 0 });
            }
        }

        for &roamer in roamers {
            if let Some(label) = grid.index(roamer).and_then(|index| labels[index]) {
                regions[label].roamers += 1;
            }
        }

        Self { labels, regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_at(&self, grid: &Grid, pos: Position) -> Option<usize> {
        grid.index(pos).and_then(|index| self.labels[index])
    }

    fn touches(&self, grid: &Grid, label: usize, pos: Position) -> bool {
        grid.neighbors4(pos)
            .chain(std::iter::once(pos))
            .any(|cell| self.region_at(grid, cell) == Some(label))
    }

    /// The region that stays open. Regions holding roamers are preferred,
    /// then the larger one; on equal size the region next to the player loses
    /// (it gets claimed) and scan order settles the rest.
    ///
    /// A trail closing head-on into a border or claimed wall leaves the player
    /// with no open 4-neighbour, so scan order is the usual tie-breaker.
    pub fn kept_region(&self, grid: &Grid, player: Position) -> Option<usize> {
        let any_roamers = self.regions.iter().any(|region| region.roamers > 0);

        let mut kept: Option<(usize, (usize, bool))> = None;
        for (label, region) in self.regions.iter().enumerate() {
            if any_roamers && region.roamers == 0 {
                continue;
            }
            let rank = (region.len(), !self.touches(grid, label, player));
            if kept.map_or(true, |(_, best)| rank > best) {
                kept = Some((label, rank));
            }
        }
        kept.map(|(label, _)| label)
    }
}

/// Cells converted by one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub regions_found: usize,
    pub region_cells: usize,
    pub trail_cells: usize,
    /// Roamers left inside a claimed region; they need a new home.
    pub stranded_roamers: usize,
    #[serde(skip)]
    pub changed: Vec<Position>,
}

impl Claim {
    pub fn total(&self) -> usize {
        self.region_cells + self.trail_cells
    }
}

/// Claims the losing side(s) of a closed trail and the trail itself.
///
/// An empty trail changes nothing. A trail that does not separate its region
/// still becomes land but claims no open water.
pub fn commit(grid: &mut Grid, trail: &Trail, roamers: &[Position], player: Position) -> Claim {
    let mut claim = Claim::default();
    if trail.is_empty() {
        return claim;
    }

    let map = RegionMap::around_trail(grid, trail, roamers);
    claim.regions_found = map.regions().len();

    if map.regions().len() > 1 {
        let kept = map.kept_region(grid, player);
        for (label, region) in map.regions().iter().enumerate() {
            if Some(label) == kept {
                continue;
            }
            claim.stranded_roamers += region.roamers();
            for &cell in region.cells() {
                if grid.set_cell(cell, CellState::Claimed).is_ok() {
                    claim.region_cells += 1;
                    claim.changed.push(cell);
                }
            }
        }
    } else {
        log::debug!(
            "trail of {} cells did not split open water ({} regions)",
            trail.len(),
            claim.regions_found
        );
    }

    for &point in trail.points() {
        if grid.classify(point) == CellState::Trail
            && grid.set_cell(point, CellState::Claimed).is_ok()
        {
            claim.trail_cells += 1;
            claim.changed.push(point);
        }
    }

    log::debug!(
        "claimed {} region cells and {} trail cells out of {} regions",
        claim.region_cells,
        claim.trail_cells,
        claim.regions_found
    );
    claim
}
