use alloc::collections::VecDeque;
use core::ops::BitOr;
use hashbrown::HashSet;

use crate::*;

/// Reveals an unmarked cell, flooding through the connected empty region and its numbered border.
///
/// Flagged cells are never revealed by the flood and keep their flag. Every call is an independent traversal starting
/// from the current marks, so it also walks through empty cells that earlier calls already revealed.
pub fn reveal(minefield: &mut Minefield, point: Point) -> RevealOutcome {
    use RevealOutcome::*;

    if !minefield.contains(point) {
        return NoChange;
    }

    let cell = minefield.get(point);
    if cell.mark != CellMark::Unmarked {
        return NoChange;
    }

    minefield.set_mark(point, CellMark::Revealed);
    log::debug!("Reveal cell at {}, info: {:?}", point, cell.info);

    match cell.info {
        CellInfo::Mine => return HitMine,
        CellInfo::Count(_) => return Revealed,
        CellInfo::Empty => {}
    }

    let mut visited = HashSet::new();
    visited.insert(point);
    let mut to_visit: VecDeque<_> = minefield
        .points_surrounding(point)
        .into_iter()
        .filter(|&pos| minefield.get(pos).mark != CellMark::Flagged)
        .collect();
    log::trace!(
        "Starting flood-fill from {}, initial neighbors: {:?}",
        point,
        to_visit
    );

    while let Some(visit_point) = to_visit.pop_front() {
        if !visited.insert(visit_point) {
            continue;
        }

        let visit_cell = minefield.get(visit_point);
        if visit_cell.mark == CellMark::Flagged {
            log::trace!("Skipping flagged cell at {}", visit_point);
            continue;
        }

        minefield.set_mark(visit_point, CellMark::Revealed);
        log::trace!(
            "Flood revealed cell at {}, info: {:?}",
            visit_point,
            visit_cell.info
        );

        // keep going only through cells with no adjacent mines
        if visit_cell.info == CellInfo::Empty {
            to_visit.extend(
                minefield
                    .points_surrounding(visit_point)
                    .into_iter()
                    .filter(|pos| !visited.contains(pos))
                    .filter(|&pos| minefield.get(pos).mark != CellMark::Flagged),
            );
        }
    }

    Revealed
}

/// Chord on a revealed numbered cell: once its flagged neighbors match its count, reveal every other neighbor.
///
/// Trusts the flags, a misplaced flag makes this reveal a mine.
pub fn probe(minefield: &mut Minefield, point: Point) -> RevealOutcome {
    use RevealOutcome::*;

    let cell = minefield.get(point);
    let (CellMark::Revealed, CellInfo::Count(count)) = (cell.mark, cell.info) else {
        return NoChange;
    };

    let surrounding = minefield.points_surrounding(point);
    let flagged = surrounding
        .iter()
        .filter(|&&pos| minefield.get(pos).mark == CellMark::Flagged)
        .count();
    if flagged != usize::from(count) {
        log::trace!(
            "Probe at {} not satisfied, {} of {} flagged",
            point,
            flagged,
            count
        );
        return NoChange;
    }

    surrounding
        .into_iter()
        .map(|neighbor| reveal(minefield, neighbor))
        .fold(NoChange, BitOr::bitor)
}

/// Flags an unmarked cell or clears an existing flag, revealed cells are left alone.
pub fn toggle_flag(minefield: &mut Minefield, point: Point) -> MarkOutcome {
    use MarkOutcome::*;

    if !minefield.contains(point) {
        return NoChange;
    }

    match minefield.get(point).mark {
        CellMark::Unmarked => {
            minefield.set_mark(point, CellMark::Flagged);
            Changed
        }
        CellMark::Flagged => {
            minefield.set_mark(point, CellMark::Unmarked);
            Changed
        }
        CellMark::Revealed => NoChange,
    }
}
