use crate::cell::Cell;
use std::num::NonZeroU32;

/// Number of cells on the perimeter of the square ring of the given radius.
pub fn ring_cells_count(radius: NonZeroU32) -> usize {
    8 * radius.get() as usize
}

/// Relative offsets of the square ring of side `2 * radius` around the origin,
/// running clockwise from the top-left corner. Consecutive entries, including
/// the last and the first, are one king move apart.
pub fn ring_offsets(radius: NonZeroU32) -> Vec<Cell> {
    let r = radius.get() as i32;
    let side = 2 * r;

    let top = (0..side).map(|i| Cell::new(-r + i, -r));
    let right = (0..side).map(|i| Cell::new(r, -r + i));
    let bottom = (0..side).map(|i| Cell::new(r - i, r));
    let left = (0..side).map(|i| Cell::new(-r, r - i));

    top.chain(right).chain(bottom).chain(left).collect()
}

/// Slot `start + offset` rounded and wrapped onto a ring of `cells_count` slots.
pub fn spaced_slot(start: usize, offset: f64, cells_count: usize) -> usize {
    (start as f64 + offset).round() as usize % cells_count
}

/// Midpoint between two slots along the shorter of the two arcs joining them.
pub fn arc_midpoint(a: usize, b: usize, cells_count: usize) -> usize {
    let min = a.min(b);
    let max = a.max(b);
    let wrapped_arc = min + cells_count - max;

    if max - min > wrapped_arc {
        spaced_slot(max, 0.5 * wrapped_arc as f64, cells_count)
    } else {
        spaced_slot(0, 0.5 * (min + max) as f64, cells_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn radius(r: u32) -> NonZeroU32 {
        NonZeroU32::new(r).unwrap()
    }

    #[test]
    fn ring_has_eight_r_unique_adjacent_cells() {
        for r in 1..=6 {
            let cells = ring_offsets(radius(r));

            assert_eq!(cells.len(), 8 * r as usize);
            assert_eq!(cells.len(), ring_cells_count(radius(r)));

            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len(), "duplicate cell at radius {}", r);

            for (num, cell) in cells.iter().enumerate() {
                let next = cells[(num + 1) % cells.len()];
                assert_eq!(cell.distance_chebyshev(next), 1, "gap after slot {} at radius {}", num, r);
                assert_eq!(cell.length_chebyshev(), r);
            }
        }
    }

    #[test]
    fn ring_starts_top_left_and_runs_clockwise() {
        let cells = ring_offsets(radius(2));

        assert_eq!(cells[0], Cell::new(-2, -2));
        assert_eq!(cells[4], Cell::new(2, -2));
        assert_eq!(cells[8], Cell::new(2, 2));
        assert_eq!(cells[12], Cell::new(-2, 2));
        assert_eq!(cells[15], Cell::new(-2, -1));
    }

    #[test]
    fn midpoint_takes_shorter_arc() {
        assert_eq!(arc_midpoint(0, 6, 24), 3);
        assert_eq!(arc_midpoint(6, 0, 24), 3);
        assert_eq!(arc_midpoint(18, 0, 24), 21);
        assert_eq!(arc_midpoint(2, 22, 24), 0);
        assert_eq!(arc_midpoint(23, 3, 24), 1);
    }
}
