//! Snake body - ordered segments plus an occupancy index
//!
//! Segments are kept head first. The index holds `row * FIELD_WIDTH + col`
//! for every segment so membership tests are O(1); it is updated
//! incrementally on every push and pop and rebuilt only when a body is
//! constructed.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::types::{FIELD_HEIGHT, FIELD_WIDTH};

/// A field cell, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_field(self) -> bool {
        (0..FIELD_WIDTH as i32).contains(&self.x) && (0..FIELD_HEIGHT as i32).contains(&self.y)
    }

    /// Occupancy key, only meaningful for cells inside the field
    pub fn key(self) -> usize {
        self.y as usize * FIELD_WIDTH + self.x as usize
    }

    /// Inverse of [`Point::key`]
    pub fn from_key(key: usize) -> Self {
        Self::new((key % FIELD_WIDTH) as i32, (key / FIELD_WIDTH) as i32)
    }

    /// Neighbour one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Body {
    segments: VecDeque<Point>,
    occupied: FxHashSet<usize>,
}

impl Body {
    /// Straight body of `len` segments whose head points along `heading`
    pub fn straight(head: Point, len: usize, heading: Direction) -> Self {
        let back = heading.opposite();
        let mut cell = head;
        let mut cells = Vec::with_capacity(len);
        for _ in 0..len {
            cells.push(cell);
            cell = cell.step(back);
        }
        Self::from_segments(cells)
    }

    /// Body from explicit head-first segments
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let mut body = Self {
            segments: segments.into_iter().collect(),
            occupied: FxHashSet::default(),
        };
        body.rebuild_index();
        body
    }

    /// Recompute the occupancy index from the segments
    pub fn rebuild_index(&mut self) {
        self.occupied.clear();
        self.occupied.extend(
            self.segments
                .iter()
                .filter(|p| p.in_field())
                .map(|p| p.key()),
        );
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> Option<Point> {
        self.segments.front().copied()
    }

    pub fn tail(&self) -> Option<Point> {
        self.segments.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.segments.iter()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.in_field() && self.occupied.contains(&p.key())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Whether moving the head onto `p` runs into the body
    ///
    /// With `tail_vacates` the current tail does not count, since it moves
    /// away on the same step.
    pub fn hits(&self, p: Point, tail_vacates: bool) -> bool {
        if !self.contains(p) {
            return false;
        }
        !(tail_vacates && self.tail() == Some(p))
    }

    pub fn push_head(&mut self, p: Point) {
        self.segments.push_front(p);
        if p.in_field() {
            self.occupied.insert(p.key());
        }
    }

    pub fn pop_tail(&mut self) -> Option<Point> {
        let tail = self.segments.pop_back()?;
        if tail.in_field() {
            self.occupied.remove(&tail.key());
        }
        Some(tail)
    }

    /// Cells not covered by the body, in key order
    pub fn free_cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..FIELD_WIDTH * FIELD_HEIGHT)
            .filter(move |key| !self.occupied.contains(key))
            .map(Point::from_key)
    }

    /// Index matches the segments exactly
    pub fn is_consistent(&self) -> bool {
        self.occupied.len() == self.segments.len()
            && self.segments.iter().all(|p| self.contains(*p))
    }
}
