//=======================================================================//
// IMPORTS
//
//=======================================================================//

use serde::{Deserialize, Serialize};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// An axis-aligned rectangular region of the terrain height map, half-open on `right`/`bottom`.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyRect
{
    pub left:   u32,
    pub top:    u32,
    pub right:  u32,
    pub bottom: u32
}

impl DirtyRect
{
    #[inline]
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self
    {
        Self { left, top, right, bottom }
    }

    /// Whever `self` contains no area.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool { self.left >= self.right || self.top >= self.bottom }

    /// The intersection of `self` and `other`, if any.
    #[inline]
    #[must_use]
    fn intersect(&self, other: &Self) -> Option<Self>
    {
        let rect = Self {
            left:   self.left.max(other.left),
            top:    self.top.max(other.top),
            right:  self.right.min(other.right),
            bottom: self.bottom.min(other.bottom)
        };

        (!rect.is_empty()).then_some(rect)
    }

    /// Decomposes `self` minus `other` into up to four non-overlapping rectangles (top, bottom,
    /// left, right slivers around the intersection), pushed onto `out` in that order.
    #[inline]
    fn subtract(&self, other: &Self, out: &mut Vec<Self>)
    {
        let overlap = match self.intersect(other)
        {
            Some(overlap) => overlap,
            None =>
            {
                out.push(*self);
                return;
            }
        };

        if overlap.top > self.top
        {
            out.push(Self::new(self.left, self.top, self.right, overlap.top));
        }

        if overlap.bottom < self.bottom
        {
            out.push(Self::new(self.left, overlap.bottom, self.right, self.bottom));
        }

        if overlap.left > self.left
        {
            out.push(Self::new(self.left, overlap.top, overlap.left, overlap.bottom));
        }

        if overlap.right < self.right
        {
            out.push(Self::new(overlap.right, overlap.top, self.right, overlap.bottom));
        }
    }
}

//=======================================================================//

/// Tracks the minimum non-overlapping cover of the terrain regions that changed since the last
/// drain, so a renderer can stream exactly the pixels that need re-upload.
///
/// Grounded on `original_source/tests/src/edits/set_terrain_area_tests.cpp`'s `dirty_rect_tracker`:
/// inserting a rectangle that overlaps already-tracked rectangles only records the leftover,
/// non-overlapping fragments, in the order the overlapping rectangles were subtracted.
#[must_use]
#[derive(Default, Clone)]
pub struct DirtyRectTracker
{
    rects: Vec<DirtyRect>
}

impl DirtyRectTracker
{
    /// Marks `rect` dirty, decomposing it against the already-tracked rectangles so the stored set
    /// remains non-overlapping.
    #[inline]
    pub fn mark_dirty(&mut self, rect: DirtyRect)
    {
        if rect.is_empty()
        {
            return;
        }

        let mut remaining = vec![rect];

        for existing in &self.rects
        {
            let mut next = Vec::with_capacity(remaining.len());

            for piece in &remaining
            {
                piece.subtract(existing, &mut next);
            }

            remaining = next;

            if remaining.is_empty()
            {
                return;
            }
        }

        self.rects.extend(remaining);
    }

    /// Drains and returns the tracked rectangles, leaving the tracker empty. The renderer is
    /// expected to call this once per upload tick.
    #[inline]
    pub fn drain(&mut self) -> Vec<DirtyRect> { std::mem::take(&mut self.rects) }

    /// Clears the tracked rectangles without returning them. Used by tests to inspect the cover
    /// produced by a single logical operation in isolation.
    #[inline]
    pub fn untracked_clear(&mut self) { self.rects.clear(); }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.rects.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.rects.is_empty() }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[DirtyRect] { &self.rects }
}

//=======================================================================//

/// The world's terrain height map: a square grid of heightfield samples plus the layer-index grid
/// and the dirty-rectangle cover awaiting GPU upload. Texture/material layer authoring and the
/// munge pipeline live outside the core; this struct only stores the height samples the
/// core edits mutate.
#[must_use]
#[derive(Clone, Serialize, Deserialize)]
pub struct Terrain
{
    /// Side length of the square grid.
    pub length:     u32,
    /// Row-major height samples, `length * length` entries.
    pub height_map: Vec<i16>,
    #[serde(skip)]
    pub dirty:      DirtyRectTracker
}

impl Default for Terrain
{
    #[inline]
    fn default() -> Self { Self::new(32) }
}

impl Terrain
{
    /// Returns a new, zeroed `length x length` terrain.
    #[inline]
    pub fn new(length: u32) -> Self
    {
        Self {
            length,
            height_map: vec![0; (length * length) as usize],
            dirty: DirtyRectTracker::default()
        }
    }

    #[inline]
    #[must_use]
    fn index(&self, x: u32, y: u32) -> usize { (y * self.length + x) as usize }

    /// Reads a rectangular area of the height map into a row-major buffer, `width * height`
    /// entries, top-left at `(x, y)`.
    #[inline]
    #[must_use]
    pub fn read_area(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<i16>
    {
        let mut out = Vec::with_capacity((width * height) as usize);

        for row in y..y + height
        {
            for col in x..x + width
            {
                out.push(self.height_map[self.index(col, row)]);
            }
        }

        out
    }

    /// Writes a rectangular area of the height map from a row-major buffer, `width * height`
    /// entries, top-left at `(x, y)`. Does not mark anything dirty: callers own dirty tracking so
    /// a sequence of writes can be marked dirty together.
    #[inline]
    pub fn write_area(&mut self, x: u32, y: u32, width: u32, data: &[i16])
    {
        let height = (data.len() as u32) / width.max(1);

        for row in 0..height
        {
            for col in 0..width
            {
                let idx = self.index(x + col, y + row);
                self.height_map[idx] = data[(row * width + col) as usize];
            }
        }
    }

    /// Marks a rectangular area dirty.
    #[inline]
    pub fn mark_dirty(&mut self, x: u32, y: u32, width: u32, height: u32)
    {
        self.dirty.mark_dirty(DirtyRect::new(x, y, x + width, y + height));
    }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn simple_rect_no_overlap()
    {
        let mut tracker = DirtyRectTracker::default();
        tracker.mark_dirty(DirtyRect::new(0, 0, 8, 8));
        assert_eq!(tracker.as_slice(), &[DirtyRect::new(0, 0, 8, 8)]);
    }

    #[test]
    fn contained_rect_produces_no_fragments()
    {
        let mut tracker = DirtyRectTracker::default();
        tracker.mark_dirty(DirtyRect::new(0, 0, 8, 8));
        tracker.mark_dirty(DirtyRect::new(4, 4, 8, 8));
        assert_eq!(tracker.as_slice(), &[DirtyRect::new(0, 0, 8, 8)]);
    }

    /// A diagonal overlap must decompose into the three non-overlapping slivers left after
    /// subtracting the already-tracked rect, in top/bottom/left/right order.
    #[test]
    fn diagonal_overlap_decomposes_into_three_rects()
    {
        let mut tracker = DirtyRectTracker::default();
        tracker.mark_dirty(DirtyRect::new(0, 0, 8, 8));
        tracker.mark_dirty(DirtyRect::new(4, 4, 12, 12));

        assert_eq!(
            tracker.as_slice(),
            &[
                DirtyRect::new(0, 0, 8, 8),
                DirtyRect::new(4, 8, 12, 12),
                DirtyRect::new(8, 4, 12, 8)
            ]
        );
    }

    #[test]
    fn right_overlap_decomposes_into_one_rect()
    {
        let mut tracker = DirtyRectTracker::default();
        tracker.mark_dirty(DirtyRect::new(0, 0, 8, 8));
        tracker.mark_dirty(DirtyRect::new(4, 0, 12, 7));

        assert_eq!(
            tracker.as_slice(),
            &[DirtyRect::new(0, 0, 8, 8), DirtyRect::new(8, 0, 12, 7)]
        );
    }

    #[test]
    fn drain_empties_the_tracker()
    {
        let mut tracker = DirtyRectTracker::default();
        tracker.mark_dirty(DirtyRect::new(0, 0, 8, 8));
        assert_eq!(tracker.drain().len(), 1);
        assert!(tracker.is_empty());
    }
}
