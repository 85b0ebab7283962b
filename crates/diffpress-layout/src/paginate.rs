// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagination engine.
//
// Consumes measured blocks and distributes them over pages of fixed capacity.
// Every decision is made from block heights alone; nothing is drawn and then
// undone.
//
// Unified view:
// - A file that does not fit the remaining space but fits a fresh page starts
//   a fresh page.
// - Otherwise blocks flow. Badges and headers break to a new page when they
//   do not fit; line groups split between logical lines.
// - A hunk that fits a fresh page but not the remaining space starts a fresh
//   page (when `keep_hunks_together` is set).
// - A hunk header is only placed where its first `min_lines_after_header`
//   lines fit below it. A file badge reserves room for whatever its first
//   header would ask for, so no page ends with a badge.
//
// Side-by-side view uses plain flow only.

use std::ops::Range;

use diffpress_core::ViewMode;
use tracing::{debug, instrument, warn};

use crate::blocks::{Block, BlockKind};

/// Tolerance for comparing accumulated heights.
const EPS: f32 = 1e-3;

/// A block (or a slice of a line group) placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    /// Index into the block sequence that was paginated.
    pub block: usize,
    /// Top of the block, measured down from the top of the content box.
    pub y: f32,
    pub height: f32,
    /// Logical lines of a line group shown here; `None` for atomic blocks.
    pub lines: Option<Range<usize>>,
}

/// One page of positioned blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub blocks: Vec<PlacedBlock>,
    /// Consumed vertical space, gaps included.
    pub used: f32,
    pub capacity: f32,
}

impl Page {
    fn new(capacity: f32) -> Self {
        Self {
            blocks: Vec::new(),
            used: 0.0,
            capacity,
        }
    }

    pub fn remaining(&self) -> f32 {
        (self.capacity - self.used).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn fits(&self, height: f32) -> bool {
        height <= self.remaining() + EPS
    }
}

/// Knobs of the placement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub view: ViewMode,
    /// Code lines that must follow a hunk header on its page.
    pub min_lines_after_header: usize,
    pub keep_hunks_together: bool,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            view: ViewMode::Unified,
            min_lines_after_header: 2,
            keep_hunks_together: true,
        }
    }
}

/// Distribute `blocks` over pages of `capacity` points.
///
/// Returns no pages for an empty block sequence.
#[instrument(skip(blocks), fields(blocks = blocks.len()))]
pub fn paginate(blocks: &[Block], capacity: f32, policy: PaginationPolicy) -> Vec<Page> {
    let mut paginator = Paginator::new(blocks, capacity, policy);
    let mut start = 0;
    while start < blocks.len() {
        let file = blocks[start].file_index;
        let end = blocks[start..]
            .iter()
            .position(|b| b.file_index != file)
            .map_or(blocks.len(), |offset| start + offset);
        paginator.place_file(start..end);
        start = end;
    }
    let pages = paginator.finish();
    debug!(pages = pages.len(), "Pagination complete");
    pages
}

struct Paginator<'a> {
    blocks: &'a [Block],
    capacity: f32,
    policy: PaginationPolicy,
    pages: Vec<Page>,
    current: Page,
}

impl<'a> Paginator<'a> {
    fn new(blocks: &'a [Block], capacity: f32, policy: PaginationPolicy) -> Self {
        Self {
            blocks,
            capacity,
            policy,
            pages: Vec::new(),
            current: Page::new(capacity),
        }
    }

    fn unified(&self) -> bool {
        self.policy.view == ViewMode::Unified
    }

    /// Seal the current page, unless nothing is on it yet.
    fn break_page(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let sealed = std::mem::replace(&mut self.current, Page::new(self.capacity));
        self.pages.push(sealed);
    }

    fn finish(mut self) -> Vec<Page> {
        self.break_page();
        self.pages
    }

    fn push(&mut self, block: usize, height: f32, lines: Option<Range<usize>>) {
        self.current.blocks.push(PlacedBlock {
            block,
            y: self.current.used,
            height,
            lines,
        });
        self.current.used += height;
    }

    /// Gaps never carry over to the next page.
    fn advance(&mut self, gap: f32) {
        if self.current.used < self.capacity {
            self.current.used = (self.current.used + gap).min(self.capacity);
        }
    }

    /// Break the page unless `needed` fits. Requirements no page could
    /// satisfy are ignored.
    fn ensure_room(&mut self, needed: f32) {
        if !self.current.fits(needed) && needed <= self.capacity + EPS {
            self.break_page();
        }
    }

    /// Height of a run of blocks without the trailing gap of the last one.
    fn span_height(&self, range: Range<usize>) -> f32 {
        let blocks = &self.blocks[range];
        let total: f32 = blocks.iter().map(Block::total_height).sum();
        total - blocks.last().map_or(0.0, |b| b.gap_after)
    }

    fn place_file(&mut self, range: Range<usize>) {
        if self.unified() {
            let height = self.span_height(range.clone());
            if !self.current.fits(height)
                && height <= self.capacity + EPS
                && !self.current.is_empty()
            {
                debug!(
                    file = self.blocks[range.start].file_index,
                    height,
                    remaining = self.current.remaining(),
                    "Keeping file together on a fresh page"
                );
                self.break_page();
            }
        }

        let end = range.end;
        for i in range {
            match self.blocks[i].kind() {
                BlockKind::FileBadge => self.place_badge(i, end),
                BlockKind::HunkHeader => self.place_header(i, end),
                BlockKind::LineGroup => self.place_group(i),
            }
        }
    }

    /// Index of the line group belonging to the header at `header`, if any.
    fn group_after(&self, header: usize, end: usize) -> Option<usize> {
        let next = header + 1;
        (next < end && self.blocks[next].kind() == BlockKind::LineGroup).then_some(next)
    }

    /// Space a header needs: itself plus its minimum following lines.
    fn header_lead_in(&self, header: usize, end: usize) -> f32 {
        let block = &self.blocks[header];
        match self.group_after(header, end) {
            Some(group) => {
                let lines: f32 = self.blocks[group]
                    .lines()
                    .iter()
                    .take(self.policy.min_lines_after_header)
                    .map(|l| l.height)
                    .sum();
                block.height + lines
            }
            None => block.height,
        }
    }

    /// Whether the block before `index` is a badge placed last on this page.
    fn follows_badge(&self, index: usize) -> bool {
        self.current.blocks.last().is_some_and(|placed| {
            placed.block + 1 == index && self.blocks[placed.block].kind() == BlockKind::FileBadge
        })
    }

    /// A badge reserves room for what its first hunk header will ask for, so
    /// the header never breaks the page right after it. Takes the largest
    /// requirement that a fresh page can meet.
    fn place_badge(&mut self, index: usize, end: usize) {
        let block = &self.blocks[index];
        let mut needed = block.height;
        let next = index + 1;
        if self.unified() && next < end && self.blocks[next].kind() == BlockKind::HunkHeader {
            let hunk_end = self.group_after(next, end).map_or(next + 1, |g| g + 1);
            let mut candidates = vec![
                self.header_lead_in(next, end),
                self.blocks[next].height,
            ];
            if self.policy.keep_hunks_together {
                candidates.insert(0, self.span_height(next..hunk_end));
            }
            if let Some(lead) = candidates
                .into_iter()
                .find(|lead| block.total_height() + lead <= self.capacity + EPS)
            {
                needed = block.total_height() + lead;
            }
        }
        self.ensure_room(needed);
        self.place_atomic(index);
    }

    fn place_header(&mut self, index: usize, end: usize) {
        // The badge already reserved what a fresh page allows.
        if self.unified() && !self.follows_badge(index) {
            let group = self.group_after(index, end);
            if self.policy.keep_hunks_together {
                let hunk_end = group.map_or(index + 1, |g| g + 1);
                let height = self.span_height(index..hunk_end);
                if !self.current.fits(height) && height <= self.capacity + EPS {
                    debug!(block = index, height, "Keeping hunk together on a fresh page");
                    self.break_page();
                }
            }
            let needed = self.header_lead_in(index, end);
            if !self.current.fits(needed) && needed <= self.capacity + EPS {
                debug!(
                    block = index,
                    needed,
                    remaining = self.current.remaining(),
                    "Deferring hunk header to avoid a widow"
                );
                self.break_page();
            }
        }
        self.place_atomic(index);
    }

    fn place_atomic(&mut self, index: usize) {
        let block = &self.blocks[index];
        let (height, gap) = (block.height, block.gap_after);
        self.ensure_room(height);
        if height > self.capacity + EPS {
            warn!(block = index, height, "Block taller than a page; it will overflow");
        }
        self.push(index, height, None);
        self.advance(gap);
    }

    /// Flow a line group, splitting between logical lines at page ends.
    fn place_group(&mut self, index: usize) {
        let blocks = self.blocks;
        let lines = blocks[index].lines();
        let gap = blocks[index].gap_after;

        let mut first = 0;
        while first < lines.len() {
            let mut end = first;
            let mut height = 0.0;
            while end < lines.len() && self.current.fits(height + lines[end].height) {
                height += lines[end].height;
                end += 1;
            }

            if end == first {
                if lines[first].height <= self.capacity + EPS {
                    self.break_page();
                    continue;
                }
                // Taller than any page: overflow here rather than anywhere else.
                warn!(
                    block = index,
                    line = first,
                    height = lines[first].height,
                    "Line taller than a page; it will overflow"
                );
                height = lines[first].height;
                end = first + 1;
            }

            self.push(index, height, Some(first..end));
            first = end;
            if first < lines.len() {
                self.break_page();
            }
        }
        self.advance(gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockContent, GroupLine, LineContent};
    use diffpress_core::LineKind;

    const LINE: f32 = 10.0;

    fn line() -> GroupLine {
        GroupLine {
            content: LineContent::Unified {
                kind: LineKind::Context,
                line_no: Some(1),
                rows: vec!["x".into()],
            },
            height: LINE,
        }
    }

    fn badge(file: usize) -> Block {
        Block {
            content: BlockContent::FileBadge {
                label: format!("file{file}"),
            },
            file_index: file,
            hunk_index: None,
            height: LINE,
            gap_after: 2.0,
        }
    }

    fn header(file: usize, hunk: usize) -> Block {
        Block {
            content: BlockContent::HunkHeader {
                header: "@@ -1 +1 @@".into(),
                section_rows: Vec::new(),
            },
            file_index: file,
            hunk_index: Some(hunk),
            height: LINE + 4.0,
            gap_after: 0.0,
        }
    }

    fn group(file: usize, hunk: usize, lines: usize) -> Block {
        Block {
            content: BlockContent::LineGroup {
                lines: (0..lines).map(|_| line()).collect(),
            },
            file_index: file,
            hunk_index: Some(hunk),
            height: lines as f32 * LINE,
            gap_after: 6.0,
        }
    }

    /// One file with hunks of the given line counts.
    fn file(index: usize, hunks: &[usize]) -> Vec<Block> {
        let mut blocks = vec![badge(index)];
        for (h, &lines) in hunks.iter().enumerate() {
            blocks.push(header(index, h));
            blocks.push(group(index, h, lines));
        }
        if let Some(last) = blocks.last_mut() {
            last.gap_after += 6.0;
        }
        blocks
    }

    fn pages_of(pages: &[Page], blocks: &[Block], file: usize) -> Vec<usize> {
        pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.blocks.iter().any(|b| blocks[b.block].file_index == file))
            .map(|(i, _)| i)
            .collect()
    }

    fn assert_within_capacity(pages: &[Page]) {
        for page in pages {
            for placed in &page.blocks {
                assert!(placed.y + placed.height <= page.capacity + EPS);
            }
        }
    }

    /// No page ends with a header followed by fewer than `k` of its lines.
    fn assert_no_widows(pages: &[Page], blocks: &[Block], k: usize) {
        for page in pages {
            for (pos, placed) in page.blocks.iter().enumerate() {
                if blocks[placed.block].kind() != BlockKind::HunkHeader {
                    continue;
                }
                let total = blocks
                    .get(placed.block + 1)
                    .filter(|b| b.kind() == BlockKind::LineGroup)
                    .map_or(0, |b| b.lines().len());
                if total == 0 {
                    continue;
                }
                let shown = page
                    .blocks
                    .get(pos + 1)
                    .filter(|next| next.block == placed.block + 1)
                    .and_then(|next| next.lines.clone())
                    .map_or(0, |r| r.len());
                assert!(
                    shown >= k.min(total),
                    "header {} shows {shown} of {total} lines",
                    placed.block
                );
            }
        }
    }

    #[test]
    fn empty_input_has_no_pages() {
        assert!(paginate(&[], 100.0, PaginationPolicy::default()).is_empty());
    }

    #[test]
    fn small_files_share_a_page() {
        let mut blocks = file(0, &[2]);
        blocks.extend(file(1, &[2]));
        let pages = paginate(&blocks, 500.0, PaginationPolicy::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks.len(), 6);
        // badge 10 + 2, header 14, group 20 + 12: second badge at 58.
        assert!((pages[0].blocks[3].y - 58.0).abs() < EPS);
    }

    #[test]
    fn file_moves_whole_to_fresh_page() {
        // First file leaves 200 - 58 = 142; second file needs 10+2+14+120 = 146.
        let mut blocks = file(0, &[2]);
        blocks.extend(file(1, &[12]));
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages_of(&pages, &blocks, 1), vec![1]);
        assert_eq!(pages[1].blocks[0].y, 0.0);
        assert_within_capacity(&pages);
    }

    #[test]
    fn oversized_file_splits_between_lines() {
        let blocks = file(0, &[50]);
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert!(pages.len() >= 3);
        let shown: usize = pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter_map(|b| b.lines.clone())
            .map(|r| r.len())
            .sum();
        assert_eq!(shown, 50);
        assert_within_capacity(&pages);
    }

    #[test]
    fn oversized_file_after_content_does_not_waste_a_page() {
        let mut blocks = file(0, &[2]);
        blocks.extend(file(1, &[50]));
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert_eq!(pages_of(&pages, &blocks, 1)[0], 0);
    }

    #[test]
    fn header_is_deferred_rather_than_widowed() {
        // File is larger than a page, so it flows. After the first hunk
        // (10+2+14+150+6 = 182) only 18 remain: the next header (14) fits,
        // but not with two lines after it.
        let blocks = file(0, &[15, 5]);
        let policy = PaginationPolicy {
            keep_hunks_together: false,
            ..PaginationPolicy::default()
        };
        let pages = paginate(&blocks, 200.0, policy);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blocks[0].block, 3);
        assert_no_widows(&pages, &blocks, 2);
    }

    #[test]
    fn hunk_moves_whole_when_enabled() {
        // Second hunk needs 14 + 80 = 94 and only 200 - 132 = 68 remain.
        let blocks = file(0, &[10, 8, 10]);
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        let second_header = pages
            .iter()
            .position(|p| p.blocks.iter().any(|b| b.block == 3))
            .unwrap();
        let second_group: Vec<_> = pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.blocks.iter().any(|b| b.block == 4))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(second_group, vec![second_header]);
    }

    #[test]
    fn badge_is_not_stranded_at_page_end() {
        // Filler leaves 200 - 188 = 12 once its gaps are counted: the badge
        // (10) fits alone but not with its first header and lines.
        let mut blocks = file(0, &[15]);
        blocks.extend(file(1, &[30]));
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert!(pages[0].blocks.iter().all(|b| blocks[b.block].file_index == 0));
    }

    fn assert_no_trailing_badge(pages: &[Page], blocks: &[Block]) {
        for (number, page) in pages.iter().enumerate() {
            if let Some(last) = page.blocks.last() {
                assert_ne!(
                    blocks[last.block].kind(),
                    BlockKind::FileBadge,
                    "page {number} ends with a badge"
                );
            }
        }
    }

    #[test]
    fn badge_follows_its_first_hunk_to_a_fresh_page() {
        // File 1 (276) flows, but its first hunk (14 + 80) does not fit the
        // 62 left after file 0, so the badge moves with it.
        let mut blocks = file(0, &[10]);
        blocks.extend(file(1, &[8, 15]));
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert_no_trailing_badge(&pages, &blocks);
        assert_eq!(pages[1].blocks[0].block, 3);
        assert_eq!(pages[1].blocks[1].block, 4);
        assert_eq!(pages[1].blocks[2].block, 5);
    }

    #[test]
    fn badge_with_hunk_taller_than_page_still_leads_it() {
        // The first hunk (14 + 180) fits a page alone but not with its badge.
        let mut blocks = file(0, &[10]);
        blocks.extend(file(1, &[18, 3]));
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert_no_trailing_badge(&pages, &blocks);
        let badge_page = pages
            .iter()
            .position(|p| p.blocks.iter().any(|b| b.block == 3))
            .unwrap();
        assert!(pages[badge_page].blocks.iter().any(|b| b.block == 4));
    }

    #[test]
    fn no_page_ends_with_a_badge_over_many_shapes() {
        for capacity in [120.0, 150.0, 200.0, 333.0] {
            for keep_hunks_together in [true, false] {
                let mut blocks = Vec::new();
                for f in 0..8 {
                    let hunks: Vec<usize> = (0..3).map(|h| 1 + (f * 5 + h * 11) % 17).collect();
                    blocks.extend(file(f, &hunks));
                }
                let policy = PaginationPolicy {
                    keep_hunks_together,
                    ..PaginationPolicy::default()
                };
                let pages = paginate(&blocks, capacity, policy);
                assert_no_trailing_badge(&pages, &blocks);
                assert_no_widows(&pages, &blocks, 2);
            }
        }
    }

    #[test]
    fn side_by_side_flows_without_keep_together() {
        let mut blocks = file(0, &[2]);
        blocks.extend(file(1, &[12]));
        let policy = PaginationPolicy {
            view: ViewMode::SideBySide,
            ..PaginationPolicy::default()
        };
        let pages = paginate(&blocks, 200.0, policy);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages_of(&pages, &blocks, 1), vec![0, 1]);
        assert_within_capacity(&pages);
    }

    #[test]
    fn line_taller_than_page_is_forced() {
        let mut blocks = file(0, &[1]);
        if let BlockContent::LineGroup { lines } = &mut blocks[2].content {
            lines[0].height = 500.0;
        }
        blocks[2].height = 500.0;
        let pages = paginate(&blocks, 200.0, PaginationPolicy::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks.len(), 3);
        assert_eq!(pages[0].blocks[2].lines, Some(0..1));
    }

    #[test]
    fn widow_guarantee_over_many_shapes() {
        for capacity in [120.0, 150.0, 200.0, 333.0] {
            for k in 1..4 {
                let mut blocks = Vec::new();
                for f in 0..6 {
                    let hunks: Vec<usize> = (0..4).map(|h| 1 + (f * 7 + h * 5) % 13).collect();
                    blocks.extend(file(f, &hunks));
                }
                let policy = PaginationPolicy {
                    min_lines_after_header: k,
                    ..PaginationPolicy::default()
                };
                let pages = paginate(&blocks, capacity, policy);
                assert_no_widows(&pages, &blocks, k);
                assert_within_capacity(&pages);
            }
        }
    }

    #[test]
    fn keep_together_guarantee_for_small_files() {
        let mut blocks = Vec::new();
        for f in 0..12 {
            blocks.extend(file(f, &[1 + f % 4, 2]));
        }
        let pages = paginate(&blocks, 160.0, PaginationPolicy::default());
        for f in 0..12 {
            assert_eq!(pages_of(&pages, &blocks, f).len(), 1, "file {f} was split");
        }
    }
}
