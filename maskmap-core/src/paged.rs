//! Burn-in substitution for paginated documents.
//!
//! A paginated document cannot be rewritten as one string: replacements are
//! marked as regions on a page and then committed ("burned in"). Each key is
//! committed before the next, shorter key is searched, so a shorter key never
//! matches inside a longer literal that is still waiting to be replaced.
//!
//! Implementations of [`PagedDocument`] must make committed content visible
//! to every later [`PagedDocument::find_regions`] call on the same page, and
//! must never report a region inside a committed replacement.

use crate::error::{CoreError, Result};
use crate::mapping::SubstitutionMap;

/// A document that supports search, mark and commit per page
pub trait PagedDocument {
    /// Location of a match on a page
    type Region;

    /// Number of pages
    fn page_count(&self) -> usize;

    /// All non-overlapping occurrences of `literal` on `page`, as of the last
    /// commit, outside of committed replacements
    fn find_regions(&self, page: usize, literal: &str) -> Result<Vec<Self::Region>>;

    /// Schedules `region` to be replaced by `replacement`
    fn mark_region_for_removal(
        &mut self,
        page: usize,
        region: Self::Region,
        replacement: &str,
    ) -> Result<()>;

    /// Applies every pending mark on `page`
    fn commit_page(&mut self, page: usize) -> Result<()>;
}

/// Summary of a burn-in pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurnInReport {
    /// Pages with at least one replacement
    pub pages_modified: usize,
    /// Total regions replaced
    pub replacements: usize,
}

impl BurnInReport {
    /// Whether nothing matched on any page
    pub fn is_unchanged(&self) -> bool {
        self.replacements == 0
    }
}

/// Burns `map` into every page of `document`, longest key first.
///
/// Finding no occurrence anywhere is not an error; check
/// [`BurnInReport::is_unchanged`].
pub fn burn_in<D: PagedDocument>(document: &mut D, map: &SubstitutionMap) -> Result<BurnInReport> {
    let keys = map.longest_first();
    let mut report = BurnInReport::default();

    for page in 0..document.page_count() {
        let mut page_modified = false;

        for &(key, replacement) in &keys {
            if key.is_empty() {
                continue;
            }
            let regions = document.find_regions(page, key)?;
            if regions.is_empty() {
                continue;
            }

            report.replacements += regions.len();
            for region in regions {
                document.mark_region_for_removal(page, region, replacement)?;
            }
            document.commit_page(page)?;
            page_modified = true;
        }

        if page_modified {
            report.pages_modified += 1;
        }
    }

    Ok(report)
}

/// Byte range of a match on a [`TextPages`] page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRegion {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl TextRegion {
    fn overlaps(&self, other: &TextRegion) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// In-memory paginated text
///
/// On disk, pages are separated by a form feed (`\x0c`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPages {
    pages: Vec<String>,
    pending: Vec<Vec<(TextRegion, String)>>,
    /// Replaced ranges per page, ascending
    committed: Vec<Vec<TextRegion>>,
}

impl TextPages {
    /// Page separator used by [`TextPages::parse`] and [`TextPages::to_text`]
    pub const PAGE_BREAK: char = '\x0c';

    /// Create a document from individual pages
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages: Vec<String> = pages.into_iter().map(Into::into).collect();
        let pending = vec![Vec::new(); pages.len()];
        let committed = vec![Vec::new(); pages.len()];
        Self {
            pages,
            pending,
            committed,
        }
    }

    /// Split form-feed separated text into pages
    pub fn parse(text: &str) -> Self {
        Self::new(text.split(Self::PAGE_BREAK))
    }

    /// Committed page contents
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Committed text of `page`
    pub fn page(&self, page: usize) -> Option<&str> {
        self.pages.get(page).map(String::as_str)
    }

    /// Ranges of `page` written by earlier commits
    pub fn committed_regions(&self, page: usize) -> &[TextRegion] {
        self.committed.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pages joined with [`TextPages::PAGE_BREAK`]
    pub fn to_text(&self) -> String {
        self.pages.join(Self::PAGE_BREAK.to_string().as_str())
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page < self.pages.len() {
            Ok(())
        } else {
            Err(CoreError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })
        }
    }
}

impl PagedDocument for TextPages {
    type Region = TextRegion;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn find_regions(&self, page: usize, literal: &str) -> Result<Vec<TextRegion>> {
        self.check_page(page)?;
        if literal.is_empty() {
            return Ok(Vec::new());
        }

        // Search each gap between committed replacements on its own
        let text = &self.pages[page];
        let mut regions = Vec::new();
        let mut gap_start = 0;
        let gaps = self.committed[page]
            .iter()
            .map(|done| (done.start, done.end))
            .chain(std::iter::once((text.len(), text.len())));
        for (gap_end, next_start) in gaps {
            regions.extend(text[gap_start..gap_end].match_indices(literal).map(
                |(offset, matched)| TextRegion {
                    start: gap_start + offset,
                    end: gap_start + offset + matched.len(),
                },
            ));
            gap_start = next_start;
        }
        Ok(regions)
    }

    fn mark_region_for_removal(
        &mut self,
        page: usize,
        region: TextRegion,
        replacement: &str,
    ) -> Result<()> {
        self.check_page(page)?;
        self.pending[page].push((region, replacement.to_string()));
        Ok(())
    }

    fn commit_page(&mut self, page: usize) -> Result<()> {
        self.check_page(page)?;
        let mut marks = std::mem::take(&mut self.pending[page]);
        marks.sort_by_key(|(region, _)| region.start);

        let text = &self.pages[page];
        let previous = std::mem::take(&mut self.committed[page]);

        // Overlapping, misplaced or already replaced marks are dropped
        let mut accepted: Vec<(TextRegion, String)> = Vec::with_capacity(marks.len());
        for (region, replacement) in marks {
            let clear = region.start <= region.end
                && region.end <= text.len()
                && text.is_char_boundary(region.start)
                && text.is_char_boundary(region.end)
                && accepted
                    .last()
                    .map_or(true, |(last, _)| last.end <= region.start)
                && !previous.iter().any(|done| done.overlaps(&region));
            if clear {
                accepted.push((region, replacement));
            }
        }

        let mut output = String::with_capacity(text.len());
        let mut committed = Vec::with_capacity(previous.len() + accepted.len());
        let mut cursor = 0;
        for (region, replacement) in &accepted {
            output.push_str(&text[cursor..region.start]);
            let start = output.len();
            output.push_str(replacement);
            committed.push(TextRegion {
                start,
                end: output.len(),
            });
            cursor = region.end;
        }
        output.push_str(&text[cursor..]);

        // Earlier replacements move by the size change of the marks before them
        for done in previous {
            let (added, removed) = accepted
                .iter()
                .filter(|(region, _)| region.end <= done.start)
                .fold((0, 0), |(added, removed), (region, replacement)| {
                    (added + replacement.len(), removed + region.end - region.start)
                });
            committed.push(TextRegion {
                start: done.start + added - removed,
                end: done.end + added - removed,
            });
        }
        committed.sort_by_key(|region| region.start);

        self.pages[page] = output;
        self.committed[page] = committed;
        Ok(())
    }
}
