//! Questionnaire paging: one area on screen at a time, stepped across
//! chapter boundaries.

use super::domain::Chapter;

/// Position of the visible area inside the chapter tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AreaCursor {
    pub chapter: usize,
    pub area: usize,
}

impl AreaCursor {
    pub fn first() -> Self {
        Self::default()
    }

    /// Flat index of the cursor across all chapters.
    pub fn global_index(&self, chapters: &[Chapter]) -> usize {
        chapters
            .iter()
            .take(self.chapter)
            .map(|chapter| chapter.areas.len())
            .sum::<usize>()
            + self.area
    }

    /// Step forward; a no-op at the last area of the last chapter.
    pub fn advance(&mut self, chapters: &[Chapter]) {
        let Some(current) = chapters.get(self.chapter) else {
            return;
        };

        if self.area + 1 < current.areas.len() {
            self.area += 1;
        } else if self.chapter + 1 < chapters.len() {
            self.chapter += 1;
            self.area = 0;
        }
    }

    /// Step backward; a no-op before the first area of the first chapter.
    pub fn retreat(&mut self, chapters: &[Chapter]) {
        if self.area > 0 {
            self.area -= 1;
        } else if self.chapter > 0 {
            self.chapter -= 1;
            self.area = chapters[self.chapter].areas.len().saturating_sub(1);
        }
    }
}

/// Total number of areas across all chapters.
pub fn total_areas(chapters: &[Chapter]) -> usize {
    chapters.iter().map(|chapter| chapter.areas.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::Area;

    /// Three chapters holding 2, 1, and 3 areas.
    fn chapters() -> Vec<Chapter> {
        [2usize, 1, 3]
            .into_iter()
            .map(|count| Chapter {
                areas: vec![Area::default(); count],
                ..Chapter::default()
            })
            .collect()
    }

    #[test]
    fn totals_sum_across_chapters() {
        assert_eq!(total_areas(&chapters()), 6);
        assert_eq!(total_areas(&[]), 0);
    }

    #[test]
    fn global_index_matches_manual_enumeration() {
        let chapters = chapters();
        let mut expected = 0;
        for (chapter_idx, chapter) in chapters.iter().enumerate() {
            for area_idx in 0..chapter.areas.len() {
                let cursor = AreaCursor {
                    chapter: chapter_idx,
                    area: area_idx,
                };
                assert_eq!(cursor.global_index(&chapters), expected);
                expected += 1;
            }
        }
        // Spot check: first area of the second chapter sits behind the two
        // areas of the first.
        let cursor = AreaCursor { chapter: 1, area: 0 };
        assert_eq!(cursor.global_index(&chapters), 2);
    }

    #[test]
    fn advance_walks_every_area_then_stops() {
        let chapters = chapters();
        let mut cursor = AreaCursor::first();
        let mut visited = vec![cursor];

        for _ in 0..10 {
            let before = cursor;
            cursor.advance(&chapters);
            if cursor == before {
                break;
            }
            visited.push(cursor);
        }

        assert_eq!(visited.len(), total_areas(&chapters));
        assert_eq!(cursor, AreaCursor { chapter: 2, area: 2 });

        // Already at the end: stays put.
        cursor.advance(&chapters);
        assert_eq!(cursor, AreaCursor { chapter: 2, area: 2 });
    }

    #[test]
    fn retreat_crosses_chapter_boundaries_and_stops_at_the_start() {
        let chapters = chapters();
        let mut cursor = AreaCursor { chapter: 1, area: 0 };

        cursor.retreat(&chapters);
        assert_eq!(cursor, AreaCursor { chapter: 0, area: 1 });

        cursor.retreat(&chapters);
        assert_eq!(cursor, AreaCursor::first());

        // Already at the start: stays put.
        cursor.retreat(&chapters);
        assert_eq!(cursor, AreaCursor::first());
    }
}
