//! Compliance scoring for dashboards and reports.
//!
//! Two distinct measures live here and must not be conflated: the computed
//! compliance percentage derived from requirement answers, and the tally of
//! manually assigned area scores. Progress (how much is filled in) is a third
//! thing entirely and lives in [`super::progress`].

use super::answers;
use super::domain::{AnswerValue, Area, AreaScore, Chapter};

/// Weight of a single answer on the 0-100 compliance scale.
/// `na` carries no quality signal and is excluded, as are unanswered
/// requirements.
fn answer_weight(value: AnswerValue) -> Option<u32> {
    match value {
        AnswerValue::Yes => Some(100),
        AnswerValue::Partial => Some(50),
        AnswerValue::No => Some(0),
        AnswerValue::Na => None,
    }
}

/// Mean answer weight over the area's countable requirements, or `None`
/// when nothing countable has been answered yet.
pub fn area_compliance(area: &Area) -> Option<u8> {
    let mut sum = 0u32;
    let mut counted = 0u32;

    for requirement in &area.requirements {
        if let Some(weight) = answers::effective_value(requirement).and_then(answer_weight) {
            sum += weight;
            counted += 1;
        }
    }

    if counted == 0 {
        return None;
    }

    Some((f64::from(sum) / f64::from(counted)).round() as u8)
}

/// Mean per-area compliance over every area that has requirements. Areas
/// whose requirements are all still unanswered count as 0; areas without
/// requirements are left out of the denominator entirely.
pub fn overall_compliance(chapters: &[Chapter]) -> u8 {
    let mut sum = 0u32;
    let mut counted = 0u32;

    for chapter in chapters {
        for area in &chapter.areas {
            if area.requirements.is_empty() {
                continue;
            }
            sum += u32::from(area_compliance(area).unwrap_or(0));
            counted += 1;
        }
    }

    if counted == 0 {
        return 0;
    }

    (f64::from(sum) / f64::from(counted)).round() as u8
}

/// Chart series: one compliance figure per chapter, computed from the
/// manual area scores (positive 100, reservations 50, everything else 0)
/// averaged over all of the chapter's areas.
pub fn chapter_score(chapter: &Chapter) -> u8 {
    if chapter.areas.is_empty() {
        return 0;
    }

    let sum: u32 = chapter
        .areas
        .iter()
        .map(|area| match area.score {
            Some(AreaScore::Positive) => 100u32,
            Some(AreaScore::Reservations) => 50,
            _ => 0,
        })
        .sum();

    (f64::from(sum) / chapter.areas.len() as f64).round() as u8
}

/// Counts of manually scored areas, grouped the way the dashboard buckets
/// them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTally {
    pub positive: usize,
    pub warning: usize,
    pub negative: usize,
}

impl ScoreTally {
    pub fn collect(chapters: &[Chapter]) -> Self {
        let mut tally = Self::default();
        for chapter in chapters {
            for area in &chapter.areas {
                match area.score {
                    Some(AreaScore::Positive) => tally.positive += 1,
                    Some(AreaScore::Reservations) => tally.warning += 1,
                    Some(AreaScore::Negative) => tally.negative += 1,
                    _ => {}
                }
            }
        }
        tally
    }

    /// Blended dashboard percentage: positives count in full, reservations
    /// at half weight. Zero scored areas reports 0.
    pub fn blended_percentage(&self) -> u8 {
        let scored = self.positive + self.warning + self.negative;
        if scored == 0 {
            return 0;
        }

        let weighted = self.positive as f64 + 0.5 * self.warning as f64;
        ((weighted / scored as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{Requirement, RequirementStatus};

    fn area_with(values: &[Option<AnswerValue>]) -> Area {
        let requirements = values
            .iter()
            .map(|value| {
                let mut requirement = Requirement::default();
                answers::set_answer(&mut requirement, *value);
                requirement
            })
            .collect();
        Area {
            requirements,
            ..Area::default()
        }
    }

    #[test]
    fn unanswered_requirements_do_not_dilute_the_score() {
        let area = area_with(&[Some(AnswerValue::Yes), None, None]);
        assert_eq!(area_compliance(&area), Some(100));
    }

    #[test]
    fn mixed_answers_average() {
        let area = area_with(&[
            Some(AnswerValue::Yes),
            Some(AnswerValue::Partial),
            Some(AnswerValue::No),
        ]);
        assert_eq!(area_compliance(&area), Some(50));
    }

    #[test]
    fn not_applicable_answers_are_excluded() {
        let area = area_with(&[Some(AnswerValue::Yes), Some(AnswerValue::Na)]);
        assert_eq!(area_compliance(&area), Some(100));

        let only_na = area_with(&[Some(AnswerValue::Na)]);
        assert_eq!(area_compliance(&only_na), None);
    }

    #[test]
    fn lopsided_status_only_payloads_still_score() {
        let mut requirement = Requirement::default();
        requirement.status = RequirementStatus::Completed;
        let area = Area {
            requirements: vec![requirement],
            ..Area::default()
        };
        assert_eq!(area_compliance(&area), Some(100));
    }

    #[test]
    fn overall_excludes_empty_areas() {
        let chapters = vec![Chapter {
            areas: vec![
                area_with(&[Some(AnswerValue::Yes)]),
                Area::default(),
                area_with(&[Some(AnswerValue::No)]),
            ],
            ..Chapter::default()
        }];
        assert_eq!(overall_compliance(&chapters), 50);
    }

    #[test]
    fn overall_is_zero_without_requirements() {
        let chapters = vec![Chapter::default()];
        assert_eq!(overall_compliance(&chapters), 0);
    }

    #[test]
    fn tally_counts_only_the_three_dashboard_buckets() {
        let mut chapters = vec![Chapter {
            areas: vec![Area::default(); 5],
            ..Chapter::default()
        }];
        chapters[0].areas[0].score = Some(AreaScore::Positive);
        chapters[0].areas[1].score = Some(AreaScore::Reservations);
        chapters[0].areas[2].score = Some(AreaScore::Negative);
        chapters[0].areas[3].score = Some(AreaScore::InProgress);

        let tally = ScoreTally::collect(&chapters);
        assert_eq!(
            tally,
            ScoreTally {
                positive: 1,
                warning: 1,
                negative: 1
            }
        );
        assert_eq!(tally.blended_percentage(), 50);
    }

    #[test]
    fn blended_percentage_guards_the_empty_case() {
        assert_eq!(ScoreTally::default().blended_percentage(), 0);
    }

    #[test]
    fn chapter_score_averages_manual_scores_over_all_areas() {
        let mut chapter = Chapter {
            areas: vec![Area::default(); 2],
            ..Chapter::default()
        };
        chapter.areas[0].score = Some(AreaScore::Positive);
        assert_eq!(chapter_score(&chapter), 50);
        assert_eq!(chapter_score(&Chapter::default()), 0);
    }
}
