//! Point awards and level computation.
//!
//! Levels are a pure function of points: `floor(points / 100) + 1`. Points
//! only ever go up; reopening a completed task does not take them back.

use serde::Serialize;

/// Points granted per story point when a task is completed for the first time.
pub const POINTS_PER_STORY_POINT: i64 = 10;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: i64 = 100;

/// Level for a given point total.
pub fn level_for(points: i64) -> i32 {
    (points.max(0) / POINTS_PER_LEVEL + 1) as i32
}

/// Points earned by completing a task with the given estimate.
pub fn completion_award(story_points: i32) -> i64 {
    i64::from(story_points.max(0)) * POINTS_PER_STORY_POINT
}

/// Result of adding points to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Award {
    pub points: i64,
    pub level: i32,
    pub previous_level: i32,
    pub leveled_up: bool,
}

impl Award {
    /// Describe an award of `delta` points that brought the user to `points`.
    /// Both levels are derived from point totals.
    pub fn settled(points: i64, delta: i64) -> Self {
        let previous_level = level_for(points.saturating_sub(delta.max(0)));
        let level = level_for(points);
        Award {
            points,
            level,
            previous_level,
            leveled_up: level > previous_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(250), 3);
    }

    #[test]
    fn completion_award_scales_with_story_points() {
        assert_eq!(completion_award(5), 50);
        assert_eq!(completion_award(13), 130);
    }

    #[test]
    fn crossing_a_boundary_levels_up() {
        let award = Award::settled(140, 50);
        assert_eq!(award.points, 140);
        assert_eq!(award.level, 2);
        assert_eq!(award.previous_level, 1);
        assert!(award.leveled_up);
    }

    #[test]
    fn staying_within_a_level_does_not_level_up() {
        let award = Award::settled(30, 20);
        assert_eq!(award.level, 1);
        assert_eq!(award.previous_level, 1);
        assert!(!award.leveled_up);
    }

    #[test]
    fn large_award_spans_several_levels() {
        let award = Award::settled(350, 300);
        assert_eq!(award.previous_level, 1);
        assert_eq!(award.level, 4);
        assert!(award.leveled_up);
    }

    #[test]
    fn level_always_matches_points() {
        let mut points = 0;
        for delta in [10, 40, 60, 130, 0, 10] {
            points += delta;
            let award = Award::settled(points, delta);
            assert_eq!(award.level, level_for(points));
            assert_eq!(award.previous_level, level_for(points - delta));
        }
    }
}
