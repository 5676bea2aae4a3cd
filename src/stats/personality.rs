//! Coding personality classification.
//!
//! A fixed, ordered rule table: the first rule whose predicate holds names the
//! personality. Nine-to-fiver is both the last rule and the fallback.

use crate::stats::{HourHistogram, WeekdayHistogram};
use serde::Serialize;

/// Coding personality archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Personality {
    /// Most commits late at night
    NightOwl,
    /// Most commits early in the morning
    EarlyBird,
    /// Lots of weekend commits
    WeekendWarrior,
    /// Mostly business hours
    NineToFiver,
    /// Long streaks
    StreakMaster,
    /// Deletes nearly as much as it adds
    BugSquasher,
    /// Adds far more than it deletes
    FeatureFactory,
    /// Reviews a lot relative to committing
    Reviewer,
    /// Many languages
    Polyglot,
    /// A single repository
    Focused,
}

impl Personality {
    /// Kebab-case identifier, as used in JSON output
    pub fn slug(&self) -> &'static str {
        match self {
            Personality::NightOwl => "night-owl",
            Personality::EarlyBird => "early-bird",
            Personality::WeekendWarrior => "weekend-warrior",
            Personality::NineToFiver => "nine-to-fiver",
            Personality::StreakMaster => "streak-master",
            Personality::BugSquasher => "bug-squasher",
            Personality::FeatureFactory => "feature-factory",
            Personality::Reviewer => "reviewer",
            Personality::Polyglot => "polyglot",
            Personality::Focused => "focused",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Personality::NightOwl => "🦉",
            Personality::EarlyBird => "🌅",
            Personality::WeekendWarrior => "⚔️",
            Personality::NineToFiver => "💼",
            Personality::StreakMaster => "🔥",
            Personality::BugSquasher => "🐛",
            Personality::FeatureFactory => "🏭",
            Personality::Reviewer => "👀",
            Personality::Polyglot => "🌍",
            Personality::Focused => "🎯",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Personality::NightOwl => "Night Owl",
            Personality::EarlyBird => "Early Bird",
            Personality::WeekendWarrior => "Weekend Warrior",
            Personality::NineToFiver => "Nine-to-Fiver",
            Personality::StreakMaster => "Streak Master",
            Personality::BugSquasher => "Bug Squasher",
            Personality::FeatureFactory => "Feature Factory",
            Personality::Reviewer => "Code Guardian",
            Personality::Polyglot => "Polyglot",
            Personality::Focused => "Laser Focused",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Personality::NightOwl => "Your best code comes after midnight",
            Personality::EarlyBird => "You catch the worm (and fix the bugs) at dawn",
            Personality::WeekendWarrior => "Saturdays are for coding, not sleeping in",
            Personality::NineToFiver => "Peak productivity during business hours",
            Personality::StreakMaster => "Consistency is your superpower",
            Personality::BugSquasher => "You delete more than you add (and that's a good thing)",
            Personality::FeatureFactory => "Shipping features like there's no tomorrow",
            Personality::Reviewer => "No PR goes unreviewed on your watch",
            Personality::Polyglot => "You speak many languages... programming languages",
            Personality::Focused => "One repo, one mission, total dedication",
        }
    }
}

/// Aggregates the classifier looks at
#[derive(Debug, Clone, Default)]
pub struct PersonalitySignals {
    pub by_hour: HourHistogram,
    pub by_day: WeekdayHistogram,
    pub longest_streak: u64,
    pub additions: u64,
    pub deletions: u64,
    pub reviews: u64,
    pub languages: usize,
    pub repos: usize,
}

type Rule = fn(&PersonalitySignals, f64) -> bool;

/// Evaluated top to bottom; the second argument is the total commit count
const RULES: &[(Personality, Rule)] = &[
    (Personality::NightOwl, is_night_owl),
    (Personality::EarlyBird, is_early_bird),
    (Personality::WeekendWarrior, is_weekend_warrior),
    (Personality::StreakMaster, is_streak_master),
    (Personality::BugSquasher, is_bug_squasher),
    (Personality::FeatureFactory, is_feature_factory),
    (Personality::Reviewer, is_reviewer),
    (Personality::Polyglot, is_polyglot),
    (Personality::Focused, is_focused),
    (Personality::NineToFiver, is_nine_to_fiver),
];

fn is_night_owl(s: &PersonalitySignals, total: f64) -> bool {
    let night = s.by_hour.sum(22..24) + s.by_hour.sum(0..4);
    night as f64 > total * 0.3
}

fn is_early_bird(s: &PersonalitySignals, total: f64) -> bool {
    s.by_hour.sum(5..9) as f64 > total * 0.3
}

fn is_weekend_warrior(s: &PersonalitySignals, _total: f64) -> bool {
    s.by_day.weekend() as f64 > s.by_day.weekdays() as f64 * 0.4
}

fn is_streak_master(s: &PersonalitySignals, _total: f64) -> bool {
    s.longest_streak >= 30
}

fn is_bug_squasher(s: &PersonalitySignals, _total: f64) -> bool {
    s.deletions as f64 > s.additions as f64 * 0.8
}

fn is_feature_factory(s: &PersonalitySignals, _total: f64) -> bool {
    s.additions as f64 > s.deletions as f64 * 3.0
}

fn is_reviewer(s: &PersonalitySignals, total: f64) -> bool {
    s.reviews as f64 > total * 0.3
}

fn is_polyglot(s: &PersonalitySignals, _total: f64) -> bool {
    s.languages >= 5
}

fn is_focused(s: &PersonalitySignals, _total: f64) -> bool {
    s.repos == 1
}

fn is_nine_to_fiver(s: &PersonalitySignals, total: f64) -> bool {
    s.by_hour.sum(9..17) as f64 > total * 0.5
}

/// Pick the single personality for a set of aggregates
pub fn classify(signals: &PersonalitySignals) -> Personality {
    let total = signals.by_hour.total() as f64;

    RULES
        .iter()
        .find(|(_, rule)| rule(signals, total))
        .map(|(personality, _)| *personality)
        .unwrap_or(Personality::NineToFiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn hours(pairs: &[(usize, u64)]) -> HourHistogram {
        let mut counts = [0u64; 24];
        for (hour, count) in pairs {
            counts[*hour] = *count;
        }
        HourHistogram::from(counts)
    }

    fn weekdays(pairs: &[(Weekday, u64)]) -> WeekdayHistogram {
        let mut hist = WeekdayHistogram::default();
        for (day, count) in pairs {
            for _ in 0..*count {
                hist.record(*day);
            }
        }
        hist
    }

    /// Ten midday weekday commits with balanced churn; matches no rule
    fn neutral() -> PersonalitySignals {
        PersonalitySignals {
            by_hour: hours(&[(12, 10)]),
            by_day: weekdays(&[(Weekday::Tue, 10)]),
            longest_streak: 3,
            additions: 100,
            deletions: 50,
            reviews: 0,
            languages: 2,
            repos: 3,
        }
    }

    #[test]
    fn test_all_zero_is_nine_to_fiver() {
        assert_eq!(classify(&PersonalitySignals::default()), Personality::NineToFiver);
    }

    #[test]
    fn test_neutral_falls_through() {
        assert_eq!(classify(&neutral()), Personality::NineToFiver);
    }

    #[test]
    fn test_night_owl() {
        let signals = PersonalitySignals {
            by_hour: hours(&[(12, 6), (23, 2), (2, 2)]),
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::NightOwl);

        // Exactly 30% is not enough
        let signals = PersonalitySignals {
            by_hour: hours(&[(12, 7), (23, 3)]),
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::NineToFiver);
    }

    #[test]
    fn test_early_bird() {
        let signals = PersonalitySignals {
            by_hour: hours(&[(12, 6), (6, 4)]),
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::EarlyBird);
    }

    #[test]
    fn test_weekend_warrior() {
        let signals = PersonalitySignals {
            by_day: weekdays(&[(Weekday::Tue, 5), (Weekday::Sat, 3)]),
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::WeekendWarrior);
    }

    #[test]
    fn test_streak_master() {
        let signals = PersonalitySignals {
            longest_streak: 30,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::StreakMaster);
    }

    #[test]
    fn test_bug_squasher() {
        let signals = PersonalitySignals {
            additions: 100,
            deletions: 81,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::BugSquasher);
    }

    #[test]
    fn test_feature_factory() {
        let signals = PersonalitySignals {
            additions: 301,
            deletions: 100,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::FeatureFactory);
    }

    #[test]
    fn test_reviewer() {
        let signals = PersonalitySignals {
            reviews: 4,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::Reviewer);
    }

    #[test]
    fn test_polyglot_beats_focused() {
        let signals = PersonalitySignals {
            languages: 5,
            repos: 1,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::Polyglot);
    }

    #[test]
    fn test_focused() {
        let signals = PersonalitySignals {
            repos: 1,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::Focused);
    }

    #[test]
    fn test_earlier_rule_wins() {
        let signals = PersonalitySignals {
            by_hour: hours(&[(1, 10)]),
            longest_streak: 60,
            languages: 9,
            ..neutral()
        };
        assert_eq!(classify(&signals), Personality::NightOwl);
    }

    #[test]
    fn test_serializes_kebab_case() {
        let json = serde_json::to_string(&Personality::NineToFiver).unwrap();
        assert_eq!(json, "\"nine-to-fiver\"");
        assert_eq!(Personality::WeekendWarrior.slug(), "weekend-warrior");
    }
}
