//! Season table, rotation, and day-of-year resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of the simulated calendar year in days.
pub const DAYS_PER_YEAR: u32 = 365;

/// The four named seasons in calendar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown season {0:?} (expected winter, spring, summer or fall)")]
pub struct UnknownSeason(pub String);

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            _ => Err(UnknownSeason(value.to_string())),
        }
    }
}

/// A named season and its length in days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonDefinition {
    pub name: Season,
    pub length: u32,
}

impl SeasonDefinition {
    pub const fn new(name: Season, length: u32) -> Self {
        Self { name, length }
    }
}

/// Temperature profile for a season, in °F.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfile {
    pub mean: f64,
    pub amplitude: f64,
}

impl SeasonProfile {
    pub const fn new(mean: f64, amplitude: f64) -> Self {
        Self { mean, amplitude }
    }
}

/// One profile per season name.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonProfiles {
    pub winter: SeasonProfile,
    pub spring: SeasonProfile,
    pub summer: SeasonProfile,
    pub fall: SeasonProfile,
}

impl SeasonProfiles {
    pub fn get(&self, season: Season) -> &SeasonProfile {
        match season {
            Season::Winter => &self.winter,
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Fall => &self.fall,
        }
    }

    /// Build a profile set where every season shares the same profile.
    pub fn uniform(profile: SeasonProfile) -> Self {
        Self {
            winter: profile,
            spring: profile,
            summer: profile,
            fall: profile,
        }
    }
}

/// Season definitions in calendar order together with their profiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonTable {
    pub seasons: Vec<SeasonDefinition>,
    pub profiles: SeasonProfiles,
}

impl SeasonTable {
    /// Total number of days covered by the season definitions.
    pub fn total_length(&self) -> u32 {
        self.seasons.iter().map(|season| season.length).sum()
    }

    /// Return the seasons reordered so `start` comes first.
    ///
    /// Relative order is preserved; a table that does not contain `start` is returned as-is.
    pub fn rotated(&self, start: Season) -> Vec<SeasonDefinition> {
        let mut rotated = self.seasons.clone();
        if let Some(offset) = rotated.iter().position(|season| season.name == start) {
            rotated.rotate_left(offset);
        }
        rotated
    }
}

/// Season and normalised progress for a resolved day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SeasonPosition {
    pub season: Season,
    pub progress: f64,
}

/// Map a day of the year onto the season whose half-open range contains it.
///
/// Seasons are walked in the given order. When no range contains the day (lengths sum to less
/// than the year) the first season is returned at progress 0. An empty slice resolves to
/// Winter.
pub fn resolve(day_of_year: u32, seasons: &[SeasonDefinition]) -> SeasonPosition {
    let mut start = 0u32;
    for season in seasons {
        let end = start.saturating_add(season.length);
        if day_of_year >= start && day_of_year < end {
            return SeasonPosition {
                season: season.name,
                progress: f64::from(day_of_year - start) / f64::from(season.length),
            };
        }
        start = end;
    }

    SeasonPosition {
        season: seasons.first().map(|season| season.name).unwrap_or(Season::Winter),
        progress: 0.0,
    }
}

/// The two season midpoints that bound a day, with the day's fractional position between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MidpointBracket {
    pub previous: Season,
    pub next: Season,
    /// Position between the previous and next midpoints in `[0, 1]`.
    pub fraction: f64,
}

impl MidpointBracket {
    /// Season whose midpoint is closer to the day.
    pub fn nearest(&self) -> Season {
        if self.fraction < 0.5 {
            self.previous
        } else {
            self.next
        }
    }
}

/// Season definitions rotated to a starting season, with precomputed midpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonCalendar {
    seasons: Vec<SeasonDefinition>,
    midpoints: Vec<f64>,
    cycle_length: f64,
}

impl SeasonCalendar {
    pub fn new(table: &SeasonTable, start: Season) -> Self {
        let seasons = table.rotated(start);
        let mut midpoints = Vec::with_capacity(seasons.len());
        let mut accumulated = 0.0;
        for season in &seasons {
            let length = f64::from(season.length);
            midpoints.push(accumulated + length / 2.0);
            accumulated += length;
        }
        Self {
            seasons,
            midpoints,
            cycle_length: accumulated,
        }
    }

    pub fn seasons(&self) -> &[SeasonDefinition] {
        &self.seasons
    }

    pub fn midpoints(&self) -> &[f64] {
        &self.midpoints
    }

    pub fn resolve(&self, day_of_year: u32) -> SeasonPosition {
        resolve(day_of_year, &self.seasons)
    }

    /// Locate the previous and next season midpoints around `day_of_year`.
    ///
    /// Midpoints wrap across the end of the season cycle. Returns `None` for an empty calendar.
    pub fn bracket(&self, day_of_year: f64) -> Option<MidpointBracket> {
        let last = self.midpoints.len().checked_sub(1)?;
        let next_index = self.midpoints.iter().position(|&midpoint| midpoint > day_of_year);
        let (prev_index, prev_mid, next_index, next_mid) = match next_index {
            Some(0) => (
                last,
                self.midpoints[last] - self.cycle_length,
                0,
                self.midpoints[0],
            ),
            Some(index) => (
                index - 1,
                self.midpoints[index - 1],
                index,
                self.midpoints[index],
            ),
            None => (
                last,
                self.midpoints[last],
                0,
                self.midpoints[0] + self.cycle_length,
            ),
        };

        let span = next_mid - prev_mid;
        let fraction = if span > 0.0 {
            ((day_of_year - prev_mid) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some(MidpointBracket {
            previous: self.seasons[prev_index].name,
            next: self.seasons[next_index].name,
            fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calendar(lengths: [u32; 4]) -> Vec<SeasonDefinition> {
        Season::ALL
            .iter()
            .zip(lengths)
            .map(|(&name, length)| SeasonDefinition::new(name, length))
            .collect()
    }

    fn table(lengths: [u32; 4]) -> SeasonTable {
        SeasonTable {
            seasons: calendar(lengths),
            profiles: SeasonProfiles::uniform(SeasonProfile::new(50.0, 5.0)),
        }
    }

    #[test]
    fn rotation_starts_at_requested_season() {
        let rotated = table([90, 92, 92, 91]).rotated(Season::Summer);
        let names: Vec<Season> = rotated.iter().map(|season| season.name).collect();
        assert_eq!(
            names,
            vec![Season::Summer, Season::Fall, Season::Winter, Season::Spring]
        );
    }

    #[test]
    fn rotation_ignores_missing_season() {
        let single = SeasonTable {
            seasons: vec![SeasonDefinition::new(Season::Summer, 365)],
            profiles: SeasonProfiles::uniform(SeasonProfile::new(90.0, 0.0)),
        };
        assert_eq!(single.rotated(Season::Winter), single.seasons);
    }

    #[test]
    fn short_year_falls_back_to_first_season() {
        let seasons = calendar([10, 10, 10, 10]);
        let position = resolve(200, &seasons);
        assert_eq!(position.season, Season::Winter);
        assert_eq!(position.progress, 0.0);
    }

    #[test]
    fn empty_table_resolves_without_panicking() {
        let position = resolve(12, &[]);
        assert_eq!(position.progress, 0.0);
    }

    #[test]
    fn calendar_midpoints_follow_rotation() {
        let calendar = SeasonCalendar::new(&table([90, 92, 92, 91]), Season::Spring);
        assert_eq!(calendar.seasons()[0].name, Season::Spring);
        assert_eq!(calendar.midpoints(), &[46.0, 138.0, 229.5, 320.0]);
    }

    #[test]
    fn bracket_wraps_across_the_year_boundary() {
        let calendar = SeasonCalendar::new(&table([90, 92, 92, 91]), Season::Spring);

        let early = calendar.bracket(10.0).expect("non-empty calendar");
        assert_eq!(early.previous, Season::Winter);
        assert_eq!(early.next, Season::Spring);
        assert!((early.fraction - 55.0 / 91.0).abs() < 1e-12);
        assert_eq!(early.nearest(), Season::Spring);

        let late = calendar.bracket(350.0).expect("non-empty calendar");
        assert_eq!(late.previous, Season::Winter);
        assert_eq!(late.next, Season::Spring);
        assert!((late.fraction - 30.0 / 91.0).abs() < 1e-12);
        assert_eq!(late.nearest(), Season::Winter);

        let middle = calendar.bracket(138.0).expect("non-empty calendar");
        assert_eq!(middle.previous, Season::Summer);
        assert_eq!(middle.fraction, 0.0);
    }

    #[test]
    fn single_season_brackets_itself() {
        let single = SeasonTable {
            seasons: vec![SeasonDefinition::new(Season::Summer, 365)],
            profiles: SeasonProfiles::uniform(SeasonProfile::new(90.0, 0.0)),
        };
        let calendar = SeasonCalendar::new(&single, Season::Summer);
        let bracket = calendar.bracket(20.0).expect("non-empty calendar");
        assert_eq!(bracket.previous, Season::Summer);
        assert_eq!(bracket.next, Season::Summer);
        assert!(SeasonCalendar::new(
            &SeasonTable {
                seasons: Vec::new(),
                profiles: single.profiles,
            },
            Season::Summer
        )
        .bracket(1.0)
        .is_none());
    }

    #[test]
    fn season_names_parse_case_insensitively() {
        assert_eq!("SPRING".parse::<Season>(), Ok(Season::Spring));
        assert_eq!("autumn".parse::<Season>(), Ok(Season::Fall));
        assert!("monsoon".parse::<Season>().is_err());
    }

    proptest! {
        #[test]
        fn well_formed_year_partitions_every_day(
            a in 1u32..200,
            b in 1u32..100,
            c in 1u32..60,
            day in 0u32..DAYS_PER_YEAR,
        ) {
            prop_assume!(a + b + c < DAYS_PER_YEAR);
            let seasons = calendar([a, b, c, DAYS_PER_YEAR - a - b - c]);
            let position = resolve(day, &seasons);

            let mut start = 0;
            let mut containing = Vec::new();
            for season in &seasons {
                if day >= start && day < start + season.length {
                    containing.push(season.name);
                }
                start += season.length;
            }
            prop_assert_eq!(containing, vec![position.season]);
            prop_assert!(position.progress >= 0.0 && position.progress < 1.0);
        }
    }
}
