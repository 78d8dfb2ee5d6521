//! Freeze rule language and evaluator.
//!
//! ```yaml
//! today_is_freeze_day_if:
//!   - today: [isTheLastBusinessDayOfTheMonth]
//!   - tomorrow: [isNonBusinessDay]
//!     yesterday: [isNonBusinessDay, isTheFirstBusinessDayOfTheMonth]
//! ```
//!
//! Conditions under one relative day are ANDed. Relative-day entries within a
//! group, and groups in the list, are ORed.

use super::day::Day;
use super::errors::DomainError;
use super::mapping::DateRangeMapping;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelativeDay {
    Yesterday,
    Today,
    Tomorrow,
}

impl RelativeDay {
    pub fn offset_days(self) -> i64 {
        match self {
            RelativeDay::Yesterday => -1,
            RelativeDay::Today => 0,
            RelativeDay::Tomorrow => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelativeDay::Yesterday => "yesterday",
            RelativeDay::Today => "today",
            RelativeDay::Tomorrow => "tomorrow",
        }
    }
}

impl FromStr for RelativeDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yesterday" => Ok(RelativeDay::Yesterday),
            "today" => Ok(RelativeDay::Today),
            "tomorrow" => Ok(RelativeDay::Tomorrow),
            other => Err(DomainError::UnsupportedRelativeDay(other.to_string())),
        }
    }
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    FirstBusinessDayOfMonth,
    LastBusinessDayOfMonth,
    NonBusinessDay,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::FirstBusinessDayOfMonth => "isTheFirstBusinessDayOfTheMonth",
            Condition::LastBusinessDayOfMonth => "isTheLastBusinessDayOfTheMonth",
            Condition::NonBusinessDay => "isNonBusinessDay",
        }
    }

    /// A day outside the window satisfies nothing, not even `isNonBusinessDay`.
    fn holds(self, target: Option<&Day>) -> bool {
        let Some(day) = target else {
            return false;
        };
        match self {
            Condition::FirstBusinessDayOfMonth => day.is_first_business_day_of_month(),
            Condition::LastBusinessDayOfMonth => day.is_last_business_day_of_month(),
            Condition::NonBusinessDay => day.is_non_business_day(),
        }
    }
}

impl FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "isTheFirstBusinessDayOfTheMonth" => Ok(Condition::FirstBusinessDayOfMonth),
            "isTheLastBusinessDayOfTheMonth" => Ok(Condition::LastBusinessDayOfMonth),
            "isNonBusinessDay" => Ok(Condition::NonBusinessDay),
            other => Err(DomainError::UnsupportedCondition(other.to_string())),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditions ANDed against one relative day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub relative_day: RelativeDay,
    pub conditions: Vec<Condition>,
}

impl RuleEntry {
    fn matches(&self, mapping: &DateRangeMapping, day: &Day) -> bool {
        let target = mapping.offset(day, self.relative_day.offset_days());
        self.conditions.iter().all(|c| c.holds(target))
    }
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.relative_day)?;
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    pub entries: Vec<RuleEntry>,
}

/// Validated `today_is_freeze_day_if` rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeRules {
    groups: Vec<RuleGroup>,
}

impl FreezeRules {
    /// Parse the raw config shape. Unknown tokens, unknown conditions and empty lists are rejected.
    pub fn from_raw(raw: &[BTreeMap<String, Vec<String>>]) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::InvalidRules("rule list cannot be empty".into()));
        }

        let mut groups = Vec::with_capacity(raw.len());
        for (idx, group) in raw.iter().enumerate() {
            if group.is_empty() {
                return Err(DomainError::InvalidRules(format!(
                    "rule group #{} has no relative day",
                    idx + 1
                )));
            }
            let mut entries = Vec::with_capacity(group.len());
            for (token, names) in group {
                let relative_day: RelativeDay = token.parse()?;
                if names.is_empty() {
                    return Err(DomainError::InvalidRules(format!(
                        "rule group #{}: '{}' lists no conditions",
                        idx + 1,
                        token
                    )));
                }
                let conditions = names
                    .iter()
                    .map(|name| name.parse())
                    .collect::<Result<Vec<Condition>, _>>()?;
                entries.push(RuleEntry {
                    relative_day,
                    conditions,
                });
            }
            groups.push(RuleGroup { entries });
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// First entry that marks `day` as a freeze day, if any.
    ///
    /// # Panics
    /// If a month-boundary condition is evaluated on a mapping that was never resolved.
    pub fn matching_entry(&self, mapping: &DateRangeMapping, day: &Day) -> Option<&RuleEntry> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter())
            .find(|entry| entry.matches(mapping, day))
    }

    /// # Panics
    /// If a month-boundary condition is evaluated on a mapping that was never resolved.
    pub fn is_freeze_day(&self, mapping: &DateRangeMapping, day: &Day) -> bool {
        self.matching_entry(mapping, day).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolve_month_boundaries;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rules(groups: &[&[(&str, &[&str])]]) -> Result<FreezeRules, DomainError> {
        let raw: Vec<BTreeMap<String, Vec<String>>> = groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|(token, names)| {
                        (
                            token.to_string(),
                            names.iter().map(|n| n.to_string()).collect(),
                        )
                    })
                    .collect()
            })
            .collect();
        FreezeRules::from_raw(&raw)
    }

    fn resolved(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> DateRangeMapping {
        let holidays: HashSet<_> = holidays.iter().copied().collect();
        let mut mapping = DateRangeMapping::build(start, end, &holidays).unwrap();
        resolve_month_boundaries(&mut mapping);
        mapping
    }

    fn freeze_days(rules: &FreezeRules, mapping: &DateRangeMapping) -> Vec<NaiveDate> {
        mapping
            .iter()
            .filter(|day| rules.is_freeze_day(mapping, day))
            .map(|day| day.date())
            .collect()
    }

    #[test]
    fn test_last_business_day_of_march_2024() {
        let rules = rules(&[&[("today", &["isTheLastBusinessDayOfTheMonth"])]]).unwrap();
        let mapping = resolved(d(2024, 3, 1), d(2024, 4, 1), &[]);
        assert_eq!(freeze_days(&rules, &mapping), vec![d(2024, 3, 29)]);
    }

    #[test]
    fn test_tomorrow_outside_window_is_false() {
        let rules = rules(&[&[("tomorrow", &["isNonBusinessDay"])]]).unwrap();
        // Window ends on Friday 2024-03-29; Saturday is outside it
        let mapping = resolved(d(2024, 3, 1), d(2024, 3, 30), &[]);
        let last = mapping.get(d(2024, 3, 29)).unwrap();
        assert!(!rules.is_freeze_day(&mapping, last));
        // A Friday inside the window is frozen because Saturday follows
        let friday = mapping.get(d(2024, 3, 22)).unwrap();
        assert!(rules.is_freeze_day(&mapping, friday));
    }

    #[test]
    fn test_yesterday_outside_window_is_false() {
        let rules = rules(&[&[("yesterday", &["isNonBusinessDay"])]]).unwrap();
        // 2024-03-04 is a Monday, Sunday 3rd is outside the window
        let mapping = resolved(d(2024, 3, 4), d(2024, 3, 12), &[]);
        let monday = mapping.get(d(2024, 3, 4)).unwrap();
        assert!(!rules.is_freeze_day(&mapping, monday));
        let next_monday = mapping.get(d(2024, 3, 11)).unwrap();
        assert!(rules.is_freeze_day(&mapping, next_monday));
    }

    #[test]
    fn test_conditions_within_entry_are_anded() {
        // Non-business day that is also the first business day: impossible
        let rules = rules(&[&[(
            "today",
            &["isNonBusinessDay", "isTheFirstBusinessDayOfTheMonth"],
        )]])
        .unwrap();
        let mapping = resolved(d(2024, 3, 1), d(2024, 4, 1), &[]);
        assert!(freeze_days(&rules, &mapping).is_empty());
    }

    #[test]
    fn test_groups_and_entries_are_ored() {
        let rules = rules(&[
            &[("today", &["isTheFirstBusinessDayOfTheMonth"])],
            &[
                ("today", &["isTheLastBusinessDayOfTheMonth"]),
                ("tomorrow", &["isNonBusinessDay"]),
            ],
        ])
        .unwrap();
        // 2024-03-20 (Wed) is a holiday
        let mapping = resolved(d(2024, 3, 1), d(2024, 4, 1), &[d(2024, 3, 20)]);
        let frozen = freeze_days(&rules, &mapping);
        assert!(frozen.contains(&d(2024, 3, 1)));
        assert!(frozen.contains(&d(2024, 3, 19)));
        assert!(frozen.contains(&d(2024, 3, 29)));
        assert!(frozen.contains(&d(2024, 3, 8)));
        assert!(!frozen.contains(&d(2024, 3, 31)));
        assert!(!frozen.contains(&d(2024, 3, 12)));
    }

    #[test]
    fn test_matching_entry_reports_first_match() {
        let rules = rules(&[
            &[("today", &["isNonBusinessDay"])],
            &[("tomorrow", &["isNonBusinessDay"])],
        ])
        .unwrap();
        let mapping = resolved(d(2024, 3, 1), d(2024, 4, 1), &[]);
        let saturday = mapping.get(d(2024, 3, 2)).unwrap();
        let entry = rules.matching_entry(&mapping, saturday).unwrap();
        assert_eq!(entry.to_string(), "today: isNonBusinessDay");
    }

    #[test]
    fn test_unsupported_condition_rejected() {
        let err = rules(&[&[("today", &["isThursday"])]]).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedCondition(ref c) if c == "isThursday"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unsupported_relative_day_rejected() {
        let err = rules(&[&[("nextDay", &["isNonBusinessDay"])]]).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedRelativeDay(_)));
    }

    #[test]
    fn test_empty_rules_rejected() {
        assert!(FreezeRules::from_raw(&[]).is_err());
        assert!(FreezeRules::from_raw(&[BTreeMap::new()]).is_err());
        assert!(rules(&[&[("today", &[])]]).is_err());
    }

    #[test]
    #[should_panic(expected = "before month boundaries were resolved")]
    fn test_evaluating_unresolved_mapping_panics() {
        let rules = rules(&[&[("today", &["isTheFirstBusinessDayOfTheMonth"])]]).unwrap();
        let mapping = DateRangeMapping::build(d(2024, 3, 1), d(2024, 4, 1), &HashSet::new()).unwrap();
        let day = mapping.get(d(2024, 3, 1)).unwrap();
        rules.is_freeze_day(&mapping, day);
    }
}
