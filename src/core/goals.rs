/// High-level intention derived from a profile's goal tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalIntent {
    /// Looking for someone to mentor them ("mentor" but not "mentee")
    SeekingMentor,
    /// Looking for someone to mentor ("mentee")
    SeekingMentee,
    /// "networking"
    Networking,
    /// "professional"
    Professional,
    /// "friendship" or "social"
    Friendship,
    /// "activity" or "partner"
    ActivityPartner,
}

impl GoalIntent {
    const ALL: [GoalIntent; 6] = [
        GoalIntent::SeekingMentor,
        GoalIntent::SeekingMentee,
        GoalIntent::Networking,
        GoalIntent::Professional,
        GoalIntent::Friendship,
        GoalIntent::ActivityPartner,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Intents expressed by a single normalized (lower-cased, trimmed) goal
    fn of_goal(goal: &str) -> impl Iterator<Item = GoalIntent> + '_ {
        Self::ALL.into_iter().filter(move |intent| match intent {
            GoalIntent::SeekingMentor => goal.contains("mentor") && !goal.contains("mentee"),
            GoalIntent::SeekingMentee => goal.contains("mentee"),
            GoalIntent::Networking => goal.contains("networking"),
            GoalIntent::Professional => goal.contains("professional"),
            GoalIntent::Friendship => goal.contains("friendship") || goal.contains("social"),
            GoalIntent::ActivityPartner => goal.contains("activity") || goal.contains("partner"),
        })
    }
}

/// Set of intents classified from one profile's goal list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalIntents(u8);

impl GoalIntents {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, intent: GoalIntent) {
        self.0 |= intent.bit();
    }

    #[inline]
    pub fn contains(&self, intent: GoalIntent) -> bool {
        self.0 & intent.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Networking in the broad sense used by complementary matching
    #[inline]
    pub fn wants_networking(&self) -> bool {
        self.contains(GoalIntent::Networking) || self.contains(GoalIntent::Professional)
    }

    pub fn iter(&self) -> impl Iterator<Item = GoalIntent> + '_ {
        GoalIntent::ALL.into_iter().filter(|intent| self.contains(*intent))
    }
}

impl FromIterator<GoalIntent> for GoalIntents {
    fn from_iter<I: IntoIterator<Item = GoalIntent>>(iter: I) -> Self {
        let mut intents = GoalIntents::empty();
        for intent in iter {
            intents.insert(intent);
        }
        intents
    }
}

/// Normalize a goal tag for substring classification
#[inline]
pub fn normalize_goal(goal: &str) -> String {
    goal.trim().to_lowercase()
}

/// Classify a goal list into intents
///
/// Each goal is lower-cased and trimmed once; rules are substring tests so
/// both canonical keys ("find_mentor") and free-text custom goals
/// ("Looking for a Mentor") classify the same way.
pub fn classify_goals<S: AsRef<str>>(goals: &[S]) -> GoalIntents {
    goals
        .iter()
        .map(|goal| normalize_goal(goal.as_ref()))
        .flat_map(|goal| GoalIntent::of_goal(&goal).collect::<Vec<_>>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentor_and_mentee_are_exclusive_per_goal() {
        let mentor = classify_goals(&["find_mentor"]);
        assert!(mentor.contains(GoalIntent::SeekingMentor));
        assert!(!mentor.contains(GoalIntent::SeekingMentee));

        let mentee = classify_goals(&["find_mentee"]);
        assert!(mentee.contains(GoalIntent::SeekingMentee));
        assert!(!mentee.contains(GoalIntent::SeekingMentor));

        // A single tag naming both counts only as mentee-seeking
        let both = classify_goals(&["mentor_or_mentee"]);
        assert!(both.contains(GoalIntent::SeekingMentee));
        assert!(!both.contains(GoalIntent::SeekingMentor));
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        let intents = classify_goals(&["  Professional_Networking ", "SOCIAL"]);
        assert!(intents.contains(GoalIntent::Networking));
        assert!(intents.contains(GoalIntent::Professional));
        assert!(intents.contains(GoalIntent::Friendship));
        assert!(!intents.contains(GoalIntent::ActivityPartner));
    }

    #[test]
    fn test_professional_alone_is_not_scoring_networking() {
        let intents = classify_goals(&["professional_development"]);
        assert!(intents.wants_networking());
        assert!(!intents.contains(GoalIntent::Networking));
    }

    #[test]
    fn test_activity_partner_triggers() {
        assert!(classify_goals(&["activity_buddy"]).contains(GoalIntent::ActivityPartner));
        assert!(classify_goals(&["gym partner"]).contains(GoalIntent::ActivityPartner));
    }

    #[test]
    fn test_empty_goals() {
        let intents = classify_goals::<&str>(&[]);
        assert!(intents.is_empty());
        assert_eq!(intents.iter().count(), 0);
    }
}
