/// Debounces noisy frame-to-frame recognition output into narration.
///
/// Recognition of the same hovered text jitters between cycles; a reading is
/// only worth speaking once the same string has come back several cycles in a
/// row. Identical reads also accumulate into the utterance rather than being
/// deduplicated, so a stable hover gains text mass before commit.
#[derive(Debug)]
pub struct TextStabilizer {
    min_text_chars: usize,
    stable_reads: u32,
    last_text: String,
    accumulated: String,
    streak: u32,
}

impl TextStabilizer {
    pub fn new(min_text_chars: usize, stable_reads: u32) -> Self {
        Self {
            min_text_chars,
            stable_reads,
            last_text: String::new(),
            accumulated: String::new(),
            streak: 0,
        }
    }

    /// Feed one recognition result. Returns the utterance to narrate when the
    /// reading has stabilized, otherwise `None`.
    ///
    /// Short fragments are ignored entirely: they touch neither the streak
    /// nor `last_text`. A differing read starts a new streak at one; it does
    /// not extend the previous one.
    ///
    /// Note that a commit clears the accumulated text and the streak but
    /// keeps `last_text`, so a hover that stays on the same text keeps
    /// re-committing every `stable_reads` cycles. That re-affirming narration
    /// is intentional behavior carried over from the original tool.
    pub fn observe(&mut self, raw: &str) -> Option<String> {
        let text = raw.trim();
        if text.chars().count() < self.min_text_chars {
            return None;
        }

        if text == self.last_text {
            self.streak += 1;
            self.accumulated.push(' ');
            self.accumulated.push_str(text);
        } else {
            self.streak = 1;
            self.accumulated = text.to_string();
            self.last_text = text.to_string();
        }

        if self.streak >= self.stable_reads {
            let utterance = self.accumulated.trim().to_string();
            self.accumulated.clear();
            self.streak = 0;
            if utterance.is_empty() {
                return None;
            }
            return Some(utterance);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer() -> TextStabilizer {
        TextStabilizer::new(4, 3)
    }

    fn run(stab: &mut TextStabilizer, reads: &[&str]) -> Vec<String> {
        reads.iter().filter_map(|r| stab.observe(r)).collect()
    }

    #[test]
    fn three_identical_reads_commit_once() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["meow", "meow", "meow"]);
        assert_eq!(committed, vec!["meow meow meow".to_string()]);
    }

    #[test]
    fn differing_read_restarts_the_streak() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["meow", "woof", "woof", "woof"]);
        assert_eq!(committed, vec!["woof woof woof".to_string()]);
    }

    #[test]
    fn short_fragments_are_fully_ignored() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["hi", "meow", "meow", "meow"]);
        assert_eq!(committed, vec!["meow meow meow".to_string()]);
    }

    #[test]
    fn short_fragment_does_not_break_a_streak() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["meow", "meow", "hi", "meow"]);
        assert_eq!(committed, vec!["meow meow meow".to_string()]);
    }

    #[test]
    fn persistent_hover_recommits_every_streak() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["meow"; 6]);
        assert_eq!(
            committed,
            vec!["meow meow meow".to_string(), "meow meow meow".to_string()]
        );
    }

    #[test]
    fn whitespace_is_trimmed_before_comparison() {
        let mut stab = stabilizer();
        let committed = run(&mut stab, &["  meow \n", "meow", " meow"]);
        assert_eq!(committed, vec!["meow meow meow".to_string()]);
    }

    #[test]
    fn two_reads_are_not_enough() {
        let mut stab = stabilizer();
        assert!(run(&mut stab, &["meow", "meow"]).is_empty());
    }
}
