//! Commands recognized in messages that mention the bot.

/// Words that start a round.
pub const START_WORDS: [&str; 5] = [
    "espetáculo",
    "espetaculo",
    "esbedáculo",
    "esbedaculo",
    "start",
];

const HELP_WORDS: [&str; 3] = ["help", "h", "ajuda"];

/// A command found in a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionCommand {
    /// Tease the reveal (`qual`).
    PriceTease,
    /// Cheer the author (`alheira`).
    Cheer,
    /// Reply with the author's statistics (`stats`).
    Stats,
    /// Reply with usage instructions.
    Help,
    /// Start a round in the channel.
    StartRound,
}

impl MentionCommand {
    /// Extracts every command present in the mention text, in the order
    /// they are executed.
    ///
    /// Matching is case-insensitive. `qual`, `alheira` and `stats` match
    /// anywhere in the text; help and start words must appear as whole
    /// words so that e.g. every text containing an `h` is not a help
    /// request.
    #[must_use]
    pub fn parse_all(text: &str) -> Vec<Self> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_word = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

        let mut commands = Vec::new();
        if lower.contains("qual") {
            commands.push(Self::PriceTease);
        }
        if lower.contains("alheira") {
            commands.push(Self::Cheer);
        }
        if lower.contains("stats") {
            commands.push(Self::Stats);
        }
        if has_word(&HELP_WORDS) {
            commands.push(Self::Help);
        }
        if has_word(&START_WORDS) {
            commands.push(Self::StartRound);
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_word_with_accent() {
        assert_eq!(
            MentionCommand::parse_all("<@UBOT> Espetáculo!"),
            vec![MentionCommand::StartRound]
        );
    }

    #[test]
    fn help_needs_whole_word() {
        assert_eq!(
            MentionCommand::parse_all("<@UBOT> ajuda"),
            vec![MentionCommand::Help]
        );
        assert!(MentionCommand::parse_all("<@UBOT> what is this").is_empty());
    }

    #[test]
    fn multiple_commands_in_order() {
        assert_eq!(
            MentionCommand::parse_all("<@UBOT> stats and then esbedaculo, qual?"),
            vec![
                MentionCommand::PriceTease,
                MentionCommand::Stats,
                MentionCommand::StartRound
            ]
        );
    }

    #[test]
    fn cheer_matches_substring() {
        assert_eq!(
            MentionCommand::parse_all("<@UBOT> ALHEIRAS"),
            vec![MentionCommand::Cheer]
        );
    }
}
