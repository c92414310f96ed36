//! Outbound notices and their chat rendering.
//!
//! A [`Notice`] is the structured payload handed to a
//! [`crate::adapters::Messenger`]. Its [`Display`](std::fmt::Display)
//! implementation produces the chat text.

use std::fmt;

use serde::Serialize;

use super::round::{AnswerRejection, Outcome};
use super::{ParticipantId, Price, Showcase, UserStat};

const PLAY_AGAIN: &str = "To play again, mention the bot followed by 'espetáculo'.";

/// Structured outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A round started with this product.
    ProductPresented {
        /// Product to guess, without its price.
        product: Showcase,
        /// Time budget in milliseconds.
        duration_ms: u64,
    },
    /// Reminder sent at a configured lead time.
    TimeRemaining {
        /// Milliseconds left before the deadline.
        remaining_ms: u64,
    },
    /// The participant's guess was recorded.
    AnswerAccepted {
        /// Accepted value.
        price: Price,
    },
    /// The participant already has a guess in this round.
    AlreadyAnswered {
        /// The guess that was kept.
        previous: Price,
    },
    /// Another participant already guessed this value.
    ValueTaken {
        /// The rejected value.
        price: Price,
    },
    /// The text was not a positive decimal number.
    MalformedGuess,
    /// A message arrived after the round finished.
    RoundOver,
    /// A start was requested while a round is running.
    RoundInProgress,
    /// The product source failed.
    ProductUnavailable,
    /// Final announcement.
    RoundFinished {
        /// How the round ended.
        outcome: Outcome,
        /// Revealed product price.
        price: Price,
        /// Winner, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<ParticipantId>,
    },
    /// A participant's lifetime statistics.
    Stats {
        /// Who asked.
        participant: ParticipantId,
        /// Their counters.
        stat: UserStat,
    },
    /// The participant has not played a finished round yet.
    NoStats {
        /// Who asked.
        participant: ParticipantId,
    },
    /// Usage instructions.
    Help,
    /// Catchphrase teasing the reveal.
    PriceTease,
    /// Catchphrase cheering a participant.
    Cheer {
        /// Who to cheer.
        participant: ParticipantId,
    },
}

impl Notice {
    /// Returns the notice kind as a static string slice.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProductPresented { .. } => "product_presented",
            Self::TimeRemaining { .. } => "time_remaining",
            Self::AnswerAccepted { .. } => "answer_accepted",
            Self::AlreadyAnswered { .. } => "already_answered",
            Self::ValueTaken { .. } => "value_taken",
            Self::MalformedGuess => "malformed_guess",
            Self::RoundOver => "round_over",
            Self::RoundInProgress => "round_in_progress",
            Self::ProductUnavailable => "product_unavailable",
            Self::RoundFinished { .. } => "round_finished",
            Self::Stats { .. } => "stats",
            Self::NoStats { .. } => "no_stats",
            Self::Help => "help",
            Self::PriceTease => "price_tease",
            Self::Cheer { .. } => "cheer",
        }
    }
}

impl From<&AnswerRejection> for Notice {
    fn from(rejection: &AnswerRejection) -> Self {
        match rejection {
            AnswerRejection::RoundFinished => Self::RoundOver,
            AnswerRejection::AlreadyAnswered { previous } => Self::AlreadyAnswered {
                previous: *previous,
            },
            AnswerRejection::ValueTaken(price) => Self::ValueTaken { price: *price },
            AnswerRejection::Malformed(_) => Self::MalformedGuess,
        }
    }
}

/// Rounds up to whole seconds, e.g. `"1 second"`, `"5 seconds"`.
fn whole_seconds(ms: u64) -> String {
    match ms.div_ceil(1_000) {
        1 => "1 second".to_string(),
        secs => format!("{secs} seconds"),
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductPresented {
                product,
                duration_ms,
            } => {
                write!(
                    f,
                    "How much does *{}* cost? You have {} to send your guess!",
                    product.name,
                    whole_seconds(*duration_ms)
                )?;
                if let Some(url) = &product.url {
                    write!(f, "\n{url}")?;
                }
                if let Some(image) = &product.image_url {
                    write!(f, "\n{image}")?;
                }
                Ok(())
            }
            Self::TimeRemaining { remaining_ms } => {
                write!(f, "{} left!", whole_seconds(*remaining_ms))
            }
            Self::AnswerAccepted { price } => write!(
                f,
                "Your guess of {price} was recorded. Wait for the end of the round for the results!"
            ),
            Self::AlreadyAnswered { previous } => write!(
                f,
                "You already guessed {previous}. Wait for the next round to guess again!"
            ),
            Self::ValueTaken { price } => write!(
                f,
                "The guess {price} was already given by another player. Pick a different value."
            ),
            Self::MalformedGuess => f.write_str(
                "That is not a valid guess. Guesses are decimal numbers, e.g. '1', '5.7', '1,3'.",
            ),
            Self::RoundOver => write!(f, "The round is over! {PLAY_AGAIN}"),
            Self::RoundInProgress => f.write_str("A round is already running."),
            Self::ProductUnavailable => {
                f.write_str("Could not find a product to guess. Try again in a moment.")
            }
            Self::RoundFinished {
                outcome,
                price,
                winner,
            } => {
                match (outcome, winner) {
                    (Outcome::Winner, Some(winner)) => write!(
                        f,
                        "And the price of this product iiiis: {price}! Congratulations {}, you won!",
                        winner.mention()
                    )?,
                    (Outcome::InsufficientPlayers, _) => {
                        f.write_str("The round ended without enough players.")?;
                    }
                    (Outcome::Draw, _) => {
                        write!(f, "The price of this product is: {price}, nobody won :sob:.")?;
                    }
                    (Outcome::Winner, None) | (Outcome::Unresolved, _) => {
                        write!(f, "The price of this product is: {price}.")?;
                    }
                }
                write!(f, "\n{PLAY_AGAIN}")
            }
            Self::Stats { participant, stat } => {
                let minimum = stat
                    .minimum_offset
                    .map_or_else(|| "N/A".to_string(), |offset| format!("{offset:.2}"));
                write!(
                    f,
                    "{}:\n > Games won: {}\n > Games played: {}\n > Exact price: {}\n > Minimum offset: {}",
                    participant.mention(),
                    stat.games_won,
                    stat.games_played,
                    stat.exact_price_matches,
                    minimum
                )
            }
            Self::NoStats { participant } => {
                write!(f, "{} you have no statistics yet.", participant.mention())
            }
            Self::Help => f.write_str(
                "Welcome to *'The Right Price'*!\n \
                 > Add the bot to a public channel and mention it followed by 'espetáculo' to start a round.\n \
                 > The bot shows a product; join by sending a single message with the price you think it has.\n \
                 > Whoever gets closest *without going over* wins. _Espetáááááculo_!\n \
                 > Trigger words: espetáculo, qual, alheira, stats, help.",
            ),
            Self::PriceTease => f.write_str("And the price of this final showcase is!!!!!!"),
            Self::Cheer { participant } => write!(f, "Esbedáculooooo {}", participant.mention()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::domain::price::PriceError;
    use rust_decimal_macros::dec;

    fn price(v: rust_decimal::Decimal) -> Price {
        let Ok(p) = Price::new(v) else {
            panic!("valid price");
        };
        p
    }

    #[test]
    fn accepted_echoes_value() {
        let notice = Notice::AnswerAccepted {
            price: price(dec!(5.7)),
        };
        assert!(notice.to_string().contains("5.70"));
    }

    #[test]
    fn rejection_maps_to_notice() {
        assert_eq!(Notice::from(&AnswerRejection::RoundFinished), Notice::RoundOver);
        assert_eq!(
            Notice::from(&AnswerRejection::Malformed(PriceError::NotANumber("x".into()))),
            Notice::MalformedGuess
        );
        assert_eq!(
            Notice::from(&AnswerRejection::ValueTaken(price(dec!(3)))).kind(),
            "value_taken"
        );
    }

    #[test]
    fn winner_announcement_mentions_winner() {
        let notice = Notice::RoundFinished {
            outcome: Outcome::Winner,
            price: price(dec!(10)),
            winner: Some(ParticipantId::new("U7")),
        };
        let text = notice.to_string();
        assert!(text.contains("<@U7>"));
        assert!(text.contains("10.00"));
        assert!(text.contains(PLAY_AGAIN));
    }

    #[test]
    fn draw_announcement_reveals_price() {
        let notice = Notice::RoundFinished {
            outcome: Outcome::Draw,
            price: price(dec!(10)),
            winner: None,
        };
        assert!(notice.to_string().contains("nobody won"));
    }

    #[test]
    fn stats_without_offset_show_na() {
        let notice = Notice::Stats {
            participant: ParticipantId::new("U1"),
            stat: UserStat::default(),
        };
        assert!(notice.to_string().contains("Minimum offset: N/A"));
    }

    #[test]
    fn reminder_rounds_up_seconds() {
        let notice = Notice::TimeRemaining { remaining_ms: 4_500 };
        assert_eq!(notice.to_string(), "5 seconds left!");
    }

    #[test]
    fn last_second_is_singular() {
        let notice = Notice::TimeRemaining { remaining_ms: 800 };
        assert_eq!(notice.to_string(), "1 second left!");
        let notice = Notice::ProductPresented {
            product: Product::new("Mug", price(dec!(7))).showcase(),
            duration_ms: 1_000,
        };
        assert!(notice.to_string().contains("You have 1 second to send"));
    }

    #[test]
    fn only_a_draw_says_nobody_won() {
        let unresolved = Notice::RoundFinished {
            outcome: Outcome::Unresolved,
            price: price(dec!(10)),
            winner: None,
        };
        let winnerless = Notice::RoundFinished {
            outcome: Outcome::Winner,
            price: price(dec!(10)),
            winner: None,
        };
        assert!(!unresolved.to_string().contains("nobody won"));
        assert!(!winnerless.to_string().contains("nobody won"));
        assert!(winnerless.to_string().contains("10.00"));
    }

    #[test]
    fn presentation_hides_price() {
        let notice = Notice::ProductPresented {
            product: Product::new("Toaster", price(dec!(37.21))).showcase(),
            duration_ms: 1_000,
        };
        let json = serde_json::to_string(&notice).unwrap_or_default();
        assert!(json.contains("Toaster"));
        assert!(!json.contains("37.21"));
        assert!(!notice.to_string().contains("37.21"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&Notice::Help).unwrap_or_default();
        assert_eq!(json, r#"{"kind":"help"}"#);
    }
}
