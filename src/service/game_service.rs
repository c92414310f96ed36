//! Game service: drives rounds, timers, statistics and notices.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use super::commands::MentionCommand;
use crate::adapters::{Messenger, ProductSource};
use crate::config::GameConfig;
use crate::domain::{
    AnswerRejection, ChannelId, EventBus, Notice, Outcome, ParticipantId, Price, Round,
    RoundEntry, RoundEvent, RoundRegistry, RoundSummary, SharedRound, StatsAggregator, UserStat,
};
use crate::error::GameError;

/// Orchestration layer for every round operation.
///
/// Owns references to the [`RoundRegistry`] for round state, the
/// [`StatsAggregator`] for lifetime counters, and the two collaborators.
/// Every mutation follows the pattern: acquire the round lock → apply the
/// state machine → send notices → emit events.
#[derive(Debug)]
pub struct GameService {
    registry: Arc<RoundRegistry>,
    stats: Arc<StatsAggregator>,
    products: Arc<dyn ProductSource>,
    messenger: Arc<dyn Messenger>,
    event_bus: EventBus,
    config: GameConfig,
}

impl GameService {
    /// Creates a new `GameService`.
    #[must_use]
    pub fn new(
        registry: Arc<RoundRegistry>,
        stats: Arc<StatsAggregator>,
        products: Arc<dyn ProductSource>,
        messenger: Arc<dyn Messenger>,
        event_bus: EventBus,
        config: GameConfig,
    ) -> Self {
        Self {
            registry,
            stats,
            products,
            messenger,
            event_bus,
            config,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`RoundRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoundRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`StatsAggregator`].
    #[must_use]
    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Returns the round timing in use.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Starts a round in the channel.
    ///
    /// Fetches a product, installs the round in the registry, presents the
    /// product and schedules the deadline plus one reminder per configured
    /// lead time.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundInProgress`] if the channel already has an
    /// active round and [`GameError::ProductLookup`] if no product could be
    /// fetched. The channel is notified in both cases.
    pub async fn start_round(
        self: &Arc<Self>,
        channel_id: &ChannelId,
    ) -> Result<RoundSummary, GameError> {
        if self.registry.is_active(channel_id).await {
            tracing::warn!(%channel_id, "start rejected: round in progress");
            self.messenger.notify(channel_id, Notice::RoundInProgress);
            return Err(GameError::RoundInProgress(channel_id.clone()));
        }

        let product = match self.products.fetch().await {
            Ok(product) => product,
            Err(err) => {
                tracing::warn!(%channel_id, error = %err, "product lookup failed");
                self.messenger.notify(channel_id, Notice::ProductUnavailable);
                return Err(err);
            }
        };

        let round = Round::new(channel_id.clone(), product, &self.config, Utc::now());
        // The entry stays locked until presented and armed.
        let (shared, mut entry) = match self.registry.start(RoundEntry::new(round)).await {
            Ok(started) => started,
            Err(err) => {
                // Lost a race against a concurrent start in the same channel.
                tracing::warn!(%channel_id, error = %err, "start rejected");
                self.messenger.notify(channel_id, Notice::RoundInProgress);
                return Err(err);
            }
        };

        let duration_ms =
            u64::try_from(self.config.round_duration().as_millis()).unwrap_or(u64::MAX);
        self.messenger.notify(
            channel_id,
            Notice::ProductPresented {
                product: entry.round.product().showcase(),
                duration_ms,
            },
        );
        let _ = self.event_bus.publish(RoundEvent::RoundStarted {
            channel_id: channel_id.clone(),
            product_name: entry.round.product().name.clone(),
            deadline: entry.round.deadline(),
            timestamp: entry.round.started_at(),
        });

        self.schedule_timers(&shared, &mut entry);

        tracing::info!(
            %channel_id,
            product = %entry.round.product().name,
            deadline = %entry.round.deadline(),
            reminders = self.config.lead_times().len(),
            "round started"
        );
        Ok(RoundSummary::from(&*entry))
    }

    /// Spawns the deadline task and one task per reminder. Each task only
    /// holds a weak reference to the round.
    fn schedule_timers(self: &Arc<Self>, shared: &SharedRound, entry: &mut RoundEntry) {
        let duration = self.config.round_duration();

        let weak = Arc::downgrade(shared);
        let service = Arc::clone(self);
        let deadline = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            service.expire(weak).await;
        });
        entry.timers.set_deadline(deadline.abort_handle());

        for lead in self.config.lead_times().iter().copied() {
            let weak = Arc::downgrade(shared);
            let service = Arc::clone(self);
            let reminder = tokio::spawn(async move {
                tokio::time::sleep(duration.saturating_sub(lead)).await;
                service.remind(weak, lead).await;
            });
            entry.timers.push_reminder(reminder.abort_handle());
        }
    }

    /// Deadline task body.
    async fn expire(&self, round: Weak<Mutex<RoundEntry>>) {
        let Some(shared) = round.upgrade() else {
            return;
        };
        let mut entry = shared.lock().await;
        entry.timers.disarm_deadline();
        let _ = self.finish(&mut entry).await;
    }

    /// Reminder task body. Re-checks the phase under the lock so a reminder
    /// racing the resolution never reaches a finished round.
    async fn remind(&self, round: Weak<Mutex<RoundEntry>>, lead: Duration) {
        let Some(shared) = round.upgrade() else {
            return;
        };
        let entry = shared.lock().await;
        if !entry.round.is_active() {
            return;
        }
        let remaining_ms = u64::try_from(lead.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(channel_id = %entry.channel_id(), remaining_ms, "round reminder");
        self.messenger
            .notify(entry.channel_id(), Notice::TimeRemaining { remaining_ms });
    }

    /// Resolves the channel's round now instead of at its deadline.
    ///
    /// Returns the outcome on the first resolution and `None` if the round
    /// was already finished.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFound`] if the channel has no round.
    pub async fn resolve_round(
        &self,
        channel_id: &ChannelId,
    ) -> Result<Option<Outcome>, GameError> {
        let shared = self.registry.get(channel_id).await?;
        let mut entry = shared.lock().await;
        Ok(self.finish(&mut entry).await)
    }

    /// Terminal transition plus completion. Timers are cancelled in the
    /// same critical section that flips the phase.
    async fn finish(&self, entry: &mut RoundEntry) -> Option<Outcome> {
        let outcome = entry.round.resolve(Utc::now())?;
        entry.timers.cancel_all();

        tracing::info!(
            channel_id = %entry.channel_id(),
            outcome = outcome.as_str(),
            winner = ?entry.round.winner().map(ParticipantId::as_str),
            answers = entry.round.answers().len(),
            "round finished"
        );
        self.on_round_finished(&entry.round).await;
        Some(outcome)
    }

    /// Completion callback: folds statistics and announces the result.
    /// Runs exactly once per round, from [`GameService::finish`].
    async fn on_round_finished(&self, round: &Round) {
        if let Err(err) = self.stats.add_game(round).await {
            tracing::error!(
                channel_id = %round.channel_id(),
                error = %err,
                "statistics not updated"
            );
        }

        let product_price = round.product().price;
        self.messenger.notify(
            round.channel_id(),
            Notice::RoundFinished {
                outcome: round.outcome(),
                price: product_price,
                winner: round.winner().cloned(),
            },
        );
        let _ = self.event_bus.publish(RoundEvent::RoundFinished {
            channel_id: round.channel_id().clone(),
            outcome: round.outcome(),
            winner: round.winner().cloned(),
            product_price,
            answer_count: round.answers().len(),
            timestamp: round.finished_at().unwrap_or_else(Utc::now),
        });
    }

    /// Submits a raw guess to the channel's round and notifies the result.
    ///
    /// The inner result tells whether the guess was recorded. Accepted
    /// guesses and most rejections are reported to the participant only;
    /// a guess after the round finished is answered in the channel.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFound`] if the channel has no round.
    pub async fn submit_guess(
        &self,
        channel_id: &ChannelId,
        participant_id: &ParticipantId,
        text: &str,
    ) -> Result<Result<Price, AnswerRejection>, GameError> {
        let shared = self.registry.get(channel_id).await?;
        let mut entry = shared.lock().await;
        let result = entry.round.submit_guess(participant_id, text);

        match &result {
            Ok(price) => {
                tracing::debug!(%channel_id, %participant_id, %price, "answer accepted");
                self.messenger.notify_participant(
                    channel_id,
                    participant_id,
                    Notice::AnswerAccepted { price: *price },
                );
                let _ = self.event_bus.publish(RoundEvent::AnswerAccepted {
                    channel_id: channel_id.clone(),
                    participant_id: participant_id.clone(),
                    price: *price,
                    timestamp: Utc::now(),
                });
            }
            Err(AnswerRejection::RoundFinished) => {
                self.messenger.notify(channel_id, Notice::RoundOver);
            }
            Err(rejection) => {
                tracing::debug!(%channel_id, %participant_id, %rejection, "answer rejected");
                self.messenger
                    .notify_participant(channel_id, participant_id, Notice::from(rejection));
            }
        }
        Ok(result)
    }

    /// Handles a plain channel message. Messages in channels that never had
    /// a round are ignored.
    pub async fn handle_message(
        &self,
        channel_id: &ChannelId,
        participant_id: &ParticipantId,
        text: &str,
    ) -> Option<Result<Price, AnswerRejection>> {
        self.submit_guess(channel_id, participant_id, text).await.ok()
    }

    /// Executes every command found in a message mentioning the bot and
    /// returns them.
    pub async fn handle_mention(
        self: &Arc<Self>,
        channel_id: &ChannelId,
        participant_id: &ParticipantId,
        text: &str,
    ) -> Vec<MentionCommand> {
        let commands = MentionCommand::parse_all(text);
        for command in &commands {
            match command {
                MentionCommand::PriceTease => self.messenger.notify(channel_id, Notice::PriceTease),
                MentionCommand::Cheer => self.messenger.notify(
                    channel_id,
                    Notice::Cheer {
                        participant: participant_id.clone(),
                    },
                ),
                MentionCommand::Stats => self.reply_stats(channel_id, participant_id).await,
                MentionCommand::Help => self.messenger.notify(channel_id, Notice::Help),
                MentionCommand::StartRound => {
                    // Failures were already reported to the channel.
                    let _ = self.start_round(channel_id).await;
                }
            }
        }
        commands
    }

    /// Sends the participant their statistics, or a "no stats yet" notice.
    async fn reply_stats(&self, channel_id: &ChannelId, participant_id: &ParticipantId) {
        let participant = participant_id.clone();
        let notice = match self.stats.get_user_stat(participant_id).await {
            Some(stat) => Notice::Stats { participant, stat },
            None => Notice::NoStats { participant },
        };
        self.messenger
            .notify_participant(channel_id, participant_id, notice);
    }

    /// Returns a participant's lifetime statistics.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::StatsNotFound`] if the participant never played
    /// a finished round.
    pub async fn user_stats(&self, participant_id: &ParticipantId) -> Result<UserStat, GameError> {
        self.stats
            .get_user_stat(participant_id)
            .await
            .ok_or_else(|| GameError::StatsNotFound(participant_id.clone()))
    }

    /// Returns the summary of the channel's current round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFound`] if the channel has no round.
    pub async fn round_summary(&self, channel_id: &ChannelId) -> Result<RoundSummary, GameError> {
        let shared = self.registry.get(channel_id).await?;
        let entry = shared.lock().await;
        Ok(RoundSummary::from(&*entry))
    }

    /// Returns summaries of every channel's round.
    pub async fn list_rounds(&self) -> Vec<RoundSummary> {
        self.registry.list().await
    }
}
