//! Session runtime executor

use super::traits::RiddleClient;
use super::{SessionCommand, SseEvent};
use crate::session::{transition, Effect, Event, Session, TransitionError};
use tokio::sync::{broadcast, mpsc, watch};

/// Drives one session: commands are taken off the queue one at a time, so a
/// submission never observes a half-finished exchange.
pub struct SessionRuntime<C>
where
    C: RiddleClient + 'static,
{
    session: Session,
    client: C,
    command_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<Session>,
    broadcast_tx: broadcast::Sender<SseEvent>,
}

impl<C> SessionRuntime<C>
where
    C: RiddleClient + 'static,
{
    pub fn new(
        session: Session,
        client: C,
        command_rx: mpsc::Receiver<SessionCommand>,
        snapshot_tx: watch::Sender<Session>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            session,
            client,
            command_rx,
            snapshot_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session.id, "Starting session runtime");

        while let Some(SessionCommand { event, reply }) = self.command_rx.recv().await {
            let outcome = self.process_event(event).await;

            if let Err(e) = &outcome {
                tracing::warn!(
                    session_id = %self.session.id,
                    error = %e,
                    "Rejected session event"
                );
                let _ = self.broadcast_tx.send(SseEvent::Error {
                    message: e.to_string(),
                });
            }

            self.snapshot_tx.send_replace(self.session.clone());

            if let Some(reply) = reply {
                // The caller may have gone away; the session carries on regardless
                let _ = reply.send(outcome.map(|()| self.session.clone()));
            }
        }

        tracing::info!(session_id = %self.session.id, "Session runtime stopped");
    }

    async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        // Effects may produce follow-up events (backend replies)
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let event_name = current_event.name();
            let result = transition(&self.session.state, current_event)?;

            let old_state = std::mem::replace(&mut self.session.state, result.new_state);
            if old_state != self.session.state {
                tracing::debug!(
                    session_id = %self.session.id,
                    event = event_name,
                    from = old_state.name(),
                    to = self.session.state.name(),
                    riddle_id = ?self.session.state.current_riddle_id(),
                    "Session state changed"
                );
                let _ = self.broadcast_tx.send(SseEvent::StateChange {
                    state: self.session.state,
                });
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendMessage { message } => {
                self.session.messages.push(message.clone());
                let _ = self.broadcast_tx.send(SseEvent::Message { message });
                None
            }

            Effect::ClearTranscript => {
                self.session.messages.clear();
                let _ = self.broadcast_tx.send(SseEvent::Cleared);
                None
            }

            Effect::FetchRiddle { riddle_id } => {
                Some(match self.client.fetch_riddle(riddle_id).await {
                    Ok(response) => Event::RiddleLoaded {
                        riddle_id,
                        response,
                    },
                    Err(e) => {
                        tracing::warn!(
                            session_id = %self.session.id,
                            riddle_id,
                            error = %e,
                            "Riddle lookup failed"
                        );
                        Event::RequestFailed
                    }
                })
            }

            Effect::SubmitAnswer { riddle_id, answer } => {
                Some(match self.client.submit_answer(riddle_id, &answer).await {
                    Ok(response) => Event::AnswerChecked { response },
                    Err(e) => {
                        tracing::warn!(
                            session_id = %self.session.id,
                            riddle_id,
                            error = %e,
                            "Answer submission failed"
                        );
                        Event::RequestFailed
                    }
                })
            }
        }
    }
}
