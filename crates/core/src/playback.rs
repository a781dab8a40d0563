//! Process-wide music playback for gallery cards.
//!
//! A single "now playing" slot is shared by every card in both gallery
//! sections. At most one audio resource is ever playing: the current
//! resource is stopped and released before the next one is loaded.
//!
//! Loading is asynchronous. Every load is tagged with a fresh
//! [`PlaybackTicket`]; a signal whose ticket no longer matches the slot is
//! stale and ignored, so a late `Ready` from a replaced track never starts
//! playback.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::media::Music;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Audio collaborator
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Audio load failed: {0}")]
    Load(String),

    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSignal {
    Ready,
    Ended,
    Failed(String),
}

/// A signal emitted by an audio resource, tagged with its load ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEvent {
    pub ticket: PlaybackTicket,
    pub signal: AudioSignal,
}

/// A loaded (or loading) audio element.
pub trait AudioResource: Send {
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause and rewind to the start.
    fn stop(&mut self);

    fn set_muted(&mut self, muted: bool);

    /// Free the underlying resource. The resource is unusable afterwards.
    fn release(self: Box<Self>);
}

pub trait AudioBackend: Send + Sync {
    /// Start loading `url`. Readiness, end-of-track and errors are reported
    /// on `events` under `ticket`.
    fn load(
        &self,
        url: &str,
        ticket: PlaybackTicket,
        events: mpsc::UnboundedSender<AudioEvent>,
    ) -> Result<Box<dyn AudioResource>, PlaybackError>;
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The playable part of a music row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub music_id: EntityId,
    pub url: String,
}

impl From<&Music> for TrackRef {
    fn from(music: &Music) -> Self {
        Self {
            music_id: music.id,
            url: music.embed_url.clone(),
        }
    }
}

/// Result of [`PlaybackController::request_play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The track was selected and is loading.
    Loading(PlaybackTicket),
    /// The request targeted the current character and stopped it.
    Stopped,
    /// The backend refused to load the track. The slot is empty.
    Failed,
}

/// Read-only view of the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub character_id: EntityId,
    pub track: TrackRef,
    pub ticket: PlaybackTicket,
    /// `false` while the track is still loading.
    pub started: bool,
    pub muted: bool,
}

struct Slot {
    character_id: EntityId,
    track: TrackRef,
    ticket: PlaybackTicket,
    started: bool,
    muted: bool,
    resource: Box<dyn AudioResource>,
}

impl Slot {
    fn stop_and_release(mut self) {
        self.resource.stop();
        self.resource.release();
    }
}

struct State {
    slot: Option<Slot>,
    next_ticket: u64,
}

impl State {
    fn issue_ticket(&mut self) -> PlaybackTicket {
        self.next_ticket += 1;
        PlaybackTicket(self.next_ticket)
    }

    fn clear(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.stop_and_release();
        }
    }
}

/// Owner of the "now playing" slot. Share as `Arc<PlaybackController>`.
pub struct PlaybackController {
    backend: Arc<dyn AudioBackend>,
    state: Mutex<State>,
    events_tx: mpsc::UnboundedSender<AudioEvent>,
    events_rx: Mutex<mpsc::UnboundedReceiver<AudioEvent>>,
}

impl PlaybackController {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            state: Mutex::new(State {
                slot: None,
                next_ticket: 0,
            }),
            events_tx,
            events_rx: Mutex::new(events_rx),
        }
    }

    /// Select `track` for `character_id`, or stop it if it is already selected.
    ///
    /// The slot is updated before the audio is ready; playback begins when
    /// the matching `Ready` signal is handled.
    pub async fn request_play(&self, track: TrackRef, character_id: EntityId) -> PlayOutcome {
        let mut state = self.state.lock().await;

        if let Some(current) = state.slot.take() {
            let same_character = current.character_id == character_id;
            current.stop_and_release();
            if same_character {
                tracing::debug!(%character_id, "Playback stopped by toggle");
                return PlayOutcome::Stopped;
            }
        }

        let ticket = state.issue_ticket();
        match self.backend.load(&track.url, ticket, self.events_tx.clone()) {
            Ok(resource) => {
                tracing::debug!(%character_id, url = %track.url, ticket = ticket.0, "Track loading");
                state.slot = Some(Slot {
                    character_id,
                    track,
                    ticket,
                    started: false,
                    muted: false,
                    resource,
                });
                PlayOutcome::Loading(ticket)
            }
            Err(e) => {
                tracing::error!(%character_id, url = %track.url, error = %e, "Track load failed");
                PlayOutcome::Failed
            }
        }
    }

    /// Flip mute on the live resource. No-op unless `character_id` owns the slot.
    ///
    /// Returns the new mute state, or `None` when nothing changed.
    pub async fn toggle_mute(&self, character_id: EntityId) -> Option<bool> {
        let mut state = self.state.lock().await;
        let slot = state
            .slot
            .as_mut()
            .filter(|s| s.character_id == character_id)?;
        slot.muted = !slot.muted;
        slot.resource.set_muted(slot.muted);
        Some(slot.muted)
    }

    /// Apply one audio signal to the slot.
    pub async fn handle_event(&self, event: AudioEvent) {
        let mut state = self.state.lock().await;
        let Some(slot) = state.slot.as_mut() else {
            tracing::debug!(ticket = event.ticket.0, "Audio signal with empty slot ignored");
            return;
        };
        if slot.ticket != event.ticket {
            tracing::debug!(
                ticket = event.ticket.0,
                current = slot.ticket.0,
                "Stale audio signal ignored"
            );
            return;
        }

        match event.signal {
            AudioSignal::Ready => {
                if slot.started {
                    return;
                }
                match slot.resource.play() {
                    Ok(()) => slot.started = true,
                    Err(e) => {
                        tracing::error!(character_id = %slot.character_id, error = %e, "Playback failed to start");
                        state.clear();
                    }
                }
            }
            AudioSignal::Ended => {
                tracing::debug!(character_id = %slot.character_id, "Track ended");
                state.clear();
            }
            AudioSignal::Failed(reason) => {
                tracing::error!(
                    character_id = %slot.character_id,
                    url = %slot.track.url,
                    %reason,
                    "Audio resource reported an error"
                );
                state.clear();
            }
        }
    }

    /// Handle every signal queued so far. Returns how many were handled.
    ///
    /// Does nothing while [`PlaybackController::run`] owns the event queue.
    pub async fn process_pending(&self) -> usize {
        let events: Vec<AudioEvent> = {
            let Ok(mut rx) = self.events_rx.try_lock() else {
                return 0;
            };
            std::iter::from_fn(|| rx.try_recv().ok()).collect()
        };
        let handled = events.len();
        for event in events {
            self.handle_event(event).await;
        }
        handled
    }

    /// Handle audio signals until `cancel` fires, then tear down.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut rx = self.events_rx.lock().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = rx.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
            }
        }
        drop(rx);
        self.shutdown().await;
    }

    pub async fn now_playing(&self) -> Option<NowPlaying> {
        self.state.lock().await.slot.as_ref().map(|s| NowPlaying {
            character_id: s.character_id,
            track: s.track.clone(),
            ticket: s.ticket,
            started: s.started,
            muted: s.muted,
        })
    }

    /// Whether `character_id` owns the slot, loading or playing.
    pub async fn is_playing(&self, character_id: EntityId) -> bool {
        self.state
            .lock()
            .await
            .slot
            .as_ref()
            .is_some_and(|s| s.character_id == character_id)
    }

    /// Stop and release any live resource.
    pub async fn shutdown(&self) {
        self.state.lock().await.clear();
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.state.get_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Debug, Default, Clone)]
    struct ResourceLog {
        url: String,
        playing: bool,
        muted: bool,
        stops: usize,
        released: bool,
    }

    type Logs = Arc<StdMutex<Vec<ResourceLog>>>;

    struct FakeResource {
        index: usize,
        logs: Logs,
        fail_play: bool,
    }

    impl AudioResource for FakeResource {
        fn play(&mut self) -> Result<(), PlaybackError> {
            if self.fail_play {
                return Err(PlaybackError::Playback("autoplay blocked".into()));
            }
            self.logs.lock().unwrap()[self.index].playing = true;
            Ok(())
        }

        fn stop(&mut self) {
            let mut logs = self.logs.lock().unwrap();
            logs[self.index].playing = false;
            logs[self.index].stops += 1;
        }

        fn set_muted(&mut self, muted: bool) {
            self.logs.lock().unwrap()[self.index].muted = muted;
        }

        fn release(self: Box<Self>) {
            self.logs.lock().unwrap()[self.index].released = true;
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        logs: Logs,
        refuse: bool,
        fail_play: bool,
    }

    impl FakeBackend {
        fn playing_count(&self) -> usize {
            self.logs.lock().unwrap().iter().filter(|l| l.playing).count()
        }

        fn log(&self, index: usize) -> ResourceLog {
            self.logs.lock().unwrap()[index].clone()
        }
    }

    impl AudioBackend for FakeBackend {
        fn load(
            &self,
            url: &str,
            _ticket: PlaybackTicket,
            _events: mpsc::UnboundedSender<AudioEvent>,
        ) -> Result<Box<dyn AudioResource>, PlaybackError> {
            if self.refuse {
                return Err(PlaybackError::Load(format!("unsupported source {url}")));
            }
            let mut logs = self.logs.lock().unwrap();
            logs.push(ResourceLog {
                url: url.to_string(),
                ..Default::default()
            });
            Ok(Box::new(FakeResource {
                index: logs.len() - 1,
                logs: self.logs.clone(),
                fail_play: self.fail_play,
            }))
        }
    }

    fn track(n: u128) -> TrackRef {
        TrackRef {
            music_id: uuid::Uuid::from_u128(n),
            url: format!("https://audio.example/{n}.mp3"),
        }
    }

    fn character(n: u128) -> EntityId {
        uuid::Uuid::from_u128(1000 + n)
    }

    fn ready(ticket: PlaybackTicket) -> AudioEvent {
        AudioEvent {
            ticket,
            signal: AudioSignal::Ready,
        }
    }

    fn setup() -> (Arc<FakeBackend>, PlaybackController) {
        let backend = Arc::new(FakeBackend::default());
        let controller = PlaybackController::new(backend.clone());
        (backend, controller)
    }

    fn ticket_of(outcome: PlayOutcome) -> PlaybackTicket {
        match outcome {
            PlayOutcome::Loading(ticket) => ticket,
            other => panic!("expected Loading, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn play_starts_only_after_ready() {
        let (backend, controller) = setup();
        let ticket = ticket_of(controller.request_play(track(1), character(1)).await);

        assert!(controller.is_playing(character(1)).await);
        assert_eq!(backend.playing_count(), 0);

        controller.handle_event(ready(ticket)).await;
        assert_eq!(backend.playing_count(), 1);
        assert!(controller.now_playing().await.unwrap().started);
    }

    #[tokio::test]
    async fn second_request_for_same_character_stops() {
        let (backend, controller) = setup();
        let ticket = ticket_of(controller.request_play(track(1), character(1)).await);
        controller.handle_event(ready(ticket)).await;

        let outcome = controller.request_play(track(1), character(1)).await;

        assert_eq!(outcome, PlayOutcome::Stopped);
        assert!(controller.now_playing().await.is_none());
        assert_eq!(backend.playing_count(), 0);
        assert!(backend.log(0).released);
    }

    #[tokio::test]
    async fn late_ready_from_replaced_track_is_ignored() {
        let (backend, controller) = setup();
        let first = ticket_of(controller.request_play(track(1), character(1)).await);
        let second = ticket_of(controller.request_play(track(2), character(2)).await);

        controller.handle_event(ready(second)).await;
        controller.handle_event(ready(first)).await;

        assert_eq!(backend.playing_count(), 1);
        assert!(backend.log(1).playing);
        assert!(!backend.log(0).playing);
        assert!(backend.log(0).released);
        assert_eq!(controller.now_playing().await.unwrap().character_id, character(2));
    }

    #[tokio::test]
    async fn switching_stops_previous_before_loading_next() {
        let (backend, controller) = setup();
        let first = ticket_of(controller.request_play(track(1), character(1)).await);
        controller.handle_event(ready(first)).await;

        let second = ticket_of(controller.request_play(track(2), character(2)).await);

        let previous = backend.log(0);
        assert!(!previous.playing);
        assert_eq!(previous.stops, 1);
        assert!(previous.released);

        controller.handle_event(ready(second)).await;
        assert_eq!(backend.playing_count(), 1);
    }

    #[tokio::test]
    async fn ended_and_failed_signals_clear_slot() {
        let (backend, controller) = setup();
        let ticket = ticket_of(controller.request_play(track(1), character(1)).await);
        controller.handle_event(ready(ticket)).await;
        controller
            .handle_event(AudioEvent {
                ticket,
                signal: AudioSignal::Ended,
            })
            .await;
        assert!(controller.now_playing().await.is_none());

        let ticket = ticket_of(controller.request_play(track(2), character(2)).await);
        controller
            .handle_event(AudioEvent {
                ticket,
                signal: AudioSignal::Failed("404".into()),
            })
            .await;
        assert!(controller.now_playing().await.is_none());
        assert!(backend.log(1).released);
    }

    #[tokio::test]
    async fn refused_load_leaves_slot_empty() {
        let backend = Arc::new(FakeBackend {
            refuse: true,
            ..Default::default()
        });
        let controller = PlaybackController::new(backend);
        let outcome = controller.request_play(track(1), character(1)).await;
        assert_eq!(outcome, PlayOutcome::Failed);
        assert!(!controller.is_playing(character(1)).await);
    }

    #[tokio::test]
    async fn play_error_on_ready_clears_slot() {
        let backend = Arc::new(FakeBackend {
            fail_play: true,
            ..Default::default()
        });
        let controller = PlaybackController::new(backend.clone());
        let ticket = ticket_of(controller.request_play(track(1), character(1)).await);
        controller.handle_event(ready(ticket)).await;
        assert!(controller.now_playing().await.is_none());
        assert!(backend.log(0).released);
    }

    #[tokio::test]
    async fn mute_only_affects_current_character() {
        let (backend, controller) = setup();
        controller.request_play(track(1), character(1)).await;

        assert_eq!(controller.toggle_mute(character(2)).await, None);
        assert_eq!(controller.toggle_mute(character(1)).await, Some(true));
        assert!(backend.log(0).muted);
        assert_eq!(controller.toggle_mute(character(1)).await, Some(false));
        assert!(!backend.log(0).muted);
    }

    #[tokio::test]
    async fn drop_releases_live_resource() {
        let (backend, controller) = setup();
        let ticket = ticket_of(controller.request_play(track(1), character(1)).await);
        controller.handle_event(ready(ticket)).await;

        drop(controller);

        let log = backend.log(0);
        assert!(!log.playing);
        assert!(log.released);
    }

    /// Backend that reports readiness through the event channel.
    struct SignallingBackend {
        inner: FakeBackend,
    }

    impl AudioBackend for SignallingBackend {
        fn load(
            &self,
            url: &str,
            ticket: PlaybackTicket,
            events: mpsc::UnboundedSender<AudioEvent>,
        ) -> Result<Box<dyn AudioResource>, PlaybackError> {
            let resource = self.inner.load(url, ticket, events.clone())?;
            let _ = events.send(ready(ticket));
            Ok(resource)
        }
    }

    #[tokio::test]
    async fn process_pending_drains_queued_signals() {
        let backend = Arc::new(SignallingBackend {
            inner: FakeBackend::default(),
        });
        let controller = PlaybackController::new(backend.clone());

        controller.request_play(track(1), character(1)).await;
        controller.request_play(track(2), character(2)).await;

        assert_eq!(controller.process_pending().await, 2);
        assert_eq!(backend.inner.playing_count(), 1);
        assert_eq!(backend.inner.log(1).url, "https://audio.example/2.mp3");
        assert!(backend.inner.log(1).playing);
    }

    #[tokio::test]
    async fn run_loop_tears_down_on_cancel() {
        let backend = Arc::new(SignallingBackend {
            inner: FakeBackend::default(),
        });
        let controller = Arc::new(PlaybackController::new(backend.clone()));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(controller.clone().run(cancel.clone()));

        controller.request_play(track(1), character(1)).await;
        for _ in 0..50 {
            if backend.inner.playing_count() == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(backend.inner.playing_count(), 1);

        cancel.cancel();
        task.await.unwrap();
        assert!(backend.inner.log(0).released);
        assert!(controller.now_playing().await.is_none());
    }
}
