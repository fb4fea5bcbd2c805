use wc_app_state::{
    AppState, MediaPlayer, PlayerEvent, SessionInfo, Surface, Synchronizer, ZoomMode, ZoomRecorder,
    ZoomViewport,
};
use wc_common::{FocusPoint, SessionId, TimeCode, ZoomConfig};
use wc_transcript::{Transcript, TranscriptItem};

#[derive(Default)]
struct FakePlayer {
    time: f64,
    duration: Option<f64>,
    playing: bool,
    visible: bool,
    source: Option<String>,
}

impl MediaPlayer for FakePlayer {
    fn play(&mut self) {
        self.playing = true;
    }
    fn pause(&mut self) {
        self.playing = false;
    }
    fn seek(&mut self, time: TimeCode) {
        self.time = time.as_secs();
    }
    fn current_time(&self) -> TimeCode {
        TimeCode::from_secs(self.time)
    }
    fn duration(&self) -> Option<TimeCode> {
        self.duration.map(TimeCode::from_secs)
    }
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }
    fn unload(&mut self) {
        self.source = None;
    }
}

fn t(secs: f64) -> TimeCode {
    TimeCode::from_secs(secs)
}

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    state.load_session(
        SessionInfo {
            id: SessionId::new("session-1"),
            filename: "talk.mp4".into(),
        },
        Transcript::new(vec![
            TranscriptItem::word("So", 0.0, 0.5),
            TranscriptItem::word("um", 0.5, 1.0),
            TranscriptItem::silence(1.0, 3.0),
            TranscriptItem::word("today", 3.0, 3.5),
            TranscriptItem::word("we", 3.5, 4.0),
            TranscriptItem::word("ship", 4.0, 5.0),
        ]),
    );
    state
}

fn synchronizer() -> Synchronizer<FakePlayer> {
    Synchronizer::new(FakePlayer::default(), FakePlayer::default())
}

#[test]
fn modal_isolation_both_directions() {
    let mut state = loaded_state();
    state.add_selection(1, 2).unwrap();
    let mut sync = synchronizer();
    sync.load_original("talk.mp4");
    sync.load_preview("preview.mp4", state.remapper().clone());
    sync.dispatch(PlayerEvent::LoadedMetadata { surface: Surface::Original, duration: t(5.0) }, &state);
    sync.dispatch(PlayerEvent::LoadedMetadata { surface: Surface::Preview, duration: t(2.5) }, &state);

    // Original active: preview notifications change nothing.
    sync.dispatch(PlayerEvent::TimeUpdate { surface: Surface::Original, time: t(4.5) }, &state);
    let original_view = sync.display().clone();
    assert_eq!(original_view.highlighted, Some(5));
    assert!(!sync.dispatch(PlayerEvent::TimeUpdate { surface: Surface::Preview, time: t(0.2) }, &state));
    assert!(!sync.dispatch(PlayerEvent::Seeked { surface: Surface::Preview, time: t(0.2) }, &state));
    assert_eq!(sync.display(), &original_view);

    // Preview active: original notifications change nothing.
    sync.switch_to(Surface::Preview, &state).unwrap();
    sync.dispatch(PlayerEvent::TimeUpdate { surface: Surface::Preview, time: t(1.2) }, &state);
    let preview_view = sync.display().clone();
    // 1.2s of preview is 3.7s of original: "we".
    assert_eq!(preview_view.highlighted, Some(4));
    assert_eq!(preview_view.cursor, Some(1.2 / 2.5));
    assert!(!sync.dispatch(PlayerEvent::TimeUpdate { surface: Surface::Original, time: t(0.1) }, &state));
    assert_eq!(sync.display(), &preview_view);
}

#[test]
fn cursor_never_mixes_surfaces() {
    let mut state = loaded_state();
    state.add_selection(1, 2).unwrap();
    let mut sync = synchronizer();
    sync.load_preview("preview.mp4", state.remapper().clone());
    sync.dispatch(PlayerEvent::LoadedMetadata { surface: Surface::Original, duration: t(5.0) }, &state);
    sync.dispatch(PlayerEvent::LoadedMetadata { surface: Surface::Preview, duration: t(2.5) }, &state);

    sync.player_mut(Surface::Original).time = 4.0;
    sync.player_mut(Surface::Preview).time = 0.5;

    sync.switch_to(Surface::Preview, &state).unwrap();
    assert_eq!(sync.display().cursor, Some(0.5 / 2.5));
    sync.switch_to(Surface::Original, &state).unwrap();
    assert_eq!(sync.display().cursor, Some(4.0 / 5.0));
    assert!(sync.player(Surface::Original).visible);
    assert!(!sync.player(Surface::Preview).playing);
    assert_eq!(sync.player(Surface::Preview).source.as_deref(), Some("preview.mp4"));
}

#[test]
fn selection_removal_is_deterministic() {
    let mut with_removed = loaded_state();
    with_removed.add_selection(0, 1).unwrap();
    with_removed.add_selection(4, 4).unwrap();
    with_removed.remove_selection(0).unwrap();

    let mut never_added = loaded_state();
    never_added.add_selection(4, 4).unwrap();

    assert_eq!(with_removed.adjusted(), never_added.adjusted());
    assert_eq!(with_removed.cut_mask(), never_added.cut_mask());
    assert_eq!(with_removed.remapper(), never_added.remapper());
}

#[test]
fn selections_in_any_order_remap_the_same() {
    let mut forward = loaded_state();
    forward.add_selection(1, 1).unwrap();
    forward.add_selection(4, 4).unwrap();

    let mut backward = loaded_state();
    backward.add_selection(4, 4).unwrap();
    backward.add_selection(1, 1).unwrap();

    for secs in [0.2, 3.2, 4.6] {
        assert_eq!(forward.remapper().to_edited(t(secs)), backward.remapper().to_edited(t(secs)));
    }
    assert_eq!(forward.adjusted(), backward.adjusted());
}

#[test]
fn zoom_gesture_recorded_against_original_time() {
    let mut state = loaded_state();
    let mut sync = synchronizer();
    let mut viewport = ZoomViewport::new(ZoomConfig::default());
    let mut recorder = ZoomRecorder::new(&ZoomConfig::default());

    sync.player_mut(Surface::Original).time = 1.0;
    if viewport.mode() == ZoomMode::None {
        viewport.set_mode(ZoomMode::Drag);
    }
    recorder.start(sync.current_original_time(), viewport.level(), viewport.focus());

    sync.player_mut(Surface::Original).time = 2.0;
    viewport.wheel(FocusPoint::new(0.25, 0.75), -1.0);
    viewport.wheel(FocusPoint::new(0.25, 0.75), -1.0);
    recorder.update(sync.current_original_time(), viewport.level(), viewport.focus());

    sync.player_mut(Surface::Original).time = 4.0;
    let event = recorder.stop(sync.current_original_time()).unwrap();
    assert_eq!(event.start_time, t(1.0));
    assert_eq!(event.end_time, t(4.0));
    assert_eq!(event.end_zoom_level.as_f64(), 1.5);

    assert!(state.commit_zoom(event).is_empty());
    assert_eq!(state.zoom_events().len(), 1);
}
