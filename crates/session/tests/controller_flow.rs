use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use wc_app_state::{MediaPlayer, PlayerEvent, Surface, ZoomMode};
use wc_common::{EditorConfig, EditorError, FocusPoint, PlaybackError, ServiceError, SessionId, TimeCode};
use wc_session::{
    CleanupReply, EditReply, EditRequest, EditService, EditorController, StatusLevel, UploadReply, UploadRequest,
};
use wc_transcript::RawTranscriptEntry;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakePlayer {
    time: f64,
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
        None
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

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Upload(PathBuf),
    Edit(EditRequest),
    Preview(EditRequest),
    Cleanup(SessionId),
}

#[derive(Clone, Default)]
struct Script {
    reject_upload: Option<String>,
    reject_edit: Option<String>,
    cached_preview: bool,
}

struct FakeService {
    calls: Arc<Mutex<Vec<Call>>>,
    script: Script,
}

fn entry(word: &str, start: f64, end: f64) -> RawTranscriptEntry {
    RawTranscriptEntry {
        word: word.into(),
        start,
        end,
        is_silence: false,
        duration: None,
    }
}

impl EditService for FakeService {
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadReply, ServiceError> {
        self.calls.lock().push(Call::Upload(request.path.clone()));
        if let Some(reason) = &self.script.reject_upload {
            return Ok(UploadReply {
                error: Some(reason.clone()),
                ..Default::default()
            });
        }
        Ok(UploadReply {
            success: true,
            error: None,
            session_id: Some("s1".into()),
            filename: Some("talk.mp4".into()),
            transcript: vec![
                entry("Hi", 0.0, 1.0),
                entry("there", 1.0, 2.0),
                entry("friend", 2.0, 3.0),
                entry("again", 3.0, 4.0),
            ],
        })
    }

    fn edit(&mut self, request: &EditRequest) -> Result<EditReply, ServiceError> {
        self.calls.lock().push(Call::Edit(request.clone()));
        if let Some(reason) = &self.script.reject_edit {
            return Err(ServiceError::Transport(reason.clone()));
        }
        Ok(EditReply {
            success: true,
            edited_file: Some("edited_talk.mp4".into()),
            preview_file: Some("preview_talk.mp4".into()),
            ..Default::default()
        })
    }

    fn preview_cuts(&mut self, request: &EditRequest) -> Result<EditReply, ServiceError> {
        self.calls.lock().push(Call::Preview(request.clone()));
        Ok(EditReply {
            success: true,
            preview_file: Some("preview_talk.mp4".into()),
            cached: Some(self.script.cached_preview),
            ..Default::default()
        })
    }

    fn cleanup(&mut self, session: &SessionId) -> Result<CleanupReply, ServiceError> {
        self.calls.lock().push(Call::Cleanup(session.clone()));
        Ok(CleanupReply {
            success: true,
            error: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Controller = EditorController<FakePlayer>;

fn controller_with(config: EditorConfig, script: Script) -> (Controller, Arc<Mutex<Vec<Call>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let service = FakeService {
        calls: Arc::clone(&calls),
        script,
    };
    let controller = EditorController::new(config, FakePlayer::default(), FakePlayer::default(), service).unwrap();
    (controller, calls)
}

fn settle(controller: &mut Controller) {
    assert!(
        controller.wait_for_completion(Duration::from_secs(5)),
        "service did not answer"
    );
}

fn uploaded(config: EditorConfig, script: Script) -> (Controller, Arc<Mutex<Vec<Call>>>) {
    let (mut controller, calls) = controller_with(config, script);
    controller.upload("talk.mp4").unwrap();
    settle(&mut controller);
    (controller, calls)
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[test]
fn upload_loads_session_and_original_video() {
    let (controller, calls) = uploaded(EditorConfig::default(), Script::default());

    assert!(!controller.is_uploading());
    assert_eq!(controller.state().session().map(|s| s.id.as_str()), Some("s1"));
    assert_eq!(controller.state().transcript().len(), 4);
    assert_eq!(
        controller.sync().player(Surface::Original).source.as_deref(),
        Some("/video/s1/talk.mp4")
    );
    assert_eq!(controller.status().map(|s| s.level), Some(StatusLevel::Success));
    assert_eq!(calls.lock().as_slice(), &[Call::Upload(PathBuf::from("talk.mp4"))]);
}

#[test]
fn rejected_upload_reports_and_keeps_state() {
    let script = Script {
        reject_upload: Some("Unsupported file type".into()),
        ..Default::default()
    };
    let (controller, _) = uploaded(EditorConfig::default(), script);

    assert!(controller.state().session().is_none());
    let status = controller.status().unwrap();
    assert!(status.is_error());
    assert!(status.text.contains("Unsupported file type"));
}

#[test]
fn cleanup_ends_the_session() {
    let (mut controller, calls) = uploaded(EditorConfig::default(), Script::default());
    controller.cleanup().unwrap();
    settle(&mut controller);

    assert!(controller.state().session().is_none());
    assert_eq!(calls.lock().last(), Some(&Call::Cleanup(SessionId::new("s1"))));
    assert_eq!(controller.cleanup(), Err(ServiceError::NoSession));
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

#[test]
fn edit_guards() {
    let (mut controller, _) = controller_with(EditorConfig::default(), Script::default());
    assert_eq!(controller.apply_edits(), Err(ServiceError::NoSession));

    controller.upload("talk.mp4").unwrap();
    settle(&mut controller);
    assert_eq!(controller.apply_edits(), Err(ServiceError::NothingToEdit));

    controller.add_selection(1, 1).unwrap();
    controller.apply_edits().unwrap();
    assert_eq!(
        controller.apply_edits(),
        Err(ServiceError::InProgress {
            operation: "Edit".into()
        })
    );
    settle(&mut controller);

    assert!(!controller.is_editing());
    assert_eq!(controller.state().edited_file(), Some("edited_talk.mp4"));
    assert!(controller.sync().has_preview());
    assert_eq!(
        controller.sync().player(Surface::Preview).source.as_deref(),
        Some("/video/s1/preview_talk.mp4")
    );
}

#[test]
fn edit_request_uses_sorted_selections() {
    let (mut controller, calls) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(3, 3).unwrap();
    controller.add_selection(0, 1).unwrap();
    controller.apply_edits().unwrap();
    settle(&mut controller);

    let calls = calls.lock();
    let Some(Call::Edit(request)) = calls.last() else {
        panic!("expected an edit call, got {:?}", calls.last());
    };
    let starts: Vec<f64> = request.selections.iter().map(|s| s.start_time.as_secs()).collect();
    assert_eq!(starts, vec![0.0, 3.0]);
    assert!(!request.preview_only);
}

#[test]
fn failed_edit_leaves_selections_untouched() {
    let script = Script {
        reject_edit: Some("connection reset".into()),
        ..Default::default()
    };
    let (mut controller, _) = uploaded(EditorConfig::default(), script);
    controller.add_selection(1, 2).unwrap();
    controller.apply_edits().unwrap();
    settle(&mut controller);

    assert_eq!(controller.state().selections().len(), 1);
    assert!(controller.state().edited_file().is_none());
    assert!(controller.status().unwrap().is_error());
}

#[test]
fn mutation_invalidates_edited_file() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    controller.apply_edits().unwrap();
    settle(&mut controller);
    assert!(controller.state().edited_file().is_some());

    controller.add_selection(3, 3).unwrap();
    assert!(controller.state().edited_file().is_none());
    assert!(controller.state().is_preview_stale());
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[test]
fn switching_to_missing_preview_generates_it_first() {
    let script = Script {
        cached_preview: true,
        ..Default::default()
    };
    let (mut controller, calls) = uploaded(EditorConfig::default(), script);
    controller.add_selection(1, 1).unwrap();

    controller.switch_to(Surface::Preview).unwrap();
    assert_eq!(controller.sync().active(), Surface::Original);
    assert!(controller.is_generating_preview());

    settle(&mut controller);
    assert_eq!(controller.sync().active(), Surface::Preview);
    assert_eq!(controller.status().map(|s| s.text.as_str()), Some("Using cached preview"));
    assert!(matches!(calls.lock().last(), Some(Call::Preview(r)) if r.preview_only));
}

#[test]
fn preview_unavailable_without_edits() {
    let (mut controller, calls) = uploaded(EditorConfig::default(), Script::default());
    let err = controller.switch_to(Surface::Preview).unwrap_err();
    assert!(matches!(err, EditorError::Playback(PlaybackError::PreviewUnavailable)));
    assert_eq!(controller.generate_preview(), Ok(false));
    assert_eq!(calls.lock().len(), 1);
}

#[test]
fn auto_preview_is_debounced() {
    let config = EditorConfig {
        auto_preview: true,
        preview_debounce_ms: 2000,
        ..Default::default()
    };
    let (mut controller, calls) = uploaded(config, Script::default());
    controller.add_selection(1, 1).unwrap();
    controller.add_selection(3, 3).unwrap();
    assert!(controller.is_preview_scheduled());

    controller.tick(Instant::now());
    assert!(!controller.is_generating_preview());

    assert!(controller.tick(Instant::now() + Duration::from_secs(3)));
    assert!(controller.is_generating_preview());
    settle(&mut controller);

    let previews = calls.lock().iter().filter(|c| matches!(c, Call::Preview(_))).count();
    assert_eq!(previews, 1);
    assert!(controller.sync().has_preview());
    assert!(!controller.state().is_preview_stale());
}

#[test]
fn preview_of_outdated_edits_is_marked_stale() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    assert_eq!(controller.generate_preview(), Ok(true));
    assert_eq!(controller.generate_preview(), Ok(false));
    controller.add_selection(3, 3).unwrap();
    settle(&mut controller);

    assert_eq!(controller.state().preview_file(), Some("preview_talk.mp4"));
    assert!(controller.state().is_preview_stale());
}

#[test]
fn clearing_selections_drops_the_preview() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    controller.generate_preview().unwrap();
    settle(&mut controller);
    controller.switch_to(Surface::Preview).unwrap();

    controller.clear_selections();
    assert_eq!(controller.sync().active(), Surface::Original);
    assert!(!controller.sync().has_preview());
    assert!(controller.state().preview_file().is_none());
    assert!(controller.sync().player(Surface::Original).visible);
}

// ---------------------------------------------------------------------------
// Playback and zoom
// ---------------------------------------------------------------------------

#[test]
fn preview_notifications_highlight_original_words() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    controller.generate_preview().unwrap();
    settle(&mut controller);
    controller.switch_to(Surface::Preview).unwrap();

    controller.handle_player_event(PlayerEvent::TimeUpdate {
        surface: Surface::Preview,
        time: TimeCode::from_secs(1.5),
    });
    assert_eq!(controller.display().highlighted, Some(2));

    assert!(!controller.handle_player_event(PlayerEvent::TimeUpdate {
        surface: Surface::Original,
        time: TimeCode::from_secs(3.5),
    }));
    assert_eq!(controller.display().highlighted, Some(2));

    // Clicking the cut word jumps to the next kept one.
    controller.click_word(1);
    assert!((controller.sync().player(Surface::Preview).time - 1.0).abs() < 1e-9);
}

#[test]
fn editing_while_preview_plays_keeps_its_mapping() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    controller.generate_preview().unwrap();
    settle(&mut controller);
    controller.switch_to(Surface::Preview).unwrap();

    controller.add_selection(0, 0).unwrap();
    assert!(controller.state().is_preview_stale());
    controller.handle_player_event(PlayerEvent::TimeUpdate {
        surface: Surface::Preview,
        time: TimeCode::from_secs(1.2),
    });
    // 1.2s into the rendered preview is still "friend".
    assert_eq!(controller.display().highlighted, Some(2));

    controller.navigate_to(TimeCode::from_secs(2.5));
    assert!((controller.sync().player(Surface::Preview).time - 1.5).abs() < 1e-9);
}

#[test]
fn outdated_preview_maps_with_the_cuts_it_was_built_from() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.add_selection(1, 1).unwrap();
    assert_eq!(controller.generate_preview(), Ok(true));
    controller.add_selection(0, 0).unwrap();
    settle(&mut controller);

    assert!(controller.state().is_preview_stale());
    assert!((controller.sync().preview_cuts().total_removed() - 1.0).abs() < 1e-9);

    controller.switch_to(Surface::Preview).unwrap();
    controller.handle_player_event(PlayerEvent::TimeUpdate {
        surface: Surface::Preview,
        time: TimeCode::from_secs(1.2),
    });
    assert_eq!(controller.display().highlighted, Some(2));

    // The refreshed preview brings the current cuts with it.
    assert!(controller.is_generating_preview());
    settle(&mut controller);
    assert!(!controller.state().is_preview_stale());
    assert!((controller.sync().preview_cuts().total_removed() - 2.0).abs() < 1e-9);
}

#[test]
fn hotkeys_move_the_active_surface() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.player_mut(Surface::Original).time = 1.0;
    controller.skip(true);
    assert!((controller.sync().player(Surface::Original).time - 6.0).abs() < 1e-9);
    controller.step_frame(false);
    assert!((controller.sync().player(Surface::Original).time - 5.967).abs() < 1e-9);
    controller.skip(false);
    controller.skip(false);
    assert_eq!(controller.sync().player(Surface::Original).time, 0.0);
}

#[test]
fn zoom_recording_commits_an_event() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    assert_eq!(controller.viewport().mode(), ZoomMode::None);

    controller.player_mut(Surface::Original).time = 1.2;
    controller.start_zoom_recording();
    assert_eq!(controller.viewport().mode(), ZoomMode::Drag);
    assert!(controller.recorder().is_recording());

    controller.player_mut(Surface::Original).time = 2.5;
    controller.wheel(FocusPoint::new(0.3, 0.3), -1.0);
    controller.player_mut(Surface::Original).time = 3.0;
    let event = controller.stop_zoom_recording().unwrap();

    assert_eq!(event.start_time, TimeCode::from_secs(1.2));
    assert_eq!(event.end_time, TimeCode::from_secs(3.0));
    assert_eq!(event.end_zoom_level.as_f64(), 1.25);
    assert_eq!(controller.state().zoom_events().len(), 1);
    assert_eq!(controller.zoom_span(event.id), Some((1, 2)));
    assert!(controller.state().has_edits());
}

#[test]
fn zero_length_zoom_is_discarded() {
    let (mut controller, _) = uploaded(EditorConfig::default(), Script::default());
    controller.player_mut(Surface::Original).time = 2.0;
    controller.start_zoom_recording();
    assert!(controller.stop_zoom_recording().is_none());
    assert!(controller.state().zoom_events().is_empty());
    assert!(!controller.recorder().is_recording());
}
