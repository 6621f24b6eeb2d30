//! QA tests for the voice message player.
//!
//! These tests verify:
//! - Track selection resets progress
//! - Seek clamping and progress sampling
//! - Auto-advance on end without auto-play
//! - Background ducking while the section is mounted

mod common;

use journey_core::audio::{AudioTrackController, BackgroundMusic, MediaElement};
use journey_core::config::PlayerSettings;
use journey_core::events::{self, EventReceiver, JourneyEvent};
use journey_core::testing::{MockMedia, RecordingOutput, TestHarness};
use journey_core::{JourneyConfig, Section};
use std::time::Duration;

struct Rig {
    player: AudioTrackController,
    media: MockMedia,
    output: RecordingOutput,
    music: BackgroundMusic,
    rx: EventReceiver,
}

fn rig() -> Rig {
    let (tx, rx) = events::channel();
    let output = RecordingOutput::new();
    let music = BackgroundMusic::new(Box::new(output.clone()));
    let media = MockMedia::new();
    let player = AudioTrackController::new(
        &PlayerSettings::default(),
        Box::new(media.clone()),
        music.ducking(),
        tx,
    );
    Rig {
        player,
        media,
        output,
        music,
        rx,
    }
}

async fn tick() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

// =============================================================================
// SELECTION AND SEEKING
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_track_is_loaded_and_stopped() {
    common::init_tracing();
    let rig = rig();
    let snapshot = rig.player.snapshot();
    assert_eq!(snapshot.active_track_index, 0);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position_seconds, 0.0);
    assert!(!snapshot.is_duration_known());
    assert_eq!(rig.media.source().as_deref(), Some("/audio/recording-1.mp3"));
}

#[tokio::test(start_paused = true)]
async fn test_select_resets_progress_and_stops() {
    let rig = rig();
    rig.player.on_metadata_loaded(45.0);
    rig.player.toggle_play();
    rig.media.advance(12.0);
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 12.0);

    rig.player.select(3);
    let snapshot = rig.player.snapshot();
    assert_eq!(snapshot.active_track_index, 3);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position_seconds, 0.0);
    assert_eq!(snapshot.duration_seconds, 0.0);
    assert!(!rig.media.playing());
    assert_eq!(rig.media.source().as_deref(), Some("/audio/recording-4.mp3"));
}

#[tokio::test(start_paused = true)]
async fn test_select_clamps_out_of_range_index() {
    let rig = rig();
    rig.player.select(99);
    assert_eq!(rig.player.active_index(), 5);
    assert!(!rig.player.has_next());
    rig.player.next();
    assert_eq!(rig.player.active_index(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_seek_clamps_to_duration() {
    let rig = rig();
    rig.player.on_metadata_loaded(30.0);

    rig.player.seek(100.0);
    assert_eq!(rig.player.snapshot().position_seconds, 30.0);
    assert_eq!(rig.media.time(), 30.0);

    rig.player.seek(-5.0);
    assert_eq!(rig.player.snapshot().position_seconds, 0.0);

    rig.player.seek(f64::NAN);
    assert_eq!(rig.player.snapshot().position_seconds, 0.0);

    rig.player.seek(12.5);
    assert_eq!(rig.player.snapshot().position_seconds, 12.5);
}

#[tokio::test(start_paused = true)]
async fn test_seek_before_metadata_stays_at_zero() {
    let rig = rig();
    rig.player.seek(8.0);
    assert_eq!(rig.player.snapshot().position_seconds, 0.0);
}

// =============================================================================
// PLAYBACK AND SAMPLING
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_progress_follows_element_while_playing() {
    let rig = rig();
    rig.player.on_metadata_loaded(60.0);
    rig.player.toggle_play();
    assert!(rig.player.snapshot().is_playing);

    rig.media.advance(2.0);
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 2.0);

    rig.media.advance(1.5);
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 3.5);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_sampling() {
    let mut rig = rig();
    rig.player.on_metadata_loaded(60.0);
    rig.player.toggle_play();
    rig.media.advance(4.0);
    tick().await;

    rig.player.toggle_play();
    assert!(!rig.player.snapshot().is_playing);
    assert!(!rig.media.playing());

    // Drive the element behind the player's back.
    rig.media.play().unwrap();
    rig.media.advance(10.0);
    tick().await;
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 4.0);
}

#[tokio::test(start_paused = true)]
async fn test_select_stops_sampling_of_previous_track() {
    let mut rig = rig();
    rig.player.toggle_play();
    rig.media.advance(3.0);
    tick().await;

    rig.player.select(1);
    rig.media.play().unwrap();
    rig.media.advance(7.0);
    tick().await;

    let snapshot = rig.player.snapshot();
    assert_eq!(snapshot.active_track_index, 1);
    assert_eq!(snapshot.position_seconds, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_play_stays_stopped() {
    let rig = rig();
    rig.media.set_reject_play(true);
    rig.player.toggle_play();
    assert!(!rig.player.snapshot().is_playing);

    rig.media.set_reject_play(false);
    rig.player.toggle_play();
    assert!(rig.player.snapshot().is_playing);
}

// =============================================================================
// END OF TRACK
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_ended_advances_without_autoplay() {
    let mut rig = rig();
    rig.player.select(2);
    rig.player.on_metadata_loaded(20.0);
    rig.player.toggle_play();
    rig.media.advance(20.0);
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 20.0);

    rig.player.on_ended();
    let snapshot = rig.player.snapshot();
    assert_eq!(snapshot.active_track_index, 3);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position_seconds, 0.0);
    assert!(!rig.media.playing());
    assert_eq!(rig.rx.try_recv().unwrap(), JourneyEvent::TrackEnded { index: 2 });
}

#[tokio::test(start_paused = true)]
async fn test_ended_on_last_track_stays_put() {
    let mut rig = rig();
    rig.player.select(5);
    rig.player.on_metadata_loaded(15.0);
    rig.player.toggle_play();
    rig.media.advance(15.0);
    tick().await;

    rig.player.on_ended();
    let snapshot = rig.player.snapshot();
    assert_eq!(snapshot.active_track_index, 5);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.position_seconds, 15.0);
    assert_eq!(rig.rx.try_recv().unwrap(), JourneyEvent::TrackEnded { index: 5 });
}

#[tokio::test(start_paused = true)]
async fn test_sampling_clamps_past_the_end() {
    let rig = rig();
    rig.player.on_metadata_loaded(10.0);
    rig.player.toggle_play();
    rig.media.advance(12.0);
    tick().await;
    assert_eq!(rig.player.snapshot().position_seconds, 10.0);
}

// =============================================================================
// DUCKING
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_player_ducks_and_restores_background() {
    let rig = rig();
    assert_eq!(rig.music.volume(), 0.7);
    assert_eq!(rig.output.volume(), Some(0.7));

    let Rig { player, music, output, .. } = rig;
    drop(player);
    assert_eq!(music.volume(), 1.0);
    assert_eq!(output.volume(), Some(1.0));
}

#[tokio::test(start_paused = true)]
async fn test_navigator_ducks_only_on_voice_section() {
    common::init_tracing();
    let mut harness = TestHarness::with_config(JourneyConfig::default().with_seed(3));
    harness.journey.start();
    assert_eq!(harness.journey.background_volume(), 1.0);

    harness.journey.go_to(4);
    assert_eq!(harness.journey.current_section(), Some(Section::VoiceMessages));
    assert_eq!(harness.journey.background_volume(), 0.7);
    assert_eq!(harness.background.volume(), Some(0.7));
    assert!(harness.journey.voice_player().is_some());

    harness.journey.go_next();
    assert_eq!(harness.journey.current_section(), Some(Section::Closing));
    assert_eq!(harness.journey.background_volume(), 1.0);
    assert_eq!(harness.background.volume(), Some(1.0));
}

#[tokio::test(start_paused = true)]
async fn test_voice_section_remount_starts_fresh() {
    let mut harness = TestHarness::new();
    harness.journey.start();
    harness.journey.go_to(4);
    {
        let player = harness.journey.voice_player().unwrap();
        player.select(2);
        player.on_metadata_loaded(30.0);
        player.seek(11.0);
    }

    harness.journey.go_prev();
    harness.journey.go_next();

    let player = harness.journey.voice_player().unwrap();
    let snapshot = player.snapshot();
    assert_eq!(snapshot.active_track_index, 0);
    assert_eq!(snapshot.position_seconds, 0.0);
    assert_eq!(harness.media.created(), 2);
    assert_eq!(
        harness.media.last().and_then(|m| m.source()).as_deref(),
        Some("/audio/recording-1.mp3")
    );
}
