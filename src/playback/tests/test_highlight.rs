use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::events::PlaybackEvent;
use crate::media::{AudioClip, MediaEvent};
use crate::playback::PlaybackState;
use crate::timing::find_active_timing;

use super::fixtures::{harness, segment, two_segments};

fn highlighted(events: &[PlaybackEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::PhraseHighlighted { phrase_index, .. } => Some(*phrase_index),
            _ => None,
        })
        .collect()
}

#[test]
fn test_highlight_walks_through_all_phrases_in_order() {
    let mut h = two_segments();
    h.controller.play();
    h.controller.on_animation_frame();

    // Кадры каждые 0.25 с до конца первого сегмента
    for _ in 0..16 {
        h.advance_and_frame(0, 0.25);
    }
    let handle = h.handle(0);
    h.controller.on_media_event(handle, MediaEvent::Ended);
    h.controller.on_animation_frame();
    for _ in 0..8 {
        h.advance_and_frame(1, 0.25);
    }

    assert_eq!(highlighted(&h.events.history()), vec![0, 1, 2, 3]);
}

#[test]
fn test_playback_rate_speeds_up_highlight() {
    let mut h = two_segments();
    h.controller.set_speed(2.0).unwrap();
    h.controller.play();

    // 1 с реального времени при скорости 2 - это 2 с аудио
    h.advance_and_frame(0, 1.0);
    assert_eq!(h.clip(0).current_time(), 2.0);
    assert_eq!(h.controller.session().current_phrase_index(), Some(1));
}

#[test]
fn test_repeated_pause_resume_keeps_single_frame_chain() {
    let mut h = two_segments();
    for _ in 0..5 {
        h.controller.play();
        h.controller.pause();
        h.controller.play();
    }
    assert_eq!(h.controller.pending_frames(), 1);
    assert_eq!(h.controller.on_animation_frame(), 1);
    assert_eq!(h.controller.pending_frames(), 1);
}

#[test]
fn test_highlight_of_phrase_missing_in_one_panel() {
    // Оригинал длиннее перевода: вторая фраза есть только в оригинале
    let mut h = harness(
        vec![segment(0, "one two", "uno dos tres cuatro cinco")],
        &[Some(2.0)],
    );
    h.controller.play();
    h.advance_and_frame(0, 1.5);

    assert_eq!(h.controller.session().current_phrase_index(), Some(1));
    assert_eq!(h.original.active(), Some(1));
    assert_eq!(h.translated.active(), None);
}

#[test]
fn test_no_highlight_changes_while_paused() {
    let mut h = two_segments();
    h.controller.play();
    h.advance_and_frame(0, 0.5);
    h.controller.pause();

    // Хост продолжает крутить кадры, но часы клипа стоят
    for _ in 0..10 {
        h.advance_and_frame(0, 1.0);
    }
    assert_eq!(highlighted(&h.events.history()), vec![0]);
    assert_eq!(h.controller.state(), PlaybackState::Paused(0));
}

#[test]
fn test_highlight_matches_timing_lookup_at_random_times() {
    let mut rng = StdRng::seed_from_u64(42);
    let words: Vec<String> = (0..37).map(|i| format!("w{}", i)).collect();
    let text = words.join(" ");
    let mut h = harness(vec![segment(0, &text, &text)], &[Some(9.25)]);
    h.controller.play();

    for _ in 0..200 {
        let target: f64 = rng.gen_range(0.0..9.25);
        let mut clip = h.clip(0).clone();
        clip.seek(target);
        h.controller.on_animation_frame();

        let expected =
            find_active_timing(h.controller.timings(), 0, target).map(|t| t.phrase_index);
        assert_eq!(h.controller.session().current_phrase_index(), expected);
        assert_eq!(h.original.active(), expected);
    }
}
