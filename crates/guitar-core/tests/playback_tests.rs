// Playback dispatch: single active sample, error reporting and completion polling.

mod common;

use common::{init_logging, RecordingSink, SinkCall};
use guitar_core::*;

fn dispatcher() -> PlaybackDispatcher<RecordingSink> {
    init_logging();
    PlaybackDispatcher::new(RecordingSink::full(), SoundBank::default())
}

#[test]
fn dispatch_plays_the_mapped_sample() {
    let mut d = dispatcher();
    d.dispatch(0).unwrap();
    assert_eq!(d.sink().plays(), vec!["sound1"]);
    assert_eq!(d.sink().playing(), Some("sound1"));
    let current = d.current().unwrap();
    assert_eq!(current.index, 0);
    assert_eq!(current.resource, "sound1");
}

#[test]
fn previous_sample_stops_before_the_next_starts() {
    let mut d = dispatcher();
    d.dispatch(3).unwrap();
    d.dispatch(7).unwrap();
    assert_eq!(
        d.sink().calls,
        vec![
            SinkCall::Stop,
            SinkCall::Play("sound4".into()),
            SinkCall::Stop,
            SinkCall::Play("sound8".into()),
        ]
    );
    assert_eq!(d.sink().max_concurrent, 1);
    assert_eq!(d.current().unwrap().index, 7);

    let reports = d.poll();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].index, 3);
    assert_eq!(reports[0].outcome, PlaybackOutcome::Stopped);
    // the interrupted sample's report must not clear the newer handle
    assert_eq!(d.current().unwrap().index, 7);
}

#[test]
fn repeated_hits_restart_the_same_sample() {
    let mut d = dispatcher();
    d.dispatch(5).unwrap();
    let first = d.current().unwrap().ticket;
    d.dispatch(5).unwrap();
    let second = d.current().unwrap().ticket;
    assert_ne!(first, second);
    assert_eq!(d.sink().plays(), vec!["sound6", "sound6"]);
    assert_eq!(d.sink().max_concurrent, 1);
}

#[test]
fn out_of_range_index_is_a_contract_error() {
    let mut d = dispatcher();
    assert_eq!(
        d.dispatch(12),
        Err(GuitarError::IndexOutOfRange { index: 12, len: 12 })
    );
    assert!(d.sink().calls.is_empty());
    assert!(d.current().is_none());
}

#[test]
fn missing_resource_leaves_current_playback_alone() {
    let sink = RecordingSink::with_resources(["sound1"]);
    let mut d = PlaybackDispatcher::new(sink, SoundBank::default());
    d.dispatch(0).unwrap();
    assert_eq!(
        d.dispatch(1),
        Err(GuitarError::MissingAudioResource("sound2".into()))
    );
    assert_eq!(d.sink().plays(), vec!["sound1"]);
    assert_eq!(d.sink().playing(), Some("sound1"));
    assert_eq!(d.current().unwrap().index, 0);
}

#[test]
fn decode_failure_is_reported_and_does_not_block_later_hits() {
    let mut sink = RecordingSink::full();
    sink.undecodable.insert("sound3".into());
    let mut d = PlaybackDispatcher::new(sink, SoundBank::default());

    let err = d.dispatch(2).unwrap_err();
    assert!(matches!(
        err,
        GuitarError::AudioDecodeFailure { ref resource, .. } if resource == "sound3"
    ));
    assert!(d.current().is_none());

    d.dispatch(4).unwrap();
    assert_eq!(d.sink().playing(), Some("sound5"));
}

#[test]
fn finished_sample_clears_the_current_handle() {
    let mut d = dispatcher();
    d.dispatch(9).unwrap();
    assert!(d.poll().is_empty());
    d.sink_mut().finish();
    let reports = d.poll();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].resource, "sound10");
    assert_eq!(reports[0].outcome, PlaybackOutcome::Finished);
    assert!(d.current().is_none());
}

#[test]
fn failure_after_acceptance_is_reported_on_poll() {
    let mut d = dispatcher();
    d.dispatch(6).unwrap();
    assert_eq!(d.current().unwrap().index, 6);
    d.sink_mut().fail("device lost");
    let reports = d.poll();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].index, 6);
    assert_eq!(reports[0].resource, "sound7");
    assert_eq!(
        reports[0].outcome,
        PlaybackOutcome::Failed("device lost".into())
    );
    assert!(d.current().is_none());

    // the next hit plays normally
    d.dispatch(2).unwrap();
    assert_eq!(d.sink().playing(), Some("sound3"));
}

#[test]
fn explicit_stop_releases_playback() {
    let mut d = dispatcher();
    d.dispatch(1).unwrap();
    d.stop();
    assert!(d.current().is_none());
    assert_eq!(d.sink().playing(), None);
    assert_eq!(d.poll()[0].outcome, PlaybackOutcome::Stopped);
}

#[test]
fn custom_sample_names_follow_the_bank() {
    let names = [
        "e2", "a2", "d3", "g3", "b3", "e4", "c3", "f3", "bb3", "eb4", "ab4", "db5",
    ];
    let sink = RecordingSink::with_resources(names);
    let mut d = PlaybackDispatcher::new(sink, SoundBank::with_samples(names));
    d.dispatch(8).unwrap();
    assert_eq!(d.sink().playing(), Some("bb3"));
}
