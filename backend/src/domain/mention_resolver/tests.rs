//! Unit tests for mention recognition and profile resolution.

use std::io;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use mockall::Sequence;
use rstest::{fixture, rstest};
use tracing_subscriber::fmt::MakeWriter;

use super::MentionResolver;
use crate::domain::markup::{InlineExtension, InlineMatch, InlineNode, LinkNode};
use crate::domain::ports::{MockProfileDiscoverySource, ProfileDiscoveryError};
use crate::domain::{AccountCache, AccountHandle};
use crate::test_support::mentions::{DeferredExecutor, ScriptedDiscoverySource};

const HANDLE: &str = "@alex@example.org";
const GUESS: &str = "https://example.org/users/alex";
const PROFILE: &str = "https://example.org/@alex";
const NOT_FOUND_LOG: &str = "could not find account profile link";
const FAILED_LOG: &str = "account profile lookup failed";

struct Harness {
    resolver: MentionResolver,
    cache: Arc<AccountCache>,
    executor: Arc<DeferredExecutor>,
}

impl Harness {
    fn with_source(source: Arc<dyn crate::domain::ports::ProfileDiscoverySource>) -> Self {
        let cache = Arc::new(AccountCache::new());
        let executor = Arc::new(DeferredExecutor::default());
        let resolver = MentionResolver::new(Arc::clone(&cache), source, executor.clone());
        Self {
            resolver,
            cache,
            executor,
        }
    }

    fn destination(&self, text: &str) -> String {
        let offset = text.find('@').expect("text holds a sigil");
        match self.resolver.recognise(text, offset) {
            Some(InlineMatch {
                node: InlineNode::Link(link),
                ..
            }) => link.destination,
            other => panic!("expected a link node, got {other:?}"),
        }
    }
}

#[fixture]
fn handle() -> AccountHandle {
    HANDLE.parse().expect("valid handle")
}

#[fixture]
fn scripted() -> Arc<ScriptedDiscoverySource> {
    Arc::new(ScriptedDiscoverySource::default().with_profile(HANDLE, PROFILE))
}

#[rstest]
#[case("@alex@example.org", "@alex")]
#[case("@bea-t@social.example-host.net", "@bea-t")]
#[case("@x1@a.b", "@x1")]
fn valid_handles_consume_their_span_and_label_the_user(
    scripted: Arc<ScriptedDiscoverySource>,
    #[case] text: &str,
    #[case] label: &str,
) {
    let harness = Harness::with_source(scripted);

    let matched = harness.resolver.recognise(text, 0).expect("mention matches");

    assert_eq!(matched.consumed, text.len());
    let InlineNode::Link(link) = matched.node else {
        panic!("mention should produce a link node");
    };
    assert_eq!(link.label(), label);
    assert_eq!(link.title, text);
    assert_eq!(link.children, vec![InlineNode::Text(label.to_owned())]);
}

#[rstest]
#[case("@a@b@c")]
#[case("@alex@example.org@other.org")]
#[case("@")]
#[case("@alex")]
fn malformed_mentions_do_not_match_or_touch_the_cache(
    scripted: Arc<ScriptedDiscoverySource>,
    #[case] text: &str,
) {
    let harness = Harness::with_source(scripted);

    assert_eq!(harness.resolver.recognise(text, 0), None);
    assert!(harness.cache.is_empty());
    assert_eq!(harness.executor.spawned(), 0);
}

#[rstest]
fn first_sighting_links_to_the_guess(scripted: Arc<ScriptedDiscoverySource>) {
    let harness = Harness::with_source(scripted);

    let matched = harness
        .resolver
        .recognise("@alex@example.org", 0)
        .expect("mention matches");

    assert_eq!(
        matched.node,
        InlineNode::Link(LinkNode {
            destination: GUESS.to_owned(),
            title: HANDLE.to_owned(),
            children: vec![InlineNode::Text("@alex".to_owned())],
        })
    );
    assert_eq!(harness.executor.pending(), 1);
}

#[rstest]
#[tokio::test]
async fn successful_discovery_corrects_later_renders(
    handle: AccountHandle,
    scripted: Arc<ScriptedDiscoverySource>,
) {
    let harness = Harness::with_source(scripted.clone());

    assert_eq!(harness.destination("Hi @alex@example.org"), GUESS);
    assert_eq!(harness.executor.run_pending().await, 1);

    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(PROFILE));
    assert_eq!(harness.destination("Bye @alex@example.org"), PROFILE);
    assert_eq!(scripted.calls(), vec![handle]);
}

#[rstest]
#[case::not_found(ProfileDiscoveryError::not_found("acct:alex@example.org"))]
#[case::decode(ProfileDiscoveryError::decode("expected value at line 1 column 1"))]
#[case::transport(ProfileDiscoveryError::transport("connection refused"))]
#[tokio::test]
async fn failed_discovery_keeps_the_guess(
    handle: AccountHandle,
    #[case] failure: ProfileDiscoveryError,
) {
    let source = Arc::new(ScriptedDiscoverySource::default().with_response(HANDLE, Err(failure)));
    let harness = Harness::with_source(source.clone());

    harness.destination(HANDLE);
    harness.executor.run_pending().await;

    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(GUESS));
    assert_eq!(harness.destination(HANDLE), GUESS);
    assert_eq!(source.call_count(), 1, "failures are never retried");
    assert_eq!(harness.executor.pending(), 0);
}

#[rstest]
#[tokio::test]
async fn resolved_handles_trigger_no_further_lookups(handle: AccountHandle) {
    let mut source = MockProfileDiscoverySource::new();
    source
        .expect_discover_profile()
        .times(1)
        .returning(|_| Ok(PROFILE.to_owned()));
    let harness = Harness::with_source(Arc::new(source));

    harness.destination(HANDLE);
    harness.executor.run_pending().await;
    for _ in 0..5 {
        assert_eq!(harness.destination(HANDLE), PROFILE);
    }

    assert_eq!(harness.executor.spawned(), 1);
    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(PROFILE));
}

#[rstest]
fn repeated_mentions_in_one_render_share_a_single_lookup(
    scripted: Arc<ScriptedDiscoverySource>,
) {
    let harness = Harness::with_source(scripted);
    let text = "@alex@example.org and again @alex@example.org";

    let first = harness.resolver.recognise(text, 0).expect("first mention");
    let second_offset = text.rfind(" @").expect("second mention") + 1;
    let second = harness
        .resolver
        .recognise(text, second_offset)
        .expect("second mention");

    assert_eq!(first.node, second.node);
    assert_eq!(harness.executor.spawned(), 1);
}

#[rstest]
fn trailing_punctuation_is_left_for_the_prose(scripted: Arc<ScriptedDiscoverySource>) {
    let harness = Harness::with_source(scripted);
    let text = "Write to @alex@example.org.";
    let offset = text.find('@').expect("sigil present");

    let matched = harness.resolver.recognise(text, offset).expect("mention matches");

    assert_eq!(&text[offset..offset + matched.consumed], HANDLE);
    assert_eq!(&text[offset + matched.consumed..], ".");
}

#[rstest]
fn resolver_registers_on_the_sigil(scripted: Arc<ScriptedDiscoverySource>) {
    let harness = Harness::with_source(scripted);
    assert_eq!(harness.resolver.trigger(), '@');
    assert!(harness.resolver.parse_inline("@alex@example.org", 0).is_some());
}

#[rstest]
#[tokio::test]
async fn concurrent_first_sightings_see_only_complete_uris(
    handle: AccountHandle,
    scripted: Arc<ScriptedDiscoverySource>,
) {
    const RENDERS: usize = 8;

    let harness = Harness::with_source(scripted.clone());
    let barrier = Barrier::new(RENDERS);

    let destinations: Vec<String> = thread::scope(|scope| {
        let workers: Vec<_> = (0..RENDERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    harness.destination(HANDLE)
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("render thread"))
            .collect()
    });

    assert!(destinations.iter().all(|uri| uri == GUESS));
    let spawned = harness.executor.spawned();
    assert!(
        (1..=RENDERS).contains(&spawned),
        "racing misses may each start a lookup, got {spawned}"
    );

    harness.executor.run_pending().await;

    assert_eq!(scripted.call_count(), spawned);
    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(PROFILE));
    assert_eq!(harness.destination(HANDLE), PROFILE);
}

#[rstest]
#[tokio::test]
async fn two_misses_before_either_guess_lands_each_start_a_lookup(
    handle: AccountHandle,
    scripted: Arc<ScriptedDiscoverySource>,
) {
    let harness = Harness::with_source(scripted.clone());

    assert_eq!(harness.cache.lookup(&handle), None);
    assert_eq!(harness.cache.lookup(&handle), None);
    assert_eq!(harness.resolver.start_resolution(&handle), GUESS);
    assert_eq!(harness.resolver.start_resolution(&handle), GUESS);

    assert_eq!(harness.executor.spawned(), 2);
    assert_eq!(harness.executor.run_pending().await, 2);
    assert_eq!(scripted.call_count(), 2);
    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(PROFILE));
}

#[rstest]
#[tokio::test]
async fn a_late_guess_replaces_a_landed_correction(handle: AccountHandle) {
    let mut source = MockProfileDiscoverySource::new();
    let mut sequence = Sequence::new();
    source
        .expect_discover_profile()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(PROFILE.to_owned()));
    source
        .expect_discover_profile()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Err(ProfileDiscoveryError::transport("connection reset")));
    let harness = Harness::with_source(Arc::new(source));

    harness.resolver.start_resolution(&handle);
    harness.executor.run_pending().await;
    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(PROFILE));

    // A render that missed before the first guess was stored.
    harness.resolver.start_resolution(&handle);
    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(GUESS));
    harness.executor.run_pending().await;

    assert_eq!(harness.cache.lookup(&handle).as_deref(), Some(GUESS));
}

/// Log sink shared between a test and its `fmt` subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[rstest]
#[case::not_found(
    ProfileDiscoveryError::not_found("acct:alex@example.org"),
    NOT_FOUND_LOG,
    FAILED_LOG
)]
#[case::decode(ProfileDiscoveryError::decode("expected value"), FAILED_LOG, NOT_FOUND_LOG)]
#[case::transport(
    ProfileDiscoveryError::transport("connection refused"),
    FAILED_LOG,
    NOT_FOUND_LOG
)]
#[tokio::test]
async fn lookup_failures_are_logged_by_kind(
    #[case] failure: ProfileDiscoveryError,
    #[case] expected: &str,
    #[case] absent: &str,
) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);
    let source = Arc::new(ScriptedDiscoverySource::default().with_response(HANDLE, Err(failure)));
    let harness = Harness::with_source(source);

    harness.destination(HANDLE);
    harness.executor.run_pending().await;

    let output = logs.contents();
    let warning = output
        .lines()
        .find(|line| line.contains(expected))
        .unwrap_or_else(|| panic!("missing {expected:?} in logs:\n{output}"));
    assert!(warning.contains("WARN"), "unexpected level: {warning}");
    assert!(warning.contains("handle=@alex@example.org"), "missing handle: {warning}");
    assert!(!output.contains(absent), "unexpected {absent:?} in logs:\n{output}");
}
