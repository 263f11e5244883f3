use std::sync::{Arc, Mutex};
use std::time::Duration;

use pocket_chat_model::{ErrorKind, ModelCatalog};
use pocket_chat_test_model::{PresetResponse, TestModelProvider};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use super::*;
use crate::conversation::Role;

fn build_session(
    provider: &TestModelProvider,
) -> (Session, mpsc::UnboundedReceiver<Turn>) {
    let (turn_tx, turn_rx) = mpsc::unbounded_channel();
    let session = SessionBuilder::with_inference_provider(provider.clone())
        .with_model("gpt2")
        .on_turn(move |turn| {
            turn_tx.send(turn.clone()).unwrap();
        })
        .build()
        .unwrap();
    (session, turn_rx)
}

async fn next_turn(turn_rx: &mut mpsc::UnboundedReceiver<Turn>) -> Turn {
    timeout(Duration::from_secs(5), turn_rx.recv())
        .await
        .expect("no turn was appended in time")
        .expect("session has been closed")
}

#[tokio::test]
async fn test_simple_message() {
    let mut provider = TestModelProvider::default();
    provider.add_response("Hello", PresetResponse::text("Hi there!"));
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("Hello").unwrap();

    // The user turn is there before the reply arrives.
    assert_eq!(session.transcript(), [Turn::user("Hello")]);
    assert_eq!(provider.call_count(), 1);

    assert_eq!(next_turn(&mut turn_rx).await, Turn::user("Hello"));
    assert_eq!(next_turn(&mut turn_rx).await, Turn::assistant("Hi there!"));
    assert_eq!(
        session.transcript(),
        [Turn::user("Hello"), Turn::assistant("Hi there!")]
    );
    assert_eq!(session.pending_requests(), 0);

    let requests = provider.requests();
    assert_eq!(requests[0].model, "gpt2");
    assert_eq!(requests[0].prompt, "Hello");
}

#[tokio::test]
async fn test_input_is_trimmed() {
    let mut provider = TestModelProvider::default();
    provider.add_response("Hello", PresetResponse::text("Hi there!"));
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("  Hello\n").unwrap();
    assert_eq!(next_turn(&mut turn_rx).await, Turn::user("Hello"));
    assert_eq!(next_turn(&mut turn_rx).await, Turn::assistant("Hi there!"));
    assert_eq!(provider.requests()[0].prompt, "Hello");
}

#[tokio::test]
async fn test_empty_input() {
    let provider = TestModelProvider::default();
    let (session, mut turn_rx) = build_session(&provider);

    for input in ["", "  ", "\n\t "] {
        assert_eq!(session.submit(input), Err(SubmitError::EmptyInput));
    }

    assert!(session.transcript().is_empty());
    assert_eq!(provider.call_count(), 0);
    assert_eq!(session.pending_requests(), 0);
    assert!(turn_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_reply_is_kept_verbatim() {
    let mut provider = TestModelProvider::default();
    provider.add_response(
        "Poem",
        PresetResponse::text("  Roses are red,\n  violets are blue.\n"),
    );
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("Poem").unwrap();
    next_turn(&mut turn_rx).await;
    let reply = next_turn(&mut turn_rx).await;
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.text(), "  Roses are red,\n  violets are blue.\n");
}

#[tokio::test]
async fn test_http_failure() {
    let mut provider = TestModelProvider::default();
    provider.add_response(
        "Hello",
        PresetResponse::failure(ErrorKind::HttpFailure { status: 500 }),
    );
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("Hello").unwrap();
    next_turn(&mut turn_rx).await;
    next_turn(&mut turn_rx).await;

    assert_eq!(
        session.transcript(),
        [
            Turn::user("Hello"),
            Turn::assistant(
                "Sorry, there was an error processing your request."
            ),
        ]
    );
}

#[tokio::test]
async fn test_failure_kinds_share_the_apology() {
    let kinds = [
        ErrorKind::NetworkFailure,
        ErrorKind::HttpFailure { status: 503 },
        ErrorKind::MalformedResponse,
    ];
    let mut provider = TestModelProvider::default();
    for (idx, kind) in kinds.iter().enumerate() {
        provider.add_response(
            format!("Question {idx}"),
            PresetResponse::failure(*kind),
        );
    }

    let failures = Arc::new(Mutex::new(vec![]));
    let (turn_tx, mut turn_rx) = mpsc::unbounded_channel();
    let session = SessionBuilder::with_inference_provider(provider.clone())
        .with_model("gpt2")
        .on_turn(move |turn| {
            turn_tx.send(turn.clone()).unwrap();
        })
        .on_inference_failure({
            let failures = Arc::clone(&failures);
            move |kind| failures.lock().unwrap().push(kind)
        })
        .build()
        .unwrap();

    for idx in 0..kinds.len() {
        session.submit(&format!("Question {idx}")).unwrap();
        assert_eq!(next_turn(&mut turn_rx).await.role(), Role::User);
        let reply = next_turn(&mut turn_rx).await;
        assert_eq!(reply, Turn::assistant(APOLOGY_TEXT));
    }

    // The transcript hides the reason, the observer does not.
    assert_eq!(*failures.lock().unwrap(), kinds);
}

#[tokio::test]
async fn test_ready_after_failure() {
    let mut provider = TestModelProvider::default();
    provider.add_response(
        "First",
        PresetResponse::failure(ErrorKind::NetworkFailure),
    );
    provider.add_response("Second", PresetResponse::text("Got it."));
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("First").unwrap();
    next_turn(&mut turn_rx).await;
    next_turn(&mut turn_rx).await;

    session.submit("Second").unwrap();
    next_turn(&mut turn_rx).await;
    assert_eq!(next_turn(&mut turn_rx).await, Turn::assistant("Got it."));
    assert_eq!(session.transcript().len(), 4);
}

#[tokio::test]
async fn test_transcript_length() {
    let mut provider = TestModelProvider::default();
    provider.set_fallback(PresetResponse::text("OK"));
    let (session, mut turn_rx) = build_session(&provider);

    let inputs = ["one", " ", "two", "", "three", "four", "\t"];
    let mut accepted = 0;
    for input in inputs {
        if session.submit(input).is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 4);

    for _ in 0..accepted * 2 {
        next_turn(&mut turn_rx).await;
    }
    assert_eq!(session.transcript().len(), 2 * accepted);
    assert_eq!(provider.call_count(), accepted);
    assert!(turn_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_replies_out_of_order() {
    let mut provider = TestModelProvider::default();
    provider.add_response(
        "A",
        PresetResponse::text("Reply to A")
            .with_delay(Duration::from_millis(300)),
    );
    provider.add_response(
        "B",
        PresetResponse::text("Reply to B")
            .with_delay(Duration::from_millis(100)),
    );
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("A").unwrap();
    session.submit("B").unwrap();
    assert_eq!(session.pending_requests(), 2);

    for _ in 0..4 {
        next_turn(&mut turn_rx).await;
    }
    assert_eq!(
        session.transcript(),
        [
            Turn::user("A"),
            Turn::user("B"),
            Turn::assistant("Reply to B"),
            Turn::assistant("Reply to A"),
        ]
    );
    assert_eq!(session.pending_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_pending_requests() {
    let mut provider = TestModelProvider::default();
    provider.set_fallback(
        PresetResponse::text("Done").with_delay(Duration::from_secs(1)),
    );
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("Slow").unwrap();
    assert_eq!(session.pending_requests(), 1);
    next_turn(&mut turn_rx).await;
    next_turn(&mut turn_rx).await;
    assert_eq!(session.pending_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_discards_reply() {
    let mut provider = TestModelProvider::default();
    provider.add_response(
        "Hello",
        PresetResponse::text("Too late").with_delay(Duration::from_secs(1)),
    );
    let (session, mut turn_rx) = build_session(&provider);

    session.submit("Hello").unwrap();
    assert_eq!(next_turn(&mut turn_rx).await, Turn::user("Hello"));
    session.close();

    sleep(Duration::from_secs(2)).await;
    // The observer went away with the session without seeing the reply.
    assert_eq!(turn_rx.recv().await, None);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_discards_replies() {
    let mut provider = TestModelProvider::default();
    provider.set_fallback(
        PresetResponse::text("Too late").with_delay(Duration::from_secs(1)),
    );
    let turns = Arc::new(Mutex::new(vec![]));
    let session = SessionBuilder::with_inference_provider(provider.clone())
        .with_model("gpt2")
        .on_turn({
            let turns = Arc::clone(&turns);
            move |turn| turns.lock().unwrap().push(turn.clone())
        })
        .build()
        .unwrap();

    session.submit("One").unwrap();
    session.submit("Two").unwrap();
    drop(session);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(*turns.lock().unwrap(), [Turn::user("One"), Turn::user("Two")]);
}

#[tokio::test]
async fn test_pending_input() {
    let mut provider = TestModelProvider::default();
    provider.add_response("Hi", PresetResponse::text("Hello!"));
    let (session, mut turn_rx) = build_session(&provider);

    session.set_pending_input("  ");
    assert_eq!(session.submit_pending_input(), Err(SubmitError::EmptyInput));
    // Blank input stays where it is.
    assert_eq!(session.pending_input(), "  ");

    session.set_pending_input(" Hi ");
    assert_eq!(session.pending_input(), " Hi ");
    session.submit_pending_input().unwrap();
    assert_eq!(session.pending_input(), "");
    assert_eq!(next_turn(&mut turn_rx).await, Turn::user("Hi"));
    assert_eq!(next_turn(&mut turn_rx).await, Turn::assistant("Hello!"));

    // Submitting directly clears whatever was staged.
    session.set_pending_input("draft");
    session.submit("Hi").unwrap();
    assert_eq!(session.pending_input(), "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions() {
    const COUNT: usize = 32;

    let mut provider = TestModelProvider::default();
    for idx in 0..COUNT {
        provider.add_response(
            format!("Q{idx}"),
            PresetResponse::text(format!("A{idx}"))
                .with_delay(Duration::from_millis((COUNT - idx) as u64)),
        );
    }
    let (session, mut turn_rx) = build_session(&provider);

    for idx in 0..COUNT {
        session.submit(&format!("Q{idx}")).unwrap();
    }
    for _ in 0..COUNT * 2 {
        next_turn(&mut turn_rx).await;
    }

    let transcript = session.transcript();
    assert_eq!(transcript.len(), COUNT * 2);
    for (idx, turn) in transcript[..COUNT].iter().enumerate() {
        assert_eq!(*turn, Turn::user(format!("Q{idx}")));
    }
    let mut replies = transcript[COUNT..]
        .iter()
        .map(|turn| turn.text().to_owned())
        .collect::<Vec<_>>();
    replies.sort();
    let mut expected =
        (0..COUNT).map(|idx| format!("A{idx}")).collect::<Vec<_>>();
    expected.sort();
    assert_eq!(replies, expected);
}

#[test]
fn test_build_errors() {
    let provider = TestModelProvider::default();

    let err = SessionBuilder::with_inference_provider(provider.clone())
        .build()
        .err();
    assert_eq!(err, Some(BuildError::MissingModel));

    let err = SessionBuilder::with_inference_provider(provider.clone())
        .with_model("  ")
        .build()
        .err();
    assert_eq!(err, Some(BuildError::MissingModel));

    let err = SessionBuilder::with_inference_provider(provider)
        .with_catalog(ModelCatalog::default())
        .with_model("gpt-5")
        .build()
        .err();
    assert_eq!(err, Some(BuildError::UnknownModel("gpt-5".to_owned())));
}

#[test]
fn test_build_with_catalog() {
    let provider = TestModelProvider::default();

    let session = SessionBuilder::with_inference_provider(provider.clone())
        .with_catalog(ModelCatalog::default())
        .build()
        .unwrap();
    assert_eq!(session.model(), "gpt2");

    let session = SessionBuilder::with_inference_provider(provider)
        .with_catalog(ModelCatalog::default())
        .with_model(" roberta-base ")
        .build()
        .unwrap();
    assert_eq!(session.model(), "roberta-base");
}
