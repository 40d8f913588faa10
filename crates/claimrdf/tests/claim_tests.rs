//! Integration tests for the claim protocol
//!
//! Every test runs against a fresh in-memory oxigraph store, so the SPARQL
//! text generated here is parsed and evaluated for real.

use async_trait::async_trait;
use claimrdf::{ClaimClient, ClaimError, ClaimFields, ClaimFilter, ClaimUri, Term};
use claimrdf_store::{MemoryStore, ResultSet, SparqlStore, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const PREFIX: &str = "http://t/claims/";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (MemoryStore, ClaimClient) {
    init_tracing();
    let store = MemoryStore::new().unwrap();
    let client = ClaimClient::from_store(store.clone());
    (store, client)
}

fn term(quoted: &str) -> Term {
    quoted.parse().unwrap()
}

fn fields(source: &str, subject: &str, predicate: &str, object: &str) -> ClaimFields {
    ClaimFields::parse(source, subject, predicate, object).unwrap()
}

#[tokio::test]
async fn test_insert_and_fetch_round_trip() {
    let (_store, client) = setup();
    let inserted = fields("<http://t/s>", "<http://t/subj>", "<http://t/pred>", "<http://t/obj>");

    let claim = client.insert_claim(PREFIX, &inserted).await.unwrap();
    assert!(claim.uri().as_str().starts_with(PREFIX));

    assert_eq!(claim.source().await.unwrap(), &inserted.source);
    assert_eq!(claim.subject().await.unwrap(), &inserted.subject);
    assert_eq!(claim.predicate().await.unwrap(), &inserted.predicate);
    assert_eq!(claim.object().await.unwrap(), &inserted.object);

    let fetched = client.fetch_claim(claim.uri()).await.unwrap();
    assert_eq!(fetched, Some(inserted));
}

#[tokio::test]
async fn test_example_scenario() {
    let (_store, client) = setup();
    let inserted = fields("<http://t/s>", "<http://t/subj>", "<http://t/pred>", "<http://t/obj>");
    client.insert_claim(PREFIX, &inserted).await.unwrap();

    let claims = client
        .fetch_claims(&ClaimFilter::all().with_source(term("<http://t/s>")))
        .await
        .unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].subject().await.unwrap().to_string(), "<http://t/subj>");
}

#[tokio::test]
async fn test_filter_narrowing() {
    let (_store, client) = setup();
    client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/b>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();

    let by_source = ClaimFilter::all().with_source(term("<http://t/s>"));
    assert_eq!(client.fetch_claims(&by_source).await.unwrap().len(), 2);

    let by_source_and_subject = by_source.clone().with_subject(term("<http://t/a>"));
    let claims = client.fetch_claims(&by_source_and_subject).await.unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].subject().await.unwrap(), &term("<http://t/a>"));

    let unrelated = ClaimFilter::all().with_source(term("<http://t/other>"));
    assert!(client.fetch_claims(&unrelated).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_on_each_field() {
    let (_store, client) = setup();
    client
        .insert_claim(PREFIX, &fields("<http://t/s1>", "<http://t/a>", "<http://t/p>", "<http://t/x>"))
        .await
        .unwrap();
    client
        .insert_claim(PREFIX, &fields("<http://t/s2>", "<http://t/b>", "<http://t/p>", "<http://t/y>"))
        .await
        .unwrap();

    let by_predicate = ClaimFilter::all().with_predicate(term("<http://t/p>"));
    assert_eq!(client.fetch_claims(&by_predicate).await.unwrap().len(), 2);

    let by_object = ClaimFilter::all().with_object(term("<http://t/y>"));
    let claims = client.fetch_claims(&by_object).await.unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].source().await.unwrap(), &term("<http://t/s2>"));

    let by_subject = ClaimFilter::all().with_subject(term("<http://t/a>"));
    assert_eq!(client.fetch_claims(&by_subject).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_by_source() {
    let (store, client) = setup();
    client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/b>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    assert_eq!(store.len().unwrap(), 10);

    client
        .remove_claims(&ClaimFilter::all().with_source(term("<http://t/s>")))
        .await
        .unwrap();

    for filter in [
        ClaimFilter::all().with_source(term("<http://t/s>")),
        ClaimFilter::all().with_subject(term("<http://t/a>")),
        ClaimFilter::all().with_subject(term("<http://t/b>")),
        ClaimFilter::all().with_object(term("<http://t/o>")),
    ] {
        assert!(client.fetch_claims(&filter).await.unwrap().is_empty());
    }
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_partial_remove() {
    let (_store, client) = setup();
    let first = fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>");
    let second = fields("<http://t/s>", "<http://t/b>", "<http://t/p>", "<http://t/o>");
    client.insert_claim(PREFIX, &first).await.unwrap();
    let kept = client.insert_claim(PREFIX, &second).await.unwrap();

    client.remove_claims(&ClaimFilter::exact(&first)).await.unwrap();

    let remaining = client
        .fetch_claims(&ClaimFilter::all().with_source(term("<http://t/s>")))
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].uri(), kept.uri());
    assert_eq!(remaining[0].subject().await.unwrap(), &term("<http://t/b>"));
}

#[tokio::test]
async fn test_remove_leaves_unrelated_triples() {
    let (store, client) = setup();
    client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    store
        .update("INSERT DATA { <http://t/a> <http://t/knows> <http://t/b> }")
        .await
        .unwrap();

    client.remove_claims(&ClaimFilter::all()).await.unwrap();
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_ambiguous_claim_uri() {
    let (store, client) = setup();
    // Two groups under one URI, differing only in subject
    store
        .update(
            "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
             PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
             INSERT DATA {
               <http://t/claims/dup> rdfs:isDefinedBy <http://t/s> ;
                   a rdf:Statement ;
                   rdf:subject <http://t/a>, <http://t/b> ;
                   rdf:predicate <http://t/p> ;
                   rdf:object <http://t/o> .
             }",
        )
        .await
        .unwrap();

    let uri = ClaimUri::parse("<http://t/claims/dup>").unwrap();
    let claim = client.claim(uri.clone());

    match claim.subject().await {
        Err(ClaimError::TooManyClaims { count, uri: reported }) => {
            assert_eq!(count, 2);
            assert_eq!(reported, uri);
        }
        other => panic!("Expected TooManyClaims, got {:?}", other),
    }
    assert!(!claim.is_resolved());

    // Failure is remembered; no second query
    let queries = store.query_count();
    assert!(matches!(claim.source().await, Err(ClaimError::TooManyClaims { count: 2, .. })));
    assert_eq!(store.query_count(), queries);

    assert!(matches!(
        client.fetch_claim(&uri).await,
        Err(ClaimError::TooManyClaims { count: 2, .. })
    ));

    // fetch-many still reports the URI once
    assert_eq!(client.fetch_claims(&ClaimFilter::all()).await.unwrap().len(), 1);
}

#[test]
fn test_too_many_claims_message() {
    let uri = ClaimUri::parse("<http://t/claims/dup>").unwrap();
    let err = ClaimError::TooManyClaims { count: 2, uri };
    assert_eq!(err.to_string(), "Got too many claims (2) for <http://t/claims/dup>");
}

#[tokio::test]
async fn test_empty_filter_returns_every_claim() {
    let (_store, client) = setup();
    for i in 0..5 {
        let subject = format!("<http://t/subject/{}>", i);
        client
            .insert_claim(PREFIX, &fields("<http://t/s>", &subject, "<http://t/p>", "<http://t/o>"))
            .await
            .unwrap();
    }

    let claims = client.fetch_claims(&ClaimFilter::all()).await.unwrap();
    assert_eq!(claims.len(), 5);

    let mut uris: Vec<_> = claims.iter().map(|c| c.uri().as_str().to_string()).collect();
    uris.sort();
    uris.dedup();
    assert_eq!(uris.len(), 5);
}

#[tokio::test]
async fn test_empty_store() {
    let (_store, client) = setup();
    assert!(client.fetch_claims(&ClaimFilter::all()).await.unwrap().is_empty());

    let uri = ClaimUri::parse("<http://t/claims/none>").unwrap();
    assert_eq!(client.fetch_claim(&uri).await.unwrap(), None);
    assert!(matches!(
        client.claim(uri).object().await,
        Err(ClaimError::ClaimNotFound(_))
    ));
}

#[tokio::test]
async fn test_fields_fetched_once() {
    let (store, client) = setup();
    let claim = client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    assert_eq!(store.query_count(), 0);
    assert_eq!(store.update_count(), 1);

    claim.source().await.unwrap();
    assert!(claim.is_resolved());
    claim.subject().await.unwrap();
    claim.predicate().await.unwrap();
    claim.object().await.unwrap();

    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_handles_do_not_share_cache() {
    let (store, client) = setup();
    let claim = client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    let twin = client.claim(claim.uri().clone());

    claim.fields().await.unwrap();
    twin.fields().await.unwrap();
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn test_cache_is_not_a_live_view() {
    let (_store, client) = setup();
    let claim = client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();
    claim.fields().await.unwrap();

    client.remove_claims(&ClaimFilter::all()).await.unwrap();

    assert_eq!(claim.subject().await.unwrap(), &term("<http://t/a>"));
    assert_eq!(client.fetch_claim(claim.uri()).await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_accessors_share_one_fetch() {
    let (store, client) = setup();
    let claim = client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();

    let (source, subject, predicate, object) =
        tokio::join!(claim.source(), claim.subject(), claim.predicate(), claim.object());

    assert_eq!(source.unwrap(), &term("<http://t/s>"));
    assert_eq!(subject.unwrap(), &term("<http://t/a>"));
    assert_eq!(predicate.unwrap(), &term("<http://t/p>"));
    assert_eq!(object.unwrap(), &term("<http://t/o>"));
    assert_eq!(store.query_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_share_one_fetch() {
    let (store, client) = setup();
    let claim = Arc::new(
        client
            .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
            .await
            .unwrap(),
    );

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let claim = Arc::clone(&claim);
            tokio::spawn(async move { claim.subject().await.map(|t| t.clone()) })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), term("<http://t/a>"));
    }
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn test_literal_objects() {
    let (_store, client) = setup();
    let cases = [
        "\"plain text\"",
        "\"chat\"@fr",
        "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>",
    ];

    for object in cases {
        let claim = client
            .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", object))
            .await
            .unwrap();
        assert_eq!(claim.object().await.unwrap().to_string(), object);

        let found = client
            .fetch_claims(&ClaimFilter::all().with_object(term(object)))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}

#[tokio::test]
async fn test_hostile_literal_stays_a_value() {
    let (store, client) = setup();
    let hostile = "x\" } ; DELETE WHERE { ?s ?p ?o } ; INSERT DATA { <a:b> <a:c> \"d";
    let claim = client
        .insert_claim(
            PREFIX,
            &ClaimFields::new(
                term("<http://t/s>"),
                term("<http://t/a>"),
                term("<http://t/p>"),
                Term::literal(hostile),
            ),
        )
        .await
        .unwrap();

    assert_eq!(store.len().unwrap(), 5);
    assert_eq!(claim.object().await.unwrap().value(), hostile);

    let found = client
        .fetch_claims(&ClaimFilter::all().with_object(Term::literal(hostile)))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

/// Wraps a store and fails the next query on demand
struct FlakyStore {
    inner: MemoryStore,
    fail_next: AtomicBool,
}

#[async_trait]
impl SparqlStore for FlakyStore {
    async fn query(&self, query: &str) -> Result<ResultSet, StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Connection("connection reset".to_string()));
        }
        self.inner.query(query).await
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        self.inner.update(update).await
    }
}

#[tokio::test]
async fn test_store_failure_is_not_cached() {
    init_tracing();
    let inner = MemoryStore::new().unwrap();
    let flaky = Arc::new(FlakyStore {
        inner: inner.clone(),
        fail_next: AtomicBool::new(false),
    });
    let client = ClaimClient::new(flaky.clone());

    let claim = client
        .insert_claim(PREFIX, &fields("<http://t/s>", "<http://t/a>", "<http://t/p>", "<http://t/o>"))
        .await
        .unwrap();

    flaky.fail_next.store(true, Ordering::SeqCst);
    assert!(matches!(
        claim.subject().await,
        Err(ClaimError::Store(StoreError::Connection(_)))
    ));
    assert!(!claim.is_resolved());

    assert_eq!(claim.subject().await.unwrap(), &term("<http://t/a>"));
    assert!(claim.is_resolved());
}
