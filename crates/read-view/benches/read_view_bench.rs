use criterion::{Criterion, criterion_group, criterion_main};
use event_channel::{EventEnvelope, FeedEvent};
use read_view::{Follow, MaterializedStore, Projector, Tweet, User};

/// A store where user `u0` follows `followees` users with `tweets_each` tweets apiece.
async fn populate_store(store: &MaterializedStore, followees: usize, tweets_each: usize) {
    store.add_user(User::new("u0", "reader", "pw")).await.unwrap();
    for f in 1..=followees {
        let id = format!("u{f}");
        store
            .add_user(User::new(id.as_str(), id.as_str(), "pw"))
            .await
            .unwrap();
        store
            .add_follow(Follow::new("u0", "reader", id.as_str(), id.as_str()))
            .await
            .unwrap();
        for t in 0..tweets_each {
            store
                .add_tweet(Tweet::new(format!("{id}-t{t}"), id.as_str(), id.as_str(), "text"))
                .await
                .unwrap();
        }
    }
}

fn bench_timeline_100_followees(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MaterializedStore::new();
    rt.block_on(populate_store(&store, 100, 20));

    c.bench_function("read_view/timeline_100x20", |b| {
        b.iter(|| {
            rt.block_on(async {
                let timeline = store.get_timeline(&"u0".into()).await;
                assert_eq!(timeline.len(), 2000);
            });
        });
    });
}

fn bench_apply_tweet_events(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let events: Vec<_> = (0..1000)
        .map(|i| {
            let tweet = Tweet::new(format!("t{i}"), "author", "author", "hello");
            EventEnvelope::from_event(&FeedEvent::from(tweet)).unwrap()
        })
        .collect();

    c.bench_function("read_view/apply_1000_tweet_events", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut projector = Projector::new(MaterializedStore::new());
                for event in &events {
                    projector.apply(event).await;
                }
            });
        });
    });
}

criterion_group!(benches, bench_timeline_100_followees, bench_apply_tweet_events);
criterion_main!(benches);
