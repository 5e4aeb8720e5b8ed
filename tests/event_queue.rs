//! Ordering and backpressure properties of the event queue.

use std::time::Duration;

use coinbasepro_connect::events::{queue, Event, Trade};

fn trade_event(tag: u64) -> Event {
    Event::Trade(Trade {
        epoch_time_ns: tag,
        product_id: "BTC-USD".to_owned(),
        last_price: 1.0,
        last_size: 1.0,
        is_buy_side: true,
    })
}

fn tag_of(event: &Event) -> u64 {
    match event {
        Event::Trade(trade) => trade.epoch_time_ns,
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn dequeue_order_equals_enqueue_order() {
    let (tx, mut rx) = queue::bounded();

    for tag in 0..100 {
        tx.enqueue(trade_event(tag)).await.unwrap();
    }

    for expected in 0..100 {
        let event = rx.dequeue().await.unwrap();
        assert_eq!(tag_of(&event), expected);
    }
}

#[tokio::test]
async fn capacity_is_one_thousand() {
    assert_eq!(queue::CAPACITY, 1000);
}

#[tokio::test]
async fn enqueue_blocks_at_capacity_until_space() {
    let (tx, mut rx) = queue::bounded();

    for tag in 0..queue::CAPACITY as u64 {
        tx.enqueue(trade_event(tag)).await.unwrap();
    }

    // The queue is full: one more enqueue must park.
    let blocked = tokio::time::timeout(Duration::from_millis(50), tx.enqueue(trade_event(9999)));
    assert!(blocked.await.is_err());

    // Freeing one slot wakes a parked producer.
    let first = rx.dequeue().await.unwrap();
    assert_eq!(tag_of(&first), 0);

    tokio::time::timeout(Duration::from_millis(50), tx.enqueue(trade_event(9999)))
        .await
        .expect("space should be available")
        .unwrap();
}

#[tokio::test]
async fn dequeue_blocks_while_empty() {
    let (tx, mut rx) = queue::bounded();

    let waiter = tokio::spawn(async move { rx.dequeue().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    tx.enqueue(trade_event(7)).await.unwrap();

    let event = waiter.await.unwrap().unwrap();
    assert_eq!(tag_of(&event), 7);
}

#[tokio::test]
async fn per_producer_order_is_preserved() {
    let (tx, mut rx) = queue::bounded();

    let producer_a = {
        let tx = tx.clone();
        tokio::spawn(async move {
            for tag in 0..100 {
                tx.enqueue(trade_event(tag)).await.unwrap();
            }
        })
    };
    let producer_b = {
        let tx = tx.clone();
        tokio::spawn(async move {
            for tag in 1000..1100 {
                tx.enqueue(trade_event(tag)).await.unwrap();
            }
        })
    };

    producer_a.await.unwrap();
    producer_b.await.unwrap();

    let mut last_a = None;
    let mut last_b = None;
    for _ in 0..200 {
        let tag = tag_of(&rx.dequeue().await.unwrap());

        if tag >= 1000 {
            assert!(last_b < Some(tag));
            last_b = Some(tag);
        } else {
            assert!(last_a < Some(tag));
            last_a = Some(tag);
        }
    }

    assert_eq!(last_a, Some(99));
    assert_eq!(last_b, Some(1099));
}
