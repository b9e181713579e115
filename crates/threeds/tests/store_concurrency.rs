use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use threeds::{FingerprintStatus, InMemoryTransactionStore, TransactionRecord, TransactionStore};

#[test]
fn test_distinct_keys_do_not_block_each_other() {
    let store = Arc::new(InMemoryTransactionStore::new());
    let (done_tx, done_rx) = mpsc::channel();

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let id = format!("w{worker}-tx{i}");
                    store.add(&id, TransactionRecord::new("2.2.0", FingerprintStatus::NotCompleted));
                    let got = store.get(&id).expect("record just added");
                    assert_eq!(got.protocol_version, "2.2.0");
                }
                done_tx.send(worker).unwrap();
            })
        })
        .collect();
    drop(done_tx);

    for _ in 0..8 {
        done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("worker did not finish in time");
    }
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(store.len(), 8 * 500);
}

#[test]
fn test_reader_sees_whole_record_during_status_update() {
    let store = Arc::new(InMemoryTransactionStore::new());
    for i in 0..200 {
        store.add(
            &format!("T{i}"),
            TransactionRecord::new("2.1.0", FingerprintStatus::NotCompleted),
        );
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..200 {
                store
                    .set_fingerprint_status(&format!("T{i}"), FingerprintStatus::Completed)
                    .unwrap();
            }
        })
    };

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..5 {
                for i in 0..200 {
                    let tx = store.get(&format!("T{i}")).unwrap();
                    assert_eq!(tx.protocol_version, "2.1.0");
                    assert!(matches!(
                        tx.fingerprint_status,
                        FingerprintStatus::NotCompleted | FingerprintStatus::Completed
                    ));
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    for i in 0..200 {
        assert_eq!(
            store.get(&format!("T{i}")).unwrap().fingerprint_status,
            FingerprintStatus::Completed
        );
    }
}

#[test]
fn test_purge_races_inserts() {
    let store = Arc::new(InMemoryTransactionStore::new());
    let purger = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..100 {
                store.purge_expired(Duration::ZERO);
            }
        })
    };

    let inserter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..1000 {
                store.add(
                    &format!("T{i}"),
                    TransactionRecord::new("2.2.0", FingerprintStatus::Unavailable),
                );
            }
        })
    };

    purger.join().unwrap();
    inserter.join().unwrap();
    assert!(store.len() <= 1000);
}
