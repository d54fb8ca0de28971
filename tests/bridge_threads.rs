use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use callbridge::{bridge, completion_pair, Completion, Executor, Strand, StrandConfig, Work};

/// Wraps a strand and records whether delivered items ran on it.
struct Recording {
    strand: Strand,
    on_strand: Arc<AtomicUsize>,
    off_strand: Arc<AtomicUsize>,
}

impl Recording {
    fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            strand: Strand::new(StrandConfig::named(name)),
            on_strand: Arc::default(),
            off_strand: Arc::default(),
        })
    }
}

impl Executor for Recording {
    fn post(&self, work: Work) {
        let strand = self.strand.clone();
        let on = Arc::clone(&self.on_strand);
        let off = Arc::clone(&self.off_strand);
        self.strand.post(Box::new(move || {
            if strand.running_in_this_strand() {
                on.fetch_add(1, Ordering::SeqCst);
            } else {
                off.fetch_add(1, Ordering::SeqCst);
            }
            work();
        }));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_operations_completed_from_foreign_threads() {
    let recording = Recording::new("signaling");

    let ops = (0..64u32).map(|i| {
        let exec = recording.clone();
        bridge::run_on::<u32, String, _>(exec, move |done| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(u64::from(i % 5)));
                if i % 7 == 0 {
                    done.fail(format!("op {i} failed"));
                } else {
                    done.succeed(i * 2);
                }
            });
        })
    });
    let results = futures::future::join_all(ops).await;

    for (i, res) in (0..64u32).zip(results) {
        if i % 7 == 0 {
            assert_eq!(res, Err(format!("op {i} failed")));
        } else {
            assert_eq!(res, Ok(i * 2));
        }
    }
    assert_eq!(recording.on_strand.load(Ordering::SeqCst), 64);
    assert_eq!(recording.off_strand.load(Ordering::SeqCst), 0);

    recording.strand.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_fires_from_two_threads_deliver_once() {
    let recording = Recording::new("race");

    for round in 0..32u32 {
        let res = bridge::run_on::<u32, (), _>(recording.clone(), move |done: Completion<u32, ()>| {
            let twin = done.clone();
            thread::spawn(move || done.succeed(round));
            thread::spawn(move || twin.succeed(round + 1000));
        })
        .await;

        let value = res.expect("operation succeeded");
        assert!(value == round || value == round + 1000);
    }
    assert_eq!(recording.on_strand.load(Ordering::SeqCst), 32);

    recording.strand.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn continuation_resumes_on_target_strand() {
    let strand = Strand::new(StrandConfig::named("resume"));
    let target = strand.clone();

    let (res, resumed_on_strand) = strand
        .spawn(async move {
            let res = bridge::run_on::<u32, (), _>(target.executor(), |done| {
                thread::spawn(move || done.succeed(42));
            })
            .await;
            (res, target.running_in_this_strand())
        })
        .await
        .expect("strand hosted the operation");

    assert_eq!(res, Ok(42));
    assert!(resumed_on_strand);
    strand.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn awaiters_on_one_strand_resume_in_delivery_order() {
    let strand = Strand::new(StrandConfig::named("ordered"));
    let resumed = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut completions = Vec::new();
    let mut hosted = Vec::new();

    for _ in 0..16 {
        let (done, pending) = completion_pair::<u32, ()>(strand.executor());
        completions.push(done);
        let resumed = Arc::clone(&resumed);
        let here = strand.clone();
        hosted.push(strand.spawn(async move {
            let value = pending.await.expect("operation succeeded");
            resumed.lock().push((value, here.running_in_this_strand()));
        }));
    }

    // Queued behind the first poll of every hosted future.
    let (parked_tx, parked_rx) = tokio::sync::oneshot::channel();
    strand.post(Box::new(move || {
        let _ = parked_tx.send(());
    }));
    parked_rx.await.expect("hosted futures parked");

    thread::spawn(move || {
        for (i, done) in (0..16u32).zip(completions) {
            done.succeed(i);
        }
    })
    .join()
    .expect("engine thread");

    for h in hosted {
        h.await.expect("hosted future finished");
    }
    let expected: Vec<(u32, bool)> = (0..16).map(|i| (i, true)).collect();
    assert_eq!(*resumed.lock(), expected);
    strand.shutdown().await;
}

#[tokio::test]
async fn synchronous_completion_inside_initiation() {
    let strand = Strand::new(StrandConfig::named("sync"));
    let target = strand.clone();
    let resumed = strand
        .spawn(async move {
            let res =
                bridge::run_on::<u32, (), _>(target.executor(), |done| done.succeed(42)).await;
            (res, target.running_in_this_strand())
        })
        .await;
    assert_eq!(resumed, Ok((Ok(42), true)));
    strand.shutdown().await;
}

#[tokio::test]
async fn timeout_then_late_completion_is_harmless() {
    let strand = Strand::new(StrandConfig::named("late"));
    let fired = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&fired);
    let fut = bridge::run_on::<u32, (), _>(strand.executor(), move |done| {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            done.succeed(7);
            flag.store(true, Ordering::SeqCst);
        });
    });

    let res = tokio::time::timeout(Duration::from_millis(20), fut).await;
    assert!(res.is_err(), "operation should still be pending");

    while !fired.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // The strand absorbed the late delivery and keeps serving work.
    let res = bridge::run_on::<u32, (), _>(strand.executor(), |done| done.succeed(1)).await;
    assert_eq!(res, Ok(1));
    strand.shutdown().await;
}

#[tokio::test]
async fn shut_down_strand_leaves_operation_pending() {
    let strand = Strand::new(StrandConfig::named("closed"));
    strand.shutdown().await;

    let fut = bridge::run_on::<u32, (), _>(strand.executor(), |done| done.succeed(5));
    let res = tokio::time::timeout(Duration::from_millis(50), fut).await;
    assert!(res.is_err());
}
