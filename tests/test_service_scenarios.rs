//! End-to-end scenarios through the public `SdpService` façade, using the
//! in-process loopback engine and memory record store as collaborators.

use sdp_client::{
    uuid16, BdAddr, DiscoveryEngine, EventKind, LoopbackEngine, MemoryRecordStore,
    ProtocolDescriptor, RecordDescriptor, RecordType, SdpCallback, SdpConfig, SdpEvent,
    SdpService, SearchCompletion, Status, UserToken, Uuid, WorkspaceLease, MAX_RECORDS,
};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PHONE: BdAddr = BdAddr::new([0x00, 0x1A, 0x7D, 0xDA, 0x71, 0x13]);
const HEADSET: BdAddr = BdAddr::new([0x00, 0x1B, 0x66, 0x01, 0x02, 0x03]);

fn spp() -> Uuid {
    uuid16(0x1101)
}

fn channel_callback() -> (SdpCallback, Receiver<SdpEvent>) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let cb: SdpCallback = Arc::new(move |e: &SdpEvent| {
        let _ = tx.lock().unwrap().send(e.clone());
    });
    (cb, rx)
}

fn next(rx: &Receiver<SdpEvent>) -> SdpEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("event not delivered")
}

/// Engine that holds searches until released by the test.
#[derive(Default)]
struct GatedEngine {
    parked: Mutex<Vec<(WorkspaceLease, Uuid, SearchCompletion)>>,
}

impl GatedEngine {
    fn finish(&self, matches: usize) {
        let (mut lease, uuid, done) = self.parked.lock().unwrap().remove(0);
        for _ in 0..matches {
            lease.push(RecordDescriptor::new(RecordType::Raw, uuid));
        }
        done(lease, Status::Success);
    }
}

impl DiscoveryEngine for GatedEngine {
    fn begin_search(&self, workspace: WorkspaceLease, _: BdAddr, uuid: Uuid, on_complete: SearchCompletion) {
        self.parked.lock().unwrap().push((workspace, uuid, on_complete));
    }
}

fn loopback_service() -> (SdpService, Arc<LoopbackEngine>, Arc<MemoryRecordStore>) {
    let engine = Arc::new(LoopbackEngine::new().unwrap());
    let store = Arc::new(MemoryRecordStore::new().unwrap());
    let service = SdpService::new(engine.clone(), store.clone());
    (service, engine, store)
}

#[test]
fn test_operations_before_enable_fail_silently() {
    let (service, _, store) = loopback_service();
    store.stage(UserToken(1), RecordDescriptor::default());

    assert!(!service.is_enabled());
    assert_eq!(service.search(PHONE, spp()), Status::Failure);
    assert_eq!(service.create_record(UserToken(1)), Status::Failure);
    assert_eq!(service.remove_record(UserToken(1)), Status::Failure);

    store.flush();
    assert!(store.is_empty());
    assert!(!service.search_in_flight());
}

#[test]
fn test_search_twenty_matches_delivers_fifteen() {
    let (service, engine, _) = loopback_service();
    for i in 0..20u8 {
        engine.add_record(
            PHONE,
            RecordDescriptor::new(RecordType::Raw, spp())
                .with_name(format!("Serial {}", i))
                .with_protocol(ProtocolDescriptor::Rfcomm { channel: i + 1 }),
        );
    }

    let (cb, rx) = channel_callback();
    assert_eq!(service.enable(cb), Status::Success);
    assert_eq!(next(&rx), SdpEvent::Enabled { status: Status::Success });

    assert_eq!(service.search(PHONE, spp()), Status::Success);
    assert_eq!(next(&rx), SdpEvent::SearchStarted { status: Status::Success });

    match next(&rx) {
        SdpEvent::SearchCompleted(result) => {
            assert_eq!(result.status, Status::Success);
            assert_eq!(result.remote_addr, PHONE);
            assert_eq!(result.uuid, spp());
            assert_eq!(result.record_count(), MAX_RECORDS);
            assert_eq!(result.records()[0].rfcomm_channel(), Some(1));
        }
        other => panic!("Expected SearchCompleted, got {:?}", other),
    }
    assert!(!service.search_in_flight());
}

#[test]
fn test_unreachable_device_then_retry() {
    let (service, engine, _) = loopback_service();
    let (cb, rx) = channel_callback();
    service.enable(cb);
    next(&rx);

    assert_eq!(service.search(HEADSET, spp()), Status::Success);
    next(&rx);
    let failed = next(&rx);
    assert_eq!(failed.kind(), EventKind::SearchCompleted);
    assert_eq!(failed.status(), Status::Failure);

    engine.add_device(HEADSET);
    assert_eq!(service.search(HEADSET, spp()), Status::Success);
    next(&rx);
    match next(&rx) {
        SdpEvent::SearchCompleted(result) => {
            assert_eq!(result.status, Status::Success);
            assert_eq!(result.record_count(), 0);
        }
        other => panic!("Expected SearchCompleted, got {:?}", other),
    }
}

#[test]
fn test_second_search_busy_until_first_completes() {
    let engine = Arc::new(GatedEngine::default());
    let store = Arc::new(MemoryRecordStore::new().unwrap());
    let service = SdpService::new(engine.clone(), store);
    let (cb, rx) = channel_callback();
    service.enable(cb);
    next(&rx);

    assert_eq!(service.search(PHONE, spp()), Status::Success);
    assert_eq!(service.search(HEADSET, uuid16(0x110B)), Status::Busy);
    assert!(service.search_in_flight());

    next(&rx); // SearchStarted for PHONE
    assert!(rx.try_recv().is_err());

    engine.finish(3);
    match next(&rx) {
        SdpEvent::SearchCompleted(result) => {
            assert_eq!(result.remote_addr, PHONE);
            assert_eq!(result.record_count(), 3);
        }
        other => panic!("Expected SearchCompleted, got {:?}", other),
    }

    assert_eq!(service.search(HEADSET, uuid16(0x110B)), Status::Success);
}

#[test]
fn test_create_then_remove_record() {
    let (service, _, store) = loopback_service();
    let (cb, rx) = channel_callback();
    service.enable(cb);
    next(&rx);

    let token = UserToken(7);
    store.stage(
        token,
        RecordDescriptor::new(RecordType::Ops, uuid16(0x1105)).with_name("OBEX Object Push"),
    );

    assert_eq!(service.create_record(token), Status::Success);
    assert_eq!(next(&rx), SdpEvent::RecordCreated { status: Status::Success, token });
    assert!(store.handle(token).is_some());

    assert_eq!(service.remove_record(token), Status::Success);
    assert_eq!(next(&rx), SdpEvent::RecordRemoved { status: Status::Success, token });
    assert!(store.is_empty());

    assert_eq!(service.remove_record(token), Status::Success);
    assert_eq!(next(&rx), SdpEvent::RecordRemoved { status: Status::Failure, token });
}

#[test]
fn test_rebind_routes_to_new_callback() {
    let (service, _, store) = loopback_service();
    let (first, first_rx) = channel_callback();
    let (second, second_rx) = channel_callback();

    service.enable(first);
    assert_eq!(service.enable(second), Status::Success);
    next(&first_rx);
    next(&second_rx);

    store.stage(UserToken(2), RecordDescriptor::default());
    service.create_record(UserToken(2));
    assert_eq!(next(&second_rx).token(), Some(UserToken(2)));
    assert!(first_rx.try_recv().is_err());
}

#[test]
fn test_rebind_refused_by_config() {
    let engine = Arc::new(LoopbackEngine::new().unwrap());
    let store = Arc::new(MemoryRecordStore::new().unwrap());
    let config = SdpConfig::from_json_str(r#"{ "allow_rebind": false }"#).unwrap();
    let service = SdpService::with_config(config, engine, store);
    assert!(!service.config().allow_rebind);
    assert_eq!(service.config().workspace_capacity, 64);

    let (first, _first_rx) = channel_callback();
    let (second, second_rx) = channel_callback();
    assert_eq!(service.enable(first), Status::Success);
    assert_eq!(service.enable(second), Status::Busy);
    assert!(second_rx.try_recv().is_err());
}

#[test]
fn test_reset_disables_service() {
    let (service, engine, _) = loopback_service();
    engine.add_device(PHONE);
    let (cb, rx) = channel_callback();
    service.enable(cb);
    next(&rx);

    service.reset();
    assert!(!service.is_enabled());
    assert_eq!(service.search(PHONE, spp()), Status::Failure);
    assert_eq!(service.create_record(UserToken(1)), Status::Failure);

    let (again, again_rx) = channel_callback();
    service.enable(again);
    next(&again_rx);
    assert_eq!(service.search(PHONE, spp()), Status::Success);
}

#[test]
fn test_panicking_callback_does_not_lose_later_completions() {
    let (service, _, store) = loopback_service();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let cb: SdpCallback = Arc::new(move |e: &SdpEvent| {
        if e.token() == Some(UserToken(1)) {
            panic!("caller bug on first record");
        }
        if let Some(token) = e.token() {
            let _ = tx.lock().unwrap().send(token);
        }
    });
    service.enable(cb);

    for t in 1..=3u64 {
        store.stage(UserToken(t), RecordDescriptor::default());
        assert_eq!(service.create_record(UserToken(t)), Status::Success);
    }

    let mut delivered = vec![
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
    ];
    delivered.sort();
    assert_eq!(delivered, vec![UserToken(2), UserToken(3)]);
    assert_eq!(store.len(), 3);
}
