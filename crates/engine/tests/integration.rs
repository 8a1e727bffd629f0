use nvblob_engine::{EngineError, MemoryEngine, StoreEngine};

fn open(namespace: &str) -> MemoryEngine {
    MemoryEngine::builder().namespace(namespace).unwrap().build()
}

#[test]
fn test_set_get_roundtrip_through_staging() {
    let mut engine = open("storage");

    engine.set_blob("serial", b"A1B2C3").unwrap();

    // Uncommitted writes are visible through the same handle.
    let mut buf = [0u8; 6];
    assert_eq!(engine.get_blob("serial", &mut buf).unwrap(), 6);
    assert_eq!(&buf, b"A1B2C3");
    assert_eq!(engine.blob_len("serial").unwrap(), 6);
}

#[test]
fn test_commit_survives_power_cycle() {
    let mut engine = open("storage");

    engine.set_blob("kept", b"yes").unwrap();
    engine.commit().unwrap();
    engine.set_blob("lost", b"no").unwrap();

    engine.power_cycle();

    assert_eq!(engine.blob_len("kept").unwrap(), 3);
    assert!(matches!(engine.blob_len("lost"), Err(EngineError::NotFound { .. })));
}

#[test]
fn test_get_blob_rejects_undersized_buffer() {
    let mut engine = open("storage");
    engine.set_blob("blob", &[1, 2, 3, 4]).unwrap();

    let mut small = [0u8; 2];
    let err = engine.get_blob("blob", &mut small).unwrap_err();
    assert!(
        matches!(err, EngineError::InvalidLength { stored: 4, capacity: 2, .. }),
        "expected InvalidLength, got {err:?}"
    );

    // An oversized buffer is fine; the stored length comes back.
    let mut large = [0u8; 16];
    assert_eq!(engine.get_blob("blob", &mut large).unwrap(), 4);
    assert_eq!(&large[..4], &[1, 2, 3, 4]);
}

#[test]
fn test_key_naming_rules() {
    let mut engine = open("storage");

    assert!(matches!(
        engine.set_blob("", b"x"),
        Err(EngineError::InvalidKey { .. })
    ));
    assert!(matches!(
        engine.set_blob("sixteen_chars_!!", b"x"),
        Err(EngineError::InvalidKey { .. })
    ));

    // 15 bytes is the documented maximum and must pass.
    engine.set_blob("fifteen_chars_!", b"x").unwrap();
}

#[test]
fn test_namespace_naming_rules() {
    assert!(matches!(
        MemoryEngine::builder().namespace(""),
        Err(EngineError::InvalidNamespace { .. })
    ));
    assert!(matches!(
        MemoryEngine::builder().namespace("way_too_long_namespace"),
        Err(EngineError::InvalidNamespace { .. })
    ));

    let engine = open("boot");
    assert_eq!(engine.namespace(), "boot");
}

#[test]
fn test_erase_key_and_absent_key() {
    let mut engine = open("storage");
    engine.set_blob("gone", b"soon").unwrap();

    engine.erase_key("gone").unwrap();
    assert!(matches!(engine.blob_len("gone"), Err(EngineError::NotFound { .. })));

    // Erasing an absent key is reported as NotFound; policy lives upstream.
    assert!(matches!(engine.erase_key("gone"), Err(EngineError::NotFound { .. })));
}

#[test]
fn test_erase_all_clears_committed_and_staged() {
    let mut engine = open("storage");
    engine.set_blob("a", b"1").unwrap();
    engine.commit().unwrap();
    engine.set_blob("b", b"2").unwrap();

    engine.erase_all().unwrap();
    assert!(engine.blob_len("a").is_err());
    assert!(engine.blob_len("b").is_err());

    // Until committed, the bulk erase itself is only staged.
    engine.power_cycle();
    assert_eq!(engine.blob_len("a").unwrap(), 1);

    engine.erase_all().unwrap();
    engine.commit().unwrap();
    engine.power_cycle();
    assert!(engine.blob_len("a").is_err());
}

#[test]
fn test_read_only_handle_refuses_mutation() {
    let mut engine = MemoryEngine::builder()
        .namespace("config")
        .unwrap()
        .read_only(true)
        .build();

    assert!(matches!(engine.set_blob("k", b"v"), Err(EngineError::ReadOnly { .. })));
    assert!(matches!(engine.erase_all(), Err(EngineError::ReadOnly { .. })));
}

#[test]
fn test_capacity_accounting() {
    let mut engine = MemoryEngine::builder()
        .namespace("tiny")
        .unwrap()
        .capacity(8)
        .build();

    engine.set_blob("a", &[0u8; 6]).unwrap();
    assert!(matches!(
        engine.set_blob("b", &[0u8; 4]),
        Err(EngineError::NoSpace { needed: 4, available: 2 })
    ));

    // Overwriting a key frees its old bytes first.
    engine.set_blob("a", &[0u8; 8]).unwrap();

    engine.erase_key("a").unwrap();
    engine.set_blob("b", &[0u8; 8]).unwrap();
}

#[test]
fn test_staged_mutations_counter() {
    let mut engine = open("storage");
    assert_eq!(engine.staged_mutations(), 0);

    engine.set_blob("a", b"1").unwrap();
    engine.set_blob("b", b"2").unwrap();
    assert_eq!(engine.staged_mutations(), 2);

    engine.commit().unwrap();
    assert_eq!(engine.staged_mutations(), 0);
}
