mod common;

use common::*;
use state::{CacheStore, InMemoryKvStore};
use wasm_storage::{
    export_genesis, init_genesis, load_params_from_file, GenesisState, GenesisWasm,
    MsgStoreDataRequestWasm, MsgStoreOverlayWasm, QueryService, WasmStorageError, WasmType,
};

async fn seeded() -> (InMemoryKvStore, String, String) {
    let kv = InMemoryKvStore::new();
    let keeper = keeper();
    let dr = keeper
        .store_data_request_wasm(
            &kv,
            &MsgStoreDataRequestWasm {
                sender: OUTSIDER.into(),
                wasm: gzip(&hello_world_wasm()),
                wasm_type: WasmType::DataRequestExecutor,
            },
            5,
        )
        .await
        .unwrap();
    let mut relayer = hello_world_wasm();
    relayer.extend_from_slice(b"relayer");
    let overlay = keeper
        .store_overlay_wasm(
            &kv,
            &MsgStoreOverlayWasm {
                sender: AUTHORITY.into(),
                wasm: gzip(&relayer),
                wasm_type: WasmType::Relayer,
            },
            6,
        )
        .await
        .unwrap();
    (kv, dr.hash, overlay.hash)
}

#[tokio::test]
async fn fetch_by_hash_returns_canonical_bytes() {
    let (kv, dr_hash, _) = seeded().await;
    let keeper = keeper();
    let query = QueryService::new(&keeper, &kv);

    assert_eq!(query.fetch_by_hash(&dr_hash).await.unwrap(), hello_world_wasm());

    let wasm = query.wasm(&dr_hash).await.unwrap();
    assert_eq!(wasm.submitter, OUTSIDER);
    assert_eq!(wasm.added_at, 5);
}

#[tokio::test]
async fn unknown_hash_is_not_found() {
    let kv = InMemoryKvStore::new();
    let keeper = keeper();
    let query = QueryService::new(&keeper, &kv);

    let missing = keccak_hex(b"never stored");
    let err = query.fetch_by_hash(&missing).await.unwrap_err();
    assert!(matches!(err, WasmStorageError::NotFound(ref h) if *h == missing));
}

#[tokio::test]
async fn list_wasms_is_ordered_and_filterable() {
    let (kv, dr_hash, overlay_hash) = seeded().await;
    let keeper = keeper();
    let query = QueryService::new(&keeper, &kv);

    let all = query.list_wasms(None).await.unwrap();
    let mut expected = vec![dr_hash.clone(), overlay_hash.clone()];
    expected.sort();
    assert_eq!(all.iter().map(|w| w.hash.clone()).collect::<Vec<_>>(), expected);

    let relayers = query.list_wasms(Some(WasmType::Relayer)).await.unwrap();
    assert_eq!(relayers.len(), 1);
    assert_eq!(relayers[0].hash, overlay_hash);
    assert_eq!(relayers[0].added_at, 6);

    assert!(query.list_wasms(Some(WasmType::Tally)).await.unwrap().is_empty());
    assert_eq!(query.params().authority, AUTHORITY);
}

#[tokio::test]
async fn genesis_export_then_import_is_lossless() {
    let (kv, _, _) = seeded().await;
    let exported = export_genesis(&kv).await.unwrap();
    assert_eq!(exported.wasms.len(), 2);

    let json = serde_json::to_string(&exported).unwrap();
    let decoded: GenesisState = serde_json::from_str(&json).unwrap();

    let fresh = InMemoryKvStore::new();
    init_genesis(&keeper(), &fresh, &decoded).await.unwrap();
    assert_eq!(export_genesis(&fresh).await.unwrap(), exported);
    assert_eq!(fresh.commit().await.unwrap(), kv.commit().await.unwrap());
}

#[tokio::test]
async fn genesis_rejects_mismatched_hash() {
    let kv = InMemoryKvStore::new();
    let genesis = GenesisState {
        wasms: vec![GenesisWasm {
            hash: keccak_hex(b"something else"),
            bytecode: hello_world_wasm(),
            wasm_type: WasmType::Relayer,
            submitter: AUTHORITY.into(),
            added_at: 0,
        }],
    };

    let err = init_genesis(&keeper(), &kv, &genesis).await.unwrap_err();
    assert!(matches!(err, WasmStorageError::InvalidGenesis(_)));
    assert!(kv.is_empty().unwrap());
}

#[tokio::test]
async fn genesis_rejects_duplicates_and_oversized_entries() {
    let entry = GenesisWasm {
        hash: keccak_hex(&hello_world_wasm()),
        bytecode: hello_world_wasm(),
        wasm_type: WasmType::DataRequestExecutor,
        submitter: AUTHORITY.into(),
        added_at: 0,
    };

    let kv = InMemoryKvStore::new();
    let cache = CacheStore::new(&kv);
    let duplicated = GenesisState {
        wasms: vec![entry.clone(), entry],
    };
    let err = init_genesis(&keeper(), &cache, &duplicated).await.unwrap_err();
    assert!(err.to_string().contains("duplicate wasm"));
    cache.discard();
    assert!(kv.is_empty().unwrap());

    let big = oversized_wasm();
    let oversized = GenesisState {
        wasms: vec![GenesisWasm {
            hash: keccak_hex(&big),
            bytecode: big,
            wasm_type: WasmType::Relayer,
            submitter: AUTHORITY.into(),
            added_at: 0,
        }],
    };
    let err = init_genesis(&keeper(), &kv, &oversized).await.unwrap_err();
    assert!(matches!(err, WasmStorageError::TooLarge { .. }));
}

#[test]
fn params_load_from_json_with_default_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    std::fs::write(&path, format!(r#"{{"authority": "{AUTHORITY}"}}"#)).unwrap();

    let params = load_params_from_file(&path).unwrap();
    assert_eq!(params.authority, AUTHORITY);
    assert_eq!(params.max_wasm_size, wasm_storage::DEFAULT_MAX_WASM_SIZE);

    std::fs::write(&path, r#"{"authority": "", "max_wasm_size": 10}"#).unwrap();
    assert!(load_params_from_file(&path).is_err());
}
