use state::KvStore;
use tracing::{debug, info};

use crate::error::WasmStorageResult;
use crate::guard;
use crate::hash::content_hash;
use crate::params::Params;
use crate::policy::{ClassPolicy, Stage, SubmissionClass};
use crate::store::ArtifactStore;
use crate::types::{
    Ingested, MsgStoreDataRequestWasm, MsgStoreDataRequestWasmResponse, MsgStoreOverlayWasm,
    MsgStoreOverlayWasmResponse, Wasm, WasmType,
};

#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub sender: &'a str,
    pub wasm: &'a [u8],
    pub wasm_type: WasmType,
}

/// Runs wasm submissions through validation and into the artifact store.
///
/// The keeper holds no state of its own beyond configuration; every call
/// receives the store view of the transaction it executes in.
#[derive(Debug, Clone)]
pub struct Keeper {
    params: Params,
    data_request: ClassPolicy,
    overlay: ClassPolicy,
}

impl Keeper {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            data_request: ClassPolicy::for_class(SubmissionClass::DataRequest),
            overlay: ClassPolicy::for_class(SubmissionClass::Overlay),
        }
    }

    pub fn with_policy(mut self, policy: ClassPolicy) -> Self {
        match policy.class {
            SubmissionClass::DataRequest => self.data_request = policy,
            SubmissionClass::Overlay => self.overlay = policy,
        }
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn policy(&self, class: SubmissionClass) -> &ClassPolicy {
        match class {
            SubmissionClass::DataRequest => &self.data_request,
            SubmissionClass::Overlay => &self.overlay,
        }
    }

    pub async fn store_data_request_wasm<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        msg: &MsgStoreDataRequestWasm,
        block_height: u64,
    ) -> WasmStorageResult<MsgStoreDataRequestWasmResponse> {
        let submission = Submission {
            sender: &msg.sender,
            wasm: &msg.wasm,
            wasm_type: msg.wasm_type,
        };
        let ingested = self
            .ingest(kv, SubmissionClass::DataRequest, submission, block_height)
            .await?;
        Ok(MsgStoreDataRequestWasmResponse {
            hash: ingested.hash.to_hex(),
        })
    }

    pub async fn store_overlay_wasm<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        msg: &MsgStoreOverlayWasm,
        block_height: u64,
    ) -> WasmStorageResult<MsgStoreOverlayWasmResponse> {
        let submission = Submission {
            sender: &msg.sender,
            wasm: &msg.wasm,
            wasm_type: msg.wasm_type,
        };
        let ingested = self
            .ingest(kv, SubmissionClass::Overlay, submission, block_height)
            .await?;
        Ok(MsgStoreOverlayWasmResponse {
            hash: ingested.hash.to_hex(),
        })
    }

    pub async fn ingest<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        class: SubmissionClass,
        submission: Submission<'_>,
        block_height: u64,
    ) -> WasmStorageResult<Ingested> {
        match self.run(kv, class, submission, block_height).await {
            Ok(ingested) => {
                info!(
                    "stored {} wasm {} ({}) from {}",
                    class, ingested.hash, ingested.wasm_type, ingested.submitter
                );
                Ok(ingested)
            }
            Err(err) => {
                debug!(
                    "rejected {} wasm from {}: {}",
                    class, submission.sender, err
                );
                Err(err)
            }
        }
    }

    async fn run<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        class: SubmissionClass,
        submission: Submission<'_>,
        block_height: u64,
    ) -> WasmStorageResult<Ingested> {
        let policy = self.policy(class);
        let max = self.params.max_wasm_size;

        let mut canonical: Option<Vec<u8>> = None;
        for stage in policy.stages() {
            match stage {
                Stage::Authorize => guard::authorize(submission.sender, &self.params.authority)?,
                Stage::CheckType => guard::validate_type(policy, submission.wasm_type)?,
                Stage::Decompress => canonical = Some(guard::decompress(submission.wasm, max)?),
                Stage::CheckSize => {
                    if let Some(bytes) = &canonical {
                        guard::check_size(bytes, max)?;
                    }
                }
            }
        }
        let canonical = match canonical {
            Some(bytes) => bytes,
            None => {
                let bytes = guard::decompress(submission.wasm, max)?;
                guard::check_size(&bytes, max)?;
                bytes
            }
        };

        let hash = content_hash(&canonical);
        let store = ArtifactStore::new(kv);
        let wasm = Wasm {
            hash: hash.to_hex(),
            bytecode: canonical,
            wasm_type: submission.wasm_type,
            submitter: submission.sender.to_string(),
            added_at: block_height,
        };
        store.put(class, &wasm).await?;

        Ok(Ingested {
            hash,
            wasm_type: wasm.wasm_type,
            submitter: wasm.submitter,
        })
    }
}
