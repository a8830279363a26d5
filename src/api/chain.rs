use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, warn};

use super::models::{AppState, ChainResponse, ValidateResponse};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let (chain, difficulty) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.chain(), ledger.pow().difficulty())
    };
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        difficulty,
        chain: &chain,
    })
}

/// Re-validate the local chain from genesis.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let valid = match ledger.verify_integrity() {
        Ok(()) => true,
        Err(e) => {
            warn!("integrity check failed: {e}");
            false
        }
    };
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: ledger.len(),
        difficulty: ledger.pow().difficulty(),
    })
}

/// Run one mining round off the async workers; the proof search is CPU-bound.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let worker = state.clone();
    match web::block(move || worker.miner.mine(&worker.ledger)).await {
        Ok(Ok(result)) => HttpResponse::Ok().json(result),
        Ok(Err(e)) => {
            error!("MINER - round failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
        Err(e) => {
            error!("MINER - worker failed: {e}");
            HttpResponse::InternalServerError().body("mining worker failed")
        }
    }
}
