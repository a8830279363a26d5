use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};

/// Queue a transaction for the next mined block. Amounts and balances are
/// not checked; only blank parties are refused.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let NewTxRequest {
        sender,
        recipient,
        amount,
    } = body.into_inner();
    if sender.trim().is_empty() || recipient.trim().is_empty() {
        warn!("POST /transactions/new/ - rejected: missing sender or recipient");
        return HttpResponse::BadRequest().body("sender and recipient required");
    }

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.queue_transaction(sender, recipient, amount)
    };
    debug!("POST /transactions/new/ - queued for block #{index}");

    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    })
}

/// List the transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let pending = ledger.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: pending.len(),
        transactions: pending,
    })
}
